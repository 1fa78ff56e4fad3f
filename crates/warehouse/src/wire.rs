//! BigQuery REST API request and response bodies (`jobs.query`,
//! `jobs.getQueryResults`).

use forecast_common::{QueryParameter, Statement};
use serde::{Deserialize, Serialize};

/// Body of a `jobs.query` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequestBody {
    pub query: String,
    pub use_legacy_sql: bool,
    pub parameter_mode: String,
    pub query_parameters: Vec<WireParameter>,
    pub timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub format_options: FormatOptions,
}

impl QueryRequestBody {
    /// Standard SQL request binding every statement parameter by name.
    pub fn from_statement(statement: &Statement, timeout_ms: u64, location: Option<String>) -> Self {
        Self {
            query: statement.sql.clone(),
            use_legacy_sql: false,
            parameter_mode: "NAMED".to_string(),
            query_parameters: statement.parameters.iter().map(WireParameter::from).collect(),
            timeout_ms,
            location,
            format_options: FormatOptions {
                use_int64_timestamp: true,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    /// `decode::timestamp` assumes this is always set.
    pub use_int64_timestamp: bool,
}

/// A named scalar query parameter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireParameter {
    pub name: String,
    pub parameter_type: ParameterType,
    pub parameter_value: ParameterValueBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterType {
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterValueBody {
    pub value: String,
}

impl From<&QueryParameter> for WireParameter {
    fn from(param: &QueryParameter) -> Self {
        Self {
            name: param.name.clone(),
            parameter_type: ParameterType {
                type_: param.value.type_name().to_string(),
            },
            parameter_value: ParameterValueBody {
                value: param.value.to_wire_string(),
            },
        }
    }
}

/// Response of `jobs.query` and `jobs.getQueryResults`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub schema: Option<TableSchema>,
    #[serde(default)]
    pub job_reference: Option<JobReference>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub page_token: Option<String>,
    #[serde(default)]
    pub job_complete: Option<bool>,
    #[serde(default)]
    pub total_rows: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorProto>,
}

impl QueryResponse {
    /// Whether the job has finished. Responses that omit the flag are
    /// treated as complete.
    pub fn is_complete(&self) -> bool {
        self.job_complete.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    pub job_id: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableFieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

impl TableFieldSchema {
    pub fn is_repeated(&self) -> bool {
        self.mode
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case("REPEATED"))
    }
}

/// One row, cells in schema order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub f: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub v: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorProto {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}
