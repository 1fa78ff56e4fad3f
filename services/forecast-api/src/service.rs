//! Forecast request handling: model lookup, query execution and result
//! normalization.

use chrono::NaiveDate;
use forecast_common::{FORECAST_TIME_FIELD, ResultSet, Value};
use forecast_query::{ModelRegistry, QueryBuilder, QueryRequest};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use warehouse::Warehouse;

use crate::error::ForecastError;
use crate::response::{ForecastResponse, ForecastRow, ModelInfo};

/// A forecast request as received from a client.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    /// Run date, `YYYY-MM-DD`.
    pub init_date: String,
    pub latitude: f64,
    pub longitude: f64,
    pub model: String,
    /// Comma-separated public variable names.
    pub variables: Option<String>,
}

/// Serves forecast requests against a shared warehouse client.
pub struct ForecastService {
    registry: ModelRegistry,
    warehouse: Arc<dyn Warehouse>,
}

impl ForecastService {
    pub fn new(registry: ModelRegistry, warehouse: Arc<dyn Warehouse>) -> Self {
        Self {
            registry,
            warehouse,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Run a forecast request end to end.
    #[instrument(skip(self, request), fields(model = %request.model, init_date = %request.init_date))]
    pub async fn handle(&self, request: ForecastRequest) -> Result<ForecastResponse, ForecastError> {
        let result = self.run(&request).await;

        let model_label = match &result {
            Err(ForecastError::InvalidModel { .. }) => "invalid".to_string(),
            _ => request.model.clone(),
        };
        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.status_code().as_u16(),
        };
        metrics::counter!(
            "forecast_requests_total",
            "model" => model_label,
            "status" => status.to_string()
        )
        .increment(1);

        result
    }

    async fn run(&self, request: &ForecastRequest) -> Result<ForecastResponse, ForecastError> {
        let builder = self
            .registry
            .resolve(&request.model)
            .map_err(|_| ForecastError::InvalidModel {
                requested: request.model.clone(),
                valid: self.valid_models(),
            })?;
        let model = builder.model();

        let init_date = parse_init_date(&request.init_date)?;
        validate_coordinates(request.latitude, request.longitude)?;
        let variables = request
            .variables
            .as_deref()
            .map(parse_variables)
            .unwrap_or_default();

        let query = QueryRequest::new(init_date, request.latitude, request.longitude)
            .with_variables(variables);
        let statement = builder.build(&query)?;

        let started = Instant::now();
        let result = self.warehouse.execute(&statement).await;
        metrics::histogram!("warehouse_query_duration_seconds", "model" => model.as_str())
            .record(started.elapsed().as_secs_f64());

        let result = result.map_err(|e| {
            warn!(error = %e, "Warehouse query failed");
            ForecastError::from(e)
        })?;

        if result.is_empty() {
            info!("Query returned no rows");
            return Err(ForecastError::NoDataFound);
        }

        let forecast = normalize_rows(result);
        info!(rows = forecast.len(), "Forecast served");

        Ok(ForecastResponse {
            init_date: init_date.format("%Y-%m-%d").to_string(),
            latitude: request.latitude,
            longitude: request.longitude,
            model,
            forecast,
        })
    }

    /// Names of every served model.
    pub fn valid_models(&self) -> Vec<String> {
        self.registry
            .models()
            .iter()
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Describe every served model.
    pub fn models(&self) -> Vec<ModelInfo> {
        self.registry.iter().map(describe).collect()
    }

    /// Describe one served model.
    pub fn model(&self, name: &str) -> Result<ModelInfo, ForecastError> {
        self.registry
            .resolve(name)
            .map(describe)
            .map_err(|_| ForecastError::InvalidModel {
                requested: name.to_string(),
                valid: self.valid_models(),
            })
    }
}

fn describe(builder: &dyn QueryBuilder) -> ModelInfo {
    let model = builder.model();
    ModelInfo {
        model,
        title: model.title().to_string(),
        ensemble: model.is_ensemble(),
        table: builder.table().to_string(),
        variables: builder.catalog().names().map(str::to_string).collect(),
    }
}

/// Split a comma-separated variable list, dropping blanks.
pub fn parse_variables(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_init_date(raw: &str) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ForecastError::invalid_parameter(
            "init_date",
            format!("'{}' is not a calendar date (expected YYYY-MM-DD)", raw),
        )
    })
}

fn validate_coordinates(lat: f64, lon: f64) -> Result<(), ForecastError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ForecastError::invalid_parameter(
            "lat",
            format!("{} is outside [-90, 90]", lat),
        ));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(ForecastError::invalid_parameter(
            "lon",
            format!("{} is outside [-180, 180]", lon),
        ));
    }
    Ok(())
}

/// Sort rows by forecast time (stable, nulls last) and replace missing or
/// non-finite values with explicit nulls.
pub fn normalize_rows(mut result: ResultSet) -> Vec<ForecastRow> {
    if result.sort_by_column(FORECAST_TIME_FIELD) {
        debug!("Sorted rows by {}", FORECAST_TIME_FIELD);
    }
    result.map_values(Value::normalized);

    let (columns, rows) = result.into_parts();
    rows.into_iter()
        .map(|row| {
            ForecastRow::new(
                columns
                    .iter()
                    .map(|c| c.name.clone())
                    .zip(row)
                    .collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use forecast_common::{Column, ColumnType, Statement};
    use std::sync::Mutex;
    use warehouse::{WarehouseError, WarehouseResult};

    struct FakeWarehouse {
        result: Mutex<Option<WarehouseResult<ResultSet>>>,
        statements: Mutex<Vec<Statement>>,
    }

    impl FakeWarehouse {
        fn returning(result: WarehouseResult<ResultSet>) -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(result)),
                statements: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Warehouse for FakeWarehouse {
        async fn execute(&self, statement: &Statement) -> WarehouseResult<ResultSet> {
            self.statements.lock().unwrap().push(statement.clone());
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(ResultSet::default()))
        }
    }

    fn service(warehouse: Arc<FakeWarehouse>) -> ForecastService {
        ForecastService::new(ModelRegistry::new("test-project").unwrap(), warehouse)
    }

    fn request(model: &str) -> ForecastRequest {
        ForecastRequest {
            init_date: "2023-04-18".to_string(),
            latitude: 40.416775,
            longitude: -3.70379,
            model: model.to_string(),
            variables: None,
        }
    }

    fn at_hour(hour: u32) -> Value {
        Value::Timestamp(Utc.with_ymd_and_hms(2023, 4, 18, hour, 0, 0).unwrap())
    }

    #[test]
    fn test_parse_variables() {
        assert_eq!(
            parse_variables("a, b,,c ,"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(parse_variables("").is_empty());
        assert!(parse_variables(" , ").is_empty());
    }

    #[test]
    fn test_parse_init_date() {
        assert!(parse_init_date("2023-04-18").is_ok());
        assert!(parse_init_date("2023-02-30").is_err());
        assert!(parse_init_date("18/04/2023").is_err());
        assert!(parse_init_date("2023-04-18') OR TRUE --").is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(90.0, -180.0).is_ok());
        assert!(validate_coordinates(90.5, 0.0).is_err());
        assert!(validate_coordinates(0.0, 180.1).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_normalize_sorts_and_nulls() {
        let mut rs = ResultSet::new(vec![
            Column::new("forecast_time", ColumnType::Timestamp),
            Column::new("2m_temperature_celsius", ColumnType::Float),
        ]);
        rs.push_row(vec![at_hour(18), Value::Float(15.0)]);
        rs.push_row(vec![at_hour(6), Value::Float(f64::NAN)]);
        rs.push_row(vec![at_hour(12), Value::Float(20.0)]);

        let rows = normalize_rows(rs);

        let times: Vec<&Value> = rows.iter().map(|r| r.get("forecast_time").unwrap()).collect();
        assert_eq!(times, vec![&at_hour(6), &at_hour(12), &at_hour(18)]);
        assert_eq!(rows[0].get("2m_temperature_celsius"), Some(&Value::Null));
    }

    #[test]
    fn test_normalize_without_time_keeps_order() {
        let mut rs = ResultSet::new(vec![Column::new("hours", ColumnType::Integer)]);
        rs.push_row(vec![Value::Integer(12)]);
        rs.push_row(vec![Value::Integer(6)]);

        let rows = normalize_rows(rs);
        assert_eq!(rows[0].get("hours"), Some(&Value::Integer(12)));
    }

    #[tokio::test]
    async fn test_invalid_model_skips_warehouse() {
        let warehouse = FakeWarehouse::returning(Ok(ResultSet::default()));
        let err = service(warehouse.clone())
            .handle(request("unknown"))
            .await
            .unwrap_err();

        match err {
            ForecastError::InvalidModel { valid, .. } => {
                assert_eq!(valid, vec!["graph", "gen", "gfs"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(warehouse.statements.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_is_no_data() {
        let warehouse = FakeWarehouse::returning(Ok(ResultSet::new(vec![Column::new(
            "forecast_time",
            ColumnType::Timestamp,
        )])));
        let err = service(warehouse).handle(request("gfs")).await.unwrap_err();
        assert!(matches!(err, ForecastError::NoDataFound));
    }

    #[tokio::test]
    async fn test_warehouse_failure_is_query_execution() {
        let warehouse = FakeWarehouse::returning(Err(WarehouseError::Api {
            status: 400,
            message: "Syntax error".to_string(),
        }));
        let err = service(warehouse).handle(request("graph")).await.unwrap_err();
        match err {
            ForecastError::QueryExecution(msg) => assert_eq!(msg, "Syntax error"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_variables_filter_reaches_query() {
        let mut rs = ResultSet::new(vec![Column::new(
            "temperature_2m_above_ground",
            ColumnType::Float,
        )]);
        rs.push_row(vec![Value::Float(281.5)]);
        let warehouse = FakeWarehouse::returning(Ok(rs));

        let mut req = request("gfs");
        req.variables = Some("temperature_2m_above_ground,bogus_name".to_string());
        let response = service(warehouse.clone()).handle(req).await.unwrap();

        assert_eq!(response.model, forecast_common::ForecastModel::Gfs);
        assert_eq!(response.forecast.len(), 1);

        let statements = warehouse.statements.lock().unwrap();
        assert!(statements[0]
            .sql
            .contains("f.temperature_2m_above_ground AS `temperature_2m_above_ground`"));
        assert!(!statements[0].sql.contains("bogus_name"));
        assert!(!statements[0].sql.contains("f.hours"));
    }

    #[test]
    fn test_model_info() {
        let svc = service(FakeWarehouse::returning(Ok(ResultSet::default())));
        let info = svc.model("gen").unwrap();
        assert!(info.ensemble);
        assert_eq!(info.table, "test-project.weathernext_gen_forecasts.126478713_1_0");
        assert!(info.variables.contains(&"ensemble_member".to_string()));
        assert_eq!(svc.models().len(), 3);
        assert!(svc.model("nope").is_err());
    }
}
