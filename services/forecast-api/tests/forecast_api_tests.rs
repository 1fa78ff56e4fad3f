//! End-to-end tests of the HTTP surface over a scripted warehouse.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use forecast_api::routes;
use forecast_api::service::ForecastService;
use forecast_api::state::AppState;
use forecast_common::{Column, ColumnType, ResultSet, Statement, Value};
use forecast_query::ModelRegistry;
use reqwest::StatusCode;
use serde_json::json;
use std::sync::{Arc, Mutex};
use warehouse::{Warehouse, WarehouseError, WarehouseResult};

// ============================================================================
// Test fixtures
// ============================================================================

/// Warehouse that replays one canned result and records each statement.
struct ScriptedWarehouse {
    result: Mutex<Option<WarehouseResult<ResultSet>>>,
    statements: Mutex<Vec<Statement>>,
}

impl ScriptedWarehouse {
    fn new(result: WarehouseResult<ResultSet>) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Some(result)),
            statements: Mutex::new(Vec::new()),
        })
    }

    fn last_sql(&self) -> Option<String> {
        self.statements.lock().unwrap().last().map(|s| s.sql.clone())
    }
}

#[async_trait]
impl Warehouse for ScriptedWarehouse {
    async fn execute(&self, statement: &Statement) -> WarehouseResult<ResultSet> {
        self.statements.lock().unwrap().push(statement.clone());
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(ResultSet::default()))
    }
}

async fn spawn(warehouse: Arc<ScriptedWarehouse>) -> String {
    let registry = ModelRegistry::new("test-project").unwrap();
    let state = Arc::new(AppState::new(ForecastService::new(registry, warehouse)));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn get(base: &str, path: &str) -> (StatusCode, serde_json::Value) {
    let response = reqwest::get(format!("{}{}", base, path)).await.unwrap();
    let status = response.status();
    let body = response.json().await.unwrap();
    (status, body)
}

fn at_hour(hour: u32) -> Value {
    Value::Timestamp(Utc.with_ymd_and_hms(2023, 4, 18, hour, 0, 0).unwrap())
}

fn hourly_rows() -> ResultSet {
    let mut rs = ResultSet::new(vec![
        Column::new("forecast_time", ColumnType::Timestamp),
        Column::new("temperature_2m_above_ground", ColumnType::Float),
        Column::new("total_precipitation_surface", ColumnType::Float),
    ]);
    rs.push_row(vec![at_hour(18), Value::Float(15.5), Value::Float(0.0)]);
    rs.push_row(vec![at_hour(6), Value::Float(9.25), Value::Null]);
    rs.push_row(vec![at_hour(12), Value::Float(18.0), Value::Float(f64::NAN)]);
    rs
}

const MADRID: &str = "init_date=2023-04-18&lat=40.416775&lon=-3.703790";

// ============================================================================
// /forecast
// ============================================================================

#[tokio::test]
async fn test_forecast_sorted_by_time_with_nulls() {
    let warehouse = ScriptedWarehouse::new(Ok(hourly_rows()));
    let base = spawn(warehouse.clone()).await;

    let (status, body) = get(&base, &format!("/forecast?{}&model=gfs", MADRID)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["init_date"], "2023-04-18");
    assert_eq!(body["model"], "gfs");
    assert_eq!(body["latitude"], 40.416775);

    let forecast = body["forecast"].as_array().unwrap();
    let times: Vec<&str> = forecast
        .iter()
        .map(|row| row["forecast_time"].as_str().unwrap())
        .collect();
    assert_eq!(
        times,
        vec![
            "2023-04-18T06:00:00+00:00",
            "2023-04-18T12:00:00+00:00",
            "2023-04-18T18:00:00+00:00",
        ]
    );

    // Missing and non-finite values are present as explicit nulls.
    let first = forecast[0].as_object().unwrap();
    assert!(first.contains_key("total_precipitation_surface"));
    assert!(first["total_precipitation_surface"].is_null());
    assert!(forecast[1]["total_precipitation_surface"].is_null());
    assert_eq!(forecast[2]["temperature_2m_above_ground"], 15.5);

    let sql = warehouse.last_sql().unwrap();
    assert!(sql.contains("@init_date"));
    assert!(!sql.contains("2023-04-18"));
}

#[tokio::test]
async fn test_model_defaults_to_graph() {
    let warehouse = ScriptedWarehouse::new(Ok(hourly_rows()));
    let base = spawn(warehouse.clone()).await;

    let (status, body) = get(&base, &format!("/forecast?{}", MADRID)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "graph");
    assert!(warehouse
        .last_sql()
        .unwrap()
        .contains("test-project.weathernext_graph_forecasts"));
}

#[tokio::test]
async fn test_unknown_model_lists_valid_models() {
    let warehouse = ScriptedWarehouse::new(Ok(hourly_rows()));
    let base = spawn(warehouse.clone()).await;

    let (status, body) = get(&base, &format!("/forecast?{}&model=ecmwf", MADRID)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "InvalidModel");
    assert_eq!(body["title"], "Invalid Model");
    assert_eq!(body["status"], 400);
    assert_eq!(body["valid_models"], json!(["graph", "gen", "gfs"]));
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("graph, gen, gfs"));
    assert!(warehouse.last_sql().is_none());
}

#[tokio::test]
async fn test_no_rows_is_not_found() {
    let empty = ResultSet::new(vec![Column::new("forecast_time", ColumnType::Timestamp)]);
    let base = spawn(ScriptedWarehouse::new(Ok(empty))).await;

    let (status, body) = get(&base, &format!("/forecast?{}&model=gen", MADRID)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "NoDataFound");
    assert_eq!(
        body["detail"],
        "No forecast data found for the specified date and location."
    );
}

#[tokio::test]
async fn test_warehouse_error_is_internal_error() {
    let base = spawn(ScriptedWarehouse::new(Err(WarehouseError::Api {
        status: 403,
        message: "Access Denied: Table weathernext_graph_forecasts.59572747_4_0".to_string(),
    })))
    .await;

    let (status, body) = get(&base, &format!("/forecast?{}", MADRID)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["type"], "QueryExecutionError");
    assert_eq!(
        body["detail"],
        "Access Denied: Table weathernext_graph_forecasts.59572747_4_0"
    );
}

#[tokio::test]
async fn test_variables_filter_drops_unknown_names() {
    let mut rs = ResultSet::new(vec![Column::new(
        "temperature_2m_above_ground",
        ColumnType::Float,
    )]);
    rs.push_row(vec![Value::Float(12.0)]);
    let warehouse = ScriptedWarehouse::new(Ok(rs));
    let base = spawn(warehouse.clone()).await;

    let (status, _) = get(
        &base,
        &format!(
            "/forecast?{}&model=gfs&variables=temperature_2m_above_ground,bogus_name",
            MADRID
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let sql = warehouse.last_sql().unwrap();
    assert!(sql.contains("AS `temperature_2m_above_ground`"));
    assert!(!sql.contains("bogus_name"));
    assert!(!sql.contains("AS `hours`"));
}

#[tokio::test]
async fn test_only_unknown_variables_is_bad_request() {
    let warehouse = ScriptedWarehouse::new(Ok(hourly_rows()));
    let base = spawn(warehouse.clone()).await;

    let (status, body) = get(
        &base,
        &format!("/forecast?{}&model=gfs&variables=bogus_name", MADRID),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "InvalidParameter");
    assert!(warehouse.last_sql().is_none());
}

#[tokio::test]
async fn test_invalid_parameters() {
    let base = spawn(ScriptedWarehouse::new(Ok(hourly_rows()))).await;

    for query in [
        "init_date=2023-04-18&lat=95&lon=0",
        "init_date=2023-04-18&lat=abc&lon=0",
        "init_date=2023-04-18&lon=0",
        "init_date=20230418&lat=40&lon=0",
    ] {
        let (status, body) = get(&base, &format!("/forecast?{}", query)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query: {}", query);
        assert_eq!(body["type"], "InvalidParameter", "query: {}", query);
        assert_eq!(body["status"], 400);
    }
}

#[tokio::test]
async fn test_malformed_query_string_is_json_error() {
    let warehouse = ScriptedWarehouse::new(Ok(hourly_rows()));
    let base = spawn(warehouse.clone()).await;

    let response = reqwest::get(format!(
        "{}/forecast?init_date=2023-04-18&lat=40.4&lon=-3.7&lat=1",
        base
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let text = response.text().await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["type"], "InvalidParameter");
    assert_eq!(body["status"], 400);
    assert!(body["detail"].as_str().unwrap().contains("'query'"));
    assert!(warehouse.last_sql().is_none());
}

// ============================================================================
// Discovery and health
// ============================================================================

#[tokio::test]
async fn test_list_models() {
    let base = spawn(ScriptedWarehouse::new(Ok(ResultSet::default()))).await;

    let (status, body) = get(&base, "/models").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["model"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["graph", "gen", "gfs"]);
}

#[tokio::test]
async fn test_get_model() {
    let base = spawn(ScriptedWarehouse::new(Ok(ResultSet::default()))).await;

    let (status, body) = get(&base, "/models/gfs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["table"],
        "bigquery-public-data.noaa_global_forecast_system.NOAA_GFS0P25"
    );
    assert_eq!(body["ensemble"], false);

    let (status, body) = get(&base, "/models/hrrr").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "InvalidModel");
}

#[tokio::test]
async fn test_health() {
    let base = spawn(ScriptedWarehouse::new(Ok(ResultSet::default()))).await;

    let (status, body) = get(&base, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
