//! WeatherNext Gen ensemble forecasts.

use forecast_common::{ForecastModel, Statement};

use crate::builder::{render, QueryBuilder, QueryError, QueryRequest, SourceLayout, TableId};
use crate::catalog::{CatalogEntry, VariableCatalog};

pub const GEN_DATASET: &str = "weathernext_gen_forecasts";
pub const GEN_TABLE: &str = "126478713_1_0";

static GEN_VARIABLES: &[CatalogEntry] = &[
    CatalogEntry::new("forecast_time", "forecast.time"),
    CatalogEntry::new("hours", "forecast.hours"),
    CatalogEntry::new("ensemble_member", "ensemble.ensemble_member"),
    CatalogEntry::new("total_precipitation_12hr", "ensemble.total_precipitation_12hr"),
    CatalogEntry::new("100m_u_component_of_wind", "ensemble.u_component_of_wind_100m"),
    CatalogEntry::new("100m_v_component_of_wind", "ensemble.v_component_of_wind_100m"),
    CatalogEntry::new("10m_u_component_of_wind", "ensemble.u_component_of_wind_10m"),
    CatalogEntry::new("10m_v_component_of_wind", "ensemble.v_component_of_wind_10m"),
    CatalogEntry::new("2m_temperature_celsius", "ensemble.temperature_2m - 273.15"),
    CatalogEntry::new("mean_sea_level_pressure", "ensemble.mean_sea_level_pressure"),
    CatalogEntry::new("sea_surface_temperature", "ensemble.sea_surface_temperature"),
];

/// Gen variables, one row per forecast step and ensemble member.
pub const GEN_CATALOG: VariableCatalog = VariableCatalog::new(GEN_VARIABLES);

/// Query builder for a WeatherNext Gen deployment.
///
/// Rows nest `forecast` steps, which in turn nest `ensemble` members; both
/// levels are flattened.
#[derive(Debug, Clone)]
pub struct GenQueryBuilder {
    table: TableId,
}

impl GenQueryBuilder {
    /// Builder for the Gen table shared into `project_id`.
    pub fn new(project_id: &str) -> Result<Self, QueryError> {
        Ok(Self {
            table: TableId::new(project_id, GEN_DATASET, GEN_TABLE)?,
        })
    }

    pub fn with_table(table: TableId) -> Self {
        Self { table }
    }
}

impl QueryBuilder for GenQueryBuilder {
    fn model(&self) -> ForecastModel {
        ForecastModel::Gen
    }

    fn catalog(&self) -> VariableCatalog {
        GEN_CATALOG
    }

    fn table(&self) -> &TableId {
        &self.table
    }

    fn build(&self, request: &QueryRequest) -> Result<Statement, QueryError> {
        let layout = SourceLayout {
            from: format!(
                "FROM `{}` AS wn_gen\nCROSS JOIN wn_gen.forecast AS forecast\nCROSS JOIN forecast.ensemble AS ensemble",
                self.table
            ),
            init_time_column: "wn_gen.init_time",
            polygon_column: "wn_gen.geography_polygon",
        };
        render(self.model(), GEN_CATALOG, layout, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_table_uses_project() {
        let builder = GenQueryBuilder::new("acme-weather").unwrap();
        assert_eq!(
            builder.table().to_string(),
            "acme-weather.weathernext_gen_forecasts.126478713_1_0"
        );
    }

    #[test]
    fn test_double_flatten() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let stmt = GenQueryBuilder::new("p")
            .unwrap()
            .build(&QueryRequest::new(date, 10.0, 20.0))
            .unwrap();

        assert!(stmt.sql.contains(
            "FROM `p.weathernext_gen_forecasts.126478713_1_0` AS wn_gen\nCROSS JOIN wn_gen.forecast AS forecast\nCROSS JOIN forecast.ensemble AS ensemble"
        ));
        assert!(stmt.sql.contains("DATE(wn_gen.init_time) = @init_date"));
        assert!(stmt
            .sql
            .contains("ST_CONTAINS(wn_gen.geography_polygon, ST_GEOGPOINT(@lon, @lat))"));
    }

    #[test]
    fn test_ensemble_member_selectable() {
        assert!(GEN_CATALOG.contains("ensemble_member"));
        assert_eq!(GEN_CATALOG.len(), 11);
    }
}
