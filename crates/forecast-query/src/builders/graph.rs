//! WeatherNext Graph deterministic forecasts.

use forecast_common::{ForecastModel, Statement};

use crate::builder::{render, QueryBuilder, QueryError, QueryRequest, SourceLayout, TableId};
use crate::catalog::{CatalogEntry, VariableCatalog};

pub const GRAPH_DATASET: &str = "weathernext_graph_forecasts";
pub const GRAPH_TABLE: &str = "59572747_4_0";

static GRAPH_VARIABLES: &[CatalogEntry] = &[
    CatalogEntry::new("forecast_time", "forecast.time"),
    CatalogEntry::new("hours", "forecast.hours"),
    CatalogEntry::new("total_precipitation_6hr", "forecast.total_precipitation_6hr"),
    CatalogEntry::new("10m_u_component_of_wind", "forecast.u_component_of_wind_10m"),
    CatalogEntry::new("10m_v_component_of_wind", "forecast.v_component_of_wind_10m"),
    CatalogEntry::new("2m_temperature_celsius", "forecast.temperature_2m - 273.15"),
    CatalogEntry::new("mean_sea_level_pressure", "forecast.mean_sea_level_pressure"),
    // Pressure-level fields, hPa.
    CatalogEntry::new("50_geopotential", "forecast.geopotential_50"),
    CatalogEntry::new("100_geopotential", "forecast.geopotential_100"),
    CatalogEntry::new("150_geopotential", "forecast.geopotential_150"),
    CatalogEntry::new("200_geopotential", "forecast.geopotential_200"),
    CatalogEntry::new("250_geopotential", "forecast.geopotential_250"),
    CatalogEntry::new("300_geopotential", "forecast.geopotential_300"),
    CatalogEntry::new("400_geopotential", "forecast.geopotential_400"),
    CatalogEntry::new("500_geopotential", "forecast.geopotential_500"),
    CatalogEntry::new("600_geopotential", "forecast.geopotential_600"),
    CatalogEntry::new("700_geopotential", "forecast.geopotential_700"),
    CatalogEntry::new("850_geopotential", "forecast.geopotential_850"),
    CatalogEntry::new("925_geopotential", "forecast.geopotential_925"),
    CatalogEntry::new("1000_geopotential", "forecast.geopotential_1000"),
    CatalogEntry::new("50_specific_humidity", "forecast.specific_humidity_50"),
    CatalogEntry::new("100_specific_humidity", "forecast.specific_humidity_100"),
    CatalogEntry::new("150_specific_humidity", "forecast.specific_humidity_150"),
    CatalogEntry::new("200_specific_humidity", "forecast.specific_humidity_200"),
    CatalogEntry::new("250_specific_humidity", "forecast.specific_humidity_250"),
    CatalogEntry::new("300_specific_humidity", "forecast.specific_humidity_300"),
    CatalogEntry::new("400_specific_humidity", "forecast.specific_humidity_400"),
    CatalogEntry::new("500_specific_humidity", "forecast.specific_humidity_500"),
    CatalogEntry::new("600_specific_humidity", "forecast.specific_humidity_600"),
    CatalogEntry::new("700_specific_humidity", "forecast.specific_humidity_700"),
    CatalogEntry::new("850_specific_humidity", "forecast.specific_humidity_850"),
    CatalogEntry::new("925_specific_humidity", "forecast.specific_humidity_925"),
    CatalogEntry::new("1000_specific_humidity", "forecast.specific_humidity_1000"),
    CatalogEntry::new("50_temperature", "forecast.temperature_50"),
    CatalogEntry::new("100_temperature", "forecast.temperature_100"),
    CatalogEntry::new("150_temperature", "forecast.temperature_150"),
    CatalogEntry::new("200_temperature", "forecast.temperature_200"),
    CatalogEntry::new("250_temperature", "forecast.temperature_250"),
    CatalogEntry::new("300_temperature", "forecast.temperature_300"),
    CatalogEntry::new("400_temperature", "forecast.temperature_400"),
    CatalogEntry::new("500_temperature", "forecast.temperature_500"),
    CatalogEntry::new("600_temperature", "forecast.temperature_600"),
    CatalogEntry::new("700_temperature", "forecast.temperature_700"),
    CatalogEntry::new("850_temperature", "forecast.temperature_850"),
    CatalogEntry::new("925_temperature", "forecast.temperature_925"),
    CatalogEntry::new("1000_temperature", "forecast.temperature_1000"),
    CatalogEntry::new("50_u_component_of_wind", "forecast.u_component_of_wind_50"),
    CatalogEntry::new("100_u_component_of_wind", "forecast.u_component_of_wind_100"),
    CatalogEntry::new("150_u_component_of_wind", "forecast.u_component_of_wind_150"),
    CatalogEntry::new("200_u_component_of_wind", "forecast.u_component_of_wind_200"),
    CatalogEntry::new("250_u_component_of_wind", "forecast.u_component_of_wind_250"),
    CatalogEntry::new("300_u_component_of_wind", "forecast.u_component_of_wind_300"),
    CatalogEntry::new("400_u_component_of_wind", "forecast.u_component_of_wind_400"),
    CatalogEntry::new("500_u_component_of_wind", "forecast.u_component_of_wind_500"),
    CatalogEntry::new("600_u_component_of_wind", "forecast.u_component_of_wind_600"),
    CatalogEntry::new("700_u_component_of_wind", "forecast.u_component_of_wind_700"),
    CatalogEntry::new("850_u_component_of_wind", "forecast.u_component_of_wind_850"),
    CatalogEntry::new("925_u_component_of_wind", "forecast.u_component_of_wind_925"),
    CatalogEntry::new("1000_u_component_of_wind", "forecast.u_component_of_wind_1000"),
    CatalogEntry::new("50_v_component_of_wind", "forecast.v_component_of_wind_50"),
    CatalogEntry::new("100_v_component_of_wind", "forecast.v_component_of_wind_100"),
    CatalogEntry::new("150_v_component_of_wind", "forecast.v_component_of_wind_150"),
    CatalogEntry::new("200_v_component_of_wind", "forecast.v_component_of_wind_200"),
    CatalogEntry::new("250_v_component_of_wind", "forecast.v_component_of_wind_250"),
    CatalogEntry::new("300_v_component_of_wind", "forecast.v_component_of_wind_300"),
    CatalogEntry::new("400_v_component_of_wind", "forecast.v_component_of_wind_400"),
    CatalogEntry::new("500_v_component_of_wind", "forecast.v_component_of_wind_500"),
    CatalogEntry::new("600_v_component_of_wind", "forecast.v_component_of_wind_600"),
    CatalogEntry::new("700_v_component_of_wind", "forecast.v_component_of_wind_700"),
    CatalogEntry::new("850_v_component_of_wind", "forecast.v_component_of_wind_850"),
    CatalogEntry::new("925_v_component_of_wind", "forecast.v_component_of_wind_925"),
    CatalogEntry::new("1000_v_component_of_wind", "forecast.v_component_of_wind_1000"),
    CatalogEntry::new("50_vertical_velocity", "forecast.vertical_velocity_50"),
    CatalogEntry::new("100_vertical_velocity", "forecast.vertical_velocity_100"),
    CatalogEntry::new("150_vertical_velocity", "forecast.vertical_velocity_150"),
    CatalogEntry::new("200_vertical_velocity", "forecast.vertical_velocity_200"),
    CatalogEntry::new("250_vertical_velocity", "forecast.vertical_velocity_250"),
    CatalogEntry::new("300_vertical_velocity", "forecast.vertical_velocity_300"),
    CatalogEntry::new("400_vertical_velocity", "forecast.vertical_velocity_400"),
    CatalogEntry::new("500_vertical_velocity", "forecast.vertical_velocity_500"),
    CatalogEntry::new("600_vertical_velocity", "forecast.vertical_velocity_600"),
    CatalogEntry::new("700_vertical_velocity", "forecast.vertical_velocity_700"),
    CatalogEntry::new("850_vertical_velocity", "forecast.vertical_velocity_850"),
    CatalogEntry::new("925_vertical_velocity", "forecast.vertical_velocity_925"),
    CatalogEntry::new("1000_vertical_velocity", "forecast.vertical_velocity_1000"),
];

/// Graph variables: surface fields plus six quantities on 13 pressure levels.
pub const GRAPH_CATALOG: VariableCatalog = VariableCatalog::new(GRAPH_VARIABLES);

/// Query builder for a WeatherNext Graph deployment.
///
/// Each row carries a nested `forecast` collection that is flattened with one
/// cross join.
#[derive(Debug, Clone)]
pub struct GraphQueryBuilder {
    table: TableId,
}

impl GraphQueryBuilder {
    /// Builder for the Graph table shared into `project_id`.
    pub fn new(project_id: &str) -> Result<Self, QueryError> {
        Ok(Self {
            table: TableId::new(project_id, GRAPH_DATASET, GRAPH_TABLE)?,
        })
    }

    pub fn with_table(table: TableId) -> Self {
        Self { table }
    }
}

impl QueryBuilder for GraphQueryBuilder {
    fn model(&self) -> ForecastModel {
        ForecastModel::Graph
    }

    fn catalog(&self) -> VariableCatalog {
        GRAPH_CATALOG
    }

    fn table(&self) -> &TableId {
        &self.table
    }

    fn build(&self, request: &QueryRequest) -> Result<Statement, QueryError> {
        let layout = SourceLayout {
            from: format!(
                "FROM `{}` AS wn_graph\nCROSS JOIN wn_graph.forecast AS forecast",
                self.table
            ),
            init_time_column: "wn_graph.init_time",
            polygon_column: "wn_graph.geography_polygon",
        };
        render(self.model(), GRAPH_CATALOG, layout, request)
    }
}
