//! NOAA GFS 0.25 degree forecasts from the BigQuery public dataset.

use forecast_common::{ForecastModel, Statement};

use crate::builder::{render, QueryBuilder, QueryError, QueryRequest, SourceLayout, TableId};
use crate::catalog::{CatalogEntry, VariableCatalog};

pub const GFS_PROJECT: &str = "bigquery-public-data";
pub const GFS_DATASET: &str = "noaa_global_forecast_system";
pub const GFS_TABLE: &str = "NOAA_GFS0P25";

static GFS_VARIABLES: &[CatalogEntry] = &[
    CatalogEntry::new("forecast_time", "f.time"),
    CatalogEntry::new("hours", "f.hours"),
    CatalogEntry::new("temperature_2m_above_ground", "f.temperature_2m_above_ground"),
    CatalogEntry::new(
        "specific_humidity_2m_above_ground",
        "f.specific_humidity_2m_above_ground",
    ),
    CatalogEntry::new(
        "relative_humidity_2m_above_ground",
        "f.relative_humidity_2m_above_ground",
    ),
    CatalogEntry::new(
        "u_component_of_wind_10m_above_ground",
        "f.u_component_of_wind_10m_above_ground",
    ),
    CatalogEntry::new(
        "v_component_of_wind_10m_above_ground",
        "f.v_component_of_wind_10m_above_ground",
    ),
    CatalogEntry::new("total_precipitation_surface", "f.total_precipitation_surface"),
    CatalogEntry::new(
        "precipitable_water_entire_atmosphere",
        "f.precipitable_water_entire_atmosphere",
    ),
    CatalogEntry::new(
        "total_cloud_cover_entire_atmosphere",
        "f.total_cloud_cover_entire_atmosphere",
    ),
    CatalogEntry::new(
        "downward_shortwave_radiation_flux",
        "f.downward_shortwave_radiation_flux",
    ),
];

/// GFS variables, one row per forecast hour.
pub const GFS_CATALOG: VariableCatalog = VariableCatalog::new(GFS_VARIABLES);

/// Query builder for the public GFS table.
///
/// Rows hold a `forecast` array that is unnested once; the run date lives in
/// `creation_time`.
#[derive(Debug, Clone)]
pub struct GfsQueryBuilder {
    table: TableId,
}

impl GfsQueryBuilder {
    pub fn new() -> Self {
        Self {
            table: TableId::from_static(GFS_PROJECT, GFS_DATASET, GFS_TABLE),
        }
    }

    /// Read from a copy of the public table.
    pub fn with_table(table: TableId) -> Self {
        Self { table }
    }
}

impl Default for GfsQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder for GfsQueryBuilder {
    fn model(&self) -> ForecastModel {
        ForecastModel::Gfs
    }

    fn catalog(&self) -> VariableCatalog {
        GFS_CATALOG
    }

    fn table(&self) -> &TableId {
        &self.table
    }

    fn build(&self, request: &QueryRequest) -> Result<Statement, QueryError> {
        let layout = SourceLayout {
            from: format!("FROM `{}`,\n     UNNEST(forecast) AS f", self.table),
            init_time_column: "creation_time",
            polygon_column: "geography_polygon",
        };
        render(self.model(), GFS_CATALOG, layout, request)
    }
}
