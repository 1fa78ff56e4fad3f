//! Lookup of the query builder serving each model.

use forecast_common::{ForecastModel, UnknownModel};

use crate::builder::{QueryBuilder, QueryError};
use crate::builders::{GenQueryBuilder, GfsQueryBuilder, GraphQueryBuilder};

/// Query builders keyed by model, in registration order.
#[derive(Default)]
pub struct ModelRegistry {
    builders: Vec<Box<dyn QueryBuilder>>,
}

impl ModelRegistry {
    /// Registry with the standard builders, reading the WeatherNext tables
    /// shared into `project_id`.
    pub fn new(project_id: &str) -> Result<Self, QueryError> {
        Ok(Self::default()
            .register(GraphQueryBuilder::new(project_id)?)
            .register(GenQueryBuilder::new(project_id)?)
            .register(GfsQueryBuilder::new()))
    }

    /// Add a builder, replacing any builder already serving the same model.
    pub fn register(mut self, builder: impl QueryBuilder + 'static) -> Self {
        let model = builder.model();
        match self.builders.iter().position(|b| b.model() == model) {
            Some(idx) => self.builders[idx] = Box::new(builder),
            None => self.builders.push(Box::new(builder)),
        }
        self
    }

    pub fn get(&self, model: ForecastModel) -> Option<&dyn QueryBuilder> {
        self.builders
            .iter()
            .find(|b| b.model() == model)
            .map(|b| b.as_ref())
    }

    /// Resolve a model name as given by a client.
    pub fn resolve(&self, name: &str) -> Result<&dyn QueryBuilder, UnknownModel> {
        name.parse::<ForecastModel>()
            .ok()
            .and_then(|model| self.get(model))
            .ok_or_else(|| UnknownModel(name.to_string()))
    }

    /// Registered models, in registration order.
    pub fn models(&self) -> Vec<ForecastModel> {
        self.builders.iter().map(|b| b.model()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn QueryBuilder> {
        self.builders.iter().map(|b| b.as_ref())
    }
}
