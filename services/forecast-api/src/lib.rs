//! Forecast API Service Library
//!
//! HTTP server translating location/date/model requests into warehouse
//! queries and returning the forecast rows as JSON.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
