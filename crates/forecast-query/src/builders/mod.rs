//! Query builders for each supported forecast model.

pub mod generative;
pub mod gfs;
pub mod graph;

pub use generative::{GenQueryBuilder, GEN_CATALOG};
pub use gfs::{GfsQueryBuilder, GFS_CATALOG};
pub use graph::{GraphQueryBuilder, GRAPH_CATALOG};
