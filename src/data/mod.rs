pub mod manifold_api;
pub mod series;
pub mod types;
