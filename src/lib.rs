pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::http::{create_router, AppState};
pub use config::{cli::CliConfig, FieldConfig, ServerConfig, ServiceConfig};
pub use crate::core::{transform::UtmTransformer, utm::utm_to_lat_long};
pub use domain::ports::{NoopObserver, TracingObserver};
pub use utils::error::{Result, TransformError};
