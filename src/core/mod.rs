pub mod json_stream;
pub mod resolver;
pub mod transform;
pub mod utm;

pub use crate::domain::model::{CoordinateQuadruple, GeodeticResult, Record};
pub use crate::domain::ports::TransformObserver;
pub use crate::utils::error::Result;
