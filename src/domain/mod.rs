// Domain layer: records, coordinate types and the observer port.

pub mod model;
pub mod ports;
