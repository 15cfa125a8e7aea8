use crate::domain::model::{CoordinateQuadruple, GeodeticResult, SkipReason};
use crate::utils::error::TransformError;

/// Receives structured events from the record transform. The transform never
/// depends on an observer being present; [`NoopObserver`] drops everything.
pub trait TransformObserver: Send + Sync {
    fn on_skip(&self, reason: &SkipReason);

    fn on_format_error(&self, error: &TransformError);

    fn on_converted(&self, _input: &CoordinateQuadruple, _result: &GeodeticResult) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TransformObserver for NoopObserver {
    fn on_skip(&self, _reason: &SkipReason) {}

    fn on_format_error(&self, _error: &TransformError) {}
}

/// Forwards transform events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TransformObserver for TracingObserver {
    fn on_skip(&self, reason: &SkipReason) {
        tracing::warn!(role = %reason.role(), "{}", reason);
    }

    fn on_format_error(&self, error: &TransformError) {
        tracing::error!("{}", error);
    }

    fn on_converted(&self, input: &CoordinateQuadruple, result: &GeodeticResult) {
        tracing::debug!(
            "Converting {} {}, {} {}...",
            input.easting,
            input.northing,
            input.zone,
            input.northern
        );
        tracing::debug!("Result: {} {}", result.latitude, result.longitude);
    }
}
