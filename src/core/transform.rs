use crate::config::FieldConfig;
use crate::core::resolver::{resolve, Resolution};
use crate::core::utm::utm_to_lat_long;
use crate::domain::model::Record;
use crate::domain::ports::{NoopObserver, TransformObserver};
use crate::utils::error::Result;
use serde_json::Value;
use std::sync::Arc;

/// Per-record transform: resolve the UTM inputs, convert, annotate.
/// Holds only read-only state, so one instance serves every request.
#[derive(Clone)]
pub struct UtmTransformer {
    config: Arc<FieldConfig>,
    observer: Arc<dyn TransformObserver>,
}

impl UtmTransformer {
    pub fn new(config: Arc<FieldConfig>) -> Self {
        Self::with_observer(config, Arc::new(NoopObserver))
    }

    pub fn with_observer(config: Arc<FieldConfig>, observer: Arc<dyn TransformObserver>) -> Self {
        Self { config, observer }
    }

    /// Returns the record annotated with latitude/longitude, or unchanged
    /// when its coordinates are absent or ambiguous.
    pub fn transform(&self, mut record: Record) -> Result<Record> {
        let input = match resolve(&record, &self.config) {
            Ok(Resolution::Ready(input)) => input,
            Ok(Resolution::Skip(reason)) => {
                self.observer.on_skip(&reason);
                return Ok(record);
            }
            Err(e) => {
                self.observer.on_format_error(&e);
                return Err(e);
            }
        };

        let result = utm_to_lat_long(&input);
        self.observer.on_converted(&input, &result);

        record.insert(self.config.latitude.clone(), Value::from(result.latitude));
        record.insert(self.config.longitude.clone(), Value::from(result.longitude));
        if self.config.include_lat_long {
            record.insert(
                self.config.lat_long.clone(),
                Value::String(result.combined_text()),
            );
        }

        Ok(record)
    }
}

impl std::fmt::Debug for UtmTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UtmTransformer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
