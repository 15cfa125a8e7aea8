pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_distinct, validate_integer, validate_non_empty_string, validate_range, Validate,
};
use clap::Args;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;

/// Field names and defaults used by the record transform. Built once at
/// start-up and shared read-only between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Args)]
#[serde(default)]
pub struct FieldConfig {
    #[arg(long, env = "EASTING_PROPERTY", default_value = "easting")]
    pub easting: String,

    #[arg(long, env = "NORTHING_PROPERTY", default_value = "northing")]
    pub northing: String,

    #[arg(long, env = "ZONE_PROPERTY", default_value = "zone")]
    pub zone: String,

    /// Zone used when a record has no zone field
    #[arg(long, env = "ZONE_DEFAULT", default_value = "32")]
    pub zone_default: String,

    #[arg(long, env = "HEMI_PROPERTY", default_value = "hemi")]
    pub hemisphere: String,

    /// Hemisphere used when a record has no hemisphere field
    #[arg(long, env = "HEMI_DEFAULT", default_value = "0")]
    pub hemisphere_default: String,

    /// Hemisphere value that means "northern"; anything else is southern
    #[arg(long, env = "HEMI_NORTHERN_VALUE", default_value = "0")]
    pub northern_value: String,

    #[arg(long, env = "LATITUDE_PROPERTY", default_value = "lat")]
    pub latitude: String,

    #[arg(long, env = "LONGITUDE_PROPERTY", default_value = "long")]
    pub longitude: String,

    /// Also write a combined "lat, long" text field
    #[arg(
        long,
        env = "INCLUDE_LAT_LONG",
        default_value = "False",
        value_parser = parse_flag,
        action = clap::ArgAction::Set
    )]
    pub include_lat_long: bool,

    #[arg(long, env = "LAT_LONG_PROPERTY", default_value = "lat_long")]
    pub lat_long: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            easting: "easting".to_string(),
            northing: "northing".to_string(),
            zone: "zone".to_string(),
            zone_default: "32".to_string(),
            hemisphere: "hemi".to_string(),
            hemisphere_default: "0".to_string(),
            northern_value: "0".to_string(),
            latitude: "lat".to_string(),
            longitude: "long".to_string(),
            include_lat_long: false,
            lat_long: "lat_long".to_string(),
        }
    }
}

impl Validate for FieldConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("fields.easting", &self.easting)?;
        validate_non_empty_string("fields.northing", &self.northing)?;
        validate_non_empty_string("fields.zone", &self.zone)?;
        validate_non_empty_string("fields.hemisphere", &self.hemisphere)?;
        validate_non_empty_string("fields.latitude", &self.latitude)?;
        validate_non_empty_string("fields.longitude", &self.longitude)?;
        validate_integer("fields.zone_default", &self.zone_default)?;

        let mut outputs = vec![self.latitude.as_str(), self.longitude.as_str()];
        if self.include_lat_long {
            validate_non_empty_string("fields.lat_long", &self.lat_long)?;
            outputs.push(self.lat_long.as_str());
        }
        validate_distinct("fields (output)", &outputs)?;

        Ok(())
    }
}

/// `true` iff the trimmed text is "true", ignoring case.
pub fn parse_flag(value: &str) -> std::result::Result<bool, String> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.host)?;
        validate_range("server.port", self.port, 1, u16::MAX)?;
        Ok(())
    }
}

/// Fully resolved process configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub fields: FieldConfig,
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.fields.validate()?;
        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("True"), Ok(true));
        assert_eq!(parse_flag("  true \n"), Ok(true));
        assert_eq!(parse_flag("TRUE"), Ok(true));
        assert_eq!(parse_flag("False"), Ok(false));
        assert_eq!(parse_flag("yes"), Ok(false));
        assert_eq!(parse_flag(""), Ok(false));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_address(), "0.0.0.0:5001");
        assert_eq!(config.fields.northing, "northing");
    }

    #[test]
    fn test_rejects_non_integer_zone_default() {
        let fields = FieldConfig {
            zone_default: "thirty-two".to_string(),
            ..FieldConfig::default()
        };
        assert!(fields.validate().is_err());
    }

    #[test]
    fn test_rejects_clashing_output_fields() {
        let fields = FieldConfig {
            longitude: "lat".to_string(),
            ..FieldConfig::default()
        };
        assert!(fields.validate().is_err());

        // lat_long only matters once it is written
        let fields = FieldConfig {
            lat_long: "lat".to_string(),
            ..FieldConfig::default()
        };
        assert!(fields.validate().is_ok());
        let fields = FieldConfig {
            include_lat_long: true,
            ..fields
        };
        assert!(fields.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_field_name() {
        let fields = FieldConfig {
            easting: "  ".to_string(),
            ..FieldConfig::default()
        };
        assert!(fields.validate().is_err());
    }
}
