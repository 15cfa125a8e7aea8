use crate::config::{FieldConfig, ServerConfig};
use crate::utils::error::{TransformError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

static ENV_VAR_PATTERN: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerConfig>,
    pub fields: Option<FieldConfig>,
}

impl TomlConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TransformError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses the configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` references (e.g. `${ZONE_DEFAULT}`) with the
    /// environment value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        let re = ENV_VAR_PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        result.into_owned()
    }
}
