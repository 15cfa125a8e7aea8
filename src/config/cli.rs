use crate::config::toml_config::TomlConfig;
use crate::config::{FieldConfig, ServerConfig, ServiceConfig};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "utm-latlong")]
#[command(about = "Annotates streamed JSON records with latitude/longitude converted from UTM")]
pub struct CliConfig {
    /// Bind address. Read from BIND_HOST, since shells such as zsh export
    /// HOST as the machine's hostname.
    #[arg(long, env = "BIND_HOST", default_value = crate::config::DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "BIND_PORT", default_value_t = crate::config::DEFAULT_PORT)]
    pub port: u16,

    /// TOML file with [server] and/or [fields] sections
    #[arg(long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub fields: FieldConfig,
}

impl CliConfig {
    /// Resolves the effective configuration. Sections present in the TOML
    /// file replace the corresponding flag/environment values.
    pub fn resolve(&self) -> Result<ServiceConfig> {
        let mut config = ServiceConfig {
            server: ServerConfig {
                host: self.host.clone(),
                port: self.port,
            },
            fields: self.fields.clone(),
        };

        if let Some(path) = &self.config {
            tracing::info!("Loading configuration file {}", path.display());
            let file = TomlConfig::from_file(path)?;
            if let Some(server) = file.server {
                config.server = server;
            }
            if let Some(fields) = file.fields {
                config.fields = fields;
            }
        }

        Ok(config)
    }
}
