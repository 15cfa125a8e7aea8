use clap::Parser;
use std::sync::Arc;
use utm_latlong::adapters::http;
use utm_latlong::utils::{logger, validation::Validate};
use utm_latlong::{AppState, CliConfig, ServiceConfig, TracingObserver, UtmTransformer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose, cli.log_format);

    tracing::info!("Starting utm-latlong service");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            tracing::error!("Suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let fields = &config.fields;
    tracing::info!(
        "Reading {}/{} (zone {} default {}, hemisphere {} default {:?}), writing {}/{}{}",
        fields.easting,
        fields.northing,
        fields.zone,
        fields.zone_default,
        fields.hemisphere,
        fields.hemisphere_default,
        fields.latitude,
        fields.longitude,
        if fields.include_lat_long {
            format!(" and {}", fields.lat_long)
        } else {
            String::new()
        }
    );

    let transformer =
        UtmTransformer::with_observer(Arc::new(config.fields.clone()), Arc::new(TracingObserver));

    http::serve(&config.server, AppState::new(transformer)).await?;

    Ok(())
}

fn resolve_config(cli: &CliConfig) -> utm_latlong::Result<ServiceConfig> {
    let config = cli.resolve()?;
    config.validate()?;
    Ok(config)
}
