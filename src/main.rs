use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use sublinks::models::AppState;
use sublinks::registry::SubscriptionRegistry;
use sublinks::web_handlers;
use sublinks::Settings;

/// Merge proxy node subscriptions and serve them in the requesting client's format
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (TOML or YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address (e.g., 127.0.0.1 or 0.0.0.0)
    #[arg(short, long, value_name = "ADDRESS")]
    address: Option<String>,

    /// Listen port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();

    let mut settings =
        Settings::load(args.config.as_deref()).context("failed to load settings")?;
    if let Some(address) = args.address {
        settings.listen_address = address;
    }
    if let Some(port) = args.port {
        settings.listen_port = port;
    }

    let listen_on = settings.listen_on();
    let reload_interval = settings.reload_interval();

    let app_state = Arc::new(AppState::new(settings).context("failed to initialise")?);
    SubscriptionRegistry::spawn_reload(Arc::clone(&app_state.registry), reload_interval);

    info!("sublinks starting on {}:{}", listen_on.0, listen_on.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(Arc::clone(&app_state)))
            .configure(web_handlers::config)
    })
    .bind(listen_on)?
    .run()
    .await?;

    Ok(())
}
