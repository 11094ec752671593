// main.rs
use posterstudio::api_routes;
use posterstudio::config::Config;
use posterstudio::interactive_mode::run_interactive_mode;
use posterstudio::proxy_client::HttpPosterApi;
use posterstudio::studio::Studio;
use posterstudio::theme::FilePreferenceStore;
use posterstudio::upstream::GenerativeClient;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use log::{debug, error, info, warn};
use reqwest::Client;
use std::fs;
use std::path::Path;

fn init_logging(config_path: &Path) -> std::io::Result<()> {
    if config_path.exists() {
        // Create logs directory if it doesn't exist
        fs::create_dir_all("logs")?;
        log4rs::init_file(config_path, Default::default())
            .map_err(std::io::Error::other)?;
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        debug!("{} not found, logging through env_logger", config_path.display());
    }
    Ok(())
}

fn spawn_console(client: Client, config: &Config) {
    let api = HttpPosterApi::new(client, &config.studio_url);
    let store = FilePreferenceStore::new(&config.theme_file);

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("Could not start console runtime: {}", e);
                return;
            }
        };
        rt.block_on(async {
            if let Err(e) = run_interactive_mode(Studio::new(api, store)).await {
                error!("Error in interactive mode: {}", e);
            }
        });
    });
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_logging(&config.log_config)
        .with_context(|| format!("Failed to initialise logging from {}", config.log_config.display()))?;

    info!("Starting poster studio on {}", config.bind_addr);
    if config.google_api_key.is_none() {
        warn!("GOOGLE_API_KEY not set; proxy calls will fail until it is configured");
    }

    let client = Client::new();
    let upstream = web::Data::new(GenerativeClient::new(client.clone(), &config));
    let shared_config = web::Data::new(config.clone());

    if config.console {
        spawn_console(client, &config);
    }

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(upstream.clone())
            .app_data(shared_config.clone())
            .configure(api_routes::configure)
    })
    .bind(config.bind_addr.as_str())
    .with_context(|| format!("Failed to bind {}", config.bind_addr))?
    .run()
    .await?;

    Ok(())
}
