// api_routes.rs
use crate::config::Config;
use crate::error::ProxyError;
use crate::method_guard::PostOnly;
use crate::upstream::GenerativeClient;

use actix_web::{web, HttpResponse};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_SIDE: u32 = 1024;

#[derive(Deserialize, Debug, Default)]
struct RefineRequest {
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct GenerateImageRequest {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

// Set API Routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        error!("Rejected request body: {}", err);
        ProxyError::InvalidInput(err.to_string()).into()
    });

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .service(
                web::resource("/refine-prompt")
                    .wrap(PostOnly)
                    .route(web::post().to(refine_prompt_route)),
            )
            .service(
                web::resource("/generate-image")
                    .wrap(PostOnly)
                    .route(web::post().to(generate_image_route)),
            ),
    );
}

fn required_prompt(prompt: Option<String>) -> Result<String, ProxyError> {
    prompt
        .filter(|prompt| !prompt.is_empty())
        .ok_or_else(|| ProxyError::InvalidInput("Missing prompt".to_string()))
}

fn api_key(config: &Config) -> Result<&str, ProxyError> {
    config
        .google_api_key
        .as_deref()
        .ok_or(ProxyError::MissingCredential)
}

async fn refine_prompt_route(
    req: web::Json<RefineRequest>,
    upstream: web::Data<GenerativeClient>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ProxyError> {
    let prompt = required_prompt(req.into_inner().prompt)?;
    let key = api_key(&config)?;

    let refined = upstream
        .refine_prompt(key, &prompt)
        .await
        .inspect_err(|e| error!("Refine prompt failed: {}", e))?;

    info!("Refine prompt succeeded");
    Ok(HttpResponse::Ok().json(json!({ "refined": refined })))
}

async fn generate_image_route(
    req: web::Json<GenerateImageRequest>,
    upstream: web::Data<GenerativeClient>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ProxyError> {
    let GenerateImageRequest { prompt, width, height } = req.into_inner();
    let prompt = required_prompt(prompt)?;
    let key = api_key(&config)?;
    let width = width.unwrap_or(DEFAULT_SIDE);
    let height = height.unwrap_or(DEFAULT_SIDE);

    let base64 = upstream
        .generate_image(key, &prompt, width, height)
        .await
        .inspect_err(|e| error!("Generate image failed: {}", e))?;

    info!("Generate image succeeded ({}x{})", width, height);
    Ok(HttpResponse::Ok().json(json!({ "base64": base64 })))
}
