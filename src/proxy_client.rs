// proxy_client.rs
use crate::error::StudioError;
use crate::studio::PosterApi;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct RefineBody<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct RefineReply {
    refined: Option<String>,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    prompt: &'a str,
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct GenerateReply {
    base64: Option<String>,
}

/// Talks to the poster proxy routes over HTTP.
#[derive(Clone, Debug)]
pub struct HttpPosterApi {
    http: Client,
    base_url: String,
}

impl HttpPosterApi {
    pub fn new(http: Client, base_url: &str) -> Self {
        HttpPosterApi {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<B, R>(&self, route: &str, body: &B) -> Result<R, StudioError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/api/{}", self.base_url, route);
        debug!("POST {}", url);
        let response = self.http.post(&url).json(body).send().await?;
        read_reply(response).await
    }
}

async fn read_reply<R: DeserializeOwned>(response: Response) -> Result<R, StudioError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(StudioError::Api {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| StudioError::Malformed(e.to_string()))
}

#[async_trait]
impl PosterApi for HttpPosterApi {
    async fn refine_prompt(&self, prompt: &str) -> Result<String, StudioError> {
        let reply: RefineReply = self.post("refine-prompt", &RefineBody { prompt }).await?;
        reply
            .refined
            .ok_or_else(|| StudioError::Malformed("No refinement returned".to_string()))
    }

    async fn generate_image(&self, prompt: &str, width: u32, height: u32) -> Result<String, StudioError> {
        let reply: GenerateReply = self
            .post("generate-image", &GenerateBody { prompt, width, height })
            .await?;
        reply
            .base64
            .ok_or_else(|| StudioError::Malformed("No image returned".to_string()))
    }
}
