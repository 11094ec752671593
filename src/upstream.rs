// upstream.rs
use crate::config::Config;
use crate::error::ProxyError;
use crate::prompt::refine_instruction;

use log::{debug, error, info};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateImageRequest {
    prompt: TextPrompt,
    image_generation_params: ImageGenerationParams,
}

#[derive(Serialize, Debug)]
struct TextPrompt {
    text: String,
}

#[derive(Serialize, Debug)]
struct ImageGenerationParams {
    width: u32,
    height: u32,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateImageResponse {
    #[serde(default)]
    image_artifacts: Vec<ImageArtifact>,
}

#[derive(Deserialize, Debug)]
struct ImageArtifact {
    #[serde(default)]
    base64: Option<String>,
}

/// Thin client for the generative-language API. Stateless: no retries, no caching.
#[derive(Clone, Debug)]
pub struct GenerativeClient {
    http: Client,
    api_base: String,
    refine_model: String,
}

impl GenerativeClient {
    pub fn new(http: Client, config: &Config) -> Self {
        GenerativeClient {
            http,
            api_base: config.api_base.clone(),
            refine_model: config.refine_model.clone(),
        }
    }

    pub async fn refine_prompt(&self, api_key: &str, prompt: &str) -> Result<String, ProxyError> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.refine_model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(refine_instruction(prompt)),
                }],
            }],
        };
        debug!("Sending refine request to {}", url);

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        let parsed: GenerateContentResponse = read_success(response).await?;
        let refined = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or(ProxyError::EmptyResponse("No refinement returned"))?;

        info!("Refined prompt ({} chars)", refined.len());
        Ok(refined)
    }

    /// Returns the base64 payload of the first image artifact. Any further artifacts are ignored.
    pub async fn generate_image(
        &self,
        api_key: &str,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<String, ProxyError> {
        let url = format!("{}/images:generate", self.api_base);
        let request = GenerateImageRequest {
            prompt: TextPrompt {
                text: prompt.to_string(),
            },
            image_generation_params: ImageGenerationParams { width, height },
        };
        debug!("Sending generate image request: {}x{}", width, height);

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        let parsed: GenerateImageResponse = read_success(response).await?;
        let base64 = parsed
            .image_artifacts
            .into_iter()
            .next()
            .and_then(|artifact| artifact.base64)
            .filter(|payload| !payload.is_empty())
            .ok_or(ProxyError::EmptyResponse("No image returned"))?;

        info!("Image generated ({} base64 bytes)", base64.len());
        Ok(base64)
    }
}

async fn read_success<T: DeserializeOwned>(response: Response) -> Result<T, ProxyError> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    let body = response.text().await?;

    if !status.is_success() {
        error!("Upstream error {}: {}", status, body);
        return Err(ProxyError::Upstream {
            status: status.as_u16(),
            content_type,
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| ProxyError::Malformed(e.to_string()))
}
