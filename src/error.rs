// error.rs
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Failures of the two proxy routes. Every variant ends up as an HTTP response.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Missing GOOGLE_API_KEY")]
    MissingCredential,

    #[error("upstream returned {status}: {body}")]
    Upstream {
        status: u16,
        content_type: Option<String>,
        body: String,
    },

    #[error("{0}")]
    EmptyResponse(&'static str),

    #[error("{0}")]
    Malformed(String),

    #[error(transparent)]
    Transport(reqwest::Error),
}

// Upstream URLs carry the API key, so they are stripped before the error is rendered or logged.
impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        ProxyError::Transport(e.without_url())
    }
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::MissingCredential
            | ProxyError::EmptyResponse(_)
            | ProxyError::Malformed(_)
            | ProxyError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // Upstream failures go back to the caller untouched.
            ProxyError::Upstream {
                content_type, body, ..
            } => {
                let mut response = HttpResponse::build(self.status_code());
                match content_type {
                    Some(content_type) => response.insert_header(("Content-Type", content_type.as_str())),
                    None => response.insert_header(ContentType::plaintext()),
                };
                response.body(body.clone())
            }
            _ => HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() })),
        }
    }
}

/// Failures of a gallery client action. Rendered as a notification, never raised further.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("{}", api_message(.body))]
    Api { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Malformed(String),

    #[error("A poster is already being generated")]
    Busy,

    #[error("Please upload a product image first")]
    MissingProductImage,
}

fn api_message(body: &str) -> &str {
    if body.trim().is_empty() {
        "Generation failed"
    } else {
        body
    }
}
