//! Lenient credential extraction
//!
//! Login bodies may be urlencoded forms or JSON. Missing or unparsable fields
//! become empty strings so the attempt is still recorded.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use serde::Deserialize;
use std::convert::Infallible;

/// Raw login fields as submitted
#[derive(Debug, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Username and password, never rejected
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl From<LoginInput> for Credentials {
    fn from(input: LoginInput) -> Self {
        Self {
            username: input.username.unwrap_or_default(),
            password: input.password.unwrap_or_default(),
        }
    }
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let parsed = if is_json(&req) {
            Json::<LoginInput>::from_request(req, state)
                .await
                .map(|Json(input)| input)
                .map_err(|e| e.body_text())
        } else {
            Form::<LoginInput>::from_request(req, state)
                .await
                .map(|Form(input)| input)
                .map_err(|e| e.body_text())
        };

        match parsed {
            Ok(input) => Ok(input.into()),
            Err(reason) => {
                tracing::warn!("unreadable login body, recording empty credentials: {}", reason);
                Ok(Self::default())
            }
        }
    }
}
