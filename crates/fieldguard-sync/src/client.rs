use std::time::Duration;

use chrono::{DateTime, Utc};
use fieldguard_core::SchemaDocument;
use fieldguard_validate::check_document;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::config::SyncConfig;
use crate::error::SyncError;

/// What the server made of a push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SyncOutcome {
    Accepted {
        status: u16,
    },
    Rejected {
        status: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        user_message: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        technical_message: Option<String>,
    },
    /// No response was received.
    Failed {
        reason: String,
    },
}

impl SyncOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SyncOutcome::Accepted { .. })
    }
}

/// Summary of one push.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub key: String,
    pub project_id: String,
    pub outcome: SyncOutcome,
    pub synced_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct PushRequest<'a> {
    schema_config: &'a SchemaDocument,
}

#[derive(Debug, Default, Deserialize)]
struct PushResponse {
    #[serde(default)]
    http_status: Option<u16>,
    #[serde(default)]
    error: Option<ResponseError>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseError {
    #[serde(default)]
    user_facing_message: Option<String>,
    #[serde(default)]
    technical_message: Option<String>,
}

/// Client for the project interfaces endpoint.
#[derive(Debug, Clone)]
pub struct SyncClient {
    http: reqwest::Client,
    config: SyncConfig,
}

impl SyncClient {
    pub fn new(config: SyncConfig) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = HeaderMap::new();
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {}", config.api_token))
                        .map_err(|_| SyncError::InvalidToken)?,
                );
                headers
            })
            .build()
            .map_err(SyncError::Client)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Check `document` and POST it to the project's interfaces endpoint.
    ///
    /// An inconsistent document is returned as an error and nothing is
    /// sent. Exactly one request is made otherwise.
    pub async fn push(&self, document: &SchemaDocument) -> Result<SyncReport, SyncError> {
        check_document(document)?;

        let url = self.config.interfaces_url();
        tracing::info!(
            event = "sync_started",
            key = %document.key,
            project_id = %self.config.project_id
        );

        let outcome = match self
            .http
            .post(&url)
            .json(&PushRequest {
                schema_config: document,
            })
            .send()
            .await
        {
            Ok(resp) => interpret(resp).await,
            Err(err) => SyncOutcome::Failed {
                reason: err.to_string(),
            },
        };

        match &outcome {
            SyncOutcome::Accepted { status } => {
                tracing::info!(event = "sync_accepted", key = %document.key, status);
            }
            SyncOutcome::Rejected {
                status,
                user_message,
                technical_message,
            } => {
                tracing::warn!(
                    event = "sync_rejected",
                    key = %document.key,
                    status,
                    user_message = user_message.as_deref().unwrap_or(""),
                    technical_message = technical_message.as_deref().unwrap_or("")
                );
            }
            SyncOutcome::Failed { reason } => {
                tracing::error!(event = "sync_failed", key = %document.key, reason = %reason);
            }
        }

        Ok(SyncReport {
            key: document.key.clone(),
            project_id: self.config.project_id.clone(),
            outcome,
            synced_at: Utc::now(),
        })
    }
}

async fn interpret(resp: reqwest::Response) -> SyncOutcome {
    let transport_status = resp.status().as_u16();
    let body: PushResponse = match resp.text().await {
        Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
        Err(err) => {
            return SyncOutcome::Failed {
                reason: err.to_string(),
            };
        }
    };
    let status = body.http_status.unwrap_or(transport_status);

    if transport_status < 400 {
        return SyncOutcome::Accepted { status };
    }
    let error = body.error.unwrap_or_default();
    SyncOutcome::Rejected {
        status,
        user_message: error.user_facing_message,
        technical_message: error.technical_message,
    }
}
