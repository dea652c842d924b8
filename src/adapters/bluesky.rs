//! Bluesky (AT Protocol) client and the [`Publisher`] built on top of it.
//!
//! Only the three XRPC procedures needed to post one image are implemented:
//! `com.atproto.server.createSession`, `com.atproto.repo.uploadBlob` and
//! `com.atproto.repo.createRecord`.

use crate::core::caption::post_text;
use crate::domain::model::PostReceipt;
use crate::domain::ports::Publisher;
use crate::utils::error::{BotError, Result};
use crate::utils::validation::validate_non_empty_string;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_SERVICE: &str = "https://bsky.social";
const POST_COLLECTION: &str = "app.bsky.feed.post";

/// Authenticated session returned by `createSession`.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_jwt: String,
    pub refresh_jwt: String,
    pub handle: String,
    pub did: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("handle", &self.handle)
            .field("did", &self.did)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    /// Both halves present; an incomplete pair never reaches the server.
    pub fn is_complete(&self) -> bool {
        validate_non_empty_string("BLUESKY_USERNAME", &self.identifier).is_ok()
            && validate_non_empty_string("BLUESKY_PASSWORD", &self.password).is_ok()
    }
}

#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct UploadBlobResponse {
    blob: Value,
}

#[derive(Deserialize)]
struct XrpcError {
    error: Option<String>,
    message: Option<String>,
}

/// Stateless XRPC calls against one PDS.
#[derive(Debug, Clone)]
pub struct BlueskyClient {
    client: Client,
    service: String,
}

impl BlueskyClient {
    pub fn new(service: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            service: service.trim_end_matches('/').to_string(),
        })
    }

    fn xrpc_url(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.service, method)
    }

    pub async fn create_session(&self, credentials: &Credentials) -> Result<Session> {
        if !credentials.is_complete() {
            return Err(BotError::AuthenticationError {
                message: "BLUESKY_USERNAME and BLUESKY_PASSWORD must both be set".to_string(),
            });
        }

        tracing::debug!("Creating session for {}", credentials.identifier);
        let response = self
            .client
            .post(self.xrpc_url("com.atproto.server.createSession"))
            .json(&CreateSessionRequest {
                identifier: &credentials.identifier,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(|e| BotError::AuthenticationError {
                message: e.to_string(),
            })?;

        match check_status(response).await {
            Ok(response) => Ok(response.json::<Session>().await?),
            Err(BotError::PublishError { status, message }) => Err(BotError::AuthenticationError {
                message: format!("HTTP {}: {}", status, message),
            }),
            Err(e) => Err(e),
        }
    }

    pub async fn upload_blob(&self, session: &Session, data: &[u8], mime: &str) -> Result<Value> {
        tracing::debug!("Uploading {} bytes ({})", data.len(), mime);
        let response = self
            .client
            .post(self.xrpc_url("com.atproto.repo.uploadBlob"))
            .bearer_auth(&session.access_jwt)
            .header(reqwest::header::CONTENT_TYPE, mime)
            .body(data.to_vec())
            .send()
            .await?;

        let uploaded: UploadBlobResponse = check_status(response).await?.json().await?;
        Ok(uploaded.blob)
    }

    pub async fn create_post(
        &self,
        session: &Session,
        text: &str,
        alt: &str,
        blob: Value,
        created_at: &str,
    ) -> Result<PostReceipt> {
        let body = json!({
            "repo": session.did,
            "collection": POST_COLLECTION,
            "record": {
                "$type": POST_COLLECTION,
                "text": text,
                "createdAt": created_at,
                "embed": {
                    "$type": "app.bsky.embed.images",
                    "images": [{ "alt": alt, "image": blob }],
                },
            },
        });

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.repo.createRecord"))
            .bearer_auth(&session.access_jwt)
            .json(&body)
            .send()
            .await?;

        Ok(check_status(response).await?.json::<PostReceipt>().await?)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<XrpcError>(&body);
    let message = match parsed {
        Ok(XrpcError {
            error: Some(error),
            message: Some(message),
        }) => format!("{}: {}", error, message),
        Ok(XrpcError {
            error: Some(error), ..
        }) => error,
        _ if body.is_empty() => status.canonical_reason().unwrap_or("unknown").to_string(),
        _ => body,
    };

    Err(BotError::PublishError {
        status: status.as_u16(),
        message,
    })
}

fn is_session_rejected(err: &BotError) -> bool {
    match err {
        BotError::PublishError { status, message } => {
            *status == StatusCode::UNAUTHORIZED.as_u16()
                || message.starts_with("ExpiredToken")
                || message.starts_with("InvalidToken")
        }
        _ => false,
    }
}

/// [`Publisher`] holding the session capability for one account.
///
/// A failed login leaves the publisher unauthenticated; each later `publish` makes one
/// fresh login attempt and fails on its own if that does not succeed.
pub struct BlueskyPublisher {
    client: BlueskyClient,
    credentials: Credentials,
    session: Mutex<Option<Session>>,
}

impl BlueskyPublisher {
    pub async fn connect(client: BlueskyClient, credentials: Credentials) -> Self {
        let session = match client.create_session(&credentials).await {
            Ok(session) => {
                tracing::info!("Authenticated as {} ({})", session.handle, session.did);
                Some(session)
            }
            Err(e) => {
                tracing::error!("Authentication error: {}", e);
                tracing::warn!("Continuing unauthenticated; {}", e.recovery_suggestion());
                None
            }
        };

        Self {
            client,
            credentials,
            session: Mutex::new(session),
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_some()
    }

    async fn current_session(&self) -> Result<Session> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }

        tracing::info!("No active session, signing in again");
        let session = self.client.create_session(&self.credentials).await?;
        tracing::info!("Authenticated as {} ({})", session.handle, session.did);
        *guard = Some(session.clone());
        Ok(session)
    }

    async fn post_with(&self, session: &Session, image: &[u8], mime: &str, caption: &str) -> Result<PostReceipt> {
        let blob = self.client.upload_blob(session, image, mime).await?;
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.client
            .create_post(session, &post_text(caption), caption, blob, &created_at)
            .await
    }
}

#[async_trait]
impl Publisher for BlueskyPublisher {
    async fn publish(&self, image: &[u8], mime: &str, caption: &str) -> Result<PostReceipt> {
        let session = self.current_session().await?;

        let result = self.post_with(&session, image, mime, caption).await;
        if let Err(e) = &result {
            if is_session_rejected(e) {
                tracing::warn!("Session rejected by the server, it will be renewed next run");
                *self.session.lock().await = None;
            }
        }
        result
    }
}
