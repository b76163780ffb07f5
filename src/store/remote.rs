//! HTTP client for the server's `/v1/store` API.
//!
//! This is the store the admin dashboard talks to. Disabling the network
//! makes every call fail fast as unavailable without touching the socket.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::sync::RwLock;
use url::Url;

use super::{BatchOp, Collection, Document, DocumentStore, Fields};
use crate::api::types::{AddDocumentResponse, BatchRequest, LoginRequest, LoginResponse};
use crate::auth::{Session, SessionAuthority};
use crate::error::{ErrorResponse, FolioError, FolioResult};

pub struct RemoteDocumentStore {
    http: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
    online: AtomicBool,
}

impl RemoteDocumentStore {
    pub fn new(base_url: &str, timeout: Duration) -> FolioResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| FolioError::Config(format!("Invalid store URL {}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(FolioError::Config(format!(
                "Store URL {} cannot carry a path",
                base_url
            )));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FolioError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: parsed,
            token: RwLock::new(None),
            online: AtomicBool::new(true),
        })
    }

    /// Use the token of an existing session for later calls.
    pub async fn attach_session(&self, session: &Session) {
        *self.token.write().await = session.token().map(String::from);
    }

    /// Sign in against the server and keep the token for later calls.
    pub async fn login(&self, email: &str, password: &str) -> FolioResult<Session> {
        self.ensure_online()?;
        let response = self
            .http
            .post(self.endpoint(&["v1", "auth", "login"])?)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let body: LoginResponse = check(response).await?.json().await?;

        *self.token.write().await = Some(body.token.clone());
        tracing::info!(email = %body.user.email, "Signed in to store");
        Ok(Session::authenticated(body.token, body.user))
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> FolioResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FolioError::Config(format!("Store URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn collection_url(&self, collection: Collection) -> FolioResult<Url> {
        self.endpoint(&["v1", "store", collection.as_str()])
    }

    fn document_url(&self, collection: Collection, id: &str) -> FolioResult<Url> {
        self.endpoint(&["v1", "store", collection.as_str(), id])
    }

    fn ensure_online(&self) -> FolioResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(FolioError::Unavailable("client is offline".to_string()))
        }
    }

    async fn send(&self, request: RequestBuilder) -> FolioResult<Response> {
        self.ensure_online()?;
        let request = match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        check(request.send().await?).await
    }
}

/// Turn a non-success response into the matching error.
async fn check(response: Response) -> FolioResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());

    Err(match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            FolioError::BadRequest(message)
        }
        StatusCode::UNAUTHORIZED => FolioError::Unauthorized(message),
        StatusCode::FORBIDDEN => FolioError::PermissionDenied(message),
        StatusCode::NOT_FOUND => FolioError::NotFound(message),
        StatusCode::CONFLICT => FolioError::Conflict(message),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            FolioError::Unavailable(message)
        }
        _ => FolioError::Internal(format!("{}: {}", status, message)),
    })
}

#[async_trait]
impl DocumentStore for RemoteDocumentStore {
    async fn get_all(&self, collection: Collection) -> FolioResult<Vec<Document>> {
        let response = self.send(self.http.get(self.collection_url(collection)?)).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, collection: Collection, id: &str) -> FolioResult<Option<Document>> {
        match self.send(self.http.get(self.document_url(collection, id)?)).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(FolioError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn add(&self, collection: Collection, fields: Fields) -> FolioResult<String> {
        let response = self
            .send(self.http.post(self.collection_url(collection)?).json(&fields))
            .await?;
        let body: AddDocumentResponse = response.json().await?;
        Ok(body.id)
    }

    async fn set(&self, collection: Collection, id: &str, fields: Fields) -> FolioResult<()> {
        self.send(self.http.put(self.document_url(collection, id)?).json(&fields))
            .await?;
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> FolioResult<()> {
        self.send(self.http.patch(self.document_url(collection, id)?).json(&fields))
            .await?;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> FolioResult<()> {
        self.send(self.http.delete(self.document_url(collection, id)?))
            .await?;
        Ok(())
    }

    async fn commit_batch(&self, ops: Vec<BatchOp>) -> FolioResult<()> {
        self.send(
            self.http
                .post(self.endpoint(&["v1", "store", "batch"])?)
                .json(&BatchRequest { ops }),
        )
        .await?;
        Ok(())
    }

    async fn enable_network(&self) -> FolioResult<()> {
        self.online.store(true, Ordering::SeqCst);
        tracing::info!(base_url = %self.base_url, "Store network enabled");
        Ok(())
    }

    async fn disable_network(&self) -> FolioResult<()> {
        self.online.store(false, Ordering::SeqCst);
        tracing::info!(base_url = %self.base_url, "Store network disabled");
        Ok(())
    }

    async fn ping(&self) -> FolioResult<()> {
        self.send(self.http.get(self.endpoint(&["v1", "health"])?)).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionAuthority for RemoteDocumentStore {
    async fn sign_out(&self, session: &Session) -> FolioResult<()> {
        self.attach_session(session).await;
        self.send(self.http.post(self.endpoint(&["v1", "auth", "logout"])?)).await?;
        *self.token.write().await = None;
        Ok(())
    }
}
