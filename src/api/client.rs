use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::envelope::{normalize_list, unwrap_record, Page};
use super::transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
use crate::config::AppConfig;
use crate::error::{AdminError, AdminResult};
use crate::session::AuthSession;

/// Statuses that send a settings save from PATCH over to PUT
const PATCH_FALLBACK_STATUSES: [u16; 3] = [400, 404, 405];

/// Authenticated handle on the admin API.
///
/// Cloning is cheap; clones share the transport and carry their own copy of
/// the bearer token, which is replaced wholesale at login/logout.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport, token: None }
    }

    pub fn from_config(config: &AppConfig) -> AdminResult<Self> {
        Ok(Self::new(Arc::new(ReqwestTransport::from_config(config)?)))
    }

    pub fn with_session(mut self, session: &AuthSession) -> Self {
        self.token = Some(session.token.clone());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Send a request, attaching the bearer token when one is held.
    pub async fn send(&self, mut request: ApiRequest) -> AdminResult<ApiResponse> {
        if request.bearer.is_none() {
            request.bearer = self.token.clone();
        }
        let method = request.method;
        let path = request.path.clone();
        debug!("{} {}", method, path);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            warn!("{} {} -> {}", method, path, response.status);
        }
        Ok(response)
    }

    /// Read one page of a collection.
    ///
    /// A 404 means "nothing for this scope" and yields an empty page.
    pub async fn fetch_list(&self, request: ApiRequest) -> AdminResult<Page<Value>> {
        let page = request
            .query_value("page")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        let page_size = request
            .query_value("pageSize")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let response = self.send(request).await?;
        match response.status {
            404 => Ok(Page::empty(page, page_size)),
            s if (200..300).contains(&s) => Ok(normalize_list(response.body, page, page_size)),
            s => Err(AdminError::from_response("Request", s, response.body.as_ref())),
        }
    }

    /// Read a single record, `None` on 404.
    pub async fn fetch_record(&self, request: ApiRequest) -> AdminResult<Option<Value>> {
        let response = self.send(request).await?;
        match response.status {
            404 => Ok(None),
            s if (200..300).contains(&s) => Ok(response.body.map(unwrap_record)),
            s => Err(AdminError::from_response("Request", s, response.body.as_ref())),
        }
    }

    /// Issue a write. `action` names the operation in templated error messages.
    pub async fn mutate(
        &self,
        action: &str,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> AdminResult<Option<Value>> {
        let mut request = ApiRequest::new(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.send(request).await?;
        expect_success(action, response)
    }

    /// Persist a whole document, PATCH first and PUT when the server refuses it.
    pub async fn save_document(&self, path: &str, document: &Value) -> AdminResult<Option<Value>> {
        let patch = ApiRequest::new(Method::Patch, path).json(document.clone());
        let response = self.send(patch).await?;
        if PATCH_FALLBACK_STATUSES.contains(&response.status) {
            info!("PATCH {} answered {}, retrying with PUT", path, response.status);
            let put = ApiRequest::new(Method::Put, path).json(document.clone());
            let response = self.send(put).await?;
            return expect_success("Save", response);
        }
        expect_success("Save", response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

/// Body of a 2xx response, or the error derived from a failed one.
pub fn expect_success(action: &str, response: ApiResponse) -> AdminResult<Option<Value>> {
    if response.is_success() {
        Ok(response.body)
    } else {
        Err(AdminError::from_response(action, response.status, response.body.as_ref()))
    }
}
