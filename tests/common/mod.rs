#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kaburlu_admin::api::{ApiClient, ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
use kaburlu_admin::error::{AdminError, AdminResult};
use kaburlu_admin::session::AuthSession;
use serde_json::{json, Value};
use tokio::sync::oneshot;

enum Reply {
    Ready(ApiResponse),
    Held(oneshot::Receiver<ApiResponse>),
}

struct Route {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    reply: Reply,
}

impl Route {
    fn matches(&self, request: &ApiRequest) -> bool {
        self.method == request.method
            && self.path == request.path
            && self.query.iter().all(|(k, v)| request.query_value(k) == Some(v.as_str()))
    }
}

/// In-process transport answering from a script and recording every request.
///
/// Routes are consumed in registration order; an unscripted request gets a
/// 404. A held route answers only when the test releases it, so responses can
/// be delivered in any order.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn client(self: &Arc<Self>) -> ApiClient {
        ApiClient::new(self.clone())
    }

    pub fn reply(&self, method: Method, path: &str, response: ApiResponse) {
        self.reply_when(method, path, &[], response);
    }

    /// Reply only to requests carrying every `query` pair.
    pub fn reply_when(&self, method: Method, path: &str, query: &[(&str, &str)], response: ApiResponse) {
        self.push(method, path, query, Reply::Ready(response));
    }

    pub fn hold_when(&self, method: Method, path: &str, query: &[(&str, &str)]) -> oneshot::Sender<ApiResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, query, Reply::Held(rx));
        tx
    }

    fn push(&self, method: Method, path: &str, query: &[(&str, &str)], reply: Reply) {
        let query = query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self.routes
            .lock()
            .unwrap()
            .push(Route { method, path: path.to_string(), query, reply });
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> AdminResult<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = {
            let mut routes = self.routes.lock().unwrap();
            let index = routes.iter().position(|r| r.matches(&request));
            index.map(|i| routes.remove(i).reply)
        };
        match reply {
            Some(Reply::Ready(response)) => Ok(response),
            Some(Reply::Held(rx)) => rx
                .await
                .map_err(|_| AdminError::Network("held reply dropped".to_string())),
            None => Ok(ApiResponse::empty(404)),
        }
    }
}

/// Client against a wiremock server.
pub fn http_client(base_url: &str) -> ApiClient {
    let transport = ReqwestTransport::new(base_url, Duration::from_secs(5), "kab-tests").unwrap();
    ApiClient::new(Arc::new(transport))
}

pub fn admin_session() -> AuthSession {
    AuthSession::new(
        "test-token",
        json!({ "jwt": "test-token", "user": { "id": "U1", "role": "SUPER_ADMIN", "name": "Admin" } }),
    )
}

pub fn rows(names: &[&str]) -> Value {
    let rows: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "id": format!("R{}", i + 1), "name": name }))
        .collect();
    json!(rows)
}

pub fn names(rows: &[Value]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.get("name").and_then(Value::as_str).map(str::to_string))
        .collect()
}
