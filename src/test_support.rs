// 测试辅助 - 进程内的 HTTP 应答服务（axum），按路径返回预设响应

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

/// 收到的请求
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// 路径加查询串，例如 `/v1/images:annotate?key=abc`
    pub target: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is json")
    }
}

#[derive(Clone)]
struct CannedResponse {
    status: u16,
    content_type: String,
    body: Vec<u8>,
}

#[derive(Clone, Default)]
struct Shared {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    routes: Arc<Mutex<HashMap<String, CannedResponse>>>,
}

pub struct MockServer {
    base_url: String,
    shared: Shared,
}

impl MockServer {
    pub async fn start() -> Self {
        let shared = Shared::default();
        // 路径里可能有 `:`（如 images:annotate），统一走 fallback 按原始路径匹配
        let app = Router::new().fallback(handle).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            shared,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn respond(&self, path: &str, status: u16, content_type: &str, body: impl Into<Vec<u8>>) {
        self.shared.routes.lock().unwrap().insert(
            path.to_string(),
            CannedResponse {
                status,
                content_type: content_type.to_string(),
                body: body.into(),
            },
        );
    }

    pub fn respond_json(&self, path: &str, status: u16, body: serde_json::Value) {
        self.respond(path, status, "application/json", body.to_string());
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.target.split('?').next() == Some(path))
            .count()
    }
}

async fn handle(State(shared): State<Shared>, method: Method, uri: Uri, body: Bytes) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    shared.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        target,
        body: body.to_vec(),
    });

    let canned = shared.routes.lock().unwrap().get(uri.path()).cloned();
    match canned {
        Some(canned) => {
            let status =
                StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, canned.content_type)], canned.body).into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
