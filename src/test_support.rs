//! Local stand-in for an external provider, used by client tests.

use std::sync::{Arc, Mutex};

use axum::{body::Bytes, http::StatusCode, Router};

/// JSON request bodies received by a [`spawn_provider`] server, in arrival order.
pub type Captured = Arc<Mutex<Vec<serde_json::Value>>>;

/// Raw request bodies received by a [`spawn_form_provider`] server.
pub type CapturedRaw = Arc<Mutex<Vec<String>>>;

/// Serve `body` with `status` for every request on an ephemeral port and
/// return the server's base URL along with the captured JSON request bodies.
pub async fn spawn_provider(status: u16, body: &'static str) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();
    let url = serve(status, body, move |request| {
        if let Ok(json) = serde_json::from_slice(&request) {
            sink.lock().unwrap().push(json);
        }
    })
    .await;
    (url, captured)
}

/// Like [`spawn_provider`], but keeps bodies as text (e.g. form-encoded token requests).
pub async fn spawn_form_provider(status: u16, body: &'static str) -> (String, CapturedRaw) {
    let captured: CapturedRaw = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();
    let url = serve(status, body, move |request| {
        sink.lock()
            .unwrap()
            .push(String::from_utf8_lossy(&request).into_owned());
    })
    .await;
    (url, captured)
}

async fn serve<F>(status: u16, body: &'static str, record: F) -> String
where
    F: Fn(Bytes) + Clone + Send + Sync + 'static,
{
    let app = Router::new().fallback(move |request: Bytes| {
        let record = record.clone();
        async move {
            record(request);
            (StatusCode::from_u16(status).unwrap(), body)
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
