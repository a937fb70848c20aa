//! Minimal HTTP/1.1 responder for exercising the provider clients.
//!
//! Every request gets the same scripted reply. Request targets are recorded
//! so tests can assert the query string a client sent.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Scripted reply returned for every request.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl StubResponse {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// Wait before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A loopback server answering with one [`StubResponse`].
pub struct StubServer {
    base_url: String,
    targets: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(response: StubResponse) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let targets = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&targets);
        let task = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let response = response.clone();
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    if let Some(target) = read_target(&mut socket).await {
                        recorded.lock().await.push(target);
                        respond(socket, &response).await;
                    }
                });
            }
        });

        Self {
            base_url,
            targets,
            task,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request targets (path and query) in arrival order.
    pub async fn targets(&self) -> Vec<String> {
        self.targets.lock().await.clone()
    }

    /// Decoded query parameters of the only request received.
    pub async fn single_query(&self) -> HashMap<String, String> {
        let targets = self.targets().await;
        assert_eq!(targets.len(), 1, "expected one request, got {:?}", targets);

        let url = Url::parse(&format!("{}{}", self.base_url, targets[0])).unwrap();
        url.query_pairs().into_owned().collect()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Read the request head and return its target.
async fn read_target(socket: &mut TcpStream) -> Option<String> {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        head.extend_from_slice(&chunk[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    String::from_utf8_lossy(&head)
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
}

async fn respond(mut socket: TcpStream, response: &StubResponse) {
    tokio::time::sleep(response.delay).await;

    let reply = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        response.body.len(),
        response.body
    );
    let _ = socket.write_all(reply.as_bytes()).await;
    let _ = socket.shutdown().await;
}
