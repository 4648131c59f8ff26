//! Test doubles: an in-memory transport that replays scripted replies and
//! records every request, and a one-shot HTTP server for the real transport.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use super::errors::AssistantError;
use super::transport::GenerativeTransport;
use super::types::{GenerateRequest, GenerateResponse};

/// What the fake service does for one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    NoText,
    Status(u16),
    Unreachable,
}

#[derive(Default)]
pub struct RecordingTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl RecordingTransport {
    pub fn replying(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::default(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::replying([Reply::Text(text.into())])
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeTransport for RecordingTransport {
    fn endpoint(&self) -> &str {
        "memory://recording"
    }

    async fn generate(
        &self,
        _api_key: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, AssistantError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::NoText);

        match reply {
            Reply::Text(text) => Ok(GenerateResponse::with_text(text)),
            Reply::NoText => Ok(GenerateResponse::default()),
            Reply::Status(status) => Err(AssistantError::HttpError {
                status,
                body: "scripted failure".into(),
            }),
            Reply::Unreachable => Err(AssistantError::ConnectionFailed {
                endpoint: self.endpoint().to_string(),
                reason: "connection refused".into(),
            }),
        }
    }
}

// ─── One-shot HTTP server ────────────────────────────────────────────────────

/// A request captured by [`serve_once`].
#[derive(Debug)]
pub struct CapturedRequest {
    /// e.g. `POST /v1beta/models/gemini-2.5-flash:generateContent HTTP/1.1`
    pub request_line: String,
    /// Header lines, names lowercased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Bind an ephemeral port, answer the first connection with `status` and
/// `body`, then hand back what was received.
///
/// Returns a base URL (`http://127.0.0.1:<port>/v1beta`) to point the config at.
pub async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\
             connection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });

    (format!("http://{addr}/v1beta"), handle)
}

/// Read headers, then exactly `content-length` bytes of body.
async fn read_request(socket: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers finished");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(n, v)| (n.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let length: usize = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(0);
    let body_start = head_end + 4;
    while buf.len() < body_start + length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body finished");
        buf.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        request_line,
        headers,
        body: String::from_utf8(buf[body_start..body_start + length].to_vec()).unwrap(),
    }
}
