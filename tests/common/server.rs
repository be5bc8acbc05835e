//! A minimal HTTP/1.1 server answering every request with a canned reply.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// The reply sent for every request.
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Handle to a running server.
#[derive(Clone)]
pub struct CannedServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl CannedServer {
    /// Bind to an ephemeral local port and start answering.
    pub async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let server = Self {
            base_url,
            requests: Arc::new(Mutex::new(Vec::new())),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        };

        let reply = Arc::new(reply);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let handle = server.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let reply = reply.clone();
                let in_flight = in_flight.clone();
                let handle = handle.clone();
                tokio::spawn(async move { handle.answer(socket, &reply, &in_flight).await });
            }
        });

        server
    }

    /// Bodies of the requests received so far.
    pub fn request_bodies(&self) -> Vec<serde_json::Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|raw| {
                let body = raw.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or_default();
                serde_json::from_str(body).unwrap()
            })
            .collect()
    }

    /// Request lines (`POST /... HTTP/1.1`) received so far.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|raw| raw.lines().next().unwrap_or_default().to_string())
            .collect()
    }

    /// Highest number of requests that were being answered at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn answer(&self, mut socket: TcpStream, reply: &Reply, in_flight: &AtomicUsize) {
        let request = read_request(&mut socket).await;
        self.requests.lock().unwrap().push(request);

        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(reply.delay).await;
        in_flight.fetch_sub(1, Ordering::SeqCst);

        let response = format!(
            "HTTP/1.1 {} Canned\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{}",
            reply.status,
            reply.body.len(),
            reply.body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
