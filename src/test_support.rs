//! Shared test fixtures: a canned HTTP endpoint and in-memory configuration.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::config::{LlmSettings, ProvidersDocument, ProvidersStore, ServiceSettings};

pub struct Reply {
    pub status: &'static str,
    pub body: String,
}

impl Reply {
    pub fn new(status: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 with an OpenAI-style completion whose content is `content`
    pub fn completion(content: &str) -> Self {
        Self::new(
            "200 OK",
            serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": content } }]
            })
            .to_string(),
        )
    }
}

/// Local endpoint answering requests with canned replies
pub struct CannedServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    /// Serve `replies` in order; the last one repeats.
    pub async fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let index = counter.fetch_add(1, Ordering::SeqCst);
                let reply = &replies[index.min(replies.len() - 1)];
                let request = read_request(&mut stream).await;
                recorded.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.status,
                    reply.body.len(),
                    reply.body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            hits,
            requests,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw text (request line, headers and body) of every request received
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Read one HTTP request (headers plus Content-Length body).
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Single OpenAI model `gpt-4o` pointing at `base_url`
pub fn openai_store(base_url: &str) -> Arc<ProvidersStore> {
    let document: ProvidersDocument = serde_json::from_str(&format!(
        r#"{{"providers":[{{"provider":"openai","models":[
            {{"model":"gpt-4o","title":"GPT-4o","baseURL":"{}","apiKey":"k"}}]}}]}}"#,
        base_url
    ))
    .unwrap();
    Arc::new(ProvidersStore::from_document(document))
}

/// Fast settings for tests: tiny backoff, short timeout
pub fn fast_settings(max_retries: usize) -> ServiceSettings {
    ServiceSettings {
        llm: LlmSettings {
            max_retries,
            retry_base_delay_ms: 1,
            retry_max_delay_secs: 1,
            timeout_secs: 5,
            ..LlmSettings::default()
        },
        ..ServiceSettings::default()
    }
}
