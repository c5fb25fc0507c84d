//! Shared plumbing of the HTTP collaborators.

use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::{upstream_detail, ServiceError};

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, ServiceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ServiceError::Transport(format!("failed to build HTTP client: {e}")))
}

/// Reads the body of a response, mapping non-success statuses to
/// [`ServiceError::Upstream`] with the upstream `detail` when present.
pub(crate) async fn read_body(resp: Response) -> Result<String, ServiceError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| ServiceError::Transport(format!("failed to read response body: {e}")))?;

    if !status.is_success() {
        #[cfg(feature = "tracing")]
        tracing::warn!("upstream responded with {}", status);
        return Err(ServiceError::Upstream {
            status: status.as_u16(),
            detail: upstream_detail(&body),
        });
    }
    Ok(body)
}

pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ServiceError> {
    let body = read_body(resp).await?;
    serde_json::from_str(&body).map_err(|e| ServiceError::shape(e.to_string()))
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP server answering a single request with a canned response.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// What the server saw: request line, headers and body.
    pub struct Captured {
        pub head: String,
        pub body: String,
    }

    pub async fn serve_once(
        status: &'static str,
        content_type: &'static str,
        body: String,
    ) -> (String, oneshot::Receiver<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            let (head, body_start) = loop {
                let n = socket.read(&mut buf).await.expect("read");
                if n == 0 {
                    break (String::from_utf8_lossy(&raw).to_string(), raw.len());
                }
                raw.extend_from_slice(&buf[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break (String::from_utf8_lossy(&raw[..pos]).to_string(), pos + 4);
                }
            };
            let content_length = head
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            while raw.len() < body_start + content_length {
                let n = socket.read(&mut buf).await.expect("read body");
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }
            let request_body = String::from_utf8_lossy(&raw[body_start.min(raw.len())..]).to_string();

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
            let _ = tx.send(Captured {
                head,
                body: request_body,
            });
        });

        (base, rx)
    }

    /// An address nothing listens on.
    pub async fn closed_port() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        drop(listener);
        base
    }
}
