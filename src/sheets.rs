use async_trait::async_trait;

use crate::release::ReleaseStatus;

/// Mirrors release and issue events to the label's spreadsheet. Failures are
/// the implementation's problem: callers have already persisted their state
/// and never see a notifier error.
#[async_trait]
pub trait SheetNotifier: Send + Sync {
    async fn report_release(&self, title: &str, artist: &str, status: ReleaseStatus);
    async fn report_issue(&self, title: &str, username: &str, issue: &str);
}

/// Fire-and-forget form-encoded POSTs to a Google Apps Script webhook.
/// Transport errors and non-2xx responses are logged and dropped; the local
/// store and the sheet can diverge permanently.
pub struct GoogleSheetNotifier {
    client: reqwest::Client,
    url: String,
}

impl GoogleSheetNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    async fn post(&self, fields: &[(&str, &str)]) -> anyhow::Result<()> {
        let response = self.client.post(&self.url).form(fields).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("webhook returned {status}: {body}");
        }
        Ok(())
    }
}

#[async_trait]
impl SheetNotifier for GoogleSheetNotifier {
    async fn report_release(&self, title: &str, artist: &str, status: ReleaseStatus) {
        let fields = [
            ("title", title),
            ("artist", artist),
            ("status", status.as_str()),
        ];
        if let Err(err) = self.post(&fields).await {
            log::warn!("failed to mirror release '{title}' to the sheet: {err:#}");
        }
    }

    async fn report_issue(&self, title: &str, username: &str, issue: &str) {
        let fields = [("title", title), ("username", username), ("issue", issue)];
        if let Err(err) = self.post(&fields).await {
            log::warn!("failed to mirror issue for '{title}' to the sheet: {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Accepts one HTTP request, replies 200, and hands back the request body.
    async fn capture_one_request(listener: TcpListener) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];

        let (headers_end, content_length) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers were complete");
            raw.extend_from_slice(&chunk[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&raw[..pos]).to_string();
                let content_length = headers
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                break (pos + 4, content_length);
            }
        };

        while raw.len() < headers_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body was complete");
            raw.extend_from_slice(&chunk[..n]);
        }

        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();

        String::from_utf8_lossy(&raw[headers_end..headers_end + content_length]).to_string()
    }

    #[tokio::test]
    async fn report_release_posts_form_fields() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(capture_one_request(listener));

        let notifier = GoogleSheetNotifier::new(format!("http://{addr}/exec"));
        notifier
            .report_release("MyAlbum", "@artistX", ReleaseStatus::Pending)
            .await;

        let body = server.await.unwrap();
        assert!(body.contains("title=MyAlbum"), "body was: {body}");
        assert!(body.contains("artist=%40artistX"), "body was: {body}");
        assert!(body.contains("status="), "body was: {body}");
    }

    #[tokio::test]
    async fn report_issue_posts_form_fields() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(capture_one_request(listener));

        let notifier = GoogleSheetNotifier::new(format!("http://{addr}/exec"));
        notifier
            .report_issue("MyAlbum", "artistX", "MyAlbum broken cover")
            .await;

        let body = server.await.unwrap();
        assert!(body.contains("title=MyAlbum"), "body was: {body}");
        assert!(body.contains("username=artistX"), "body was: {body}");
        assert!(body.contains("issue=MyAlbum+broken+cover"), "body was: {body}");
    }

    #[tokio::test]
    async fn transport_errors_are_swallowed() {
        // Nothing listens here; both calls must return without panicking.
        let notifier = GoogleSheetNotifier::new("http://127.0.0.1:9/exec".to_string());
        notifier
            .report_release("MyAlbum", "@artistX", ReleaseStatus::Pending)
            .await;
        notifier.report_issue("MyAlbum", "artistX", "text").await;
    }
}
