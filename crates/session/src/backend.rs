use crate::types::Student;
use anyhow::{Context, Result, bail};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend REST collaborator consumed by the capture session.
///
/// Failures from either call are non-fatal to the state machine; the
/// session logs them and carries on.
#[allow(async_fn_in_trait)]
pub trait SessionApi {
    /// Current session counter for a course. `None` means the backend has
    /// never counted a session for it.
    async fn session_count(&self, course_id: &str) -> Result<Option<u32>>;

    /// Record that a new session started. The returned truthiness gates a
    /// log message only.
    async fn record_session_start(&self, course_id: &str) -> Result<bool>;
}

/// Every backend response wraps its payload in `{ success, data }`.
#[derive(Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
}

#[derive(Deserialize, Default)]
struct SessionCountData {
    #[serde(rename = "SessionCount")]
    session_count: Option<u32>,
}

pub struct HttpBackend {
    client: reqwest::Client,
    base: String,
}

impl HttpBackend {
    pub fn new(host: &str, port: u16, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if !token.is_empty() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .context("API token is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base: format!("http://{host}:{port}"),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    /// Fetch the enrolled roster for a course.
    pub async fn course_roster(&self, course_id: &str) -> Result<Vec<Student>> {
        let url = self.url(&format!("courses/{course_id}/students"));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?;

        let envelope: Envelope<Vec<Student>> = response
            .json()
            .await
            .context("Malformed roster response")?;

        if !envelope.success {
            bail!("Backend refused roster request for course {course_id}");
        }
        Ok(envelope.data.unwrap_or_default())
    }
}

impl SessionApi for HttpBackend {
    async fn session_count(&self, course_id: &str) -> Result<Option<u32>> {
        let url = self.url(&format!("session/count/{course_id}"));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?;

        let envelope: Envelope<SessionCountData> = response
            .json()
            .await
            .context("Malformed session count response")?;

        Ok(envelope.data.and_then(|d| d.session_count))
    }

    async fn record_session_start(&self, course_id: &str) -> Result<bool> {
        let url = self.url(&format!("session/count/{course_id}"));
        let response = self
            .client
            .put(&url)
            .send()
            .await
            .with_context(|| format!("PUT {url}"))?
            .error_for_status()?;

        let envelope: Envelope<serde_json::Value> = response
            .json()
            .await
            .context("Malformed session start response")?;

        Ok(envelope.success)
    }
}
