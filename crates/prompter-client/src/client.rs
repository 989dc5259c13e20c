//! Typed async client for the broker's local HTTP API.

use std::time::Duration;

use prompter_types::{AnswerResponse, DEFAULT_OPTIONS, PromptId, SubmitResponse, WaitResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;

/// Default time a caller waits for the human before giving up.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(3600);

/// Time allowed for the non-suspending calls.
const SHORT_TIMEOUT: Duration = Duration::from_secs(2);

/// Body of `POST /prompt`.
#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a [String]>,
}

/// Body of `POST /answer`.
#[derive(Debug, Serialize)]
struct AnswerBody<'a> {
    id: String,
    answer: &'a str,
}

/// Client for one broker instance.
#[derive(Debug, Clone)]
pub struct PrompterClient {
    http: reqwest::Client,
    base_url: String,
    wait_timeout: Duration,
}

impl PrompterClient {
    /// Create a client for the broker at `base_url` (e.g.
    /// `http://127.0.0.1:5533`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }

    /// Create a client for a broker on this machine.
    pub fn local(port: u16) -> Self {
        Self::new(format!("http://127.0.0.1:{port}"))
    }

    /// Use `timeout` for [`PrompterClient::wait`] instead of the default.
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// The broker base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a prompt and return its id.
    pub async fn submit(
        &self,
        message: &str,
        options: Option<&[String]>,
    ) -> Result<PromptId, ClientError> {
        let response = self
            .http
            .post(format!("{}/prompt", self.base_url))
            .timeout(SHORT_TIMEOUT)
            .json(&SubmitBody { message, options })
            .send()
            .await?;
        let body: SubmitResponse = decode(response).await?;
        debug!(prompt_id = %body.id, "Prompt submitted");
        Ok(body.id)
    }

    /// Wait for the answer to `id`, up to the configured wait timeout.
    pub async fn wait(&self, id: PromptId) -> Result<String, ClientError> {
        let response = self
            .http
            .get(format!("{}/wait", self.base_url))
            .query(&[("id", id.to_string())])
            .timeout(self.wait_timeout)
            .send()
            .await?;
        let body: WaitResponse = decode(response).await?;
        Ok(body.answer)
    }

    /// Answer `id` with `answer`.
    ///
    /// Succeeds also when the prompt was already answered; the broker
    /// keeps the first answer.
    pub async fn answer(&self, id: PromptId, answer: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}/answer", self.base_url))
            .timeout(SHORT_TIMEOUT)
            .json(&AnswerBody {
                id: id.to_string(),
                answer,
            })
            .send()
            .await?;
        let _ack: AnswerResponse = decode(response).await?;
        Ok(())
    }

    /// Submit a prompt and wait for its answer.
    ///
    /// An empty `options` slice is replaced by the default quick answers
    /// (`r`, `s`, `c`).
    pub async fn ask(&self, message: &str, options: &[&str]) -> Result<String, ClientError> {
        let options: Vec<String> = if options.is_empty() {
            DEFAULT_OPTIONS.iter().map(|o| (*o).to_owned()).collect()
        } else {
            options.iter().map(|o| (*o).to_owned()).collect()
        };
        let id = self.submit(message, Some(options.as_slice())).await?;
        self.wait(id).await
    }
}

/// Check the status, then parse the body as `T`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let text = check_status(response).await?.text().await?;
    decode_body(&text)
}

fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ClientError> {
    Ok(serde_json::from_str(text)?)
}

/// Turn a non-success response into [`ClientError::Status`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error body".to_owned());
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}
