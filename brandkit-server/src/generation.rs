//! Image generation gateway
//!
//! Talks to a ComfyUI-compatible backend:
//! 1. load the workflow file and write the prompt into its first
//!    `CLIPTextEncode` node
//! 2. `POST /prompt` to queue it
//! 3. poll `GET /history/{id}` until an output image appears, the attempt
//!    ceiling is reached, or the caller cancels
//! 4. `GET /view` to download the image bytes

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

const CLIENT_ID: &str = "marketing-generator";
const PROMPT_NODE_CLASS: &str = "CLIPTextEncode";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to load workflow {path}: {message}")]
    Workflow { path: String, message: String },
    #[error("workflow has no CLIPTextEncode node with a text input")]
    NoPromptNode,
    #[error("generation backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation backend did not return a prompt id")]
    MissingPromptId,
    #[error("image generation timed out after {0} attempts")]
    Timeout(u32),
    #[error("image generation cancelled")]
    Cancelled,
}

impl GenerationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Workflow { .. } | Self::NoPromptNode => ErrorCode::ConfigError,
            Self::Http(_) | Self::MissingPromptId => ErrorCode::GenerationFailed,
            Self::Timeout(_) => ErrorCode::GenerationTimeout,
            Self::Cancelled => ErrorCode::GenerationCancelled,
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        match e.code() {
            ErrorCode::ConfigError => {
                tracing::error!(error = %e, "Generation workflow misconfigured");
                AppError::new(ErrorCode::ConfigError)
            }
            code => AppError::upstream(code, &e),
        }
    }
}

/// Poll cadence and ceiling
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
    /// Log progress every N attempts
    pub progress_every: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 3600,
            progress_every: 10,
        }
    }
}

/// Output image reference from the history endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputImage {
    pub filename: String,
    #[serde(default)]
    pub subfolder: String,
    #[serde(rename = "type", default = "default_output_type")]
    pub kind: String,
}

fn default_output_type() -> String {
    "output".into()
}

/// Node ids in numeric order where they are numbers ("2" before "10"),
/// lexical otherwise.
fn ordered_keys(map: &serde_json::Map<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort_by_key(|k| (k.parse::<u64>().map_err(|_| ()), *k));
    keys
}

/// Write `prompt` into the first `CLIPTextEncode` node that has
/// `inputs.text`. Returns the node id.
pub fn inject_prompt(workflow: &mut Value, prompt: &str) -> Result<String, GenerationError> {
    let nodes = workflow
        .as_object_mut()
        .ok_or(GenerationError::NoPromptNode)?;

    let node_id = ordered_keys(nodes)
        .into_iter()
        .find(|id| {
            let node = &nodes[id.as_str()];
            node.get("class_type").and_then(Value::as_str) == Some(PROMPT_NODE_CLASS)
                && node.get("inputs").and_then(|i| i.get("text")).is_some()
        })
        .cloned()
        .ok_or(GenerationError::NoPromptNode)?;

    if let Some(text) = nodes
        .get_mut(&node_id)
        .and_then(|node| node.get_mut("inputs"))
        .and_then(|inputs| inputs.get_mut("text"))
    {
        *text = Value::String(prompt.to_string());
    }
    Ok(node_id)
}

/// First image of the first output node that has one, once the prompt shows
/// up in the history response.
pub fn find_output_image(history: &Value, prompt_id: &str) -> Option<OutputImage> {
    let outputs = history.get(prompt_id)?.get("outputs")?.as_object()?;
    ordered_keys(outputs).into_iter().find_map(|node_id| {
        let first = outputs[node_id.as_str()].get("images")?.as_array()?.first()?;
        serde_json::from_value(first.clone()).ok()
    })
}

/// Await `fut` unless `cancel` fires first.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, GenerationError>>,
) -> Result<T, GenerationError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GenerationError::Cancelled),
        result = fut => result,
    }
}

/// Run `check` until it yields a value.
///
/// `Ok(None)` means not ready yet. Errors are logged and count as an
/// attempt. Gives up with [`GenerationError::Timeout`] after
/// `max_attempts`, or [`GenerationError::Cancelled`] as soon as `cancel`
/// fires, including while a check is in flight.
pub async fn poll_until<T, F, Fut>(
    policy: &PollPolicy,
    cancel: &CancellationToken,
    mut check: F,
) -> Result<T, GenerationError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>, GenerationError>>,
{
    for attempt in 1..=policy.max_attempts {
        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }

        match until_cancelled(cancel, check(attempt)).await {
            Err(GenerationError::Cancelled) => return Err(GenerationError::Cancelled),
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {
                if policy.progress_every > 0 && attempt % policy.progress_every == 0 {
                    tracing::info!(attempt, "Still generating");
                }
            }
            Err(e) => tracing::warn!(attempt, error = %e, "Error checking generation status"),
        }

        if attempt < policy.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
                _ = tokio::time::sleep(policy.interval) => {}
            }
        }
    }
    Err(GenerationError::Timeout(policy.max_attempts))
}

#[derive(Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    base_url: String,
    workflow_path: String,
    policy: PollPolicy,
}

impl GenerationClient {
    /// `request_timeout` bounds every single backend request, so one
    /// unanswered poll cannot stall the attempt count.
    pub fn new(
        base_url: impl Into<String>,
        workflow_path: impl Into<String>,
        policy: PollPolicy,
        request_timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            workflow_path: workflow_path.into(),
            policy,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Read the workflow file fresh and inject the prompt
    pub async fn load_workflow(&self, prompt: &str) -> Result<Value, GenerationError> {
        let workflow_error = |message: String| GenerationError::Workflow {
            path: self.workflow_path.clone(),
            message,
        };
        let raw = tokio::fs::read_to_string(&self.workflow_path)
            .await
            .map_err(|e| workflow_error(e.to_string()))?;
        let mut workflow: Value =
            serde_json::from_str(&raw).map_err(|e| workflow_error(e.to_string()))?;
        let node_id = inject_prompt(&mut workflow, prompt)?;
        tracing::debug!(node_id = %node_id, "Prompt injected into workflow");
        Ok(workflow)
    }

    /// Queue a workflow; returns the backend's prompt id
    pub async fn submit(&self, workflow: Value) -> Result<String, GenerationError> {
        let resp: Value = self
            .http
            .post(format!("{}/prompt", self.base_url))
            .json(&serde_json::json!({ "prompt": workflow, "client_id": CLIENT_ID }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        resp["prompt_id"]
            .as_str()
            .map(String::from)
            .ok_or(GenerationError::MissingPromptId)
    }

    /// Poll the history endpoint until the prompt has an output image
    pub async fn wait_for_image(
        &self,
        prompt_id: &str,
        cancel: &CancellationToken,
    ) -> Result<OutputImage, GenerationError> {
        let url = format!("{}/history/{prompt_id}", self.base_url);
        let (http, url) = (&self.http, &url);
        poll_until(&self.policy, cancel, |_| async move {
            let history: Value = http
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            Ok::<_, GenerationError>(find_output_image(&history, prompt_id))
        })
        .await
    }

    pub async fn download(&self, image: &OutputImage) -> Result<Vec<u8>, GenerationError> {
        let bytes = self
            .http
            .get(format!("{}/view", self.base_url))
            .query(&[
                ("filename", image.filename.as_str()),
                ("subfolder", image.subfolder.as_str()),
                ("type", image.kind.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }

    /// Full pipeline: workflow → submit → wait → download
    pub async fn generate(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, GenerationError> {
        let workflow = self.load_workflow(prompt).await?;
        let prompt_id = until_cancelled(cancel, self.submit(workflow)).await?;
        tracing::info!(prompt_id = %prompt_id, "Generation started");

        let image = self.wait_for_image(&prompt_id, cancel).await?;
        tracing::info!(prompt_id = %prompt_id, filename = %image.filename, "Image ready");

        until_cancelled(cancel, self.download(&image)).await
    }

    /// Run [`GenerationClient::generate`] on its own task. Dropping the
    /// returned guard cancels it.
    pub fn spawn_generate(
        &self,
        prompt: String,
    ) -> (DropGuard, JoinHandle<Result<Vec<u8>, GenerationError>>) {
        let cancel = CancellationToken::new();
        let guard = cancel.clone().drop_guard();
        let client = self.clone();
        let handle = tokio::spawn(async move { client.generate(&prompt, &cancel).await });
        (guard, handle)
    }
}
