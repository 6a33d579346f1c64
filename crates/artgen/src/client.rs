use async_trait::async_trait;
use common::config::OpenAiConfig;
use common::text::truncate_chars;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::GenerationError;

/// Chat-completion and image endpoints behind one object-safe trait so the
/// generator and the pipeline tests can swap in scripted fakes.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Returns the first choice's message content.
    async fn chat(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, GenerationError>;

    /// Returns the remote URL of a single generated image; image bytes are
    /// never downloaded or re-hosted.
    async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
        size: &str,
        quality: &str,
    ) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    quality: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: String,
}

pub struct OpenAiClient {
    client: reqwest::Client,
    base: Url,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client");
        // Url::join treats a base without a trailing slash as a file path
        // and would drop the `/v1` segment.
        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self {
            client,
            base: Url::parse(&base_url)?,
            api_key: config.api_key.clone(),
        })
    }

    #[instrument(skip(self, body), fields(url = %url))]
    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, GenerationError> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        debug!(endpoint = %endpoint, "dispatching model request");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|source| GenerationError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            warn!(
                status = %status,
                endpoint = %endpoint,
                body_preview = %truncate_chars(&body_text, 256),
                "model api returned error response"
            );
            return Err(GenerationError::status(status, endpoint));
        }

        response
            .json::<T>()
            .await
            .map_err(|source| GenerationError::Transport { endpoint, source })
    }
}

#[async_trait]
impl GenerativeClient for OpenAiClient {
    async fn chat(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, GenerationError> {
        let url = self.base.join("chat/completions")?;
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };
        let response: ChatResponse = self.post_json(url, &request).await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyCompletion)
    }

    async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
        size: &str,
        quality: &str,
    ) -> Result<String, GenerationError> {
        let url = self.base.join("images/generations")?;
        let request = ImageRequest {
            model,
            prompt,
            n: 1,
            size,
            quality,
        };
        let response: ImageResponse = self.post_json(url, &request).await?;
        response
            .data
            .into_iter()
            .next()
            .map(|data| data.url)
            .ok_or(GenerationError::EmptyImage)
    }
}
