use std::sync::Arc;
use std::time::Instant;

use common::config::GeneratorConfig;
use common::text::strip_wrapping_quotes;
use tracing::instrument;

use crate::client::GenerativeClient;
use crate::error::GenerationError;
use crate::metrics;
use crate::policy::ModelTierPolicy;

const PROMPT_SYSTEM: &str =
    "You are an AI generating prompts for stunning, shareable visual designs.";
const QUOTE_SYSTEM: &str =
    "You are an AI specialized in creating motivational and inspiring quotes for achievements.";
const FALLBACK_LENGTH_CAP: &str = "Prompt length must be below 1000 words.";

/// One generated stat card: the image prompt, the rendered image's remote
/// URL, and a short quotation to overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub prompt: String,
    pub image_url: String,
    pub quotation: String,
}

/// Drives the per-statistic three-step sequence: prompt, then image, then
/// quotation. The two text steps share the tiered fallback policy; the image
/// step has no fallback.
pub struct ArtGenerator {
    client: Arc<dyn GenerativeClient>,
    policy: ModelTierPolicy,
    image_model: String,
    image_size: String,
    image_quality: String,
}

impl ArtGenerator {
    pub fn new(config: &GeneratorConfig, client: Arc<dyn GenerativeClient>) -> Self {
        let policy = ModelTierPolicy::two_tier(
            config.primary_model.clone(),
            config.fallback_model.clone(),
            FALLBACK_LENGTH_CAP,
        );
        Self {
            client,
            policy,
            image_model: config.image_model.clone(),
            image_size: config.image_size.clone(),
            image_quality: config.image_quality.clone(),
        }
    }

    #[instrument(skip(self), fields(stat = stat_name))]
    pub async fn generate(
        &self,
        stat_name: &str,
        stat_value: &str,
    ) -> Result<GeneratedArtifact, GenerationError> {
        let prompt = self
            .step("prompt", {
                let instruction = prompt_instruction(stat_name, stat_value);
                let policy = &self.policy;
                let client = self.client.as_ref();
                async move { policy.complete(client, PROMPT_SYSTEM, &instruction).await }
            })
            .await?;

        let image_url = self
            .step("image", {
                let client = self.client.as_ref();
                let prompt = prompt.as_str();
                async move {
                    client
                        .generate_image(
                            &self.image_model,
                            prompt,
                            &self.image_size,
                            &self.image_quality,
                        )
                        .await
                }
            })
            .await?;

        let quotation = self
            .step("quote", {
                let instruction = quote_instruction(stat_name, stat_value, &prompt);
                let policy = &self.policy;
                let client = self.client.as_ref();
                async move { policy.complete(client, QUOTE_SYSTEM, &instruction).await }
            })
            .await?;

        Ok(GeneratedArtifact {
            prompt,
            image_url,
            quotation: strip_wrapping_quotes(&quotation).to_string(),
        })
    }

    async fn step<F>(&self, step: &str, fut: F) -> Result<String, GenerationError>
    where
        F: std::future::Future<Output = Result<String, GenerationError>>,
    {
        let started = Instant::now();
        let result = fut.await;
        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::STEP_REQUESTS_TOTAL
            .with_label_values(&[step, outcome])
            .inc();
        metrics::STEP_LATENCY_SECONDS
            .with_label_values(&[step])
            .observe(started.elapsed().as_secs_f64());
        result
    }
}

fn prompt_instruction(stat_name: &str, stat_value: &str) -> String {
    format!(
        "Create a detailed, visually inspiring prompt for generating an image based on the \
         following GitHub stat: '{stat_name}' with a value of {stat_value}. The prompt should \
         include vibrant imagery, modern icons, a rich color palette, and elements that symbolize \
         the magnitude of the number. The design should be motivational and suitable for sharing \
         on social media."
    )
}

fn quote_instruction(stat_name: &str, stat_value: &str, prompt: &str) -> String {
    format!(
        "Write an inspiring and motivational quote based on this GitHub stat: '{stat_name}' with \
         a value of {stat_value}. The quote should emphasize growth, creativity, and impact, and \
         should resonate with developers. Keep in mind that the design is already made with this \
         prompt: {prompt}. Give a short quotation that will be displayed on the image."
    )
}
