use tracing::warn;

use crate::client::GenerativeClient;
use crate::error::GenerationError;
use crate::metrics;

/// One ranked model choice. The optional suffix is appended to the user
/// instruction when this tier runs (the lower tier carries a prompt-length
/// cap the higher tier does not need).
#[derive(Debug, Clone)]
pub struct ModelTier {
    pub model: String,
    pub instruction_suffix: Option<String>,
}

/// Ordered model tiers with a uniform rule: try each tier once, in order,
/// and fail only after every tier has failed.
#[derive(Debug, Clone)]
pub struct ModelTierPolicy {
    tiers: Vec<ModelTier>,
}

impl ModelTierPolicy {
    pub fn new(tiers: Vec<ModelTier>) -> Self {
        Self { tiers }
    }

    pub fn two_tier(
        primary: impl Into<String>,
        fallback: impl Into<String>,
        fallback_suffix: impl Into<String>,
    ) -> Self {
        Self::new(vec![
            ModelTier {
                model: primary.into(),
                instruction_suffix: None,
            },
            ModelTier {
                model: fallback.into(),
                instruction_suffix: Some(fallback_suffix.into()),
            },
        ])
    }

    pub async fn complete(
        &self,
        client: &dyn GenerativeClient,
        system: &str,
        user: &str,
    ) -> Result<String, GenerationError> {
        let mut last_error: Option<GenerationError> = None;

        for tier in &self.tiers {
            let instruction = match &tier.instruction_suffix {
                Some(suffix) => format!("{user} {suffix}"),
                None => user.to_string(),
            };

            match client.chat(&tier.model, system, &instruction).await {
                Ok(content) => {
                    if last_error.is_some() {
                        metrics::FALLBACK_COMPLETIONS_TOTAL.inc();
                    }
                    return Ok(content);
                }
                Err(err) => {
                    warn!(model = %tier.model, error = %err, "model tier failed");
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) => Err(GenerationError::TiersExhausted(Box::new(err))),
            None => Err(GenerationError::NoTiers),
        }
    }
}
