use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use async_openai::{config::OpenAIConfig, types::CreateEmbeddingRequestArgs, Client};

use crate::config::EmbedConfig;

/// The pinned retrieval model. The archive vectors were produced by this
/// exact model, so querying with anything else would be meaningless.
pub const EMBEDDING_MODEL: &str = "WhereIsAI/UAE-Large-V1";

/// The retrieval prompt the model was tuned with. Questions are wrapped in
/// it before encoding; documents were indexed bare.
const QUERY_PROMPT: &str = "Represent this sentence for searching relevant passages:";

static EMBEDDER: OnceLock<Embedder> = OnceLock::new();

/// Client for the embeddings endpoint.
///
/// One per process: the first caller initializes it from the configuration
/// it was handed, and every later caller reuses that instance whatever
/// configuration they pass.
pub struct Embedder {
    client: Client<OpenAIConfig>,
}

impl Embedder {
    pub fn global(config: &EmbedConfig) -> &'static Self {
        EMBEDDER.get_or_init(|| Self::new(config))
    }

    #[must_use]
    pub fn new(config: &EmbedConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.base_url.clone())
            .with_api_key(config.api_key.clone());

        Self {
            client: Client::with_config(openai_config),
        }
    }

    /// Embeds an analyst question into the model's vector space.
    ///
    /// # Errors
    ///
    /// This function will return an error if the embeddings endpoint is
    /// unreachable, rejects the request, or returns no vector.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(EMBEDDING_MODEL)
            .input(format!("{QUERY_PROMPT} {text}"))
            .build()?;

        let response = self.client.embeddings().create(request).await?;

        Ok(response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Could not find embedding"))?
            .embedding)
    }
}
