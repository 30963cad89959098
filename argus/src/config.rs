use std::env;

use anyhow::{Context, Result};

const DEFAULT_ELASTIC_PORT: u16 = 9200;
const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

/// Application-wide configuration, read from the environment once at
/// startup and handed down to whatever needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub elastic: ElasticConfig,
    pub openai: OpenAiConfig,
    pub embed: EmbedConfig,
}

/// Where the search engine lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct ElasticConfig {
    pub host: String,
    pub port: u16,
    pub api_key: String,
}

impl ElasticConfig {
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }
}

/// Credentials for the hosted chat model that writes summaries.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub chat_model: String,
}

/// The embeddings endpoint. Any OpenAI-compatible server works; the
/// deployment points this at a text-embeddings-inference instance serving
/// the pinned retrieval model.
#[derive(Debug, Clone)]
pub struct EmbedConfig {
    pub base_url: String,
    pub api_key: String,
}

impl Config {
    /// Reads the full configuration from the environment.
    ///
    /// # Errors
    ///
    /// This function will return an error if a required variable is unset
    /// or malformed.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            elastic: ElasticConfig {
                host: require("ELASTIC_HOST")?,
                port: match env::var("ELASTIC_PORT") {
                    Ok(port) => port
                        .parse()
                        .context("$ELASTIC_PORT is not a valid port number")?,
                    Err(_) => DEFAULT_ELASTIC_PORT,
                },
                api_key: require("ELASTIC_API_KEY")?,
            },
            openai: OpenAiConfig {
                api_key: require("OPENAI_API_KEY")?,
                chat_model: env::var("CHAT_MODEL")
                    .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
            },
            embed: EmbedConfig {
                base_url: require("EMBEDDINGS_URL")?,
                api_key: env::var("EMBEDDINGS_API_KEY").unwrap_or_default(),
            },
        })
    }
}

fn require(var: &str) -> Result<String> {
    env::var(var).with_context(|| format!("${var} not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_includes_scheme_and_port() {
        let config = ElasticConfig {
            host: "search.example.org".to_string(),
            port: 9243,
            api_key: String::new(),
        };

        assert_eq!(config.base_url(), "https://search.example.org:9243");
    }
}
