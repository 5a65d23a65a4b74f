//! External text-generation collaborator.
//!
//! The engine treats the AI service as an opaque `prompt -> text`
//! function behind [`TextGenerator`]. It may fail or time out; the
//! engine never retries it (retries belong to the caller). Quota is
//! checked before the call and consumed only after it succeeds.

use serde_json::json;

use crate::config::GenerationConfig;
use crate::error::GenerationError;

/// Opaque text-generation function.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// HTTP client posting prompts to a configured generation endpoint.
///
/// Sends `{ "prompt": ..., "model": ... }` and expects `{ "text": ... }`
/// back. Anything else is surfaced as an upstream failure.
pub struct HttpTextGenerator {
    config: GenerationConfig,
}

impl HttpTextGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    fn request(&self, endpoint: &str, prompt: &str) -> Result<String, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build()?;

        let mut body = json!({ "prompt": prompt });
        if let Some(model) = &self.config.model {
            body["model"] = json!(model);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GenerationError::RequestFailed(e.to_string()))?;

        runtime.block_on(async {
            let resp = client.post(endpoint).json(&body).send().await?;

            let status = resp.status();
            if !status.is_success() {
                let message = resp.text().await.unwrap_or_default();
                return Err(GenerationError::UpstreamFailed {
                    status: status.as_u16(),
                    message,
                });
            }

            let value: serde_json::Value = resp.json().await?;
            match value.get("text").and_then(|t| t.as_str()) {
                Some(text) if !text.is_empty() => Ok(text.to_string()),
                _ => Err(GenerationError::EmptyResponse),
            }
        })
    }
}

impl TextGenerator for HttpTextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let endpoint = self
            .config
            .endpoint
            .clone()
            .ok_or(GenerationError::NotConfigured)?;
        self.request(&endpoint, prompt)
    }
}

/// Scripted generator for tests: returns canned text or a canned error.
#[cfg(test)]
pub(crate) struct ScriptedGenerator {
    pub output: Result<String, String>,
}

#[cfg(test)]
impl ScriptedGenerator {
    pub fn ok(text: &str) -> Self {
        Self {
            output: Ok(text.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            output: Err(message.to_string()),
        }
    }
}

#[cfg(test)]
impl TextGenerator for ScriptedGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.output
            .clone()
            .map_err(GenerationError::RequestFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_endpoint_fails() {
        let generator = HttpTextGenerator::new(GenerationConfig::default());
        let err = generator.generate("Summarize this").unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured));
    }

    #[test]
    fn test_successful_generation() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/generate")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"text":"A concise summary."}"#)
            .create();

        let generator = HttpTextGenerator::new(GenerationConfig {
            endpoint: Some(format!("{}/generate", server.url())),
            model: Some("summarizer-v1".to_string()),
            timeout_secs: 5,
        });

        let text = generator.generate("Summarize this").unwrap();
        assert_eq!(text, "A concise summary.");
        mock.assert();
    }

    #[test]
    fn test_upstream_error_propagates() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/generate")
            .with_status(503)
            .with_body("overloaded")
            .create();

        let generator = HttpTextGenerator::new(GenerationConfig {
            endpoint: Some(format!("{}/generate", server.url())),
            model: None,
            timeout_secs: 5,
        });

        let err = generator.generate("Summarize this").unwrap_err();
        assert!(matches!(
            err,
            GenerationError::UpstreamFailed { status: 503, .. }
        ));
    }

    #[test]
    fn test_missing_text_field_is_empty_response() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tokens": 12}"#)
            .create();

        let generator = HttpTextGenerator::new(GenerationConfig {
            endpoint: Some(format!("{}/generate", server.url())),
            model: None,
            timeout_secs: 5,
        });

        let err = generator.generate("Summarize this").unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }
}
