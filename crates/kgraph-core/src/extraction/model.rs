//! Language model seam

use async_trait::async_trait;

use crate::error::Result;

/// Anything that turns a prompt into a completion
///
/// No network client ships with the crate; callers plug in their own.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Replays a previously captured model response, ignoring the prompt
#[derive(Debug, Clone)]
pub struct RecordedResponse {
    response: String,
}

impl RecordedResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }

    pub fn response(&self) -> &str {
        &self.response
    }
}

#[async_trait]
impl LanguageModel for RecordedResponse {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recorded_response_ignores_prompt() {
        let model = RecordedResponse::new("{\n},");
        assert_eq!(model.complete("anything").await.unwrap(), "{\n},");
        assert_eq!(model.complete("").await.unwrap(), model.response());
    }
}
