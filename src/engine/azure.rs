use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use log::error;

use crate::engine::{SpeechEngine, SynthesisRequest, SynthesisResult};
use crate::errors::EngineError;

/// Output container requested from the service
const OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";

/// Speech engine backed by the Azure Cognitive Services TTS REST endpoint.
///
/// Takes an SSML body and returns encoded audio. The REST surface reports no
/// word boundary events, so this engine pairs with the heuristic or hybrid
/// timing policies; pause spans are honored natively through `<break>` tags
/// in the submitted markup.
#[derive(Debug)]
pub struct AzureSpeech {
    /// Base URL of the regional endpoint
    base_url: String,
    /// Subscription key
    api_key: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

impl AzureSpeech {
    /// Create a new client for the given regional endpoint
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }

    /// Create a client with explicit retry settings
    pub fn new_with_retries(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        let mut client = Self::new(endpoint, api_key, timeout_secs);
        client.max_retries = max_retries;
        client.backoff_base_ms = backoff_base_ms;
        client
    }
}

#[async_trait]
impl SpeechEngine for AzureSpeech {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult, EngineError> {
        if self.api_key.is_empty() {
            return Err(EngineError::AuthenticationError(
                "No API key configured for the Azure engine".to_string(),
            ));
        }

        let body = request
            .markup
            .clone()
            .ok_or_else(|| EngineError::RequestFailed(
                "The Azure engine requires an SSML rendering of the request".to_string(),
            ))?;

        let url = format!("{}/cognitiveservices/v1", self.base_url);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            let response_result = self
                .client
                .post(&url)
                .header("Ocp-Apim-Subscription-Key", &self.api_key)
                .header("Content-Type", "application/ssml+xml")
                .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
                .header("User-Agent", "narramd")
                .body(body.clone())
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let audio = response.bytes().await.map_err(|e| {
                            EngineError::RequestFailed(format!(
                                "Failed to read audio response body: {}",
                                e
                            ))
                        })?;

                        return Ok(SynthesisResult {
                            audio: audio.to_vec(),
                            boundaries: Vec::new(),
                            duration_secs: None,
                        });
                    } else if status.as_u16() == 401 || status.as_u16() == 403 {
                        // Bad key - don't retry
                        return Err(EngineError::AuthenticationError(format!(
                            "Service rejected the subscription key ({})",
                            status
                        )));
                    } else if status.is_server_error() || status.as_u16() == 429 {
                        // Server error or throttling - can retry
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!(
                            "Speech API error ({}): {} - attempt {}/{}",
                            status,
                            error_text,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(EngineError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    } else {
                        // Client error - don't retry
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Speech API error ({}): {}", status, error_text);
                        return Err(EngineError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    }
                }
                Err(e) => {
                    // Network error - can retry
                    error!(
                        "Speech API network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(EngineError::RequestFailed(e.to_string()));
                }
            }

            attempt += 1;

            // If we have more retries left, wait with exponential backoff
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EngineError::RequestFailed(format!(
                "Synthesis failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    async fn test_availability(&self) -> Result<(), EngineError> {
        let url = format!("{}/cognitiveservices/voices/list", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| EngineError::RequestFailed(format!("Failed to reach speech service: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::ApiError {
                status_code: status.as_u16(),
                message: "Voice list request failed".to_string(),
            });
        }

        Ok(())
    }

    fn supports_markup(&self) -> bool {
        true
    }
}
