use crate::error::GlosorError;
use std::thread;
use std::time::Duration;

const GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Best-effort Swedish to English translation.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> Result<String, GlosorError>;
}

/// Google translate web endpoint, Swedish to English.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: reqwest::blocking::Client,
    source: String,
    target: String,
}

impl GoogleTranslator {
    pub fn new() -> Result<Self, GlosorError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GlosorError::TranslationRequest(e.to_string()))?;
        Ok(Self {
            client,
            source: "sv".into(),
            target: "en".into(),
        })
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str) -> Result<String, GlosorError> {
        let response = self
            .client
            .get(GOOGLE_ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .map_err(|e| GlosorError::TranslationRequest(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GlosorError::TranslationRequest(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|e| GlosorError::TranslationRequest(e.to_string()))?;
        parse_google_response(&body)
    }
}

/// The endpoint answers `[[["translated", "source", ...], ...], ...]`,
/// one inner array per sentence.
fn parse_google_response(body: &serde_json::Value) -> Result<String, GlosorError> {
    let sentences = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| GlosorError::TranslationRequest("unexpected response shape".into()))?;

    let translated: String = sentences
        .iter()
        .filter_map(|s| s.get(0).and_then(|t| t.as_str()))
        .collect();

    if translated.trim().is_empty() {
        return Err(GlosorError::TranslationRequest("empty translation".into()));
    }
    Ok(translated.trim().to_string())
}

/// Pacing and retry limits for translation calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Pause after every successful call.
    pub success_delay: Duration,
    /// Pause before every retry.
    pub failure_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 6,
            success_delay: Duration::from_secs(2),
            failure_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Same retry count, no sleeping.
    pub fn immediate() -> Self {
        Self {
            success_delay: Duration::ZERO,
            failure_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Translate one text, retrying transient failures.
pub fn translate_with_retry(
    translator: &dyn Translator,
    text: &str,
    policy: &RetryPolicy,
) -> Result<String, GlosorError> {
    let mut retries = 0;
    loop {
        match translator.translate(text) {
            Ok(translated) => {
                thread::sleep(policy.success_delay);
                return Ok(translated);
            }
            Err(e) if retries >= policy.max_retries => {
                return Err(GlosorError::TranslationExhausted {
                    text: text.to_string(),
                    attempts: retries + 1,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                retries += 1;
                log::warn!(
                    "translating '{}' failed ({}), retry {}/{}",
                    text,
                    e,
                    retries,
                    policy.max_retries
                );
                thread::sleep(policy.failure_delay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails a fixed number of times, then echoes in upper case.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    impl Translator for Flaky {
        fn translate(&self, text: &str) -> Result<String, GlosorError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(GlosorError::TranslationRequest("rate limited".into()))
            } else {
                Ok(text.to_uppercase())
            }
        }
    }

    fn flaky(failures: u32) -> Flaky {
        Flaky {
            failures,
            calls: AtomicU32::new(0),
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 6);
        assert_eq!(policy.success_delay, Duration::from_secs(2));
        assert_eq!(policy.failure_delay, Duration::from_secs(10));
    }

    #[test]
    fn test_retry_recovers() {
        let translator = flaky(6);
        let result = translate_with_retry(&translator, "hej", &RetryPolicy::immediate());
        assert_eq!(result.unwrap(), "HEJ");
        assert_eq!(translator.calls.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_retry_exhausted() {
        let translator = flaky(7);
        let result = translate_with_retry(&translator, "hej", &RetryPolicy::immediate());
        match result {
            Err(GlosorError::TranslationExhausted { attempts, .. }) => assert_eq!(attempts, 7),
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(translator.calls.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_parse_google_response_joins_sentences() {
        let body = serde_json::json!([
            [["to run. ", "springa. ", null], ["Fast.", "Snabbt.", null]],
            null,
            "sv"
        ]);
        assert_eq!(parse_google_response(&body).unwrap(), "to run. Fast.");
    }

    #[test]
    fn test_parse_google_response_rejects_garbage() {
        assert!(parse_google_response(&serde_json::json!({"error": 1})).is_err());
        assert!(parse_google_response(&serde_json::json!([[]])).is_err());
    }
}
