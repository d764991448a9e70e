//! Chooses between the classification API and the keyword heuristic.

use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::classifier::{Classifier, ClassifierError};
use crate::heuristic::score_text;
use crate::types::{AnalysisResult, DetectionResponse};

/// Routes a detection request to the classifier or the heuristic.
///
/// The classifier gets a single attempt bounded by `timeout`. Any failure
/// falls back to the heuristic, so callers always receive a verdict.
#[derive(Clone)]
pub struct Dispatcher {
    classifier: Arc<dyn Classifier>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(classifier: Arc<dyn Classifier>, timeout: Duration) -> Self {
        Self {
            classifier,
            timeout,
        }
    }

    /// Analyze `text`, using the classifier only when `api_key` is set.
    pub async fn analyze(&self, text: &str, api_key: Option<&str>) -> DetectionResponse {
        let (result, ai_powered) = match api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => match self.classify(text, key).await {
                Ok(result) => (result, true),
                Err(e) => {
                    warn!(
                        classifier = %self.classifier.name(),
                        error = %e,
                        "AI analysis failed, falling back to keyword heuristic"
                    );
                    (score_text(text), false)
                }
            },
            None => (score_text(text), false),
        };

        info!(
            score = result.score,
            credibility = ?result.credibility,
            ai_powered,
            "Text analyzed"
        );

        DetectionResponse {
            success: true,
            result,
            ai_powered,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    async fn classify(&self, text: &str, api_key: &str) -> Result<AnalysisResult, ClassifierError> {
        tokio::time::timeout(self.timeout, self.classifier.classify(text, api_key))
            .await
            .map_err(|_| ClassifierError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisDetails, Credibility, Status};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Classifier returning a canned outcome and counting calls.
    struct StubClassifier {
        outcome: fn() -> Result<AnalysisResult, ClassifierError>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl StubClassifier {
        fn new(outcome: fn() -> Result<AnalysisResult, ClassifierError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Classifier for StubClassifier {
        fn name(&self) -> &str {
            "stub"
        }

        async fn classify(&self, _text: &str, _api_key: &str) -> Result<AnalysisResult, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            (self.outcome)()
        }
    }

    fn ai_verdict() -> Result<AnalysisResult, ClassifierError> {
        Ok(AnalysisResult {
            score: 85,
            credibility: Credibility::Low,
            status: Status::LikelyFake,
            fake_keywords_found: 4,
            reliable_indicators_found: 0,
            analysis: AnalysisDetails {
                text_length: 12,
                suspicious_keywords: vec!["miracle".into()],
                reliable_indicators: vec![],
            },
        })
    }

    fn malformed() -> Result<AnalysisResult, ClassifierError> {
        Err(ClassifierError::Malformed("expected value at line 1".into()))
    }

    const TEXT: &str = "Shocking secret leaked by insiders";

    #[tokio::test]
    async fn test_no_key_uses_heuristic() {
        let stub = StubClassifier::new(ai_verdict);
        let dispatcher = Dispatcher::new(stub.clone(), Duration::from_secs(1));

        let response = dispatcher.analyze(TEXT, None).await;
        assert!(response.success);
        assert!(!response.ai_powered);
        assert_eq!(response.result, score_text(TEXT));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_key_uses_heuristic() {
        let stub = StubClassifier::new(ai_verdict);
        let dispatcher = Dispatcher::new(stub.clone(), Duration::from_secs(1));

        let response = dispatcher.analyze(TEXT, Some("")).await;
        assert!(!response.ai_powered);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_key_uses_classifier() {
        let stub = StubClassifier::new(ai_verdict);
        let dispatcher = Dispatcher::new(stub.clone(), Duration::from_secs(1));

        let response = dispatcher.analyze(TEXT, Some("sk-test")).await;
        assert!(response.ai_powered);
        assert_eq!(response.result.score, 85);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_classifier_failure_falls_back_once() {
        let stub = StubClassifier::new(malformed);
        let dispatcher = Dispatcher::new(stub.clone(), Duration::from_secs(1));

        let response = dispatcher.analyze(TEXT, Some("sk-test")).await;
        assert!(response.success);
        assert!(!response.ai_powered);
        assert_eq!(response.result, score_text(TEXT));
        // No retries
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_classifier_times_out() {
        let stub = Arc::new(StubClassifier {
            outcome: ai_verdict,
            delay: Duration::from_secs(5),
            calls: AtomicUsize::new(0),
        });
        let dispatcher = Dispatcher::new(stub, Duration::from_millis(50));

        let response = dispatcher.analyze(TEXT, Some("sk-test")).await;
        assert!(!response.ai_powered);
        assert_eq!(response.result, score_text(TEXT));
    }

    #[tokio::test]
    async fn test_timestamp_is_rfc3339() {
        let dispatcher = Dispatcher::new(StubClassifier::new(ai_verdict), Duration::from_secs(1));
        let response = dispatcher.analyze(TEXT, None).await;
        assert!(chrono::DateTime::parse_from_rfc3339(&response.timestamp).is_ok());
        assert!(response.timestamp.ends_with('Z'));
    }
}
