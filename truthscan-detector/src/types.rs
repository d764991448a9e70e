//! Verdict types shared by the heuristic and the classifier.

use serde::{Deserialize, Serialize};

/// Score at or above which credibility drops to medium.
pub const MEDIUM_THRESHOLD: u8 = 30;

/// Score at or above which credibility drops to low.
pub const LOW_THRESHOLD: u8 = 60;

/// Coarse trust rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Credibility {
    High,
    Medium,
    Low,
}

impl Credibility {
    /// Map a suspicion score (0-100, higher = more suspicious) to a rating.
    pub fn from_score(score: u8) -> Self {
        if score < MEDIUM_THRESHOLD {
            Self::High
        } else if score < LOW_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// The status label paired with this rating.
    pub const fn status(self) -> Status {
        match self {
            Self::High => Status::LikelyReal,
            Self::Medium => Status::Questionable,
            Self::Low => Status::LikelyFake,
        }
    }
}

/// User-facing label, one-to-one with [`Credibility`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    LikelyReal,
    Questionable,
    LikelyFake,
}

/// Explanation attached to a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetails {
    /// Whitespace-delimited word count of the input
    pub text_length: usize,
    /// Matched suspicion terms, in vocabulary order
    pub suspicious_keywords: Vec<String>,
    /// Matched reliability terms, in vocabulary order
    pub reliable_indicators: Vec<String>,
}

/// Credibility verdict for one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: u8,
    pub credibility: Credibility,
    pub status: Status,
    pub fake_keywords_found: u32,
    pub reliable_indicators_found: u32,
    pub analysis: AnalysisDetails,
}

/// Response envelope for `POST /detect`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResponse {
    pub success: bool,
    pub result: AnalysisResult,
    pub ai_powered: bool,
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credibility_thresholds() {
        assert_eq!(Credibility::from_score(0), Credibility::High);
        assert_eq!(Credibility::from_score(29), Credibility::High);
        assert_eq!(Credibility::from_score(30), Credibility::Medium);
        assert_eq!(Credibility::from_score(59), Credibility::Medium);
        assert_eq!(Credibility::from_score(60), Credibility::Low);
        assert_eq!(Credibility::from_score(100), Credibility::Low);
    }

    #[test]
    fn test_status_pairing() {
        assert_eq!(Credibility::High.status(), Status::LikelyReal);
        assert_eq!(Credibility::Medium.status(), Status::Questionable);
        assert_eq!(Credibility::Low.status(), Status::LikelyFake);
    }

    #[test]
    fn test_wire_labels() {
        assert_eq!(
            serde_json::to_string(&Status::LikelyFake).unwrap(),
            "\"likely-fake\""
        );
        assert_eq!(serde_json::to_string(&Credibility::Medium).unwrap(), "\"medium\"");
        let status: Status = serde_json::from_str("\"likely-real\"").unwrap();
        assert_eq!(status, Status::LikelyReal);
        assert!(serde_json::from_str::<Credibility>("\"HIGH\"").is_err());
    }

    #[test]
    fn test_result_field_names() {
        let result = AnalysisResult {
            score: 20,
            credibility: Credibility::High,
            status: Status::LikelyReal,
            fake_keywords_found: 0,
            reliable_indicators_found: 0,
            analysis: AnalysisDetails {
                text_length: 3,
                suspicious_keywords: vec![],
                reliable_indicators: vec![],
            },
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["fakeKeywordsFound"], 0);
        assert_eq!(json["reliableIndicatorsFound"], 0);
        assert_eq!(json["analysis"]["textLength"], 3);
        assert!(json["analysis"]["suspiciousKeywords"].is_array());
        assert!(json["analysis"]["reliableIndicators"].is_array());
    }
}
