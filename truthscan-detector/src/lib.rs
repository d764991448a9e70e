//! truthscan-detector - Fake news detection with an LLM classifier and a keyword fallback.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod classifier;
pub mod credentials;
pub mod datasets;
pub mod dispatcher;
pub mod error;
pub mod heuristic;
pub mod routes;
pub mod types;

pub use classifier::{validate_classification, Classifier, ClassifierError, OpenAiClassifier};
pub use credentials::{CredentialProvider, InMemoryCredentials};
pub use datasets::{parse_csv, DatasetKind, DatasetRow, DatasetStore, Datasets};
pub use dispatcher::Dispatcher;
pub use error::DetectorError;
pub use heuristic::score_text;
pub use routes::{build_router, AppState};
pub use types::{AnalysisDetails, AnalysisResult, Credibility, DetectionResponse, Status};
