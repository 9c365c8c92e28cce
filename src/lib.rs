// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod content;
pub mod error;
pub mod matcher;
pub mod metrics;
pub mod service;
pub mod telemetry;

pub use crate::api::{router, AppState};
pub use crate::catalog::{AnswerData, AnswerRecord, AnswerType, Catalog};
pub use crate::classifier::{Classification, ClassificationType, Classifier};
pub use crate::matcher::{find_best_match, Confidence, MatchResult, Placeholders};
pub use crate::service::{QuestionOutcome, QuestionService, QuestionStatus};
