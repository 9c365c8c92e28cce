// src/telemetry.rs
//! Tracing setup and the anonymized per-question dev log.
//!
//! Startup and error logs always go through `tracing`. Per-question events are
//! extra: they only fire when `QA_DEV_LOG=1` in a dev environment, and even then
//! carry a short hash of the question, never its text.

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::matcher::{matched_keywords, preprocess_question, Placeholders};
use crate::service::QuestionOutcome;

pub const ENV_DEV_LOG: &str = "QA_DEV_LOG";
pub const DEFAULT_FILTER: &str = "portfolio_qa=info,warn";

const ANON_HASH_LEN: usize = 12;
const LOG_LIST_MAX: usize = 5;

/// Install the global subscriber. `RUST_LOG` overrides [`DEFAULT_FILTER`].
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

/// Dev environment: debug build or SHUTTLE_ENV in {local, development, dev}.
pub fn is_dev_env() -> bool {
    cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        )
}

// QA_DEV_LOG=1 AND dev env
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    on && is_dev_env()
}

/// First 6 bytes of SHA-256 as lowercase hex (12 chars).
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let hex = format!("{:x}", Sha256::digest(text.as_bytes()));
    hex[..ANON_HASH_LEN].to_string()
}

pub(crate) fn truncate_list<'a, I>(items: I, max: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    items.into_iter().take(max).map(str::to_string).collect()
}

/// Anonymized dev log for one answered question. Never logs the question text.
pub(crate) fn dev_log_question(
    question: &str,
    placeholders: Option<&Placeholders>,
    outcome: &QuestionOutcome,
) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(question);
    let status = outcome.status().as_str();
    match outcome {
        QuestionOutcome::Matched(m) => {
            let processed = preprocess_question(question, placeholders);
            let matched = truncate_list(matched_keywords(m.answer, &processed), LOG_LIST_MAX);
            info!(
                target: "portfolio_qa",
                %id, status, answer = %m.answer.id, score = m.score,
                confidence = m.confidence.as_str(),
                matched = ?matched
            );
        }
        QuestionOutcome::Unmatched(c) => info!(
            target: "portfolio_qa",
            %id, status, classification = c.kind.as_str()
        ),
    }
}
