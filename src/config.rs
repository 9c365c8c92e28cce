// src/config.rs
//! Environment-driven configuration.
//!
//! - `ANSWER_CATALOG_PATH`: JSON answer catalog (default: embedded `data/answers.json`)
//! - `FALLBACK_RULES_PATH`: TOML fallback rules (default: embedded `config/fallback.toml`)
//!
//! Read once at startup. There is no hot reload.

use anyhow::Context;
use std::path::PathBuf;
use tracing::info;

use crate::catalog::Catalog;
use crate::classifier::Classifier;
use crate::service::QuestionService;

pub const ENV_ANSWER_CATALOG_PATH: &str = "ANSWER_CATALOG_PATH";
pub const ENV_FALLBACK_RULES_PATH: &str = "FALLBACK_RULES_PATH";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub catalog_path: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
}

fn path_from_env(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

impl AppConfig {
    /// Read from the process environment (call `dotenvy::dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            catalog_path: path_from_env(ENV_ANSWER_CATALOG_PATH),
            rules_path: path_from_env(ENV_FALLBACK_RULES_PATH),
        }
    }

    pub fn load_catalog(&self) -> anyhow::Result<Catalog> {
        match &self.catalog_path {
            Some(p) => Catalog::from_path(p)
                .with_context(|| format!("loading answer catalog from {}", p.display())),
            None => Ok(Catalog::builtin()),
        }
    }

    pub fn load_classifier(&self) -> anyhow::Result<Classifier> {
        match &self.rules_path {
            Some(p) => Classifier::from_path(p)
                .with_context(|| format!("loading fallback rules from {}", p.display())),
            None => Ok(Classifier::builtin()),
        }
    }

    /// Load catalog and rules into a ready service.
    pub fn build_service(&self) -> anyhow::Result<QuestionService> {
        let catalog = self.load_catalog()?;
        let classifier = self.load_classifier()?;
        info!(
            target: "portfolio_qa",
            answers = catalog.len(),
            rules = classifier.rule_count(),
            catalog = %self.catalog_path.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "builtin".into()),
            "question service ready"
        );
        Ok(QuestionService::new(catalog, classifier))
    }
}
