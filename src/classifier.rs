// src/classifier.rs
//! Fallback classification for questions the catalog cannot answer.
//!
//! Rules come from TOML (`config/fallback.toml` is embedded as the default) and
//! are checked in file order; the first rule with any keyword contained in the
//! lower-cased question wins. When nothing matches, the `[default]` outcome
//! (always `portfolio`) applies, so `classify` is total.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::RulesError;

pub const BUILTIN_RULES_TOML: &str = include_str!("../config/fallback.toml");

static BUILTIN: Lazy<Classifier> = Lazy::new(|| {
    Classifier::from_toml_str(BUILTIN_RULES_TOML).expect("valid built-in fallback rules")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationType {
    Personal,
    Market,
    FinancialAdvice,
    Portfolio,
}

impl ClassificationType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ClassificationType::Personal => "personal",
            ClassificationType::Market => "market",
            ClassificationType::FinancialAdvice => "financial_advice",
            ClassificationType::Portfolio => "portfolio",
        }
    }
}

/// Outcome of classifying an unmatched question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    #[serde(rename = "type")]
    pub kind: ClassificationType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_text: Option<String>,
}

/* ----------------------------
Config schema (from TOML)
---------------------------- */

/// Kinds a keyword rule may produce. `portfolio` is reserved for the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Personal,
    Market,
    FinancialAdvice,
}

impl From<RuleKind> for ClassificationType {
    fn from(k: RuleKind) -> Self {
        match k {
            RuleKind::Personal => ClassificationType::Personal,
            RuleKind::Market => ClassificationType::Market,
            RuleKind::FinancialAdvice => ClassificationType::FinancialAdvice,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RulesRoot {
    #[serde(default)]
    pub rules: Vec<RuleCfg>,
    pub default: DefaultCfg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleCfg {
    pub kind: RuleKind,
    pub keywords: Vec<String>,
    pub message: String,
    #[serde(default)]
    pub action_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultCfg {
    pub message: String,
    #[serde(default)]
    pub action_text: Option<String>,
}

/* ----------------------------
Classifier
---------------------------- */

#[derive(Debug, Clone)]
struct Rule {
    outcome: Classification,
    keywords: Vec<String>, // lower-cased
}

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
    fallback: Classification,
}

impl Classifier {
    /// The rule set embedded in the binary.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, RulesError> {
        let cfg: RulesRoot = toml::from_str(raw)?;

        let rules = cfg
            .rules
            .into_iter()
            .map(|r| {
                let kind = ClassificationType::from(r.kind);
                if r.keywords.is_empty() {
                    return Err(RulesError::EmptyRule(kind.as_str()));
                }
                if r.keywords.iter().any(|k| k.is_empty()) {
                    return Err(RulesError::EmptyKeyword(kind.as_str()));
                }
                Ok(Rule {
                    outcome: Classification {
                        kind,
                        message: r.message,
                        action_text: r.action_text,
                    },
                    keywords: r.keywords.iter().map(|k| k.to_lowercase()).collect(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            fallback: Classification {
                kind: ClassificationType::Portfolio,
                message: cfg.default.message,
                action_text: cfg.default.action_text,
            },
        })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Classify a question. Never fails; every input lands in exactly one outcome.
    pub fn classify(&self, question: &str) -> Classification {
        let q = question.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.keywords.iter().any(|k| q.contains(k.as_str())))
            .map(|r| r.outcome.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(q: &str) -> ClassificationType {
        Classifier::builtin().classify(q).kind
    }

    #[test]
    fn personal_questions() {
        let c = Classifier::builtin().classify("Who is my financial advisor?");
        assert_eq!(c.kind, ClassificationType::Personal);
        assert_eq!(c.action_text.as_deref(), Some("View Account Details"));
        assert!(c.message.contains("personal account information"));
        assert_eq!(kind("What EMAIL do you have on file?"), ClassificationType::Personal);
    }

    #[test]
    fn market_questions() {
        let c = Classifier::builtin().classify("Is the Fed cutting?");
        assert_eq!(c.kind, ClassificationType::Market);
        assert_eq!(c.action_text.as_deref(), Some("Open Market Data"));
        assert_eq!(kind("when will rates fall"), ClassificationType::Market);
    }

    #[test]
    fn advice_questions() {
        let c = Classifier::builtin().classify("Should I sell my Tesla position?");
        assert_eq!(c.kind, ClassificationType::FinancialAdvice);
        assert_eq!(c.action_text.as_deref(), Some("Track Review Status"));
        assert!(c.message.contains("review queue"));
    }

    #[test]
    fn first_rule_wins() {
        // "advisor" (personal) and "recommend" (advice) both present
        assert_eq!(
            kind("Can my advisor recommend a rebalance?"),
            ClassificationType::Personal
        );
        // "fed" (market) beats "should i" (advice)
        assert_eq!(kind("Should I worry about the Fed?"), ClassificationType::Market);
    }

    #[test]
    fn default_is_portfolio_and_total() {
        for q in ["", "   ", "how many shares do i own", "🤔", "{x}"] {
            let c = Classifier::builtin().classify(q);
            assert_eq!(c.kind, ClassificationType::Portfolio, "q={q:?}");
            assert_eq!(c.action_text.as_deref(), Some("Contact Advisor"));
        }
    }

    #[test]
    fn custom_rules_respect_file_order() {
        const TOML: &str = r#"
[[rules]]
kind = "financial_advice"
keywords = ["Advisor"]
message = "queued"

[[rules]]
kind = "personal"
keywords = ["advisor"]
message = "account"

[default]
message = "later"
"#;
        let c = Classifier::from_toml_str(TOML).expect("load");
        assert_eq!(c.rule_count(), 2);
        let out = c.classify("who is my advisor");
        assert_eq!(out.kind, ClassificationType::FinancialAdvice);
        assert_eq!(out.action_text, None);
        assert_eq!(c.classify("hello").message, "later");
    }

    #[test]
    fn rejects_bad_rules() {
        let empty = r#"
[[rules]]
kind = "market"
keywords = []
message = "m"

[default]
message = "d"
"#;
        assert!(matches!(
            Classifier::from_toml_str(empty),
            Err(RulesError::EmptyRule("market"))
        ));

        let blank = empty.replace("keywords = []", r#"keywords = ["fed", ""]"#);
        assert!(matches!(
            Classifier::from_toml_str(&blank),
            Err(RulesError::EmptyKeyword("market"))
        ));

        // portfolio is reserved for [default]
        let portfolio = empty.replace(r#"kind = "market""#, r#"kind = "portfolio""#);
        assert!(matches!(
            Classifier::from_toml_str(&portfolio),
            Err(RulesError::Parse(_))
        ));
    }

    #[test]
    fn classification_serializes_type_tag() {
        let v = serde_json::to_value(Classifier::builtin().classify("sell?")).expect("json");
        assert_eq!(v["type"], "financial_advice");
        assert_eq!(v["actionText"], "Track Review Status");
    }
}
