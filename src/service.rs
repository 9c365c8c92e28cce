// src/service.rs
//! Question answering: catalog match first, fallback classification second.

use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{AnswerData, AnswerRecord, Catalog, FallbackData};
use crate::classifier::{Classification, ClassificationType, Classifier};
use crate::matcher::{find_best_match, Confidence, MatchResult, Placeholders};
use crate::telemetry;

pub const FALLBACK_CATEGORY: &str = "Fallback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    Matched,
    Review,
    NoMatch,
}

impl QuestionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            QuestionStatus::Matched => "matched",
            QuestionStatus::Review => "review",
            QuestionStatus::NoMatch => "no_match",
        }
    }
}

/// Answer as returned to clients. `answerType` is the catalog type for real
/// records and the classification type for fallback records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub answer_type: &'static str,
    pub data: AnswerData,
}

impl From<&AnswerRecord> for AnswerView {
    fn from(r: &AnswerRecord) -> Self {
        Self {
            id: r.id.clone(),
            title: r.title.clone(),
            content: r.content.clone(),
            category: r.category.clone(),
            answer_type: r.answer_type.as_str(),
            data: r.data.clone(),
        }
    }
}

/// Synthetic answer for an unmatched question. Advice questions go to review
/// and get none.
pub fn fallback_answer(c: &Classification) -> Option<AnswerView> {
    let title = match c.kind {
        ClassificationType::Personal => "Account Information",
        ClassificationType::Market => "Market Data",
        ClassificationType::Portfolio => "Portfolio Analysis",
        ClassificationType::FinancialAdvice => return None,
    };
    Some(AnswerView {
        id: format!("fallback-{}", c.kind.as_str()),
        title: title.to_string(),
        content: c.message.clone(),
        category: Some(FALLBACK_CATEGORY.to_string()),
        answer_type: c.kind.as_str(),
        data: AnswerData::Fallback(FallbackData {
            fallback_type: c.kind,
            action_text: c.action_text.clone(),
            is_unmatched: true,
        }),
    })
}

#[derive(Debug, Clone)]
pub enum QuestionOutcome<'a> {
    Matched(MatchResult<'a>),
    Unmatched(Classification),
}

impl QuestionOutcome<'_> {
    pub fn status(&self) -> QuestionStatus {
        match self {
            QuestionOutcome::Matched(_) => QuestionStatus::Matched,
            QuestionOutcome::Unmatched(c) if c.kind == ClassificationType::FinancialAdvice => {
                QuestionStatus::Review
            }
            QuestionOutcome::Unmatched(_) => QuestionStatus::NoMatch,
        }
    }

    pub fn confidence(&self) -> Option<Confidence> {
        match self {
            QuestionOutcome::Matched(m) => Some(m.confidence),
            QuestionOutcome::Unmatched(_) => None,
        }
    }

    /// Human readable status line for the response envelope.
    pub fn message(&self) -> String {
        match self {
            QuestionOutcome::Matched(m) => {
                format!("Found {} confidence match", m.confidence.as_str())
            }
            QuestionOutcome::Unmatched(c) => c.message.clone(),
        }
    }

    pub fn answer(&self) -> Option<AnswerView> {
        match self {
            QuestionOutcome::Matched(m) => Some(AnswerView::from(m.answer)),
            QuestionOutcome::Unmatched(c) => fallback_answer(c),
        }
    }
}

/// Shared, read-only question answering state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct QuestionService {
    catalog: Arc<Catalog>,
    classifier: Arc<Classifier>,
}

impl QuestionService {
    pub fn new(catalog: Catalog, classifier: Classifier) -> Self {
        Self {
            catalog: Arc::new(catalog),
            classifier: Arc::new(classifier),
        }
    }

    /// Embedded catalog and rules.
    pub fn builtin() -> Self {
        Self::new(Catalog::builtin(), Classifier::builtin())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Match against the catalog; classify the raw question when nothing scores.
    pub fn answer(&self, question: &str, placeholders: Option<&Placeholders>) -> QuestionOutcome<'_> {
        let outcome = match find_best_match(&self.catalog, question, placeholders) {
            Some(m) => QuestionOutcome::Matched(m),
            None => QuestionOutcome::Unmatched(self.classifier.classify(question)),
        };

        metrics::counter!("qa_questions_total", "status" => outcome.status().as_str())
            .increment(1);
        if let Some(c) = outcome.confidence() {
            metrics::counter!("qa_confidence_total", "confidence" => c.as_str()).increment(1);
        }
        telemetry::dev_log_question(question, placeholders, &outcome);

        outcome
    }
}

impl Default for QuestionService {
    fn default() -> Self {
        Self::builtin()
    }
}
