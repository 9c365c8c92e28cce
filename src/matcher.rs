// src/matcher.rs
//! Question → catalog answer matching.
//!
//! A linear scan scoring plain substring hits against the lower-cased question:
//! - +100 when the record title contains the whole processed question
//! - +10 per keyword contained in the question
//! - +20 when the category is contained in the question
//! - +15 when the answer type wire name is contained in the question
//!
//! The highest score wins (earlier records win ties); below [`MIN_SCORE`] there is
//! no match. Pure and total: any `&str`, including the empty string, is accepted.

use indexmap::IndexMap;
use regex::{NoExpand, Regex};
use serde::Serialize;

use crate::catalog::{AnswerRecord, Catalog, SearchKey};

pub const TITLE_WEIGHT: u32 = 100;
pub const KEYWORD_WEIGHT: u32 = 10;
pub const CATEGORY_WEIGHT: u32 = 20;
pub const ANSWER_TYPE_WEIGHT: u32 = 15;

pub const MIN_SCORE: u32 = 10;
pub const MEDIUM_SCORE: u32 = 25;
pub const HIGH_SCORE: u32 = 50;

/// Placeholder values keyed by name; substitution follows insertion order.
pub type Placeholders = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Tier for a winning score; `None` when the score is below the match threshold.
    pub fn from_score(score: u32) -> Option<Self> {
        match score {
            s if s >= HIGH_SCORE => Some(Confidence::High),
            s if s >= MEDIUM_SCORE => Some(Confidence::Medium),
            s if s >= MIN_SCORE => Some(Confidence::Low),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    pub answer: &'a AnswerRecord,
    pub score: u32,
    pub confidence: Confidence,
}

/// Lower-case the question and replace every `{key}` (case-insensitive) with the
/// lower-cased value, one key at a time in insertion order.
pub fn preprocess_question(question: &str, placeholders: Option<&Placeholders>) -> String {
    let mut processed = question.to_lowercase();
    let Some(placeholders) = placeholders else {
        return processed;
    };

    for (key, value) in placeholders {
        let pattern = format!(r"(?i)\{{{}\}}", regex::escape(key));
        // Keys are escaped, so only pathological sizes can fail to compile.
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        let value = value.to_lowercase();
        processed = re
            .replace_all(&processed, NoExpand(value.as_str()))
            .into_owned();
    }
    processed
}

/// Score one record against an already processed (lower-cased) question.
pub fn score_record(record: &AnswerRecord, processed: &str) -> u32 {
    score_entry(record, &SearchKey::of(record), processed)
}

fn score_entry(record: &AnswerRecord, key: &SearchKey, processed: &str) -> u32 {
    let mut score = 0;

    // Title must contain the entire question, not the other way round.
    if key.title.contains(processed) {
        score += TITLE_WEIGHT;
    }

    score += KEYWORD_WEIGHT * matched_keywords(record, processed).count() as u32;

    if let Some(category) = key.category.as_deref().filter(|c| !c.is_empty()) {
        if processed.contains(category) {
            score += CATEGORY_WEIGHT;
        }
    }

    if processed.contains(record.answer_type.as_str()) {
        score += ANSWER_TYPE_WEIGHT;
    }

    score
}

/// Keywords of `record` contained in the processed question, in record order.
pub fn matched_keywords<'r>(
    record: &'r AnswerRecord,
    processed: &'r str,
) -> impl Iterator<Item = &'r str> + 'r {
    record
        .keywords
        .iter()
        .map(String::as_str)
        .filter(move |kw| processed.contains(kw))
}

/// Find the best scoring record for a question.
pub fn find_best_match<'a>(
    catalog: &'a Catalog,
    question: &str,
    placeholders: Option<&Placeholders>,
) -> Option<MatchResult<'a>> {
    let processed = preprocess_question(question, placeholders);

    let mut best: Option<&AnswerRecord> = None;
    let mut highest = 0u32;
    for (record, key) in catalog.entries() {
        let score = score_entry(record, key, &processed);
        if score > highest {
            highest = score;
            best = Some(record);
        }
    }

    let answer = best?;
    let confidence = Confidence::from_score(highest)?;
    Some(MatchResult {
        answer,
        score: highest,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AnswerData, AnswerType, Tax};

    fn rec(id: &str, title: &str, category: Option<&str>, keywords: &[&str]) -> AnswerRecord {
        AnswerRecord {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("{id} content"),
            category: category.map(str::to_string),
            answer_type: AnswerType::Tax,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            data: AnswerData::Tax(Tax {
                tax_advantaged: 0.0,
                tax_loss_harvesting: 0.0,
                municipal_income: 0.0,
                effective_tax_rate: 0.0,
                marginal_tax_rate: 0.0,
                account_types: Vec::new(),
            }),
        }
    }

    fn catalog(records: Vec<AnswerRecord>) -> Catalog {
        Catalog::from_records(records).expect("valid test catalog")
    }

    fn placeholders(pairs: &[(&str, &str)]) -> Placeholders {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn confidence_tiers() {
        assert_eq!(Confidence::from_score(0), None);
        assert_eq!(Confidence::from_score(9), None);
        assert_eq!(Confidence::from_score(10), Some(Confidence::Low));
        assert_eq!(Confidence::from_score(24), Some(Confidence::Low));
        assert_eq!(Confidence::from_score(25), Some(Confidence::Medium));
        assert_eq!(Confidence::from_score(49), Some(Confidence::Medium));
        assert_eq!(Confidence::from_score(50), Some(Confidence::High));
        assert_eq!(Confidence::from_score(165), Some(Confidence::High));
    }

    #[test]
    fn unique_keyword_selects_its_record() {
        let cat = catalog(vec![
            rec("a", "Alpha", None, &["alpha"]),
            rec("b", "Beta", None, &["beta"]),
        ]);
        let m = find_best_match(&cat, "Tell me about BETA", None).expect("match");
        assert_eq!(m.answer.id, "b");
        assert_eq!(m.score, 10);
        assert_eq!(m.confidence, Confidence::Low);
    }

    #[test]
    fn below_threshold_is_absent() {
        let cat = catalog(vec![rec("a", "Alpha", None, &["alpha"])]);
        assert!(find_best_match(&cat, "nothing relevant here", None).is_none());
    }

    #[test]
    fn ties_go_to_the_earlier_record() {
        let cat = catalog(vec![
            rec("first", "One", None, &["shared"]),
            rec("second", "Two", None, &["shared"]),
        ]);
        let m = find_best_match(&cat, "shared", None).expect("match");
        assert_eq!(m.answer.id, "first");
    }

    #[test]
    fn every_keyword_counts() {
        let cat = catalog(vec![rec("a", "Alpha", None, &["div", "dividend", "end"])]);
        // "dividend" contains all three keywords
        let m = find_best_match(&cat, "dividend", None).expect("match");
        assert_eq!(m.score, 30);
        assert_eq!(m.confidence, Confidence::Medium);
    }

    #[test]
    fn category_and_answer_type_bonuses() {
        let cat = catalog(vec![rec("a", "Alpha", Some("Income"), &["zzz"])]);
        let processed = preprocess_question("Income TAX", None);
        assert_eq!(score_record(&cat.answers()[0], &processed), 35);
    }

    #[test]
    fn blank_category_earns_no_bonus() {
        let cat = catalog(vec![rec("blank", "Alpha", Some(""), &["zzz"])]);
        assert!(find_best_match(&cat, "completely unrelated question", None).is_none());

        // records built outside a catalog are guarded too
        let r = rec("blank", "Alpha", Some(""), &["zzz"]);
        assert_eq!(score_record(&r, "completely unrelated question"), 0);
    }

    #[test]
    fn matched_keywords_in_record_order() {
        let r = rec("a", "Alpha", None, &["ytd", "return", "s&p"]);
        let hits: Vec<_> = matched_keywords(&r, "s&p vs ytd").collect();
        assert_eq!(hits, vec!["ytd", "s&p"]);
    }

    #[test]
    fn title_bonus_requires_title_to_contain_question() {
        let r = rec("t", "Tax Efficiency Analysis", None, &["zzz"]);
        assert_eq!(score_record(&r, "efficiency"), TITLE_WEIGHT);
        // longer question: no title bonus, only the answer type hit
        assert_eq!(
            score_record(&r, "tax efficiency analysis please"),
            ANSWER_TYPE_WEIGHT
        );
    }

    #[test]
    fn placeholders_substitute_before_scoring() {
        let p = placeholders(&[("account", "401K")]);
        assert_eq!(
            preprocess_question("show {account} performance", Some(&p)),
            "show 401k performance"
        );
        // keys match case-insensitively, every occurrence is replaced
        let p = placeholders(&[("Account", "IRA")]);
        assert_eq!(
            preprocess_question("{ACCOUNT} vs {account}", Some(&p)),
            "ira vs ira"
        );
    }

    #[test]
    fn placeholders_apply_in_insertion_order() {
        let chained = placeholders(&[("a", "{b}"), ("b", "x")]);
        assert_eq!(preprocess_question("{a}", Some(&chained)), "x");

        let reversed = placeholders(&[("b", "x"), ("a", "{b}")]);
        assert_eq!(preprocess_question("{a}", Some(&reversed)), "{b}");
    }

    #[test]
    fn placeholder_values_are_literal() {
        let p = placeholders(&[("amt", "$1 (.*)"), ("k.*", "no")]);
        assert_eq!(
            preprocess_question("{amt} and {kx}", Some(&p)),
            "$1 (.*) and {kx}"
        );
    }

    #[test]
    fn builtin_ytd_question_is_high_confidence() {
        let cat = Catalog::builtin();
        let m = find_best_match(&cat, "What is my YTD performance vs S&P 500?", None)
            .expect("match");
        assert_eq!(m.answer.id, "ytd-performance-sp500");
        assert!(m.score >= 50, "score {}", m.score);
        assert_eq!(m.confidence, Confidence::High);
    }

    #[test]
    fn builtin_advisor_question_has_no_match() {
        let cat = Catalog::builtin();
        assert!(find_best_match(&cat, "Who is my financial advisor?", None).is_none());
        assert!(find_best_match(&cat, "Should I rebalance?", None).is_none());
    }

    #[test]
    fn builtin_sell_keyword_is_a_low_trading_match() {
        // "sell" is a trading-activity keyword, so this never reaches the classifier
        let cat = Catalog::builtin();
        let m = find_best_match(&cat, "Should I sell my Tesla position?", None).expect("match");
        assert_eq!(m.answer.id, "trading-activity");
        assert_eq!(m.score, 10);
        assert_eq!(m.confidence, Confidence::Low);
    }

    #[test]
    fn builtin_placeholder_changes_the_match() {
        let cat = Catalog::builtin();
        assert!(find_best_match(&cat, "my {account}", None).is_none());

        let p = placeholders(&[("account", "401k")]);
        let m = find_best_match(&cat, "my {account}", Some(&p)).expect("match");
        assert_eq!(m.answer.id, "tax-efficiency");
        assert_eq!(m.confidence, Confidence::Low);
    }

    #[test]
    fn empty_question_is_total() {
        // every title contains the empty string; first record wins the tie
        let cat = Catalog::builtin();
        let m = find_best_match(&cat, "", None).expect("match");
        assert_eq!(m.answer.id, "ytd-performance-sp500");
        assert_eq!(m.score, TITLE_WEIGHT);

        let empty = catalog(Vec::new());
        assert!(find_best_match(&empty, "anything", None).is_none());
    }
}
