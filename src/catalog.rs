// src/catalog.rs
//! # Answer Catalog
//!
//! The ordered, read-only collection of pre-authored answers the matcher scores
//! questions against.
//!
//! - Loaded once at startup from JSON (`{"answers": [...]}`, camelCase keys).
//! - A built-in catalog ships embedded in the binary (`data/answers.json`).
//! - Each record's `data` payload is a tagged union keyed by `kind`; every kind
//!   belongs to exactly one [`AnswerType`], and loading rejects mismatches.
//! - Keywords are lower-cased on load so scoring never has to.
//!
//! Nothing mutates a [`Catalog`] after construction; share it behind an `Arc`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::classifier::ClassificationType;
use crate::error::CatalogError;

pub const BUILTIN_CATALOG_JSON: &str = include_str!("../data/answers.json");

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_json_str(BUILTIN_CATALOG_JSON).expect("valid built-in answer catalog")
});

/// Tag selecting the downstream formatter. Wire names are snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    Performance,
    Holdings,
    Risk,
    Allocation,
    Dividend,
    Trading,
    Esg,
    Costs,
    Geographic,
    FixedIncome,
    Alternatives,
    Tax,
}

impl AnswerType {
    pub const fn as_str(self) -> &'static str {
        match self {
            AnswerType::Performance => "performance",
            AnswerType::Holdings => "holdings",
            AnswerType::Risk => "risk",
            AnswerType::Allocation => "allocation",
            AnswerType::Dividend => "dividend",
            AnswerType::Trading => "trading",
            AnswerType::Esg => "esg",
            AnswerType::Costs => "costs",
            AnswerType::Geographic => "geographic",
            AnswerType::FixedIncome => "fixed_income",
            AnswerType::Alternatives => "alternatives",
            AnswerType::Tax => "tax",
        }
    }
}

/// One pre-authored answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub answer_type: AnswerType,
    pub keywords: Vec<String>,
    pub data: AnswerData,
}

/// Structured payload, one variant per dashboard view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerData {
    YtdPerformance(YtdPerformance),
    FactorAttribution(FactorAttribution),
    RollingReturns(RollingReturns),
    PerformanceContributors(PerformanceContributors),
    Holdings(Holdings),
    RiskMetrics(RiskMetrics),
    MarketVolatility(MarketVolatility),
    SharpeAnalysis(SharpeAnalysis),
    ValueAtRisk(ValueAtRisk),
    Correlation(Correlation),
    SectorAllocation(SectorAllocation),
    AssetAllocation(AssetAllocation),
    DividendIncome(DividendIncome),
    DividendGrowth(DividendGrowth),
    TradingActivity(TradingActivity),
    RecentTrades(RecentTrades),
    Esg(Esg),
    Costs(Costs),
    Geographic(Geographic),
    FixedIncome(FixedIncome),
    Alternatives(Alternatives),
    Tax(Tax),
    /// Synthetic payload attached to fallback answers; never valid inside a catalog.
    Fallback(FallbackData),
}

impl AnswerData {
    /// Wire name of the variant (the `kind` tag).
    pub const fn kind(&self) -> &'static str {
        match self {
            AnswerData::YtdPerformance(_) => "ytd_performance",
            AnswerData::FactorAttribution(_) => "factor_attribution",
            AnswerData::RollingReturns(_) => "rolling_returns",
            AnswerData::PerformanceContributors(_) => "performance_contributors",
            AnswerData::Holdings(_) => "holdings",
            AnswerData::RiskMetrics(_) => "risk_metrics",
            AnswerData::MarketVolatility(_) => "market_volatility",
            AnswerData::SharpeAnalysis(_) => "sharpe_analysis",
            AnswerData::ValueAtRisk(_) => "value_at_risk",
            AnswerData::Correlation(_) => "correlation",
            AnswerData::SectorAllocation(_) => "sector_allocation",
            AnswerData::AssetAllocation(_) => "asset_allocation",
            AnswerData::DividendIncome(_) => "dividend_income",
            AnswerData::DividendGrowth(_) => "dividend_growth",
            AnswerData::TradingActivity(_) => "trading_activity",
            AnswerData::RecentTrades(_) => "recent_trades",
            AnswerData::Esg(_) => "esg",
            AnswerData::Costs(_) => "costs",
            AnswerData::Geographic(_) => "geographic",
            AnswerData::FixedIncome(_) => "fixed_income",
            AnswerData::Alternatives(_) => "alternatives",
            AnswerData::Tax(_) => "tax",
            AnswerData::Fallback(_) => "fallback",
        }
    }

    /// The answer type this payload belongs to; `None` for fallback payloads.
    pub const fn answer_type(&self) -> Option<AnswerType> {
        match self {
            AnswerData::YtdPerformance(_)
            | AnswerData::FactorAttribution(_)
            | AnswerData::RollingReturns(_)
            | AnswerData::PerformanceContributors(_) => Some(AnswerType::Performance),
            AnswerData::Holdings(_) => Some(AnswerType::Holdings),
            AnswerData::RiskMetrics(_)
            | AnswerData::MarketVolatility(_)
            | AnswerData::SharpeAnalysis(_)
            | AnswerData::ValueAtRisk(_)
            | AnswerData::Correlation(_) => Some(AnswerType::Risk),
            AnswerData::SectorAllocation(_) | AnswerData::AssetAllocation(_) => {
                Some(AnswerType::Allocation)
            }
            AnswerData::DividendIncome(_) | AnswerData::DividendGrowth(_) => {
                Some(AnswerType::Dividend)
            }
            AnswerData::TradingActivity(_) | AnswerData::RecentTrades(_) => {
                Some(AnswerType::Trading)
            }
            AnswerData::Esg(_) => Some(AnswerType::Esg),
            AnswerData::Costs(_) => Some(AnswerType::Costs),
            AnswerData::Geographic(_) => Some(AnswerType::Geographic),
            AnswerData::FixedIncome(_) => Some(AnswerType::FixedIncome),
            AnswerData::Alternatives(_) => Some(AnswerType::Alternatives),
            AnswerData::Tax(_) => Some(AnswerType::Tax),
            AnswerData::Fallback(_) => None,
        }
    }
}

/* ----------------------------
Payload records
---------------------------- */

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtdPerformance {
    pub portfolio_return: f64,
    pub benchmark_return: f64,
    pub outperformance: f64,
    #[serde(default)]
    pub sharpe_ratio: Option<f64>,
    #[serde(default)]
    pub benchmark_sharpe: Option<f64>,
    #[serde(default)]
    pub top_contributors: Vec<String>,
    #[serde(default)]
    pub chart_data: Vec<MonthlyReturn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReturn {
    pub month: String,
    pub portfolio: f64,
    pub benchmark: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorAttribution {
    pub factor_contributions: Vec<FactorContribution>,
    pub explained_return: f64,
    pub alpha: f64,
    pub total_attribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: String,
    pub contribution: f64,
    pub weight: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingReturns {
    pub current_12_month_return: f64,
    pub periods_outperforming: f64,
    pub best_rolling_period: f64,
    pub worst_rolling_period: f64,
    pub benchmark_worst: f64,
    pub percentile_rank: f64,
    pub rolling_returns: Vec<RollingPeriod>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingPeriod {
    pub end_date: String,
    #[serde(rename = "return")]
    pub return_pct: f64,
    pub benchmark: f64,
    pub excess: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceContributors {
    pub top_contributors: Vec<SecurityContribution>,
    pub top_detractors: Vec<SecurityContribution>,
    pub sector_contribution: f64,
    pub security_selection: f64,
    pub allocation_effect: f64,
    pub total_alpha: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityContribution {
    pub name: String,
    pub symbol: String,
    pub contribution: f64,
    pub weight: f64,
    #[serde(rename = "return")]
    pub return_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holdings {
    pub top_holdings: Vec<Holding>,
    pub total_weight: f64,
    #[serde(rename = "avgPE")]
    pub avg_pe: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub name: String,
    pub symbol: String,
    pub weight: f64,
    #[serde(rename = "return")]
    pub return_pct: f64,
    pub sector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    pub beta: f64,
    pub volatility: f64,
    pub market_volatility: f64,
    pub max_drawdown: f64,
    pub var95: f64,
    pub sharpe_ratio: f64,
    #[serde(default)]
    pub sortino_ratio: Option<f64>,
    pub information_ratio: f64,
    #[serde(default)]
    pub tracking_error: Option<f64>,
    #[serde(default)]
    pub correlation_to_market: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketVolatility {
    pub portfolio_volatility: f64,
    pub market_volatility: f64,
    pub max_drawdown: f64,
    pub recovery_days: u32,
    pub beta: f64,
    pub beta_adjusted_return: f64,
    pub risk_metrics: Vec<RiskComparison>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskComparison {
    pub metric: String,
    pub portfolio: f64,
    pub benchmark: f64,
    pub advantage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharpeAnalysis {
    pub sharpe_ratio: f64,
    pub benchmark_sharpe: f64,
    pub peer_average_sharpe: f64,
    pub sortino_ratio: f64,
    pub information_ratio: f64,
    pub treynor_ratio: f64,
    pub calmar_ratio: f64,
    pub risk_free_rate: f64,
    pub excess_return: f64,
    pub standard_deviation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueAtRisk {
    pub var95_daily: f64,
    pub var95_dollar_amount: f64,
    pub var99_daily: f64,
    pub var99_dollar_amount: f64,
    pub cvar95: f64,
    pub historical_accuracy: f64,
    pub stress_scenarios: Vec<StressScenario>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressScenario {
    pub scenario: String,
    pub portfolio_drawdown: f64,
    pub market_drawdown: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub market_correlation: f64,
    pub international_correlation: f64,
    pub bond_correlation: f64,
    pub avg_intra_correlation: f64,
    pub effective_bets: f64,
    pub market_effective_bets: f64,
    #[serde(default)]
    pub asset_class_correlations: Vec<AssetClassCorrelation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetClassCorrelation {
    pub class1: String,
    pub class2: String,
    pub correlation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorAllocation {
    pub sectors: Vec<SectorWeight>,
    pub excess_return: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorWeight {
    pub name: String,
    pub portfolio: f64,
    pub benchmark: f64,
    pub excess: f64,
    #[serde(rename = "return")]
    pub return_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocation {
    pub equity_allocation: f64,
    pub fixed_income_allocation: f64,
    pub equity_breakdown: Vec<RegionAllocation>,
    pub fixed_income_breakdown: Vec<BondAllocation>,
    pub alternatives: f64,
    pub target_return: f64,
    pub target_volatility: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionAllocation {
    pub region: String,
    pub allocation: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondAllocation {
    #[serde(rename = "type")]
    pub bond_type: String,
    pub allocation: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendIncome {
    pub current_yield: f64,
    pub benchmark_yield: f64,
    pub annual_income: f64,
    pub income_growth: f64,
    pub dividend_stocks: u32,
    pub aristocrats: u32,
    pub forward_growth: f64,
    pub avg_payout_ratio: f64,
    #[serde(default)]
    pub top_dividend_stocks: Vec<DividendPayer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendPayer {
    pub name: String,
    #[serde(rename = "yield")]
    pub yield_pct: f64,
    pub payment: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendGrowth {
    pub aristocrats: u32,
    #[serde(rename = "dividendCAGR5yr")]
    pub dividend_cagr_5yr: f64,
    pub inflation_adjusted_growth: f64,
    pub forward_growth_rate: f64,
    pub avg_payout_ratio: f64,
    pub sustainability_score: f64,
    pub top_growth_stocks: Vec<DividendGrower>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendGrower {
    pub name: String,
    pub symbol: String,
    pub growth_rate: f64,
    pub payout_ratio: f64,
    pub years_growth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            TradeSide::Buy => "Buy",
            TradeSide::Sell => "Sell",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingActivity {
    pub turnover_rate: f64,
    pub total_volume: f64,
    pub transaction_count: u32,
    pub avg_holding_period: f64,
    pub transaction_cost: f64,
    #[serde(default)]
    pub major_trades: Vec<MajorTrade>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorTrade {
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub security: String,
    pub amount: f64,
    pub impact: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTrades {
    pub total_transactions: u32,
    pub total_volume: f64,
    pub purchases: Vec<Execution>,
    pub sales: Vec<Execution>,
    pub net_cash_flow: f64,
    pub avg_execution_quality: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub security: String,
    pub symbol: String,
    pub amount: f64,
    pub shares: i64,
    pub price: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Esg {
    pub overall_score: f64,
    pub benchmark_score: f64,
    pub rating: String,
    pub environmental_score: f64,
    pub social_score: f64,
    pub governance_score: f64,
    pub carbon_intensity: f64,
    pub benchmark_carbon: f64,
    pub carbon_reduction: f64,
    pub sustainable_revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Costs {
    pub avg_expense_ratio: f64,
    pub industry_average: f64,
    pub index_fund_ratio: f64,
    pub active_fund_ratio: f64,
    pub index_allocation: f64,
    pub active_allocation: f64,
    pub total_annual_fees: f64,
    #[serde(default)]
    pub cost_breakdown: Vec<CostLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostLine {
    #[serde(rename = "type")]
    pub fund_type: String,
    pub allocation: f64,
    pub avg_fee: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geographic {
    pub us_exposure: f64,
    pub developed_intl: f64,
    pub emerging_markets: f64,
    pub european_holdings: f64,
    pub asia_pacific: f64,
    pub currency_hedged: f64,
    #[serde(default)]
    pub top_intl_holdings: Vec<IntlHolding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntlHolding {
    pub name: String,
    pub country: String,
    pub weight: f64,
    pub sector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedIncome {
    pub fixed_income_allocation: f64,
    pub duration: f64,
    pub average_credit: String,
    pub current_yield: f64,
    pub annual_income: f64,
    pub government_bonds: f64,
    #[serde(rename = "corporateIG")]
    pub corporate_ig: f64,
    pub high_yield: f64,
    #[serde(default)]
    pub maturity_ladder: Vec<MaturityBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaturityBucket {
    pub year: String,
    pub allocation: f64,
    #[serde(rename = "yield")]
    pub yield_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternatives {
    pub total_alternatives: f64,
    pub reit_allocation: f64,
    pub reit_return: f64,
    pub commodities_allocation: f64,
    pub private_equity_allocation: f64,
    pub performance_contribution: f64,
    #[serde(default)]
    pub alternative_breakdown: Vec<AlternativeSleeve>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeSleeve {
    #[serde(rename = "type")]
    pub sleeve: String,
    pub allocation: f64,
    #[serde(rename = "return")]
    pub return_pct: f64,
    pub income: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tax {
    pub tax_advantaged: f64,
    pub tax_loss_harvesting: f64,
    pub municipal_income: f64,
    pub effective_tax_rate: f64,
    pub marginal_tax_rate: f64,
    #[serde(default)]
    pub account_types: Vec<AccountSleeve>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSleeve {
    #[serde(rename = "type")]
    pub account: String,
    pub allocation: f64,
    pub strategy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackData {
    pub fallback_type: ClassificationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_text: Option<String>,
    pub is_unmatched: bool,
}

/* ----------------------------
Catalog
---------------------------- */

#[derive(Debug, Deserialize)]
struct CatalogFile {
    answers: Vec<AnswerRecord>,
}

/// Lower-cased title and category of one record, computed at load for scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKey {
    pub title: String,
    pub category: Option<String>,
}

impl SearchKey {
    pub fn of(record: &AnswerRecord) -> Self {
        Self {
            title: record.title.to_lowercase(),
            category: record
                .category
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .map(str::to_lowercase),
        }
    }
}

/// Ordered, validated, immutable set of answer records.
#[derive(Debug, Clone)]
pub struct Catalog {
    answers: Vec<AnswerRecord>,
    keys: Vec<SearchKey>,
}

impl Catalog {
    /// The catalog embedded in the binary.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Load from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Load from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::from_records(file.answers)
    }

    /// Validate and normalize records, keeping their order.
    pub fn from_records(mut answers: Vec<AnswerRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(answers.len());

        for (index, rec) in answers.iter_mut().enumerate() {
            if rec.id.trim().is_empty() {
                return Err(CatalogError::EmptyId { index });
            }
            if !seen.insert(rec.id.clone()) {
                return Err(CatalogError::DuplicateId(rec.id.clone()));
            }
            if rec.data.answer_type() != Some(rec.answer_type) {
                return Err(CatalogError::PayloadMismatch {
                    id: rec.id.clone(),
                    declared: rec.answer_type.as_str(),
                    payload: rec.data.kind(),
                });
            }
            for kw in rec.keywords.iter_mut() {
                if kw.is_empty() {
                    return Err(CatalogError::EmptyKeyword { id: rec.id.clone() });
                }
                *kw = kw.to_lowercase();
            }
            // a blank category would be contained in every question
            if rec.category.as_deref().is_some_and(|c| c.trim().is_empty()) {
                rec.category = None;
            }
        }

        let keys = answers.iter().map(SearchKey::of).collect();
        Ok(Self { answers, keys })
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Records paired with their load-time search keys, in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = (&AnswerRecord, &SearchKey)> {
        self.answers.iter().zip(self.keys.iter())
    }

    pub fn get(&self, id: &str) -> Option<&AnswerRecord> {
        self.answers.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn esg_json(id: &str, answer_type: &str, keywords: &str) -> String {
        format!(
            r#"{{"answers": [{{
                "id": "{id}",
                "title": "ESG",
                "content": "c",
                "answerType": "{answer_type}",
                "keywords": {keywords},
                "data": {{
                    "kind": "esg",
                    "overallScore": 8.4, "benchmarkScore": 6.2, "rating": "AAA",
                    "environmentalScore": 8.7, "socialScore": 8.1, "governanceScore": 8.3,
                    "carbonIntensity": 47.2, "benchmarkCarbon": 134.7,
                    "carbonReduction": 65, "sustainableRevenue": 34.2
                }}
            }}]}}"#
        )
    }

    #[test]
    fn builtin_catalog_loads_in_order() {
        let cat = Catalog::builtin();
        assert_eq!(cat.len(), 22);
        assert_eq!(cat.answers()[0].id, "ytd-performance-sp500");
        assert_eq!(cat.answers()[21].id, "dividend-growth");
        assert!(cat.get("value-at-risk").is_some());
        assert!(cat.get("nope").is_none());
    }

    #[test]
    fn builtin_payloads_match_types() {
        for rec in Catalog::builtin().answers() {
            assert_eq!(rec.data.answer_type(), Some(rec.answer_type), "{}", rec.id);
        }
        let bonds = Catalog::builtin();
        let rec = bonds.get("bond-portfolio").expect("bond record");
        assert_eq!(rec.answer_type.as_str(), "fixed_income");
        match &rec.data {
            AnswerData::FixedIncome(fi) => {
                assert_eq!(fi.average_credit, "AA-");
                assert_eq!(fi.corporate_ig, 35.0);
                assert_eq!(fi.maturity_ladder.len(), 5);
            }
            other => panic!("unexpected payload {}", other.kind()),
        }
    }

    #[test]
    fn keywords_are_lowercased_on_load() {
        let raw = esg_json("esg", "esg", r#"["ESG", "Carbon"]"#);
        let cat = Catalog::from_json_str(&raw).expect("load");
        assert_eq!(cat.answers()[0].keywords, vec!["esg", "carbon"]);
    }

    #[test]
    fn rejects_mismatched_payload() {
        let raw = esg_json("esg", "tax", r#"["esg"]"#);
        let err = Catalog::from_json_str(&raw).unwrap_err();
        assert!(
            matches!(err, CatalogError::PayloadMismatch { declared: "tax", payload: "esg", .. }),
            "got {err}"
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let one = Catalog::from_json_str(&esg_json("dup", "esg", r#"["esg"]"#))
            .expect("load")
            .answers()[0]
            .clone();
        let err = Catalog::from_records(vec![one.clone(), one]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(ref id) if id == "dup"));
    }

    #[test]
    fn rejects_empty_keyword_and_id() {
        let err = Catalog::from_json_str(&esg_json("esg", "esg", r#"["esg", ""]"#)).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyKeyword { .. }));

        let err = Catalog::from_json_str(&esg_json(" ", "esg", r#"["esg"]"#)).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyId { index: 0 }));
    }

    #[test]
    fn blank_category_is_dropped_on_load() {
        let raw = esg_json("esg", "esg", r#"["zzz"]"#)
            .replace(r#""title": "ESG","#, r#""title": "ESG Corner", "category": "  ","#);
        let cat = Catalog::from_json_str(&raw).expect("load");
        assert_eq!(cat.answers()[0].category, None);

        let (_, key) = cat.entries().next().expect("entry");
        assert_eq!(
            key,
            &SearchKey {
                title: "esg corner".into(),
                category: None,
            }
        );
    }

    #[test]
    fn search_keys_are_lowercased() {
        let cat = Catalog::builtin();
        let (rec, key) = cat.entries().nth(9).expect("bond entry");
        assert_eq!(rec.id, "bond-portfolio");
        assert_eq!(key.title, "bond portfolio analysis");
        assert_eq!(key.category.as_deref(), Some("fixed income"));
        assert_eq!(cat.entries().count(), cat.len());
    }

    #[test]
    fn rejects_fallback_payload_in_catalog() {
        let raw = r#"{"answers": [{
            "id": "fallback-portfolio", "title": "t", "content": "c",
            "answerType": "tax", "keywords": [],
            "data": { "kind": "fallback", "fallbackType": "portfolio", "isUnmatched": true }
        }]}"#;
        let err = Catalog::from_json_str(raw).unwrap_err();
        assert!(matches!(err, CatalogError::PayloadMismatch { payload: "fallback", .. }));
    }

    #[test]
    fn payload_serializes_with_camel_case_keys() {
        let cat = Catalog::builtin();
        let rec = cat.get("dividend-growth").expect("record");
        let v = serde_json::to_value(&rec.data).expect("serialize");
        assert_eq!(v["kind"], "dividend_growth");
        assert_eq!(v["dividendCAGR5yr"], 9.8);
        assert_eq!(v["topGrowthStocks"][0]["yearsGrowth"], 19);

        let v = serde_json::to_value(rec).expect("serialize record");
        assert_eq!(v["answerType"], "dividend");
    }
}
