// src/content.rs
//! Dashboard view generation: reshapes an answer payload into KPIs, tables,
//! charts, metric cards and highlight lines.
//!
//! One formatter per [`AnswerData`] variant. Payloads without a dedicated view
//! (fallback answers) render the answer text as a single paragraph.

use serde::Serialize;
use serde_json::{json, Value};

use crate::catalog::{
    Alternatives, AnswerData, AssetAllocation, Correlation, Costs, DividendGrowth, DividendIncome,
    Esg, FactorAttribution, FixedIncome, Geographic, Holdings, MarketVolatility,
    PerformanceContributors, RecentTrades, RiskMetrics, RollingReturns, SectorAllocation,
    SharpeAnalysis, Tax, TradeSide, TradingActivity, ValueAtRisk, YtdPerformance,
};

const HOLDINGS_ROWS: usize = 6;
const SECTOR_ROWS: usize = 6;
const CONTRIBUTOR_ROWS: usize = 5;
const TRADE_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub label: String,
    pub value: String,
    pub change: String,
    pub is_positive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
}

/// UI-ready structures for one answer. Empty sections are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kpis: Vec<Kpi>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chart_data: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub table_data: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<MetricCard>,
}

impl GeneratedContent {
    pub fn paragraph(text: &str) -> Self {
        Self {
            paragraph: Some(text.to_string()),
            ..Self::default()
        }
    }
}

/// Build the dashboard view for an answer.
pub fn generate(content: &str, data: &AnswerData) -> GeneratedContent {
    match data {
        AnswerData::YtdPerformance(d) => ytd_performance(d),
        AnswerData::FactorAttribution(d) => factor_attribution(d),
        AnswerData::RollingReturns(d) => rolling_returns(d),
        AnswerData::PerformanceContributors(d) => performance_contributors(d),
        AnswerData::Holdings(d) => holdings(d),
        AnswerData::RiskMetrics(d) => risk_metrics(d),
        AnswerData::MarketVolatility(d) => market_volatility(d),
        AnswerData::SharpeAnalysis(d) => sharpe_analysis(d),
        AnswerData::ValueAtRisk(d) => value_at_risk(d),
        AnswerData::Correlation(d) => correlation(d),
        AnswerData::SectorAllocation(d) => sector_allocation(d),
        AnswerData::AssetAllocation(d) => asset_allocation(d),
        AnswerData::DividendIncome(d) => dividend_income(d),
        AnswerData::DividendGrowth(d) => dividend_growth(d),
        AnswerData::TradingActivity(d) => trading_activity(d),
        AnswerData::RecentTrades(d) => recent_trades(d),
        AnswerData::Esg(d) => esg(d),
        AnswerData::Costs(d) => costs(d),
        AnswerData::Geographic(d) => geographic(d),
        AnswerData::FixedIncome(d) => fixed_income(d),
        AnswerData::Alternatives(d) => alternatives(d),
        AnswerData::Tax(d) => tax(d),
        AnswerData::Fallback(_) => GeneratedContent::paragraph(content),
    }
}

/* ----------------------------
Formatting helpers
---------------------------- */

fn kpi(label: &str, value: impl Into<String>, change: impl Into<String>, is_positive: bool) -> Kpi {
    Kpi {
        label: label.to_string(),
        value: value.into(),
        change: change.into(),
        is_positive,
    }
}

fn metric(label: &str, value: impl Into<String>, subtext: &str) -> MetricCard {
    MetricCard {
        label: label.to_string(),
        value: value.into(),
        subtext: Some(subtext.to_string()),
    }
}

/// `14.7` → `"14.7%"`
fn pct(v: f64) -> String {
    format!("{v}%")
}

/// `14.7` → `"+14.7%"`, `-1.4` → `"-1.4%"`
fn signed_pct(v: f64) -> String {
    if v > 0.0 {
        format!("+{v}%")
    } else {
        format!("{v}%")
    }
}

/// `42300` → `"$42K"` (decimals = 0), `7100` → `"$7.1K"` (decimals = 1)
fn dollars_k(v: f64, decimals: usize) -> String {
    format!("${:.*}K", decimals, v / 1000.0)
}

/// Sign-prefixed thousands: `-95000` → `"-$95K"`.
fn signed_dollars_k(v: f64) -> String {
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}{}", dollars_k(v.abs(), 0))
}

/// Whole dollars with thousands separators: `42300` → `"42,300"`.
fn grouped(v: f64) -> String {
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

/* ----------------------------
Performance
---------------------------- */

fn ytd_performance(d: &YtdPerformance) -> GeneratedContent {
    let sharpe = d
        .sharpe_ratio
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".into());
    let sharpe_change = d
        .benchmark_sharpe
        .map(|b| format!("vs {b} benchmark"))
        .unwrap_or_default();
    let sharpe_positive = d.sharpe_ratio.unwrap_or(0.0) > d.benchmark_sharpe.unwrap_or(0.0);

    let highlights = if d.top_contributors.is_empty() {
        Vec::new()
    } else {
        vec![
            format!(
                "Portfolio outperformed S&P 500 by {} percentage points",
                d.outperformance
            ),
            format!(
                "Top contributing sectors: {}",
                d.top_contributors.join(", ")
            ),
            format!(
                "Risk-adjusted returns superior with Sharpe ratio of {sharpe}"
            ),
        ]
    };

    GeneratedContent {
        kpis: vec![
            kpi(
                "YTD Return",
                signed_pct(d.portfolio_return),
                format!("{} vs S&P", signed_pct(d.outperformance)),
                d.outperformance > 0.0,
            ),
            kpi("Sharpe Ratio", sharpe, sharpe_change, sharpe_positive),
            kpi(
                "S&P 500 Return",
                signed_pct(d.benchmark_return),
                "Benchmark performance",
                d.benchmark_return > 0.0,
            ),
            kpi(
                "Outperformance",
                signed_pct(d.outperformance),
                "Above benchmark",
                true,
            ),
        ],
        chart_data: d
            .chart_data
            .iter()
            .map(|m| json!({ "month": m.month, "portfolio": m.portfolio, "benchmark": m.benchmark }))
            .collect(),
        highlights,
        ..GeneratedContent::default()
    }
}

fn factor_attribution(d: &FactorAttribution) -> GeneratedContent {
    let mut kpis = vec![
        kpi("Explained Return", pct(d.explained_return), "Factor-based", true),
        kpi("True Alpha", pct(d.alpha), "Security selection", d.alpha > 0.0),
        kpi(
            "Total Attribution",
            signed_pct(d.total_attribution),
            "Combined factors",
            true,
        ),
    ];
    let mut highlights = vec![
        format!(
            "{}% of returns explained by intentional factor tilts",
            d.explained_return
        ),
        format!("{}% represents true alpha from security selection", d.alpha),
    ];
    if let Some(top) = d.factor_contributions.first() {
        kpis.push(kpi(
            "Top Factor",
            top.factor.clone(),
            signed_pct(top.contribution),
            true,
        ));
        highlights.push(format!(
            "{} factor contributed most at {}",
            top.factor,
            signed_pct(top.contribution)
        ));
    }

    GeneratedContent {
        kpis,
        table_data: d
            .factor_contributions
            .iter()
            .map(|f| {
                json!({
                    "factor": f.factor,
                    "contribution": signed_pct(f.contribution),
                    "weight": format!("{:.2}", f.weight),
                    "description": f.description,
                    "isPositive": f.contribution > 0.0,
                })
            })
            .collect(),
        highlights,
        ..GeneratedContent::default()
    }
}

fn rolling_returns(d: &RollingReturns) -> GeneratedContent {
    GeneratedContent {
        kpis: vec![
            kpi(
                "Current 12M Return",
                signed_pct(d.current_12_month_return),
                format!("{}th percentile", d.percentile_rank),
                true,
            ),
            kpi(
                "Outperforming Periods",
                pct(d.periods_outperforming),
                "Beat S&P 500",
                d.periods_outperforming > 75.0,
            ),
            kpi(
                "Best Period",
                signed_pct(d.best_rolling_period),
                "Peak performance",
                true,
            ),
            kpi(
                "Worst Period",
                pct(d.worst_rolling_period),
                format!("vs {}% S&P", d.benchmark_worst),
                d.worst_rolling_period > d.benchmark_worst,
            ),
        ],
        chart_data: d
            .rolling_returns
            .iter()
            .map(|p| {
                json!({
                    "date": p.end_date,
                    "portfolio": p.return_pct,
                    "benchmark": p.benchmark,
                    "excess": p.excess,
                })
            })
            .collect(),
        highlights: vec![
            format!(
                "{}% of rolling periods outperformed S&P 500",
                d.periods_outperforming
            ),
            format!(
                "Demonstrated resilience with minimum return of {}% vs market's {}%",
                d.worst_rolling_period, d.benchmark_worst
            ),
            format!(
                "Current 12-month return ranks in {}th percentile",
                d.percentile_rank
            ),
        ],
        ..GeneratedContent::default()
    }
}

fn performance_contributors(d: &PerformanceContributors) -> GeneratedContent {
    let row = |s: &crate::catalog::SecurityContribution, positive: bool| {
        json!({
            "name": s.name,
            "symbol": s.symbol,
            "contribution": signed_pct(s.contribution),
            "weight": pct(s.weight),
            "return": signed_pct(s.return_pct),
            "isPositive": positive,
        })
    };

    let mut table_data: Vec<Value> = d
        .top_contributors
        .iter()
        .take(CONTRIBUTOR_ROWS)
        .map(|s| row(s, true))
        .collect();
    table_data.extend(d.top_detractors.iter().map(|s| row(s, false)));

    let mut highlights = Vec::with_capacity(3);
    if let Some(lead) = d.top_contributors.first() {
        highlights.push(format!(
            "{} led contribution at {}",
            lead.name,
            signed_pct(lead.contribution)
        ));
    }
    highlights.push(format!(
        "Security selection in Technology added {}",
        signed_pct(d.security_selection)
    ));
    highlights.push(format!(
        "Active positions generated {} of alpha",
        signed_pct(d.total_alpha)
    ));

    GeneratedContent {
        kpis: vec![
            kpi(
                "Sector Contribution",
                signed_pct(d.sector_contribution),
                "From sectors",
                true,
            ),
            kpi(
                "Security Selection",
                signed_pct(d.security_selection),
                "Stock picking",
                d.security_selection > 0.0,
            ),
            kpi(
                "Allocation Effect",
                signed_pct(d.allocation_effect),
                "Positioning",
                d.allocation_effect > 0.0,
            ),
            kpi("Total Alpha", signed_pct(d.total_alpha), "Active return", true),
        ],
        table_data,
        highlights,
        ..GeneratedContent::default()
    }
}

/* ----------------------------
Holdings
---------------------------- */

fn holdings(d: &Holdings) -> GeneratedContent {
    let top: Vec<_> = d.top_holdings.iter().take(HOLDINGS_ROWS).collect();

    let mut highlights = Vec::with_capacity(3);
    if let Some(first) = top.first() {
        highlights.push(format!("Top holding: {} at {}%", first.name, first.weight));
    }
    let tech = top.iter().filter(|h| h.sector == "Technology").count();
    highlights.push(format!("Technology represents {tech} of top 10"));
    // first-seen wins on equal returns
    let best = top.iter().copied().reduce(|best, cur| {
        if cur.return_pct > best.return_pct {
            cur
        } else {
            best
        }
    });
    if let Some(best) = best {
        highlights.push(format!(
            "Best performer: {} ({})",
            best.name,
            signed_pct(best.return_pct)
        ));
    }

    GeneratedContent {
        kpis: vec![
            kpi("Top 10 Weight", pct(d.total_weight), "of portfolio", true),
            kpi("Average P/E", format!("{}x", d.avg_pe), "Quality growth", true),
            kpi(
                "Contribution",
                signed_pct(d.contribution),
                "to performance",
                true,
            ),
            kpi(
                "Holdings Count",
                d.top_holdings.len().to_string(),
                "Top positions",
                true,
            ),
        ],
        table_data: top
            .iter()
            .map(|h| {
                json!({
                    "name": h.name,
                    "symbol": h.symbol,
                    "weight": pct(h.weight),
                    "return": signed_pct(h.return_pct),
                    "sector": h.sector,
                    "isPositive": h.return_pct > 0.0,
                })
            })
            .collect(),
        highlights,
        ..GeneratedContent::default()
    }
}

/* ----------------------------
Risk
---------------------------- */

fn risk_metrics(d: &RiskMetrics) -> GeneratedContent {
    let metrics = match d.sortino_ratio {
        Some(sortino) => vec![
            metric("Sortino Ratio", sortino.to_string(), "Downside risk focus"),
            metric(
                "Market Correlation",
                d.correlation_to_market
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "N/A".into()),
                "Diversification measure",
            ),
        ],
        None => Vec::new(),
    };

    GeneratedContent {
        kpis: vec![
            kpi("Portfolio Beta", d.beta.to_string(), "vs market 1.0", d.beta < 1.2),
            kpi(
                "Volatility",
                pct(d.volatility),
                format!("vs {}% market", d.market_volatility),
                d.volatility < d.market_volatility,
            ),
            kpi(
                "Max Drawdown",
                pct(d.max_drawdown),
                "12-month worst",
                d.max_drawdown > -15.0,
            ),
            kpi("Value at Risk", pct(d.var95), "95% confidence", d.var95 > -5.0),
            kpi(
                "Sharpe Ratio",
                d.sharpe_ratio.to_string(),
                "Risk-adj return",
                d.sharpe_ratio > 1.0,
            ),
            kpi(
                "Information Ratio",
                d.information_ratio.to_string(),
                d.tracking_error
                    .map(|te| format!("TE: {te}%"))
                    .unwrap_or_default(),
                d.information_ratio > 0.0,
            ),
        ],
        metrics,
        ..GeneratedContent::default()
    }
}

fn market_volatility(d: &MarketVolatility) -> GeneratedContent {
    GeneratedContent {
        kpis: vec![
            kpi(
                "Volatility",
                pct(d.portfolio_volatility),
                format!("vs {}% market", d.market_volatility),
                d.portfolio_volatility < d.market_volatility,
            ),
            kpi(
                "Max Drawdown",
                pct(d.max_drawdown),
                format!("Recovered in {} days", d.recovery_days),
                d.max_drawdown > -15.0,
            ),
            kpi("Portfolio Beta", d.beta.to_string(), "vs market 1.0", d.beta < 1.2),
            kpi(
                "Beta-Adjusted Return",
                signed_pct(d.beta_adjusted_return),
                "Alpha after beta",
                d.beta_adjusted_return > 0.0,
            ),
        ],
        table_data: d
            .risk_metrics
            .iter()
            .map(|m| {
                json!({
                    "metric": m.metric,
                    "portfolio": m.portfolio.to_string(),
                    "benchmark": m.benchmark.to_string(),
                    "advantage": m.advantage,
                    "isPositive": m.advantage.ends_with("Better") || m.advantage == "Lower",
                })
            })
            .collect(),
        highlights: vec![
            format!(
                "Volatility of {}% versus the S&P 500's {}%",
                d.portfolio_volatility, d.market_volatility
            ),
            format!(
                "Drawdown of {}% recovered within {} days",
                d.max_drawdown, d.recovery_days
            ),
            format!(
                "{} excess return after accounting for {} beta",
                signed_pct(d.beta_adjusted_return),
                d.beta
            ),
        ],
        ..GeneratedContent::default()
    }
}

fn sharpe_analysis(d: &SharpeAnalysis) -> GeneratedContent {
    GeneratedContent {
        kpis: vec![
            kpi(
                "Sharpe Ratio",
                d.sharpe_ratio.to_string(),
                format!("vs {} S&P", d.benchmark_sharpe),
                d.sharpe_ratio > d.benchmark_sharpe,
            ),
            kpi(
                "Sortino Ratio",
                d.sortino_ratio.to_string(),
                "Downside focus",
                d.sortino_ratio > 1.5,
            ),
            kpi(
                "Information Ratio",
                d.information_ratio.to_string(),
                "Alpha consistency",
                d.information_ratio > 0.5,
            ),
            kpi(
                "Peer Average",
                d.peer_average_sharpe.to_string(),
                "Comparison",
                false,
            ),
        ],
        metrics: vec![
            metric("Treynor Ratio", d.treynor_ratio.to_string(), "Risk-adjusted vs beta"),
            metric("Calmar Ratio", d.calmar_ratio.to_string(), "Return vs drawdown"),
            metric("Excess Return", pct(d.excess_return), "Above risk-free rate"),
            metric("Std Deviation", pct(d.standard_deviation), "Volatility measure"),
        ],
        highlights: vec![
            format!(
                "Sharpe ratio of {} exceeds S&P 500 ({}) and peers ({})",
                d.sharpe_ratio, d.benchmark_sharpe, d.peer_average_sharpe
            ),
            format!(
                "Sortino ratio of {} shows strong downside risk management",
                d.sortino_ratio
            ),
            format!(
                "Information ratio of {} demonstrates consistent alpha generation",
                d.information_ratio
            ),
        ],
        ..GeneratedContent::default()
    }
}

fn value_at_risk(d: &ValueAtRisk) -> GeneratedContent {
    let mut highlights = vec![format!(
        "95% confidence daily losses won't exceed {}%",
        d.var95_daily
    )];
    let worst = d.stress_scenarios.iter().reduce(|worst, cur| {
        if cur.portfolio_drawdown < worst.portfolio_drawdown {
            cur
        } else {
            worst
        }
    });
    if let Some(worst) = worst {
        highlights.push(format!(
            "Stress testing shows maximum potential drawdown of {}% vs market's {}%",
            worst.portfolio_drawdown, worst.market_drawdown
        ));
    }
    highlights.push(format!(
        "Model accuracy of {}% validates risk estimates",
        d.historical_accuracy
    ));

    GeneratedContent {
        kpis: vec![
            kpi(
                "VaR (95%)",
                pct(d.var95_daily),
                dollars_k(d.var95_dollar_amount, 0),
                d.var95_daily > -3.0,
            ),
            kpi(
                "VaR (99%)",
                pct(d.var99_daily),
                dollars_k(d.var99_dollar_amount, 0),
                d.var99_daily > -5.0,
            ),
            kpi(
                "CVaR (95%)",
                pct(d.cvar95),
                "Expected shortfall",
                d.cvar95 > -4.0,
            ),
            kpi(
                "Model Accuracy",
                pct(d.historical_accuracy),
                "Backtest results",
                d.historical_accuracy > 90.0,
            ),
        ],
        table_data: d
            .stress_scenarios
            .iter()
            .map(|s| {
                json!({
                    "scenario": s.scenario,
                    "portfolioDrawdown": pct(s.portfolio_drawdown),
                    "marketDrawdown": pct(s.market_drawdown),
                    "isPositive": s.portfolio_drawdown > s.market_drawdown,
                })
            })
            .collect(),
        highlights,
        ..GeneratedContent::default()
    }
}

fn correlation(d: &Correlation) -> GeneratedContent {
    GeneratedContent {
        kpis: vec![
            kpi(
                "Market Correlation",
                d.market_correlation.to_string(),
                "S&P 500 linkage",
                d.market_correlation < 0.9,
            ),
            kpi(
                "Effective Bets",
                d.effective_bets.to_string(),
                format!("vs {} market", d.market_effective_bets),
                d.effective_bets > d.market_effective_bets,
            ),
            kpi(
                "Intl Correlation",
                d.international_correlation.to_string(),
                "Diversification",
                d.international_correlation < 0.8,
            ),
            kpi(
                "Bond Correlation",
                d.bond_correlation.to_string(),
                "Hedge effectiveness",
                d.bond_correlation < 0.0,
            ),
        ],
        table_data: d
            .asset_class_correlations
            .iter()
            .map(|c| {
                json!({
                    "class1": c.class1,
                    "class2": c.class2,
                    "correlation": format!("{:.2}", c.correlation),
                    "isPositive": c.correlation.abs() < 0.7,
                })
            })
            .collect(),
        metrics: vec![metric(
            "Avg Intra-Correlation",
            d.avg_intra_correlation.to_string(),
            "Within portfolio",
        )],
        highlights: vec![
            format!(
                "Portfolio's {} effective bets exceed market's typical {}",
                d.effective_bets, d.market_effective_bets
            ),
            format!(
                "Bonds maintain negative correlation ({}) providing hedge during drawdowns",
                d.bond_correlation
            ),
            format!(
                "Average intra-portfolio correlation of {} suggests good diversification",
                d.avg_intra_correlation
            ),
        ],
        ..GeneratedContent::default()
    }
}

/* ----------------------------
Allocation
---------------------------- */

fn asset_allocation(d: &AssetAllocation) -> GeneratedContent {
    let mut table_data: Vec<Value> = d
        .equity_breakdown
        .iter()
        .map(|r| {
            json!({
                "region": r.region,
                "allocation": pct(r.allocation),
                "amount": dollars_k(r.amount, 0),
                "type": "Equity",
                "isPositive": true,
            })
        })
        .collect();
    table_data.extend(d.fixed_income_breakdown.iter().map(|b| {
        json!({
            "region": b.bond_type,
            "allocation": pct(b.allocation),
            "amount": dollars_k(b.amount, 0),
            "type": "Fixed Income",
            "isPositive": true,
        })
    }));

    let split = d
        .equity_breakdown
        .iter()
        .map(|r| format!("{}% {}", r.allocation, r.region))
        .collect::<Vec<_>>()
        .join(", ");

    GeneratedContent {
        kpis: vec![
            kpi("Equity Allocation", pct(d.equity_allocation), "Growth focus", true),
            kpi("Fixed Income", pct(d.fixed_income_allocation), "Stability", true),
            kpi("Alternatives", pct(d.alternatives), "Diversification", true),
            kpi("Target Return", pct(d.target_return), "Annualized", true),
        ],
        table_data,
        highlights: vec![
            format!(
                "Strategic {}/{} equity/fixed income allocation",
                d.equity_allocation, d.fixed_income_allocation
            ),
            format!("Equities split: {split}"),
            format!(
                "Target return of {}% with {}% volatility",
                d.target_return, d.target_volatility
            ),
        ],
        ..GeneratedContent::default()
    }
}

fn sector_allocation(d: &SectorAllocation) -> GeneratedContent {
    let top: Vec<_> = d.sectors.iter().take(SECTOR_ROWS).collect();

    let mut kpis = vec![kpi(
        "Excess Return",
        signed_pct(d.excess_return),
        "from allocation",
        d.excess_return > 0.0,
    )];
    for s in d.sectors.iter().take(2) {
        kpis.push(kpi(
            &s.name,
            pct(s.portfolio),
            format!("{} vs S&P", signed_pct(s.excess)),
            s.excess > 0.0,
        ));
    }
    let best = d
        .sectors
        .iter()
        .map(|s| s.return_pct)
        .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |a| a.max(r))));
    if let Some(best) = best {
        kpis.push(kpi(
            "Top Sector Return",
            signed_pct(best),
            "Best performing",
            true,
        ));
    }

    GeneratedContent {
        kpis,
        chart_data: top
            .iter()
            .map(|s| {
                json!({
                    "sector": s.name,
                    "portfolio": s.portfolio,
                    "benchmark": s.benchmark,
                    "excess": s.excess,
                })
            })
            .collect(),
        table_data: top
            .iter()
            .map(|s| {
                json!({
                    "name": s.name,
                    "portfolio": pct(s.portfolio),
                    "benchmark": pct(s.benchmark),
                    "excess": signed_pct(s.excess),
                    "return": signed_pct(s.return_pct),
                    "isPositive": s.excess > 0.0,
                })
            })
            .collect(),
        ..GeneratedContent::default()
    }
}

/* ----------------------------
Income
---------------------------- */

fn dividend_income(d: &DividendIncome) -> GeneratedContent {
    GeneratedContent {
        kpis: vec![
            kpi(
                "Portfolio Yield",
                pct(d.current_yield),
                format!("vs {}% S&P", d.benchmark_yield),
                d.current_yield > d.benchmark_yield,
            ),
            kpi(
                "Annual Income",
                dollars_k(d.annual_income, 0),
                format!("{} YoY", signed_pct(d.income_growth)),
                d.income_growth > 0.0,
            ),
            kpi(
                "Dividend Stocks",
                d.dividend_stocks.to_string(),
                format!("{} aristocrats", d.aristocrats),
                true,
            ),
            kpi(
                "Growth Rate",
                pct(d.forward_growth),
                "Forward outlook",
                d.forward_growth > 5.0,
            ),
        ],
        table_data: d
            .top_dividend_stocks
            .iter()
            .map(|s| {
                json!({
                    "name": s.name,
                    "yield": pct(s.yield_pct),
                    "payment": format!("${}", grouped(s.payment)),
                    "isPositive": s.yield_pct > 2.0,
                })
            })
            .collect(),
        metrics: vec![metric(
            "Average Payout Ratio",
            pct(d.avg_payout_ratio),
            "Sustainable levels",
        )],
        ..GeneratedContent::default()
    }
}

fn dividend_growth(d: &DividendGrowth) -> GeneratedContent {
    GeneratedContent {
        kpis: vec![
            kpi("Aristocrats", d.aristocrats.to_string(), "25+ year growth", true),
            kpi(
                "5-Year CAGR",
                pct(d.dividend_cagr_5yr),
                "Income growth",
                d.dividend_cagr_5yr > 5.0,
            ),
            kpi(
                "Inflation-Adjusted",
                pct(d.inflation_adjusted_growth),
                "Real growth",
                d.inflation_adjusted_growth > 0.0,
            ),
            kpi(
                "Forward Growth",
                pct(d.forward_growth_rate),
                "Projected annually",
                d.forward_growth_rate > 5.0,
            ),
        ],
        table_data: d
            .top_growth_stocks
            .iter()
            .map(|s| {
                json!({
                    "name": s.name,
                    "symbol": s.symbol,
                    "growthRate": pct(s.growth_rate),
                    "payoutRatio": pct(s.payout_ratio),
                    "yearsGrowth": format!("{} years", s.years_growth),
                    "isPositive": s.growth_rate > 5.0,
                })
            })
            .collect(),
        metrics: vec![
            metric("Avg Payout Ratio", pct(d.avg_payout_ratio), "Sustainable levels"),
            metric(
                "Sustainability Score",
                d.sustainability_score.to_string(),
                "Out of 10",
            ),
        ],
        highlights: vec![
            format!(
                "{} Dividend Aristocrats with 25+ years of consecutive increases",
                d.aristocrats
            ),
            format!(
                "Dividend income CAGR of {}% outpaced inflation by {}%",
                d.dividend_cagr_5yr, d.inflation_adjusted_growth
            ),
            format!(
                "Forward growth rate of {}% supported by {}% payout ratio",
                d.forward_growth_rate, d.avg_payout_ratio
            ),
        ],
        ..GeneratedContent::default()
    }
}

/* ----------------------------
Trading
---------------------------- */

fn trading_activity(d: &TradingActivity) -> GeneratedContent {
    GeneratedContent {
        kpis: vec![
            kpi(
                "Turnover Rate",
                pct(d.turnover_rate),
                "Annual activity",
                d.turnover_rate < 50.0,
            ),
            kpi(
                "Total Volume",
                format!("${:.1}M", d.total_volume / 1_000_000.0),
                format!("{} trades", d.transaction_count),
                true,
            ),
            kpi(
                "Avg Holding",
                format!("{}m", d.avg_holding_period),
                "months",
                d.avg_holding_period > 6.0,
            ),
            kpi(
                "Transaction Cost",
                pct(d.transaction_cost),
                "of trade value",
                d.transaction_cost < 0.1,
            ),
        ],
        table_data: d
            .major_trades
            .iter()
            .map(|t| {
                let sign = if t.amount < 0.0 { "-" } else { "" };
                json!({
                    "type": t.side.as_str(),
                    "security": t.security,
                    "amount": format!("{sign}${}K", (t.amount / 1000.0).abs()),
                    "impact": signed_pct(t.impact),
                    "date": t.date.to_string(),
                    "isPositive": t.side == TradeSide::Buy,
                })
            })
            .collect(),
        ..GeneratedContent::default()
    }
}

fn recent_trades(d: &RecentTrades) -> GeneratedContent {
    let mut trades: Vec<_> = d
        .purchases
        .iter()
        .map(|t| (TradeSide::Buy, t))
        .chain(d.sales.iter().map(|t| (TradeSide::Sell, t)))
        .collect();
    // newest first; stable for equal dates
    trades.sort_by(|a, b| b.1.date.cmp(&a.1.date));

    GeneratedContent {
        kpis: vec![
            kpi(
                "Total Transactions",
                d.total_transactions.to_string(),
                "Last 30 days",
                true,
            ),
            kpi("Total Volume", dollars_k(d.total_volume, 0), "Traded", true),
            kpi(
                "Net Cash Flow",
                if d.net_cash_flow > 0.0 {
                    format!("+{}", dollars_k(d.net_cash_flow, 0))
                } else {
                    signed_dollars_k(d.net_cash_flow)
                },
                "Position change",
                d.net_cash_flow > 0.0,
            ),
            kpi(
                "Execution Quality",
                pct(d.avg_execution_quality),
                "vs target prices",
                d.avg_execution_quality > 99.0,
            ),
        ],
        table_data: trades
            .iter()
            .take(TRADE_ROWS)
            .map(|(side, t)| {
                json!({
                    "type": side.as_str(),
                    "security": t.security,
                    "amount": signed_dollars_k(t.amount),
                    "shares": t.shares,
                    "price": format!("${:.2}", t.price),
                    "date": t.date.to_string(),
                    "isPositive": *side == TradeSide::Buy,
                })
            })
            .collect(),
        highlights: vec![
            format!(
                "{} transactions totaling {} in volume",
                d.total_transactions,
                dollars_k(d.total_volume, 0)
            ),
            format!(
                "Net cash flow of {} maintaining target allocation",
                signed_dollars_k(d.net_cash_flow)
            ),
            format!(
                "Execution quality at {}% of target prices",
                d.avg_execution_quality
            ),
        ],
        ..GeneratedContent::default()
    }
}

/* ----------------------------
Other views
---------------------------- */

fn esg(d: &Esg) -> GeneratedContent {
    let lead = d.overall_score - d.benchmark_score;
    GeneratedContent {
        kpis: vec![
            kpi(
                "ESG Score",
                d.overall_score.to_string(),
                format!("{} Rating", d.rating),
                d.overall_score > 7.0,
            ),
            kpi(
                "vs S&P 500",
                if lead > 0.0 {
                    format!("+{lead:.1}")
                } else {
                    format!("{lead:.1}")
                },
                "Above benchmark",
                lead > 0.0,
            ),
            kpi(
                "Carbon Intensity",
                d.carbon_intensity.to_string(),
                format!("{}% lower", d.carbon_reduction),
                true,
            ),
            kpi(
                "Sustainable Rev",
                pct(d.sustainable_revenue),
                "of portfolio",
                d.sustainable_revenue > 25.0,
            ),
        ],
        metrics: vec![
            metric("Environmental", d.environmental_score.to_string(), "Clean energy focus"),
            metric("Social", d.social_score.to_string(), "Responsible practices"),
            metric("Governance", d.governance_score.to_string(), "Corporate quality"),
        ],
        chart_data: vec![
            json!({ "category": "Environmental", "portfolio": d.environmental_score, "benchmark": 6.0 }),
            json!({ "category": "Social", "portfolio": d.social_score, "benchmark": 6.1 }),
            json!({ "category": "Governance", "portfolio": d.governance_score, "benchmark": 6.5 }),
        ],
        ..GeneratedContent::default()
    }
}

fn costs(d: &Costs) -> GeneratedContent {
    GeneratedContent {
        kpis: vec![
            kpi(
                "Avg Expense Ratio",
                pct(d.avg_expense_ratio),
                format!("vs {}% industry", d.industry_average),
                d.avg_expense_ratio < d.industry_average,
            ),
            kpi(
                "Annual Fees",
                dollars_k(d.total_annual_fees, 1),
                "Total cost",
                d.total_annual_fees < 10_000.0,
            ),
            kpi(
                "Index Funds",
                pct(d.index_allocation),
                format!("{}% avg fee", d.index_fund_ratio),
                true,
            ),
            kpi(
                "Active Funds",
                pct(d.active_allocation),
                format!("{}% avg fee", d.active_fund_ratio),
                d.active_fund_ratio < 1.0,
            ),
        ],
        table_data: d
            .cost_breakdown
            .iter()
            .map(|c| {
                json!({
                    "type": c.fund_type,
                    "allocation": pct(c.allocation),
                    "avgFee": pct(c.avg_fee),
                    "totalCost": format!("${}", grouped(c.total_cost)),
                    "isPositive": c.avg_fee < 0.5,
                })
            })
            .collect(),
        ..GeneratedContent::default()
    }
}

fn geographic(d: &Geographic) -> GeneratedContent {
    GeneratedContent {
        kpis: vec![
            kpi("US Exposure", pct(d.us_exposure), "Domestic equity", true),
            kpi("Developed Intl", pct(d.developed_intl), "International", true),
            kpi("Emerging Markets", pct(d.emerging_markets), "Growth exposure", true),
            kpi(
                "Currency Hedged",
                pct(d.currency_hedged),
                "FX protection",
                d.currency_hedged > 50.0,
            ),
        ],
        table_data: d
            .top_intl_holdings
            .iter()
            .map(|h| {
                json!({
                    "name": h.name,
                    "country": h.country,
                    "weight": pct(h.weight),
                    "sector": h.sector,
                    "isPositive": true,
                })
            })
            .collect(),
        highlights: vec![
            format!("European holdings: {}% of portfolio", d.european_holdings),
            format!("Asia-Pacific exposure: {}%", d.asia_pacific),
            format!(
                "Currency hedging on {}% of international positions",
                d.currency_hedged
            ),
        ],
        ..GeneratedContent::default()
    }
}

fn fixed_income(d: &FixedIncome) -> GeneratedContent {
    let mut highlights = vec![
        format!("Government bonds: {}% of fixed income", d.government_bonds),
        format!(
            "Corporate IG: {}%, High Yield: {}%",
            d.corporate_ig, d.high_yield
        ),
    ];
    if let (Some(first), Some(last)) = (d.maturity_ladder.first(), d.maturity_ladder.last()) {
        let from = first.year.split('-').next().unwrap_or(&first.year);
        let to = last.year.rsplit('-').next().unwrap_or(&last.year);
        highlights.push(format!("Laddered maturities from {from} to {to}"));
    }

    GeneratedContent {
        kpis: vec![
            kpi("Fixed Income", pct(d.fixed_income_allocation), "of portfolio", true),
            kpi(
                "Duration",
                format!("{}y", d.duration),
                "Interest rate risk",
                d.duration < 7.0,
            ),
            kpi(
                "Current Yield",
                pct(d.current_yield),
                format!("{} annual", dollars_k(d.annual_income, 1)),
                d.current_yield > 4.0,
            ),
            kpi("Credit Quality", d.average_credit.clone(), "High quality", true),
        ],
        table_data: d
            .maturity_ladder
            .iter()
            .map(|m| {
                json!({
                    "year": m.year,
                    "allocation": pct(m.allocation),
                    "yield": pct(m.yield_pct),
                    "isPositive": m.yield_pct > 4.0,
                })
            })
            .collect(),
        highlights,
        ..GeneratedContent::default()
    }
}

fn alternatives(d: &Alternatives) -> GeneratedContent {
    GeneratedContent {
        kpis: vec![
            kpi("Total Alternatives", pct(d.total_alternatives), "of portfolio", true),
            kpi(
                "REITs",
                pct(d.reit_allocation),
                format!("{} YTD", signed_pct(d.reit_return)),
                d.reit_return > 0.0,
            ),
            kpi("Commodities", pct(d.commodities_allocation), "Inflation hedge", true),
            kpi(
                "Private Equity",
                pct(d.private_equity_allocation),
                "Growth exposure",
                true,
            ),
        ],
        table_data: d
            .alternative_breakdown
            .iter()
            .map(|a| {
                json!({
                    "type": a.sleeve,
                    "allocation": pct(a.allocation),
                    "return": signed_pct(a.return_pct),
                    "income": pct(a.income),
                    "isPositive": a.return_pct > 0.0,
                })
            })
            .collect(),
        highlights: vec![
            format!(
                "Alternatives contributed {} to portfolio performance",
                signed_pct(d.performance_contribution)
            ),
            "Real estate exposure provides inflation protection".to_string(),
            "Diversification benefits from low correlation assets".to_string(),
        ],
        ..GeneratedContent::default()
    }
}

fn tax(d: &Tax) -> GeneratedContent {
    GeneratedContent {
        kpis: vec![
            kpi(
                "Tax-Advantaged",
                pct(d.tax_advantaged),
                "IRA/401k holdings",
                d.tax_advantaged > 50.0,
            ),
            kpi(
                "Effective Tax Rate",
                pct(d.effective_tax_rate),
                format!("vs {}% marginal", d.marginal_tax_rate),
                d.effective_tax_rate < d.marginal_tax_rate,
            ),
            kpi(
                "Tax-Loss Harvesting",
                dollars_k(d.tax_loss_harvesting, 1),
                "Realized losses",
                d.tax_loss_harvesting > 0.0,
            ),
            kpi(
                "Muni Income",
                dollars_k(d.municipal_income, 1),
                "Tax-free annually",
                true,
            ),
        ],
        table_data: d
            .account_types
            .iter()
            .map(|a| {
                json!({
                    "type": a.account,
                    "allocation": pct(a.allocation),
                    "strategy": a.strategy,
                    "isPositive": true,
                })
            })
            .collect(),
        highlights: vec![
            format!(
                "Effective tax rate {:.1}% below marginal rate",
                d.marginal_tax_rate - d.effective_tax_rate
            ),
            "Strategic asset location optimizes tax efficiency".to_string(),
            format!(
                "Tax-loss harvesting generated ${} in deductions",
                grouped(d.tax_loss_harvesting)
            ),
        ],
        ..GeneratedContent::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, FallbackData};
    use crate::classifier::ClassificationType;

    fn view(id: &str) -> GeneratedContent {
        let cat = Catalog::builtin();
        let rec = cat.get(id).expect("catalog record");
        generate(&rec.content, &rec.data)
    }

    #[test]
    fn helpers_format_like_the_dashboard() {
        assert_eq!(pct(14.7), "14.7%");
        assert_eq!(pct(-8.2), "-8.2%");
        assert_eq!(signed_pct(3.5), "+3.5%");
        assert_eq!(signed_pct(-1.4), "-1.4%");
        assert_eq!(signed_pct(0.0), "0%");
        assert_eq!(dollars_k(42_300.0, 0), "$42K");
        assert_eq!(dollars_k(7_100.0, 1), "$7.1K");
        assert_eq!(signed_dollars_k(-95_000.0), "-$95K");
        assert_eq!(grouped(42_300.0), "42,300");
        assert_eq!(grouped(987.0), "987");
        assert_eq!(grouped(1_234_567.0), "1,234,567");
        assert_eq!(grouped(-3_200.0), "-3,200");
    }

    #[test]
    fn every_builtin_answer_renders_kpis() {
        for rec in Catalog::builtin().answers() {
            let c = generate(&rec.content, &rec.data);
            assert!(c.paragraph.is_none(), "{}", rec.id);
            assert!(c.kpis.len() >= 4, "{} has {} kpis", rec.id, c.kpis.len());
        }
    }

    #[test]
    fn fallback_renders_paragraph() {
        let data = AnswerData::Fallback(FallbackData {
            fallback_type: ClassificationType::Market,
            action_text: Some("Open Market Data".into()),
            is_unmatched: true,
        });
        let c = generate("check the news", &data);
        assert_eq!(c, GeneratedContent::paragraph("check the news"));
        let v = serde_json::to_value(&c).expect("json");
        assert_eq!(v, json!({ "paragraph": "check the news" }));
    }

    #[test]
    fn ytd_view() {
        let c = view("ytd-performance-sp500");
        assert_eq!(c.kpis[0].value, "+14.7%");
        assert_eq!(c.kpis[0].change, "+3.5% vs S&P");
        assert_eq!(c.kpis[1].value, "1.34");
        assert_eq!(c.kpis[1].change, "vs 1.12 benchmark");
        assert!(c.kpis[1].is_positive);
        assert_eq!(c.chart_data.len(), 8);
        assert_eq!(c.chart_data[7]["month"], "Aug");
        assert_eq!(
            c.highlights[1],
            "Top contributing sectors: Technology, Healthcare, Financials"
        );
    }

    #[test]
    fn holdings_view_caps_rows() {
        let c = view("top-holdings");
        assert_eq!(c.table_data.len(), HOLDINGS_ROWS);
        assert_eq!(c.kpis[1].value, "24.3x");
        assert_eq!(c.kpis[3].value, "10");
        assert_eq!(c.highlights[0], "Top holding: Microsoft Corp at 4.8%");
        assert_eq!(c.highlights[1], "Technology represents 4 of top 10");
        assert_eq!(c.highlights[2], "Best performer: NVIDIA Corp (+34.7%)");
    }

    #[test]
    fn risk_views_by_payload() {
        let basic = view("risk-metrics-beta");
        assert_eq!(basic.kpis.len(), 6);
        assert_eq!(basic.kpis[5].change, "TE: 4.2%");
        assert_eq!(basic.metrics.len(), 2);
        assert_eq!(basic.metrics[1].value, "0.87");

        let var = view("value-at-risk");
        assert_eq!(var.kpis[1].change, "$51K");
        assert_eq!(var.table_data.len(), 4);
        assert_eq!(
            var.highlights[1],
            "Stress testing shows maximum potential drawdown of -18.5% vs market's -37%"
        );

        let corr = view("correlation-analysis");
        assert_eq!(corr.table_data[1]["correlation"], "-0.18");
        assert_eq!(corr.table_data[0]["isPositive"], false);

        let vol = view("market-volatility");
        assert_eq!(vol.table_data.len(), 5);
        assert_eq!(vol.table_data[3]["isPositive"], false); // "Slightly Lower"
        assert_eq!(vol.table_data[4]["isPositive"], true); // "Much Better"

        let sharpe = view("sharpe-ratio-analysis");
        assert_eq!(sharpe.metrics.len(), 4);
        assert!(!sharpe.kpis[3].is_positive);
    }

    #[test]
    fn allocation_views() {
        let sectors = view("sector-allocation");
        assert_eq!(sectors.kpis[1].label, "Technology");
        assert_eq!(sectors.kpis[1].change, "+6.2% vs S&P");
        assert_eq!(sectors.kpis[3].value, "+24.6%");
        assert_eq!(sectors.chart_data.len(), SECTOR_ROWS);
        assert_eq!(sectors.table_data[2]["excess"], "-1.4%");

        let assets = view("asset-allocation");
        assert_eq!(assets.table_data.len(), 6);
        assert_eq!(assets.table_data[0]["amount"], "$1020K");
        assert_eq!(assets.table_data[3]["type"], "Fixed Income");
        assert_eq!(
            assets.highlights[0],
            "Strategic 75/25 equity/fixed income allocation"
        );
    }

    #[test]
    fn dividend_views() {
        let income = view("dividend-income");
        assert_eq!(income.kpis[1].value, "$42K");
        assert_eq!(income.kpis[1].change, "+12.4% YoY");
        assert_eq!(income.table_data[0]["payment"], "$1,847");

        let growth = view("dividend-growth");
        assert_eq!(growth.kpis[1].value, "9.8%");
        assert_eq!(growth.table_data[3]["yearsGrowth"], "61 years");
    }

    #[test]
    fn recent_trades_sorted_newest_first() {
        let c = view("recent-trades");
        let dates: Vec<_> = c
            .table_data
            .iter()
            .map(|r| r["date"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(dates[0], "2024-08-18");
        assert_eq!(dates[5], "2024-07-22");
        assert_eq!(c.table_data[0]["type"], "Sell");
        assert_eq!(c.table_data[0]["amount"], "-$42K");
        assert_eq!(c.table_data[1]["price"], "$480.00");
        assert_eq!(c.kpis[2].value, "+$38K");
    }

    #[test]
    fn trading_activity_view() {
        let c = view("trading-activity");
        assert_eq!(c.kpis[1].value, "$2.8M");
        assert_eq!(c.kpis[1].change, "147 trades");
        assert_eq!(c.table_data[1]["amount"], "-$95K");
        assert_eq!(c.table_data[1]["impact"], "-1.3%");
        assert_eq!(c.table_data[0]["date"], "2024-08-15");
    }

    #[test]
    fn remaining_views() {
        let e = view("esg-scoring");
        assert_eq!(e.kpis[1].value, "+2.2");
        assert_eq!(e.chart_data.len(), 3);

        let c = view("expense-ratio");
        assert_eq!(c.kpis[1].value, "$7.1K");
        assert_eq!(c.table_data[1]["totalCost"], "$4,600");

        let g = view("geographic-diversification");
        assert_eq!(g.table_data.len(), 5);

        let f = view("bond-portfolio");
        assert_eq!(f.kpis[2].change, "$6.4K annual");
        assert_eq!(f.highlights[2], "Laddered maturities from 2025 to 2034");

        let a = view("alternative-investments");
        assert_eq!(a.kpis[1].change, "+9.1% YTD");
        assert_eq!(a.table_data[1]["income"], "0%");

        let t = view("tax-efficiency");
        assert_eq!(t.highlights[0], "Effective tax rate 9.7% below marginal rate");
        assert_eq!(
            t.highlights[2],
            "Tax-loss harvesting generated $3,200 in deductions"
        );

        let fa = view("factor-attribution");
        assert_eq!(fa.kpis[3].value, "Quality");
        assert_eq!(fa.table_data[3]["contribution"], "-0.4%");
        assert_eq!(fa.table_data[0]["weight"], "0.42");

        let r = view("rolling-returns");
        assert_eq!(r.kpis[0].change, "82th percentile");
        assert!(r.kpis[3].is_positive);

        let p = view("performance-contributors");
        assert_eq!(p.table_data.len(), 8);
        assert_eq!(p.table_data[5]["contribution"], "-0.18%");
    }
}
