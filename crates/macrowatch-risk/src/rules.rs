//! Threshold rules over one monthly row.
//!
//! Each row is scored on its own; nothing carries over between months. A null
//! input never triggers its rule.

use macrowatch_data::frame::float_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Indicator values a row is scored on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiskInputs {
    /// CPI year-over-year change, percent
    pub cpi_yoy_pct: Option<f64>,
    /// Unemployment rate month-over-month change, percent
    pub unrate_mom_pct: Option<f64>,
    /// Effective fed funds rate
    pub fedfunds: Option<f64>,
    /// 10-year Treasury yield
    pub ten_year: Option<f64>,
}

/// The fixed rule set, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskRule {
    /// CPI YoY above 4%
    HighInflation,
    /// Unemployment MoM above 0.5%
    RisingUnemployment,
    /// Fed funds above 4%
    HighRates,
    /// 10-year yield above 4%
    BondYieldStress,
}

impl RiskRule {
    /// Rules in the order their alerts are reported.
    pub const ALL: [Self; 4] = [
        Self::HighInflation,
        Self::RisingUnemployment,
        Self::HighRates,
        Self::BondYieldStress,
    ];

    /// Alert text.
    pub const fn alert(&self) -> &'static str {
        match self {
            Self::HighInflation => "High Inflation Risk",
            Self::RisingUnemployment => "Rising Unemployment Risk",
            Self::HighRates => "High Interest Rate Environment",
            Self::BondYieldStress => "Bond Yield Stress",
        }
    }

    /// Table column the rule reads.
    pub const fn column(&self) -> &'static str {
        match self {
            Self::HighInflation => "us_cpi_yoy_pct",
            Self::RisingUnemployment => "us_unrate_mom_pct",
            Self::HighRates => "us_fedfunds",
            Self::BondYieldStress => "us_10y",
        }
    }

    /// Strict lower bound that triggers the rule.
    pub const fn threshold(&self) -> f64 {
        match self {
            Self::RisingUnemployment => 0.5,
            Self::HighInflation | Self::HighRates | Self::BondYieldStress => 4.0,
        }
    }

    /// Score added when the rule fires.
    pub const fn score(&self) -> u32 {
        match self {
            Self::HighInflation | Self::HighRates => 2,
            Self::RisingUnemployment | Self::BondYieldStress => 1,
        }
    }

    const fn input(&self, inputs: &RiskInputs) -> Option<f64> {
        match self {
            Self::HighInflation => inputs.cpi_yoy_pct,
            Self::RisingUnemployment => inputs.unrate_mom_pct,
            Self::HighRates => inputs.fedfunds,
            Self::BondYieldStress => inputs.ten_year,
        }
    }

    /// Whether the rule fires for `inputs`.
    pub fn triggered(&self, inputs: &RiskInputs) -> bool {
        self.input(inputs).is_some_and(|value| value > self.threshold())
    }
}

/// Categorical risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score below 3
    Low,
    /// Score 3 or 4
    Medium,
    /// Score 5 or more
    High,
}

impl RiskLevel {
    /// Level for a total score.
    pub const fn from_score(score: u32) -> Self {
        if score >= 5 {
            Self::High
        } else if score >= 3 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Label used in tables and reports.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW RISK",
            Self::Medium => "MEDIUM RISK",
            Self::High => "HIGH RISK",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "LOW RISK" => Ok(Self::Low),
            "MEDIUM RISK" => Ok(Self::Medium),
            "HIGH RISK" => Ok(Self::High),
            other => Err(format!("unknown risk level {:?}", other)),
        }
    }
}

/// Outcome of scoring one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAssessment {
    /// Sum of the scores of the triggered rules
    pub score: u32,
    /// Triggered rules, in rule order
    pub alerts: Vec<RiskRule>,
    /// Level derived from the score
    pub level: RiskLevel,
}

impl RiskAssessment {
    /// Score `inputs` against every rule.
    pub fn evaluate(inputs: &RiskInputs) -> Self {
        let alerts: Vec<RiskRule> = RiskRule::ALL
            .into_iter()
            .filter(|rule| rule.triggered(inputs))
            .collect();
        let score = alerts.iter().map(RiskRule::score).sum();
        Self {
            score,
            alerts,
            level: RiskLevel::from_score(score),
        }
    }

    /// Alert texts joined with `"; "`; empty when nothing fired.
    pub fn alerts_text(&self) -> String {
        self.alerts
            .iter()
            .map(RiskRule::alert)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Append `risk_score`, `alerts` and `risk_level` to a feature table.
pub fn classify_frame(df: &DataFrame) -> PolarsResult<DataFrame> {
    let [cpi, unrate, fedfunds, ten_year] =
        RiskRule::ALL.map(|rule| float_values(df, rule.column()));
    let (cpi, unrate, fedfunds, ten_year) = (cpi?, unrate?, fedfunds?, ten_year?);

    let mut scores = Vec::with_capacity(df.height());
    let mut alerts = Vec::with_capacity(df.height());
    let mut levels = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let assessment = RiskAssessment::evaluate(&RiskInputs {
            cpi_yoy_pct: cpi[row],
            unrate_mom_pct: unrate[row],
            fedfunds: fedfunds[row],
            ten_year: ten_year[row],
        });
        scores.push(i64::from(assessment.score));
        alerts.push(assessment.alerts_text());
        levels.push(assessment.level.label());
    }

    let mut out = df.clone();
    out.with_column(Series::new("risk_score".into(), scores))?;
    out.with_column(Series::new("alerts".into(), alerts))?;
    out.with_column(Series::new("risk_level".into(), levels))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use macrowatch_data::frame::{int_values, str_values};
    use rstest::rstest;

    fn inputs(cpi: f64, unrate: f64, fed: f64, ten: f64) -> RiskInputs {
        RiskInputs {
            cpi_yoy_pct: Some(cpi),
            unrate_mom_pct: Some(unrate),
            fedfunds: Some(fed),
            ten_year: Some(ten),
        }
    }

    #[test]
    fn test_medium_risk_example() {
        let assessment = RiskAssessment::evaluate(&inputs(5.0, 0.0, 5.0, 3.0));
        assert_eq!(assessment.score, 4);
        assert_eq!(assessment.level, RiskLevel::Medium);
        assert_eq!(
            assessment.alerts_text(),
            "High Inflation Risk; High Interest Rate Environment"
        );
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let assessment = RiskAssessment::evaluate(&inputs(6.0, 1.0, 5.0, 4.5));
        assert_eq!(assessment.score, 6);
        assert_eq!(assessment.level, RiskLevel::High);
        assert_eq!(
            assessment.alerts_text(),
            "High Inflation Risk; Rising Unemployment Risk; \
             High Interest Rate Environment; Bond Yield Stress"
        );
    }

    #[test]
    fn test_thresholds_are_strict() {
        let assessment = RiskAssessment::evaluate(&inputs(4.0, 0.5, 4.0, 4.0));
        assert_eq!(assessment.score, 0);
        assert!(assessment.alerts.is_empty());
        assert_eq!(assessment.alerts_text(), "");
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_nulls_never_trigger() {
        let assessment = RiskAssessment::evaluate(&RiskInputs::default());
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[rstest]
    #[case(0, RiskLevel::Low)]
    #[case(2, RiskLevel::Low)]
    #[case(3, RiskLevel::Medium)]
    #[case(4, RiskLevel::Medium)]
    #[case(5, RiskLevel::High)]
    #[case(6, RiskLevel::High)]
    fn test_level_from_score(#[case] score: u32, #[case] expected: RiskLevel) {
        assert_eq!(RiskLevel::from_score(score), expected);
    }

    #[rstest]
    #[case(RiskLevel::Low)]
    #[case(RiskLevel::Medium)]
    #[case(RiskLevel::High)]
    fn test_level_label_parses(#[case] level: RiskLevel) {
        assert_eq!(level.label().parse::<RiskLevel>().unwrap(), level);
    }

    #[test]
    fn test_classify_frame() {
        let df = DataFrame::new(vec![
            Series::new("date".into(), vec!["2024-01-01", "2024-02-01"]).into(),
            Series::new("us_cpi_yoy_pct".into(), vec![Some(5.0), None]).into(),
            Series::new("us_unrate_mom_pct".into(), vec![Some(0.0), Some(2.0)]).into(),
            Series::new("us_fedfunds".into(), vec![5.0, 5.5]).into(),
            Series::new("us_10y".into(), vec![3.0, 4.4]).into(),
        ])
        .unwrap();

        let out = classify_frame(&df).unwrap();
        assert_eq!(out.width(), 8);
        assert_eq!(int_values(&out, "risk_score").unwrap(), vec![Some(4), Some(4)]);
        assert_eq!(
            str_values(&out, "alerts").unwrap()[1].as_deref(),
            Some("Rising Unemployment Risk; High Interest Rate Environment; Bond Yield Stress")
        );
        assert_eq!(
            str_values(&out, "risk_level").unwrap(),
            vec![Some("MEDIUM RISK".to_string()), Some("MEDIUM RISK".to_string())]
        );
    }

    #[test]
    fn test_classify_frame_missing_column() {
        let df = DataFrame::new(vec![
            Series::new("date".into(), vec!["2024-01-01"]).into(),
            Series::new("us_10y".into(), vec![4.2]).into(),
        ])
        .unwrap();
        assert!(classify_frame(&df).is_err());
    }
}
