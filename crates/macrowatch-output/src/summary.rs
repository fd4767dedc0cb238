//! Plain-text executive summary of the latest risk row.

use crate::error::{ReportError, Result};
use chrono::NaiveDate;
use macrowatch_data::frame::{date_values, int_values, latest_row, str_values};
use macrowatch_risk::RiskLevel;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latest month of the risk table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Month start
    pub date: NaiveDate,
    /// Level of the month
    pub risk_level: RiskLevel,
    /// Rule score of the month
    pub risk_score: i64,
    /// Triggered alerts; empty when no rule fired
    pub alerts: String,
}

impl RiskSummary {
    /// Summarize the row with the latest date.
    ///
    /// # Errors
    /// [`ReportError::EmptyTable`] for an empty table and
    /// [`ReportError::MissingColumn`] when a risk column is absent or holds an
    /// unknown level.
    pub fn from_risk_table(risk: &DataFrame) -> Result<Self> {
        for name in ["risk_level", "risk_score"] {
            if risk.column(name).is_err() {
                return Err(ReportError::MissingColumn(name.to_string()));
            }
        }

        let latest = latest_row(risk)?;
        let date = date_values(&latest)?
            .first()
            .copied()
            .ok_or_else(|| ReportError::EmptyTable("risk table".to_string()))?;

        let level = str_values(&latest, "risk_level")?
            .into_iter()
            .next()
            .flatten()
            .unwrap_or_default();
        let risk_level = level
            .parse::<RiskLevel>()
            .map_err(|_| ReportError::MissingColumn("risk_level".to_string()))?;

        let risk_score = int_values(&latest, "risk_score")?
            .into_iter()
            .next()
            .flatten()
            .unwrap_or_default();

        // Empty alert strings come back from CSV as nulls.
        let alerts = if latest.column("alerts").is_ok() {
            str_values(&latest, "alerts")?
                .into_iter()
                .next()
                .flatten()
                .unwrap_or_default()
        } else {
            String::new()
        };

        Ok(Self {
            date,
            risk_level,
            risk_score,
            alerts,
        })
    }

    /// Suggested actions for the level.
    pub const fn considerations(&self) -> &'static [&'static str] {
        match self.risk_level {
            RiskLevel::High => &[
                "Consider tightening cost controls",
                "Review capital expenditure plans",
                "Evaluate hedging strategies",
            ],
            RiskLevel::Medium => &[
                "Monitor inflation and employment trends closely",
                "Stress-test financial forecasts",
            ],
            RiskLevel::Low => &[
                "Maintain current strategic positioning",
                "Continue monitoring bond and rate developments",
            ],
        }
    }
}

impl fmt::Display for RiskSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MACROECONOMIC RISK BRIEF")?;
        writeln!(f)?;
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "Risk Level: {}", self.risk_level)?;
        writeln!(f, "Risk Score: {}", self.risk_score)?;
        writeln!(f)?;
        writeln!(f, "Key Alerts:")?;
        if self.alerts.is_empty() {
            writeln!(f, "None")?;
        } else {
            writeln!(f, "{}", self.alerts)?;
        }
        writeln!(f)?;
        writeln!(f, "Strategic Considerations:")?;
        for line in self.considerations() {
            writeln!(f, "- {}", line)?;
        }
        Ok(())
    }
}
