//! Multi-sheet Excel report.
//!
//! `Overview` and `Full_Data` are always written. The remaining sheets appear
//! only when the matching input is supplied.

use crate::error::{ReportError, Result};
use macrowatch_data::frame::{float_values, latest_row, str_values};
use polars::prelude::*;
use rust_xlsxwriter::{ColNum, Color, Format, RowNum, Workbook, Worksheet};
use std::path::Path;
use tracing::info;

/// Tables that go into the workbook.
#[derive(Debug, Clone)]
pub struct WorkbookInputs {
    /// Risk table (`Full_Data`; its latest row is the `Overview`)
    pub risk: DataFrame,
    /// Latest-row SQL export (`SQL_Snapshot`)
    pub snapshot: Option<DataFrame>,
    /// Trailing twelve months SQL export (`SQL_Last12`)
    pub last12: Option<DataFrame>,
    /// Stress index table; its latest row becomes `Current_Regime`
    pub index: Option<DataFrame>,
    /// Highest-stress months (`Top_High_Stress`)
    pub top_high: Option<DataFrame>,
    /// Lowest-stress months (`Top_Low_Stress`)
    pub top_low: Option<DataFrame>,
}

impl WorkbookInputs {
    /// Inputs with only the risk table.
    pub const fn new(risk: DataFrame) -> Self {
        Self {
            risk,
            snapshot: None,
            last12: None,
            index: None,
            top_high: None,
            top_low: None,
        }
    }
}

/// Latest `date, macro_stress_index, stress_level, macro_strategy` row of the
/// index table.
pub fn current_regime(index: &DataFrame) -> PolarsResult<DataFrame> {
    latest_row(index)?.select(["date", "macro_stress_index", "stress_level", "macro_strategy"])
}

fn risk_level_format(value: &str) -> Option<Format> {
    match value {
        "HIGH RISK" => Some(
            Format::new()
                .set_background_color(Color::RGB(0xFF0000))
                .set_font_color(Color::White)
                .set_bold(),
        ),
        "MEDIUM RISK" => Some(
            Format::new()
                .set_background_color(Color::RGB(0xFFA500))
                .set_bold(),
        ),
        "LOW RISK" => Some(
            Format::new()
                .set_background_color(Color::RGB(0x00B050))
                .set_font_color(Color::White)
                .set_bold(),
        ),
        _ => None,
    }
}

/// Write `df` with a bold header row. With `highlight`, risk-level cells in
/// the first data row get their level's colours.
fn write_frame(sheet: &mut Worksheet, df: &DataFrame, highlight: bool) -> Result<()> {
    let header = Format::new().set_bold();

    for (i, column) in df.get_columns().iter().enumerate() {
        let col = i as ColNum;
        let name = column.name().as_str();
        sheet.write_string_with_format(0, col, name, &header)?;

        let dtype = column.dtype();
        if dtype.is_primitive_numeric() {
            for (row, value) in float_values(df, name)?.into_iter().enumerate() {
                if let Some(value) = value.filter(|v| v.is_finite()) {
                    sheet.write_number(row as RowNum + 1, col, value)?;
                }
            }
        } else {
            for (row, value) in str_values(df, name)?.into_iter().enumerate() {
                let Some(value) = value else { continue };
                let format = if highlight && row == 0 {
                    risk_level_format(&value)
                } else {
                    None
                };
                match format {
                    Some(format) => {
                        sheet.write_string_with_format(row as RowNum + 1, col, &value, &format)?
                    }
                    None => sheet.write_string(row as RowNum + 1, col, &value)?,
                };
            }
        }
    }

    sheet.autofit();
    Ok(())
}

/// Write the report workbook to `path`, replacing any existing file.
///
/// Returns the sheet names in workbook order.
pub fn write_workbook(path: &Path, inputs: &WorkbookInputs) -> Result<Vec<&'static str>> {
    let overview = latest_row(&inputs.risk)?;
    if overview.height() == 0 {
        return Err(ReportError::EmptyTable("risk table".to_string()));
    }

    let regime = inputs.index.as_ref().map(current_regime).transpose()?;

    let mut sheets: Vec<(&'static str, &DataFrame)> =
        vec![("Overview", &overview), ("Full_Data", &inputs.risk)];
    let optional = [
        ("SQL_Snapshot", inputs.snapshot.as_ref()),
        ("SQL_Last12", inputs.last12.as_ref()),
        ("Current_Regime", regime.as_ref()),
        ("Top_High_Stress", inputs.top_high.as_ref()),
        ("Top_Low_Stress", inputs.top_low.as_ref()),
    ];
    sheets.extend(
        optional
            .into_iter()
            .filter_map(|(name, df)| df.map(|df| (name, df))),
    );

    let mut workbook = Workbook::new();
    for &(name, df) in &sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_frame(sheet, df, name == "Overview")?;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    workbook.save(path)?;

    let names: Vec<&'static str> = sheets.iter().map(|&(name, _)| name).collect();
    info!(path = %path.display(), sheets = ?names, "wrote workbook");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk() -> DataFrame {
        DataFrame::new(vec![
            Series::new("date".into(), vec!["2024-01-01", "2024-02-01"]).into(),
            Series::new("us_10y".into(), vec![Some(4.1), None]).into(),
            Series::new("risk_score".into(), vec![5_i64, 3]).into(),
            Series::new("alerts".into(), vec![Some("Bond Yield Stress"), None]).into(),
            Series::new("risk_level".into(), vec!["HIGH RISK", "MEDIUM RISK"]).into(),
        ])
        .unwrap()
    }

    fn index() -> DataFrame {
        DataFrame::new(vec![
            Series::new("date".into(), vec!["2024-01-01", "2024-02-01"]).into(),
            Series::new("z_cpi".into(), vec![0.1, 0.2]).into(),
            Series::new("macro_stress_index".into(), vec![0.5, 1.2]).into(),
            Series::new("stress_level".into(), vec!["MODERATE", "ELEVATED"]).into(),
            Series::new(
                "macro_strategy".into(),
                vec![
                    "Rising stress: Rotate into Quality sectors",
                    "Tightening: Consider Utilities, Value",
                ],
            )
            .into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_current_regime() {
        let regime = current_regime(&index()).unwrap();
        assert_eq!(regime.height(), 1);
        assert_eq!(regime.width(), 4);
        assert_eq!(
            str_values(&regime, "stress_level").unwrap()[0].as_deref(),
            Some("ELEVATED")
        );
    }

    #[test]
    fn test_highlight_formats() {
        assert!(risk_level_format("HIGH RISK").is_some());
        assert!(risk_level_format("MEDIUM RISK").is_some());
        assert!(risk_level_format("LOW RISK").is_some());
        assert!(risk_level_format("ELEVATED").is_none());
    }

    #[test]
    fn test_minimal_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let sheets = write_workbook(&path, &WorkbookInputs::new(risk())).unwrap();
        assert_eq!(sheets, vec!["Overview", "Full_Data"]);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_all_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("report.xlsx");
        let inputs = WorkbookInputs {
            snapshot: Some(risk().tail(Some(1))),
            last12: Some(risk()),
            index: Some(index()),
            top_high: Some(index()),
            top_low: Some(index()),
            ..WorkbookInputs::new(risk())
        };
        let sheets = write_workbook(&path, &inputs).unwrap();
        assert_eq!(
            sheets,
            vec![
                "Overview",
                "Full_Data",
                "SQL_Snapshot",
                "SQL_Last12",
                "Current_Regime",
                "Top_High_Stress",
                "Top_Low_Stress"
            ]
        );
    }

    #[test]
    fn test_empty_risk_table() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_workbook(
            &dir.path().join("report.xlsx"),
            &WorkbookInputs::new(risk().head(Some(0))),
        );
        assert!(matches!(result, Err(ReportError::EmptyTable(_))));
    }
}
