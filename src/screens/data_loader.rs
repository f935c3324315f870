//! Bulk data loader: funds and their schemes from a JSON or CSV file.
//!
//! JSON documents look like
//!
//! ```json
//! {"funds": [{"name": "Bluechip", "amc": "HDFC AMC", "category": "Equity",
//!             "aum": 1200, "schemes": [{"name": "Direct Growth", "nav": 54.2}]}]}
//! ```
//!
//! CSV files carry one scheme per row under the header
//! `fund,amc,scheme,nav[,category,aum,riskLevel,type]`; consecutive rows of
//! the same fund and AMC form one fund. A row with an empty `scheme` only
//! creates the fund.
//!
//! Every fund and every scheme is one record of the [`IngestReport`]. A fund
//! that cannot be stored fails together with all of its schemes.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};
use crate::store::ReferenceRepository;
use crate::types::enums::{RiskLevel, SchemeType};
use crate::types::fund::{DEFAULT_CATEGORY, NewFund, today};
use crate::types::scheme::NewScheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(AdminError::Validation(format!(
                "unsupported import file {}: expected .json or .csv",
                path.display()
            ))),
        }
    }
}

/// A fund to import with its schemes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFund {
    pub name: String,
    #[serde(alias = "amcName")]
    pub amc: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub aum: Option<f64>,
    #[serde(default, alias = "foundedDate")]
    pub founded: Option<NaiveDate>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub schemes: Vec<ImportScheme>,
}

/// A scheme to import. Enum-valued fields stay text until ingestion so a
/// bad value fails one record instead of the whole file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportScheme {
    pub name: String,
    #[serde(default)]
    pub nav: Option<f64>,
    #[serde(rename = "type", default)]
    pub scheme_type: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub expense_ratio: Option<f64>,
    #[serde(rename = "returns1Y", default)]
    pub returns_1y: Option<f64>,
    #[serde(rename = "returns3Y", default)]
    pub returns_3y: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ImportDocument {
    #[serde(default)]
    funds: Vec<ImportFund>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    fund: String,
    amc: String,
    #[serde(default)]
    scheme: Option<String>,
    #[serde(default)]
    nav: Option<f64>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    aum: Option<f64>,
    #[serde(rename = "riskLevel", default)]
    risk_level: Option<String>,
    #[serde(rename = "type", default)]
    scheme_type: Option<String>,
}

/// Parsed import file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatch {
    pub funds: Vec<ImportFund>,
    /// Rows that could not be read, as messages. Each counts as one failed
    /// record.
    pub rejected: Vec<String>,
}

impl ImportBatch {
    /// Records the batch will report on.
    pub fn record_count(&self) -> usize {
        self.rejected.len()
            + self
                .funds
                .iter()
                .map(|fund| 1 + fund.schemes.len())
                .sum::<usize>()
    }
}

/// Parse a JSON import document.
pub fn parse_json(text: &str) -> Result<ImportBatch> {
    let document: ImportDocument = serde_json::from_str(text)?;
    Ok(ImportBatch {
        funds: document.funds,
        rejected: Vec::new(),
    })
}

/// Parse a CSV import file.
pub fn parse_csv(text: &str) -> Result<ImportBatch> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    for required in ["fund", "amc"] {
        if !headers.iter().any(|h| h == required) {
            return Err(AdminError::Validation(format!(
                "CSV header is missing the `{required}` column"
            )));
        }
    }

    let mut batch = ImportBatch::default();
    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                batch.rejected.push(format!("line {line}: {err}"));
                continue;
            }
        };

        let same_fund = batch
            .funds
            .last()
            .is_some_and(|fund| fund.name == row.fund && fund.amc == row.amc);
        if !same_fund {
            batch.funds.push(ImportFund {
                name: row.fund,
                amc: row.amc,
                category: row.category.filter(|c| !c.is_empty()),
                aum: row.aum,
                founded: None,
                active: None,
                schemes: Vec::new(),
            });
        }

        let Some(name) = row.scheme.filter(|s| !s.is_empty()) else {
            continue;
        };
        if let Some(fund) = batch.funds.last_mut() {
            fund.schemes.push(ImportScheme {
                name,
                nav: row.nav,
                scheme_type: row.scheme_type.filter(|s| !s.is_empty()),
                risk_level: row.risk_level.filter(|s| !s.is_empty()),
                expense_ratio: None,
                returns_1y: None,
                returns_3y: None,
            });
        }
    }
    Ok(batch)
}

/// Parse `text` in the given format.
pub fn parse(text: &str, format: ImportFormat) -> Result<ImportBatch> {
    match format {
        ImportFormat::Json => parse_json(text),
        ImportFormat::Csv => parse_csv(text),
    }
}

/// Progress notification, sent after every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.processed * 100 / self.total).min(100) as u8
    }
}

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub success: usize,
    pub failed: usize,
    /// One message per failed record.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl IngestReport {
    fn fail(&mut self, message: String) {
        tracing::warn!("{message}");
        self.failed += 1;
        self.errors.push(message);
    }
}

fn to_new_scheme(fund_id: &str, scheme: ImportScheme) -> Result<NewScheme> {
    let defaults = NewScheme::default();
    Ok(NewScheme {
        fund_id: fund_id.to_owned(),
        name: scheme.name,
        scheme_type: scheme
            .scheme_type
            .as_deref()
            .map(str::parse::<SchemeType>)
            .transpose()?
            .unwrap_or(defaults.scheme_type),
        risk_level: scheme
            .risk_level
            .as_deref()
            .map(str::parse::<RiskLevel>)
            .transpose()?
            .unwrap_or(defaults.risk_level),
        nav: scheme.nav.unwrap_or(defaults.nav),
        expense_ratio: scheme.expense_ratio.unwrap_or(defaults.expense_ratio),
        returns_1y: scheme.returns_1y.unwrap_or(defaults.returns_1y),
        returns_3y: scheme.returns_3y.unwrap_or(defaults.returns_3y),
    })
}

/// Writes parsed batches through a [`ReferenceRepository`].
pub struct DataLoader {
    repo: Arc<dyn ReferenceRepository>,
}

impl DataLoader {
    pub fn new(repo: Arc<dyn ReferenceRepository>) -> Self {
        Self { repo }
    }

    /// Store every fund of the batch, then its schemes.
    pub async fn ingest(
        &self,
        batch: ImportBatch,
        mut on_progress: impl FnMut(Progress),
    ) -> IngestReport {
        let total = batch.record_count();
        let mut processed = 0;
        let mut report = IngestReport::default();
        let mut step = || {
            processed += 1;
            on_progress(Progress { processed, total });
        };

        for message in batch.rejected {
            report.fail(message);
            step();
        }

        for fund in batch.funds {
            let new_fund = NewFund {
                name: fund.name.clone(),
                amc_name: fund.amc,
                aum: fund.aum.unwrap_or_default(),
                category: fund
                    .category
                    .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
                founded_date: fund.founded.unwrap_or_else(today),
                active: fund.active.unwrap_or(true),
            };

            let stored = match self.repo.create_fund(new_fund).await {
                Ok(stored) => {
                    report.success += 1;
                    step();
                    stored
                }
                Err(err) => {
                    report.fail(format!("fund {:?}: {err}", fund.name));
                    step();
                    for scheme in fund.schemes {
                        report.fail(format!(
                            "scheme {:?}: fund {:?} was not stored",
                            scheme.name, fund.name
                        ));
                        step();
                    }
                    continue;
                }
            };

            for scheme in fund.schemes {
                let name = scheme.name.clone();
                let created = match to_new_scheme(&stored.id, scheme) {
                    Ok(new_scheme) => self.repo.create_scheme(new_scheme).await,
                    Err(err) => Err(err),
                };
                match created {
                    Ok(_) => report.success += 1,
                    Err(err) => report.fail(format!("scheme {name:?}: {err}")),
                }
                step();
            }
        }

        tracing::info!(
            success = report.success,
            failed = report.failed,
            "import finished"
        );
        report
    }

    /// Parse and ingest `text`.
    pub async fn import_str(
        &self,
        text: &str,
        format: ImportFormat,
        on_progress: impl FnMut(Progress),
    ) -> Result<IngestReport> {
        let batch = parse(text, format)?;
        Ok(self.ingest(batch, on_progress).await)
    }

    /// Read, parse and ingest a `.json` or `.csv` file.
    pub async fn import_file(
        &self,
        path: impl AsRef<Path>,
        on_progress: impl FnMut(Progress),
    ) -> Result<IngestReport> {
        let path = path.as_ref();
        let format = ImportFormat::from_path(path)?;
        let text = tokio::fs::read_to_string(path).await?;
        self.import_str(&text, format, on_progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_group_by_fund() {
        let batch = parse_csv(
            "fund,amc,scheme,nav,category,aum,riskLevel,type\n\
             Bluechip,HDFC AMC,Direct Growth,54.2,Equity,1200,High,Open Ended\n\
             Bluechip,HDFC AMC,Regular IDCW,21.0,,,,\n\
             Liquid,Axis AMC,,,Debt,,,\n",
        )
        .unwrap();
        assert!(batch.rejected.is_empty());
        assert_eq!(batch.funds.len(), 2);
        assert_eq!(batch.funds[0].schemes.len(), 2);
        assert_eq!(batch.funds[0].aum, Some(1200.0));
        assert_eq!(batch.funds[0].schemes[0].risk_level.as_deref(), Some("High"));
        assert!(batch.funds[1].schemes.is_empty());
        assert_eq!(batch.record_count(), 4);
    }

    #[test]
    fn minimal_csv_header_is_accepted() {
        let batch = parse_csv("fund,amc,scheme,nav\nFlexi,PPFAS,Direct,70.1\n").unwrap();
        assert_eq!(batch.funds[0].schemes[0].nav, Some(70.1));
        assert_eq!(batch.funds[0].category, None);
    }

    #[test]
    fn unreadable_csv_row_is_rejected_not_fatal() {
        let batch = parse_csv("fund,amc,scheme,nav\nA,B,C,abc\nD,E,F,1\n").unwrap();
        assert_eq!(batch.rejected.len(), 1);
        assert!(batch.rejected[0].starts_with("line 2:"));
        assert_eq!(batch.funds.len(), 1);
    }

    #[test]
    fn csv_without_amc_column_fails() {
        let err = parse_csv("fund,scheme\nA,B\n").unwrap_err();
        assert!(err.to_string().contains("amc"));
    }

    #[test]
    fn json_accepts_amc_name_alias() {
        let batch =
            parse_json(r#"{"funds":[{"name":"A","amcName":"B","schemes":[{"name":"C"}]}]}"#)
                .unwrap();
        assert_eq!(batch.funds[0].amc, "B");
        assert_eq!(batch.funds[0].schemes[0].nav, None);
    }

    #[test]
    fn progress_percent() {
        assert_eq!(Progress { processed: 1, total: 4 }.percent(), 25);
        assert_eq!(Progress { processed: 0, total: 0 }.percent(), 100);
    }
}
