//! Command console: one free-text instruction in, create actions out.
//!
//! Two instruction forms are understood:
//!
//! * a JSON array of `{"action": ..., "data": {...}}` objects, executed in
//!   order;
//! * a shorthand line of comma-separated `key:value` pairs starting with
//!   `fund:`, which creates one fund.
//!
//! ```
//! use mf_admin::console::{Action, parse_instruction};
//!
//! let actions = parse_instruction("fund:HDFC Flexi,amc:HDFC AMC,aum:12000").unwrap();
//! let Action::CreateFund(fund) = &actions[0] else { unreachable!() };
//! assert_eq!(fund.amc_name.as_deref(), Some("HDFC AMC"));
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::FUND_LOOKUP_LIMIT;
use crate::error::{AdminError, Result};
use crate::store::ReferenceRepository;
use crate::types::enums::{RiskLevel, SchemeType};
use crate::types::fund::{DEFAULT_CATEGORY, MutualFund, NewFund, today};
use crate::types::scheme::{NewScheme, Scheme};

/// Fund name used when a `CREATE_FUND` action has none.
pub const DEFAULT_FUND_NAME: &str = "Untitled Fund";
/// AMC used when a `CREATE_FUND` action has none.
pub const DEFAULT_AMC_NAME: &str = "Generic AMC";

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// One console action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    CreateFund(FundArgs),
    CreateScheme(SchemeArgs),
}

/// Fields of a `CREATE_FUND` action. Missing fields take defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FundArgs {
    pub name: Option<String>,
    #[serde(alias = "amc")]
    pub amc_name: Option<String>,
    pub category: Option<String>,
    pub aum: Option<f64>,
    #[serde(alias = "founded")]
    pub founded_date: Option<NaiveDate>,
    pub active: Option<bool>,
}

/// Fields of a `CREATE_SCHEME` action. The fund is given either by id or by
/// (part of) its name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemeArgs {
    pub fund_id: Option<String>,
    pub fund_name: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub scheme_type: Option<SchemeType>,
    pub risk_level: Option<RiskLevel>,
    pub nav: Option<f64>,
    pub expense_ratio: Option<f64>,
    #[serde(rename = "returns1Y")]
    pub returns_1y: Option<f64>,
    #[serde(rename = "returns3Y")]
    pub returns_3y: Option<f64>,
}

fn text_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

impl FundArgs {
    /// The fund to create, defaults applied.
    pub fn into_new_fund(self) -> NewFund {
        NewFund {
            name: text_or(self.name, DEFAULT_FUND_NAME),
            amc_name: text_or(self.amc_name, DEFAULT_AMC_NAME),
            aum: self.aum.unwrap_or(0.0),
            category: text_or(self.category, DEFAULT_CATEGORY),
            founded_date: self.founded_date.unwrap_or_else(today),
            active: self.active.unwrap_or(true),
        }
    }
}

impl SchemeArgs {
    /// The scheme to create under `fund_id`, defaults applied.
    pub fn into_new_scheme(self, fund_id: String) -> NewScheme {
        let defaults = NewScheme::default();
        NewScheme {
            fund_id,
            name: text_or(self.name, &defaults.name),
            scheme_type: self.scheme_type.unwrap_or(defaults.scheme_type),
            risk_level: self.risk_level.unwrap_or(defaults.risk_level),
            nav: self.nav.unwrap_or(defaults.nav),
            expense_ratio: self.expense_ratio.unwrap_or(defaults.expense_ratio),
            returns_1y: self.returns_1y.unwrap_or(defaults.returns_1y),
            returns_3y: self.returns_3y.unwrap_or(defaults.returns_3y),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// An array entry before its `data` is decoded.
#[derive(Deserialize)]
struct RawAction {
    action: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Turn an instruction into actions.
///
/// Fails with [`AdminError::NoActionRecognized`] for text that is neither
/// form, for an empty action array and for unknown action names. A known
/// action whose data does not decode is a [`AdminError::Validation`].
pub fn parse_instruction(instruction: &str) -> Result<Vec<Action>> {
    let text = instruction.trim();
    if text.starts_with('[') {
        match serde_json::from_str::<Vec<RawAction>>(text) {
            Ok(raw) if raw.is_empty() => return Err(AdminError::NoActionRecognized),
            Ok(raw) => return raw.into_iter().map(decode_action).collect(),
            Err(err) => tracing::debug!(error = %err, "instruction is not an action array"),
        }
    }
    match parse_shorthand(text)? {
        Some(action) => Ok(vec![action]),
        None => Err(AdminError::NoActionRecognized),
    }
}

fn decode_action(raw: RawAction) -> Result<Action> {
    fn args<T: serde::de::DeserializeOwned + Default>(data: serde_json::Value) -> Result<T> {
        if data.is_null() {
            return Ok(T::default());
        }
        serde_json::from_value(data).map_err(|err| AdminError::Validation(err.to_string()))
    }

    match raw.action.as_str() {
        "CREATE_FUND" => Ok(Action::CreateFund(args(raw.data)?)),
        "CREATE_SCHEME" => Ok(Action::CreateScheme(args(raw.data)?)),
        other => {
            tracing::debug!(action = other, "unknown console action");
            Err(AdminError::NoActionRecognized)
        }
    }
}

/// Parse `fund:<name>,amc:<amc>,...`. `None` when the text does not start
/// with `fund:`.
pub fn parse_shorthand(text: &str) -> Result<Option<Action>> {
    let starts_with_fund = text
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("fund:"));
    if !starts_with_fund {
        return Ok(None);
    }

    let mut args = FundArgs::default();
    for pair in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once(':')
            .ok_or_else(|| AdminError::Validation(format!("expected key:value, got {pair:?}")))?;
        let value = value.trim().to_owned();
        match key.trim().to_ascii_lowercase().as_str() {
            "fund" | "name" => args.name = Some(value),
            "amc" | "amcname" => args.amc_name = Some(value),
            "category" => args.category = Some(value),
            "aum" => {
                let aum = value
                    .parse::<f64>()
                    .map_err(|_| AdminError::Validation(format!("invalid aum: {value:?}")))?;
                args.aum = Some(aum);
            }
            "founded" | "foundeddate" => {
                let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
                    AdminError::Validation(format!("invalid founded date: {value:?}"))
                })?;
                args.founded_date = Some(date);
            }
            "active" => {
                let active = match value.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "y" | "1" => true,
                    "false" | "no" | "n" | "0" => false,
                    _ => {
                        return Err(AdminError::Validation(format!(
                            "invalid active flag: {value:?}"
                        )));
                    }
                };
                args.active = Some(active);
            }
            other => {
                return Err(AdminError::Validation(format!("unknown key: {other:?}")));
            }
        }
    }
    Ok(Some(Action::CreateFund(args)))
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Record created by an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Created {
    Fund(MutualFund),
    Scheme(Scheme),
}

/// Result of running an instruction.
#[derive(Debug)]
pub struct ConsoleReport {
    /// Number of actions the instruction parsed into.
    pub total: usize,
    /// Records created, in action order.
    pub created: Vec<Created>,
    /// The action that stopped execution, if any.
    pub failure: Option<AdminError>,
}

impl ConsoleReport {
    pub fn completed(&self) -> usize {
        self.created.len()
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

impl fmt::Display for ConsoleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => f.write_str("Instruction processed successfully!"),
            Some(err) => write!(
                f,
                "{err} ({} of {} actions completed)",
                self.completed(),
                self.total
            ),
        }
    }
}

/// Runs instructions against a repository.
pub struct Console {
    repo: Arc<dyn ReferenceRepository>,
}

impl Console {
    pub fn new(repo: Arc<dyn ReferenceRepository>) -> Self {
        Self { repo }
    }

    /// Parse and execute `instruction`. Parse failures are returned as
    /// errors; execution failures end up in the report.
    pub async fn run(&self, instruction: &str) -> Result<ConsoleReport> {
        let actions = parse_instruction(instruction)?;
        Ok(self.execute(actions).await)
    }

    /// Execute actions in order, stopping at the first failure.
    pub async fn execute(&self, actions: Vec<Action>) -> ConsoleReport {
        let mut report = ConsoleReport {
            total: actions.len(),
            created: Vec::with_capacity(actions.len()),
            failure: None,
        };
        for action in actions {
            match self.apply(action).await {
                Ok(created) => report.created.push(created),
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        completed = report.completed(),
                        "console action failed"
                    );
                    report.failure = Some(err);
                    break;
                }
            }
        }
        report
    }

    async fn apply(&self, action: Action) -> Result<Created> {
        match action {
            Action::CreateFund(args) => {
                let fund = self.repo.create_fund(args.into_new_fund()).await?;
                tracing::info!(id = %fund.id, name = %fund.name, "console created fund");
                Ok(Created::Fund(fund))
            }
            Action::CreateScheme(args) => {
                let fund = self
                    .resolve_fund(args.fund_id.as_deref(), args.fund_name.as_deref())
                    .await?;
                let scheme = self
                    .repo
                    .create_scheme(args.into_new_scheme(fund.id.clone()))
                    .await?;
                tracing::info!(
                    id = %scheme.id,
                    fund = %fund.name,
                    name = %scheme.name,
                    "console created scheme"
                );
                Ok(Created::Scheme(scheme))
            }
        }
    }

    /// Find the fund a scheme belongs to: by id when given, otherwise the
    /// first of the first 100 funds whose name contains `fund_name`,
    /// ignoring case.
    async fn resolve_fund(
        &self,
        fund_id: Option<&str>,
        fund_name: Option<&str>,
    ) -> Result<MutualFund> {
        if let Some(id) = fund_id.map(str::trim).filter(|id| !id.is_empty()) {
            return match self.repo.get_fund(id).await {
                Err(AdminError::NotFound { .. }) => Err(AdminError::FundNotResolved(id.to_owned())),
                other => other,
            };
        }

        let needle = fund_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AdminError::FundNotResolved(String::new()))?;
        let lowered = needle.to_lowercase();
        self.repo
            .list_funds(1, FUND_LOOKUP_LIMIT)
            .await?
            .data
            .into_iter()
            .find(|fund| fund.name.to_lowercase().contains(&lowered))
            .ok_or_else(|| AdminError::FundNotResolved(needle.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_builds_one_fund() {
        let actions =
            parse_instruction("fund:HDFC Flexi,amc:HDFC AMC,category:Equity,aum:12000").unwrap();
        assert_eq!(
            actions,
            vec![Action::CreateFund(FundArgs {
                name: Some("HDFC Flexi".into()),
                amc_name: Some("HDFC AMC".into()),
                category: Some("Equity".into()),
                aum: Some(12000.0),
                ..Default::default()
            })]
        );
    }

    #[test]
    fn shorthand_rejects_bad_values() {
        assert!(matches!(
            parse_instruction("fund:X,aum:lots"),
            Err(AdminError::Validation(_))
        ));
        assert!(matches!(
            parse_instruction("fund:X,colour:red"),
            Err(AdminError::Validation(_))
        ));
        assert!(matches!(
            parse_instruction("fund:X,founded:2020-02-30"),
            Err(AdminError::Validation(_))
        ));
    }

    #[test]
    fn action_array_parses_in_order() {
        let actions = parse_instruction(
            r#"[{"action":"CREATE_FUND","data":{"name":"Axis Bluechip","amcName":"Axis"}},
                {"action":"CREATE_SCHEME","data":{"fundName":"axis","type":"CLOSE_ENDED","riskLevel":"VERY_HIGH"}}]"#,
        )
        .unwrap();
        assert_eq!(actions.len(), 2);
        let Action::CreateScheme(args) = &actions[1] else {
            panic!("expected a scheme action");
        };
        assert_eq!(args.scheme_type, Some(SchemeType::CloseEnded));
        assert_eq!(args.risk_level, Some(RiskLevel::VeryHigh));
    }

    #[test]
    fn unrecognized_instructions() {
        for text in ["", "   ", "[]", "add a large cap fund please", "[{\"action\":\"DELETE\"}]"] {
            assert!(
                matches!(parse_instruction(text), Err(AdminError::NoActionRecognized)),
                "{text:?}"
            );
        }
    }

    #[test]
    fn mistyped_action_data_is_a_validation_error() {
        for text in [
            r#"[{"action":"CREATE_FUND","data":{"name":"HDFC Flexi","aum":"12000"}}]"#,
            r#"[{"action":"CREATE_FUND","data":{"foundedDate":"2020-13-01"}}]"#,
            r#"[{"action":"CREATE_FUND","data":{"name":"A"}},
                {"action":"CREATE_SCHEME","data":{"fundName":"A","riskLevel":"Extreme"}}]"#,
        ] {
            assert!(
                matches!(parse_instruction(text), Err(AdminError::Validation(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn action_without_data_takes_defaults() {
        let actions = parse_instruction(r#"[{"action":"CREATE_FUND"}]"#).unwrap();
        assert_eq!(actions, vec![Action::CreateFund(FundArgs::default())]);
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let fund = FundArgs {
            name: Some("  ".into()),
            ..Default::default()
        }
        .into_new_fund();
        assert_eq!(fund.name, DEFAULT_FUND_NAME);
        assert_eq!(fund.amc_name, DEFAULT_AMC_NAME);
        assert_eq!(fund.category, "Equity");
        assert!(fund.active);

        let scheme = SchemeArgs::default().into_new_scheme("f1".into());
        assert_eq!(scheme.name, "Growth Plan");
        assert_eq!(scheme.nav, 10.0);
        assert_eq!(scheme.expense_ratio, 1.0);
    }
}
