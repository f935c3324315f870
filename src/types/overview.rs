//! Scheme overview: the descriptive page of a scheme.
//!
//! Older service builds send the entry load as `schemeLoad`; newer ones send
//! `entryLoad` and sometimes both. The two are folded into
//! [`SchemeOverview::entry_load`] while deserializing so callers never have
//! to look at both.

use serde::{Deserialize, Serialize};

use crate::constants::NOT_AVAILABLE;

/// Descriptive and financial overview of a scheme.
///
/// Returned by `GET /scheme/{id}/overview` and its `sysnc` variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawSchemeOverview")]
pub struct SchemeOverview {
    pub id: i64,
    pub mf_name: String,
    pub scheme_name: String,
    pub scheme_type_desc: Option<String>,
    pub scheme_cat_desc: Option<String>,
    pub scheme_objective: Option<String>,
    /// Entry load; populated from the legacy `schemeLoad` when needed.
    pub entry_load: Option<String>,
    pub exit_load: Option<String>,
    pub scheme_min_amt: Option<String>,
    pub launch_date: Option<String>,
    pub closure_date: Option<String>,
    pub reopening_date: Option<String>,
    pub amc_website: Option<String>,
    pub fund_manager: Option<String>,
    pub benchmark: Option<String>,
    pub additional_benchmark: Option<String>,
    pub riskometer_value: Option<String>,
    pub riskometer_launch_value: Option<String>,
    pub riskometer_date: Option<String>,
    pub registrar: Option<String>,
    pub custodian: Option<String>,
    pub face_value: Option<f64>,
    pub offer_price: Option<f64>,
    pub lock_in_period: Option<String>,
    pub plans_offered: Option<String>,
    pub options_offered: Option<String>,
    pub expense_ratio_regular: Option<f64>,
    pub expense_ratio_direct: Option<f64>,
}

impl SchemeOverview {
    /// A blank overview to start a manual entry from.
    pub fn blank(id: i64, mf_name: impl Into<String>, scheme_name: impl Into<String>) -> Self {
        Self {
            id,
            mf_name: mf_name.into(),
            scheme_name: scheme_name.into(),
            ..Default::default()
        }
    }

    /// Launch date as a plain calendar date, or `"N/A"`.
    pub fn launch_date_display(&self) -> String {
        format_date(self.launch_date.as_deref())
    }
}

/// Show an optional text field, `"N/A"` when absent or blank.
pub fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(NOT_AVAILABLE)
}

/// Render an ISO timestamp or date as `YYYY-MM-DD`.
///
/// Values that parse as neither are returned unchanged; missing values show
/// as `"N/A"`.
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return NOT_AVAILABLE.to_owned();
    };
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return ts.date_naive().to_string();
    }
    if let Ok(ts) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return ts.date().to_string();
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.to_string();
    }
    raw.to_owned()
}

/// Wire shape, carrying both spellings of the entry load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchemeOverview {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    mf_name: Option<String>,
    #[serde(default)]
    scheme_name: Option<String>,
    #[serde(default)]
    scheme_type_desc: Option<String>,
    #[serde(default)]
    scheme_cat_desc: Option<String>,
    #[serde(default)]
    scheme_objective: Option<String>,
    #[serde(default)]
    entry_load: Option<String>,
    #[serde(default)]
    scheme_load: Option<String>,
    #[serde(default)]
    exit_load: Option<String>,
    #[serde(default, deserialize_with = "crate::types::de::opt_string")]
    scheme_min_amt: Option<String>,
    #[serde(default)]
    launch_date: Option<String>,
    #[serde(default)]
    closure_date: Option<String>,
    #[serde(default)]
    reopening_date: Option<String>,
    #[serde(default)]
    amc_website: Option<String>,
    #[serde(default)]
    fund_manager: Option<String>,
    #[serde(default)]
    benchmark: Option<String>,
    #[serde(default)]
    additional_benchmark: Option<String>,
    #[serde(default, deserialize_with = "crate::types::de::opt_string")]
    riskometer_value: Option<String>,
    #[serde(default, deserialize_with = "crate::types::de::opt_string")]
    riskometer_launch_value: Option<String>,
    #[serde(default)]
    riskometer_date: Option<String>,
    #[serde(default)]
    registrar: Option<String>,
    #[serde(default)]
    custodian: Option<String>,
    #[serde(default)]
    face_value: Option<f64>,
    #[serde(default)]
    offer_price: Option<f64>,
    #[serde(default)]
    lock_in_period: Option<String>,
    #[serde(default)]
    plans_offered: Option<String>,
    #[serde(default)]
    options_offered: Option<String>,
    #[serde(default)]
    expense_ratio_regular: Option<f64>,
    #[serde(default)]
    expense_ratio_direct: Option<f64>,
}

impl From<RawSchemeOverview> for SchemeOverview {
    fn from(raw: RawSchemeOverview) -> Self {
        let entry_load = raw
            .entry_load
            .filter(|v| !v.trim().is_empty())
            .or(raw.scheme_load);
        Self {
            id: raw.id,
            mf_name: raw.mf_name.unwrap_or_default(),
            scheme_name: raw.scheme_name.unwrap_or_default(),
            scheme_type_desc: raw.scheme_type_desc,
            scheme_cat_desc: raw.scheme_cat_desc,
            scheme_objective: raw.scheme_objective,
            entry_load,
            exit_load: raw.exit_load,
            scheme_min_amt: raw.scheme_min_amt,
            launch_date: raw.launch_date,
            closure_date: raw.closure_date,
            reopening_date: raw.reopening_date,
            amc_website: raw.amc_website,
            fund_manager: raw.fund_manager,
            benchmark: raw.benchmark,
            additional_benchmark: raw.additional_benchmark,
            riskometer_value: raw.riskometer_value,
            riskometer_launch_value: raw.riskometer_launch_value,
            riskometer_date: raw.riskometer_date,
            registrar: raw.registrar,
            custodian: raw.custodian,
            face_value: raw.face_value,
            offer_price: raw.offer_price,
            lock_in_period: raw.lock_in_period,
            plans_offered: raw.plans_offered,
            options_offered: raw.options_offered,
            expense_ratio_regular: raw.expense_ratio_regular,
            expense_ratio_direct: raw.expense_ratio_direct,
        }
    }
}
