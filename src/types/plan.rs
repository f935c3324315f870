//! Plan options, transaction detail and systematic transaction rules.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Plan options
// ---------------------------------------------------------------------------

/// One plan/option variant of a scheme (e.g. Direct Growth).
///
/// Returned by `GET /scheme/{id}/plan-options`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemePlanOption {
    pub id: i64,
    #[serde(default)]
    pub scheme_nav_name: String,
    #[serde(default, deserialize_with = "crate::types::de::opt_string")]
    pub amfi_code: Option<String>,
    #[serde(default)]
    pub option_type: Option<String>,
    #[serde(default)]
    pub plan_type: Option<String>,
    #[serde(default, deserialize_with = "crate::types::de::opt_string")]
    pub rta_scheme_code: Option<String>,
    #[serde(default)]
    pub isin_div_pay_out: Option<String>,
    #[serde(default)]
    pub isin_growth_and_reinvest: Option<String>,
    #[serde(default)]
    pub sebi_code: Option<String>,
}

// ---------------------------------------------------------------------------
// Transaction detail
// ---------------------------------------------------------------------------

/// Transaction limits of a scheme.
///
/// Returned by `GET /scheme/{id}/transaction-detail`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeTransactionDetail {
    pub id: i64,
    #[serde(default)]
    pub min_redemption_amount: Option<f64>,
    #[serde(default)]
    pub max_redemption_amount: Option<f64>,
    #[serde(default)]
    pub min_redemption_units: Option<f64>,
    #[serde(default)]
    pub max_redemption_units: Option<f64>,
    #[serde(default)]
    pub min_balance_amount: Option<f64>,
    #[serde(default)]
    pub min_balance_units: Option<f64>,
    #[serde(default)]
    pub min_switch_amount: Option<f64>,
    #[serde(default)]
    pub max_switch_amount: Option<f64>,
    #[serde(default)]
    pub min_switch_units: Option<f64>,
    #[serde(default)]
    pub max_switch_units: Option<f64>,
    #[serde(default)]
    pub system_transaction_rules: Vec<SystemTransactionRule>,
}

/// A systematic transaction rule (SIP, SWP, STP, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemTransactionRule {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub rule_type: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    /// Allowed days of month or explicit dates.
    #[serde(default, deserialize_with = "crate::types::de::string_list")]
    pub day_or_dates: Vec<String>,
    #[serde(default)]
    pub min_amount: Option<f64>,
    #[serde(default)]
    pub max_amount: Option<f64>,
    #[serde(default)]
    pub min_installments: Option<u32>,
    #[serde(default)]
    pub multiplier: Option<f64>,
}
