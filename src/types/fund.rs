//! Mutual fund types managed by the local store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};

/// Category a fund starts with when none is given.
pub const DEFAULT_CATEGORY: &str = "Equity";

/// A mutual fund record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutualFund {
    pub id: String,
    pub name: String,
    /// Asset Management Company operating the fund.
    pub amc_name: String,
    /// Assets under management, in millions.
    #[serde(default)]
    pub aum: f64,
    pub category: String,
    pub founded_date: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// A fund that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFund {
    pub name: String,
    pub amc_name: String,
    #[serde(default)]
    pub aum: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "today")]
    pub founded_date: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Default for NewFund {
    fn default() -> Self {
        Self {
            name: String::new(),
            amc_name: String::new(),
            aum: 0.0,
            category: default_category(),
            founded_date: today(),
            active: true,
        }
    }
}

impl NewFund {
    /// Reject drafts without a name or AMC, the two required form fields.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AdminError::Validation("fund name is required".into()));
        }
        if self.amc_name.trim().is_empty() {
            return Err(AdminError::Validation("AMC name is required".into()));
        }
        if !self.aum.is_finite() || self.aum < 0.0 {
            return Err(AdminError::Validation(format!("invalid AUM: {}", self.aum)));
        }
        Ok(())
    }

    /// Attach an id, producing the stored record.
    pub fn into_fund(self, id: String) -> MutualFund {
        MutualFund {
            id,
            name: self.name,
            amc_name: self.amc_name,
            aum: self.aum,
            category: self.category,
            founded_date: self.founded_date,
            active: self.active,
        }
    }
}

impl From<MutualFund> for NewFund {
    fn from(fund: MutualFund) -> Self {
        Self {
            name: fund.name,
            amc_name: fund.amc_name,
            aum: fund.aum,
            category: fund.category,
            founded_date: fund.founded_date,
            active: fund.active,
        }
    }
}

fn default_active() -> bool {
    true
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_owned()
}

/// Local calendar date, the default founding date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
