//! Scheme types: local schemes and the remote scheme list projection.

use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};
use crate::types::enums::*;
use crate::types::page::PageResponse;

// ---------------------------------------------------------------------------
// Local schemes
// ---------------------------------------------------------------------------

/// An investment scheme offered under a [`MutualFund`](crate::types::fund::MutualFund).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: String,
    pub fund_id: String,
    /// Name of the parent fund, filled in when listing. Not authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fund_name: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub scheme_type: SchemeType,
    #[serde(default)]
    pub risk_level: RiskLevel,
    /// Net asset value per unit.
    #[serde(default)]
    pub nav: f64,
    #[serde(default)]
    pub expense_ratio: f64,
    #[serde(rename = "returns1Y", default)]
    pub returns_1y: f64,
    #[serde(rename = "returns3Y", default)]
    pub returns_3y: f64,
}

/// A scheme that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheme {
    pub fund_id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub scheme_type: SchemeType,
    #[serde(default)]
    pub risk_level: RiskLevel,
    pub nav: f64,
    pub expense_ratio: f64,
    #[serde(rename = "returns1Y", default)]
    pub returns_1y: f64,
    #[serde(rename = "returns3Y", default)]
    pub returns_3y: f64,
}

impl Default for NewScheme {
    fn default() -> Self {
        Self {
            fund_id: String::new(),
            name: "Growth Plan".to_owned(),
            scheme_type: SchemeType::OpenEnded,
            risk_level: RiskLevel::Moderate,
            nav: 10.0,
            expense_ratio: 1.0,
            returns_1y: 0.0,
            returns_3y: 0.0,
        }
    }
}

impl NewScheme {
    /// Reject drafts that cannot be stored.
    pub fn validate(&self) -> Result<()> {
        if self.fund_id.trim().is_empty() {
            return Err(AdminError::Validation("scheme needs a fund".into()));
        }
        if self.name.trim().is_empty() {
            return Err(AdminError::Validation("scheme name is required".into()));
        }
        if !self.nav.is_finite() || self.nav < 0.0 {
            return Err(AdminError::Validation(format!("invalid NAV: {}", self.nav)));
        }
        Ok(())
    }

    /// Attach an id, producing the stored record.
    pub fn into_scheme(self, id: String) -> Scheme {
        Scheme {
            id,
            fund_id: self.fund_id,
            fund_name: None,
            name: self.name,
            scheme_type: self.scheme_type,
            risk_level: self.risk_level,
            nav: self.nav,
            expense_ratio: self.expense_ratio,
            returns_1y: self.returns_1y,
            returns_3y: self.returns_3y,
        }
    }
}

impl From<Scheme> for NewScheme {
    fn from(scheme: Scheme) -> Self {
        Self {
            fund_id: scheme.fund_id,
            name: scheme.name,
            scheme_type: scheme.scheme_type,
            risk_level: scheme.risk_level,
            nav: scheme.nav,
            expense_ratio: scheme.expense_ratio,
            returns_1y: scheme.returns_1y,
            returns_3y: scheme.returns_3y,
        }
    }
}

// ---------------------------------------------------------------------------
// Remote scheme list
// ---------------------------------------------------------------------------

/// Lightweight scheme row returned by `GET /scheme/page`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeApiItem {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "crate::types::de::opt_string")]
    pub amfi_id: Option<String>,
}

/// Page envelope of `GET /scheme/page`.
pub type SchemePageResponse = PageResponse<SchemeApiItem>;

/// Filters and paging for `GET /scheme/page`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemePageQuery {
    pub page_no: u32,
    pub page_size: u32,
    /// Restrict to one fund house.
    pub fund_house_id: Option<String>,
    /// Free-text name search.
    pub search: Option<String>,
}

impl SchemePageQuery {
    pub fn new(page_no: u32, page_size: u32) -> Self {
        Self {
            page_no,
            page_size,
            ..Default::default()
        }
    }

    pub fn fund_house(mut self, id: impl Into<String>) -> Self {
        self.fund_house_id = Some(id.into());
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Query pairs, skipping empty filters.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("pageNo", self.page_no.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(id) = self.fund_house_id.as_deref().filter(|s| !s.is_empty()) {
            query.push(("fundHouseId", id.to_owned()));
        }
        if let Some(text) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(("search", text.to_owned()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_are_not_encoded() {
        let query = SchemePageQuery::new(2, 20).fund_house("").search("");
        assert_eq!(
            query.to_query(),
            vec![("pageNo", "2".to_owned()), ("pageSize", "20".to_owned())]
        );
    }

    #[test]
    fn filters_follow_paging() {
        let query = SchemePageQuery::new(0, 10).fund_house("7").search("flexi cap");
        let keys: Vec<_> = query.to_query().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["pageNo", "pageSize", "fundHouseId", "search"]);
    }

    #[test]
    fn scheme_wire_names() {
        let scheme = NewScheme {
            fund_id: "f1".into(),
            ..Default::default()
        }
        .into_scheme("s1".into());
        let json = serde_json::to_value(&scheme).unwrap();
        assert_eq!(json["type"], "Open Ended");
        assert_eq!(json["riskLevel"], "Moderate");
        assert_eq!(json["returns1Y"], 0.0);
        assert!(json.get("fundName").is_none());
    }
}
