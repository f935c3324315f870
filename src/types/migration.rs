//! Grouped migration types.

use serde::{Deserialize, Serialize};

use crate::types::page::PageResponse;

/// All NAV options sharing one scheme name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedMigrationScheme {
    #[serde(default, deserialize_with = "crate::types::de::opt_string")]
    pub id: Option<String>,
    pub scheme_name: String,
    #[serde(default)]
    pub nav_options: Vec<SchemeNavOption>,
}

impl GroupedMigrationScheme {
    /// Key identifying one NAV row of this group on screen.
    pub fn row_key(&self, nav_index: usize) -> String {
        let code = self
            .nav_options
            .get(nav_index)
            .map_or("", |nav| nav.code.as_str());
        format!("{}-{}-{}", self.scheme_name, code, nav_index)
    }

    /// Whether every NAV option of the group has been migrated.
    pub fn fully_migrated(&self) -> bool {
        !self.nav_options.is_empty() && self.nav_options.iter().all(|nav| nav.migrated)
    }
}

/// A NAV option row of a grouped scheme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeNavOption {
    #[serde(default)]
    pub scheme_nav_name: String,
    #[serde(default, deserialize_with = "crate::types::de::string")]
    pub code: String,
    #[serde(default)]
    pub isin_div_pay_out: Option<String>,
    #[serde(default)]
    pub isin_growth_and_reinvest: Option<String>,
    #[serde(default)]
    pub launch_date: Option<String>,
    #[serde(default)]
    pub migrated: bool,
}

/// Page envelope of `GET /api/admin/migration/grouped`.
pub type GroupedMigrationResponse = PageResponse<GroupedMigrationScheme>;

/// Request body of `POST /api/admin/migration/scheme-name`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateSchemeRequest<'a> {
    pub scheme_name: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_key_joins_name_code_and_index() {
        let group: GroupedMigrationScheme = serde_json::from_str(
            r#"{"schemeName":"HDFC Flexi Cap","navOptions":[{"schemeNavName":"Direct","code":119551}]}"#,
        )
        .unwrap();
        assert_eq!(group.row_key(0), "HDFC Flexi Cap-119551-0");
    }

    #[test]
    fn empty_group_is_not_migrated() {
        assert!(!GroupedMigrationScheme::default().fully_migrated());
    }
}
