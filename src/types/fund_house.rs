//! Fund house (AMC) types.

use serde::{Deserialize, Serialize};

/// A registered Asset Management Company.
///
/// Returned by `GET /fund-house`. `amfi_id` is the key used for
/// `GET /scheme/amfi/{amfiId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundHouse {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "crate::types::de::string")]
    pub amfi_id: String,
    #[serde(default)]
    pub cams_kra_code: Option<String>,
    #[serde(default)]
    pub karvy_kra_code: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub fund_type: String,
}

/// Opaque scheme record returned by `GET /scheme/amfi/{amfiId}`.
pub type AmfiSchemeRecord = serde_json::Map<String, serde_json::Value>;
