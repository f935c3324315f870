//! Fund house endpoints.

use crate::api::recover;
use crate::client::AdminClient;
use crate::error::Result;
use crate::types::fund_house::FundHouse;

impl AdminClient {
    /// Retrieve every registered fund house. Empty on failure.
    ///
    /// **Endpoint:** `GET /fund-house`
    pub async fn get_fund_houses(&self) -> Vec<FundHouse> {
        recover(self.try_get_fund_houses().await, Vec::new(), "fund house")
    }

    /// Strict variant of [`get_fund_houses`](Self::get_fund_houses).
    pub async fn try_get_fund_houses(&self) -> Result<Vec<FundHouse>> {
        self.get(self.endpoint(&["fund-house"], &[])?).await
    }
}
