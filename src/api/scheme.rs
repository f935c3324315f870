//! Scheme endpoints: AMFI lookup, paged list, overview, plan options and
//! transaction detail.

use crate::api::recover;
use crate::client::AdminClient;
use crate::error::Result;
use crate::types::fund_house::AmfiSchemeRecord;
use crate::types::overview::SchemeOverview;
use crate::types::plan::{SchemePlanOption, SchemeTransactionDetail};
use crate::types::scheme::{SchemePageQuery, SchemePageResponse};

impl AdminClient {
    /// Retrieve the raw scheme records of a fund house by its AMFI id.
    ///
    /// Empty on failure.
    ///
    /// **Endpoint:** `GET /scheme/amfi/{amfiId}`
    pub async fn get_schemes_by_amfi(&self, amfi_id: &str) -> Vec<AmfiSchemeRecord> {
        recover(
            self.try_get_schemes_by_amfi(amfi_id).await,
            Vec::new(),
            format_args!("scheme lookup for AMFI {amfi_id}"),
        )
    }

    /// Strict variant of [`get_schemes_by_amfi`](Self::get_schemes_by_amfi).
    pub async fn try_get_schemes_by_amfi(&self, amfi_id: &str) -> Result<Vec<AmfiSchemeRecord>> {
        self.get(self.endpoint(&["scheme", "amfi", amfi_id], &[])?)
            .await
    }

    /// Retrieve one page of schemes, optionally filtered by fund house and
    /// name. `None` on failure.
    ///
    /// **Endpoint:** `GET /scheme/page?pageNo&pageSize&fundHouseId&search`
    pub async fn get_schemes_page(&self, query: &SchemePageQuery) -> Option<SchemePageResponse> {
        recover(
            self.try_get_schemes_page(query).await.map(Some),
            None,
            "scheme page",
        )
    }

    /// Strict variant of [`get_schemes_page`](Self::get_schemes_page).
    pub async fn try_get_schemes_page(&self, query: &SchemePageQuery) -> Result<SchemePageResponse> {
        self.get(self.endpoint(&["scheme", "page"], &query.to_query())?)
            .await
    }

    /// Look up the stored overview of a scheme. `None` when the service has
    /// none or the request failed.
    ///
    /// **Endpoint:** `GET /scheme/{id}/overview`
    pub async fn get_scheme_overview(&self, scheme_id: &str) -> Option<SchemeOverview> {
        recover(
            self.try_get_scheme_overview(scheme_id).await,
            None,
            format_args!("scheme overview for id {scheme_id}"),
        )
    }

    /// Strict variant of [`get_scheme_overview`](Self::get_scheme_overview).
    pub async fn try_get_scheme_overview(&self, scheme_id: &str) -> Result<Option<SchemeOverview>> {
        self.get_optional(self.endpoint(&["scheme", scheme_id, "overview"], &[])?)
            .await
    }

    /// Ask the service to fetch the overview from its upstream source and
    /// return it. `None` when nothing could be synced or the request failed.
    ///
    /// **Endpoint:** `GET /scheme/{id}/overview/sysnc` (the path is spelled
    /// this way by the service)
    pub async fn sync_scheme_overview(&self, scheme_id: &str) -> Option<SchemeOverview> {
        recover(
            self.try_sync_scheme_overview(scheme_id).await,
            None,
            format_args!("scheme overview sync for id {scheme_id}"),
        )
    }

    /// Strict variant of [`sync_scheme_overview`](Self::sync_scheme_overview).
    pub async fn try_sync_scheme_overview(&self, scheme_id: &str) -> Result<Option<SchemeOverview>> {
        self.get_optional(self.endpoint(&["scheme", scheme_id, "overview", "sysnc"], &[])?)
            .await
    }

    /// Retrieve the plan options of a scheme. Empty on failure.
    ///
    /// **Endpoint:** `GET /scheme/{id}/plan-options`
    pub async fn get_scheme_plan_options(&self, scheme_id: &str) -> Vec<SchemePlanOption> {
        recover(
            self.try_get_scheme_plan_options(scheme_id).await,
            Vec::new(),
            format_args!("plan options for id {scheme_id}"),
        )
    }

    /// Strict variant of [`get_scheme_plan_options`](Self::get_scheme_plan_options).
    pub async fn try_get_scheme_plan_options(&self, scheme_id: &str) -> Result<Vec<SchemePlanOption>> {
        let options: Option<Vec<SchemePlanOption>> = self
            .get_optional(self.endpoint(&["scheme", scheme_id, "plan-options"], &[])?)
            .await?;
        Ok(options.unwrap_or_default())
    }

    /// Retrieve the transaction limits and rules of a scheme. `None` on
    /// failure.
    ///
    /// **Endpoint:** `GET /scheme/{id}/transaction-detail`
    pub async fn get_scheme_transaction_detail(
        &self,
        scheme_id: &str,
    ) -> Option<SchemeTransactionDetail> {
        recover(
            self.try_get_scheme_transaction_detail(scheme_id).await,
            None,
            format_args!("transaction detail for id {scheme_id}"),
        )
    }

    /// Strict variant of
    /// [`get_scheme_transaction_detail`](Self::get_scheme_transaction_detail).
    pub async fn try_get_scheme_transaction_detail(
        &self,
        scheme_id: &str,
    ) -> Result<Option<SchemeTransactionDetail>> {
        self.get_optional(self.endpoint(&["scheme", scheme_id, "transaction-detail"], &[])?)
            .await
    }
}
