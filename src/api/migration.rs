//! Scheme migration endpoints: grouped list, CSV ingestion trigger and
//! migrate-by-name.

use crate::api::recover;
use crate::client::AdminClient;
use crate::error::Result;
use crate::types::migration::{GroupedMigrationResponse, MigrateSchemeRequest};

impl AdminClient {
    /// Retrieve one zero-based page of schemes grouped by scheme name.
    /// `None` on failure.
    ///
    /// **Endpoint:** `GET /api/admin/migration/grouped?pageNo&pageSize`
    pub async fn get_grouped_migration_schemes(
        &self,
        page_no: u32,
        page_size: u32,
    ) -> Option<GroupedMigrationResponse> {
        recover(
            self.try_get_grouped_migration_schemes(page_no, page_size)
                .await
                .map(Some),
            None,
            "grouped migration",
        )
    }

    /// Strict variant of
    /// [`get_grouped_migration_schemes`](Self::get_grouped_migration_schemes).
    pub async fn try_get_grouped_migration_schemes(
        &self,
        page_no: u32,
        page_size: u32,
    ) -> Result<GroupedMigrationResponse> {
        let url = self.endpoint(
            &["api", "admin", "migration", "grouped"],
            &[
                ("pageNo", page_no.to_string()),
                ("pageSize", page_size.to_string()),
            ],
        )?;
        self.get(url).await
    }

    /// Trigger ingestion of the scheme CSV on the service. Returns whether
    /// the trigger succeeded.
    ///
    /// **Endpoint:** `GET /scheme/getschemeCsv`
    pub async fn load_scheme_csv(&self) -> bool {
        recover(
            self.try_load_scheme_csv().await.map(|()| true),
            false,
            "scheme CSV load",
        )
    }

    /// Strict variant of [`load_scheme_csv`](Self::load_scheme_csv).
    pub async fn try_load_scheme_csv(&self) -> Result<()> {
        self.get_no_content(self.endpoint(&["scheme", "getschemeCsv"], &[])?)
            .await
    }

    /// Migrate every NAV option of a scheme, identified by its name. Returns
    /// whether the request succeeded.
    ///
    /// **Endpoint:** `POST /api/admin/migration/scheme-name`
    pub async fn migrate_scheme_by_name(&self, scheme_name: &str) -> bool {
        recover(
            self.try_migrate_scheme_by_name(scheme_name)
                .await
                .map(|()| true),
            false,
            format_args!("scheme migration for {scheme_name:?}"),
        )
    }

    /// Strict variant of [`migrate_scheme_by_name`](Self::migrate_scheme_by_name).
    pub async fn try_migrate_scheme_by_name(&self, scheme_name: &str) -> Result<()> {
        let url = self.endpoint(&["api", "admin", "migration", "scheme-name"], &[])?;
        self.post_no_content(url, &MigrateSchemeRequest { scheme_name })
            .await
    }
}
