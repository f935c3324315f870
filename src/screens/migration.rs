//! Scheme migration: grouped scheme list, CSV load trigger and per-row
//! migrate-by-name.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::client::AdminClient;
use crate::constants::{DEFAULT_PAGE_SIZE, MIGRATION_PAGE_SIZES};
use crate::error::{AdminError, Result};
use crate::pagination::ZeroBasedPager;
use crate::screens::{Generation, Ticket};
use crate::table::{Column, Table, TableView};
use crate::types::migration::{GroupedMigrationResponse, GroupedMigrationScheme, SchemeNavOption};

type InFlight = Arc<Mutex<HashSet<String>>>;

fn lock(set: &InFlight) -> MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a row as migrating for as long as it lives.
struct MigratingRow {
    set: InFlight,
    key: String,
}

impl MigratingRow {
    fn acquire(set: &InFlight, key: &str) -> Result<Self> {
        if !lock(set).insert(key.to_owned()) {
            return Err(AdminError::Busy(format!("{key} is already migrating")));
        }
        Ok(Self {
            set: Arc::clone(set),
            key: key.to_owned(),
        })
    }
}

impl Drop for MigratingRow {
    fn drop(&mut self) {
        lock(&self.set).remove(&self.key);
    }
}

fn check_page_size(page_size: u32) -> Result<()> {
    if MIGRATION_PAGE_SIZES.contains(&page_size) {
        return Ok(());
    }
    Err(AdminError::InvalidArgument(format!(
        "page size must be one of {MIGRATION_PAGE_SIZES:?}, got {page_size}"
    )))
}

/// One NAV option with its group, as shown in the migration table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationRow {
    pub scheme_name: String,
    pub row_key: String,
    #[serde(flatten)]
    pub nav: SchemeNavOption,
    pub migrating: bool,
}

fn dash(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or("-")
        .to_owned()
}

pub fn migration_table() -> Table<MigrationRow> {
    Table::new(vec![
        Column::field("Scheme", "schemeName"),
        Column::field("NAV Name", "schemeNavName"),
        Column::field("Code", "code").style("mono"),
        Column::computed("ISIN Div Payout", |r: &MigrationRow| dash(&r.nav.isin_div_pay_out)),
        Column::computed("ISIN Growth/Reinvest", |r: &MigrationRow| {
            dash(&r.nav.isin_growth_and_reinvest)
        }),
        Column::computed("Launch Date", |r: &MigrationRow| dash(&r.nav.launch_date)),
        Column::computed("Migration", |r: &MigrationRow| {
            if r.migrating {
                "Migrating..."
            } else if r.nav.migrated {
                "Migrated"
            } else {
                "Not Migrated"
            }
            .to_owned()
        }),
    ])
}

/// Paged grouped-scheme list with the migration controls.
///
/// Pages count from 0. Migrations run per row: a row is marked while its
/// request is in flight and other rows stay available.
#[derive(Debug)]
pub struct MigrationScreen {
    client: AdminClient,
    page: u32,
    page_size: u32,
    rows: Vec<GroupedMigrationScheme>,
    total_count: u64,
    total_pages: u32,
    loading: bool,
    csv_loading: bool,
    generation: Generation,
    migrating: InFlight,
}

impl MigrationScreen {
    pub fn new(client: AdminClient) -> Self {
        Self {
            client,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            rows: Vec::new(),
            total_count: 0,
            total_pages: 0,
            loading: false,
            csv_loading: false,
            generation: Generation::default(),
            migrating: InFlight::default(),
        }
    }

    pub async fn open(client: AdminClient) -> Self {
        let mut screen = Self::new(client);
        screen.refresh().await;
        screen
    }

    /// Start on `page` with `page_size` rows instead of the defaults.
    pub fn with_page(client: AdminClient, page: u32, page_size: u32) -> Result<Self> {
        check_page_size(page_size)?;
        Ok(Self {
            page,
            page_size,
            ..Self::new(client)
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn groups(&self) -> &[GroupedMigrationScheme] {
        &self.rows
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_csv_loading(&self) -> bool {
        self.csv_loading
    }

    pub fn pager(&self) -> ZeroBasedPager {
        ZeroBasedPager {
            page: self.page,
            total_pages: self.total_pages,
        }
    }

    pub fn begin_refresh(&mut self) -> Ticket<(u32, u32)> {
        self.loading = true;
        Ticket {
            generation: self.generation.begin(),
            request: (self.page, self.page_size),
        }
    }

    /// Store a fetched page; a failed fetch (`None`) shows an empty list.
    pub fn apply_refresh(
        &mut self,
        ticket: Ticket<(u32, u32)>,
        response: Option<GroupedMigrationResponse>,
    ) -> bool {
        if !self.generation.is_current(ticket.generation) {
            tracing::debug!(generation = ticket.generation, "discarding stale migration page");
            return false;
        }
        let (page, size) = ticket.request;
        let response = response.unwrap_or_else(|| GroupedMigrationResponse::empty(page, size));
        self.rows = response.data;
        self.total_count = response.total_count;
        self.total_pages = response.total_pages;
        self.loading = false;
        true
    }

    pub async fn refresh(&mut self) {
        let ticket = self.begin_refresh();
        let (page, size) = ticket.request;
        let response = self.client.get_grouped_migration_schemes(page, size).await;
        self.apply_refresh(ticket, response);
    }

    pub async fn set_page(&mut self, page: u32) {
        self.page = page;
        self.refresh().await;
    }

    /// Switch to one of 5, 10 or 20 rows per page, back on page 0.
    pub async fn set_page_size(&mut self, page_size: u32) -> Result<()> {
        check_page_size(page_size)?;
        self.page_size = page_size;
        self.page = 0;
        self.refresh().await;
        Ok(())
    }

    /// Trigger the backend CSV load, then re-fetch the current page.
    /// Returns whether the trigger succeeded.
    pub async fn load_csv(&mut self) -> bool {
        self.csv_loading = true;
        let loaded = self.client.load_scheme_csv().await;
        self.refresh().await;
        self.csv_loading = false;
        loaded
    }

    pub fn is_migrating(&self, row_key: &str) -> bool {
        lock(&self.migrating).contains(row_key)
    }

    /// Keys of every row with a migration in flight.
    pub fn migrating_rows(&self) -> Vec<String> {
        let mut keys: Vec<_> = lock(&self.migrating).iter().cloned().collect();
        keys.sort();
        keys
    }

    /// Migrate `scheme_name`, marking `row_key` for the duration.
    ///
    /// Fails with [`AdminError::Busy`] when that row is already in flight.
    /// Otherwise returns whether the service accepted the request; failures
    /// are logged and never retried.
    pub async fn migrate(&self, scheme_name: &str, row_key: &str) -> Result<bool> {
        let _row = MigratingRow::acquire(&self.migrating, row_key)?;
        let migrated = self.client.migrate_scheme_by_name(scheme_name).await;
        tracing::info!(scheme_name, row_key, migrated, "migration request finished");
        Ok(migrated)
    }

    /// Migrate the NAV row at `nav_index` of the group at `group_index`.
    pub async fn migrate_row(&self, group_index: usize, nav_index: usize) -> Result<bool> {
        let group = self.rows.get(group_index).ok_or_else(|| {
            AdminError::not_found("migration group", group_index.to_string())
        })?;
        if nav_index >= group.nav_options.len() {
            return Err(AdminError::not_found(
                "NAV option",
                format!("{}#{nav_index}", group.scheme_name),
            ));
        }
        self.migrate(&group.scheme_name, &group.row_key(nav_index))
            .await
    }

    /// Flattened NAV rows of the current page.
    pub fn table_rows(&self) -> Vec<MigrationRow> {
        let in_flight = lock(&self.migrating);
        self.rows
            .iter()
            .flat_map(|group| {
                group.nav_options.iter().enumerate().map(|(index, nav)| {
                    let row_key = group.row_key(index);
                    MigrationRow {
                        scheme_name: group.scheme_name.clone(),
                        migrating: in_flight.contains(&row_key),
                        row_key,
                        nav: nav.clone(),
                    }
                })
            })
            .collect()
    }

    pub fn view(&self) -> TableView {
        migration_table().render(&self.table_rows(), self.loading, None)
    }
}
