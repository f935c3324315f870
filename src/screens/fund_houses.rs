//! Fund house list.

use crate::client::AdminClient;
use crate::screens::{Generation, Ticket};
use crate::table::{Column, Table, TableView};
use crate::types::fund_house::{AmfiSchemeRecord, FundHouse};

/// Column set of the fund house table.
pub fn fund_house_table() -> Table<FundHouse> {
    Table::new(vec![
        Column::field("Fund House", "name"),
        Column::field("AMFI ID", "amfiId").style("mono"),
        Column::field("Type", "fundType"),
        Column::computed("Status", |h: &FundHouse| {
            if h.active { "Active" } else { "Inactive" }.to_owned()
        }),
        Column::field("CAMS KRA", "camsKraCode").style("mono"),
        Column::field("Karvy KRA", "karvyKraCode").style("mono"),
    ])
}

/// All registered fund houses, fetched in one request.
#[derive(Debug)]
pub struct FundHousesScreen {
    client: AdminClient,
    houses: Vec<FundHouse>,
    loading: bool,
    generation: Generation,
}

impl FundHousesScreen {
    pub fn new(client: AdminClient) -> Self {
        Self {
            client,
            houses: Vec::new(),
            loading: false,
            generation: Generation::default(),
        }
    }

    /// Create the screen and run the initial fetch.
    pub async fn open(client: AdminClient) -> Self {
        let mut screen = Self::new(client);
        screen.refresh().await;
        screen
    }

    pub fn houses(&self) -> &[FundHouse] {
        &self.houses
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin_refresh(&mut self) -> Ticket<()> {
        self.loading = true;
        Ticket {
            generation: self.generation.begin(),
            request: (),
        }
    }

    /// Store a fetched list. Returns `false` when a newer refresh superseded it.
    pub fn apply_refresh(&mut self, ticket: Ticket<()>, houses: Vec<FundHouse>) -> bool {
        if !self.generation.is_current(ticket.generation) {
            tracing::debug!(generation = ticket.generation, "discarding stale fund house list");
            return false;
        }
        self.houses = houses;
        self.loading = false;
        true
    }

    /// Re-fetch the list. A failed request shows as an empty list.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_refresh();
        let houses = self.client.get_fund_houses().await;
        self.apply_refresh(ticket, houses);
    }

    /// Opaque scheme records registered under a fund house's AMFI id.
    pub async fn amfi_schemes(&self, amfi_id: &str) -> Vec<AmfiSchemeRecord> {
        self.client.get_schemes_by_amfi(amfi_id).await
    }

    pub fn view(&self) -> TableView {
        fund_house_table().render(&self.houses, self.loading, None)
    }
}
