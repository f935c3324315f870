//! Scheme detail: overview, plan options and transaction detail.
//!
//! The three parts load concurrently and keep separate loading flags. The
//! overview tries the stored copy first and falls back to one sync from the
//! upstream source. All edits on this screen are local: the service has no
//! mutation endpoints for these entities, so saved drafts are spliced into
//! the in-memory lists.

use crate::client::AdminClient;
use crate::constants::NOT_AVAILABLE;
use crate::error::{AdminError, Result};
use crate::screens::editor::{Editor, EditorMode, NEW_ID, splice};
use crate::table::{Column, Table, TableView};
use crate::types::overview::{SchemeOverview, or_na};
use crate::types::plan::{SchemePlanOption, SchemeTransactionDetail, SystemTransactionRule};
use crate::types::scheme::SchemeApiItem;

/// Load an overview: the stored copy, else exactly one sync, else `None`.
pub async fn fetch_overview(client: &AdminClient, scheme_id: &str) -> Option<SchemeOverview> {
    if let Some(overview) = client.get_scheme_overview(scheme_id).await {
        return Some(overview);
    }
    tracing::debug!(scheme_id, "no stored overview, syncing");
    client.sync_scheme_overview(scheme_id).await
}

pub fn plan_option_table() -> Table<SchemePlanOption> {
    Table::new(vec![
        Column::field("Plan", "schemeNavName"),
        Column::field("AMFI Code", "amfiCode").style("mono"),
        Column::field("Option", "optionType"),
        Column::field("Plan Type", "planType"),
        Column::field("RTA Code", "rtaSchemeCode").style("mono"),
        Column::field("ISIN Payout", "isinDivPayOut").style("mono"),
        Column::field("ISIN Growth", "isinGrowthAndReinvest").style("mono"),
        Column::field("SEBI Code", "sebiCode").style("mono"),
    ])
}

pub fn transaction_rule_table() -> Table<SystemTransactionRule> {
    Table::new(vec![
        Column::field("Type", "type"),
        Column::field("Frequency", "frequency"),
        Column::computed("Days", |r: &SystemTransactionRule| {
            if r.day_or_dates.is_empty() {
                NOT_AVAILABLE.to_owned()
            } else {
                r.day_or_dates.join(", ")
            }
        }),
        Column::field("Min Amount", "minAmount").style("mono"),
        Column::field("Max Amount", "maxAmount").style("mono"),
        Column::field("Min Installments", "minInstallments"),
        Column::field("Multiplier", "multiplier"),
    ])
}

/// Detail view of one scheme of the remote list.
#[derive(Debug)]
pub struct SchemeDetailScreen {
    client: AdminClient,
    item: SchemeApiItem,
    overview: Option<SchemeOverview>,
    plan_options: Vec<SchemePlanOption>,
    transaction: Option<SchemeTransactionDetail>,
    overview_loading: bool,
    plans_loading: bool,
    transaction_loading: bool,
    syncing: bool,
    overview_editor: Editor<SchemeOverview>,
    plan_editor: Editor<SchemePlanOption>,
    rule_editor: Editor<SystemTransactionRule>,
}

impl SchemeDetailScreen {
    pub fn new(client: AdminClient, item: SchemeApiItem) -> Self {
        Self {
            client,
            item,
            overview: None,
            plan_options: Vec::new(),
            transaction: None,
            overview_loading: false,
            plans_loading: false,
            transaction_loading: false,
            syncing: false,
            overview_editor: Editor::new(),
            plan_editor: Editor::new(),
            rule_editor: Editor::new(),
        }
    }

    /// Create the screen and load all three parts.
    pub async fn open(client: AdminClient, item: SchemeApiItem) -> Self {
        let mut screen = Self::new(client, item);
        screen.load().await;
        screen
    }

    pub fn item(&self) -> &SchemeApiItem {
        &self.item
    }

    fn scheme_id(&self) -> String {
        self.item.id.to_string()
    }

    pub fn overview(&self) -> Option<&SchemeOverview> {
        self.overview.as_ref()
    }

    pub fn plan_options(&self) -> &[SchemePlanOption] {
        &self.plan_options
    }

    pub fn transaction_detail(&self) -> Option<&SchemeTransactionDetail> {
        self.transaction.as_ref()
    }

    pub fn is_overview_loading(&self) -> bool {
        self.overview_loading
    }

    pub fn is_plans_loading(&self) -> bool {
        self.plans_loading
    }

    pub fn is_transaction_loading(&self) -> bool {
        self.transaction_loading
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    /// Fetch overview, plan options and transaction detail concurrently.
    pub async fn load(&mut self) {
        self.overview_loading = true;
        self.plans_loading = true;
        self.transaction_loading = true;

        let id = self.scheme_id();
        let (overview, plans, transaction) = tokio::join!(
            fetch_overview(&self.client, &id),
            self.client.get_scheme_plan_options(&id),
            self.client.get_scheme_transaction_detail(&id),
        );

        self.overview = overview;
        self.overview_loading = false;
        self.plan_options = plans;
        self.plans_loading = false;
        self.transaction = transaction;
        self.transaction_loading = false;
    }

    pub async fn reload_overview(&mut self) {
        self.overview_loading = true;
        self.overview = fetch_overview(&self.client, &self.scheme_id()).await;
        self.overview_loading = false;
    }

    pub async fn reload_plan_options(&mut self) {
        self.plans_loading = true;
        self.plan_options = self.client.get_scheme_plan_options(&self.scheme_id()).await;
        self.plans_loading = false;
    }

    pub async fn reload_transaction_detail(&mut self) {
        self.transaction_loading = true;
        self.transaction = self
            .client
            .get_scheme_transaction_detail(&self.scheme_id())
            .await;
        self.transaction_loading = false;
    }

    /// Manual sync from the upstream source. Keeps the current overview
    /// when nothing comes back; returns whether one did.
    pub async fn sync_overview(&mut self) -> bool {
        self.syncing = true;
        let synced = self.client.sync_scheme_overview(&self.scheme_id()).await;
        self.syncing = false;
        match synced {
            Some(overview) => {
                self.overview = Some(overview);
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Overview editor
    // -----------------------------------------------------------------------

    pub fn overview_editor(&self) -> &Editor<SchemeOverview> {
        &self.overview_editor
    }

    /// Edit the loaded overview, or start one from the list item when there
    /// is none.
    pub fn open_overview_editor(&mut self) {
        match &self.overview {
            Some(overview) => self.overview_editor.open_update(overview.clone()),
            None => self.overview_editor.open_create(SchemeOverview::blank(
                self.item.id,
                self.item.amfi_id.clone().unwrap_or_default(),
                self.item.name.clone(),
            )),
        }
    }

    pub fn overview_draft_mut(&mut self) -> Option<&mut SchemeOverview> {
        self.overview_editor.draft_mut()
    }

    pub fn cancel_overview_editor(&mut self) {
        self.overview_editor.cancel();
    }

    pub fn save_overview(&mut self) -> Result<&SchemeOverview> {
        let (_, draft) = self.overview_editor.submit()?;
        Ok(&*self.overview.insert(draft))
    }

    // -----------------------------------------------------------------------
    // Plan option editor
    // -----------------------------------------------------------------------

    pub fn plan_editor(&self) -> &Editor<SchemePlanOption> {
        &self.plan_editor
    }

    pub fn open_create_plan(&mut self) {
        self.plan_editor.open_create(SchemePlanOption {
            id: NEW_ID,
            ..Default::default()
        });
    }

    pub fn open_update_plan(&mut self, id: i64) -> Result<()> {
        let plan = self
            .plan_options
            .iter()
            .find(|plan| plan.id == id)
            .cloned()
            .ok_or_else(|| AdminError::not_found("plan option", id.to_string()))?;
        self.plan_editor.open_update(plan);
        Ok(())
    }

    pub fn plan_draft_mut(&mut self) -> Option<&mut SchemePlanOption> {
        self.plan_editor.draft_mut()
    }

    pub fn cancel_plan_editor(&mut self) {
        self.plan_editor.cancel();
    }

    /// Splice the draft into the plan list; returns its id.
    pub fn save_plan(&mut self) -> Result<i64> {
        let (mode, draft) = self.plan_editor.submit()?;
        let id = splice(&mut self.plan_options, draft);
        tracing::debug!(id, created = mode == EditorMode::Create, "plan option saved locally");
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Transaction rule editor
    // -----------------------------------------------------------------------

    pub fn rule_editor(&self) -> &Editor<SystemTransactionRule> {
        &self.rule_editor
    }

    pub fn open_create_rule(&mut self) {
        self.rule_editor.open_create(SystemTransactionRule {
            id: NEW_ID,
            ..Default::default()
        });
    }

    pub fn open_update_rule(&mut self, id: i64) -> Result<()> {
        let rule = self
            .transaction
            .iter()
            .flat_map(|detail| &detail.system_transaction_rules)
            .find(|rule| rule.id == id)
            .cloned()
            .ok_or_else(|| AdminError::not_found("transaction rule", id.to_string()))?;
        self.rule_editor.open_update(rule);
        Ok(())
    }

    pub fn rule_draft_mut(&mut self) -> Option<&mut SystemTransactionRule> {
        self.rule_editor.draft_mut()
    }

    pub fn cancel_rule_editor(&mut self) {
        self.rule_editor.cancel();
    }

    /// Splice the draft into the rule list, creating an empty transaction
    /// detail first if the scheme had none.
    pub fn save_rule(&mut self) -> Result<i64> {
        let (_, draft) = self.rule_editor.submit()?;
        let detail = self.transaction.get_or_insert_with(Default::default);
        Ok(splice(&mut detail.system_transaction_rules, draft))
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn plan_view(&self) -> TableView {
        plan_option_table().render(&self.plan_options, self.plans_loading, None)
    }

    pub fn rule_view(&self) -> TableView {
        let rules = self
            .transaction
            .as_ref()
            .map_or(&[][..], |detail| &detail.system_transaction_rules[..]);
        transaction_rule_table().render(rules, self.transaction_loading, None)
    }

    /// Overview as label/value pairs, `"N/A"` for missing fields.
    pub fn overview_fields(&self) -> Vec<(&'static str, String)> {
        let Some(o) = &self.overview else {
            return Vec::new();
        };
        let text = |v: &Option<String>| or_na(v.as_deref()).to_owned();
        let number = |v: &Option<f64>| {
            v.map_or_else(|| NOT_AVAILABLE.to_owned(), |n| n.to_string())
        };
        vec![
            ("Fund", o.mf_name.clone()),
            ("Scheme", o.scheme_name.clone()),
            ("Type", text(&o.scheme_type_desc)),
            ("Category", text(&o.scheme_cat_desc)),
            ("Objective", text(&o.scheme_objective)),
            ("Entry Load", text(&o.entry_load)),
            ("Exit Load", text(&o.exit_load)),
            ("Minimum Amount", text(&o.scheme_min_amt)),
            ("Launch Date", o.launch_date_display()),
            ("Fund Manager", text(&o.fund_manager)),
            ("Benchmark", text(&o.benchmark)),
            ("Riskometer", text(&o.riskometer_value)),
            ("Registrar", text(&o.registrar)),
            ("Custodian", text(&o.custodian)),
            ("Face Value", number(&o.face_value)),
            ("Expense Ratio (Regular)", number(&o.expense_ratio_regular)),
            ("Expense Ratio (Direct)", number(&o.expense_ratio_direct)),
            ("AMC Website", text(&o.amc_website)),
        ]
    }
}
