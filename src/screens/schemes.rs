//! Scheme lists: the remote paged list with filters, and the local-store
//! list used in fallback mode.

use std::sync::Arc;

use crate::client::AdminClient;
use crate::constants::DEFAULT_PAGE_SIZE;
use crate::error::{AdminError, Result};
use crate::pagination::{Pagination, ZeroBasedPager};
use crate::screens::editor::{Editor, EditorMode};
use crate::screens::{Generation, Ticket};
use crate::store::ReferenceRepository;
use crate::table::{Column, Table, TableView};
use crate::types::page::LocalPage;
use crate::types::scheme::{NewScheme, Scheme, SchemeApiItem, SchemePageQuery, SchemePageResponse};

// ---------------------------------------------------------------------------
// Remote list
// ---------------------------------------------------------------------------

pub fn scheme_item_table() -> Table<SchemeApiItem> {
    Table::new(vec![
        Column::field("ID", "id").style("mono"),
        Column::field("Scheme", "name"),
        Column::field("AMFI Code", "amfiId").style("mono"),
    ])
}

/// Remote scheme list, filtered by fund house and name.
///
/// Pages count from 0 like the rest of the service's paged endpoints.
/// Changing a filter or the page size goes back to the first page.
#[derive(Debug)]
pub struct SchemesScreen {
    client: AdminClient,
    query: SchemePageQuery,
    rows: Vec<SchemeApiItem>,
    total_count: u64,
    total_pages: u32,
    loading: bool,
    generation: Generation,
}

impl SchemesScreen {
    pub fn new(client: AdminClient) -> Self {
        Self {
            client,
            query: SchemePageQuery::new(0, DEFAULT_PAGE_SIZE),
            rows: Vec::new(),
            total_count: 0,
            total_pages: 0,
            loading: false,
            generation: Generation::default(),
        }
    }

    pub async fn open(client: AdminClient) -> Self {
        let mut screen = Self::new(client);
        screen.refresh().await;
        screen
    }

    /// Start from an explicit query instead of the first unfiltered page.
    pub fn with_query(client: AdminClient, query: SchemePageQuery) -> Result<Self> {
        if query.page_size == 0 {
            return Err(AdminError::InvalidArgument("page size must be positive".into()));
        }
        Ok(Self {
            query,
            ..Self::new(client)
        })
    }

    pub fn query(&self) -> &SchemePageQuery {
        &self.query
    }

    pub fn rows(&self) -> &[SchemeApiItem] {
        &self.rows
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn pager(&self) -> ZeroBasedPager {
        ZeroBasedPager {
            page: self.query.page_no,
            total_pages: self.total_pages,
        }
    }

    /// Find a listed scheme, e.g. to open its detail screen.
    pub fn item(&self, id: i64) -> Option<&SchemeApiItem> {
        self.rows.iter().find(|item| item.id == id)
    }

    pub fn begin_refresh(&mut self) -> Ticket<SchemePageQuery> {
        self.loading = true;
        Ticket {
            generation: self.generation.begin(),
            request: self.query.clone(),
        }
    }

    /// Store a fetched page; a failed fetch (`None`) empties the list.
    pub fn apply_refresh(
        &mut self,
        ticket: Ticket<SchemePageQuery>,
        response: Option<SchemePageResponse>,
    ) -> bool {
        if !self.generation.is_current(ticket.generation) {
            tracing::debug!(
                generation = ticket.generation,
                page = ticket.request.page_no,
                "discarding stale scheme page"
            );
            return false;
        }
        let response = response.unwrap_or_else(|| {
            SchemePageResponse::empty(ticket.request.page_no, ticket.request.page_size)
        });
        self.rows = response.data;
        self.total_count = response.total_count;
        self.total_pages = response.total_pages;
        self.loading = false;
        true
    }

    pub async fn refresh(&mut self) {
        let ticket = self.begin_refresh();
        let response = self.client.get_schemes_page(&ticket.request).await;
        self.apply_refresh(ticket, response);
    }

    pub async fn set_page(&mut self, page_no: u32) {
        self.query.page_no = page_no;
        self.refresh().await;
    }

    pub async fn set_page_size(&mut self, page_size: u32) -> Result<()> {
        if page_size == 0 {
            return Err(AdminError::InvalidArgument("page size must be positive".into()));
        }
        self.query.page_size = page_size;
        self.query.page_no = 0;
        self.refresh().await;
        Ok(())
    }

    /// Restrict to one fund house; `None` or an empty id clears the filter.
    pub async fn set_fund_house(&mut self, fund_house_id: Option<String>) {
        self.query.fund_house_id = fund_house_id.filter(|id| !id.is_empty());
        self.query.page_no = 0;
        self.refresh().await;
    }

    pub async fn set_search(&mut self, search: Option<String>) {
        self.query.search = search.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
        self.query.page_no = 0;
        self.refresh().await;
    }

    pub fn view(&self) -> TableView {
        let pagination = Pagination::new(
            self.total_count,
            self.query.page_no + 1,
            self.query.page_size,
        );
        scheme_item_table().render(&self.rows, self.loading, Some(pagination))
    }
}

// ---------------------------------------------------------------------------
// Local list
// ---------------------------------------------------------------------------

pub fn scheme_table() -> Table<Scheme> {
    Table::new(vec![
        Column::field("Scheme", "name"),
        Column::field("Fund", "fundName"),
        Column::field("Type", "type"),
        Column::field("Risk", "riskLevel"),
        Column::computed("NAV", |s: &Scheme| format!("{:.4}", s.nav)).style("mono"),
        Column::computed("Expense", |s: &Scheme| format!("{:.2}%", s.expense_ratio)),
        Column::computed("1Y", |s: &Scheme| format!("{:.2}%", s.returns_1y)),
        Column::computed("3Y", |s: &Scheme| format!("{:.2}%", s.returns_3y)),
    ])
}

fn as_new(scheme: Scheme) -> NewScheme {
    NewScheme {
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

/// Locally stored schemes, each shown with its fund's name.
pub struct LocalSchemesScreen {
    repo: Arc<dyn ReferenceRepository>,
    page: u32,
    rows: Vec<Scheme>,
    total: u64,
    loading: bool,
    generation: Generation,
    editor: Editor<Scheme>,
}

impl LocalSchemesScreen {
    pub fn new(repo: Arc<dyn ReferenceRepository>) -> Self {
        Self {
            repo,
            page: 1,
            rows: Vec::new(),
            total: 0,
            loading: false,
            generation: Generation::default(),
            editor: Editor::new(),
        }
    }

    pub async fn open(repo: Arc<dyn ReferenceRepository>) -> Result<Self> {
        let mut screen = Self::new(repo);
        screen.refresh().await?;
        Ok(screen)
    }

    pub fn rows(&self) -> &[Scheme] {
        &self.rows
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.total, self.page, DEFAULT_PAGE_SIZE)
    }

    pub fn begin_refresh(&mut self) -> Ticket<u32> {
        self.loading = true;
        Ticket {
            generation: self.generation.begin(),
            request: self.page,
        }
    }

    pub fn apply_refresh(&mut self, ticket: Ticket<u32>, page: LocalPage<Scheme>) -> bool {
        if !self.generation.is_current(ticket.generation) {
            return false;
        }
        self.rows = page.data;
        self.total = page.total;
        self.loading = false;
        true
    }

    pub async fn refresh(&mut self) -> Result<()> {
        let ticket = self.begin_refresh();
        let page = self.repo.list_schemes(ticket.request, DEFAULT_PAGE_SIZE).await;
        match page {
            Ok(page) => {
                self.apply_refresh(ticket, page);
                Ok(())
            }
            Err(err) => {
                if self.generation.is_current(ticket.generation) {
                    self.loading = false;
                }
                Err(err)
            }
        }
    }

    pub async fn set_page(&mut self, page: u32) -> Result<()> {
        self.page = page.max(1);
        self.refresh().await
    }

    pub fn editor(&self) -> &Editor<Scheme> {
        &self.editor
    }

    /// Open a new scheme draft under `fund_id`.
    pub fn open_create(&mut self, fund_id: impl Into<String>) {
        let draft = NewScheme {
            fund_id: fund_id.into(),
            ..Default::default()
        };
        self.editor.open_create(draft.into_scheme(String::new()));
    }

    pub fn open_update(&mut self, id: &str) -> Result<()> {
        let scheme = self
            .rows
            .iter()
            .find(|scheme| scheme.id == id)
            .cloned()
            .ok_or_else(|| AdminError::not_found("scheme", id))?;
        self.editor.open_update(scheme);
        Ok(())
    }

    pub fn draft_mut(&mut self) -> Option<&mut Scheme> {
        self.editor.draft_mut()
    }

    pub fn cancel(&mut self) {
        self.editor.cancel();
    }

    pub async fn save(&mut self) -> Result<Scheme> {
        let (mode, draft) = self.editor.begin_save()?;
        let saved = match mode {
            EditorMode::Create => self.repo.create_scheme(as_new(draft)).await,
            EditorMode::Update => self.repo.update_scheme(draft).await,
        };
        self.editor.finish_save(saved.is_ok());
        let saved = saved?;

        if mode == EditorMode::Create {
            self.page = 1;
        }
        self.refresh().await?;
        Ok(saved)
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.repo.delete_scheme(id).await?;
        self.refresh().await
    }

    pub fn view(&self) -> TableView {
        scheme_table().render(&self.rows, self.loading, Some(self.pagination()))
    }
}
