//! Mutual funds, stored through the repository.

use std::sync::Arc;

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::error::{AdminError, Result};
use crate::pagination::Pagination;
use crate::screens::editor::{Editor, EditorMode};
use crate::screens::{Generation, Ticket};
use crate::store::ReferenceRepository;
use crate::table::{Column, Table, TableView};
use crate::types::fund::{MutualFund, NewFund};
use crate::types::page::LocalPage;

pub fn fund_table() -> Table<MutualFund> {
    Table::new(vec![
        Column::field("Fund", "name"),
        Column::field("AMC", "amcName"),
        Column::field("Category", "category"),
        Column::computed("AUM (M)", |f: &MutualFund| format!("{:.2}", f.aum)).style("mono"),
        Column::field("Founded", "foundedDate"),
        Column::computed("Status", |f: &MutualFund| {
            if f.active { "Active" } else { "Inactive" }.to_owned()
        }),
    ])
}

/// Paged fund list with the create/edit editor.
pub struct FundsScreen {
    repo: Arc<dyn ReferenceRepository>,
    page: u32,
    rows: Vec<MutualFund>,
    total: u64,
    loading: bool,
    generation: Generation,
    editor: Editor<MutualFund>,
}

impl FundsScreen {
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

    pub fn rows(&self) -> &[MutualFund] {
        &self.rows
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
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

    pub fn apply_refresh(&mut self, ticket: Ticket<u32>, page: LocalPage<MutualFund>) -> bool {
        if !self.generation.is_current(ticket.generation) {
            return false;
        }
        self.rows = page.data;
        self.total = page.total;
        self.loading = false;
        true
    }

    /// Load the current page.
    pub async fn refresh(&mut self) -> Result<()> {
        let ticket = self.begin_refresh();
        match self.repo.list_funds(ticket.request, DEFAULT_PAGE_SIZE).await {
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

    /// Page-control target; page changes always re-fetch.
    pub async fn set_page(&mut self, page: u32) -> Result<()> {
        self.page = page.max(1);
        self.refresh().await
    }

    pub fn editor(&self) -> &Editor<MutualFund> {
        &self.editor
    }

    pub fn open_create(&mut self) {
        self.editor
            .open_create(NewFund::default().into_fund(String::new()));
    }

    /// Open the editor on a listed fund.
    pub fn open_update(&mut self, id: &str) -> Result<()> {
        let fund = self
            .rows
            .iter()
            .find(|fund| fund.id == id)
            .cloned()
            .ok_or_else(|| AdminError::not_found("fund", id))?;
        self.editor.open_update(fund);
        Ok(())
    }

    pub fn draft_mut(&mut self) -> Option<&mut MutualFund> {
        self.editor.draft_mut()
    }

    pub fn cancel(&mut self) {
        self.editor.cancel();
    }

    /// Validate and store the draft. A new fund sends the list back to page
    /// 1, where it now sits on top. Invalid drafts keep the editor open.
    pub async fn save(&mut self) -> Result<MutualFund> {
        if let Some(draft) = self.editor.draft() {
            NewFund::from(draft.clone()).validate()?;
        }
        let (mode, draft) = self.editor.begin_save()?;
        let saved = match mode {
            EditorMode::Create => self.repo.create_fund(NewFund::from(draft)).await,
            EditorMode::Update => self.repo.update_fund(draft).await,
        };
        self.editor.finish_save(saved.is_ok());
        let saved = saved?;

        if mode == EditorMode::Create {
            self.page = 1;
        }
        self.refresh().await?;
        Ok(saved)
    }

    /// Delete a fund and its schemes, then reload the page.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.repo.delete_fund(id).await?;
        self.refresh().await
    }

    pub fn view(&self) -> TableView {
        fund_table().render(&self.rows, self.loading, Some(self.pagination()))
    }
}
