//! Page arithmetic shared by the table and the screens.
//!
//! Two conventions coexist: the table and the local store count pages from 1
//! ([`Pagination`]), the migration endpoint counts from 0
//! ([`ZeroBasedPager`]).

use std::fmt;

/// One-based pagination state of a table footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        Self { total, page, limit }
    }

    /// First displayed row number, `(page-1)*limit + 1`.
    pub fn start(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit) + 1
    }

    /// Last displayed row number, `min(page*limit, total)`.
    pub fn end(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.limit)).min(self.total)
    }

    /// "Previous" is disabled on page 1.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// "Next" is disabled once `page*limit >= total`.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) * u64::from(self.limit) < self.total
    }

    /// Target of the "Previous" control, if enabled.
    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous().then(|| self.page - 1)
    }

    /// Target of the "Next" control, if enabled.
    pub fn next_page(&self) -> Option<u32> {
        self.page.checked_add(1).filter(|_| self.has_next())
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} results",
            self.start(),
            self.end(),
            self.total
        )
    }
}

/// Zero-based pager driven by a server-reported page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroBasedPager {
    pub page: u32,
    pub total_pages: u32,
}

impl ZeroBasedPager {
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// An unknown page count (0) never disables "Next".
    pub fn has_next(&self) -> bool {
        match self.page.checked_add(1) {
            Some(next) => self.total_pages == 0 || next < self.total_pages,
            None => false,
        }
    }

    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous().then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.page.checked_add(1).filter(|_| self.has_next())
    }
}

impl fmt::Display for ZeroBasedPager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {} of {}", u64::from(self.page) + 1, self.total_pages.max(1))
    }
}
