//! Entity screens.
//!
//! Each screen owns the state a console page needs (rows, page, filters,
//! loading flags, the editor) and talks to the gateway or the repository.
//! Rendering goes through [`Table`](crate::table::Table), so the same screen
//! drives the CLI output and any other front end.
//!
//! | Screen | Source | Paging |
//! |---|---|---|
//! | [`fund_houses::FundHousesScreen`] | gateway | none |
//! | [`funds::FundsScreen`] | repository | one-based, 10 per page |
//! | [`schemes::SchemesScreen`] | gateway | zero-based, filters |
//! | [`schemes::LocalSchemesScreen`] | repository | one-based, 10 per page |
//! | [`scheme_detail::SchemeDetailScreen`] | gateway | none |
//! | [`migration::MigrationScreen`] | gateway | zero-based, 5/10/20 |
//! | [`data_loader::DataLoader`] | repository | none |
//!
//! List fetches are split into `begin_*` (bump the generation, snapshot the
//! request) and `apply_*` (store the result if still current), with a
//! convenience method chaining both.

pub mod data_loader;
pub mod editor;
pub mod fund_houses;
pub mod funds;
pub mod migration;
pub mod scheme_detail;
pub mod schemes;

use std::sync::atomic::{AtomicU64, Ordering};

/// Request counter of a list screen. Only the latest issued request may
/// write its result.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    /// Start a new request, invalidating every earlier one.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0.load(Ordering::Acquire) == generation
    }
}

/// A list request in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<Q> {
    pub generation: u64,
    pub request: Q,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_generation_is_current() {
        let generation = Generation::default();
        let first = generation.begin();
        let second = generation.begin();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }
}
