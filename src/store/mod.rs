//! Local persistence fallback.
//!
//! When no backend owns funds and schemes, they live in a key-value store
//! laid out like browser local storage: two collections, `mf_admin_funds`
//! and `mf_admin_schemes`, each a JSON array with the newest record first.
//!
//! Screens and the command console depend on the [`ReferenceRepository`]
//! trait rather than on [`LocalStore`] directly, so a service-backed
//! implementation can be swapped in.

pub mod kv;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::fund::{MutualFund, NewFund};
use crate::types::page::LocalPage;
use crate::types::scheme::{NewScheme, Scheme};

pub use kv::{FileKv, KvBackend, MemoryKv};
pub use local::LocalStore;

/// CRUD over funds and schemes.
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    /// One-based page of funds, newest first.
    async fn list_funds(&self, page: u32, limit: u32) -> Result<LocalPage<MutualFund>>;
    async fn get_fund(&self, id: &str) -> Result<MutualFund>;
    /// Store a new fund under a fresh random id.
    async fn create_fund(&self, fund: NewFund) -> Result<MutualFund>;
    async fn update_fund(&self, fund: MutualFund) -> Result<MutualFund>;
    /// Delete a fund and every scheme that references it.
    async fn delete_fund(&self, id: &str) -> Result<()>;

    /// One-based page of schemes, newest first, with `fund_name` filled in.
    async fn list_schemes(&self, page: u32, limit: u32) -> Result<LocalPage<Scheme>>;
    async fn get_scheme(&self, id: &str) -> Result<Scheme>;
    async fn create_scheme(&self, scheme: NewScheme) -> Result<Scheme>;
    async fn update_scheme(&self, scheme: Scheme) -> Result<Scheme>;
    async fn delete_scheme(&self, id: &str) -> Result<()>;

    /// Drop both collections.
    async fn clear_all_data(&self) -> Result<()>;
}
