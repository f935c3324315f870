//! # mf-admin
//!
//! Client library for the mutual-fund reference-data admin service: fund
//! houses, schemes, scheme overviews, plan options, transaction rules and
//! the scheme migration workflow, plus a local fallback store for funds and
//! schemes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mf_admin::AdminClient;
//! use mf_admin::types::scheme::SchemePageQuery;
//!
//! #[tokio::main]
//! async fn main() -> mf_admin::Result<()> {
//!     let client = AdminClient::with_base_url("http://localhost:8080")?;
//!     let houses = client.get_fund_houses().await;
//!     let page = client.get_schemes_page(&SchemePageQuery::new(0, 10)).await;
//!     println!("{} fund houses, {:?} schemes", houses.len(), page.map(|p| p.total_count));
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! - [`client`] / [`api`]: the remote data gateway. Gateway calls never fail;
//!   errors are logged and replaced by an empty value.
//! - [`store`]: the local persistence fallback behind the
//!   [`ReferenceRepository`](store::ReferenceRepository) trait.
//! - [`table`] / [`pagination`]: the tabular browser every list renders
//!   through.
//! - [`screens`]: per-entity screen state (lists, filters, editors).
//! - [`console`]: the instruction console.

pub mod api;
pub mod client;
pub mod config;
pub mod console;
pub mod constants;
pub mod error;
pub mod pagination;
pub mod screens;
pub mod store;
pub mod table;
pub mod types;

/// Re-export the main client type at crate root for convenience.
pub use client::AdminClient;
/// Re-export the configuration.
pub use config::AdminConfig;
/// Re-export the error type and Result alias.
pub use error::{AdminError, Result};
