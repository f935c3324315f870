//! REST API endpoint implementations: the remote data gateway.
//!
//! Each sub-module adds high-level `async` methods to
//! [`AdminClient`](crate::client::AdminClient) via `impl` blocks. All methods
//! handle URL building, JSON decoding and failure handling automatically.
//!
//! ## Failure policy
//!
//! Gateway methods never return an error. A transport failure, non-2xx
//! status or undecodable body is logged with `tracing::error!` and replaced
//! by a safe default: `Vec::new()`, `None`, or `false` for triggers. Callers
//! therefore cannot tell "nothing there" from "request failed" and show the
//! same empty state for both. Use the strict helpers on `AdminClient`
//! (`get`, `post`, ...) when the distinction matters.
//!
//! ## Usage
//!
//! ```no_run
//! use mf_admin::AdminClient;
//! use mf_admin::types::scheme::SchemePageQuery;
//!
//! # #[tokio::main]
//! # async fn main() -> mf_admin::Result<()> {
//! let client = AdminClient::new()?;
//! let houses = client.get_fund_houses().await;
//! let page = client
//!     .get_schemes_page(&SchemePageQuery::new(0, 10).search("flexi"))
//!     .await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Endpoints | Description |
//! |---|---|---|
//! | [`fund_house`] | 1 | Fund house (AMC) list |
//! | [`scheme`] | 6 | Scheme pages, AMFI lookup, overview, plan options, transaction detail |
//! | [`migration`] | 3 | Grouped migration list, CSV load, migrate by name |

pub mod fund_house;
pub mod migration;
pub mod scheme;

use std::fmt::Display;

use crate::error::Result;

/// Collapse a gateway result into its value or `fallback`, logging failures.
pub(crate) fn recover<T>(result: Result<T>, fallback: T, what: impl Display) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(error = %err, "{what} request failed");
            fallback
        }
    }
}
