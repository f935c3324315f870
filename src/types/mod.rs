//! Request and response types for the admin service and the local store.
//!
//! This module contains the strongly-typed records exchanged with the admin
//! REST service (camelCase JSON on the wire) and persisted by the local
//! fallback store.
//!
//! ## Organization
//!
//! - [`enums`]: Scheme type and risk level
//! - [`fund_house`]: Registered AMCs
//! - [`fund`]: Locally managed mutual funds
//! - [`scheme`]: Local schemes and the remote scheme list projection
//! - [`overview`]: Descriptive scheme overview with the legacy load field
//! - [`plan`]: Plan options, transaction detail and transaction rules
//! - [`migration`]: Grouped scheme NAV options for migration
//! - [`page`]: Remote and local page envelopes
//!
//! All enums are re-exported at the module root via `pub use enums::*`.

pub(crate) mod de;
pub mod enums;
pub mod fund;
pub mod fund_house;
pub mod migration;
pub mod overview;
pub mod page;
pub mod plan;
pub mod scheme;

pub use enums::*;
