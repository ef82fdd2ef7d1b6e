//! Core engine for a personal-budgeting client.
//!
//! The centerpiece is the category taxonomy: the Income/Expenses →
//! Category → Subcategory hierarchy, its codec, lookup and validation
//! operations, the resolution of the weak references ledger entries hold,
//! and the polling synchronization that keeps client snapshots consistent
//! with a remote document store. The UI layer is an external embedder: it
//! renders what these modules return and forwards user edits back through
//! [`ledger::LedgerWriter`].

pub mod codec;
pub mod config;
mod error;
pub mod ledger;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod resolve;
pub mod store;
pub mod sync;

pub use config::Config;
pub use error::Error;
pub use error::Result;
