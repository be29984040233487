//! Sale records and the read-only store they come from.
//!
//! Sales are created elsewhere (together with the inventory decrement);
//! this module only models what a report needs to read back.

pub mod error;
pub mod source;
pub mod summary;
pub mod types;

pub use error::SaleError;
pub use source::{InMemorySaleSource, SaleSource};
pub use summary::{SalesSummary, recent_sales};
pub use types::{SaleFact, SaleId};
