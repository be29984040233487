//! Core business logic for Stocktally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Sale records arrive through the `SaleSource` trait; everything else here is
//! calculation and encoding.
//!
//! # Modules
//!
//! - `sales` - Sale records, the read-only sale source, running totals
//! - `reports` - Period aggregation, report layout and Excel/PDF export

pub mod reports;
pub mod sales;
