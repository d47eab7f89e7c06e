//! Studio directory domain module.
//!
//! Studios are the billing counterparties: sessions happen at a studio, and
//! the studio's hourly rate prices them when an invoice is cut.

pub mod studio;

pub use studio::{Studio, StudioDirectory};
