#![deny(warnings)]

//! Economy engine for Starship Legacy.
//!
//! This crate provides:
//! - The resource ledger with rejecting and saturating arithmetic
//! - Pure validators for every player action
//! - Seeded generators for recruits and surveyed planets
//! - The transaction engine that turns an action into replacement state

pub mod generate;
pub mod ledger;
pub mod transaction;
pub mod validate;

pub use ledger::{apply_delta, apply_saturating, within_bounds, DeltaMode};
pub use transaction::{execute, Action, Fragments, Outcome, TransactionError};
pub use validate::PreconditionFailure;
