//! Recursive value/type conformance checker (spec §4.3) and its string
//! format validators (spec §4.3.1).
//!
//! The public entry point is [`check_value_against_type`]. Internally the
//! checker is a single recursive procedure that resolves each type node,
//! dispatches on its kind, and accumulates diagnostics through a private
//! `CheckFailure`-like sentinel (`failure::Outcome`) that never crosses
//! this crate's boundary.

mod check;
mod display;
mod failure;
pub mod formats;

pub use check::check_value_against_type;
