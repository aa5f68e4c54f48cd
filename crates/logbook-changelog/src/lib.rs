//! Logbook Changelog - the changelog document model
//!
//! This crate parses hand-written `CHANGELOG.md` files into header directives,
//! body change-sets and footer run metadata, and renders updated documents
//! in the same textual convention.
//!
//! ```text
//! # Payments service
//! Owner: alice, bob
//! Notify: carol
//!
//! ---
//!
//! ## 2023.08
//! * Retry failed webhooks
//!
//! ---
//!
//! Last ran: 2023-02-19T14:46:41.533Z
//! ```

pub mod entries;
pub mod file;
pub mod generator;
pub mod parser;
pub mod patterns;
pub mod types;
pub mod week;

pub use entries::change_lines;
pub use file::{read_changelog, write_changelog};
pub use generator::{format_timestamp, render, render_at};
pub use parser::parse;
pub use types::{ChangeSet, Changelog};
pub use week::YearWeek;
