//! In-flight quote tracking for an RFQ route.
//!
//! This crate scans both chains of a route for RFQ events and works out which
//! deposits still hold funds in escrow and what each one is waiting for.

pub mod pending;
pub mod state;

pub use pending::{classify, escrowed_totals, NextStep, PendingQuote, RouteHistory};
pub use state::{get_pending_quotes, QuoteStateProvider};
