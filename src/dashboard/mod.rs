//! Dashboard metrics.
//!
//! The single authoritative computation of summary metrics from pain-log
//! entries. Every surface that shows a metric consumes [`aggregate`] (and
//! [`display::present`] for formatting) rather than re-deriving values.
//!
//! The core is pure and synchronous: entries in, snapshot out, with the
//! reference instant and timezone injected by the caller.

pub mod aggregate;
pub mod dates;
pub mod display;
pub mod series;

pub use aggregate::{aggregate, MetricsSnapshot};
pub use display::{present, DashboardView};
