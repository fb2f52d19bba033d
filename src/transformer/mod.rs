//! Document transformation module
//!
//! Turns a decoded JSON document into a status report:
//! flatten into `dotted.path: value` lines, select lines with the report and
//! perf filters, then classify and render.

pub mod flatten;
pub mod formatter;
pub mod selector;

pub use flatten::{render_value, Flattener, DEFAULT_MAX_DEPTH, ROOT_LABEL};
pub use formatter::{Report, REPORT_PREFIX};
pub use selector::{perf_entry, Selection, Selector};
