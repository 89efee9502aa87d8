//! Console library for the Paddock backend — the Rust rendition of the
//! original admin/guest browser pages.
//!
//! The console builds SQL strings from a catalog of named templates plus
//! form input, sanitizes the values it interpolates, POSTs `{query}` to the
//! server's execution endpoint, and renders the outcome as an HTML fragment.
//!
//! The sanitizers here are advisory UI validation, not a security boundary:
//! the execution endpoint accepts any string, so nothing the console does
//! constrains what the server will run. Real parameter binding belongs on
//! the server side; the console merely keeps well-meaning form input from
//! producing broken SQL.

pub mod catalog;
pub mod dispatch;
pub mod forms;
pub mod sanitize;
pub mod template;

pub use catalog::{CatalogError, QueryCatalog};
pub use dispatch::{normalize_query, render_panel, render_table, send_query, Panel, PanelState};
pub use forms::ConsoleError;
pub use template::{format_template, TemplateError, TemplateValue};
