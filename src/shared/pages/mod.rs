//! HTML page rendering for the public verification pages.
//!
//! Templates live in `templates/pages/` and use Jinja2 syntax. Files ending
//! in `.html` are auto-escaped.
//!
//! # Usage
//!
//! ```ignore
//! use minijinja::context;
//! use crate::shared::pages::render_page;
//!
//! let html = render_page("student_qr_info.html", context! { student => dto })?;
//! ```

pub mod engine;

pub use engine::{render_page, TemplateError};
