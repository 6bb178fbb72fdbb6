//! # migkit_templates
//!
//! Variable-file template rendering for migkit.
//!
//! Templates are plain text files (usually `terraform.tfvars` skeletons) with
//! `{{name}}` or `{{ .Name }}` placeholders. Values come from any `Serialize`
//! settings record: each top-level field becomes a variable.
//!
//! ## Example
//!
//! ```rust,no_run
//! use migkit_templates::TemplateRenderer;
//! use serde::Serialize;
//! use std::path::Path;
//!
//! #[derive(Serialize)]
//! struct Settings {
//!     organization: String,
//! }
//!
//! let renderer = TemplateRenderer::new();
//! let settings = Settings { organization: "acme".into() };
//! renderer
//!     .render_file(
//!         Path::new("templates/exporter-tfvars.tpl"),
//!         Path::new("exporters/tfc/terraform.tfvars"),
//!         &settings,
//!     )
//!     .unwrap();
//! ```

pub mod error;
pub mod renderer;

pub use error::{TemplateError, TemplateResult};
pub use renderer::TemplateRenderer;
