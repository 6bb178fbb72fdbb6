//! Template rendering.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{TemplateError, TemplateResult};

/// Renders variable-file templates from flat settings records.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    variable_pattern: Regex,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self {
            // Match {{name}} and Go-style {{ .Name }}
            variable_pattern: Regex::new(r"\{\{\s*\.?([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
                .expect("placeholder pattern is valid"),
        }
    }

    /// Flatten a settings record into a variable map.
    ///
    /// Keys are lowercased so that `{{ .Vcs_namespace }}` and `{{vcs_namespace}}`
    /// resolve to the same field. Booleans and numbers render as their literal
    /// form, `null` as an empty string.
    pub fn variables_from<T: Serialize>(&self, settings: &T) -> TemplateResult<HashMap<String, String>> {
        let fields = match serde_json::to_value(settings)? {
            Value::Object(fields) => fields,
            other => return Err(TemplateError::InvalidSettings(other.to_string())),
        };

        let mut vars = HashMap::with_capacity(fields.len());
        for (key, field) in fields {
            let rendered = match field {
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Null => String::new(),
                other => return Err(TemplateError::InvalidSettings(format!("{key}: {other}"))),
            };
            vars.insert(key.to_lowercase(), rendered);
        }

        Ok(vars)
    }

    /// Render content by replacing every placeholder.
    ///
    /// Every placeholder must resolve; the first unknown one is reported.
    pub fn render_content(
        &self,
        template: &str,
        content: &str,
        variables: &HashMap<String, String>,
    ) -> TemplateResult<String> {
        if let Some(missing) = self
            .variable_pattern
            .captures_iter(content)
            .map(|caps| caps[1].to_lowercase())
            .find(|name| !variables.contains_key(name))
        {
            return Err(TemplateError::MissingVariable {
                template: template.to_string(),
                variable: missing,
            });
        }

        let rendered = self
            .variable_pattern
            .replace_all(content, |caps: &regex::Captures| {
                variables
                    .get(&caps[1].to_lowercase())
                    .cloned()
                    .unwrap_or_default()
            });

        Ok(rendered.into_owned())
    }

    /// Load `template_path`, substitute `settings` into it and write the result
    /// to `output_path`, creating parent directories as needed.
    pub fn render_file<T: Serialize>(
        &self,
        template_path: &Path,
        output_path: &Path,
        settings: &T,
    ) -> TemplateResult<()> {
        if !template_path.is_file() {
            return Err(TemplateError::NotFound(template_path.to_path_buf()));
        }

        debug!("Loading template from {:?}", template_path);
        let content = fs::read_to_string(template_path)?;
        let variables = self.variables_from(settings)?;
        let name = template_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| template_path.display().to_string());
        let rendered = self.render_content(&name, &content, &variables)?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|source| TemplateError::WriteFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(output_path, rendered).map_err(|source| TemplateError::WriteFailed {
            path: output_path.to_path_buf(),
            source,
        })?;

        info!("Rendered {} -> {:?}", name, output_path);
        Ok(())
    }
}
