// Template rendering: fills `{{ key }}` placeholders in a Word template

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use quick_xml::escape::escape;
use regex::{Captures, Regex};

use super::{package, DOCUMENT_PART};
use crate::error::RenderError;

/// Text substituted into a template, keyed by placeholder name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    values: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Produces one output document from a template and a context.
pub trait DocumentRenderer {
    fn render(
        &self,
        template: &Path,
        context: &RenderContext,
        output: &Path,
    ) -> Result<(), RenderError>;
}

/// Replaces `{{ key }}` in the main document, headers and footers.
///
/// A placeholder must sit inside a single run; Word splits text into runs
/// at formatting changes, so a placeholder typed with mixed formatting is
/// left untouched. Values spanning several lines become line breaks.
pub struct PlaceholderRenderer {
    pattern: Regex,
}

impl PlaceholderRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let pattern = Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
            .map_err(|e| RenderError::Pattern(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Substitutes placeholders in one XML part.
    pub fn fill(&self, xml: &str, context: &RenderContext) -> String {
        self.pattern
            .replace_all(xml, |caps: &Captures<'_>| {
                let key = &caps[1];
                match context.get(key) {
                    Some(value) => to_run_text(value),
                    None => {
                        log::warn!("no value for placeholder '{key}'");
                        String::new()
                    }
                }
            })
            .into_owned()
    }
}

fn is_templated_part(name: &str) -> bool {
    if name == DOCUMENT_PART {
        return true;
    }
    match name.strip_prefix("word/") {
        Some(rest) => {
            (rest.starts_with("header") || rest.starts_with("footer"))
                && rest.ends_with(".xml")
                && !rest.contains('/')
        }
        None => false,
    }
}

fn to_run_text(value: &str) -> String {
    value
        .lines()
        .map(|line| escape(line).into_owned())
        .collect::<Vec<_>>()
        .join(r#"</w:t><w:br/><w:t xml:space="preserve">"#)
}

impl DocumentRenderer for PlaceholderRenderer {
    fn render(
        &self,
        template: &Path,
        context: &RenderContext,
        output: &Path,
    ) -> Result<(), RenderError> {
        let template_err = |message: String| RenderError::Template {
            path: template.to_path_buf(),
            message,
        };

        let mut archive = package::open(template).map_err(template_err)?;
        let names: Vec<String> = package::part_names(&archive)
            .into_iter()
            .filter(|name| is_templated_part(name))
            .collect();
        if !names.iter().any(|name| name == DOCUMENT_PART) {
            return Err(template_err(format!("missing {DOCUMENT_PART}")));
        }

        let mut replaced = HashMap::new();
        for name in names {
            let Some(xml) = package::read_part_from(&mut archive, &name).map_err(template_err)?
            else {
                continue;
            };
            let filled = self.fill(&xml, context);
            if filled != xml {
                replaced.insert(name, filled);
            }
        }
        drop(archive);

        package::write_package(template, output, &replaced).map_err(|message| {
            RenderError::Write {
                path: output.to_path_buf(),
                message,
            }
        })?;
        log::debug!("rendered {} -> {}", template.display(), output.display());
        Ok(())
    }
}
