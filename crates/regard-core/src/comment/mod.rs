//! Comment templates and binding.
//!
//! The template file is a JSON object mapping category label to a list of
//! template strings, each carrying one `{name}` placeholder. A list keyed by
//! the `uncategorized` label serves as the fallback for categories with no
//! entry of their own.

pub mod natural_name;

use crate::model::{Category, UserEngagement};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

pub use natural_name::natural_name;

/// Placeholder substituted with the user's natural display name.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Comment used when neither the category nor the fallback list has entries.
pub const GENERIC_COMMENT: &str = "ご訪問ありがとうございます！";

/// Honorific suffixes that belong to a name-referencing lead-in.
const HONORIFIC_SUFFIXES: &[&str] = &["さん", "さま", "様", "ちゃん"];

/// Errors loading the template file. A missing or corrupt file fails the
/// comment phase but never the pipeline; records simply keep no comment.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template file not found: {0}")]
    Missing(PathBuf),
    #[error("failed to read template file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("template file {path} is not a JSON object of string arrays: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Category-keyed template lists, as loaded from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSet {
    templates: BTreeMap<String, Vec<String>>,
}

impl TemplateSet {
    /// Load templates from a JSON file.
    ///
    /// Non-array values and non-string entries are skipped with a warning so
    /// one bad key cannot take out every category. Templates without a
    /// `{name}` placeholder are kept (the binder treats them as fixed text)
    /// but flagged, since the file contract asks for exactly one.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        if !path.exists() {
            return Err(TemplateError::Missing(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: BTreeMap<String, Value> =
            serde_json::from_str(&content).map_err(|source| TemplateError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut templates = BTreeMap::new();
        for (label, value) in raw {
            let Value::Array(entries) = value else {
                warn!(%label, "template entry is not an array; skipping");
                continue;
            };
            let list: Vec<String> = entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::String(s) => Some(s),
                    other => {
                        warn!(%label, ?other, "non-string template; skipping");
                        None
                    }
                })
                .collect();
            for template in &list {
                if template.matches(NAME_PLACEHOLDER).count() != 1 {
                    warn!(%label, template, "template does not carry exactly one {{name}} placeholder");
                }
            }
            templates.insert(label, list);
        }
        Ok(Self { templates })
    }

    #[must_use]
    pub fn from_map(templates: BTreeMap<String, Vec<String>>) -> Self {
        Self { templates }
    }

    /// Templates for a category, falling back to the `uncategorized` list.
    #[must_use]
    pub fn for_category(&self, category: Category) -> &[String] {
        self.templates
            .get(category.as_str())
            .filter(|list| !list.is_empty())
            .or_else(|| self.templates.get(Category::Uncategorized.as_str()))
            .map_or(&[], Vec::as_slice)
    }
}

/// Build the comment text for one user.
///
/// Picks a template uniformly at random from the category's list (or the
/// fallback list), then either interpolates the user's natural name or, when
/// no usable name exists, strips the name-referencing lead-in.
pub fn bind_comment<R: Rng + ?Sized>(
    user: &UserEngagement,
    templates: &TemplateSet,
    max_name_chars: usize,
    rng: &mut R,
) -> String {
    let candidates = templates.for_category(user.category);
    let Some(template) = candidates.choose(rng) else {
        return GENERIC_COMMENT.to_string();
    };

    let name = natural_name(&user.display_name);
    if !name.is_empty() && name.chars().count() <= max_name_chars {
        template.replace(NAME_PLACEHOLDER, name)
    } else {
        strip_lead_in(template)
    }
}

/// Remove the name-referencing lead-in from a template.
///
/// The lead-in is everything through the placeholder, plus the honorific and
/// delimiter run that immediately follows it ("{name}さん、ありがとう…" keeps
/// only "ありがとう…"). Templates without a placeholder pass through.
fn strip_lead_in(template: &str) -> String {
    let Some(at) = template.find(NAME_PLACEHOLDER) else {
        return template.to_string();
    };
    let mut rest = &template[at + NAME_PLACEHOLDER.len()..];
    if let Some(suffix) = HONORIFIC_SUFFIXES
        .iter()
        .find(|suffix| rest.starts_with(**suffix))
    {
        rest = &rest[suffix.len()..];
    }
    rest.trim_start_matches(natural_name::is_decorative).to_string()
}
