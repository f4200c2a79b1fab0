//! Drafting surface: template search and placeholder rendering.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use crate::models::Template;

pub const TEMPLATE_CATEGORIES: [&str; 4] = ["governance", "financial", "communication", "research"];

// NOTE: expect() is acceptable here, the pattern is constant.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-z0-9_]+)\s*\}\}").expect("Invalid regex: placeholder")
});

/// Case-insensitive substring match on name or description, optionally
/// restricted to one category. Order is preserved.
pub fn filter_templates<'a>(
    templates: &'a [Template],
    query: Option<&str>,
    category: Option<&str>,
) -> Vec<&'a Template> {
    let needle = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    templates
        .iter()
        .filter(|t| category.map_or(true, |c| t.category.eq_ignore_ascii_case(c)))
        .filter(|t| match &needle {
            Some(needle) => {
                t.name.to_lowercase().contains(needle.as_str())
                    || t.description.to_lowercase().contains(needle.as_str())
            }
            None => true,
        })
        .collect()
}

/// Placeholder names in first-appearance order, deduplicated
pub fn placeholders(content: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    PLACEHOLDER
        .captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub template_id: String,
    pub content: String,
    /// Placeholders with no supplied value, left verbatim in `content`.
    pub unfilled: Vec<String>,
}

/// Substitute `values` into the template body.
pub fn render_draft(template: &Template, values: &HashMap<String, String>) -> Draft {
    let mut unfilled = Vec::new();

    let content = PLACEHOLDER.replace_all(&template.content, |caps: &Captures| {
        let name = &caps[1];
        match values.get(name) {
            Some(value) => value.clone(),
            None => {
                if !unfilled.iter().any(|u: &String| u == name) {
                    unfilled.push(name.to_string());
                }
                caps[0].to_string()
            }
        }
    });

    Draft {
        template_id: template.id.clone(),
        content: content.into_owned(),
        unfilled,
    }
}
