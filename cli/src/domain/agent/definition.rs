//! Dependency declarations embedded in agent and resource definitions.
//!
//! Agent definitions are Markdown files carrying a YAML document, either as
//! front matter (`---` ... `---`) or as the first fenced ` ```yaml ` block.
//! The document's `dependencies` key (top level, or one level down such as
//! `agent.dependencies`) maps a category to a list of resource names:
//!
//! ```yaml
//! dependencies:
//!   tasks: [create-doc.md, execute-checklist.md]
//!   templates: [prd-tmpl.yaml]
//! ```

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde_yaml::Value;

use crate::domain::layer::resource_name_from_file;

const DEPENDENCIES_KEY: &str = "dependencies";

/// Byte range of the YAML document inside a definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YamlBlock {
    pub start: usize,
    pub end: usize,
}

/// `(line_start, line_without_newline, next_line_start)` for every line.
fn lines_with_offsets(content: &str) -> Vec<(usize, &str, usize)> {
    let mut lines = Vec::new();
    let mut start = 0;
    for segment in content.split_inclusive('\n') {
        let end = start + segment.len();
        lines.push((start, segment.trim_end_matches(['\n', '\r']), end));
        start = end;
    }
    lines
}

/// Locate the embedded YAML document: front matter wins over a fenced block.
#[must_use]
pub fn find_yaml_block(content: &str) -> Option<YamlBlock> {
    let lines = lines_with_offsets(content);

    if let Some(&(_, first, body_start)) = lines.first()
        && first.trim_end() == "---"
        && let Some(&(close_start, _, _)) = lines[1..]
            .iter()
            .find(|(_, line, _)| matches!(line.trim_end(), "---" | "..."))
    {
        return Some(YamlBlock {
            start: body_start,
            end: close_start,
        });
    }

    let open = lines.iter().position(|(_, line, _)| {
        let fence = line.trim();
        fence == "```yaml" || fence == "```yml"
    })?;
    let body_start = lines[open].2;
    let &(close_start, _, _) = lines[open + 1..]
        .iter()
        .find(|(_, line, _)| line.trim() == "```")?;
    Some(YamlBlock {
        start: body_start,
        end: close_start,
    })
}

/// Whether a dependency entry refers to `name`. Entries may carry the
/// file extension (`create-doc.md` refers to `create-doc`).
#[must_use]
pub fn references(entry: &str, name: &str) -> bool {
    entry == name || resource_name_from_file(entry) == name
}

fn parse_block(content: &str) -> Result<Option<Value>> {
    let Some(block) = find_yaml_block(content) else {
        return Ok(None);
    };
    let doc = serde_yaml::from_str(&content[block.start..block.end])
        .context("failed to parse embedded YAML")?;
    Ok(Some(doc))
}

fn dependencies_node(doc: &Value) -> Option<&Value> {
    let map = doc.as_mapping()?;
    map.get(DEPENDENCIES_KEY)
        .or_else(|| map.values().find_map(|v| v.get(DEPENDENCIES_KEY)))
}

fn dependencies_node_mut(doc: &mut Value) -> Option<&mut Value> {
    let map = doc.as_mapping_mut()?;
    if map.contains_key(DEPENDENCIES_KEY) {
        return map.get_mut(DEPENDENCIES_KEY);
    }
    map.values_mut()
        .find_map(|v| v.as_mapping_mut().and_then(|m| m.get_mut(DEPENDENCIES_KEY)))
}

fn string_items(node: &Value) -> Vec<String> {
    node.as_sequence()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Dependency arrays of an agent definition, keyed by category.
///
/// A bare list under `dependencies` is reported under the `dependencies`
/// category. Definitions without a YAML document have no dependencies.
///
/// # Errors
///
/// Returns an error if the embedded YAML cannot be parsed.
pub fn agent_dependencies(content: &str) -> Result<BTreeMap<String, Vec<String>>> {
    let Some(doc) = parse_block(content)? else {
        return Ok(BTreeMap::new());
    };
    let mut categories = BTreeMap::new();
    match dependencies_node(&doc) {
        Some(Value::Mapping(map)) => {
            for (key, items) in map {
                if let Some(category) = key.as_str() {
                    categories.insert(category.to_string(), string_items(items));
                }
            }
        }
        Some(list @ Value::Sequence(_)) => {
            categories.insert(DEPENDENCIES_KEY.to_string(), string_items(list));
        }
        _ => {}
    }
    Ok(categories)
}

/// Flat dependency list of a non-agent resource.
///
/// YAML resources (`whole_document`) are parsed in full; other files use
/// their front matter or first fenced YAML block.
///
/// # Errors
///
/// Returns an error if the YAML cannot be parsed.
pub fn resource_dependencies(content: &str, whole_document: bool) -> Result<Vec<String>> {
    let doc = if whole_document {
        Some(serde_yaml::from_str::<Value>(content).context("failed to parse YAML resource")?)
    } else {
        parse_block(content)?
    };
    let Some(doc) = doc else {
        return Ok(Vec::new());
    };
    Ok(match dependencies_node(&doc) {
        Some(Value::Mapping(map)) => map.values().flat_map(string_items).collect(),
        Some(list) => string_items(list),
        None => Vec::new(),
    })
}

fn strip_name(node: &mut Value, name: &str) -> bool {
    match node {
        Value::Sequence(items) => {
            let before = items.len();
            items.retain(|item| !item.as_str().is_some_and(|entry| references(entry, name)));
            items.len() != before
        }
        Value::Mapping(map) => map
            .values_mut()
            .fold(false, |changed, items| strip_name(items, name) || changed),
        _ => false,
    }
}

/// Rewrite `content` with `name` dropped from every dependency array.
///
/// Returns `None` when nothing referenced `name`. Only the YAML document is
/// re-serialized; surrounding Markdown is kept byte for byte.
///
/// # Errors
///
/// Returns an error if the embedded YAML cannot be parsed or serialized.
pub fn remove_dependency(content: &str, name: &str) -> Result<Option<String>> {
    let Some(block) = find_yaml_block(content) else {
        return Ok(None);
    };
    let mut doc: Value = serde_yaml::from_str(&content[block.start..block.end])
        .context("failed to parse embedded YAML")?;
    let Some(node) = dependencies_node_mut(&mut doc) else {
        return Ok(None);
    };
    if !strip_name(node, name) {
        return Ok(None);
    }
    let yaml = serde_yaml::to_string(&doc).context("failed to serialize agent YAML")?;
    Ok(Some(format!(
        "{}{yaml}{}",
        &content[..block.start],
        &content[block.end..]
    )))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
