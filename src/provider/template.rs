//! Default rule templates.
//!
//! Supported actions inside `{{ }}`:
//! - `.Name`
//! - `normalize .Name`
//! - `index .Labels "key"`

use std::collections::BTreeMap;

use thiserror::Error;

pub const DEFAULT_RULE: &str = "Host(`{{ normalize .Name }}`)";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed action starting at position {0}")]
    Unclosed(usize),

    #[error("unsupported action {0:?}")]
    UnsupportedAction(String),
}

/// Values a template is rendered against.
#[derive(Debug, Clone, Copy)]
pub struct RuleModel<'a> {
    pub name: &'a str,
    pub labels: &'a BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Name,
    NormalizedName,
    Label(String),
}

/// A parsed rule template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTemplate {
    source: String,
    parts: Vec<Part>,
}

impl RuleTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut parts = Vec::new();
        let mut offset = 0;
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                parts.push(Part::Text(rest[..start].to_string()));
            }
            let body = &rest[start + 2..];
            let end = body.find("}}").ok_or(TemplateError::Unclosed(offset + start))?;
            parts.push(parse_action(body[..end].trim())?);

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            parts.push(Part::Text(rest.to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    pub fn render(&self, model: &RuleModel<'_>) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Name => out.push_str(model.name),
                Part::NormalizedName => out.push_str(&normalize(model.name)),
                Part::Label(key) => {
                    if let Some(value) = model.labels.get(key) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Default for RuleTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_RULE.to_string(),
            parts: vec![
                Part::Text("Host(`".to_string()),
                Part::NormalizedName,
                Part::Text("`)".to_string()),
            ],
        }
    }
}

fn parse_action(action: &str) -> Result<Part, TemplateError> {
    let tokens: Vec<&str> = action.split_whitespace().collect();
    match tokens.as_slice() {
        [".Name"] => Ok(Part::Name),
        ["normalize", ".Name"] => Ok(Part::NormalizedName),
        ["index", ".Labels", key] => unquote(key)
            .map(|k| Part::Label(k.to_string()))
            .ok_or_else(|| TemplateError::UnsupportedAction(action.to_string())),
        _ => Err(TemplateError::UnsupportedAction(action.to_string())),
    }
}

fn unquote(token: &str) -> Option<&str> {
    ['"', '`']
        .iter()
        .find_map(|q| token.strip_prefix(*q).and_then(|t| t.strip_suffix(*q)))
}

/// Joins the alphanumeric runs of `name` with `-`.
pub fn normalize(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
