// SPDX-License-Identifier: AGPL-3.0-or-later

//! Extract descriptions and type declarations from method doc comments.
//!
//! Only a small, fixed subset of docblock syntax is understood: the free text before the first
//! tag, `@param <type> $<name> <description>` and `@return <type>`.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::metadata::MethodDescriptor;

static GETTER_SETTER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(get|set) ").expect("valid regex"));

static PARAM_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@param[ \t]+(?P<type>\S+)[ \t]+\$?(?P<name>\w+)(?:[ \t]+(?P<description>.*))?$")
        .expect("valid regex")
});

static RETURN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@return[ \t]+(?P<type>\S+)").expect("valid regex"));

/// Parsed doc comment of a method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    lines: Vec<String>,
}

impl DocBlock {
    /// Parses the doc comment of a method, an absent comment yields an empty docblock.
    pub fn new(method: &MethodDescriptor) -> Self {
        Self::parse(method.doc_comment.as_deref().unwrap_or_default())
    }

    /// Parses a raw doc comment, with or without comment markers.
    pub fn parse(comment: &str) -> Self {
        let lines = comment
            .lines()
            .map(|line| strip_comment_markers(line).to_string())
            .collect();

        Self { lines }
    }

    /// Returns the free text before the first tag, without a leading "Get " or "Set ".
    pub fn method_description(&self) -> Option<String> {
        let text = self
            .lines
            .iter()
            .take_while(|line| !line.trim_start().starts_with('@'))
            .map(String::as_str)
            .collect::<Vec<&str>>()
            .join("\n");

        let text = GETTER_SETTER_PREFIX.replace(text.trim(), "");
        let mut chars = text.chars();
        let description: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => return None,
        };

        Some(description)
    }

    /// Returns the type declared for a parameter, for example `?int` or `null|Post[]`.
    pub fn parameter_type(&self, parameter_name: &str) -> Option<String> {
        self.param_tags()
            .find(|(_, name, _)| name == parameter_name)
            .map(|(type_declaration, _, _)| type_declaration)
    }

    /// Returns the description of a parameter.
    pub fn parameter_description(&self, parameter_name: &str) -> Option<String> {
        self.param_tags()
            .find(|(_, name, _)| name == parameter_name)
            .and_then(|(_, _, description)| description)
    }

    /// Returns the declared return type.
    pub fn return_type(&self) -> Option<String> {
        self.lines.iter().find_map(|line| {
            RETURN_TAG
                .captures(line.trim())
                .map(|captures| captures["type"].to_string())
        })
    }

    fn param_tags(&self) -> impl Iterator<Item = (String, String, Option<String>)> + '_ {
        self.lines.iter().filter_map(|line| {
            let captures = PARAM_TAG.captures(line.trim())?;
            let description = captures
                .name("description")
                .map(|description| description.as_str().trim().to_string())
                .filter(|description| !description.is_empty());

            Some((
                captures["type"].to_string(),
                captures["name"].to_string(),
                description,
            ))
        })
    }
}

fn strip_comment_markers(line: &str) -> &str {
    let mut line = line.trim();
    for marker in &["/**", "///", "//!", "*/", "*"] {
        if let Some(rest) = line.strip_prefix(marker) {
            line = rest;
            break;
        }
    }

    line.strip_suffix("*/").unwrap_or(line).trim()
}
