// SPDX-License-Identifier: AGPL-3.0-or-later

/// A type as written in an annotation or docblock, for example `?int`, `null|string` or
/// `Post[]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    /// Named type, or element type for lists.
    pub name: String,

    /// `true` when the declaration accepts `null`.
    pub nullable: bool,

    /// `true` for `Name[]` declarations.
    pub list: bool,
}

impl TypeDeclaration {
    /// Parses a declaration, returns `None` for blank input.
    ///
    /// In a union, `null` marks the declaration as nullable. Of the remaining members a list
    /// declaration is preferred, so `Collection|Post[]` is read as `Post[]`.
    pub fn parse(declaration: &str) -> Option<Self> {
        let declaration = declaration.trim();
        let (declaration, mut nullable) = match declaration.strip_prefix('?') {
            Some(rest) => (rest, true),
            None => (declaration, false),
        };

        let mut members = Vec::new();
        for member in declaration.split('|').map(str::trim) {
            if member.eq_ignore_ascii_case("null") {
                nullable = true;
            } else if !member.is_empty() {
                members.push(member);
            }
        }

        let member = members
            .iter()
            .find(|member| member.ends_with("[]"))
            .or_else(|| members.first())?;

        let (name, list) = match member.strip_suffix("[]") {
            Some(element) => (element, true),
            None => (*member, false),
        };

        Some(Self {
            name: name.to_string(),
            nullable,
            list,
        })
    }
}
