// SPDX-License-Identifier: AGPL-3.0-or-later

/// Lowers the first character, `GetName` becomes `getName`.
pub fn lcfirst(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppers the first character, `name` becomes `Name`.
pub fn ucfirst(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{lcfirst, ucfirst};

    #[rstest]
    #[case("Name", "name", "Name")]
    #[case("isValid", "isValid", "IsValid")]
    #[case("", "", "")]
    #[case("ÉTé", "éTé", "ÉTé")]
    fn first_character_case(#[case] value: &str, #[case] lower: &str, #[case] upper: &str) {
        assert_eq!(lcfirst(value), lower);
        assert_eq!(ucfirst(value), upper);
    }
}
