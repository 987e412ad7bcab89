//! Naming helpers for generated GraphQL names.
//!
//! GraphQL names match `[_a-zA-Z][_a-zA-Z0-9]*` while profile, provider and
//! field names may also contain `-` and the scope delimiter `/`.

use std::sync::LazyLock;

use oneservice_core::ProfileId;
use regex::{Captures, Regex};

static CAMELIZE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_/](\w)").expect("Invalid camelize regex"));

/// Replaces every `/` and `-` with `_`.
pub fn sanitize(input: &str) -> String {
    input.replace(['/', '-'], "_")
}

pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Drops every `-`, `_` or `/` and uppercases the character following it.
pub fn camelize(input: &str) -> String {
    CAMELIZE_REGEX
        .replace_all(input, |caps: &Captures<'_>| capitalize(&caps[1]))
        .into_owned()
}

pub fn pascalize(input: &str) -> String {
    capitalize(&camelize(input))
}

/// Type-name prefix shared by every type a profile contributes.
pub fn profile_prefix(profile_id: &ProfileId) -> String {
    pascalize(&sanitize(&profile_id.to_string()))
}

/// Type-name prefix of one use case within a profile.
pub fn use_case_prefix(profile_prefix: &str, use_case_name: &str) -> String {
    format!("{profile_prefix}{}", pascalize(&sanitize(use_case_name)))
}

/// Checks a name against the GraphQL name grammar.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
