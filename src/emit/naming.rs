//! Identifier naming for generated members

use crate::schema::EnumDefinition;
use crate::types::capitalize_first;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Runs of characters that cannot appear in an identifier
static SEPARATOR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Default member names, tried in order
const DEFAULT_MEMBER: &str = "None";
const FALLBACK_DEFAULT_MEMBER: &str = "Unset";

/// Concatenate the capitalized tokens of `raw` split on separator characters
///
/// `round-two` becomes `RoundTwo`; a leading digit gets a `_` prefix.
pub fn to_identifier(raw: &str) -> String {
    let name: String = SEPARATOR_REGEX
        .split(raw)
        .filter(|token| !token.is_empty())
        .map(capitalize_first)
        .collect();

    if name.is_empty() {
        "Value".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

/// C# property name for a JSON field
pub fn property_name(field_name: &str) -> String {
    let capitalized = capitalize_first(field_name);
    if IDENTIFIER_REGEX.is_match(&capitalized) {
        capitalized
    } else {
        to_identifier(field_name)
    }
}

/// Property names for a struct's fields, in order
///
/// Fields that map to the same name (`hp` and `Hp`) are numbered: the first
/// keeps the plain name, later ones get `2`, `3`, ...
pub fn property_names<'a, I>(field_names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut used = HashSet::new();
    field_names
        .into_iter()
        .map(|name| numbered(property_name(name), &mut used))
        .collect()
}

/// `base`, or `base` with the first free numeric suffix from 2
fn numbered(base: String, used: &mut HashSet<String>) -> String {
    let mut name = base.clone();
    let mut n = 2;
    while !used.insert(name.clone()) {
        name = format!("{base}{n}");
        n += 1;
    }
    name
}

/// One member of a generated enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    /// Serialized value, when it differs from the member name beyond case
    pub alias: Option<String>,
}

/// Default member name plus one member per observed value
///
/// The default member never collides with an observed value's member, and
/// members whose names collide after conversion are numbered.
pub fn enum_members(definition: &EnumDefinition) -> (String, Vec<EnumMember>) {
    let converted: Vec<(String, &String)> = definition
        .values
        .iter()
        .map(|raw| (to_identifier(raw), raw))
        .collect();

    let taken: HashSet<&str> = converted.iter().map(|(name, _)| name.as_str()).collect();
    let default = unused_name(&[DEFAULT_MEMBER, FALLBACK_DEFAULT_MEMBER], &taken);

    let mut used: HashSet<String> = HashSet::from([default.clone()]);
    let mut members = Vec::with_capacity(converted.len());
    for (base, raw) in converted {
        let name = numbered(base, &mut used);
        let alias = (!name.eq_ignore_ascii_case(raw)).then(|| raw.clone());
        members.push(EnumMember { name, alias });
    }

    (default, members)
}

fn unused_name(candidates: &[&str], taken: &HashSet<&str>) -> String {
    if let Some(name) = candidates.iter().find(|name| !taken.contains(*name)) {
        return (*name).to_string();
    }
    let base = candidates.last().copied().unwrap_or(DEFAULT_MEMBER);
    (2..)
        .map(|n| format!("{base}{n}"))
        .find(|name| !taken.contains(name.as_str()))
        .unwrap_or_else(|| base.to_string())
}
