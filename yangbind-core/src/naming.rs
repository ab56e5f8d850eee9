//! Identifier mapping rules.
//!
//! YANG identifiers are hyphenated (`interface-name`), may start with a digit
//! after camel-casing, and enumeration or `yang-data` names may contain
//! arbitrary characters. The functions here turn them into identifiers valid
//! in a Java-like target language.

use crate::error::NamingError;
use indexmap::IndexMap;

/// Default root for generated packages.
pub const DEFAULT_PACKAGE_PREFIX: &str = "org.opendaylight.yang.gen.v1";

/// Suffix of the per-module data root type.
pub const DATA_ROOT_SUFFIX: &str = "Data";
/// Suffix of list key types.
pub const KEY_SUFFIX: &str = "Key";
/// Suffix of rpc/action input types.
pub const INPUT_SUFFIX: &str = "Input";
/// Suffix of rpc/action output types.
pub const OUTPUT_SUFFIX: &str = "Output";

/// Prefix of plain accessors.
pub const GETTER_PREFIX: &str = "get";
/// Prefix of default accessors which never return null collections.
pub const NONNULL_PREFIX: &str = "nonnull";
/// Prefix of default accessors which fail on absent leaves.
pub const REQUIRE_PREFIX: &str = "require";

/// Name of the list item key accessor.
pub const KEY_ACCESSOR: &str = "key";
/// Name of the rpc/action invocation operation.
pub const INVOKE_OPERATION: &str = "invoke";
/// Name of the single attribute of a scalar typedef value object.
pub const VALUE_ATTRIBUTE: &str = "value";

/// Character sequences reserved in the target language.
pub const RESERVED_WORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
    "_",
    "false",
    "true",
    "null",
    "var",
    "yield",
    "record",
];

/// Returns true if `word` is reserved in the target language.
#[must_use]
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// Upper-cases the first character.
#[must_use]
pub fn to_first_upper(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if !first.is_uppercase() => first.to_uppercase().chain(chars).collect(),
        Some(_) => s.to_string(),
        None => String::new(),
    }
}

/// Lower-cases the first character.
#[must_use]
pub fn to_first_lower(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => first.to_lowercase().chain(chars).collect(),
        Some(_) => s.to_string(),
        None => String::new(),
    }
}

/// Converts a YANG identifier to CamelCase, splitting on ` _.-/`.
///
/// Components keep their inner casing; a leading digit gets a `_` prefix.
/// Identifiers made only of separators, such as `_`, map through
/// [`escape_identifier`].
#[must_use]
pub fn to_camel_case(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    for component in raw
        .split([' ', '_', '.', '-', '/'])
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        result.push_str(&to_first_upper(component));
    }

    match result.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{result}"),
        None if !raw.is_empty() => escape_non_empty(raw),
        _ => result,
    }
}

/// Returns the class name for a YANG identifier.
#[must_use]
pub fn class_name(local_name: &str) -> String {
    to_first_upper(&to_camel_case(local_name))
}

/// Returns the property name for a YANG identifier.
#[must_use]
pub fn property_name(local_name: &str) -> String {
    let potential = to_first_lower(&to_camel_case(local_name));
    if potential == "class" {
        "xmlClass".to_string()
    } else {
        potential
    }
}

/// Returns the accessor suffix for a YANG identifier.
#[must_use]
pub fn getter_suffix(local_name: &str) -> String {
    let candidate = class_name(local_name);
    if candidate == "Class" {
        "XmlClass".to_string()
    } else {
        candidate
    }
}

/// Returns the plain accessor name, e.g. `getInterfaceName`.
#[must_use]
pub fn getter_name(local_name: &str) -> String {
    format!("{GETTER_PREFIX}{}", getter_suffix(local_name))
}

/// Returns the non-null default accessor name, e.g. `nonnullInterface`.
#[must_use]
pub fn nonnull_name(local_name: &str) -> String {
    format!("{NONNULL_PREFIX}{}", to_first_upper(&property_name(local_name)))
}

/// Returns the require default accessor name, e.g. `requireMtu`.
#[must_use]
pub fn require_name(local_name: &str) -> String {
    format!("{REQUIRE_PREFIX}{}", to_first_upper(&property_name(local_name)))
}

/// Computes the root package of a module.
///
/// The namespace URI is flattened into dot-separated segments and the
/// revision `2017-10-26` becomes `rev171026`; modules without a revision
/// end in `norev`.
#[must_use]
pub fn module_package(prefix: &str, namespace: &str, revision: Option<&str>) -> String {
    let namespace = namespace.replace("://", ".");
    let flattened: String = namespace
        .chars()
        .map(|c| match c {
            '/' | ':' | '-' | '@' | '$' | '#' | '\'' | '*' | '+' | ',' | ';' | '=' => '.',
            other => other,
        })
        .collect();

    let mut package = String::with_capacity(prefix.len() + flattened.len() + 12);
    package.push_str(prefix);
    package.push('.');
    package.push_str(&flattened);
    if !package.ends_with('.') {
        package.push('.');
    }

    match revision {
        Some(rev) => {
            package.push_str("rev");
            let digits: Vec<char> = rev.chars().filter(char::is_ascii_digit).collect();
            // YYYYMMDD drops the century
            let start = if digits.len() == 8 { 2 } else { 0 };
            package.extend(&digits[start..]);
        }
        None => package.push_str("norev"),
    }

    normalize_package_name(&package)
}

/// Normalizes a package name: lower-cases it and protects segments which
/// start with a digit or are reserved words.
#[must_use]
pub fn normalize_package_name(package: &str) -> String {
    let lower = package.to_lowercase();
    let mut result = String::with_capacity(lower.len() + 4);
    for (i, segment) in lower.split('.').filter(|s| !s.is_empty()).enumerate() {
        if i > 0 {
            result.push('.');
        }
        let needs_guard = segment.chars().next().is_some_and(|c| c.is_ascii_digit())
            || is_reserved(segment);
        if needs_guard {
            result.push('_');
        }
        result.push_str(segment);
    }
    result
}

/// Returns the package holding the children of a type.
#[must_use]
pub fn child_package(parent_package: &str, simple_name: &str) -> String {
    normalize_package_name(&format!("{parent_package}.{simple_name}"))
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Returns true if `s` is a valid target-language identifier.
#[must_use]
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => is_identifier_start(first) && chars.all(is_identifier_part) && !is_reserved(s),
        None => false,
    }
}

/// Maps an arbitrary identifier through the structured fallback encoding.
///
/// Valid identifiers without `$` are returned unchanged. Anything else is
/// prefixed with `$` and every invalid code point (including `$` itself) is
/// replaced by `$<HEX>$`, which keeps the mapping reversible.
///
/// # Errors
/// Returns `NamingError::EmptyIdentifier` for an empty input.
pub fn escape_identifier(name: &str) -> Result<String, NamingError> {
    if name.is_empty() {
        return Err(NamingError::empty("escape"));
    }
    Ok(escape_non_empty(name))
}

fn escape_non_empty(name: &str) -> String {
    if !name.contains('$') && is_valid_identifier(name) {
        return name.to_string();
    }

    let mut escaped = String::with_capacity(name.len() + 8);
    escaped.push('$');
    for c in name.chars() {
        if c == '$' || !is_identifier_part(c) {
            escaped.push('$');
            escaped.push_str(&format!("{:X}", u32::from(c)));
            escaped.push('$');
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Reverses [`escape_identifier`].
#[must_use]
pub fn unescape_identifier(mapped: &str) -> Option<String> {
    let Some(body) = mapped.strip_prefix('$') else {
        return Some(mapped.to_string());
    };

    let mut result = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(start) = rest.find('$') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('$')?;
        let code = u32::from_str_radix(&after[..end], 16).ok()?;
        result.push(char::from_u32(code)?);
        rest = &after[end + 1..];
    }
    result.push_str(rest);
    Some(result)
}

/// Maps the assigned names of an enumeration to constant names.
///
/// When the class-name mapping of every member is a valid identifier and no
/// two members collide, that mapping is used. Otherwise every member falls
/// back to [`escape_identifier`], which is bijective.
///
/// # Errors
/// Returns a `NamingError` if a member name is empty.
pub fn map_enum_names(assigned: &[&str]) -> Result<IndexMap<String, String>, NamingError> {
    let mut mapped: IndexMap<String, String> = IndexMap::with_capacity(assigned.len());
    let mut taken: IndexMap<String, String> = IndexMap::with_capacity(assigned.len());
    let mut valid = true;

    for name in assigned {
        if name.is_empty() {
            return Err(NamingError::empty("enumeration member"));
        }
        if mapped.contains_key(*name) {
            continue;
        }
        let candidate = class_name(name);
        if !is_valid_identifier(&candidate) || taken.contains_key(&candidate) {
            valid = false;
            break;
        }
        taken.insert(candidate.clone(), (*name).to_string());
        mapped.insert((*name).to_string(), candidate);
    }

    if valid {
        return Ok(mapped);
    }

    let mut fallback: IndexMap<String, String> = IndexMap::with_capacity(assigned.len());
    let mut seen: IndexMap<String, String> = IndexMap::with_capacity(assigned.len());
    for name in assigned {
        if fallback.contains_key(*name) {
            continue;
        }
        let escaped = escape_identifier(name)?;
        if let Some(previous) = seen.insert(escaped.clone(), (*name).to_string()) {
            return Err(NamingError::Ambiguous {
                first: previous,
                second: (*name).to_string(),
                mapped: escaped,
            });
        }
        fallback.insert((*name).to_string(), escaped);
    }
    Ok(fallback)
}
