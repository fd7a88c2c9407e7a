//! Address metadata rules and their JSON wire format.
//!
//! A payload is a flat JSON object whose values are all strings. List values
//! are joined with `~` (postal code examples with `,`). Field lists use the
//! one-character [`AddressField`] tokens and format patterns use `%X` escapes
//! (see [`parse_format`]).
//!
//! Country-level rules inherit unset layout fields from a default rule; rules
//! deeper in the hierarchy are taken as they are.

use crate::error::{DomainError, DomainErrorExt, Result};
use crate::field::{AddressField, parse_field_list};
use crate::format::{FormatElement, parse_format};
use crate::lookup_key::LookupKey;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

const LIST_SEPARATOR: char = '~';
const EXAMPLE_SEPARATOR: char = ',';

/// A parsed, immutable metadata record for one key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    pub id: String,
    pub key: Option<String>,
    pub name: Option<String>,
    pub latin_name: Option<String>,
    pub format: Vec<FormatElement>,
    pub latin_format: Vec<FormatElement>,
    pub required: Vec<AddressField>,
    pub upper: Vec<AddressField>,
    pub sub_keys: Vec<String>,
    pub sub_names: Vec<String>,
    pub sub_latin_names: Vec<String>,
    /// Region codes listed by the root `data` node.
    pub countries: Vec<String>,
    pub language: Option<String>,
    pub languages: Vec<String>,
    pub postal_code_matcher: Option<PostalCodeMatcher>,
    pub postal_code_examples: Vec<String>,
    pub postal_url: Option<String>,
    pub postal_code_name_type: Option<String>,
    pub admin_area_name_type: Option<String>,
    pub locality_name_type: Option<String>,
    pub sublocality_name_type: Option<String>,
}

impl Rule {
    /// The rule used as inheritance source when no default is fetched.
    #[must_use]
    pub fn builtin_default() -> Self {
        Self {
            id: crate::lookup_key::KEY_ROOT.to_owned(),
            format: parse_format("%N%n%O%n%A%n%C"),
            required: parse_field_list("AC"),
            upper: parse_field_list("C"),
            postal_code_name_type: Some("postal".to_owned()),
            admin_area_name_type: Some("province".to_owned()),
            locality_name_type: Some("city".to_owned()),
            sublocality_name_type: Some("suburb".to_owned()),
            ..Self::default()
        }
    }

    /// Position of `sub_key` among the rule's sub-regions.
    #[must_use]
    pub fn sub_key_index(&self, sub_key: &str) -> Option<usize> {
        self.sub_keys.iter().position(|k| k == sub_key)
    }

    /// Display name of the sub-region at `index`, falling back to its key.
    #[must_use]
    pub fn sub_name(&self, index: usize) -> Option<&str> {
        self.sub_names.get(index).or_else(|| self.sub_keys.get(index)).map(String::as_str)
    }

    /// Whether the field must be filled in for this region.
    #[must_use]
    pub fn is_required(&self, field: AddressField) -> bool {
        self.required.contains(&field)
    }
}

/// Compiled postal-code pattern.
///
/// Supports matching a complete code and checking whether a code starts with
/// something the pattern accepts (used for sub-region postal prefixes).
#[derive(Debug, Clone)]
pub struct PostalCodeMatcher {
    pattern: String,
    full: Regex,
    prefix: Regex,
}

impl PostalCodeMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let full = Regex::new(&format!("^(?:{pattern})$")).context("postal code pattern")?;
        let prefix = Regex::new(&format!("^(?:{pattern})")).context("postal code pattern")?;
        Ok(Self { pattern: pattern.to_owned(), full, prefix })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Whether the whole `code` matches the pattern.
    #[must_use]
    pub fn is_match(&self, code: &str) -> bool {
        self.full.is_match(code)
    }

    /// Whether `code` starts with a match of the pattern.
    #[must_use]
    pub fn is_prefix_match(&self, code: &str) -> bool {
        self.prefix.is_match(code)
    }
}

impl PartialEq for PostalCodeMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl fmt::Display for PostalCodeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRule {
    id: Option<String>,
    key: Option<String>,
    name: Option<String>,
    lname: Option<String>,
    fmt: Option<String>,
    lfmt: Option<String>,
    require: Option<String>,
    upper: Option<String>,
    sub_keys: Option<String>,
    sub_names: Option<String>,
    sub_lnames: Option<String>,
    countries: Option<String>,
    lang: Option<String>,
    languages: Option<String>,
    zip: Option<String>,
    zipex: Option<String>,
    posturl: Option<String>,
    zip_name_type: Option<String>,
    state_name_type: Option<String>,
    locality_name_type: Option<String>,
    sublocality_name_type: Option<String>,
}

/// Parses the payload stored under `key`.
///
/// Returns `Ok(None)` for an empty object: the key exists but carries no data.
/// When `key` is a country-level key and `default` is given, layout fields the
/// payload leaves unset are copied from `default`.
pub fn parse_rule(key: &str, raw: &str, default: Option<&Rule>) -> Result<Option<Rule>> {
    let value: serde_json::Value = serde_json::from_str(raw).context(key.to_owned())?;
    let serde_json::Value::Object(object) = &value else {
        return Err(DomainError::malformed(format!("payload for '{key}' is not a JSON object")));
    };
    if object.is_empty() {
        return Ok(None);
    }

    let raw: RawRule = serde_json::from_value(value).context(key.to_owned())?;
    let inherit = LookupKey::depth_of(key).is_ok_and(|depth| depth == 0);

    let mut rule = build_rule(key, raw, if inherit { default } else { None })?;
    if rule.id.is_empty() {
        key.clone_into(&mut rule.id);
    }
    Ok(Some(rule))
}

fn build_rule(key: &str, raw: RawRule, default: Option<&Rule>) -> Result<Rule> {
    let sub_keys = split_list(raw.sub_keys.as_deref());
    let sub_names = raw.sub_names.as_deref().map_or_else(|| sub_keys.clone(), |s| split_list(Some(s)));
    let sub_latin_names = split_list(raw.sub_lnames.as_deref());

    if sub_names.len() != sub_keys.len() {
        return Err(DomainError::malformed(format!(
            "'{key}' has {} sub_keys but {} sub_names",
            sub_keys.len(),
            sub_names.len()
        )));
    }
    if !sub_latin_names.is_empty() && sub_latin_names.len() != sub_keys.len() {
        return Err(DomainError::malformed(format!(
            "'{key}' has {} sub_keys but {} sub_lnames",
            sub_keys.len(),
            sub_latin_names.len()
        )));
    }

    let postal_code_matcher = raw.zip.as_deref().map(PostalCodeMatcher::new).transpose()?;

    Ok(Rule {
        id: raw.id.unwrap_or_else(|| key.to_owned()),
        key: raw.key,
        name: raw.name,
        latin_name: raw.lname,
        format: inherit_or(raw.fmt.as_deref().map(parse_format), default, |d| &d.format),
        latin_format: inherit_or(raw.lfmt.as_deref().map(parse_format), default, |d| &d.latin_format),
        required: inherit_or(raw.require.as_deref().map(parse_field_list), default, |d| &d.required),
        upper: inherit_or(raw.upper.as_deref().map(parse_field_list), default, |d| &d.upper),
        sub_keys,
        sub_names,
        sub_latin_names,
        countries: split_list(raw.countries.as_deref()),
        language: raw.lang,
        languages: split_list(raw.languages.as_deref()),
        postal_code_matcher,
        postal_code_examples: split_on(raw.zipex.as_deref(), EXAMPLE_SEPARATOR),
        postal_url: raw.posturl,
        postal_code_name_type: inherit_or(raw.zip_name_type, default, |d| {
            &d.postal_code_name_type
        }),
        admin_area_name_type: inherit_or(raw.state_name_type, default, |d| &d.admin_area_name_type),
        locality_name_type: inherit_or(raw.locality_name_type, default, |d| &d.locality_name_type),
        sublocality_name_type: inherit_or(raw.sublocality_name_type, default, |d| {
            &d.sublocality_name_type
        }),
    })
}

fn inherit_or<T, R>(own: Option<T>, default: Option<&Rule>, field: impl Fn(&Rule) -> &R) -> R
where
    T: Into<R>,
    R: Clone + Default,
{
    match (own, default) {
        (Some(value), _) => value.into(),
        (None, Some(default)) => field(default).clone(),
        (None, None) => R::default(),
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    split_on(raw, LIST_SEPARATOR)
}

fn split_on(raw: Option<&str>, separator: char) -> Vec<String> {
    match raw {
        Some(raw) if !raw.is_empty() => raw.split(separator).map(ToOwned::to_owned).collect(),
        _ => Vec::new(),
    }
}
