//! Text and JSON rendering of command results.

use addrmeta::domain::format::format_pattern;
use addrmeta::domain::{AddressField, LookupKey, Rule};
use addrmeta::resolver::{PreloadSummary, Resolution};
use serde_json::{Value, json};
use std::fmt::Write;

pub(crate) fn resolution(resolution: &Resolution, as_json: bool) -> String {
    let key = &resolution.lookup_key;
    let levels = key.key_strings().enumerate().map(|(depth, key_string)| {
        (depth, key_string, resolution.hierarchy.get(depth))
    });

    if as_json {
        let levels: Vec<Value> = levels
            .map(|(depth, key_string, rule)| {
                json!({ "depth": depth, "key": key_string, "rule": rule.map(rule_json) })
            })
            .collect();
        return json!({ "key": key.to_string(), "success": resolution.success, "levels": levels })
            .to_string();
    }

    let mut out = String::new();
    let status = if resolution.success { "ok" } else { "incomplete" };
    let _ = writeln!(out, "{key}: {status}");
    for (depth, key_string, rule) in levels {
        match rule {
            Some(rule) => write_rule(&mut out, depth, &key_string, rule),
            None => {
                let _ = writeln!(out, "[{depth}] {key_string} (no data)");
            },
        }
    }
    out
}

pub(crate) fn keys(key: &LookupKey, as_json: bool) -> String {
    if as_json {
        return Value::from(key.key_strings().collect::<Vec<_>>()).to_string();
    }
    key.key_strings()
        .enumerate()
        .fold(String::new(), |mut out, (depth, key_string)| {
            let _ = writeln!(out, "{depth} {key_string}");
            out
        })
}

pub(crate) fn preload(region: &LookupKey, summary: PreloadSummary, as_json: bool) -> String {
    if as_json {
        return json!({ "region": region.to_string(), "success": summary.success, "loaded": summary.loaded })
            .to_string();
    }
    let status = if summary.success { "ok" } else { "incomplete" };
    format!("{region}: {status}, {} keys loaded\n", summary.loaded)
}

fn write_rule(out: &mut String, depth: usize, key_string: &str, rule: &Rule) {
    let _ = write!(out, "[{depth}] {key_string}");
    if let Some(name) = &rule.name {
        let _ = write!(out, " \"{name}\"");
    }
    out.push('\n');

    let mut field = |label: &str, value: String| {
        if !value.is_empty() {
            let _ = writeln!(out, "    {label:<10}{value}");
        }
    };
    field("format", format_pattern(&rule.format));
    field("required", field_names(&rule.required));
    field("upper", field_names(&rule.upper));
    field("sub_keys", rule.sub_keys.join(", "));
    field("postal", rule.postal_code_matcher.as_ref().map(ToString::to_string).unwrap_or_default());
    field("examples", rule.postal_code_examples.join(", "));
    field("language", rule.language.clone().unwrap_or_default());
}

fn rule_json(rule: &Rule) -> Value {
    json!({
        "id": rule.id,
        "key": rule.key,
        "name": rule.name,
        "latin_name": rule.latin_name,
        "format": format_pattern(&rule.format),
        "latin_format": format_pattern(&rule.latin_format),
        "required": rule.required.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
        "upper": rule.upper.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
        "sub_keys": rule.sub_keys,
        "sub_names": rule.sub_names,
        "countries": rule.countries,
        "language": rule.language,
        "languages": rule.languages,
        "postal_code_pattern": rule.postal_code_matcher.as_ref().map(|m| m.as_str()),
        "postal_code_examples": rule.postal_code_examples,
        "postal_url": rule.postal_url,
    })
}

fn field_names(fields: &[AddressField]) -> String {
    fields.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ")
}
