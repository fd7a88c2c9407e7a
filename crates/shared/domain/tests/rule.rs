use addrmeta_domain::field::field_tokens;
use addrmeta_domain::format::format_pattern;
use addrmeta_domain::{AddressField, DomainError, FormatElement, Rule, parse_format, parse_rule};

fn default_rule() -> Rule {
    Rule::builtin_default()
}

#[test]
fn empty_object_is_no_rule() {
    let rule = parse_rule("data/XA", "{}", Some(&default_rule())).unwrap();
    assert!(rule.is_none());
}

#[test]
fn invalid_json_is_malformed() {
    let err = parse_rule("data/XA", "{\"id\":", None).unwrap_err();
    assert!(err.is_malformed());

    let err = parse_rule("data/XA", "[1, 2]", None).unwrap_err();
    assert!(matches!(err, DomainError::MalformedPayload { .. }));

    let err = parse_rule("data/XA", r#"{"fmt": 5}"#, None).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn country_rule_inherits_from_default() {
    let rule = parse_rule("data/XA", r#"{"id":"data/XA"}"#, Some(&default_rule())).unwrap().unwrap();

    assert_eq!(rule.id, "data/XA");
    assert!(!rule.format.is_empty());
    assert!(!rule.required.is_empty());
    assert_eq!(rule.postal_code_name_type.as_deref(), Some("postal"));
    assert!(rule.postal_code_matcher.is_none());
}

#[test]
fn country_rule_keeps_its_own_fields() {
    let raw = r#"{"fmt":"%N%n%A%n%Z %C","require":"ACZ"}"#;
    let rule = parse_rule("data/XA", raw, Some(&default_rule())).unwrap().unwrap();

    assert_eq!(format_pattern(&rule.format), "%N%n%A%n%Z %C");
    assert_eq!(field_tokens(&rule.required), "ACZ");
    assert_eq!(field_tokens(&rule.upper), "C");
}

#[test]
fn deeper_rules_never_inherit() {
    let rule = parse_rule("data/XA/aa", r#"{"id":"data/XA/aa"}"#, Some(&default_rule())).unwrap().unwrap();

    assert!(rule.format.is_empty());
    assert!(rule.required.is_empty());
    assert!(rule.postal_code_name_type.is_none());
}

#[test]
fn id_defaults_to_key() {
    let rule = parse_rule("data/XA/aa", r#"{"name":"Alpha"}"#, None).unwrap().unwrap();
    assert_eq!(rule.id, "data/XA/aa");
    assert_eq!(rule.name.as_deref(), Some("Alpha"));
}

#[test]
fn sub_keys_and_names_are_parallel() {
    let rule = parse_rule("data/XA", r#"{"sub_keys":"aa~bb","sub_names":"Alpha~Beta"}"#, None)
        .unwrap()
        .unwrap();

    assert_eq!(rule.sub_keys, ["aa", "bb"]);
    assert_eq!(rule.sub_key_index("bb"), Some(1));
    assert_eq!(rule.sub_name(1), Some("Beta"));

    let rule = parse_rule("data/XA", r#"{"sub_keys":"aa~bb"}"#, None).unwrap().unwrap();
    assert_eq!(rule.sub_names, ["aa", "bb"]);

    let err = parse_rule("data/XA", r#"{"sub_keys":"aa~bb","sub_names":"Alpha"}"#, None).unwrap_err();
    assert!(matches!(err, DomainError::MalformedPayload { .. }));
}

#[test]
fn postal_code_matcher_supports_full_and_prefix_matches() {
    let rule = parse_rule("data/XA", r#"{"zip":"\\d{5}(-\\d{4})?","zipex":"95014,22162-1010"}"#, None)
        .unwrap()
        .unwrap();
    let matcher = rule.postal_code_matcher.as_ref().unwrap();

    assert!(matcher.is_match("95014"));
    assert!(matcher.is_match("22162-1010"));
    assert!(!matcher.is_match("9501"));
    assert!(!matcher.is_match("95014x"));
    assert!(matcher.is_prefix_match("95014x"));
    assert_eq!(rule.postal_code_examples, ["95014", "22162-1010"]);

    let state = parse_rule("data/XA/aa", r#"{"zip":"9[0-6]"}"#, None).unwrap().unwrap();
    assert!(state.postal_code_matcher.unwrap().is_prefix_match("95014"));
}

#[test]
fn invalid_postal_pattern_is_malformed() {
    let err = parse_rule("data/XA", r#"{"zip":"(\\d"}"#, None).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn format_keeps_unknown_escapes_as_literals() {
    let elements = parse_format("%N%n%O%n%A%n%C %Z%%?");

    assert_eq!(elements[0], FormatElement::Field(AddressField::Recipient));
    assert_eq!(elements[1], FormatElement::Newline);
    assert_eq!(elements[6], FormatElement::Field(AddressField::Locality));
    assert_eq!(elements[7], FormatElement::Literal(" ".to_owned()));
    assert_eq!(elements[8], FormatElement::Field(AddressField::PostalCode));
    assert_eq!(elements[9], FormatElement::Literal("%%?".to_owned()));
    assert_eq!(elements.len(), 10);
}

#[test]
fn field_lists_drop_unknown_and_repeated_tokens() {
    let fields = addrmeta_domain::parse_field_list("AC?ZA");
    assert_eq!(fields, [AddressField::StreetAddress, AddressField::Locality, AddressField::PostalCode]);
}

#[test]
fn root_node_lists_countries() {
    let rule = parse_rule("data", r#"{"id":"data","countries":"AD~AE~XA"}"#, None).unwrap().unwrap();
    assert_eq!(rule.countries, ["AD", "AE", "XA"]);
}
