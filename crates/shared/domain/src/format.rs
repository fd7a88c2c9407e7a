use crate::field::AddressField;
use std::fmt;

/// One element of an address format pattern such as `"%N%n%O%n%A%n%C %Z"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormatElement {
    Field(AddressField),
    Newline,
    Literal(String),
}

impl fmt::Display for FormatElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, "%{}", field.token()),
            Self::Newline => f.write_str("%n"),
            Self::Literal(text) => f.write_str(text),
        }
    }
}

/// Splits a format pattern into fields, line breaks and literal text.
///
/// Escapes that do not name a field are kept verbatim as literal text.
#[must_use]
pub fn parse_format(raw: &str) -> Vec<FormatElement> {
    let mut elements = Vec::new();
    let mut literal = String::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => {
                flush_literal(&mut elements, &mut literal);
                elements.push(FormatElement::Newline);
            },
            Some(token) => match AddressField::from_token(token) {
                Some(field) => {
                    flush_literal(&mut elements, &mut literal);
                    elements.push(FormatElement::Field(field));
                },
                None => {
                    literal.push('%');
                    literal.push(token);
                },
            },
            None => literal.push('%'),
        }
    }
    flush_literal(&mut elements, &mut literal);

    elements
}

/// Renders parsed elements back into pattern syntax.
#[must_use]
pub fn format_pattern(elements: &[FormatElement]) -> String {
    elements.iter().map(ToString::to_string).collect()
}

fn flush_literal(elements: &mut Vec<FormatElement>, literal: &mut String) {
    if !literal.is_empty() {
        elements.push(FormatElement::Literal(std::mem::take(literal)));
    }
}
