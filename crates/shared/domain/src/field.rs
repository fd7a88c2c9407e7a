use std::fmt;

/// A single component of a postal address.
///
/// Every field has a one-character token used by the metadata wire format
/// (`fmt`, `require`, `upper`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressField {
    Country,
    AdminArea,
    Locality,
    DependentLocality,
    SortingCode,
    PostalCode,
    StreetAddress,
    Organization,
    Recipient,
}

impl AddressField {
    #[must_use]
    pub const fn token(self) -> char {
        match self {
            Self::Country => 'R',
            Self::AdminArea => 'S',
            Self::Locality => 'C',
            Self::DependentLocality => 'D',
            Self::SortingCode => 'X',
            Self::PostalCode => 'Z',
            Self::StreetAddress => 'A',
            Self::Organization => 'O',
            Self::Recipient => 'N',
        }
    }

    #[must_use]
    pub const fn from_token(token: char) -> Option<Self> {
        match token {
            'R' => Some(Self::Country),
            'S' => Some(Self::AdminArea),
            'C' => Some(Self::Locality),
            'D' => Some(Self::DependentLocality),
            'X' => Some(Self::SortingCode),
            'Z' => Some(Self::PostalCode),
            'A' => Some(Self::StreetAddress),
            'O' => Some(Self::Organization),
            'N' => Some(Self::Recipient),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::AdminArea => "admin_area",
            Self::Locality => "locality",
            Self::DependentLocality => "dependent_locality",
            Self::SortingCode => "sorting_code",
            Self::PostalCode => "postal_code",
            Self::StreetAddress => "street_address",
            Self::Organization => "organization",
            Self::Recipient => "recipient",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a field list such as `"ACSZ"`.
///
/// Unknown characters are skipped and repeated fields keep their first position.
#[must_use]
pub fn parse_field_list(raw: &str) -> Vec<AddressField> {
    let mut fields = Vec::with_capacity(raw.len());
    for field in raw.chars().filter_map(AddressField::from_token) {
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    fields
}

/// Renders fields back into their token string.
#[must_use]
pub fn field_tokens(fields: &[AddressField]) -> String {
    fields.iter().map(|f| f.token()).collect()
}
