//! Hierarchical location identifiers.
//!
//! A [`LookupKey`] names a node in the `country/admin_area/locality/dependent_locality`
//! chain. Each populated depth has a canonical key string (`data/XA/aa`) that is
//! used as the cache key and as the address of the metadata payload.

use crate::error::{DomainError, Result};
use std::fmt;
use std::str::FromStr;

/// Root segment shared by every key string.
pub const KEY_ROOT: &str = "data";
/// Number of hierarchy levels a lookup key can address.
pub const MAX_DEPTH: usize = 4;

const SEPARATOR: char = '/';
const LANGUAGE_SEPARATOR: &str = "--";

/// An immutable path of up to [`MAX_DEPTH`] segments with an optional language tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LookupKey {
    segments: Vec<String>,
    language: Option<String>,
}

impl LookupKey {
    /// Builds a key from an explicit `[country, admin_area, locality, dependent_locality]` tuple.
    ///
    /// Levels must be contiguous: a level may only be set when every shallower level is set.
    pub fn from_parts(parts: [Option<&str>; MAX_DEPTH]) -> Result<Self> {
        let mut segments = Vec::with_capacity(MAX_DEPTH);
        let mut gap = None;

        for (depth, part) in parts.iter().enumerate() {
            match (part, gap) {
                (Some(_), Some(missing)) => {
                    return Err(DomainError::NonContiguous {
                        message: format!("depth {depth} is set but depth {missing} is not").into(),
                        context: None,
                    });
                },
                (Some(segment), None) => segments.push(validate_segment(segment)?.to_owned()),
                (None, None) => gap = Some(depth),
                (None, Some(_)) => {},
            }
        }

        Ok(Self { segments, language: None })
    }

    /// Parses a key string such as `data/XA/aa` or `data/CA--fr`.
    pub fn from_key_string(raw: &str) -> Result<Self> {
        let (path, language) = split_language(raw)?;

        let mut parts = path.split(SEPARATOR);
        if parts.next() != Some(KEY_ROOT) {
            return Err(DomainError::invalid_key(format!("'{raw}' does not start with '{KEY_ROOT}'")));
        }

        let segments = parts
            .map(|segment| validate_segment(segment).map(ToOwned::to_owned))
            .collect::<Result<Vec<_>>>()?;
        if segments.len() > MAX_DEPTH {
            return Err(DomainError::TooDeep {
                message: format!("'{raw}' has {} levels, at most {MAX_DEPTH} allowed", segments.len())
                    .into(),
                context: None,
            });
        }

        Ok(Self { segments, language: language.map(ToOwned::to_owned) })
    }

    /// The key one level deeper, below `segment`.
    pub fn child(&self, segment: &str) -> Result<Self> {
        if self.segments.len() >= MAX_DEPTH {
            return Err(DomainError::TooDeep {
                message: format!("'{self}' has no level below it").into(),
                context: None,
            });
        }
        let mut child = self.clone();
        child.segments.push(validate_segment(segment)?.to_owned());
        Ok(child)
    }

    /// Depth of a key string, derived from its structure alone.
    ///
    /// `data/XA` is depth 0 and `data/XA/aa/bb/cc` is depth 3. The bare `data`
    /// key has no depth. Accepts exactly the strings [`LookupKey::from_key_string`] does.
    pub fn depth_of(key: &str) -> Result<usize> {
        let parsed = Self::from_key_string(key)
            .map_err(|err| DomainError::invalid_depth(format!("'{key}' is not a hierarchy key: {err}")))?;
        parsed
            .len()
            .checked_sub(1)
            .ok_or_else(|| DomainError::invalid_depth(format!("'{key}' is not a hierarchy key")))
    }

    /// Canonical key string for `depth` (0-based).
    pub fn key_string_at_depth(&self, depth: usize) -> Result<String> {
        if depth >= self.segments.len() {
            return Err(DomainError::invalid_depth(format!(
                "depth {depth} requested from a key with {} levels",
                self.segments.len()
            )));
        }
        Ok(self.build_key_string(depth + 1))
    }

    /// Key strings of every populated depth, shallowest first.
    pub fn key_strings(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.segments.len()).map(|levels| self.build_key_string(levels))
    }

    /// Number of populated levels.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The country segment, if any.
    #[must_use]
    pub fn region_code(&self) -> Option<&str> {
        self.segment(0)
    }

    #[must_use]
    pub fn segment(&self, depth: usize) -> Option<&str> {
        self.segments.get(depth).map(String::as_str)
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    fn build_key_string(&self, levels: usize) -> String {
        let mut key = String::from(KEY_ROOT);
        for segment in &self.segments[..levels] {
            key.push(SEPARATOR);
            key.push_str(segment);
        }
        if let Some(language) = &self.language {
            key.push_str(LANGUAGE_SEPARATOR);
            key.push_str(language);
        }
        key
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build_key_string(self.segments.len()))
    }
}

impl FromStr for LookupKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_key_string(s)
    }
}

fn split_language(raw: &str) -> Result<(&str, Option<&str>)> {
    match raw.rsplit_once(LANGUAGE_SEPARATOR) {
        Some((_, "")) => Err(DomainError::invalid_key(format!("'{raw}' has an empty language tag"))),
        Some((path, language)) => Ok((path, Some(language))),
        None => Ok((raw, None)),
    }
}

fn validate_segment(segment: &str) -> Result<&str> {
    if segment.is_empty() {
        return Err(DomainError::invalid_key("empty key segment"));
    }
    if segment.contains(SEPARATOR) {
        return Err(DomainError::invalid_key(format!("segment '{segment}' contains '{SEPARATOR}'")));
    }
    Ok(segment)
}
