use std::borrow::Cow;

/// A specialized [`Result`] alias for the domain crate.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Errors raised while building lookup keys or parsing metadata rules.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid lookup key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Non-contiguous lookup key{}: {message}", format_context(.context))]
    NonContiguous { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Lookup key too deep{}: {message}", format_context(.context))]
    TooDeep { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid depth{}: {message}", format_context(.context))]
    InvalidDepth { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Malformed payload{}: {message}", format_context(.context))]
    MalformedPayload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Malformed JSON payload{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid postal code pattern{}: {source}", format_context(.context))]
    Pattern { source: regex::Error, context: Option<Cow<'static, str>> },
}

impl DomainError {
    pub(crate) fn invalid_key(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidKey { message: message.into(), context: None }
    }

    pub(crate) fn invalid_depth(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidDepth { message: message.into(), context: None }
    }

    pub(crate) fn malformed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::MalformedPayload { message: message.into(), context: None }
    }

    /// Whether the error describes a payload that could not be turned into a rule.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPayload { .. } | Self::Json { .. } | Self::Pattern { .. })
    }
}

pub trait DomainErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T>;
}

impl<T> DomainErrorExt<T> for Result<T> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                DomainError::InvalidKey { context: c, .. }
                | DomainError::NonContiguous { context: c, .. }
                | DomainError::TooDeep { context: c, .. }
                | DomainError::InvalidDepth { context: c, .. }
                | DomainError::MalformedPayload { context: c, .. }
                | DomainError::Json { context: c, .. }
                | DomainError::Pattern { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl From<serde_json::Error> for DomainError {
    #[inline]
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source, context: None }
    }
}

impl<T> DomainErrorExt<T> for std::result::Result<T, serde_json::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| DomainError::Json { source, context: Some(context.into()) })
    }
}

impl From<regex::Error> for DomainError {
    #[inline]
    fn from(source: regex::Error) -> Self {
        Self::Pattern { source, context: None }
    }
}

impl<T> DomainErrorExt<T> for std::result::Result<T, regex::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| DomainError::Pattern { source, context: Some(context.into()) })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
