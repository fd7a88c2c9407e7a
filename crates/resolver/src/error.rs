use addrmeta_domain::DomainError;
use addrmeta_store::StoreError;
use std::borrow::Cow;
use std::sync::Arc;

/// A specialized [`Result`] alias for the resolver crate.
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Reasons a single key failed to resolve.
///
/// None of these abort a resolver run: each is folded into the aggregate
/// success flag of the task that observed it.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("Malformed payload{}: {message}", format_context(.context))]
    MalformedPayload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Key unavailable{}: {message}", format_context(.context))]
    KeyUnavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid depth{}: {message}", format_context(.context))]
    InvalidDepth { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Transport failure{}: {message}", format_context(.context))]
    Transport { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Store failure{}: {source}", format_context(.context))]
    Store { source: StoreError, context: Option<Cow<'static, str>> },

    #[cfg(feature = "http")]
    #[error("HTTP failure{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },
}

impl ResolverError {
    pub fn key_unavailable(key: &str) -> Self {
        Self::KeyUnavailable { message: key.to_owned().into(), context: None }
    }

    /// Recovers an owned error from one shared by coalesced cache loads.
    ///
    /// Only the last holder gets the original back; everyone else receives an
    /// equivalent error of the same kind.
    pub(crate) fn from_shared(shared: Arc<Self>) -> Self {
        Arc::try_unwrap(shared).unwrap_or_else(|arc| {
            let message: Cow<'static, str> = arc.to_string().into();
            let context = Some("shared by coalesced loads".into());
            match *arc {
                Self::MalformedPayload { .. } => Self::MalformedPayload { message, context },
                Self::KeyUnavailable { .. } => Self::KeyUnavailable { message, context },
                Self::InvalidDepth { .. } => Self::InvalidDepth { message, context },
                _ => Self::Transport { message, context },
            }
        })
    }
}

pub trait ResolverErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T>;
}

impl<T> ResolverErrorExt<T> for Result<T> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                ResolverError::MalformedPayload { context: c, .. }
                | ResolverError::KeyUnavailable { context: c, .. }
                | ResolverError::InvalidDepth { context: c, .. }
                | ResolverError::Transport { context: c, .. }
                | ResolverError::Store { context: c, .. } => *c = Some(context.into()),
                #[cfg(feature = "http")]
                ResolverError::Http { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl From<DomainError> for ResolverError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string().into();
        if err.is_malformed() {
            Self::MalformedPayload { message, context: None }
        } else {
            Self::InvalidDepth { message, context: None }
        }
    }
}

impl From<StoreError> for ResolverError {
    #[inline]
    fn from(source: StoreError) -> Self {
        Self::Store { source, context: None }
    }
}

impl<T> ResolverErrorExt<T> for std::result::Result<T, StoreError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| ResolverError::Store { source, context: Some(context.into()) })
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ResolverError {
    #[inline]
    fn from(source: reqwest::Error) -> Self {
        Self::Http { source, context: None }
    }
}

#[cfg(feature = "http")]
impl<T> ResolverErrorExt<T> for std::result::Result<T, reqwest::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| ResolverError::Http { source, context: Some(context.into()) })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
