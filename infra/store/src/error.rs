use std::borrow::Cow;

/// A specialized [`Result`] alias for the store crate.
pub type Result<T> = std::result::Result<T, StoreError>;

/// A specialized [`StoreError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Key not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Corrupt record{}: {message}", format_context(.context))]
    Corrupt { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Decompression failure{}: {source}", format_context(.context))]
    Decompress { source: lz4_flex::block::DecompressError, context: Option<Cow<'static, str>> },

    #[error("Record encoding failure{}: {source}", format_context(.context))]
    Encode { source: postcard::Error, context: Option<Cow<'static, str>> },
}

impl StoreError {
    /// Whether the error only means that nothing is stored under the key.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub trait StoreErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T>;
}

impl<T> StoreErrorExt<T> for Result<T> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                StoreError::NotFound { context: c, .. }
                | StoreError::Corrupt { context: c, .. }
                | StoreError::Io { context: c, .. }
                | StoreError::Decompress { context: c, .. }
                | StoreError::Encode { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl From<std::io::Error> for StoreError {
    #[inline]
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, context: None }
    }
}

impl<T> StoreErrorExt<T> for std::result::Result<T, std::io::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| StoreError::Io { source, context: Some(context.into()) })
    }
}

impl From<lz4_flex::block::DecompressError> for StoreError {
    #[inline]
    fn from(source: lz4_flex::block::DecompressError) -> Self {
        Self::Decompress { source, context: None }
    }
}

impl<T> StoreErrorExt<T> for std::result::Result<T, lz4_flex::block::DecompressError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| StoreError::Decompress { source, context: Some(context.into()) })
    }
}

impl From<postcard::Error> for StoreError {
    #[inline]
    fn from(source: postcard::Error) -> Self {
        Self::Encode { source, context: None }
    }
}

impl<T> StoreErrorExt<T> for std::result::Result<T, postcard::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| StoreError::Encode { source, context: Some(context.into()) })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
