//! Typed error enum for the `asn2proto-translate` library API.
//!
//! Library consumers can match on specific variants. A CLI frontend
//! converts these to `anyhow::Error` at the binary boundary for richer
//! context messages.

/// Errors produced by translation and rendering.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TranslateError {
    /// A constraint node had an arity or shape the compiler does not
    /// recognize. This is an input-shape violation — it indicates a bug
    /// upstream of this crate, in the parser/fixer that produced the
    /// AST, not a legal-but-unsupported construct.
    #[error("malformed constraint: {0}")]
    MalformedConstraint(String),

    /// A `REFERENCE`/`TYPEREF` node could not be resolved to a terminal
    /// type by the supplied [`crate::resolver::TerminalTypeResolver`].
    #[error("unresolved type reference: {0}")]
    UnresolvedTypeRef(String),

    /// Writing rendered `.proto` text to the output sink failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, TranslateError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time assertion that `TranslateError` is `Send + Sync`.
    /// Required for use across thread boundaries by embedding tools.
    const _: () = {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TranslateError>();
    };
}
