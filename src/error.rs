use crate::ParseError;

/// Errors returned by the generator and decoder functions.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum Error {
    /// The instant to embed could not be converted into a UUIDv6 timestamp.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A timestamp was requested from a UUID whose version field is not 6.
    #[error("version {version} UUID given, not version 6; cannot extract the timestamp")]
    VersionMismatch {
        /// The version nibble actually found in the UUID.
        version: u8,
    },

    /// A textual UUID representation could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The output representations or the timestamp round trip disagreed in [`self_check`].
    ///
    /// [`self_check`]: crate::self_check
    #[error("self-check failed: {0}")]
    SelfCheck(String),
}
