use alloc::string::String;

/// Errors returned by fallible surface operations.
///
/// Numeric pixel conversion never fails; everything that can fail reports
/// one of these synchronously at the call site.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Two buffers that must share one size do not.
    #[error("buffer sizes do not match")]
    SizeMismatch,
    /// Two surfaces that must share one pixel format do not.
    #[error("pixel formats do not match")]
    FormatMismatch,
    /// Malformed hex colour or unknown colour name.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
    /// Unrecognised pixel format token.
    #[error("invalid pixel format: {0:?}")]
    InvalidFormat(String),
    /// Unrecognised transform token.
    #[error("invalid transform: {0:?}")]
    InvalidTransform(String),
    /// A parameter outside its documented domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// An external byte buffer is shorter than `pitch * (height - 1) + row`.
    #[error("buffer too small for the requested dimensions")]
    BufferTooSmall,
    /// An external byte buffer or pitch is not aligned to the channel type.
    #[error("buffer is not aligned to the pixel channel type")]
    Misaligned,
}
