pub mod analyze;
pub mod encode;
pub mod encrypt;
pub mod files;

/// Error taxonomy of the crate. Codec and XOR primitive errors fail fast;
/// the cryptanalysis routines only fail when the ciphertext is too short to sample.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("hex input length must be even, got {0}")]
    OddHexLength(usize),

    #[error("invalid hex digit {0:?}")]
    InvalidHexDigit(char),

    #[error("base64 input length must be a multiple of 4, got {0}")]
    InvalidBase64Length(usize),

    #[error("invalid base64 character {0:?}")]
    InvalidBase64Char(char),

    #[error("'=' padding is only valid at the end of base64 input")]
    MisplacedPad,

    #[error("operands must have the same length, got {left} and {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("key must not be empty")]
    EmptyKey,

    #[error("AES-128 key must be 16 bytes, got {0}")]
    BadKeyLength(usize),

    #[error("invalid PKCS#7 padding")]
    BadPadding,

    #[error("ciphertext too short to sample any key length in {min}..={max}")]
    InsufficientCiphertext { min: usize, max: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    OpenSsl(#[from] openssl::error::ErrorStack),
}

pub type Result<T> = std::result::Result<T, Error>;
