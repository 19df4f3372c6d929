/// Errors raised by [`crate::TokenCipher`].
#[derive(Debug)]
pub enum CryptoError {
    InvalidKeyLength(usize),
    Encrypt,
    Decrypt,
    Decode(String),
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CryptoError::InvalidKeyLength(n) => {
                write!(f, "encryption key must be 32 bytes, got {n}")
            }
            CryptoError::Encrypt => write!(f, "failed to encrypt value"),
            CryptoError::Decrypt => write!(f, "failed to decrypt value (wrong key or tampered ciphertext)"),
            CryptoError::Decode(msg) => write!(f, "malformed ciphertext: {msg}"),
        }
    }
}

impl std::error::Error for CryptoError {}
