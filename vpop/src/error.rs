// Copyright (c) 2022-2023 Web 3 Foundation

//! ### Protocol errors

use ark_serialize::SerializationError;


/// Result type for all fallible protocol operations.
pub type PopResult<T> = Result<T, PopError>;

/// Errors arising in the protocol.
///
/// `ProofInvalid` is the only error expected in production; everything
/// else indicates misuse, malformed wire data, or configuration
/// failure, and callers should treat those as fatal rather than retry.
#[derive(Debug)]
pub enum PopError {
    /// A zero-knowledge proof failed verification.
    ProofInvalid,
    /// A scalar required a multiplicative inverse it does not possess.
    ///
    /// Blinding retries this internally; during key rotation it means
    /// the outgoing derived key was zero, which occurs only with
    /// negligible probability or a broken key-derivation input.
    NotInvertible,
    /// An input lay outside the operation's domain, like an identity
    /// element where a blinded message was expected.  Rejected before
    /// any cryptographic computation.
    Domain,
    /// The key table has no entry for the requested ensemble selector.
    UnknownSelector,
    /// Canonical (de)serialization of a group element or scalar failed.
    Serialization(SerializationError),
    /// Text transport decoding failed.
    Decode(base64::DecodeError),
}

impl core::fmt::Display for PopError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            PopError::ProofInvalid => write!(f, "zero-knowledge proof failed verification"),
            PopError::NotInvertible => write!(f, "scalar has no multiplicative inverse"),
            PopError::Domain => write!(f, "input outside the operation's domain"),
            PopError::UnknownSelector => write!(f, "unknown ensemble key selector"),
            PopError::Serialization(e) => write!(f, "canonical serialization failed: {}", e),
            PopError::Decode(e) => write!(f, "transport decoding failed: {}", e),
        }
    }
}

impl From<SerializationError> for PopError {
    fn from(e: SerializationError) -> PopError { PopError::Serialization(e) }
}

impl From<base64::DecodeError> for PopError {
    fn from(e: base64::DecodeError) -> PopError { PopError::Decode(e) }
}

#[cfg(feature = "std")]
impl std::error::Error for PopError {}
