// Copyright (c) 2022-2023 Web 3 Foundation

//! ### Wire encoding of transmitted values
//!
//! Everything crossing the network is a group element, a scalar, or
//! raw bytes.  Serialization is canonical via Arkworks, with an
//! explicit compression mode; the byte string is then wrapped in
//! url-safe base64 for text transports.  Unwrapping inverts wrapping
//! exactly, and decoded group elements are validated before use, so a
//! wrong-group or off-curve value never reaches the protocol.

use ark_ec::pairing::{Pairing, PairingOutput};
use ark_serialize::{CanonicalSerialize, CanonicalDeserialize, Compress, Validate};
use ark_std::{string::String, vec::Vec};

use base64::engine::{general_purpose::URL_SAFE, Engine as _};

use crate::{
    blind::BlindedMessage,
    error::PopResult,
    eval::Intermediate,
    proof::Proof,
};


/// A value at the serialization boundary.
///
/// Closed over the element kinds the protocol transmits; the match in
/// [`Wrapped::wrap`] is exhaustive, so a new kind cannot silently skip
/// the boundary.
#[derive(Debug, Clone)]
pub enum Wrapped<P: Pairing> {
    G1(P::G1Affine),
    G2(P::G2Affine),
    Gt(PairingOutput<P>),
    Scalar(P::ScalarField),
    Raw(Vec<u8>),
}

impl<P: Pairing> Wrapped<P> {
    /// Serialize under the given compression mode and base64-wrap.
    pub fn wrap(&self, compress: Compress) -> PopResult<String> {
        let mut bytes = Vec::new();
        match self {
            Wrapped::G1(e) => e.serialize_with_mode(&mut bytes, compress)?,
            Wrapped::G2(e) => e.serialize_with_mode(&mut bytes, compress)?,
            Wrapped::Gt(e) => e.serialize_with_mode(&mut bytes, compress)?,
            Wrapped::Scalar(s) => s.serialize_with_mode(&mut bytes, compress)?,
            Wrapped::Raw(b) => bytes.extend_from_slice(b),
        }
        Ok(URL_SAFE.encode(&bytes))
    }
}

fn unwrap_bytes(wrapped: &str) -> PopResult<Vec<u8>> {
    Ok(URL_SAFE.decode(wrapped.as_bytes())?)
}

/// Unwrap a G1 element, validating curve and subgroup membership.
pub fn unwrap_g1<P: Pairing>(wrapped: &str, compress: Compress) -> PopResult<P::G1Affine> {
    let bytes = unwrap_bytes(wrapped)?;
    Ok(P::G1Affine::deserialize_with_mode(bytes.as_slice(), compress, Validate::Yes)?)
}

/// Unwrap a G2 element, validating curve and subgroup membership.
pub fn unwrap_g2<P: Pairing>(wrapped: &str, compress: Compress) -> PopResult<P::G2Affine> {
    let bytes = unwrap_bytes(wrapped)?;
    Ok(P::G2Affine::deserialize_with_mode(bytes.as_slice(), compress, Validate::Yes)?)
}

/// Unwrap a Gt element.
pub fn unwrap_gt<P: Pairing>(wrapped: &str, compress: Compress) -> PopResult<PairingOutput<P>> {
    let bytes = unwrap_bytes(wrapped)?;
    Ok(PairingOutput::<P>::deserialize_with_mode(bytes.as_slice(), compress, Validate::Yes)?)
}

/// Unwrap a scalar.
pub fn unwrap_scalar<P: Pairing>(wrapped: &str, compress: Compress) -> PopResult<P::ScalarField> {
    let bytes = unwrap_bytes(wrapped)?;
    Ok(P::ScalarField::deserialize_with_mode(bytes.as_slice(), compress, Validate::Yes)?)
}

/// Unwrap raw bytes.
pub fn unwrap_raw(wrapped: &str) -> PopResult<Vec<u8>> {
    unwrap_bytes(wrapped)
}


/// Client's request: selector, tweak, and blinded message.
#[derive(Debug, Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct ClientRequest<P: Pairing> {
    pub selector: Vec<u8>,
    pub tweak: Vec<u8>,
    pub x: BlindedMessage<P>,
}

impl<P: Pairing> PartialEq for ClientRequest<P> {
    fn eq(&self, other: &Self) -> bool {
        self.selector == other.selector && self.tweak == other.tweak && self.x == other.x
    }
}
impl<P: Pairing> Eq for ClientRequest<P> {}

/// Server's response: intermediate result and its proof.
#[derive(Debug, Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct ServerResponse<P: Pairing> {
    pub y: Intermediate<P>,
    pub proof: Proof<P>,
}

impl<P: Pairing> PartialEq for ServerResponse<P> {
    fn eq(&self, other: &Self) -> bool {
        self.y == other.y && self.proof == other.proof
    }
}
impl<P: Pairing> Eq for ServerResponse<P> {}
