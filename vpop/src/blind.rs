// Copyright (c) 2022-2023 Web 3 Foundation

//! ### Client-side blinding and deblinding
//!
//! The client hides its message by hashing onto G1 and multiplying by
//! an ephemeral scalar `r`, keeping only `1/r`.  Deblinding any honest
//! evaluation of the blinded point with `1/r` cancels `r` exactly, so
//! the final output depends only on the message, tweak, and server key
//! regardless of which `r` was sampled.

use ark_ec::{CurveGroup, pairing::{Pairing, PairingOutput}};
use ark_serialize::{CanonicalSerialize, CanonicalDeserialize};
use ark_std::UniformRand;

use ark_ff::Field;

use rand_core::{RngCore, CryptoRng};

use zeroize::Zeroize;

use crate::{
    IntoPopInput,
    error::{PopError, PopResult},
    eval::Intermediate,
};


/// Attempt bound when sampling an invertible blinding scalar.
///
/// A uniform draw fails only on the zero element, so more than one
/// round trip here means the entropy source is broken and we abort
/// rather than spin.
pub const MAX_BLINDING_ATTEMPTS: usize = 32;


/// Retained inverse `1/r` of an ephemeral blinding scalar.
///
/// Client-private; lives only from blinding until deblinding.
#[derive(Clone)]
pub struct BlindingFactor<P: Pairing>(pub(crate) P::ScalarField);

impl<P: Pairing> Zeroize for BlindingFactor<P> {
    fn zeroize(&mut self) { self.0.zeroize(); }
}
impl<P: Pairing> Drop for BlindingFactor<P> {
    fn drop(&mut self) { self.zeroize() }
}


/// Blinded message `x = H1(m) * r`, an element of G1.
///
/// Indistinguishable across repeated blindings of the same message.
#[derive(Debug, Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct BlindedMessage<P: Pairing>(pub P::G1Affine);

impl<P: Pairing> PartialEq for BlindedMessage<P> {
    fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}
impl<P: Pairing> Eq for BlindedMessage<P> {}


/// Deblinded PRF output `z = y^(1/r) = e(H1(m), H2(t))^kw`.
///
/// The sole value delivered to the client, deterministic in the
/// message, tweak, selector, and server secrets.
#[derive(Debug, Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct FinalOutput<P: Pairing>(pub PairingOutput<P>);

impl<P: Pairing> PartialEq for FinalOutput<P> {
    fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}
impl<P: Pairing> Eq for FinalOutput<P> {}


/// Blind a message under a fresh ephemeral scalar.
///
/// Samples `r` until invertible, computes `x = H1(m) * r`, and returns
/// `(1/r, x)`; `r` itself is wiped before returning.
pub fn blind<P, M, R>(message: M, rng: &mut R) -> PopResult<(BlindingFactor<P>, BlindedMessage<P>)>
where P: Pairing, M: IntoPopInput<P::G1Affine>, R: RngCore + CryptoRng
{
    let h = message.into_pop_input();
    for _ in 0..MAX_BLINDING_ATTEMPTS {
        let mut r = <P::ScalarField as UniformRand>::rand(rng);
        if let Some(r_inv) = r.inverse() {
            let x = (h * r).into_affine();
            r.zeroize();
            return Ok((BlindingFactor(r_inv), BlindedMessage(x)));
        }
    }
    Err(PopError::NotInvertible)
}

/// Remove the blinding from an intermediate evaluation.
pub fn deblind<P: Pairing>(factor: &BlindingFactor<P>, y: &Intermediate<P>) -> FinalOutput<P> {
    FinalOutput(y.0 * factor.0)
}
