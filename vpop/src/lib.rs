// Copyright (c) 2022-2023 Web 3 Foundation

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![doc = include_str!("../README.md")]

use ark_ec::{
    AffineRepr,
    hashing::{HashToCurve, HashToCurveError},
    pairing::{Pairing, PairingOutput},
};

pub mod error;
pub use error::{PopError, PopResult};

pub mod transcript;
pub use transcript::PopTranscript;

pub mod keys;
pub use keys::{MasterSecretKey, TweakState, KeyEpoch, DerivedKey};

pub mod blind;
pub use blind::{blind, deblind, BlindingFactor, BlindedMessage, FinalOutput};

pub mod eval;
pub use eval::{TweakHash, Intermediate, Evaluation};

pub mod proof;
pub use proof::Proof;

pub mod rotate;
pub use rotate::UpdateToken;

pub mod wrap;
pub use wrap::{Wrapped, ClientRequest, ServerResponse};

pub mod store;
pub use store::KeyStore;
#[cfg(feature = "std")]
pub use store::MemoryKeyStore;

#[cfg(feature = "bls12_381")]
pub mod bls12_381;

#[cfg(all(test, feature = "bls12_381"))]
mod tests;


/// Values hashable onto a group of the pairing, like messages onto G1
/// or tweaks onto G2.
///
/// Curve instantiations implement this upon their own message wrapper
/// types, selecting their own hash-to-curve.  Points pass through
/// unchanged, so already-hashed or deserialized elements work too.
pub trait IntoPopInput<C: AffineRepr> {
    fn into_pop_input(self) -> C;
}

impl<C: AffineRepr> IntoPopInput<C> for C {
    #[inline(always)]
    fn into_pop_input(self) -> C { self }
}

/// Hash bytes onto a group under a domain, through an Arkworks
/// hash-to-curve suite chosen by the curve instantiation.
pub fn ark_hash_to_group<C, H2C>(domain: &[u8], message: &[u8]) -> Result<C, HashToCurveError>
where C: AffineRepr, H2C: HashToCurve<<C as AffineRepr>::Group>,
{
    Ok(H2C::new(domain)?.hash(message)?)
}


/// Process-wide protocol context: the fixed bases against which keys
/// are committed.
///
/// Construct once, at startup or lazily, and pass by reference into
/// protocol operations.  Both bases are derived from the curve's
/// generators, so every process agrees on them without coordination.
#[derive(Debug, Clone)]
pub struct Vpop<P: Pairing> {
    /// Base point in G1 for key commitments `p = keying_base * kw`.
    pub keying_base: P::G1Affine,
    /// Generator of Gt, the base for rotated key commitments.
    pub target_base: PairingOutput<P>,
}

impl<P: Pairing> Vpop<P> {
    pub fn new() -> Self {
        use ark_ec::Group;
        Vpop {
            keying_base: P::G1Affine::generator(),
            target_base: PairingOutput::<P>::generator(),
        }
    }
}

impl<P: Pairing> Default for Vpop<P> {
    fn default() -> Self { Vpop::new() }
}
