// Copyright (c) 2022-2023 Web 3 Foundation

//! ### BLS12-381 instantiation
//!
//! Messages hash onto G1 and tweaks onto G2 through the
//! Wahby-Boneh map with SHA-256 expansion, under distinct domains.

use ark_ff::fields::field_hashers::DefaultFieldHasher;
use ark_ec::hashing::{HashToCurveError, curve_maps, map_to_curve_hasher::MapToCurveBasedHasher};

pub use ark_bls12_381::{self as curve, Bls12_381};
pub use curve::{Fr, G1Projective, G2Projective};

/// Concrete G1/G2 affine types, named through their curve configs.
///
/// The crate-root `G1Affine`/`G2Affine` aliases resolve through the
/// `Bls12Config` associated projections (`Affine<<Config as
/// Bls12Config>::G1Config>`), which the coherence checker cannot tell
/// apart; spelling the configs concretely lets the two `IntoPopInput`
/// impls below reference provably-distinct types.  These normalize to
/// exactly the same types as the crate-root aliases.
pub type G1Affine = ark_ec::short_weierstrass::Affine<curve::g1::Config>;
pub type G2Affine = ark_ec::short_weierstrass::Affine<curve::g2::Config>;

use crate::IntoPopInput;

/// Pairing engine backing this instantiation.
pub type P = Bls12_381;

pub type Vpop = crate::Vpop<P>;
pub type BlindingFactor = crate::BlindingFactor<P>;
pub type BlindedMessage = crate::BlindedMessage<P>;
pub type TweakHash = crate::TweakHash<P>;
pub type Intermediate = crate::Intermediate<P>;
pub type FinalOutput = crate::FinalOutput<P>;
pub type Evaluation = crate::Evaluation<P>;
pub type Proof = crate::Proof<P>;
pub type UpdateToken = crate::UpdateToken<P>;
pub type ClientRequest = crate::ClientRequest<P>;
pub type ServerResponse = crate::ServerResponse<P>;

/// Default domain for hashing messages onto G1.
pub const MESSAGE_DOMAIN: &[u8] = b"PYTHIA-V01-CS01-with-BLS12381G1_XMD:SHA-256_SSWU_RO_";

/// Default domain for hashing tweaks onto G2.
pub const TWEAK_DOMAIN: &[u8] = b"PYTHIA-V01-CS01-with-BLS12381G2_XMD:SHA-256_SSWU_RO_";

type H2CG1 = MapToCurveBasedHasher<
    G1Projective,
    DefaultFieldHasher<sha2::Sha256>,
    curve_maps::wb::WBMap<curve::g1::Config>,
>;

type H2CG2 = MapToCurveBasedHasher<
    G2Projective,
    DefaultFieldHasher<sha2::Sha256>,
    curve_maps::wb::WBMap<curve::g2::Config>,
>;

pub fn hash_to_g1(domain: &[u8], message: &[u8]) -> Result<G1Affine, HashToCurveError> {
    crate::ark_hash_to_group::<G1Affine, H2CG1>(domain, message)
}

pub fn hash_to_g2(domain: &[u8], message: &[u8]) -> Result<G2Affine, HashToCurveError> {
    crate::ark_hash_to_group::<G2Affine, H2CG2>(domain, message)
}

/// Bytes destined for a group, hashed on demand.
///
/// One wrapper serves both groups; the operation's signature selects
/// whether it lands in G1 (messages) or G2 (tweaks).
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub domain: &'a [u8],
    pub message: &'a [u8],
}

impl<'a> IntoPopInput<G1Affine> for Message<'a> {
    fn into_pop_input(self) -> G1Affine {
        hash_to_g1(self.domain, self.message)
            .expect("Hash-to-curve error, IRTF spec forbids messages longer than 2^16!")
    }
}

impl<'a> IntoPopInput<G2Affine> for Message<'a> {
    fn into_pop_input(self) -> G2Affine {
        hash_to_g2(self.domain, self.message)
            .expect("Hash-to-curve error, IRTF spec forbids messages longer than 2^16!")
    }
}

/// A client message under the default message domain.
pub fn message(message: &[u8]) -> Message<'_> {
    Message { domain: MESSAGE_DOMAIN, message }
}

/// A tweak under the default tweak domain.
pub fn tweak(tweak: &[u8]) -> Message<'_> {
    Message { domain: TWEAK_DOMAIN, message: tweak }
}
