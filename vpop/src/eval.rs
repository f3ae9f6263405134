// Copyright (c) 2022-2023 Web 3 Foundation

//! ### Server-side evaluation
//!
//! The server derives `kw` for the requested epoch, hashes the tweak
//! onto G2, and pairs the scaled blinded message against it,
//! `y = e(x * kw, H2(t))`.  The derived key and hashed tweak are
//! returned alongside `y` because proof generation on the same process
//! needs them; neither may cross the network boundary.

use ark_ec::{AffineRepr, pairing::{Pairing, PairingOutput}};
use ark_serialize::{CanonicalSerialize, CanonicalDeserialize};

use crate::{
    Vpop, IntoPopInput,
    blind::{BlindedMessage, FinalOutput},
    error::{PopError, PopResult},
    keys::{KeyEpoch, DerivedKey},
};


/// Tweak hashed onto G2, `t~ = H2(t)`.
#[derive(Debug, Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct TweakHash<P: Pairing>(pub P::G2Affine);

impl<P: Pairing> PartialEq for TweakHash<P> {
    fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}
impl<P: Pairing> Eq for TweakHash<P> {}

impl<P: Pairing> IntoPopInput<P::G2Affine> for TweakHash<P> {
    #[inline(always)]
    fn into_pop_input(self) -> P::G2Affine { self.0 }
}


/// Blinded intermediate result `y = e(x * kw, t~)`, an element of Gt.
#[derive(Debug, Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct Intermediate<P: Pairing>(pub PairingOutput<P>);

impl<P: Pairing> PartialEq for Intermediate<P> {
    fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}
impl<P: Pairing> Eq for Intermediate<P> {}


/// One server evaluation: the intermediate result plus the proof
/// material bound to it.
///
/// Per-request and immutable; only `y` ever leaves the server, inside
/// a [`crate::ServerResponse`].
pub struct Evaluation<P: Pairing> {
    pub y: Intermediate<P>,
    pub(crate) kw: DerivedKey<P::ScalarField>,
    pub t_tilde: TweakHash<P>,
}

impl<P: Pairing> Vpop<P> {
    /// Evaluate the PRF over a blinded message.
    ///
    /// Rejects a degenerate blinded message before touching any key
    /// material; an identity `x` would pin `y` to the identity and
    /// leak nothing but still signals a misbehaving client.
    pub fn evaluate<'a, T>(
        &self,
        epoch: KeyEpoch<'a>,
        tweak: T,
        x: &BlindedMessage<P>,
    ) -> PopResult<Evaluation<P>>
    where T: IntoPopInput<P::G2Affine>
    {
        if x.0.is_zero() { return Err(PopError::Domain); }

        let kw = epoch.derive_key::<P::ScalarField>();
        let t_tilde = TweakHash(tweak.into_pop_input());
        let y = P::pairing(x.0 * kw.0, t_tilde.0);
        Ok(Evaluation { y: Intermediate(y), kw, t_tilde })
    }

    /// Evaluate the PRF directly over an unblinded message.
    ///
    /// Computes `e(H1(m) * kw, H2(t))` in one shot, skipping the
    /// oblivious exchange.  Callers co-located with the key material
    /// use this; it must agree exactly with the blinded chain.
    pub fn evaluate_direct<'a, M, T>(
        &self,
        epoch: KeyEpoch<'a>,
        message: M,
        tweak: T,
    ) -> FinalOutput<P>
    where M: IntoPopInput<P::G1Affine>, T: IntoPopInput<P::G2Affine>
    {
        let kw = epoch.derive_key::<P::ScalarField>();
        let h = message.into_pop_input();
        FinalOutput(P::pairing(h * kw.0, tweak.into_pop_input()))
    }
}
