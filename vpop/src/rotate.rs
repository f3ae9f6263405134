// Copyright (c) 2022-2023 Web 3 Foundation

//! ### Key rotation via homomorphic update tokens
//!
//! Replacing a selector's table state, or the master secret key,
//! changes `kw` to `kw'`.  The scalar ratio `delta = kw' / kw` carries
//! already-issued outputs across the rotation, `z' = z^delta`, with no
//! access to the original message or blinding factor.  The token is as
//! sensitive as the keys it relates; apply it, publish the new
//! commitment, then discard it.

use ark_ec::pairing::{Pairing, PairingOutput};

use ark_ff::Field;

use zeroize::Zeroize;

use crate::{
    Vpop,
    blind::FinalOutput,
    error::{PopError, PopResult},
    keys::KeyEpoch,
};


/// Update token relating two key epochs.
pub struct UpdateToken<P: Pairing> {
    /// Ratio `kw' * kw^-1`, the migration exponent.
    pub(crate) delta: P::ScalarField,
    /// New public key commitment `gt * kw'`, published so clients can
    /// keep verifying after the rotation.
    pub commitment: PairingOutput<P>,
}

impl<P: Pairing> Zeroize for UpdateToken<P> {
    fn zeroize(&mut self) { self.delta.zeroize(); }
}
impl<P: Pairing> Drop for UpdateToken<P> {
    fn drop(&mut self) { self.zeroize() }
}


impl<P: Pairing> Vpop<P> {
    /// Compute the token migrating outputs from one epoch to another.
    ///
    /// Fails with `NotInvertible` iff the outgoing key is zero, which
    /// a sound derivation produces only with negligible probability.
    pub fn update_token<'a>(
        &self,
        from: KeyEpoch<'a>,
        to: KeyEpoch<'a>,
    ) -> PopResult<UpdateToken<P>> {
        let kw = from.derive_key::<P::ScalarField>();
        let kw_new = to.derive_key::<P::ScalarField>();

        let kw_inv = kw.0.inverse().ok_or(PopError::NotInvertible)?;
        let delta = kw_new.0 * kw_inv;
        let commitment = self.target_base * kw_new.0;
        Ok(UpdateToken { delta, commitment })
    }

    /// Migrate a PRF output to the token's target epoch.
    ///
    /// `update(z_under_kw, delta)` equals the output the target epoch
    /// would have produced for the same message and tweak.
    pub fn update(&self, z: &FinalOutput<P>, token: &UpdateToken<P>) -> FinalOutput<P> {
        FinalOutput(z.0 * token.delta)
    }
}
