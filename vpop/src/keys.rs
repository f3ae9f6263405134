// Copyright (c) 2022-2023 Web 3 Foundation

//! ### Key material and derivation
//!
//! The server holds a long-lived master secret key and, per ensemble
//! selector, a table state.  Both feed a keyed hash that yields the
//! per-ensemble evaluation key `kw`, a scalar.  Derivation is pure, so
//! identical inputs always reproduce identical keys; the whole
//! protocol's determinism rests on this.

use ark_ff::PrimeField;
use ark_std::vec::Vec;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use rand_core::{RngCore, CryptoRng};

use zeroize::Zeroize;


/// Domain separation tag for evaluation key derivation.
pub const KW_TAG: &[u8] = b"TAG_PYTHIA_KW";

/// Byte length of freshly sampled table states.
pub const STATE_LENGTH: usize = 32;


/// Operator-managed master secret key.  Never transmitted.
#[derive(Clone)]
pub struct MasterSecretKey(Vec<u8>);

impl MasterSecretKey {
    pub fn new(bytes: Vec<u8>) -> MasterSecretKey { MasterSecretKey(bytes) }
}

impl From<&[u8]> for MasterSecretKey {
    fn from(bytes: &[u8]) -> MasterSecretKey { MasterSecretKey(bytes.to_vec()) }
}

impl Zeroize for MasterSecretKey {
    fn zeroize(&mut self) { self.0.zeroize(); }
}
impl Drop for MasterSecretKey {
    fn drop(&mut self) { self.zeroize() }
}


/// Per-selector secret state from the server's key table.
///
/// Each state value corresponds to one key epoch of its selector;
/// replacing the state rotates the derived key.
#[derive(Clone)]
pub struct TweakState(Vec<u8>);

impl TweakState {
    pub fn new(bytes: Vec<u8>) -> TweakState { TweakState(bytes) }

    /// Sample a fresh table state, as done when installing or rotating
    /// a selector.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> TweakState {
        let mut bytes = Vec::new();
        bytes.resize(STATE_LENGTH, 0u8);
        rng.fill_bytes(&mut bytes);
        TweakState(bytes)
    }
}

impl From<&[u8]> for TweakState {
    fn from(bytes: &[u8]) -> TweakState { TweakState(bytes.to_vec()) }
}

impl Zeroize for TweakState {
    fn zeroize(&mut self) { self.0.zeroize(); }
}
impl Drop for TweakState {
    fn drop(&mut self) { self.zeroize() }
}


/// One coherent key epoch: a selector together with the master secret
/// key and table state under which it evaluates.
///
/// Evaluation and rotation take a whole epoch by reference, so a call
/// never mixes pre- and post-rotation secrets.
#[derive(Clone, Copy)]
pub struct KeyEpoch<'a> {
    /// Public ensemble key selector, like a webserver identifier.
    pub selector: &'a [u8],
    pub msk: &'a MasterSecretKey,
    pub state: &'a TweakState,
}

impl<'a> KeyEpoch<'a> {
    /// Derive the evaluation key `kw` bound to this epoch.
    ///
    /// HMAC-SHA256 keyed by the master secret key over the tagged
    /// concatenation of state and selector, interpreted big-endian and
    /// reduced into the scalar field.
    pub fn derive_key<F: PrimeField>(&self) -> DerivedKey<F> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.msk.0)
            .expect("HMAC accepts keys of any length");
        mac.update(KW_TAG);
        mac.update(&self.state.0);
        mac.update(self.selector);
        let digest = mac.finalize().into_bytes();
        DerivedKey(F::from_be_bytes_mod_order(digest.as_slice()))
    }
}


/// Per-ensemble evaluation key, a scalar.
///
/// Stays inside the server process; only its commitments `g1 * kw` and
/// `gt * kw` ever leave.
#[derive(Clone)]
pub struct DerivedKey<F: PrimeField>(pub(crate) F);

impl<F: PrimeField> Zeroize for DerivedKey<F> {
    fn zeroize(&mut self) { self.0.zeroize(); }
}
impl<F: PrimeField> Drop for DerivedKey<F> {
    fn drop(&mut self) { self.zeroize() }
}
