// Copyright (c) 2022-2023 Web 3 Foundation

//! ### Chaum-Pedersen DLEQ proofs across G1 and Gt
//!
//! The server proves knowledge of one exponent `kw` satisfying both
//! `p = g1 * kw` and `y = beta^kw` for `beta = e(x, t~)`, the two
//! groups linked by the pairing.  The interactive challenge is replaced
//! by a transcript hash over every public value of the relation, so a
//! proof binds to its exact request.

use ark_ec::{AffineRepr, CurveGroup, pairing::{Pairing, PairingOutput}};
use ark_serialize::{CanonicalSerialize, CanonicalDeserialize};
use ark_std::UniformRand;

use rand_core::{RngCore, CryptoRng};

use zeroize::Zeroize;

use crate::{
    Vpop, IntoPopInput, PopTranscript,
    blind::BlindedMessage,
    eval::{Evaluation, Intermediate},
    error::{PopError, PopResult},
};


/// Non-interactive proof `(p, c, u)`: key commitment, challenge, and
/// response.
#[derive(Debug, Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<P: Pairing> {
    /// Commitment `g1 * kw` to the evaluation key.
    pub p: P::G1Affine,
    /// Fiat-Shamir challenge.
    pub c: P::ScalarField,
    /// Response `v - c * kw`.
    pub u: P::ScalarField,
}

impl<P: Pairing> PartialEq for Proof<P> {
    fn eq(&self, other: &Self) -> bool {
        self.p == other.p && self.c == other.c && self.u == other.u
    }
}
impl<P: Pairing> Eq for Proof<P> {}


impl<P: Pairing> Vpop<P> {
    /// Challenge over the public relation values.
    ///
    /// Witness commitments arrive in affine form so prover and
    /// verifier hash identical representatives.
    fn challenge(
        &self,
        p: &P::G1Affine,
        beta: &PairingOutput<P>,
        y: &PairingOutput<P>,
        t1: &P::G1Affine,
        t2: &PairingOutput<P>,
    ) -> P::ScalarField {
        let mut t = PopTranscript::new(b"PythiaPOP");
        t.append(b"KeyingBase", &self.keying_base);
        t.append(b"KeyCommitment", p);
        t.append(b"Beta", beta);
        t.append(b"Eval", y);
        t.append(b"WitnessG1", t1);
        t.append(b"WitnessGt", t2);
        t.challenge(b"PopChallenge")
    }

    /// Prove an evaluation correct.
    ///
    /// The nonce `v` must be sampled fresh on every call; reusing one
    /// across proofs reveals `kw`.
    pub fn prove<R: RngCore + CryptoRng>(
        &self,
        x: &BlindedMessage<P>,
        evaluation: &Evaluation<P>,
        rng: &mut R,
    ) -> Proof<P> {
        let beta = P::pairing(x.0, evaluation.t_tilde.0);
        let p = (self.keying_base * evaluation.kw.0).into_affine();

        let mut v = <P::ScalarField as UniformRand>::rand(rng);
        let t1 = (self.keying_base * v).into_affine();
        let t2 = beta * v;

        let c = self.challenge(&p, &beta, &evaluation.y.0, &t1, &t2);
        let u = v - c * evaluation.kw.0;
        v.zeroize();
        Proof { p, c, u }
    }

    /// Verify a proof against the request it answered.
    ///
    /// Recomputes the witness commitments from the response,
    /// `t1' = g1*u + p*c` and `t2' = beta^u * y^c`, and accepts iff
    /// the rebuilt challenge matches.  Any honestly produced proof
    /// passes; a forgery passes with probability bounded by `1/r`
    /// plus the hash's collision probability.
    pub fn verify<T>(
        &self,
        x: &BlindedMessage<P>,
        tweak: T,
        y: &Intermediate<P>,
        proof: &Proof<P>,
    ) -> PopResult<()>
    where T: IntoPopInput<P::G2Affine>
    {
        if x.0.is_zero() || proof.p.is_zero() { return Err(PopError::Domain); }

        let beta = P::pairing(x.0, tweak.into_pop_input());
        let t1 = (self.keying_base * proof.u + proof.p * proof.c).into_affine();
        let t2 = beta * proof.u + y.0 * proof.c;

        let c = self.challenge(&proof.p, &beta, &y.0, &t1, &t2);
        if c == proof.c { Ok(()) } else { Err(PopError::ProofInvalid) }
    }

    /// Boolean-reporting variant of [`Vpop::verify`] for callers that
    /// prefer not to treat rejection as an error.
    pub fn check<T>(
        &self,
        x: &BlindedMessage<P>,
        tweak: T,
        y: &Intermediate<P>,
        proof: &Proof<P>,
    ) -> bool
    where T: IntoPopInput<P::G2Affine>
    {
        self.verify(x, tweak, y, proof).is_ok()
    }
}
