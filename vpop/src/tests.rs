use std::collections::HashSet;

use ark_ec::{AffineRepr, CurveGroup, Group, pairing::{Pairing, PairingOutput}};
use ark_serialize::{CanonicalSerialize, CanonicalDeserialize, Compress};
use ark_std::UniformRand;

use rand_core::OsRng;

use crate::{
    blind::{blind, deblind},
    bls12_381::{self, Bls12_381, Fr, G1Affine, message, tweak},
    error::PopError,
    keys::{KeyEpoch, MasterSecretKey, TweakState},
    store::{KeyStore, MemoryKeyStore},
    wrap::{self, Wrapped},
    BlindedMessage, ClientRequest, FinalOutput, Intermediate, Proof, ServerResponse, Vpop,
};

type P = Bls12_381;

const W: &[u8] = b"server-1";
const W_PRIME: &[u8] = b"server-2";
const T: &[u8] = b"user-42";
const M: &[u8] = b"correct horse battery staple";

const MSK_BYTES: &[u8; 32] = b"0123456789abcdef0123456789abcdef";
const S_BYTES: &[u8; 16] = b"fedcba9876543210";
const S_PRIME_BYTES: &[u8; 16] = b"0123456789ABCDEF";

fn pop() -> Vpop<P> {
    Vpop::new()
}

fn compressed_bytes<O: CanonicalSerialize>(itm: &O) -> Vec<u8> {
    let mut bytes = Vec::new();
    itm.serialize_compressed(&mut bytes).unwrap();
    bytes
}

/// Full protocol pass without proof checking.
fn simple_proto(pop: &Vpop<P>, epoch: KeyEpoch, t: &[u8], m: &[u8]) -> FinalOutput<P> {
    let (r_inv, x) = blind::<P, _, _>(message(m), &mut OsRng).unwrap();
    let evaluation = pop.evaluate(epoch, tweak(t), &x).unwrap();
    deblind(&r_inv, &evaluation.y)
}

#[test]
fn derive_key_deterministic() {
    let msk = MasterSecretKey::from(&MSK_BYTES[..]);
    let s = TweakState::from(&S_BYTES[..]);
    let epoch = KeyEpoch { selector: W, msk: &msk, state: &s };

    let kw1 = epoch.derive_key::<Fr>();
    let kw2 = epoch.derive_key::<Fr>();
    assert_eq!(kw1.0, kw2.0);

    let other_selector = KeyEpoch { selector: W_PRIME, msk: &msk, state: &s };
    assert_ne!(kw1.0, other_selector.derive_key::<Fr>().0);

    let s_prime = TweakState::from(&S_PRIME_BYTES[..]);
    let other_state = KeyEpoch { selector: W, msk: &msk, state: &s_prime };
    assert_ne!(kw1.0, other_state.derive_key::<Fr>().0);

    let msk_prime = MasterSecretKey::from(&S_PRIME_BYTES[..]);
    let other_msk = KeyEpoch { selector: W, msk: &msk_prime, state: &s };
    assert_ne!(kw1.0, other_msk.derive_key::<Fr>().0);
}

#[test]
fn blinding_unlinkable() {
    // Hash the message once; the hundred blindings of it must all
    // differ, which also exercises the fresh sampling per call.
    let h = bls12_381::hash_to_g1(bls12_381::MESSAGE_DOMAIN, M).unwrap();
    let mut seen = HashSet::new();
    for _ in 0..100 {
        let (_, x) = blind::<P, _, _>(h, &mut OsRng).unwrap();
        assert!(seen.insert(compressed_bytes(&x)));
    }
}

#[test]
fn deblinding_invariant_under_fresh_blindings() {
    let pop = pop();
    let msk = MasterSecretKey::from(&MSK_BYTES[..]);
    let s = TweakState::from(&S_BYTES[..]);
    let epoch = KeyEpoch { selector: W, msk: &msk, state: &s };

    let h = bls12_381::hash_to_g1(bls12_381::MESSAGE_DOMAIN, M).unwrap();
    let t_tilde = bls12_381::hash_to_g2(bls12_381::TWEAK_DOMAIN, T).unwrap();

    let reference = pop.evaluate_direct(epoch, h, t_tilde);
    for _ in 0..100 {
        let (r_inv, x) = blind::<P, _, _>(h, &mut OsRng).unwrap();
        let evaluation = pop.evaluate(epoch, t_tilde, &x).unwrap();
        assert_eq!(deblind(&r_inv, &evaluation.y), reference);
    }
}

#[test]
fn protocol_stable_with_proofs() {
    let pop = pop();
    let msk = MasterSecretKey::from(&MSK_BYTES[..]);
    let s = TweakState::from(&S_BYTES[..]);
    let epoch = KeyEpoch { selector: W, msk: &msk, state: &s };

    let proto = || {
        let (r_inv, x) = blind::<P, _, _>(message(M), &mut OsRng).unwrap();
        let evaluation = pop.evaluate(epoch, tweak(T), &x).unwrap();
        let pi = pop.prove(&x, &evaluation, &mut OsRng);
        pop.verify(&x, tweak(T), &evaluation.y, &pi).unwrap();
        (deblind(&r_inv, &evaluation.y), pi.p)
    };

    let (z0, p0) = proto();
    for _ in 0..9 {
        let (z, p) = proto();
        assert_eq!(z, z0);
        assert_eq!(compressed_bytes(&z), compressed_bytes(&z0));
        assert_eq!(p, p0);
    }
}

#[test]
fn proof_completeness() {
    let pop = pop();
    let msk = MasterSecretKey::from(&MSK_BYTES[..]);
    let s = TweakState::from(&S_BYTES[..]);
    let epoch = KeyEpoch { selector: W, msk: &msk, state: &s };

    let (_, x) = blind::<P, _, _>(message(M), &mut OsRng).unwrap();
    let evaluation = pop.evaluate(epoch, tweak(T), &x).unwrap();
    let pi = pop.prove(&x, &evaluation, &mut OsRng);

    assert!(pop.verify(&x, tweak(T), &evaluation.y, &pi).is_ok());
    assert!(pop.check(&x, tweak(T), &evaluation.y, &pi));
}

#[test]
fn proof_soundness_per_position() {
    let pop = pop();
    let msk = MasterSecretKey::from(&MSK_BYTES[..]);
    let s = TweakState::from(&S_BYTES[..]);
    let epoch = KeyEpoch { selector: W, msk: &msk, state: &s };

    let (_, x) = blind::<P, _, _>(message(M), &mut OsRng).unwrap();
    let evaluation = pop.evaluate(epoch, tweak(T), &x).unwrap();
    let pi = pop.prove(&x, &evaluation, &mut OsRng);
    let y = &evaluation.y;

    let rand_g1 = || bls12_381::G1Projective::rand(&mut OsRng).into_affine();
    let rand_gt = || PairingOutput::<P>::generator() * Fr::rand(&mut OsRng);

    // Each wire position replaced by an independently random value of
    // the same type must break verification.
    let bad_x = BlindedMessage::<P>(rand_g1());
    assert!(pop.verify(&bad_x, tweak(T), y, &pi).is_err());

    let bad_y = Intermediate::<P>(rand_gt());
    assert!(pop.verify(&x, tweak(T), &bad_y, &pi).is_err());

    let bad_p = Proof { p: rand_g1(), ..pi.clone() };
    assert!(pop.verify(&x, tweak(T), y, &bad_p).is_err());

    let bad_c = Proof { c: Fr::rand(&mut OsRng), ..pi.clone() };
    assert!(pop.verify(&x, tweak(T), y, &bad_c).is_err());

    let bad_u = Proof { u: Fr::rand(&mut OsRng), ..pi.clone() };
    assert!(pop.verify(&x, tweak(T), y, &bad_u).is_err());

    // The untampered proof still passes.
    assert!(pop.verify(&x, tweak(T), y, &pi).is_ok());
}

#[test]
fn verify_rejects_substituted_tweak() {
    let pop = pop();
    let msk = MasterSecretKey::from(&MSK_BYTES[..]);
    let s = TweakState::from(&S_BYTES[..]);
    let epoch = KeyEpoch { selector: W, msk: &msk, state: &s };

    let (_, x) = blind::<P, _, _>(message(M), &mut OsRng).unwrap();
    let evaluation = pop.evaluate(epoch, tweak(T), &x).unwrap();
    let pi = pop.prove(&x, &evaluation, &mut OsRng);

    assert!(matches!(
        pop.verify(&x, tweak(b"user-43"), &evaluation.y, &pi),
        Err(PopError::ProofInvalid)
    ));
}

#[test]
fn evaluate_rejects_identity_message() {
    let pop = pop();
    let msk = MasterSecretKey::from(&MSK_BYTES[..]);
    let s = TweakState::from(&S_BYTES[..]);
    let epoch = KeyEpoch { selector: W, msk: &msk, state: &s };

    let x = BlindedMessage::<P>(G1Affine::zero());
    assert!(matches!(
        pop.evaluate(epoch, tweak(T), &x),
        Err(PopError::Domain)
    ));
}

#[test]
fn rotation_migrates_outputs() {
    let pop = pop();
    let msk = MasterSecretKey::from(&MSK_BYTES[..]);
    let s = TweakState::from(&S_BYTES[..]);
    let s_prime = TweakState::from(&S_PRIME_BYTES[..]);

    let old = KeyEpoch { selector: W, msk: &msk, state: &s };
    let new = KeyEpoch { selector: W_PRIME, msk: &msk, state: &s_prime };

    let z = simple_proto(&pop, old, T, M);
    let token = pop.update_token(old, new).unwrap();
    let z_updated = pop.update(&z, &token);

    let z_rerun = simple_proto(&pop, new, T, M);
    assert_eq!(z_updated, z_rerun);

    // The published commitment matches the incoming key.
    let kw_new = new.derive_key::<Fr>();
    assert_eq!(token.commitment, pop.target_base * kw_new.0);
}

#[test]
fn rotation_across_master_keys() {
    let pop = pop();
    let msk = MasterSecretKey::from(&MSK_BYTES[..]);
    let msk_prime = MasterSecretKey::from(&b"another-master-secret-key-32-byte"[..32]);
    let s = TweakState::from(&S_BYTES[..]);
    let s_prime = TweakState::from(&S_PRIME_BYTES[..]);

    let old = KeyEpoch { selector: W, msk: &msk, state: &s };
    let new = KeyEpoch { selector: W, msk: &msk_prime, state: &s_prime };

    let z = simple_proto(&pop, old, T, M);
    let token = pop.update_token(old, new).unwrap();
    assert_eq!(pop.update(&z, &token), simple_proto(&pop, new, T, M));
}

#[test]
fn direct_evaluation_matches_blinded_chain() {
    let pop = pop();
    let msk = MasterSecretKey::from(&MSK_BYTES[..]);
    let s = TweakState::from(&S_BYTES[..]);
    let epoch = KeyEpoch { selector: W, msk: &msk, state: &s };

    let direct = pop.evaluate_direct(epoch, message(M), tweak(T));
    assert_eq!(direct, simple_proto(&pop, epoch, T, M));
}

#[test]
fn group_laws_hold() {
    let mut rng = OsRng;
    let a = Fr::rand(&mut rng);
    let b = Fr::rand(&mut rng);

    let p = bls12_381::G1Projective::rand(&mut rng);
    let q = bls12_381::G1Projective::rand(&mut rng);
    let r = bls12_381::G1Projective::rand(&mut rng);
    assert_eq!(p + q, q + p);
    assert_eq!((p + q) + r, p + (q + r));

    let p2 = bls12_381::G2Projective::rand(&mut rng);
    let q2 = bls12_381::G2Projective::rand(&mut rng);
    assert_eq!(p2 + q2, q2 + p2);

    let gt = PairingOutput::<P>::generator();
    let y1 = gt * a;
    let y2 = gt * b;
    assert_eq!(y1 + y2, y2 + y1);
    assert_eq!(gt * (a + b), y1 + y2);
    assert_eq!(y1 * b, gt * (a * b));

    // Bilinearity ties the three groups together.
    let g1 = bls12_381::G1Affine::generator();
    let g2 = bls12_381::G2Affine::generator();
    assert_eq!(P::pairing(g1 * a, g2 * b), gt * (a * b));
}

#[test]
fn wrap_round_trips_in_both_modes() {
    let mut rng = OsRng;
    let g1 = bls12_381::G1Projective::rand(&mut rng).into_affine();
    let g2 = bls12_381::G2Projective::rand(&mut rng).into_affine();
    let gt = PairingOutput::<P>::generator() * Fr::rand(&mut rng);
    let scalar = Fr::rand(&mut rng);
    let raw = b"opaque transport payload".to_vec();

    for mode in [Compress::Yes, Compress::No] {
        let s = Wrapped::<P>::G1(g1).wrap(mode).unwrap();
        assert_eq!(wrap::unwrap_g1::<P>(&s, mode).unwrap(), g1);

        let s = Wrapped::<P>::G2(g2).wrap(mode).unwrap();
        assert_eq!(wrap::unwrap_g2::<P>(&s, mode).unwrap(), g2);

        let s = Wrapped::<P>::Gt(gt).wrap(mode).unwrap();
        assert_eq!(wrap::unwrap_gt::<P>(&s, mode).unwrap(), gt);

        let s = Wrapped::<P>::Scalar(scalar).wrap(mode).unwrap();
        assert_eq!(wrap::unwrap_scalar::<P>(&s, mode).unwrap(), scalar);

        let s = Wrapped::<P>::Raw(raw.clone()).wrap(mode).unwrap();
        assert_eq!(wrap::unwrap_raw(&s).unwrap(), raw);
    }

    // Compression halves the point encoding.
    let long = Wrapped::<P>::G1(g1).wrap(Compress::No).unwrap();
    let short = Wrapped::<P>::G1(g1).wrap(Compress::Yes).unwrap();
    assert!(short.len() < long.len());
}

#[test]
fn unwrap_rejects_malformed_input() {
    assert!(wrap::unwrap_g1::<P>("not base64!!", Compress::Yes).is_err());

    let garbage = Wrapped::<P>::Raw(vec![0xAB; 7]).wrap(Compress::Yes).unwrap();
    assert!(wrap::unwrap_g1::<P>(&garbage, Compress::Yes).is_err());

    // A valid G1 encoding is not a valid G2 encoding.
    let g1 = Wrapped::<P>::G1(bls12_381::G1Affine::generator()).wrap(Compress::Yes).unwrap();
    assert!(wrap::unwrap_g2::<P>(&g1, Compress::Yes).is_err());
}

#[test]
fn protocol_messages_round_trip() {
    let pop = pop();
    let msk = MasterSecretKey::from(&MSK_BYTES[..]);
    let s = TweakState::from(&S_BYTES[..]);
    let epoch = KeyEpoch { selector: W, msk: &msk, state: &s };

    let (_, x) = blind::<P, _, _>(message(M), &mut OsRng).unwrap();
    let request = ClientRequest::<P> { selector: W.to_vec(), tweak: T.to_vec(), x };

    let bytes = compressed_bytes(&request);
    let decoded = ClientRequest::<P>::deserialize_compressed(bytes.as_slice()).unwrap();
    assert_eq!(decoded, request);

    let evaluation = pop.evaluate(epoch, tweak(T), &decoded.x).unwrap();
    let pi = pop.prove(&decoded.x, &evaluation, &mut OsRng);
    let response = ServerResponse::<P> { y: evaluation.y.clone(), proof: pi };

    let bytes = compressed_bytes(&response);
    let decoded = ServerResponse::<P>::deserialize_compressed(bytes.as_slice()).unwrap();
    assert_eq!(decoded, response);
    assert!(pop.verify(&request.x, tweak(T), &decoded.y, &decoded.proof).is_ok());
}

#[test]
fn key_store_resolves_and_rotates() {
    let pop = pop();
    let msk = MasterSecretKey::from(&MSK_BYTES[..]);
    let mut store = MemoryKeyStore::new();

    assert!(matches!(store.lookup(W), Err(PopError::UnknownSelector)));

    store.install(W, TweakState::from(&S_BYTES[..]));
    let s = store.lookup(W).unwrap();
    let old = KeyEpoch { selector: W, msk: &msk, state: &s };
    let z = simple_proto(&pop, old, T, M);

    // Rotate the selector's state and migrate the issued output.
    let s_prime = TweakState::random(&mut OsRng);
    let new = KeyEpoch { selector: W, msk: &msk, state: &s_prime };
    let token = pop.update_token(old, new).unwrap();
    store.install(W, s_prime);

    let s_current = store.lookup(W).unwrap();
    let current = KeyEpoch { selector: W, msk: &msk, state: &s_current };
    assert_eq!(pop.update(&z, &token), simple_proto(&pop, current, T, M));
}

#[test]
fn seeded_rng_reproduces_blinding() {
    use rand_core::SeedableRng;

    let h = bls12_381::hash_to_g1(bls12_381::MESSAGE_DOMAIN, M).unwrap();
    let mut rng1 = rand_chacha::ChaCha20Rng::from_seed([42u8; 32]);
    let mut rng2 = rand_chacha::ChaCha20Rng::from_seed([42u8; 32]);

    let (r1, x1) = blind::<P, _, _>(h, &mut rng1).unwrap();
    let (r2, x2) = blind::<P, _, _>(h, &mut rng2).unwrap();
    assert_eq!(x1, x2);
    assert_eq!(r1.0, r2.0);
}
