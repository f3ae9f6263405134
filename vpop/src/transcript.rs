// Copyright (c) 2022-2023 Web 3 Foundation

//! ### Arkworks friendly Merlin transcripts for the Fiat-Shamir challenge
//!
//! The Chaum-Pedersen proof needs one challenge scalar bound to every
//! public value of the relation.  We produce it with a
//! [merlin](https://merlin.cool/) transcript: appended items are
//! serialized through Arkworks' `io::Write`, and challenges are drawn
//! through an `RngCore` adapter so `UniformRand` samples field elements
//! without bias.

use ark_std::{UniformRand, io::{self, Read, Write}};
use ark_serialize::CanonicalSerialize;

use rand_core::RngCore;


/// Fiat-Shamir transcript for the DLEQ proof.
#[derive(Clone)]
pub struct PopTranscript(merlin::Transcript);

impl PopTranscript {
    /// Begin a transcript under a protocol label.
    pub fn new(label: &'static [u8]) -> PopTranscript {
        PopTranscript(merlin::Transcript::new(label))
    }

    /// Append raw bytes.
    pub fn append_bytes(&mut self, label: &'static [u8], bytes: &[u8]) {
        self.0.append_message(label, bytes);
    }

    /// Append any item serializable by Arkworks.
    ///
    /// Points must be handed over in affine form so prover and
    /// verifier hash identical representatives.
    pub fn append<O: CanonicalSerialize + ?Sized>(&mut self, label: &'static [u8], itm: &O) {
        let mut t = TranscriptIO { label, t: &mut self.0 };
        itm.serialize_uncompressed(&mut t)
            .expect("transcript writes are infallible");
    }

    /// Extract a challenge samplable by Arkworks, like a scalar.
    pub fn challenge<T: UniformRand>(&mut self, label: &'static [u8]) -> T {
        let mut t = TranscriptIO { label, t: &mut self.0 };
        <T as UniformRand>::rand(&mut t)
    }
}


/// Arkworks reader and writer over a Merlin transcript.
///
/// Arkworks de/serializes via its own `io::{Read,Write}` traits, while
/// merlin wants a label on every append; `TranscriptIO` carries the
/// label across the adaptation.
struct TranscriptIO<'a> {
    label: &'static [u8],
    t: &'a mut merlin::Transcript,
}

impl<'a> Write for TranscriptIO<'a> {
    /// Writes append messages to the transcript.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.t.append_message(self.label, buf);
        Ok(buf.len())
    }

    /// We inherently flush in write, so this does nothing.
    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

impl<'a> Read for TranscriptIO<'a> {
    /// Reads request challenge bytes from the transcript.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.t.challenge_bytes(self.label, buf);
        Ok(buf.len())
    }
}

impl<'a> RngCore for TranscriptIO<'a> {
    fn next_u32(&mut self) -> u32 {
        let mut b = [0u8; 4];
        self.read(&mut b).expect("Infallible, qed");
        u32::from_le_bytes(b)
    }
    fn next_u64(&mut self) -> u64 {
        let mut b = [0u8; 8];
        self.read(&mut b).expect("Infallible, qed");
        u64::from_le_bytes(b)
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.read(dest).expect("Infallible, qed");
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
