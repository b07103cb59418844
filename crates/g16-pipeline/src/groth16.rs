// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Groth16 over an arkworks pairing engine.

use std::marker::PhantomData;

use ark_bls12_381::Bls12_381;
use ark_bn254::Bn254;
use ark_ec::pairing::Pairing;
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, ProvingKey, VerifyingKey};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};
use g16_circuit::{CircuitDigest, CompiledCircuit, PublicWitness, Synthesizer, Witness};
use tracing::debug;

use crate::backend::ProvingBackend;
use crate::config::Curve;
use crate::error::{ProveError, SetupError, VerifyError};

/// Pairing engines the pipeline can be configured with.
pub trait CurveEngine: Pairing {
    const CURVE: Curve;
}

impl CurveEngine for Bn254 {
    const CURVE: Curve = Curve::Bn254;
}

impl CurveEngine for Bls12_381 {
    const CURVE: Curve = Curve::Bls12_381;
}

pub struct Groth16ProvingKey<E: Pairing> {
    digest: CircuitDigest,
    key: ProvingKey<E>,
}

impl<E: Pairing> Groth16ProvingKey<E> {
    /// Digest of the constraint system this key was generated for
    pub fn digest(&self) -> CircuitDigest {
        self.digest
    }

    pub fn key(&self) -> &ProvingKey<E> {
        &self.key
    }
}

/// Verifying key plus its prepared (pairing-ready) form.
pub struct Groth16VerifyingKey<E: Pairing> {
    digest: Option<CircuitDigest>,
    key: VerifyingKey<E>,
    prepared: PreparedVerifyingKey<E>,
}

impl<E: Pairing> Groth16VerifyingKey<E> {
    /// Wrap a key obtained outside of setup (e.g. from an artifact).
    pub fn new(key: VerifyingKey<E>) -> Self {
        let prepared = PreparedVerifyingKey::from(key.clone());
        Self {
            digest: None,
            key,
            prepared,
        }
    }

    /// `None` for keys that did not come from a local setup
    pub fn digest(&self) -> Option<CircuitDigest> {
        self.digest
    }

    pub fn key(&self) -> &VerifyingKey<E> {
        &self.key
    }

    pub fn num_public_inputs(&self) -> usize {
        self.key.gamma_abc_g1.len().saturating_sub(1)
    }
}

pub struct Groth16Backend<E: Pairing> {
    _engine: PhantomData<E>,
}

impl<E: Pairing> Groth16Backend<E> {
    pub fn new() -> Self {
        Self {
            _engine: PhantomData,
        }
    }
}

impl<E: Pairing> Default for Groth16Backend<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CurveEngine> ProvingBackend for Groth16Backend<E> {
    type Field = E::ScalarField;
    type ProvingKey = Groth16ProvingKey<E>;
    type VerifyingKey = Groth16VerifyingKey<E>;
    type Proof = Proof<E>;

    fn name(&self) -> &'static str {
        match E::CURVE {
            Curve::Bn254 => "groth16-bn254",
            Curve::Bls12_381 => "groth16-bls12-381",
        }
    }

    fn setup<R: RngCore + CryptoRng>(
        &self,
        compiled: &CompiledCircuit<Self::Field>,
        rng: &mut R,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), SetupError> {
        let synth = Synthesizer::for_setup(compiled.circuit());
        let (pk, vk) = Groth16::<E>::circuit_specific_setup(synth, rng)?;
        debug!(public_inputs = vk.gamma_abc_g1.len().saturating_sub(1), "groth16 keys generated");

        let digest = compiled.digest();
        let mut vk = Groth16VerifyingKey::new(vk);
        vk.digest = Some(digest);
        Ok((Groth16ProvingKey { digest, key: pk }, vk))
    }

    fn prove<R: RngCore + CryptoRng>(
        &self,
        compiled: &CompiledCircuit<Self::Field>,
        pk: &Self::ProvingKey,
        witness: &Witness<Self::Field>,
        rng: &mut R,
    ) -> Result<Self::Proof, ProveError> {
        if pk.digest != compiled.digest() {
            return Err(ProveError::KeyMismatch {
                expected: pk.digest,
                actual: compiled.digest(),
            });
        }
        // groth16 would happily emit a proof that fails verification
        compiled.check_witness(witness)?;

        let synth = Synthesizer::for_proving(compiled.circuit(), witness);
        Groth16::<E>::prove(&pk.key, synth, rng).map_err(ProveError::Backend)
    }

    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public: &PublicWitness<Self::Field>,
    ) -> Result<(), VerifyError> {
        let expected = vk.num_public_inputs();
        if public.len() != expected {
            return Err(VerifyError::PublicInputCount {
                expected,
                actual: public.len(),
            });
        }
        match Groth16::<E>::verify_with_processed_vk(&vk.prepared, public.as_slice(), proof) {
            Ok(true) => Ok(()),
            Ok(false) => Err(VerifyError::Rejected),
            Err(e) => Err(VerifyError::Backend(e)),
        }
    }
}
