//! Transparent hash-commitment backend.
//!
//! Not zero-knowledge and not sound against a malicious prover. It follows
//! the same stage contract as Groth16 (key binding, satisfaction check,
//! public-input binding) so lifecycle tests run without pairings.

use std::marker::PhantomData;

use ark_ff::PrimeField;
use ark_std::rand::{CryptoRng, RngCore};
use g16_circuit::{field_to_decimal, CircuitDigest, CompiledCircuit, PublicWitness, Witness};
use sha2::{Digest, Sha256};

use crate::backend::ProvingBackend;
use crate::error::{ProveError, SetupError, VerifyError};

pub struct MockProvingKey {
    digest: CircuitDigest,
    key_id: [u8; 32],
}

#[derive(Clone)]
pub struct MockVerifyingKey {
    key_id: [u8; 32],
    num_public: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockProof([u8; 32]);

impl MockProof {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

pub struct MockBackend<F: PrimeField> {
    _field: PhantomData<F>,
}

impl<F: PrimeField> MockBackend<F> {
    pub fn new() -> Self {
        Self { _field: PhantomData }
    }
}

impl<F: PrimeField> Default for MockBackend<F> {
    fn default() -> Self {
        Self::new()
    }
}

fn commit<F: PrimeField>(key_id: &[u8; 32], public: &[F]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(key_id);
    for value in public {
        hasher.update(field_to_decimal(value).as_bytes());
        hasher.update([0u8]);
    }
    hasher.finalize().into()
}

impl<F: PrimeField> ProvingBackend for MockBackend<F> {
    type Field = F;
    type ProvingKey = MockProvingKey;
    type VerifyingKey = MockVerifyingKey;
    type Proof = MockProof;

    fn name(&self) -> &'static str {
        "mock"
    }

    fn setup<R: RngCore + CryptoRng>(
        &self,
        compiled: &CompiledCircuit<F>,
        rng: &mut R,
    ) -> Result<(MockProvingKey, MockVerifyingKey), SetupError> {
        let mut key_id = [0u8; 32];
        rng.fill_bytes(&mut key_id);
        Ok((
            MockProvingKey {
                digest: compiled.digest(),
                key_id,
            },
            MockVerifyingKey {
                key_id,
                num_public: compiled.num_public_inputs(),
            },
        ))
    }

    fn prove<R: RngCore + CryptoRng>(
        &self,
        compiled: &CompiledCircuit<F>,
        pk: &MockProvingKey,
        witness: &Witness<F>,
        _rng: &mut R,
    ) -> Result<MockProof, ProveError> {
        if pk.digest != compiled.digest() {
            return Err(ProveError::KeyMismatch {
                expected: pk.digest,
                actual: compiled.digest(),
            });
        }
        compiled.check_witness(witness)?;
        Ok(MockProof(commit(&pk.key_id, witness.public().as_slice())))
    }

    fn verify(
        &self,
        vk: &MockVerifyingKey,
        proof: &MockProof,
        public: &PublicWitness<F>,
    ) -> Result<(), VerifyError> {
        if public.len() != vk.num_public {
            return Err(VerifyError::PublicInputCount {
                expected: vk.num_public,
                actual: public.len(),
            });
        }
        if commit(&vk.key_id, public.as_slice()) != proof.0 {
            return Err(VerifyError::Rejected);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use g16_circuit::{compile, derive_witness, square_assignment, square_circuit};

    fn test_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn mock_proof_binds_key_and_public_inputs() {
        let backend = MockBackend::<Fr>::new();
        let compiled = compile::<Fr>(&square_circuit()).unwrap();
        let mut rng = test_rng();
        let (pk, vk) = backend.setup(&compiled, &mut rng).unwrap();
        let (_, other_vk) = backend.setup(&compiled, &mut rng).unwrap();

        let witness = derive_witness(compiled.circuit(), &square_assignment(3, 9)).unwrap();
        let proof = backend.prove(&compiled, &pk, &witness, &mut rng).unwrap();

        assert!(backend.verify(&vk, &proof, witness.public()).is_ok());
        assert!(matches!(
            backend.verify(&other_vk, &proof, witness.public()),
            Err(VerifyError::Rejected)
        ));
        let altered = PublicWitness::new(vec![Fr::from(3u64), Fr::from(10u64)]);
        assert!(matches!(
            backend.verify(&vk, &proof, &altered),
            Err(VerifyError::Rejected)
        ));
    }

    #[test]
    fn mock_still_checks_satisfaction() {
        let backend = MockBackend::<Fr>::new();
        let compiled = compile::<Fr>(&square_circuit()).unwrap();
        let (pk, _) = backend.setup(&compiled, &mut test_rng()).unwrap();
        let witness = derive_witness(compiled.circuit(), &square_assignment(3, 10)).unwrap();
        assert!(matches!(
            backend.prove(&compiled, &pk, &witness, &mut test_rng()),
            Err(ProveError::Unsatisfied { .. })
        ));
    }
}
