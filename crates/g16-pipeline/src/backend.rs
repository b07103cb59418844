//! The proof-system seam.
//!
//! The lifecycle only talks to a [`ProvingBackend`]; it never touches curve
//! arithmetic directly. [`Groth16Backend`](crate::groth16::Groth16Backend) is
//! the real implementation, [`MockBackend`](crate::mock::MockBackend) a
//! transparent stand-in for fast tests.

use ark_ff::PrimeField;
use ark_std::rand::{CryptoRng, RngCore};
use g16_circuit::{compile, Circuit, CompileError, CompiledCircuit, PublicWitness, Witness};

use crate::error::{ProveError, SetupError, VerifyError};

pub trait ProvingBackend {
    type Field: PrimeField;
    type ProvingKey: Send + Sync;
    type VerifyingKey: Send + Sync;
    type Proof: Send + Sync;

    fn name(&self) -> &'static str;

    fn compile(&self, circuit: &Circuit) -> Result<CompiledCircuit<Self::Field>, CompileError> {
        compile::<Self::Field>(circuit)
    }

    /// One-time key generation. `rng` is the setup's toxic waste and must
    /// not outlive the call.
    fn setup<R: RngCore + CryptoRng>(
        &self,
        compiled: &CompiledCircuit<Self::Field>,
        rng: &mut R,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), SetupError>;

    /// Implementations must reject keys from another constraint system and
    /// unsatisfying witnesses before producing anything.
    fn prove<R: RngCore + CryptoRng>(
        &self,
        compiled: &CompiledCircuit<Self::Field>,
        pk: &Self::ProvingKey,
        witness: &Witness<Self::Field>,
        rng: &mut R,
    ) -> Result<Self::Proof, ProveError>;

    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public: &PublicWitness<Self::Field>,
    ) -> Result<(), VerifyError>;
}
