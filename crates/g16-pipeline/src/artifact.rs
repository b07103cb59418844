// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Exportable proof bundles.
//!
//! An artifact carries everything a third party needs to check a proof:
//!
//! ```json
//! {
//!   "protocol": "groth16",
//!   "curve": "bn254",
//!   "proof": "<hex>",
//!   "verifying_key": "<hex>",
//!   "public_inputs": ["3", "9"]
//! }
//! ```
//!
//! Proof and key are arkworks canonical compressed encodings, hex encoded.
//! Public inputs are decimal strings and must be below the scalar modulus.

use std::fs;
use std::path::{Path, PathBuf};

use ark_bls12_381::Bls12_381;
use ark_bn254::Bn254;
use ark_groth16::{Proof, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use g16_circuit::{parse_field_element, FieldElementError, PublicWitness};
use serde::{Deserialize, Serialize};

use crate::backend::ProvingBackend;
use crate::config::Curve;
use crate::error::VerifyError;
use crate::groth16::{CurveEngine, Groth16Backend, Groth16VerifyingKey};

pub const PROTOCOL: &str = "groth16";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("unsupported protocol `{0}`")]
    UnsupportedProtocol(String),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("canonical encoding: {0}")]
    Encoding(#[from] SerializationError),

    #[error("public input: {0}")]
    PublicInput(#[from] FieldElementError),

    #[error("invalid artifact JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Verify(#[from] VerifyError),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofArtifact {
    pub protocol: String,
    pub curve: Curve,
    pub proof: String,
    pub verifying_key: String,
    pub public_inputs: Vec<String>,
}

fn to_hex<T: CanonicalSerialize>(value: &T) -> Result<String, SerializationError> {
    let mut bytes = Vec::with_capacity(value.compressed_size());
    value.serialize_compressed(&mut bytes)?;
    Ok(hex::encode(bytes))
}

fn from_hex<T: CanonicalDeserialize>(hex_str: &str) -> Result<T, ArtifactError> {
    let bytes = hex::decode(hex_str.trim().trim_start_matches("0x"))?;
    Ok(T::deserialize_compressed(bytes.as_slice())?)
}

impl ProofArtifact {
    pub fn from_groth16<E: CurveEngine>(
        vk: &Groth16VerifyingKey<E>,
        proof: &Proof<E>,
        public: &PublicWitness<E::ScalarField>,
    ) -> Result<Self, ArtifactError> {
        Ok(Self {
            protocol: PROTOCOL.to_string(),
            curve: E::CURVE,
            proof: to_hex(proof)?,
            verifying_key: to_hex(vk.key())?,
            public_inputs: public.to_decimal(),
        })
    }

    pub fn to_json(&self) -> Result<String, ArtifactError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let json = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Decode and check the proof against the bundled key and inputs.
    pub fn verify(&self) -> Result<(), ArtifactError> {
        if self.protocol != PROTOCOL {
            return Err(ArtifactError::UnsupportedProtocol(self.protocol.clone()));
        }
        match self.curve {
            Curve::Bn254 => self.verify_on::<Bn254>(),
            Curve::Bls12_381 => self.verify_on::<Bls12_381>(),
        }
    }

    fn verify_on<E: CurveEngine>(&self) -> Result<(), ArtifactError> {
        let vk: VerifyingKey<E> = from_hex(&self.verifying_key)?;
        let proof: Proof<E> = from_hex(&self.proof)?;
        let inputs = self
            .public_inputs
            .iter()
            .map(|raw| parse_field_element::<E::ScalarField>(raw))
            .collect::<Result<Vec<_>, _>>()?;

        Groth16Backend::<E>::new().verify(
            &Groth16VerifyingKey::new(vk),
            &proof,
            &PublicWitness::new(inputs),
        )?;
        Ok(())
    }
}
