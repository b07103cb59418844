use std::collections::BTreeMap;
use std::fmt::Display;

use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::definition::Circuit;
use crate::field::{field_to_decimal, parse_field_element, FieldElementError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WitnessError {
    #[error("no value assigned to declared variable `{0}`")]
    Missing(String),

    #[error("value assigned to undeclared variable `{0}`")]
    Unknown(String),

    #[error("variable `{name}`: `{value}` is not a non-negative decimal integer")]
    Malformed { name: String, value: String },

    #[error("variable `{name}`: `{value}` is not below the field modulus")]
    OutOfField { name: String, value: String },
}

/// Concrete decimal values keyed by variable name, as supplied by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    values: BTreeMap<String, String>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Display) {
        self.values.insert(name.into(), value.to_string());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Public-variable values in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicWitness<F: PrimeField>(Vec<F>);

impl<F: PrimeField> PublicWitness<F> {
    pub fn new(values: Vec<F>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[F] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_decimal(&self) -> Vec<String> {
        self.0.iter().map(field_to_decimal).collect()
    }
}

/// Full witness (every declared variable, declaration order) together with
/// its public projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Witness<F: PrimeField> {
    full: Vec<F>,
    public: PublicWitness<F>,
}

impl<F: PrimeField> Witness<F> {
    pub fn full(&self) -> &[F] {
        &self.full
    }

    pub fn public(&self) -> &PublicWitness<F> {
        &self.public
    }

    pub fn len(&self) -> usize {
        self.full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }
}

/// Check an assignment against the circuit's declarations and lift it into
/// the field. Satisfaction of the relation is not checked here.
pub fn derive_witness<F: PrimeField>(
    circuit: &Circuit,
    assignment: &Assignment,
) -> Result<Witness<F>, WitnessError> {
    for (name, _) in assignment.iter() {
        if circuit.position(name).is_none() {
            return Err(WitnessError::Unknown(name.to_string()));
        }
    }

    let mut full = Vec::with_capacity(circuit.variables().len());
    let mut public = Vec::with_capacity(circuit.num_public());
    for var in circuit.variables() {
        let raw = assignment
            .get(&var.name)
            .ok_or_else(|| WitnessError::Missing(var.name.clone()))?;
        let value = parse_field_element::<F>(raw).map_err(|e| match e {
            FieldElementError::Malformed(value) => WitnessError::Malformed {
                name: var.name.clone(),
                value,
            },
            FieldElementError::OutOfField(value) => WitnessError::OutOfField {
                name: var.name.clone(),
                value,
            },
        })?;
        full.push(value);
        if var.is_public() {
            public.push(value);
        }
    }

    Ok(Witness {
        full,
        public: PublicWitness(public),
    })
}
