// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! # g16-circuit
//!
//! Declarative arithmetic circuits over a prime field and their compilation
//! into arkworks rank-1 constraint systems.
//!
//! ## Crate layout
//!
//! | Module | Purpose |
//! |---|---|
//! | [`definition`] | `Circuit`, `Expr`, builder and validation |
//! | [`field`] | Decimal ↔ field element conversion (no reduction) |
//! | [`witness`] | `Assignment` → `Witness` derivation |
//! | [`synth`] | `ConstraintSynthesizer` adapter |
//! | [`compile`] | `CompiledCircuit`: R1CS shape, digest, satisfaction check |
//! | [`square`] | The demonstration circuit `X * X == Y` |
//!
//! ## Example
//!
//! ```rust,no_run
//! use g16_circuit::{compile, derive_witness, square_assignment, square_circuit};
//! use ark_bn254::Fr;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let compiled = compile::<Fr>(&square_circuit())?;
//! let witness = derive_witness::<Fr>(compiled.circuit(), &square_assignment(3, 9))?;
//! compiled.check_witness(&witness)?;
//! assert_eq!(compiled.num_public_inputs(), 2);
//! # Ok(())
//! # }
//! ```

pub mod compile;
pub mod definition;
pub mod field;
pub mod square;
pub mod synth;
pub mod witness;

pub use compile::{
    compile, CircuitDigest, CompileError, CompiledCircuit, R1csShape, SatisfactionError,
};
pub use definition::{Assertion, Circuit, CircuitBuilder, CircuitError, Expr, Variable, Visibility};
pub use field::{field_to_decimal, parse_field_element, FieldElementError};
pub use square::{constraint_count, square_assignment, square_circuit};
pub use synth::Synthesizer;
pub use witness::{derive_witness, Assignment, PublicWitness, Witness, WitnessError};
