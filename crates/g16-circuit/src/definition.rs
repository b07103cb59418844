//! Circuit definitions: declared variables plus equality assertions.
//!
//! A [`Circuit`] is plain data. It is built once with [`CircuitBuilder`] and
//! never mutated afterwards; [`Circuit::validate`] decides whether the
//! relation can be lowered into rank-1 constraints.

use std::collections::HashSet;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use ark_ff::PrimeField;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("variable name must not be empty")]
    EmptyName,

    #[error("variable `{0}` declared more than once")]
    DuplicateVariable(String),

    #[error("assertion references undeclared variable `{0}`")]
    UndeclaredVariable(String),

    #[error("operation `{0}` cannot be expressed as rank-1 constraints")]
    UnsupportedOperation(&'static str),

    #[error("circuit `{0}` declares no assertions")]
    NoAssertions(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub visibility: Visibility,
}

impl Variable {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// Arithmetic expression over declared variables.
///
/// `Div` can be written down but is rejected by [`Circuit::validate`]: the
/// constraint builder only lowers addition, subtraction and multiplication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Var(String),
    Const(u64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn constant(value: u64) -> Self {
        Expr::Const(value)
    }

    /// Evaluate natively. Returns `None` if a variable has no value or a
    /// division by zero occurs.
    pub fn evaluate<F, L>(&self, lookup: &L) -> Option<F>
    where
        F: PrimeField,
        L: Fn(&str) -> Option<F>,
    {
        match self {
            Expr::Var(name) => lookup(name),
            Expr::Const(c) => Some(F::from(*c)),
            Expr::Add(a, b) => Some(a.evaluate(lookup)? + b.evaluate(lookup)?),
            Expr::Sub(a, b) => Some(a.evaluate(lookup)? - b.evaluate(lookup)?),
            Expr::Mul(a, b) => Some(a.evaluate(lookup)? * b.evaluate(lookup)?),
            Expr::Div(a, b) => {
                let denominator = b.evaluate(lookup)?.inverse()?;
                Some(a.evaluate(lookup)? * denominator)
            }
        }
    }

    fn check(&self, declared: &HashSet<&str>) -> Result<(), CircuitError> {
        match self {
            Expr::Var(name) if declared.contains(name.as_str()) => Ok(()),
            Expr::Var(name) => Err(CircuitError::UndeclaredVariable(name.clone())),
            Expr::Const(_) => Ok(()),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) => {
                a.check(declared)?;
                b.check(declared)
            }
            Expr::Div(..) => Err(CircuitError::UnsupportedOperation("division")),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Const(c) => write!(f, "{c}"),
            Expr::Add(a, b) => write!(f, "({a} + {b})"),
            Expr::Sub(a, b) => write!(f, "({a} - {b})"),
            Expr::Mul(a, b) => write!(f, "{a} * {b}"),
            Expr::Div(a, b) => write!(f, "{a} / {b}"),
        }
    }
}

macro_rules! impl_expr_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::$variant(Box::new(self), Box::new(rhs))
            }
        }
    };
}

impl_expr_op!(Add, add, Add);
impl_expr_op!(Sub, sub, Sub);
impl_expr_op!(Mul, mul, Mul);
impl_expr_op!(Div, div, Div);

/// `lhs == rhs`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assertion {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Assertion {
    pub fn holds<F, L>(&self, lookup: &L) -> bool
    where
        F: PrimeField,
        L: Fn(&str) -> Option<F>,
    {
        match (self.lhs.evaluate(lookup), self.rhs.evaluate(lookup)) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.lhs, self.rhs)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
    name: String,
    variables: Vec<Variable>,
    assertions: Vec<Assertion>,
}

impl Circuit {
    pub fn builder(name: impl Into<String>) -> CircuitBuilder {
        CircuitBuilder {
            name: name.into(),
            variables: Vec::new(),
            assertions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared variables in declaration order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    pub fn public_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(|v| v.is_public())
    }

    pub fn num_public(&self) -> usize {
        self.public_variables().count()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name == name)
    }

    pub fn validate(&self) -> Result<(), CircuitError> {
        let mut declared = HashSet::with_capacity(self.variables.len());
        for var in &self.variables {
            if var.name.is_empty() {
                return Err(CircuitError::EmptyName);
            }
            if !declared.insert(var.name.as_str()) {
                return Err(CircuitError::DuplicateVariable(var.name.clone()));
            }
        }

        if self.assertions.is_empty() {
            return Err(CircuitError::NoAssertions(self.name.clone()));
        }

        for assertion in &self.assertions {
            assertion.lhs.check(&declared)?;
            assertion.rhs.check(&declared)?;
        }
        Ok(())
    }
}

pub struct CircuitBuilder {
    name: String,
    variables: Vec<Variable>,
    assertions: Vec<Assertion>,
}

impl CircuitBuilder {
    pub fn public(self, name: impl Into<String>) -> Self {
        self.declare(name.into(), Visibility::Public)
    }

    pub fn private(self, name: impl Into<String>) -> Self {
        self.declare(name.into(), Visibility::Private)
    }

    pub fn assert_eq(mut self, lhs: Expr, rhs: Expr) -> Self {
        self.assertions.push(Assertion { lhs, rhs });
        self
    }

    pub fn build(self) -> Circuit {
        Circuit {
            name: self.name,
            variables: self.variables,
            assertions: self.assertions,
        }
    }

    fn declare(mut self, name: String, visibility: Visibility) -> Self {
        self.variables.push(Variable { name, visibility });
        self
    }
}
