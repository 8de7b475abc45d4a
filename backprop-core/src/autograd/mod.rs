//! Backward engine: reverse post-order traversal of the arena, gradient
//! seeding and chain-rule accumulation, plus recursive gradient reset and a
//! finite-difference gradient checker for tests.

pub(crate) mod backward;
pub mod grad_check;
pub(crate) mod topo;

pub use grad_check::{check_grad, GradCheckError};
