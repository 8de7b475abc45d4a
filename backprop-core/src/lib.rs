//! # backprop-core
//!
//! A reverse-mode automatic differentiation engine over scalar and 2-D
//! matrix values.
//!
//! Expressions are built with ordinary operators on [`Var`] handles; each
//! operation appends one node to a [`Graph`] arena, wiring the new node to
//! its operands together with the local derivative of the result with
//! respect to each operand, frozen from the operand values at that moment.
//! Calling [`Var::backward`] on any node seeds that node's gradient to ones
//! and walks the reachable DAG once in reverse topological order, pushing
//! gradients through the stored rules via the chain rule. Shared (diamond)
//! dependencies accumulate one contribution per downstream path.
//!
//! ```
//! use backprop_core::Graph;
//!
//! let g = Graph::new();
//! let x = g.scalar(2.0);
//! let y = g.scalar(3.0);
//! let f = (x * y).powf(2.0).unwrap();
//! f.backward();
//! assert_eq!(x.grad().scalar(), Some(36.0));
//! assert_eq!(y.grad().scalar(), Some(24.0));
//! ```
//!
//! Gradient writes are accumulations: call [`Var::reset`] between backward
//! passes that should be independent. Shape and domain violations are
//! reported when the offending operator is applied, never during backward;
//! the operator sugar panics on them, the named methods return `Result`.

pub mod autograd;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod ops;
pub mod payload;
pub mod utils;
pub mod var;

pub use error::BackpropError;
pub use graph::{Graph, NodeId, OpKind};
pub use matrix::Matrix;
pub use payload::Payload;
pub use var::Var;
