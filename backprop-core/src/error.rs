use thiserror::Error;

/// Custom error type for the backprop engine.
///
/// Every failure is a construction-time failure: it is reported at the point
/// the offending operator is applied, before any node is allocated, so a
/// failed operation never leaves a partially built node reachable from the
/// graph. The backward pass itself cannot fail on a well-formed graph.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq + Clone for easier testing
pub enum BackpropError {
    #[error("Shape mismatch in {operation}: {lhs:?} and {rhs:?}")]
    ShapeMismatch {
        lhs: Vec<usize>,
        rhs: Vec<usize>,
        operation: String,
    },

    #[error("Domain error in {operation}: {message}")]
    DomainError { operation: String, message: String },

    #[error("Division by zero in {operation}")]
    DivisionByZero { operation: String },

    #[error("Matrix creation error: data length {len} does not match {rows}x{cols}")]
    InvalidDimensions {
        len: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Operands of {operation} belong to different graphs")]
    GraphMismatch { operation: String },
}
