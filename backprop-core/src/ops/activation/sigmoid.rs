use crate::graph::OpKind;
use crate::ops::push_unary;
use crate::var::Var;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Elementwise logistic sigmoid `σ(a) = 1 / (1 + e^-a)`.
///
/// The local is expressed through the node's *own* payload,
/// `σ(a) * (1 - σ(a))`, avoiding a second evaluation of the sigmoid. New
/// elementary functions should follow the same shape: a forward formula plus
/// a local written in terms of the already-computed result where possible.
pub fn sigmoid_op(a: Var<'_>) -> Var<'_> {
    let payload = a.value().map(sigmoid);
    let local = payload.map(|s| s * (1.0 - s));
    push_unary(a, OpKind::Sigmoid, payload, local)
}

#[cfg(test)]
#[path = "sigmoid_test.rs"]
mod tests;
