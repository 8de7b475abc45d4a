use crate::graph::OpKind;
use crate::ops::push_unary;
use crate::payload::Payload;
use crate::var::Var;

/// Unary negation `-a`. Local: -1. Cannot fail.
pub fn neg_op(a: Var<'_>) -> Var<'_> {
    let payload = a.value().map(|x| -x);
    push_unary(a, OpKind::Neg, payload, Payload::Scalar(-1.0))
}

#[cfg(test)]
#[path = "neg_test.rs"]
mod tests;
