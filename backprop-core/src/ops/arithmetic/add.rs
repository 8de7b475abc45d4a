use crate::error::BackpropError;
use crate::graph::OpKind;
use crate::ops::{check_same_graph, push_binary};
use crate::payload::Payload;
use crate::var::Var;

/// Elementwise addition `a + b`.
///
/// Local derivatives: 1 with respect to both operands, so the backward pass
/// passes the downstream gradient through unchanged (reduced to the operand
/// shape where a scalar was replicated).
pub fn add_op<'g>(a: Var<'g>, b: Var<'g>) -> Result<Var<'g>, BackpropError> {
    check_same_graph("add", a, b)?;
    let (av, bv) = (a.value(), b.value());
    let payload = Payload::zip("add", &av, &bv, |x, y| x + y)?;
    Ok(push_binary(
        a,
        b,
        OpKind::Add,
        payload,
        Payload::Scalar(1.0),
        Payload::Scalar(1.0),
    ))
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
