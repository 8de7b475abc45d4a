use crate::error::BackpropError;
use crate::graph::OpKind;
use crate::ops::{check_same_graph, push_binary};
use crate::payload::Payload;
use crate::var::Var;

/// Elementwise multiplication `a * b`.
///
/// Locals are the *other* operand's payload, cloned at construction time, so
/// later gradient mutation on either operand never changes this node's rule.
pub fn mul_op<'g>(a: Var<'g>, b: Var<'g>) -> Result<Var<'g>, BackpropError> {
    check_same_graph("mul", a, b)?;
    let (av, bv) = (a.value(), b.value());
    let payload = Payload::zip("mul", &av, &bv, |x, y| x * y)?;
    Ok(push_binary(a, b, OpKind::Mul, payload, bv, av))
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
