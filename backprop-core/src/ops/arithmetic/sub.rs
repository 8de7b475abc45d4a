use crate::error::BackpropError;
use crate::graph::OpKind;
use crate::ops::{check_same_graph, push_binary};
use crate::payload::Payload;
use crate::var::Var;

/// Elementwise subtraction `a - b`. Locals: (1, -1).
pub fn sub_op<'g>(a: Var<'g>, b: Var<'g>) -> Result<Var<'g>, BackpropError> {
    check_same_graph("sub", a, b)?;
    let (av, bv) = (a.value(), b.value());
    let payload = Payload::zip("sub", &av, &bv, |x, y| x - y)?;
    Ok(push_binary(
        a,
        b,
        OpKind::Sub,
        payload,
        Payload::Scalar(1.0),
        Payload::Scalar(-1.0),
    ))
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
