use crate::error::BackpropError;
use crate::graph::OpKind;
use crate::ops::{check_same_graph, push_binary};
use crate::payload::Payload;
use crate::var::Var;

/// Elementwise division `a / b`.
///
/// Policy: fail fast. Any zero element in the divisor is a `DivisionByZero`
/// error at construction, for scalars and matrices alike, rather than letting
/// IEEE infinities leak into payloads and local derivatives.
///
/// Locals: (1/b, -a/b²).
pub fn div_op<'g>(a: Var<'g>, b: Var<'g>) -> Result<Var<'g>, BackpropError> {
    check_same_graph("div", a, b)?;
    let (av, bv) = (a.value(), b.value());
    let payload = Payload::try_zip("div", &av, &bv, |x, y| {
        if y == 0.0 {
            Err(BackpropError::DivisionByZero {
                operation: "div".to_string(),
            })
        } else {
            Ok(x / y)
        }
    })?;
    // Divisor is known non-zero element-wise past this point.
    let local_lhs = bv.map(|y| 1.0 / y);
    let local_rhs = Payload::zip("div", &av, &bv, |x, y| -x / (y * y))?;
    Ok(push_binary(a, b, OpKind::Div, payload, local_lhs, local_rhs))
}

#[cfg(test)]
#[path = "div_test.rs"]
mod tests;
