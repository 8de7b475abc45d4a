use crate::error::BackpropError;
use crate::graph::OpKind;
use crate::ops::{check_same_graph, push_binary};
use crate::payload::Payload;
use crate::var::Var;

fn domain_error(message: String) -> BackpropError {
    BackpropError::DomainError {
        operation: "pow".to_string(),
        message,
    }
}

/// Elementwise power `a ^ b`.
///
/// Domain policy (construction-time, fail fast):
/// - negative base with a non-integer exponent would be complex;
/// - zero base with a negative exponent would be infinite.
///
/// Local derivative table, applied per element:
/// - w.r.t. the base: `b * a^(b-1)`, taken as 0 when `b == 0` (covers the
///   `x^0` case without evaluating `a^-1` at a zero base) and when `a == 0`
///   with `b < 1` (the one-sided derivative of e.g. `sqrt` at 0 is infinite;
///   the cell freezes a finite 0 rather than an `inf` that would propagate);
/// - w.r.t. the exponent: `a^b * ln(a)` when `a > 0`, taken as 0 otherwise
///   (covers `0^x` and, through `ln(1) = 0`, `1^x`; a negative integer-power
///   base has no real exponent derivative and also freezes to 0).
pub fn pow_op<'g>(a: Var<'g>, b: Var<'g>) -> Result<Var<'g>, BackpropError> {
    check_same_graph("pow", a, b)?;
    let (av, bv) = (a.value(), b.value());
    let payload = Payload::try_zip("pow", &av, &bv, |x, y| {
        if x < 0.0 && y.fract() != 0.0 {
            Err(domain_error(format!(
                "{x}^{y} is not a real number (negative base, fractional exponent)"
            )))
        } else if x == 0.0 && y < 0.0 {
            Err(domain_error(format!("0^{y} is not finite")))
        } else {
            Ok(x.powf(y))
        }
    })?;
    let local_base = Payload::zip("pow", &av, &bv, |x, y| {
        if y == 0.0 || (x == 0.0 && y < 1.0) {
            0.0
        } else {
            y * x.powf(y - 1.0)
        }
    })?;
    let local_exp = Payload::zip("pow", &av, &payload, |x, out| {
        if x > 0.0 {
            out * x.ln()
        } else {
            0.0
        }
    })?;
    Ok(push_binary(a, b, OpKind::Pow, payload, local_base, local_exp))
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;
