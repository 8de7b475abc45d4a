use crate::error::BackpropError;
use crate::graph::OpKind;
use crate::ops::push_unary;
use crate::var::Var;

/// Elementwise natural logarithm `ln(a)`.
///
/// Any non-positive element is a `DomainError` at construction; the frozen
/// local is `1/a`, well-defined once the domain check has passed.
pub fn ln_op(a: Var<'_>) -> Result<Var<'_>, BackpropError> {
    let av = a.value();
    let payload = av.try_map(|x| {
        if x <= 0.0 {
            Err(BackpropError::DomainError {
                operation: "ln".to_string(),
                message: format!("ln({x}) is undefined"),
            })
        } else {
            Ok(x.ln())
        }
    })?;
    let local = av.map(|x| 1.0 / x);
    Ok(push_unary(a, OpKind::Log, payload, local))
}

#[cfg(test)]
#[path = "ln_test.rs"]
mod tests;
