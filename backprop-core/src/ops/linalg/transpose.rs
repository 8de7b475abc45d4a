use crate::error::BackpropError;
use crate::graph::OpKind;
use crate::ops::push_positional;
use crate::payload::Payload;
use crate::var::Var;

/// Matrix transpose `Z = Xᵀ`.
///
/// Backward: the contribution to X is the transposed downstream gradient,
/// `Gᵀ`. Scalars have no transpose here; that is a `ShapeMismatch`.
pub fn transpose_op(a: Var<'_>) -> Result<Var<'_>, BackpropError> {
    let av = a.value();
    let m = av.matrix().ok_or_else(|| BackpropError::ShapeMismatch {
        lhs: av.shape(),
        rhs: vec![],
        operation: "transpose".to_string(),
    })?;
    Ok(push_positional(
        a,
        None,
        OpKind::Transpose,
        Payload::Matrix(m.transpose()),
    ))
}

#[cfg(test)]
#[path = "transpose_test.rs"]
mod tests;
