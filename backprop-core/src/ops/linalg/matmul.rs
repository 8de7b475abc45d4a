use crate::error::BackpropError;
use crate::graph::OpKind;
use crate::ops::{check_same_graph, push_positional};
use crate::var::Var;

/// Matrix multiplication `C = A @ B`. A: [M, K], B: [K, N] -> C: [M, N].
///
/// Both operands must be matrices with conformable inner dimensions. Unlike
/// the pointwise ops, the backward rule is not an elementwise local: given a
/// downstream gradient `G` of C's shape, the contribution to A is `G @ Bᵀ`
/// and to B is `Aᵀ @ G`. That rule is attached to the node through its op
/// tag and derived from the stored operand payloads at backward time.
pub fn matmul_op<'g>(a: Var<'g>, b: Var<'g>) -> Result<Var<'g>, BackpropError> {
    check_same_graph("matmul", a, b)?;
    let (av, bv) = (a.value(), b.value());
    let (ma, mb) = match (av.matrix(), bv.matrix()) {
        (Some(ma), Some(mb)) => (ma, mb),
        _ => {
            return Err(BackpropError::ShapeMismatch {
                lhs: av.shape(),
                rhs: bv.shape(),
                operation: "matmul".to_string(),
            })
        }
    };
    let payload = ma.matmul(mb)?;
    Ok(push_positional(
        a,
        Some(b.id()),
        OpKind::MatMul,
        crate::payload::Payload::Matrix(payload),
    ))
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
