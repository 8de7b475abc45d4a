//! Operator layer.
//!
//! Each operation lives in its own submodule and exposes a core `xxx_op`
//! function: it validates its operands, computes the forward payload, freezes
//! the local derivative(s) with respect to each operand from the operand
//! payloads as they are *now*, and appends one node to the arena. Operator
//! sugar on the expression handle delegates here.
//!
//! Submodules:
//! - [`arithmetic`]: add, sub, mul, div, pow, neg.
//! - [`math_elem`]: abs, ln.
//! - [`activation`]: sigmoid.
//! - [`linalg`]: matmul, transpose (positional adjoint rules, not pointwise).

pub mod activation;
pub mod arithmetic;
pub mod linalg;
pub mod math_elem;

use crate::error::BackpropError;
use crate::graph::{Node, NodeId, OpKind};
use crate::payload::Payload;
use crate::var::Var;

/// Rejects operand pairs drawn from two different arenas before any node ids
/// are mixed up.
pub(crate) fn check_same_graph<'g>(
    operation: &str,
    a: Var<'g>,
    b: Var<'g>,
) -> Result<(), BackpropError> {
    if std::ptr::eq(a.graph, b.graph) {
        Ok(())
    } else {
        Err(BackpropError::GraphMismatch {
            operation: operation.to_string(),
        })
    }
}

/// Wires a pointwise binary result into the arena with its frozen locals.
pub(crate) fn push_binary<'g>(
    a: Var<'g>,
    b: Var<'g>,
    op: OpKind,
    payload: Payload,
    local_lhs: Payload,
    local_rhs: Payload,
) -> Var<'g> {
    let id = a.graph.push(Node::new(
        op,
        payload,
        [Some(a.id), Some(b.id)],
        [Some(local_lhs), Some(local_rhs)],
    ));
    Var { graph: a.graph, id }
}

/// Wires a pointwise unary result into the arena with its frozen local.
pub(crate) fn push_unary<'g>(a: Var<'g>, op: OpKind, payload: Payload, local: Payload) -> Var<'g> {
    let id = a
        .graph
        .push(Node::new(op, payload, [Some(a.id), None], [Some(local), None]));
    Var { graph: a.graph, id }
}

/// Wires a positional-rule node (matmul, transpose): no frozen locals, the
/// backward pass derives the adjoint from the stored operand payloads.
pub(crate) fn push_positional<'g>(
    a: Var<'g>,
    rhs: Option<NodeId>,
    op: OpKind,
    payload: Payload,
) -> Var<'g> {
    let id = a
        .graph
        .push(Node::new(op, payload, [Some(a.id), rhs], [None, None]));
    Var { graph: a.graph, id }
}
