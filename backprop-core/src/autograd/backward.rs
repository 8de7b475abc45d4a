use crate::autograd::topo::reverse_post_order;
use crate::graph::{Graph, NodeId, OpKind};
use crate::payload::Payload;
use log::{debug, trace};

/// Runs the backward pass with `root` as the start node, accumulating
/// `∂root/∂v` into the `grad` of every node `v` reachable from it.
///
/// The start node's own gradient is force-seeded to ones of its shape; the
/// seed is the only overwrite in the pass, every other write is `+=`. Calling
/// this twice without a reset therefore accumulates gradients across calls.
pub(crate) fn run_backward(graph: &Graph, root: NodeId) {
    let order = reverse_post_order(graph, root);
    let mut nodes = graph.nodes.borrow_mut();

    let seed = nodes[root.0].payload.ones_like();
    nodes[root.0].grad = seed;
    debug!("backward: seeded node {} over {} nodes", root.0, order.len());

    for &id in order.iter().rev() {
        let (op, operands, grad) = {
            let node = &nodes[id.0];
            (node.op, node.operands, node.grad.clone())
        };
        trace!("backward: visiting node {} ({})", id.0, op);
        match op {
            OpKind::Leaf => {}
            OpKind::MatMul => {
                let (Some(lhs), Some(rhs)) = (operands[0], operands[1]) else {
                    unreachable!("matmul node without two operands");
                };
                let g = expect_matrix(&grad);
                let lhs_payload = expect_matrix(&nodes[lhs.0].payload).clone();
                let rhs_payload = expect_matrix(&nodes[rhs.0].payload).clone();
                // dL/dA = G @ Bᵀ, dL/dB = Aᵀ @ G; conformable by construction.
                let grad_lhs = g
                    .matmul(&rhs_payload.transpose())
                    .expect("matmul backward grad_lhs");
                let grad_rhs = lhs_payload
                    .transpose()
                    .matmul(g)
                    .expect("matmul backward grad_rhs");
                nodes[lhs.0].grad.accumulate(&Payload::Matrix(grad_lhs));
                nodes[rhs.0].grad.accumulate(&Payload::Matrix(grad_rhs));
            }
            OpKind::Transpose => {
                let Some(input) = operands[0] else {
                    unreachable!("transpose node without operand");
                };
                let g = expect_matrix(&grad);
                nodes[input.0]
                    .grad
                    .accumulate(&Payload::Matrix(g.transpose()));
            }
            _ => {
                // Pointwise rule: push the accumulated gradient through the
                // frozen locals, reducing where a scalar was replicated.
                let locals = nodes[id.0].locals.clone();
                for (slot, operand) in operands.iter().enumerate() {
                    let (Some(operand), Some(local)) = (operand, &locals[slot]) else {
                        continue;
                    };
                    let contribution = local.pointwise_mul(&grad);
                    let reduced = contribution.reduce_like(&nodes[operand.0].payload);
                    nodes[operand.0].grad.accumulate(&reduced);
                }
            }
        }
    }
}

/// Recursively zeroes `grad` on every node reachable from `start`, including
/// `start` itself. No ordering requirement; plain DFS. Shared nodes are
/// zeroed unconditionally, even if another expression still holds gradient
/// state in them.
pub(crate) fn run_reset(graph: &Graph, start: NodeId) {
    let mut nodes = graph.nodes.borrow_mut();
    let mut visited = vec![false; nodes.len()];
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if visited[id.0] {
            continue;
        }
        visited[id.0] = true;
        trace!("reset: zeroing node {}", id.0);
        nodes[id.0].grad = nodes[id.0].payload.zeros_like();
        for &operand in nodes[id.0].operands.iter().flatten() {
            stack.push(operand);
        }
    }
}

fn expect_matrix(payload: &Payload) -> &crate::matrix::Matrix {
    match payload {
        Payload::Matrix(m) => m,
        Payload::Scalar(_) => unreachable!("positional op carries a matrix payload"),
    }
}
