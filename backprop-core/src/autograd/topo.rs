use crate::graph::{Graph, NodeId};
use log::trace;

/// Builds a reverse post-order of the DAG reachable from `root`: a node is
/// appended only after every operand has been appended, and a visited bitset
/// over the arena makes membership idempotent, so a diamond-shared node
/// appears exactly once. Reversing the returned list yields the backward-pass
/// visitation order (consumers before producers).
///
/// Iterative DFS with an explicit stack; expression depth therefore never
/// translates into call-stack depth.
pub(crate) fn reverse_post_order(graph: &Graph, root: NodeId) -> Vec<NodeId> {
    enum Frame {
        Enter(NodeId),
        Exit(NodeId),
    }

    let nodes = graph.nodes.borrow();
    let mut visited = vec![false; nodes.len()];
    let mut order = Vec::new();
    let mut stack = vec![Frame::Enter(root)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(id) => {
                if visited[id.0] {
                    trace!("topo: node {} already visited", id.0);
                    continue;
                }
                visited[id.0] = true;
                stack.push(Frame::Exit(id));
                for &operand in nodes[id.0].operands.iter().flatten() {
                    stack.push(Frame::Enter(operand));
                }
            }
            Frame::Exit(id) => {
                trace!("topo: appending node {} ({})", id.0, nodes[id.0].op);
                order.push(id);
            }
        }
    }

    order
}
