use crate::error::BackpropError;
use crate::matrix::Matrix;
use crate::payload::Payload;
use crate::var::Var;
use std::cell::RefCell;
use std::fmt;

/// Stable index of a node in its [`Graph`] arena.
///
/// Operand edges always point at smaller indices than the node that holds
/// them, because an operation can only reference nodes that already exist.
/// The graph is therefore a DAG by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Tag identifying which operator produced a node.
///
/// The tag is read in exactly one place, the backward pass, where it selects
/// the propagation rule: pointwise ops push their frozen local derivatives,
/// `MatMul` and `Transpose` apply positional adjoint rules, and `Leaf` ends
/// the recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Leaf,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
    Abs,
    Sigmoid,
    Log,
    MatMul,
    Transpose,
}

impl OpKind {
    /// Short display symbol, used by `Debug`/`Display` rendering of nodes.
    pub fn symbol(self) -> &'static str {
        match self {
            OpKind::Leaf => "leaf",
            OpKind::Add => "+",
            OpKind::Sub => "-",
            OpKind::Mul => "*",
            OpKind::Div => "/",
            OpKind::Pow => "^",
            OpKind::Neg => "neg",
            OpKind::Abs => "| |",
            OpKind::Sigmoid => "sigmoid",
            OpKind::Log => "ln",
            OpKind::MatMul => "@",
            OpKind::Transpose => "T",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single differentiable value in the arena.
///
/// `payload`, `op`, `operands` and `locals` are write-once; only `grad`
/// mutates after construction, and only through `backward` (accumulate) and
/// `reset` (zero).
pub(crate) struct Node {
    pub(crate) payload: Payload,
    pub(crate) grad: Payload,
    pub(crate) op: OpKind,
    pub(crate) operands: [Option<NodeId>; 2],
    /// Frozen local partial derivative of `payload` w.r.t. each operand,
    /// evaluated from the operand payloads at construction time. `None` for
    /// leaves and for the positional ops (`MatMul`, `Transpose`), whose
    /// backward rule is computed from the stored operand payloads instead.
    pub(crate) locals: [Option<Payload>; 2],
}

impl Node {
    pub(crate) fn new(
        op: OpKind,
        payload: Payload,
        operands: [Option<NodeId>; 2],
        locals: [Option<Payload>; 2],
    ) -> Self {
        let grad = payload.zeros_like();
        Node {
            payload,
            grad,
            op,
            operands,
            locals,
        }
    }

    pub(crate) fn leaf(payload: Payload) -> Self {
        Node::new(OpKind::Leaf, payload, [None, None], [None, None])
    }
}

/// Arena holding every node of one computation DAG.
///
/// Construction happens inline as operators execute; nodes are appended and
/// never removed, so a [`NodeId`] stays valid for the graph's lifetime. The
/// engine is single-threaded: expression handles borrow the graph, and the
/// interior `RefCell` confines all mutation to one thread.
#[derive(Default)]
pub struct Graph {
    pub(crate) nodes: RefCell<Vec<Node>>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    /// Number of nodes recorded so far.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Declares a scalar leaf variable.
    pub fn scalar(&self, value: f64) -> Var<'_> {
        self.leaf(Payload::Scalar(value))
    }

    /// Declares a matrix leaf variable from a flat row-major buffer.
    pub fn matrix(
        &self,
        data: Vec<f64>,
        rows: usize,
        cols: usize,
    ) -> Result<Var<'_>, BackpropError> {
        let m = Matrix::from_vec(data, rows, cols)?;
        Ok(self.leaf(Payload::Matrix(m)))
    }

    /// Declares a leaf from an already-shaped payload.
    pub fn leaf(&self, payload: Payload) -> Var<'_> {
        let id = self.push(Node::leaf(payload));
        Var { graph: self, id }
    }

    pub(crate) fn push(&self, node: Node) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(node);
        id
    }
}
