use crate::autograd::backward::{run_backward, run_reset};
use crate::error::BackpropError;
use crate::graph::{Graph, NodeId, OpKind};
use crate::ops::activation::sigmoid_op;
use crate::ops::arithmetic::{add_op, div_op, mul_op, neg_op, pow_op, sub_op};
use crate::ops::linalg::{matmul_op, transpose_op};
use crate::ops::math_elem::{abs_op, ln_op};
use crate::payload::Payload;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Lightweight handle to a node in a [`Graph`].
///
/// `Var` is `Copy`: it is a graph reference plus an index, so an expression
/// like `x * y + x` reuses `x` freely, which is precisely how shared
/// (diamond) dependencies arise. The borrow of the graph keeps the entire
/// DAG alive for as long as any handle that might be backward-traversed.
///
/// # Panics
///
/// The `std::ops` operator sugar (`+ - * /`, unary `-`) delegates to the
/// fallible `*_op` constructors and panics with the error message on shape
/// mismatches or division by zero, like the arithmetic sugar of array
/// libraries. Use the named methods ([`Var::pow`], [`Var::matmul`],
/// [`Var::ln`], ...) where a `Result` is wanted.
#[derive(Clone, Copy)]
pub struct Var<'g> {
    pub(crate) graph: &'g Graph,
    pub(crate) id: NodeId,
}

impl<'g> Var<'g> {
    /// Arena index of this node.
    pub fn id(self) -> NodeId {
        self.id
    }

    /// The node's payload, fixed at construction.
    pub fn value(self) -> Payload {
        self.graph.nodes.borrow()[self.id.0].payload.clone()
    }

    /// The node's accumulated gradient.
    pub fn grad(self) -> Payload {
        self.graph.nodes.borrow()[self.id.0].grad.clone()
    }

    /// Which operator produced this node (`OpKind::Leaf` for variables).
    pub fn op(self) -> OpKind {
        self.graph.nodes.borrow()[self.id.0].op
    }

    pub fn shape(self) -> Vec<usize> {
        self.graph.nodes.borrow()[self.id.0].payload.shape()
    }

    /// Runs the backward pass with this node as root: seeds this node's
    /// gradient to ones of its shape (an overwrite, regardless of any prior
    /// value), then pushes gradients down to every reachable node via the
    /// chain rule.
    ///
    /// Gradient writes are accumulations: a second `backward()` without an
    /// intervening [`Var::reset`] doubles leaf gradients. That is intentional
    /// accumulator semantics, not a bug.
    pub fn backward(self) {
        run_backward(self.graph, self.id);
    }

    /// Zeroes the gradient of every node reachable from this one, itself
    /// included. Shared nodes are zeroed unconditionally, even if another
    /// expression using them has not consumed its gradients yet.
    pub fn reset(self) {
        run_reset(self.graph, self.id);
    }

    /// Elementwise power with a node exponent.
    pub fn pow(self, exponent: Var<'g>) -> Result<Var<'g>, BackpropError> {
        pow_op(self, exponent)
    }

    /// Elementwise power with a constant exponent, promoted to a leaf.
    pub fn powf(self, exponent: f64) -> Result<Var<'g>, BackpropError> {
        pow_op(self, self.graph.scalar(exponent))
    }

    /// Elementwise absolute value.
    pub fn abs(self) -> Var<'g> {
        abs_op(self)
    }

    /// Elementwise logistic sigmoid.
    pub fn sigmoid(self) -> Var<'g> {
        sigmoid_op(self)
    }

    /// Elementwise natural logarithm.
    pub fn ln(self) -> Result<Var<'g>, BackpropError> {
        ln_op(self)
    }

    /// Matrix multiplication `self @ rhs`.
    pub fn matmul(self, rhs: Var<'g>) -> Result<Var<'g>, BackpropError> {
        matmul_op(self, rhs)
    }

    /// Matrix transpose.
    pub fn t(self) -> Result<Var<'g>, BackpropError> {
        transpose_op(self)
    }
}

impl fmt::Debug for Var<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Var(value={}, grad={}, op={})",
            self.value(),
            self.grad(),
            self.op()
        )
    }
}

fn expect_wired<'g>(result: Result<Var<'g>, BackpropError>) -> Var<'g> {
    match result {
        Ok(var) => var,
        Err(e) => panic!("{e}"),
    }
}

impl<'g> Add for Var<'g> {
    type Output = Var<'g>;
    fn add(self, rhs: Var<'g>) -> Var<'g> {
        expect_wired(add_op(self, rhs))
    }
}

impl<'g> Add<f64> for Var<'g> {
    type Output = Var<'g>;
    fn add(self, rhs: f64) -> Var<'g> {
        expect_wired(add_op(self, self.graph.scalar(rhs)))
    }
}

impl<'g> Add<Var<'g>> for f64 {
    type Output = Var<'g>;
    fn add(self, rhs: Var<'g>) -> Var<'g> {
        expect_wired(add_op(rhs.graph.scalar(self), rhs))
    }
}

impl<'g> Sub for Var<'g> {
    type Output = Var<'g>;
    fn sub(self, rhs: Var<'g>) -> Var<'g> {
        expect_wired(sub_op(self, rhs))
    }
}

impl<'g> Sub<f64> for Var<'g> {
    type Output = Var<'g>;
    fn sub(self, rhs: f64) -> Var<'g> {
        expect_wired(sub_op(self, self.graph.scalar(rhs)))
    }
}

impl<'g> Sub<Var<'g>> for f64 {
    type Output = Var<'g>;
    fn sub(self, rhs: Var<'g>) -> Var<'g> {
        expect_wired(sub_op(rhs.graph.scalar(self), rhs))
    }
}

impl<'g> Mul for Var<'g> {
    type Output = Var<'g>;
    fn mul(self, rhs: Var<'g>) -> Var<'g> {
        expect_wired(mul_op(self, rhs))
    }
}

impl<'g> Mul<f64> for Var<'g> {
    type Output = Var<'g>;
    fn mul(self, rhs: f64) -> Var<'g> {
        expect_wired(mul_op(self, self.graph.scalar(rhs)))
    }
}

impl<'g> Mul<Var<'g>> for f64 {
    type Output = Var<'g>;
    fn mul(self, rhs: Var<'g>) -> Var<'g> {
        expect_wired(mul_op(rhs.graph.scalar(self), rhs))
    }
}

impl<'g> Div for Var<'g> {
    type Output = Var<'g>;
    fn div(self, rhs: Var<'g>) -> Var<'g> {
        expect_wired(div_op(self, rhs))
    }
}

impl<'g> Div<f64> for Var<'g> {
    type Output = Var<'g>;
    fn div(self, rhs: f64) -> Var<'g> {
        expect_wired(div_op(self, self.graph.scalar(rhs)))
    }
}

impl<'g> Div<Var<'g>> for f64 {
    type Output = Var<'g>;
    fn div(self, rhs: Var<'g>) -> Var<'g> {
        expect_wired(div_op(rhs.graph.scalar(self), rhs))
    }
}

impl<'g> Neg for Var<'g> {
    type Output = Var<'g>;
    fn neg(self) -> Var<'g> {
        neg_op(self)
    }
}
