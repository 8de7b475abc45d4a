use crate::graph::OpKind;
use crate::ops::push_unary;
use crate::var::Var;

/// Elementwise absolute value `|a|`.
///
/// Local: `sign(a)`, with `sign(0)` defined as 0 (the subgradient convention
/// at the kink). Cannot fail.
pub fn abs_op(a: Var<'_>) -> Var<'_> {
    let av = a.value();
    let payload = av.map(f64::abs);
    // f64::signum(0.0) is 1.0, which is not the convention we want here.
    let local = av.map(|x| if x == 0.0 { 0.0 } else { x.signum() });
    push_unary(a, OpKind::Abs, payload, local)
}

#[cfg(test)]
#[path = "abs_test.rs"]
mod tests;
