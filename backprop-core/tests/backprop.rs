//! End-to-end gradient scenarios exercised through the public API only.

use backprop_core::utils::testing::{check_payload_near, check_scalar_near};
use backprop_core::{BackpropError, Graph, OpKind, Payload};

#[test]
fn chain_rule_squared_product() {
    // f(x, y) = (x*y)^2 at x=2, y=3: df/dx = 36, df/dy = 24.
    let g = Graph::new();
    let x = g.scalar(2.0);
    let y = g.scalar(3.0);
    let f = (x * y).powf(2.0).unwrap();
    assert_eq!(f.value().scalar(), Some(36.0));
    f.backward();
    check_scalar_near(&x.grad(), 36.0, 1e-12);
    check_scalar_near(&y.grad(), 24.0, 1e-12);
}

#[test]
fn diamond_sharing_counts_once_per_path() {
    // a = x+1, b = 2x, c = a*b at x=2: dc/dx = 4x + 2 = 10.
    let g = Graph::new();
    let x = g.scalar(2.0);
    let c = (x + 1.0) * (x * 2.0);
    c.backward();
    check_scalar_near(&x.grad(), 10.0, 1e-12);
}

#[test]
fn triple_sharing() {
    // f(x) = x^2 + x^3 + x^4 at x=2: df/dx = 4 + 12 + 32 = 48.
    let g = Graph::new();
    let x = g.scalar(2.0);
    let f = x.powf(2.0).unwrap() + x.powf(3.0).unwrap() + x.powf(4.0).unwrap();
    f.backward();
    check_scalar_near(&x.grad(), 48.0, 1e-12);
}

#[test]
fn nested_sharing_of_intermediate() {
    // shared = x^2; f = (shared + 1) * (2 * shared) at x=2: df/dx = 8x^3 + 4x = 72.
    let g = Graph::new();
    let x = g.scalar(2.0);
    let shared = x * x;
    let f = (shared + 1.0) * (shared * 2.0);
    f.backward();
    check_scalar_near(&x.grad(), 72.0, 1e-12);
}

#[test]
fn long_chain_of_powers() {
    // f(x) = x + x^2 + x^3 + x^4 + x^5 at x=2: df/dx = 1+4+12+32+80 = 129.
    let g = Graph::new();
    let x = g.scalar(2.0);
    let mut f = x + 0.0;
    for p in 2..=5 {
        f = f + x.powf(p as f64).unwrap();
    }
    f.backward();
    check_scalar_near(&x.grad(), 129.0, 1e-12);
}

#[test]
fn backward_without_reset_accumulates() {
    // y = x^2 at x=2: first backward gives 4, second gives 8.
    let g = Graph::new();
    let x = g.scalar(2.0);
    let y = x.powf(2.0).unwrap();
    y.backward();
    check_scalar_near(&x.grad(), 4.0, 1e-12);
    y.backward();
    check_scalar_near(&x.grad(), 8.0, 1e-12);
}

#[test]
fn seed_overwrites_root_but_accumulates_elsewhere() {
    let g = Graph::new();
    let x = g.scalar(3.0);
    let y = x * 2.0;
    y.backward();
    y.backward();
    // y's own grad is re-seeded to 1 on each call, never 2.
    check_scalar_near(&y.grad(), 1.0, 1e-12);
    check_scalar_near(&x.grad(), 4.0, 1e-12);
}

#[test]
fn reset_propagates_to_whole_subgraph() {
    let g = Graph::new();
    let x = g.scalar(2.0);
    let y = g.scalar(3.0);
    let z = x * y;
    let f = z.powf(2.0).unwrap();
    f.backward();
    assert_ne!(x.grad().scalar(), Some(0.0));
    f.reset();
    for var in [x, y, z, f] {
        check_scalar_near(&var.grad(), 0.0, 1e-12);
    }
}

#[test]
fn backward_after_reset_is_uncontaminated() {
    // y = x^2, backward, reset the leaf, then z = x^3 over the same leaf.
    let g = Graph::new();
    let x = g.scalar(4.0);
    let y = x.powf(2.0).unwrap();
    y.backward();
    x.reset();
    check_scalar_near(&x.grad(), 0.0, 1e-12);
    let z = x.powf(3.0).unwrap();
    z.backward();
    check_scalar_near(&x.grad(), 48.0, 1e-12);
}

#[test]
fn backward_from_interior_node() {
    // Backward can start anywhere; the start node is the root of that call.
    let g = Graph::new();
    let x = g.scalar(2.0);
    let z = x * 3.0;
    let _f = z.powf(2.0).unwrap();
    z.backward();
    check_scalar_near(&z.grad(), 1.0, 1e-12);
    check_scalar_near(&x.grad(), 3.0, 1e-12);
}

#[test]
fn reflected_operators_match_promoted_leaves() {
    let g1 = Graph::new();
    let x1 = g1.scalar(3.0);
    let lhs_const = 5.0 + x1;
    lhs_const.backward();

    let g2 = Graph::new();
    let x2 = g2.scalar(3.0);
    let five = g2.scalar(5.0);
    let promoted = five + x2;
    promoted.backward();

    assert_eq!(lhs_const.value(), promoted.value());
    assert_eq!(x1.grad(), x2.grad());
    assert_eq!(lhs_const.op(), OpKind::Add);
}

#[test]
fn reverse_operations() {
    let g = Graph::new();

    let x = g.scalar(3.0);
    (10.0 - x).backward();
    check_scalar_near(&x.grad(), -1.0, 1e-12);

    let y = g.scalar(2.0);
    (12.0 / y).backward();
    check_scalar_near(&y.grad(), -3.0, 1e-12);

    let z = g.scalar(3.0);
    let two_pow_z = g.scalar(2.0).pow(z).unwrap();
    two_pow_z.backward();
    check_scalar_near(&z.grad(), 8.0 * 2.0_f64.ln(), 1e-9);

    let w = g.scalar(2.0);
    (w * 3.0 + 5.0 * w).backward();
    check_scalar_near(&w.grad(), 8.0, 1e-12);
}

#[test]
fn power_edge_case_table() {
    // x^0, 0^x and 1^x all have zero derivative w.r.t. the tracked x.
    let g = Graph::new();

    let a = g.scalar(7.0);
    a.powf(0.0).unwrap().backward();
    check_scalar_near(&a.grad(), 0.0, 1e-12);

    let b = g.scalar(2.0);
    g.scalar(0.0).pow(b).unwrap().backward();
    check_scalar_near(&b.grad(), 0.0, 1e-12);

    let c = g.scalar(3.0);
    g.scalar(1.0).pow(c).unwrap().backward();
    check_scalar_near(&c.grad(), 0.0, 1e-12);
}

#[test]
fn sigmoid_expressions() {
    let sigmoid = |x: f64| 1.0 / (1.0 + (-x).exp());

    // f(x) = sigmoid(x) + sigmoid(2x) at x=1.
    let g = Graph::new();
    let x = g.scalar(1.0);
    let f = x.sigmoid() + (x * 2.0).sigmoid();
    f.backward();
    let s1 = sigmoid(1.0);
    let s2 = sigmoid(2.0);
    check_scalar_near(&x.grad(), s1 * (1.0 - s1) + 2.0 * s2 * (1.0 - s2), 1e-12);

    // f(x) = x * sigmoid(x) at x=2.
    let g = Graph::new();
    let y = g.scalar(2.0);
    (y * y.sigmoid()).backward();
    let s = sigmoid(2.0);
    check_scalar_near(&y.grad(), s + 2.0 * s * (1.0 - s), 1e-12);
}

#[test]
fn abs_times_self() {
    // f(x) = x * |x| is x^2 for positive x and -x^2 for negative x; both
    // give df/dx = 2|x| = 4 at x = ±2.
    for input in [2.0, -2.0] {
        let g = Graph::new();
        let x = g.scalar(input);
        (x * x.abs()).backward();
        check_scalar_near(&x.grad(), 4.0, 1e-12);
    }
}

#[test]
fn matrix_adjoint_through_full_backward() {
    let g = Graph::new();
    let x = g.matrix(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
    let y = g.matrix(vec![5.0, 6.0, 7.0, 8.0], 2, 2).unwrap();
    let z = x.matmul(y).unwrap();
    z.backward();
    check_payload_near(&x.grad(), &[2, 2], &[11.0, 15.0, 11.0, 15.0], 1e-12);
    check_payload_near(&y.grad(), &[2, 2], &[4.0, 4.0, 6.0, 6.0], 1e-12);
}

#[test]
fn mixed_scalar_matrix_expression() {
    // f = sum(2 * m + 1): df/dm = 2 everywhere.
    let g = Graph::new();
    let m = g.matrix(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
    let f = 2.0 * m + 1.0;
    f.backward();
    check_payload_near(&m.grad(), &[2, 2], &[2.0; 4], 1e-12);
}

#[test]
fn deep_nesting() {
    // f(x) = ((x+1)*2 - 1)^2 = (2x+1)^2 at x=2: df/dx = 4(2x+1) = 20.
    let g = Graph::new();
    let x = g.scalar(2.0);
    let f = ((x + 1.0) * 2.0 - 1.0).powf(2.0).unwrap();
    f.backward();
    check_scalar_near(&x.grad(), 20.0, 1e-12);
}

#[test]
fn wide_sum_of_variables() {
    let g = Graph::new();
    let vars: Vec<_> = (1..=5).map(|i| g.scalar(i as f64)).collect();
    let mut f = vars[0] + vars[1];
    for v in &vars[2..] {
        f = f + *v;
    }
    f.backward();
    for v in &vars {
        check_scalar_near(&v.grad(), 1.0, 1e-12);
    }
}

#[test]
fn failed_operator_leaves_graph_untouched() {
    let g = Graph::new();
    let a = g.matrix(vec![0.0; 6], 2, 3).unwrap();
    let b = g.matrix(vec![0.0; 6], 2, 3).unwrap();
    let before = g.len();
    assert!(matches!(
        a.matmul(b),
        Err(BackpropError::ShapeMismatch { .. })
    ));
    assert_eq!(g.len(), before);
}

#[test]
fn payload_accessors() {
    let g = Graph::new();
    let x = g.scalar(1.5);
    assert_eq!(x.value(), Payload::Scalar(1.5));
    assert_eq!(x.shape(), Vec::<usize>::new());
    let m = g.matrix(vec![1.0, 2.0], 1, 2).unwrap();
    assert_eq!(m.shape(), vec![1, 2]);
    assert_eq!(m.value().matrix().unwrap().get(0, 1), 2.0);
    let rendered = format!("{:?}", x);
    assert!(rendered.contains("op=leaf"));
}
