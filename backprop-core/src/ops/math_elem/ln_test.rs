#[cfg(test)]
mod tests {
    use crate::autograd::check_grad;
    use crate::error::BackpropError;
    use crate::graph::Graph;
    use crate::ops::math_elem::ln_op;
    use crate::payload::Payload;
    use crate::utils::testing::check_scalar_near;
    use crate::var::Var;
    use approx::assert_relative_eq;

    #[test]
    fn test_ln_backward() {
        let g = Graph::new();
        let x = g.scalar(4.0);
        let out = ln_op(x).unwrap();
        assert_relative_eq!(out.value().scalar().unwrap(), 4.0_f64.ln());
        out.backward();
        check_scalar_near(&x.grad(), 0.25, 1e-12);
    }

    #[test]
    fn test_ln_non_positive_rejected() {
        let g = Graph::new();
        for value in [0.0, -1.0] {
            let x = g.scalar(value);
            assert!(matches!(
                ln_op(x),
                Err(BackpropError::DomainError { .. })
            ));
        }
    }

    #[test]
    fn test_ln_matrix_element_domain_check() {
        let g = Graph::new();
        let m = g.matrix(vec![1.0, 0.0], 1, 2).unwrap();
        assert!(matches!(
            ln_op(m),
            Err(BackpropError::DomainError { .. })
        ));
    }

    #[test]
    fn test_ln_matches_finite_differences() {
        fn build<'g>(_g: &'g Graph, vars: &[Var<'g>]) -> Result<Var<'g>, BackpropError> {
            ln_op(vars[0])
        }
        check_grad(build, &[Payload::Scalar(2.5)], 1e-6, 1e-6).unwrap();
    }
}
