use crate::error::BackpropError;
use crate::graph::Graph;
use crate::payload::Payload;
use crate::var::Var;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: analytical {analytical_grad} != numerical {numerical_grad} (difference {difference})")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },

    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(BackpropError),

    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index} (loss+: {loss_plus}, loss-: {loss_minus})")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Analytical gradient is NaN or infinite for input {input_index}, element {element_index}: {value}")]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },
}

impl From<BackpropError> for GradCheckError {
    fn from(err: BackpropError) -> Self {
        GradCheckError::ForwardPassError(err)
    }
}

/// Checks analytical gradients against central finite differences.
///
/// `func` rebuilds the expression on a fresh graph from leaf variables, once
/// per evaluation. The compared quantity is the gradient of the *sum* of the
/// output's elements, which is exactly what a backward pass with its all-ones
/// seed computes.
pub fn check_grad<F>(
    func: F,
    inputs: &[Payload],
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    F: for<'g> Fn(&'g Graph, &[Var<'g>]) -> Result<Var<'g>, BackpropError>,
{
    // --- Analytical gradients ---
    let analytical: Vec<Vec<f64>> = {
        let graph = Graph::new();
        let vars: Vec<Var<'_>> = inputs.iter().map(|p| graph.leaf(p.clone())).collect();
        let output = func(&graph, &vars)?;
        output.backward();
        vars.iter().map(|v| v.grad().to_vec()).collect()
    };

    let loss_at = |perturbed: &[Payload]| -> Result<f64, GradCheckError> {
        let graph = Graph::new();
        let vars: Vec<Var<'_>> = perturbed.iter().map(|p| graph.leaf(p.clone())).collect();
        let output = func(&graph, &vars)?;
        Ok(output.value().sum())
    };

    // --- Numerical gradients, one element at a time ---
    for (input_index, input) in inputs.iter().enumerate() {
        let flat = input.to_vec();
        for element_index in 0..flat.len() {
            let perturb = |delta: f64| -> Vec<Payload> {
                let mut data = flat.clone();
                data[element_index] += delta;
                let payload = match input {
                    Payload::Scalar(_) => Payload::Scalar(data[0]),
                    Payload::Matrix(m) => Payload::Matrix(
                        crate::matrix::Matrix::from_vec(data, m.rows(), m.cols())
                            .expect("shape preserved"),
                    ),
                };
                let mut set: Vec<Payload> = inputs.to_vec();
                set[input_index] = payload;
                set
            };

            let loss_plus = loss_at(&perturb(epsilon))?;
            let loss_minus = loss_at(&perturb(-epsilon))?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);

            if numerical_grad.is_nan() || numerical_grad.is_infinite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index,
                    element_index,
                    loss_plus,
                    loss_minus,
                });
            }
            let analytical_grad = analytical[input_index][element_index];
            if analytical_grad.is_nan() || analytical_grad.is_infinite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index,
                    element_index,
                    value: analytical_grad,
                });
            }

            let difference = (analytical_grad - numerical_grad).abs();
            if difference > tolerance
                && (difference / (analytical_grad.abs() + epsilon)) > tolerance
            {
                return Err(GradCheckError::GradientMismatch {
                    input_index,
                    element_index,
                    analytical_grad,
                    numerical_grad,
                    difference,
                });
            }
        }
    }

    Ok(())
}
