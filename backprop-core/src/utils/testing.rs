use crate::payload::Payload;

/// Checks that a payload has the expected shape and elementwise data within
/// tolerance. Panics with the offending index on mismatch.
pub fn check_payload_near(
    actual: &Payload,
    expected_shape: &[usize],
    expected_data: &[f64],
    tolerance: f64,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data = actual.to_vec();
    assert_eq!(
        actual_data.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data.iter().zip(expected_data.iter()).enumerate() {
        let diff = (*a - *e).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Scalar convenience wrapper over [`check_payload_near`].
pub fn check_scalar_near(actual: &Payload, expected: f64, tolerance: f64) {
    check_payload_near(actual, &[], &[expected], tolerance);
}
