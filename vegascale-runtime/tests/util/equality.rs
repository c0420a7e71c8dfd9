use itertools::Itertools;
use vegascale_common::data::scalar::ScalarValue;

pub fn assert_same_members(actual: &[ScalarValue], expected: &[ScalarValue]) {
    let actual_sorted = actual.iter().sorted().collect::<Vec<_>>();
    let expected_sorted = expected.iter().sorted().collect::<Vec<_>>();
    assert_eq!(
        actual_sorted, expected_sorted,
        "\n  actual: {actual:?}\nexpected: {expected:?}"
    );
}

pub fn assert_close(actual: &ScalarValue, expected: f64, tol: f64) {
    let Some(value) = actual.as_f64() else {
        panic!("Expected a number close to {expected}, received {actual:?}");
    };
    assert!(
        (value - expected).abs() <= tol,
        "{value} is not within {tol} of {expected}"
    );
}
