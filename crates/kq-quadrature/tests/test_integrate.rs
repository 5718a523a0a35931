//! End-to-end tests of the dispatcher and the five algorithms.

use std::cell::Cell;
use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use kq_core::{Error, IntegrandFailure};
use kq_quadrature::{integrate, Algorithm, Fallible, IntegrationOptions, KronrodRule};
use proptest::prelude::*;

fn defaults() -> IntegrationOptions {
    IntegrationOptions::default()
}

/// A representative domain for every algorithm.
fn domain_for(algorithm: Algorithm) -> (f64, f64) {
    match algorithm {
        Algorithm::GaussKronrod | Algorithm::TanhSinh | Algorithm::Trapezoidal => (0.0, 1.0),
        Algorithm::SinhSinh => (f64::NEG_INFINITY, f64::INFINITY),
        Algorithm::ExpSinh => (0.0, f64::INFINITY),
    }
}

// ─── Known integrals ──────────────────────────────────────────────────────────

#[test]
fn tanh_sinh_inverse_sqrt() {
    let options = defaults().with_singular_at_lower(true);
    let r = integrate(|x: f64| 1.0 / x.sqrt(), 0.0, 1.0, &options).unwrap();
    assert_eq!(r.algorithm, Algorithm::TanhSinh);
    assert_abs_diff_eq!(r.value, 2.0, epsilon = 1e-8);
}

#[test]
fn sinh_sinh_gaussian() {
    let r = integrate(
        |x: f64| (-x * x).exp(),
        f64::NEG_INFINITY,
        f64::INFINITY,
        &defaults(),
    )
    .unwrap();
    assert_eq!(r.algorithm, Algorithm::SinhSinh);
    assert_abs_diff_eq!(r.value, PI.sqrt(), epsilon = 1e-8);
}

#[test]
fn exp_sinh_exponential() {
    let r = integrate(|x: f64| (-x).exp(), 0.0, f64::INFINITY, &defaults()).unwrap();
    assert_eq!(r.algorithm, Algorithm::ExpSinh);
    assert_abs_diff_eq!(r.value, 1.0, epsilon = 1e-8);

    let r = integrate(|x: f64| x.exp(), f64::NEG_INFINITY, 0.0, &defaults()).unwrap();
    assert_eq!(r.algorithm, Algorithm::ExpSinh);
    assert_abs_diff_eq!(r.value, 1.0, epsilon = 1e-8);
}

#[test]
fn exp_sinh_polynomial_times_exponential() {
    // x² overflows on the far nodes while e^{−x} underflows, giving NaN there.
    let r = integrate(|x: f64| x * x * (-x).exp(), 0.0, f64::INFINITY, &defaults()).unwrap();
    assert_eq!(r.algorithm, Algorithm::ExpSinh);
    assert_abs_diff_eq!(r.value, 2.0, epsilon = 1e-7);

    let r = integrate(|x: f64| x * x * x.exp(), f64::NEG_INFINITY, 0.0, &defaults()).unwrap();
    assert_abs_diff_eq!(r.value, 2.0, epsilon = 1e-7);
}

#[test]
fn sinh_sinh_second_moment_of_gaussian() {
    let r = integrate(
        |x: f64| x * x * (-x * x).exp(),
        f64::NEG_INFINITY,
        f64::INFINITY,
        &defaults(),
    )
    .unwrap();
    assert_eq!(r.algorithm, Algorithm::SinhSinh);
    assert_abs_diff_eq!(r.value, PI.sqrt() / 2.0, epsilon = 1e-8);
}

#[test]
fn non_finite_between_finite_samples_still_fails() {
    // x = 1 is the centre node of exp-sinh on [0, ∞).
    let err = integrate(
        |x: f64| if x == 1.0 { f64::NAN } else { (-x).exp() },
        0.0,
        f64::INFINITY,
        &defaults(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Integrand {
            abscissa,
            source: IntegrandFailure::NonFinite(_),
        } if abscissa == 1.0
    ));
}

#[test]
fn trapezoidal_sin_over_period() {
    let options = defaults().with_algorithm(Algorithm::Trapezoidal);
    let r = integrate(|x: f64| x.sin(), 0.0, 2.0 * PI, &options).unwrap();
    assert_abs_diff_eq!(r.value, 0.0, epsilon = 1e-12);
    // 2^levels panels, endpoints included
    assert_eq!(r.evaluations, (1 << r.levels) + 1);
}

#[test]
fn gauss_kronrod_is_the_finite_default() {
    let r = integrate(|x: f64| x.exp(), 0.0, 1.0, &defaults()).unwrap();
    assert_eq!(r.algorithm, Algorithm::GaussKronrod);
    assert_abs_diff_eq!(r.value, 1.0f64.exp() - 1.0, epsilon = 1e-14);
    assert_eq!(r.evaluations, 15);
}

#[test]
fn every_kronrod_rule_agrees() {
    for points in [15, 21, 31, 41, 51, 61] {
        let options = defaults().with_kronrod_points(points).unwrap();
        let r = integrate(|x: f64| x.cos(), 0.0, PI / 2.0, &options).unwrap();
        assert_abs_diff_eq!(r.value, 1.0, epsilon = 1e-14);
        assert_eq!(r.evaluations, points);
    }
}

// ─── Domain errors ────────────────────────────────────────────────────────────

#[test]
fn reversed_bounds_fail_before_evaluating() {
    let calls = Cell::new(0usize);
    let f = |x: f64| {
        calls.set(calls.get() + 1);
        x
    };
    for algorithm in [None, Some(Algorithm::GaussKronrod), Some(Algorithm::Trapezoidal)] {
        let options = match algorithm {
            Some(a) => defaults().with_algorithm(a),
            None => defaults(),
        };
        let err = integrate(&f, 5.0, 2.0, &options).unwrap_err();
        assert!(err.is_domain(), "{err}");
    }
    assert_eq!(calls.get(), 0);
}

#[test]
fn algorithm_domain_mismatch() {
    let calls = Cell::new(0usize);
    let f = |x: f64| {
        calls.set(calls.get() + 1);
        (-x * x).exp()
    };
    let mismatches = [
        (Algorithm::Trapezoidal, 0.0, f64::INFINITY),
        (Algorithm::TanhSinh, f64::NEG_INFINITY, f64::INFINITY),
        (Algorithm::SinhSinh, 0.0, 1.0),
        (Algorithm::ExpSinh, f64::NEG_INFINITY, f64::INFINITY),
        (Algorithm::GaussKronrod, f64::NEG_INFINITY, 0.0),
    ];
    for (algorithm, lower, upper) in mismatches {
        let err = integrate(&f, lower, upper, &defaults().with_algorithm(algorithm)).unwrap_err();
        assert!(err.is_domain(), "{algorithm}: {err}");
    }
    assert_eq!(calls.get(), 0);
}

#[test]
fn singular_flag_on_infinite_bound() {
    let options = defaults().with_singular_at_lower(true);
    let err = integrate(|x: f64| x, f64::NEG_INFINITY, 0.0, &options).unwrap_err();
    assert!(err.is_domain());
}

// ─── Integrand errors ─────────────────────────────────────────────────────────

#[test]
fn raising_integrand_never_yields_a_value() {
    for algorithm in Algorithm::ALL {
        let (lower, upper) = domain_for(algorithm);
        let calls = Cell::new(0usize);
        let f = Fallible(|_x: f64| -> Result<f64, String> {
            calls.set(calls.get() + 1);
            Err("lookup failed".to_owned())
        });
        let err = integrate(f, lower, upper, &defaults().with_algorithm(algorithm)).unwrap_err();
        match err {
            Error::Integrand {
                abscissa,
                source: IntegrandFailure::Raised(inner),
            } => {
                assert!(abscissa >= lower && abscissa <= upper);
                assert_eq!(inner.to_string(), "lookup failed");
            }
            other => panic!("{algorithm}: unexpected {other:?}"),
        }
        // The run stops at the first failure.
        assert_eq!(calls.get(), 1, "{algorithm}");
    }
}

#[test]
fn panicking_integrand_is_reported() {
    let err = integrate(
        |x: f64| -> f64 {
            if x > 0.5 {
                panic!("out of table range")
            }
            x
        },
        0.0,
        1.0,
        &defaults(),
    )
    .unwrap_err();
    match err {
        Error::Integrand {
            abscissa,
            source: IntegrandFailure::Panicked(message),
        } => {
            assert!(abscissa > 0.5);
            assert_eq!(message, "out of table range");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn non_finite_value_on_interior_point() {
    // 1/(x − 0.5) hits the pole at the Gauss–Kronrod centre node.
    let err = integrate(|x: f64| 1.0 / (x - 0.5), 0.0, 1.0, &defaults()).unwrap_err();
    assert!(matches!(
        err,
        Error::Integrand {
            source: IntegrandFailure::NonFinite(_),
            ..
        }
    ));
}

// ─── Convergence errors ───────────────────────────────────────────────────────

#[test]
fn budget_exhaustion_then_retry() {
    let peak = |x: f64| 1.0 / (1e-4 + x * x);
    let exact = 200.0 * 100.0f64.atan();

    let tight = defaults().with_max_iterations(1);
    match integrate(peak, -1.0, 1.0, &tight).unwrap_err() {
        Error::Convergence {
            estimate,
            error,
            evaluations,
        } => {
            assert!(estimate.is_finite());
            assert!(error > 0.0 && error.is_finite());
            assert_eq!(evaluations, 45);
        }
        other => panic!("unexpected {other:?}"),
    }

    let r = integrate(peak, -1.0, 1.0, &defaults()).unwrap();
    assert_abs_diff_eq!(r.value, exact, epsilon = 1e-6 * exact);
}

#[test]
fn double_exponential_budget_exhaustion_then_retry() {
    let f = |x: f64| 1.0 / x.sqrt();
    let options = defaults()
        .with_algorithm(Algorithm::TanhSinh)
        .with_relative_tolerance(1e-14)
        .with_max_iterations(1);
    let err = integrate(f, 0.0, 1.0, &options).unwrap_err();
    assert!(err.is_convergence());

    let r = integrate(f, 0.0, 1.0, &options.with_relative_tolerance(1e-10).with_max_iterations(15))
        .unwrap();
    assert_abs_diff_eq!(r.value, 2.0, epsilon = 1e-9);
}

// ─── Determinism and sharing ──────────────────────────────────────────────────

#[test]
fn repeated_runs_are_identical() {
    let f = |x: f64| (-x * x).exp() * (1.0 + x.abs().sqrt());
    for algorithm in Algorithm::ALL {
        let (lower, upper) = domain_for(algorithm);
        let options = defaults().with_algorithm(algorithm);
        let first = integrate(&f, lower, upper, &options).unwrap();
        let second = integrate(&f, lower, upper, &options).unwrap();
        assert_eq!(first, second, "{algorithm}");
    }
}

#[test]
fn concurrent_runs_share_one_integrand() {
    let f = |x: f64| 1.0 / (1.0 + x * x);
    let expected = integrate(&f, 0.0, f64::INFINITY, &defaults()).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| integrate(&f, 0.0, f64::INFINITY, &defaults())))
            .collect();
        for handle in handles {
            let r = handle.join().unwrap().unwrap();
            assert_eq!(r, expected);
        }
    });
    assert_abs_diff_eq!(expected.value, PI / 2.0, epsilon = 1e-7);
}

#[test]
fn stateful_integrand_sees_every_evaluation() {
    let mut calls = 0usize;
    let r = integrate(
        |x: f64| {
            calls += 1;
            x * x
        },
        0.0,
        1.0,
        &defaults().with_kronrod_rule(KronrodRule::G10K21),
    )
    .unwrap();
    assert_eq!(calls, r.evaluations);
}

// ─── Polynomial exactness ─────────────────────────────────────────────────────

fn antiderivative(coeffs: &[f64], x: f64) -> f64 {
    coeffs
        .iter()
        .enumerate()
        .rev()
        .fold(0.0, |acc, (k, c)| acc * x + c / (k + 1) as f64)
        * x
}

proptest! {
    #[test]
    fn gauss_kronrod_integrates_polynomials(
        coeffs in prop::collection::vec(-3.0f64..3.0, 1..6),
        a in -2.0f64..2.0,
        width in 0.5f64..4.0,
    ) {
        let b = a + width;
        let exact = antiderivative(&coeffs, b) - antiderivative(&coeffs, a);
        let p = |x: f64| coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c);
        let options = defaults().with_absolute_tolerance(1e-9);
        let r = integrate(p, a, b, &options).unwrap();
        prop_assert_eq!(r.algorithm, Algorithm::GaussKronrod);
        prop_assert!((r.value - exact).abs() <= 1e-9 + 1e-8 * exact.abs());
    }
}
