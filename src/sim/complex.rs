use num_complex::Complex64;

/// Principal complex square root of `a + ib`.
///
/// Written in real/imaginary form so that every intermediate stays visible
/// to the dispersion relation solver: a non-finite input yields a
/// non-finite result instead of being silently normalized.
pub fn complex_sqrt(a: f64, b: f64) -> Complex64 {
    let modulus = a.hypot(b);
    let re = ((modulus + a) / 2.).sqrt();
    let im = ((modulus - a) / 2.).sqrt().copysign(b);

    if re.is_nan() {
        tracing::error!(a, b, "No real value found, all values are imaginary");
    }

    Complex64::new(re, im)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_real() {
        let z = complex_sqrt(4., 0.);
        assert!((z.re - 2.).abs() < 1e-12);
        assert!(z.im.abs() < 1e-12);
    }

    #[test]
    fn test_negative_real_is_imaginary() {
        let z = complex_sqrt(-9., 0.);
        assert!(z.re.abs() < 1e-12);
        assert!((z.im - 3.).abs() < 1e-12);
    }

    #[test]
    fn test_matches_num_complex() {
        for (a, b) in [(1., 1.), (-2., 0.5), (0.3, -4.), (-1., -1.)] {
            let z = complex_sqrt(a, b);
            let expected = Complex64::new(a, b).sqrt();
            assert!((z - expected).norm() < 1e-12, "sqrt({a} + {b}i)");
        }
    }

    #[test]
    fn test_nan_propagates() {
        let z = complex_sqrt(f64::NAN, 0.);
        assert!(z.re.is_nan());
    }
}
