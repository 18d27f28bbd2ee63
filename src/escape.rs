// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time test.  A point `c` is in the Mandelbrot set if the
//! orbit of `z -> z * z + c`, started at the origin, stays within a
//! radius of 2 forever.  We can only iterate a finite number of times,
//! so points that haven't escaped by the end of the budget are
//! counted as inside.

use num::Complex;

use crate::planes::Pixel;

/// Squared escape radius, compared against `norm_sqr()`.
pub const ESCAPE_NORM_SQR: f64 = 4.0;

/// What happened to the orbit of a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    /// True if the orbit never left the escape radius.
    pub in_set: bool,
    /// Rounds completed before the orbit escaped, or the full budget
    /// if it never did.
    pub iterations: usize,
    /// The modulus of the orbit when the test stopped.
    pub magnitude: f64,
}

/// One finished sample, ready for the compositor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SampleResult {
    /// Where in the output buffer this sample lands.
    pub pixel: Pixel,
    /// The classification of the point behind that pixel.
    pub escape: Escape,
}

/// Iterates the orbit of `point` up to `max_iterations` times.  The
/// recurrence is applied first and the radius tested afterwards, so a
/// point that escapes on the very first step reports zero iterations
/// and the modulus of the point itself.
pub fn evaluate(point: Complex<f64>, max_iterations: usize) -> Escape {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    for i in 0..max_iterations {
        z = z * z + point;
        if z.norm_sqr() > ESCAPE_NORM_SQR {
            return Escape {
                in_set: false,
                iterations: i,
                magnitude: z.norm(),
            };
        }
    }
    Escape {
        in_set: true,
        iterations: max_iterations,
        magnitude: z.norm(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn origin_is_always_inside() {
        for limit in &[1, 2, 60, 1000] {
            let escape = evaluate(Complex::new(0.0, 0.0), *limit);
            assert!(escape.in_set);
            assert_eq!(escape.iterations, *limit);
            assert_eq!(escape.magnitude, 0.0);
        }
    }

    #[test]
    fn distant_point_escapes_immediately() {
        let point = Complex::new(3.0, 3.0);
        let escape = evaluate(point, 60);
        assert!(!escape.in_set);
        assert_eq!(escape.iterations, 0);
        assert_eq!(escape.magnitude, point.norm());
    }

    #[test]
    fn minus_one_cycles_forever() {
        // -1 -> 0 -> -1 -> 0 ...
        let escape = evaluate(Complex::new(-1.0, 0.0), 61);
        assert!(escape.in_set);
        assert_eq!(escape.magnitude, 1.0);
    }

    #[test]
    fn point_just_outside_escapes_late() {
        // 0.26 lies just past the cusp at 0.25 and takes a while to leave.
        let escape = evaluate(Complex::new(0.26, 0.0), 1000);
        assert!(!escape.in_set);
        assert!(escape.iterations > 10);
        assert!(escape.magnitude > 2.0);
    }

    #[test]
    fn classification_agrees_with_iteration_count() {
        let mut rng = rand::thread_rng();
        for _ in 0..5000 {
            let point = Complex::new(rng.gen_range(-2.5..1.0), rng.gen_range(-2.0..2.0));
            let limit = rng.gen_range(1..200);
            let escape = evaluate(point, limit);
            if escape.in_set {
                assert_eq!(escape.iterations, limit);
                assert!(escape.magnitude <= 2.0 + 1e-12);
            } else {
                assert!(escape.iterations < limit);
                assert!(escape.magnitude >= 2.0);
            }
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let point = Complex::new(-0.743_643_887, 0.131_825_904);
        assert_eq!(evaluate(point, 500), evaluate(point, 500));
    }
}
