// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns an escape result into a displayable colour.  Points in the
//! set are black.  Everything else gets a fully saturated hue that
//! drifts from green towards red and magenta the later, and the
//! further, the orbit escaped.

use image::Rgba;

use crate::escape::Escape;

/// The colour of every point inside the set.
pub const IN_SET: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Hue of a point that escaped on its first step.
const BASE_HUE: f64 = 0.3;

/// How many iterations it takes, at unit magnitude, to push the hue
/// one full turn around the wheel.
const HUE_SPREAD: f64 = 800.0;

/// Picks the colour for one sample.
pub fn sample_colour(escape: &Escape) -> Rgba<u8> {
    if escape.in_set {
        return IN_SET;
    }
    hsl_to_rgb(escape_hue(escape.iterations, escape.magnitude), 1.0, 0.5)
}

/// Hue, as a fraction of a full turn, for an escaped orbit.  Not
/// wrapped: the conversion below does that.
pub fn escape_hue(iterations: usize, magnitude: f64) -> f64 {
    BASE_HUE - (iterations as f64 / HUE_SPREAD) * magnitude
}

/// Standard HSL to RGB conversion.  All three inputs are fractions in
/// `[0, 1]`; the hue may lie outside that range and is wrapped.
/// Channels truncate rather than round.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgba<u8> {
    let (r, g, b) = if saturation == 0.0 {
        (lightness, lightness, lightness)
    } else {
        let q = if lightness < 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let p = 2.0 * lightness - q;
        (
            hue_to_channel(p, q, hue + 1.0 / 3.0),
            hue_to_channel(p, q, hue),
            hue_to_channel(p, q, hue - 1.0 / 3.0),
        )
    };
    Rgba([to_byte(r), to_byte(g), to_byte(b), 255])
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0) as u8
}

// Piecewise linear over the six sextants of the hue wheel; the middle
// two sextants are flat at `q` and the last two flat at `p`.
fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 || t > 1.0 { t.rem_euclid(1.0) } else { t };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn in_set_points_are_black() {
        let escape = Escape {
            in_set: true,
            iterations: 60,
            magnitude: 0.5,
        };
        assert_eq!(sample_colour(&escape), IN_SET);
    }

    #[test]
    fn primary_hues_convert_exactly() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgba([255, 0, 0, 255]));
        assert_eq!(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), Rgba([0, 255, 0, 255]));
        assert_eq!(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), Rgba([0, 0, 255, 255]));
        assert_eq!(hsl_to_rgb(1.0, 1.0, 0.5), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_eq!(hsl_to_rgb(0.7, 0.0, 0.5), Rgba([127, 127, 127, 255]));
        assert_eq!(hsl_to_rgb(0.2, 0.0, 1.0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn channel_is_continuous_at_sextant_boundaries() {
        let (p, q) = (0.0, 1.0);
        for &boundary in &[0.0, 1.0 / 6.0, 1.0 / 2.0, 2.0 / 3.0, 1.0] {
            let below = hue_to_channel(p, q, boundary - EPSILON);
            let at = hue_to_channel(p, q, boundary);
            let above = hue_to_channel(p, q, boundary + EPSILON);
            assert!((below - at).abs() < 1e-6, "jump below {}", boundary);
            assert!((above - at).abs() < 1e-6, "jump above {}", boundary);
        }
    }

    #[test]
    fn channel_matches_the_piecewise_formula_at_boundaries() {
        let (p, q) = (0.2, 0.8);
        assert!((hue_to_channel(p, q, 0.0) - p).abs() < EPSILON);
        assert!((hue_to_channel(p, q, 1.0 / 6.0) - q).abs() < EPSILON);
        assert!((hue_to_channel(p, q, 1.0 / 2.0) - q).abs() < EPSILON);
        assert!((hue_to_channel(p, q, 2.0 / 3.0) - p).abs() < EPSILON);
        assert!((hue_to_channel(p, q, 1.0) - p).abs() < EPSILON);
    }

    #[test]
    fn negative_hues_wrap_around() {
        assert_eq!(hsl_to_rgb(-0.25, 1.0, 0.5), hsl_to_rgb(0.75, 1.0, 0.5));
        assert_eq!(hsl_to_rgb(-1.5, 1.0, 0.5), hsl_to_rgb(0.5, 1.0, 0.5));
    }

    #[test]
    fn immediate_escape_is_green_ish() {
        let escape = Escape {
            in_set: false,
            iterations: 0,
            magnitude: 4.2,
        };
        assert_eq!(escape_hue(0, 4.2), BASE_HUE);
        let colour = sample_colour(&escape);
        assert!(colour.0[1] == 255 && colour.0[2] == 0);
    }

    #[test]
    fn later_escapes_shift_the_hue_down() {
        assert!(escape_hue(40, 2.5) < escape_hue(10, 2.5));
        assert!(escape_hue(10, 3.0) < escape_hue(10, 2.5));
    }

    #[test]
    fn colours_are_reproducible() {
        let escape = Escape {
            in_set: false,
            iterations: 37,
            magnitude: 2.718,
        };
        assert_eq!(sample_colour(&escape), sample_colour(&escape));
    }
}
