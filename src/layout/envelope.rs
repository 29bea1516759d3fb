use crate::math::TOLERANCE;
use crate::spec::RingSpec;

/// Maximum allowed building stories at a given distance from the city
/// center — the "bowl profile" height envelope.
///
/// Constant inside the innermost ring; between successive ring outer radii
/// the envelope interpolates linearly from one ring's limit to the next,
/// floored and never below 1. An exact ring boundary returns that ring's
/// value with no interpolation. Beyond the outermost ring the last ring's
/// limit applies.
#[must_use]
pub fn max_stories_from_rings(dist_from_center: f64, rings: &[RingSpec]) -> u32 {
    let Some(first) = rings.first() else {
        return 1;
    };
    if dist_from_center <= first.radius_to_m {
        return first.max_stories.max(1);
    }
    for pair in rings.windows(2) {
        let (inner, outer) = (&pair[0], &pair[1]);
        if dist_from_center <= outer.radius_to_m {
            let span = outer.radius_to_m - inner.radius_to_m;
            if span < TOLERANCE {
                return outer.max_stories.max(1);
            }
            let t = (dist_from_center - inner.radius_to_m) / span;
            let stories = f64::from(inner.max_stories)
                + t * (f64::from(outer.max_stories) - f64::from(inner.max_stories));
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            return (stories.floor().max(1.0)) as u32;
        }
    }
    rings.last().map_or(1, |r| r.max_stories.max(1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testutil::default_spec;

    #[test]
    fn constant_inside_innermost_ring() {
        let spec = default_spec();
        assert_eq!(max_stories_from_rings(0.0, &spec.rings), 20);
        assert_eq!(max_stories_from_rings(150.0, &spec.rings), 20);
    }

    #[test]
    fn exact_ring_boundary_returns_ring_value() {
        let spec = default_spec();
        assert_eq!(max_stories_from_rings(300.0, &spec.rings), 20);
        assert_eq!(max_stories_from_rings(600.0, &spec.rings), 10);
        assert_eq!(max_stories_from_rings(900.0, &spec.rings), 4);
    }

    #[test]
    fn interpolates_between_boundaries() {
        let spec = default_spec();
        // Halfway between 300 (20 stories) and 600 (10 stories).
        assert_eq!(max_stories_from_rings(450.0, &spec.rings), 15);
        // Halfway between 600 (10) and 900 (4).
        assert_eq!(max_stories_from_rings(750.0, &spec.rings), 7);
    }

    #[test]
    fn clamps_beyond_outermost_ring() {
        let spec = default_spec();
        assert_eq!(max_stories_from_rings(2000.0, &spec.rings), 4);
    }

    #[test]
    fn never_below_one_story() {
        let mut spec = default_spec();
        for ring in &mut spec.rings {
            ring.max_stories = 0;
        }
        assert_eq!(max_stories_from_rings(100.0, &spec.rings), 1);
        assert_eq!(max_stories_from_rings(450.0, &spec.rings), 1);
    }

    #[test]
    fn empty_ring_list_defaults_to_one() {
        assert_eq!(max_stories_from_rings(100.0, &[]), 1);
    }
}
