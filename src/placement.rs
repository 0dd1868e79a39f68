use rand::Rng;
use serde::Deserialize;

/// Per-kind placement knobs. Spacing bounds are hard invariants, validated at
/// construction; probability is a tolerant knob clamped into `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlacementParams {
    pub min_spacing: f32,
    pub max_spacing: f32,
    pub spawn_probability: f32,
    pub vertical_offset: f32,
}

/// Outcome of evaluating one candidate slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnDecision {
    Skip,
    SpawnAt(f32),
}

/// Advance the frontier by one randomized spacing draw and decide whether the
/// new slot gets an entity, and at which Y.
///
/// Randomness is the only non-determinism here; callers inject the source.
/// Spacing is strictly positive, so the returned frontier always moves right
/// and any spawn loop over this function terminates.
pub fn next_slot<R: Rng>(
    frontier_x: f32,
    params: &PlacementParams,
    ground_top: impl FnOnce(f32) -> Option<f32>,
    fallback_y: f32,
    rng: &mut R,
) -> (f32, SpawnDecision) {
    let spacing = rng.gen_range(params.min_spacing..=params.max_spacing);
    let next_x = frontier_x + spacing;

    let roll: f32 = rng.gen();
    if roll > params.spawn_probability {
        return (next_x, SpawnDecision::Skip);
    }

    let y = match ground_top(next_x) {
        Some(top) => top + params.vertical_offset,
        // Gaps and chasms are expected; place at the policy default instead.
        None => fallback_y,
    };
    (next_x, SpawnDecision::SpawnAt(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params(min: f32, max: f32, probability: f32, offset: f32) -> PlacementParams {
        PlacementParams {
            min_spacing: min,
            max_spacing: max,
            spawn_probability: probability,
            vertical_offset: offset,
        }
    }

    #[test]
    fn spacing_stays_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let p = params(3.0, 8.0, 1.0, 0.0);
        let mut frontier = 0.0;
        for _ in 0..200 {
            let (next, _) = next_slot(frontier, &p, |_| Some(0.0), 0.0, &mut rng);
            let spacing = next - frontier;
            assert!((3.0..=8.0).contains(&spacing), "spacing {spacing} out of bounds");
            frontier = next;
        }
    }

    #[test]
    fn equal_bounds_produce_a_fixed_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let p = params(2.0, 2.0, 1.0, 0.0);
        let (next, decision) = next_slot(10.0, &p, |_| Some(0.0), 0.0, &mut rng);
        assert_eq!(next, 12.0);
        assert_eq!(decision, SpawnDecision::SpawnAt(0.0));
    }

    #[test]
    fn zero_probability_always_skips() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let p = params(1.0, 2.0, 0.0, 0.0);
        let mut skips = 0;
        for i in 0..100 {
            let (_, decision) = next_slot(i as f32, &p, |_| Some(0.0), 0.0, &mut rng);
            if decision == SpawnDecision::Skip {
                skips += 1;
            }
        }
        assert!(skips >= 99, "expected near-total skipping, saw {skips}/100");
    }

    #[test]
    fn ground_height_plus_offset_places_the_entity() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let p = params(2.0, 2.0, 1.0, 0.9);
        let (_, decision) = next_slot(0.0, &p, |_| Some(-1.5), -99.0, &mut rng);
        assert_eq!(decision, SpawnDecision::SpawnAt(-0.6));
    }

    #[test]
    fn missing_ground_falls_back_without_the_offset() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let p = params(2.0, 2.0, 1.0, 0.9);
        let (_, decision) = next_slot(0.0, &p, |_| None, 4.0, &mut rng);
        assert_eq!(decision, SpawnDecision::SpawnAt(4.0));
    }
}
