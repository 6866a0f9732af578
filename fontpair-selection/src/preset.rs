//! Preset matching and the built-in preset list.
//!
//! A preset is just a [`SelectionState`] value. Matching is exact structural
//! equality over all nine leaf fields; there is no fuzzy matching.

use crate::state::{RoleSettings, SelectionState};
use rand::Rng;

/// A full selection usable as a one-click starting point.
pub type Preset = SelectionState;

/// True iff font id, weight and size match for all three roles.
pub fn equals(a: &Preset, b: &Preset) -> bool {
    a == b
}

/// Index of the first preset equal to `preset`.
pub fn find(presets: &[Preset], preset: &Preset) -> Option<usize> {
    presets.iter().position(|p| equals(p, preset))
}

/// Whether `preset` is exactly the current selection.
pub fn is_active(current: &SelectionState, preset: &Preset) -> bool {
    equals(current, preset)
}

/// Pick a uniformly random preset index.
///
/// Returns `None` for an empty list. When the list has more than one entry
/// and `excluding` names a valid index, that index is never returned: the
/// sample is drawn from the remaining `len - 1` slots directly, so the call
/// always terminates after one draw.
pub fn pick_random<R: Rng + ?Sized>(
    presets: &[Preset],
    excluding: Option<usize>,
    rng: &mut R,
) -> Option<usize> {
    let len = presets.len();
    if len == 0 {
        return None;
    }
    match excluding {
        Some(excluded) if len > 1 && excluded < len => {
            let i = rng.random_range(0..len - 1);
            Some(if i >= excluded { i + 1 } else { i })
        }
        _ => Some(rng.random_range(0..len)),
    }
}

/// Remembers the last randomized preset so consecutive picks differ.
#[derive(Debug, Clone, Default)]
pub struct Randomizer {
    last: Option<usize>,
}

impl Randomizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the next preset, never repeating the previous pick when there
    /// is a choice.
    pub fn pick<'a, R: Rng + ?Sized>(
        &mut self,
        presets: &'a [Preset],
        rng: &mut R,
    ) -> Option<(usize, &'a Preset)> {
        let index = pick_random(presets, self.last, rng)?;
        self.last = Some(index);
        Some((index, &presets[index]))
    }

    pub fn last(&self) -> Option<usize> {
        self.last
    }
}

/// Curated display / heading / body pairings: (font id, weight, size) per role.
const BUILTIN: &[[(&str, u16, u16); 3]] = &[
    [("bitter", 700, 48), ("inter", 600, 24), ("inter", 400, 16)],
    [("sora", 700, 48), ("geist", 600, 24), ("geist", 400, 16)],
    [("lora", 700, 48), ("lato", 700, 24), ("lato", 400, 16)],
    [("instrument-serif", 400, 72), ("instrument-sans", 600, 24), ("instrument-sans", 400, 16)],
    [("manrope", 800, 48), ("manrope", 600, 24), ("newsreader", 400, 16)],
    [("libre-baskerville", 700, 48), ("libre-franklin", 600, 24), ("libre-franklin", 400, 16)],
    [("gloock", 400, 48), ("epilogue", 600, 24), ("epilogue", 400, 16)],
    [("syne", 700, 48), ("montserrat", 600, 24), ("montserrat", 400, 16)],
    [("space-grotesk", 700, 48), ("space-grotesk", 600, 24), ("albert-sans", 400, 16)],
    [("playfair-display", 700, 48), ("playfair", 700, 24), ("nunito", 400, 16)],
    [("space-mono", 700, 48), ("work-sans", 600, 24), ("work-sans", 400, 16)],
    [("fraunces", 700, 48), ("fraunces", 600, 24), ("dm-sans", 400, 16)],
    [("petrona", 800, 48), ("petrona", 700, 24), ("karla", 400, 16)],
    [("jetbrains-mono", 700, 48), ("roboto-mono", 600, 24), ("roboto-mono", 400, 16)],
    [("archivo-narrow", 700, 48), ("archivo-narrow", 600, 24), ("source-serif-4", 400, 16)],
    [("noto-serif", 700, 48), ("noto-serif", 600, 24), ("mulish", 400, 16)],
    [("golos-text", 700, 48), ("golos-text", 600, 24), ("golos-text", 400, 16)],
    [("fira-sans", 700, 48), ("fira-sans", 600, 24), ("merriweather", 400, 16)],
    [("abril-fatface", 400, 48), ("raleway", 600, 24), ("raleway", 400, 16)],
    [("merriweather", 700, 48), ("merriweather-sans", 600, 24), ("merriweather-sans", 400, 16)],
    [("open-sans", 700, 48), ("open-sans", 600, 24), ("bitter", 400, 16)],
];

/// The built-in preset list, in display order.
pub fn builtin_presets() -> Vec<Preset> {
    BUILTIN
        .iter()
        .map(|[display, heading, body]| {
            let settings = |(id, weight, size): &(&str, u16, u16)| {
                RoleSettings::new(*id, *weight, *size)
            };
            SelectionState::new(settings(display), settings(heading), settings(body))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use crate::state::FieldUpdate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_equals_is_structural() {
        let a = builtin_presets()[2].clone();
        let b = SelectionState::new(
            RoleSettings::new("lora", 700, 48),
            RoleSettings::new("lato", 700, 24),
            RoleSettings::new("lato", 400, 16),
        );
        assert!(equals(&a, &b));
    }

    #[test]
    fn test_any_leaf_difference_breaks_equality() {
        let base = SelectionState::default();
        for role in Role::ALL {
            for update in [
                FieldUpdate::FontId("other".to_string()),
                FieldUpdate::Weight(base.role(role).weight + 1),
                FieldUpdate::Size(base.role(role).size + 1),
            ] {
                let changed = base.update(role, update).unwrap();
                assert!(!equals(&base, &changed), "{role} change should differ");
            }
        }
    }

    #[test]
    fn test_builtin_presets_are_valid() {
        for preset in builtin_presets() {
            assert_eq!(preset.validate(), Ok(()), "{:?}", preset);
        }
    }

    #[test]
    fn test_default_selection_is_first_builtin() {
        let presets = builtin_presets();
        assert_eq!(find(&presets, &SelectionState::default()), Some(0));
        assert!(is_active(&SelectionState::default(), &presets[0]));
        assert!(!is_active(&SelectionState::default(), &presets[1]));
    }

    #[test]
    fn test_builtin_presets_are_distinct() {
        let presets = builtin_presets();
        assert_eq!(presets.len(), 21);
        for (i, preset) in presets.iter().enumerate() {
            assert_eq!(find(&presets, preset), Some(i));
        }
    }

    #[test]
    fn test_pick_random_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_random(&[], None, &mut rng), None);
        assert_eq!(pick_random(&[], Some(0), &mut rng), None);
    }

    #[test]
    fn test_pick_random_single_ignores_exclusion() {
        let presets = vec![SelectionState::default()];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(pick_random(&presets, Some(0), &mut rng), Some(0));
        }
    }

    #[test]
    fn test_pick_random_never_returns_excluded() {
        let presets = builtin_presets();
        let mut rng = StdRng::seed_from_u64(42);
        for excluded in 0..presets.len() {
            for _ in 0..200 {
                let picked = pick_random(&presets, Some(excluded), &mut rng).unwrap();
                assert_ne!(picked, excluded);
                assert!(picked < presets.len());
            }
        }
    }

    #[test]
    fn test_pick_random_two_entries_alternates() {
        let presets = builtin_presets()[..2].to_vec();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_random(&presets, Some(0), &mut rng), Some(1));
        assert_eq!(pick_random(&presets, Some(1), &mut rng), Some(0));
    }

    #[test]
    fn test_pick_random_covers_every_other_index() {
        let presets = builtin_presets()[..4].to_vec();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 4];
        for _ in 0..400 {
            seen[pick_random(&presets, Some(2), &mut rng).unwrap()] = true;
        }
        assert_eq!(seen, [true, true, false, true]);
    }

    #[test]
    fn test_out_of_range_exclusion_is_ignored() {
        let presets = builtin_presets()[..3].to_vec();
        let mut rng = StdRng::seed_from_u64(5);
        let picked = pick_random(&presets, Some(99), &mut rng).unwrap();
        assert!(picked < 3);
    }

    #[test]
    fn test_randomizer_never_repeats() {
        let presets = builtin_presets();
        let mut rng = StdRng::seed_from_u64(9);
        let mut randomizer = Randomizer::new();
        let mut previous = None;
        for _ in 0..100 {
            let (index, preset) = randomizer.pick(&presets, &mut rng).unwrap();
            assert_ne!(Some(index), previous);
            assert_eq!(preset, &presets[index]);
            previous = Some(index);
        }
        assert_eq!(randomizer.last(), previous);
    }
}
