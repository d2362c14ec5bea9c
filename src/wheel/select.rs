//! Weighted outcome selection
//!
//! Prize wedges carry authored weights (percentage points). Whatever is left
//! of 100 is split equally between active filler wedges. With no fillers the
//! remainder is simply never drawn.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::wedge::{Wedge, WedgeId, WheelLayout};
use crate::consts::TOTAL_WEIGHT;
use crate::error::SpinError;

/// Source of uniform values in [0, 1)
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<F> RandomSource for F
where
    F: FnMut() -> f64,
{
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

/// Seeded PCG generator for reproducible spins
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Always returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value
    }
}

/// One wedge's effective weight in a draw
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedEntry {
    pub wedge: Wedge,
    pub weight: f64,
}

/// Summary of how the 100 percentage points are allocated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightReport {
    pub prize_sum: f64,
    pub filler_count: usize,
    /// Weight given to each filler wedge
    pub filler_share: f64,
    /// Mass that no wedge can win (remainder with no fillers to absorb it)
    pub unassigned: f64,
}

impl WeightReport {
    pub fn is_overallocated(&self) -> bool {
        self.prize_sum > TOTAL_WEIGHT
    }

    /// Soft configuration warning for the host's validation layer
    pub fn warning(&self) -> Option<SpinError> {
        self.is_overallocated()
            .then_some(SpinError::InvalidWeightConfiguration { total: self.prize_sum })
    }
}

/// Authored weight, with negative and non-finite values counted as 0
fn prize_weight(wedge: &Wedge) -> f64 {
    if wedge.weight.is_finite() {
        wedge.weight.max(0.0)
    } else {
        0.0
    }
}

/// Effective weights for every active wedge, in layout order
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    entries: Vec<WeightedEntry>,
    report: WeightReport,
}

impl WeightTable {
    pub fn new(layout: &WheelLayout) -> Self {
        let prize_sum: f64 = layout
            .wedges()
            .iter()
            .filter(|w| w.is_prize)
            .map(prize_weight)
            .sum();
        let filler_count = layout.wedges().iter().filter(|w| !w.is_prize).count();

        let remaining = (TOTAL_WEIGHT - prize_sum).max(0.0);
        let filler_share = if filler_count > 0 {
            remaining / filler_count as f64
        } else {
            0.0
        };
        let unassigned = if filler_count > 0 { 0.0 } else { remaining };

        let entries = layout
            .wedges()
            .iter()
            .map(|wedge| WeightedEntry {
                weight: if wedge.is_prize {
                    prize_weight(wedge)
                } else {
                    filler_share
                },
                wedge: wedge.clone(),
            })
            .collect();

        Self {
            entries,
            report: WeightReport {
                prize_sum,
                filler_count,
                filler_share,
                unassigned,
            },
        }
    }

    pub fn entries(&self) -> &[WeightedEntry] {
        &self.entries
    }

    pub fn report(&self) -> WeightReport {
        self.report
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    pub fn weight_of(&self, id: &WedgeId) -> Option<f64> {
        self.entries.iter().find(|e| &e.wedge.id == id).map(|e| e.weight)
    }

    /// Normalized selection probability for each active wedge
    ///
    /// Sums to 1 whenever any wedge has positive weight. With no weight at
    /// all the draw always falls back to the first wedge.
    pub fn probabilities(&self) -> Vec<(WedgeId, f64)> {
        let total = self.total_weight();
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let p = if total > 0.0 {
                    e.weight / total
                } else if i == 0 {
                    1.0
                } else {
                    0.0
                };
                (e.wedge.id.clone(), p)
            })
            .collect()
    }

    /// Map a unit draw onto the cumulative weights
    ///
    /// Returns the index (layout order) of the first entry with positive
    /// weight whose cumulative weight reaches `r = unit * total`; ties resolve
    /// to the earlier entry.
    pub fn pick_index(&self, unit: f64) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let total = self.total_weight();
        if total <= 0.0 {
            return Some(0);
        }

        let r = unit.clamp(0.0, 1.0) * total;
        let mut cumulative = 0.0;
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.weight <= 0.0 {
                continue;
            }
            cumulative += entry.weight;
            if cumulative >= r {
                return Some(i);
            }
        }

        // Rounding left r past the last cumulative sum
        Some(0)
    }

    pub fn pick(&self, unit: f64) -> Option<&Wedge> {
        self.pick_index(unit).map(|i| &self.entries[i].wedge)
    }
}

/// Pick the winning wedge for one spin
pub fn select_winner<R: RandomSource + ?Sized>(
    layout: &WheelLayout,
    rng: &mut R,
) -> Result<Wedge, SpinError> {
    let table = WeightTable::new(layout);
    let unit = rng.next_unit();
    table.pick(unit).cloned().ok_or(SpinError::NoActiveWedges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout(wedges: &[Wedge]) -> WheelLayout {
        WheelLayout::new(wedges)
    }

    #[test]
    fn test_single_full_weight_prize() {
        let wheel = layout(&[Wedge::prize("a", 100.0)]);
        let winner = select_winner(&wheel, &mut SequenceRandom::constant(0.5)).unwrap();
        assert_eq!(winner.id.as_str(), "a");
    }

    #[test]
    fn test_filler_takes_remainder() {
        let wheel = layout(&[
            Wedge::prize("a", 30.0).with_order(0),
            Wedge::filler("b").with_order(1),
        ]);
        let table = WeightTable::new(&wheel);
        assert_eq!(table.weight_of(&WedgeId::from("a")), Some(30.0));
        assert_eq!(table.weight_of(&WedgeId::from("b")), Some(70.0));

        // r = 50 on a [0, 100) scale lands past the prize's 30
        let winner = select_winner(&wheel, &mut SequenceRandom::constant(0.5)).unwrap();
        assert_eq!(winner.id.as_str(), "b");

        // r = 30 ties with the prize's cumulative weight; first match wins
        let winner = select_winner(&wheel, &mut SequenceRandom::constant(0.3)).unwrap();
        assert_eq!(winner.id.as_str(), "a");
    }

    #[test]
    fn test_remainder_split_equally_between_fillers() {
        let wheel = layout(&[
            Wedge::prize("p", 40.0),
            Wedge::filler("f1").with_order(1),
            Wedge::filler("f2").with_order(2),
            Wedge::filler("f3").with_order(3).inactive(),
        ]);
        let report = WeightTable::new(&wheel).report();
        assert_eq!(report.filler_count, 2);
        assert_eq!(report.filler_share, 30.0);
        assert_eq!(report.unassigned, 0.0);
        assert!(report.warning().is_none());
    }

    #[test]
    fn test_full_prize_weight_makes_fillers_unreachable() {
        let wheel = layout(&[
            Wedge::prize("p", 100.0),
            Wedge::filler("f").with_order(1),
        ]);
        let table = WeightTable::new(&wheel);
        assert_eq!(table.weight_of(&WedgeId::from("f")), Some(0.0));
        // Even the top of the range cannot reach a zero-weight wedge
        let winner = table.pick(0.999_999).unwrap();
        assert_eq!(winner.id.as_str(), "p");
        assert!(table.report().warning().is_none());
    }

    #[test]
    fn test_zero_weight_prize_is_never_drawn() {
        let wheel = layout(&[
            Wedge::prize("zero", 0.0).with_order(0),
            Wedge::prize("real", 50.0).with_order(1),
        ]);
        let table = WeightTable::new(&wheel);
        assert_eq!(table.pick(0.0).unwrap().id.as_str(), "real");
        assert_eq!(table.report().unassigned, 50.0);
    }

    #[test]
    fn test_overallocation_is_reported_but_selectable() {
        let wheel = layout(&[
            Wedge::prize("a", 80.0).with_order(0),
            Wedge::prize("b", 40.0).with_order(1),
            Wedge::filler("c").with_order(2),
        ]);
        let table = WeightTable::new(&wheel);
        let report = table.report();
        assert!(report.is_overallocated());
        assert_eq!(
            report.warning(),
            Some(SpinError::InvalidWeightConfiguration { total: 120.0 })
        );
        assert_eq!(table.weight_of(&WedgeId::from("c")), Some(0.0));
        assert_eq!(table.pick(0.9).unwrap().id.as_str(), "b");
    }

    #[test]
    fn test_all_zero_weights_fall_back_to_first() {
        let wheel = layout(&[
            Wedge::prize("a", 0.0).with_order(0),
            Wedge::prize("b", 0.0).with_order(1),
        ]);
        let table = WeightTable::new(&wheel);
        assert_eq!(table.pick(0.7).unwrap().id.as_str(), "a");
        let probs = table.probabilities();
        assert_eq!(probs[0].1, 1.0);
        assert_eq!(probs[1].1, 0.0);
    }

    #[test]
    fn test_non_finite_weights_count_as_zero() {
        let wheel = layout(&[
            Wedge::prize("inf", f64::INFINITY).with_order(0),
            Wedge::prize("nan", f64::NAN).with_order(1),
            Wedge::prize("neg", -20.0).with_order(2),
            Wedge::filler("f").with_order(3),
        ]);
        let table = WeightTable::new(&wheel);
        assert_eq!(table.weight_of(&WedgeId::from("inf")), Some(0.0));
        assert_eq!(table.weight_of(&WedgeId::from("nan")), Some(0.0));
        assert_eq!(table.total_weight(), 100.0);
        assert_eq!(table.pick(0.0).unwrap().id.as_str(), "f");

        let total: f64 = table.probabilities().iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pick_index_follows_layout_positions() {
        let wheel = layout(&[
            Wedge::filler("dup").with_order(0),
            Wedge::prize("x", 0.0).with_order(1),
            Wedge::prize("dup", 50.0).with_order(2),
            Wedge::prize("y", 0.0).with_order(3),
        ]);
        let table = WeightTable::new(&wheel);
        assert_eq!(table.pick_index(0.9), Some(2));
        assert_eq!(table.pick_index(0.1), Some(0));
    }

    #[test]
    fn test_empty_layout_has_no_winner() {
        let wheel = layout(&[]);
        assert_eq!(
            select_winner(&wheel, &mut SequenceRandom::constant(0.1)),
            Err(SpinError::NoActiveWedges)
        );
    }

    #[test]
    fn test_closure_random_source() {
        let wheel = layout(&[
            Wedge::prize("a", 50.0).with_order(0),
            Wedge::prize("b", 50.0).with_order(1),
        ]);
        let mut rng = || 0.75;
        assert_eq!(select_winner(&wheel, &mut rng).unwrap().id.as_str(), "b");
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let mut a = SeededRandom::new(12345);
        let mut b = SeededRandom::new(12345);
        for _ in 0..32 {
            let x = a.next_unit();
            assert_eq!(x, b.next_unit());
            assert!((0.0..1.0).contains(&x));
        }
        assert_eq!(a.seed(), 12345);
    }

    #[test]
    fn test_sequence_random_cycles() {
        let mut rng = SequenceRandom::new(vec![0.1, 0.2]);
        assert_eq!(rng.next_unit(), 0.1);
        assert_eq!(rng.next_unit(), 0.2);
        assert_eq!(rng.next_unit(), 0.1);
    }

    fn arb_wedges() -> impl Strategy<Value = Vec<Wedge>> {
        prop::collection::vec(
            (
                any::<bool>(),
                prop_oneof![8 => 0.0f64..60.0, 1 => Just(f64::INFINITY), 1 => Just(f64::NAN)],
                any::<bool>(),
            ),
            1..12,
        ).prop_map(
            |specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (is_prize, weight, is_active))| {
                        let wedge = if is_prize {
                            Wedge::prize(format!("w{i}"), weight)
                        } else {
                            Wedge::filler(format!("w{i}"))
                        };
                        let wedge = wedge.with_order(i as i32);
                        if is_active { wedge } else { wedge.inactive() }
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_probabilities_sum_to_one(wedges in arb_wedges()) {
            let wheel = layout(&wedges);
            prop_assume!(!wheel.is_empty());
            let total: f64 = WeightTable::new(&wheel).probabilities().iter().map(|(_, p)| p).sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_winner_is_active_with_weight(wedges in arb_wedges(), unit in 0.0f64..1.0) {
            let wheel = layout(&wedges);
            prop_assume!(!wheel.is_empty());
            let table = WeightTable::new(&wheel);
            let winner = table.pick(unit).unwrap();
            prop_assert!(winner.is_active);
            if table.total_weight() > 0.0 {
                prop_assert!(table.weight_of(&winner.id).unwrap() > 0.0);
            }
        }
    }
}
