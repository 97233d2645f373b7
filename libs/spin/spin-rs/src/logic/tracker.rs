use std::collections::HashMap;

use crate::model::core_config::OfferThresholds;
use crate::model::offer::{Tally, TriggerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Show,
    Suppress,
}

impl Tally {
    pub fn since_shown(&self) -> u64 {
        self.count.saturating_sub(self.last_shown)
    }

    pub fn is_due(&self, threshold: u64) -> bool {
        self.since_shown() >= threshold
    }

    pub fn mark_shown(&mut self) {
        self.last_shown = self.count;
    }
}

/// Per-kind event counters. Each kind is independently Dormant until enough
/// events accumulate since its last shown offer.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    thresholds: OfferThresholds,
    tallies: HashMap<TriggerKind, Tally>,
}

impl Tracker {
    pub fn new(thresholds: OfferThresholds, tallies: HashMap<TriggerKind, Tally>) -> Self {
        let tallies = tallies
            .into_iter()
            .map(|(kind, mut tally)| {
                // last_shown never exceeds count
                tally.last_shown = tally.last_shown.min(tally.count);
                (kind, tally)
            })
            .collect();
        Self { thresholds, tallies }
    }

    pub fn tally(&self, kind: TriggerKind) -> Tally {
        self.tallies.get(&kind).copied().unwrap_or_default()
    }

    pub fn threshold(&self, kind: TriggerKind) -> u64 {
        self.thresholds.get(kind)
    }

    /// Counts one qualifying event.
    pub fn observe(&mut self, kind: TriggerKind) -> Verdict {
        let threshold = self.threshold(kind);
        let tally = self.tallies.entry(kind).or_default();
        tally.count = tally.count.saturating_add(1);

        if tally.is_due(threshold) {
            Verdict::Show
        } else {
            Verdict::Suppress
        }
    }

    /// Re-evaluates without counting anything.
    pub fn check(&self, kind: TriggerKind) -> Verdict {
        if self.tally(kind).is_due(self.threshold(kind)) {
            Verdict::Show
        } else {
            Verdict::Suppress
        }
    }

    pub fn mark_shown(&mut self, kind: TriggerKind) -> Tally {
        let tally = self.tallies.entry(kind).or_default();
        tally.mark_shown();
        *tally
    }

    pub fn reset(&mut self) {
        self.tallies.clear();
    }
}

#[cfg(test)]
mod unit_tests {
    use std::collections::HashMap;

    use super::{Tracker, Verdict};
    use crate::model::core_config::OfferThresholds;
    use crate::model::offer::{Tally, TriggerKind};

    fn tracker() -> Tracker {
        Tracker::new(OfferThresholds::default(), HashMap::new())
    }

    #[test]
    fn third_ad_view_is_due() {
        let mut tracker = tracker();
        assert_eq!(tracker.observe(TriggerKind::AdView), Verdict::Suppress);
        assert_eq!(tracker.observe(TriggerKind::AdView), Verdict::Suppress);
        assert_eq!(tracker.observe(TriggerKind::AdView), Verdict::Show);
    }

    #[test]
    fn shown_offer_is_throttled_until_threshold_passes_again() {
        let mut tracker = tracker();
        for _ in 0..3 {
            tracker.observe(TriggerKind::GameOver);
        }
        tracker.mark_shown(TriggerKind::GameOver);
        assert_eq!(tracker.check(TriggerKind::GameOver), Verdict::Suppress);

        assert_eq!(tracker.observe(TriggerKind::GameOver), Verdict::Suppress);
        assert_eq!(tracker.observe(TriggerKind::GameOver), Verdict::Suppress);
        assert_eq!(tracker.observe(TriggerKind::GameOver), Verdict::Show);
    }

    #[test]
    fn unshown_offer_stays_due() {
        let mut tracker = tracker();
        for _ in 0..3 {
            tracker.observe(TriggerKind::AdView);
        }
        assert_eq!(tracker.observe(TriggerKind::AdView), Verdict::Show);
        assert_eq!(tracker.tally(TriggerKind::AdView), Tally { count: 4, last_shown: 0 });
    }

    #[test]
    fn kinds_are_independent() {
        let mut tracker = tracker();
        tracker.observe(TriggerKind::AdView);
        tracker.observe(TriggerKind::AdView);
        assert_eq!(tracker.observe(TriggerKind::ShopEntry), Verdict::Show);
        assert_eq!(tracker.tally(TriggerKind::GameOver), Tally::default());
        assert_eq!(tracker.tally(TriggerKind::AdView).count, 2);
    }

    #[test]
    fn zero_threshold_is_treated_as_one() {
        let thresholds = OfferThresholds { ad_view: 0, game_over: 0, shop_entry: 0 };
        let mut tracker = Tracker::new(thresholds, HashMap::new());
        assert_eq!(tracker.observe(TriggerKind::ShopEntry), Verdict::Show);
        tracker.mark_shown(TriggerKind::ShopEntry);
        assert_eq!(tracker.check(TriggerKind::ShopEntry), Verdict::Suppress);
    }

    #[test]
    fn watermark_ahead_of_count_is_repaired() {
        let mut tallies = HashMap::new();
        tallies.insert(TriggerKind::AdView, Tally { count: 2, last_shown: 9 });
        let tracker = Tracker::new(OfferThresholds::default(), tallies);
        assert_eq!(tracker.tally(TriggerKind::AdView), Tally { count: 2, last_shown: 2 });
    }
}
