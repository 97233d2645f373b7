use crate::io::Store;
use crate::logic::offers::select_offer;
use crate::logic::tracker::Verdict;
use crate::model::errors::Unexpected;
use crate::model::offer::{OfferDescriptor, OfferTrigger, Tally, TriggerKind};
use crate::Spin;

impl<P, S: Store> Spin<P, S> {
    /// An ad finished playing. Premium users don't see ads, so nothing is counted for them.
    #[instrument(level = "debug", skip(self))]
    pub fn ad_viewed(&mut self) -> Option<OfferDescriptor> {
        if self.is_premium() {
            return None;
        }
        self.observe(TriggerKind::AdView)
    }

    /// A round ended. Only counted for premium users, who get pack cross-sells.
    #[instrument(level = "debug", skip(self))]
    pub fn game_ended(&mut self) -> Option<OfferDescriptor> {
        if !self.is_premium() {
            return None;
        }
        self.observe(TriggerKind::GameOver)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn shop_entered(&mut self) -> Option<OfferDescriptor> {
        self.observe(TriggerKind::ShopEntry)
    }

    pub fn tally(&self, kind: TriggerKind) -> Tally {
        self.tracker.tally(kind)
    }

    /// The cross-sell queued by the last successful purchase, if any.
    pub fn take_follow_up_offer(&mut self) -> Option<OfferDescriptor> {
        self.follow_up.take()
    }

    fn observe(&mut self, kind: TriggerKind) -> Option<OfferDescriptor> {
        let offer = match self.tracker.observe(kind) {
            Verdict::Show => select_offer(OfferTrigger::Event(kind), &self.standing()),
            Verdict::Suppress => None,
        };

        if let Some(offer) = &offer {
            self.tracker.mark_shown(kind);
            debug!(offer = %offer.id, "showing offer");
        }

        let tally = self.tracker.tally(kind);
        self.store.record(kind, tally).log_and_ignore();

        offer
    }
}
