use std::collections::BTreeSet;

use crate::io::Store;
use crate::model::catalog::Pack;
use crate::model::entitlement::{Holdings, Standing, SubscriptionKind, UserEntitlement};
use crate::model::errors::{SpinErrKind, SpinResult};
use crate::Spin;

impl<P, S: Store> Spin<P, S> {
    /// Ads are removed and, for subscriptions, the term hasn't run out.
    pub fn is_premium(&self) -> bool {
        self.holdings.entitlement.is_premium_at(self.now())
    }

    /// The stored record, which may describe an expired subscription.
    pub fn entitlement(&self) -> UserEntitlement {
        self.holdings.entitlement
    }

    pub fn owned_packs(&self) -> BTreeSet<Pack> {
        self.holdings.packs.owned()
    }

    pub fn active_pack(&self) -> Pack {
        self.holdings.packs.active()
    }

    /// Overwrites the current grant, except that a lifetime grant can only be
    /// replaced by another lifetime grant.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub fn grant_premium(&mut self, kind: SubscriptionKind) -> SpinResult<()> {
        if self.holdings.entitlement.is_lifetime() && kind != SubscriptionKind::Lifetime {
            return Err(SpinErrKind::IllegalDowngrade.into());
        }

        let mut next = self.holdings.clone();
        next.entitlement = UserEntitlement::granted(kind, self.now());

        self.commit(next)?;
        info!(?kind, "premium granted");
        Ok(())
    }

    #[instrument(level = "debug", skip(self), err(Debug))]
    pub fn revoke_premium(&mut self) -> SpinResult<()> {
        if self.holdings.entitlement.is_lifetime() {
            return Err(SpinErrKind::IllegalDowngrade.into());
        }

        let mut next = self.holdings.clone();
        next.entitlement = UserEntitlement::default();

        self.commit(next)?;
        info!("premium revoked");
        Ok(())
    }

    /// Returns whether this was a new purchase. Buying a pack twice changes nothing.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub fn purchase_pack(&mut self, pack: Pack) -> SpinResult<bool> {
        let mut next = self.holdings.clone();
        if !next.packs.add(pack) {
            return Ok(false);
        }

        self.commit(next)?;
        info!(%pack, "pack unlocked");
        Ok(true)
    }

    /// Returns false, changing nothing, when the pack isn't owned.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub fn set_active_pack(&mut self, pack: Pack) -> SpinResult<bool> {
        let mut next = self.holdings.clone();
        if !next.packs.activate(pack) {
            warn!(%pack, "tried to activate a pack that isn't owned");
            return Ok(false);
        }

        if next != self.holdings {
            self.commit(next)?;
        }
        Ok(true)
    }

    /// Wipes entitlements, packs and offer counters back to a fresh install.
    #[instrument(level = "info", skip(self), err(Debug))]
    pub fn reset_all(&mut self) -> SpinResult<()> {
        self.store.clear()?;

        self.holdings = Holdings::default();
        self.tracker.reset();
        self.follow_up = None;

        info!("all purchases and offer history reset");
        Ok(())
    }

    pub fn reset_requested(&mut self) -> bool {
        match self.reset_all() {
            Ok(()) => true,
            Err(err) => {
                error!(?err, "reset failed");
                false
            }
        }
    }

    pub(crate) fn standing(&self) -> Standing {
        self.holdings.standing(self.now())
    }

    /// Durable write-through: memory only changes once the store has the new state.
    pub(crate) fn commit(&mut self, next: Holdings) -> SpinResult<()> {
        self.store.commit(&next)?;
        self.holdings = next;
        Ok(())
    }
}
