use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::catalog::{Pack, Unlock};
use crate::model::clock::{UnixTimeMillis, DAY_MILLIS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Tier {
    #[default]
    Free,
    /// Ads are removed.
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionKind {
    Lifetime,
    Monthly,
    Yearly,
}

impl SubscriptionKind {
    pub fn term(&self) -> Option<UnixTimeMillis> {
        match self {
            SubscriptionKind::Lifetime => None,
            SubscriptionKind::Monthly => Some(30 * DAY_MILLIS),
            SubscriptionKind::Yearly => Some(365 * DAY_MILLIS),
        }
    }
}

/// The stored premium record. Expiry is evaluated at read time and never
/// written back, so an expired subscription stays on disk as `Premium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserEntitlement {
    pub tier: Tier,
    /// `None` while `tier` is `Free`.
    pub kind: Option<SubscriptionKind>,
    /// `None` for lifetime grants.
    pub expiry: Option<UnixTimeMillis>,
}

impl UserEntitlement {
    pub fn granted(kind: SubscriptionKind, now: UnixTimeMillis) -> Self {
        Self {
            tier: Tier::Premium,
            kind: Some(kind),
            expiry: kind.term().map(|term| now.saturating_add(term)),
        }
    }

    pub fn is_premium_at(&self, now: UnixTimeMillis) -> bool {
        match self.tier {
            Tier::Free => false,
            Tier::Premium => self.expiry.map(|expiry| expiry >= now).unwrap_or(true),
        }
    }

    pub fn is_lifetime(&self) -> bool {
        self.tier == Tier::Premium && self.kind == Some(SubscriptionKind::Lifetime)
    }

    /// Folds another grant into this one, keeping whichever lasts longer. Lifetime
    /// outlasts every subscription, and an active subscription is never shortened.
    pub fn merge_grant(&self, kind: SubscriptionKind, now: UnixTimeMillis) -> Self {
        let incoming = Self::granted(kind, now);
        if self.is_lifetime() {
            return *self;
        }
        if !self.is_premium_at(now) {
            return incoming;
        }

        match (self.expiry, incoming.expiry) {
            (_, None) => incoming,
            (Some(current), Some(offered)) if offered > current => incoming,
            _ => *self,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PackOwnership {
    purchased: BTreeSet<Pack>,
    active: Pack,
}

impl PackOwnership {
    /// Rebuilds ownership from stored values, repairing an active pack that is
    /// no longer owned.
    pub fn from_parts(purchased: impl IntoIterator<Item = Pack>, active: Pack) -> Self {
        let purchased: BTreeSet<Pack> = purchased
            .into_iter()
            .filter(Pack::is_purchasable)
            .collect();
        let active = if active == Pack::Default || purchased.contains(&active) {
            active
        } else {
            warn!("stored active pack {active} is not owned, falling back to default");
            Pack::Default
        };

        Self { purchased, active }
    }

    pub fn owned(&self) -> BTreeSet<Pack> {
        let mut owned = self.purchased.clone();
        owned.insert(Pack::Default);
        owned
    }

    pub fn purchased(&self) -> &BTreeSet<Pack> {
        &self.purchased
    }

    pub fn purchased_count(&self) -> usize {
        self.purchased.len()
    }

    pub fn owns(&self, pack: Pack) -> bool {
        pack == Pack::Default || self.purchased.contains(&pack)
    }

    pub fn missing(&self) -> Vec<Pack> {
        Pack::PURCHASABLE
            .iter()
            .filter(|pack| !self.purchased.contains(pack))
            .copied()
            .collect()
    }

    pub fn owns_all(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn active(&self) -> Pack {
        self.active
    }

    /// Returns whether the pack was newly added.
    pub fn add(&mut self, pack: Pack) -> bool {
        pack.is_purchasable() && self.purchased.insert(pack)
    }

    /// Returns false, leaving the active pack alone, when `pack` isn't owned.
    pub fn activate(&mut self, pack: Pack) -> bool {
        if !self.owns(pack) {
            return false;
        }
        self.active = pack;
        true
    }
}

/// Premium status and pack ownership together, as one durable unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Holdings {
    pub entitlement: UserEntitlement,
    pub packs: PackOwnership,
}

impl Holdings {
    pub fn apply(&self, unlocks: &[Unlock], now: UnixTimeMillis) -> Self {
        let mut next = self.clone();
        for unlock in unlocks {
            match unlock {
                Unlock::Premium(kind) => {
                    next.entitlement = next.entitlement.merge_grant(*kind, now);
                }
                Unlock::Pack(pack) => {
                    next.packs.add(*pack);
                }
            }
        }
        next
    }

    /// Whether applying `unlocks` would give the user anything they don't
    /// effectively have right now.
    pub fn gains_from(&self, unlocks: &[Unlock], now: UnixTimeMillis) -> bool {
        unlocks.iter().any(|unlock| match unlock {
            Unlock::Premium(kind) => {
                !self.entitlement.is_premium_at(now)
                    || (*kind == SubscriptionKind::Lifetime && !self.entitlement.is_lifetime())
            }
            Unlock::Pack(pack) => !self.packs.owns(*pack),
        })
    }

    pub fn standing(&self, now: UnixTimeMillis) -> Standing {
        Standing {
            premium: self.entitlement.is_premium_at(now),
            missing_packs: self.packs.missing(),
        }
    }
}

/// What offer selection needs to know about a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub premium: bool,
    pub missing_packs: Vec<Pack>,
}

impl Standing {
    pub fn owned_extra_packs(&self) -> usize {
        Pack::PURCHASABLE.len() - self.missing_packs.len()
    }
}

#[cfg(test)]
mod unit_tests {
    use super::{Holdings, PackOwnership, SubscriptionKind, Tier, UserEntitlement};
    use crate::model::catalog::{Pack, Product};
    use crate::model::clock::DAY_MILLIS;

    #[test]
    fn monthly_grant_expires_after_thirty_days() {
        let now = 1_000;
        let entitlement = UserEntitlement::granted(SubscriptionKind::Monthly, now);

        assert_eq!(entitlement.tier, Tier::Premium);
        assert_eq!(entitlement.expiry, Some(now + 30 * DAY_MILLIS));
        assert!(entitlement.is_premium_at(now + 30 * DAY_MILLIS));
        assert!(!entitlement.is_premium_at(now + 30 * DAY_MILLIS + 1));
    }

    #[test]
    fn lifetime_grant_never_expires() {
        let entitlement = UserEntitlement::granted(SubscriptionKind::Lifetime, 5);
        assert_eq!(entitlement.expiry, None);
        assert!(entitlement.is_premium_at(u64::MAX));
    }

    #[test]
    fn subscription_does_not_replace_lifetime() {
        let lifetime = UserEntitlement::granted(SubscriptionKind::Lifetime, 5);
        assert_eq!(lifetime.merge_grant(SubscriptionKind::Monthly, 10), lifetime);
    }

    #[test]
    fn shorter_subscription_does_not_shorten_an_active_one() {
        let yearly = UserEntitlement::granted(SubscriptionKind::Yearly, 0);

        assert_eq!(yearly.merge_grant(SubscriptionKind::Monthly, 10 * DAY_MILLIS), yearly);

        let late = 340 * DAY_MILLIS;
        let renewed = yearly.merge_grant(SubscriptionKind::Monthly, late);
        assert_eq!(renewed.kind, Some(SubscriptionKind::Monthly));
        assert_eq!(renewed.expiry, Some(late + 30 * DAY_MILLIS));
    }

    #[test]
    fn merged_subscription_is_bounded_by_a_fresh_term() {
        let monthly = UserEntitlement::granted(SubscriptionKind::Monthly, 0);

        let merged = monthly
            .merge_grant(SubscriptionKind::Monthly, 5)
            .merge_grant(SubscriptionKind::Monthly, 5);

        assert_eq!(merged.expiry, Some(5 + 30 * DAY_MILLIS));
    }

    #[test]
    fn expired_subscription_is_replaced() {
        let yearly = UserEntitlement::granted(SubscriptionKind::Yearly, 0);
        let now = 400 * DAY_MILLIS;

        let merged = yearly.merge_grant(SubscriptionKind::Monthly, now);

        assert_eq!(merged, UserEntitlement::granted(SubscriptionKind::Monthly, now));
    }

    #[test]
    fn activating_unowned_pack_fails() {
        let mut packs = PackOwnership::default();
        assert!(!packs.activate(Pack::PackB));
        assert_eq!(packs.active(), Pack::Default);

        assert!(packs.add(Pack::PackB));
        assert!(packs.activate(Pack::PackB));
        assert_eq!(packs.active(), Pack::PackB);
    }

    #[test]
    fn default_pack_is_never_purchased() {
        let mut packs = PackOwnership::default();
        assert!(!packs.add(Pack::Default));
        assert_eq!(packs.purchased_count(), 0);
        assert!(packs.owned().contains(&Pack::Default));
    }

    #[test]
    fn stored_active_pack_must_be_owned() {
        let packs = PackOwnership::from_parts([Pack::PackA], Pack::PackB);
        assert_eq!(packs.active(), Pack::Default);
    }

    #[test]
    fn bundle_unlocks_apply_idempotently() {
        let holdings = Holdings::default();
        let unlocks = Product::EverythingBundle.unlocks();

        let once = holdings.apply(&unlocks, 0);
        let twice = once.apply(&unlocks, 0);

        assert_eq!(once, twice);
        assert!(once.packs.owns_all());
        assert!(once.entitlement.is_lifetime());
        assert!(!once.gains_from(&unlocks, 0));
    }
}
