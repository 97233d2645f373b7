use std::collections::{BTreeSet, HashMap};

use db_rs::{Db, LookupTable, Single};
use db_rs_derive::Schema;

use crate::model::catalog::Pack;
use crate::model::clock::UnixTimeMillis;
use crate::model::core_config::Config;
use crate::model::entitlement::{Holdings, PackOwnership, SubscriptionKind, Tier, UserEntitlement};
use crate::model::errors::SpinResult;
use crate::model::offer::{Tally, TriggerKind};

/// Persisted engine state. A missing value always reads as its default.
///
/// Writes come in two categories:
/// - durable: [Store::commit] and [Store::clear]. Callers report success only
///   after these return `Ok`, and a commit lands as a whole or not at all.
/// - best-effort: [Store::record]. Callers log failures and carry on.
pub trait Store {
    fn holdings(&self) -> Holdings;
    fn tallies(&self) -> HashMap<TriggerKind, Tally>;

    fn commit(&mut self, holdings: &Holdings) -> SpinResult<()>;
    fn clear(&mut self) -> SpinResult<()>;

    fn record(&mut self, kind: TriggerKind, tally: Tally) -> SpinResult<()>;
}

pub type SpinDb = SpinV1;

#[derive(Schema)]
pub struct SpinV1 {
    pub tier: Single<Tier>,
    pub subscription_kind: Single<SubscriptionKind>,
    pub expiry: Single<UnixTimeMillis>,
    pub owned_packs: Single<BTreeSet<Pack>>,
    pub active_pack: Single<Pack>,
    pub event_counts: LookupTable<TriggerKind, u64>,
    pub last_shown: LookupTable<TriggerKind, u64>,
}

pub struct DiskStore {
    db: SpinDb,
}

impl DiskStore {
    pub fn init(config: &Config) -> SpinResult<Self> {
        let db = SpinDb::init(db_rs::Config::in_folder(&config.writeable_path))?;
        Ok(Self { db })
    }
}

impl Store for DiskStore {
    fn holdings(&self) -> Holdings {
        let entitlement = UserEntitlement {
            tier: self.db.tier.get().copied().unwrap_or_default(),
            kind: self.db.subscription_kind.get().copied(),
            expiry: self.db.expiry.get().copied(),
        };
        let packs = PackOwnership::from_parts(
            self.db.owned_packs.get().cloned().unwrap_or_default(),
            self.db.active_pack.get().copied().unwrap_or_default(),
        );

        Holdings { entitlement, packs }
    }

    fn tallies(&self) -> HashMap<TriggerKind, Tally> {
        TriggerKind::ALL
            .iter()
            .map(|kind| {
                let tally = Tally {
                    count: self.db.event_counts.get().get(kind).copied().unwrap_or_default(),
                    last_shown: self.db.last_shown.get().get(kind).copied().unwrap_or_default(),
                };
                (*kind, tally)
            })
            .collect()
    }

    fn commit(&mut self, holdings: &Holdings) -> SpinResult<()> {
        let tx = self.db.begin_transaction()?;
        let entitlement = &holdings.entitlement;

        self.db.tier.insert(entitlement.tier)?;
        match entitlement.kind {
            Some(kind) => {
                self.db.subscription_kind.insert(kind)?;
            }
            None => {
                self.db.subscription_kind.clear()?;
            }
        }
        match entitlement.expiry {
            Some(expiry) => {
                self.db.expiry.insert(expiry)?;
            }
            None => {
                self.db.expiry.clear()?;
            }
        }
        self.db
            .owned_packs
            .insert(holdings.packs.purchased().clone())?;
        self.db.active_pack.insert(holdings.packs.active())?;

        tx.drop_safely()?;
        Ok(())
    }

    fn clear(&mut self) -> SpinResult<()> {
        let tx = self.db.begin_transaction()?;

        self.db.tier.clear()?;
        self.db.subscription_kind.clear()?;
        self.db.expiry.clear()?;
        self.db.owned_packs.clear()?;
        self.db.active_pack.clear()?;
        self.db.event_counts.clear()?;
        self.db.last_shown.clear()?;

        tx.drop_safely()?;
        Ok(())
    }

    fn record(&mut self, kind: TriggerKind, tally: Tally) -> SpinResult<()> {
        let tx = self.db.begin_transaction()?;

        self.db.event_counts.insert(kind, tally.count)?;
        self.db.last_shown.insert(kind, tally.last_shown)?;

        tx.drop_safely()?;
        Ok(())
    }
}
