use std::collections::BTreeSet;

use tokio::runtime::Runtime;

use crate::io::{DiskStore, PurchaseProvider, Store};
use crate::model::catalog::{Pack, Product};
use crate::model::core_config::Config;
use crate::model::entitlement::{SubscriptionKind, UserEntitlement};
use crate::model::errors::{SpinResult, Unexpected};
use crate::model::offer::{OfferDescriptor, Tally, TriggerKind};

/// Runs the async operations to completion on a runtime it owns.
pub struct Spin<P, S = DiskStore> {
    spin: crate::Spin<P, S>,
    rt: Runtime,
}

impl<P: PurchaseProvider> Spin<P> {
    pub fn init(config: Config, provider: P) -> SpinResult<Self> {
        Self::from_spin(crate::Spin::init(config, provider)?)
    }
}

impl<P: PurchaseProvider, S: Store> Spin<P, S> {
    pub fn from_spin(spin: crate::Spin<P, S>) -> SpinResult<Self> {
        let rt = Runtime::new().map_unexpected()?;
        Ok(Self { spin, rt })
    }

    pub fn get_config(&self) -> Config {
        self.spin.config.clone()
    }

    pub fn is_premium(&self) -> bool {
        self.spin.is_premium()
    }

    pub fn entitlement(&self) -> UserEntitlement {
        self.spin.entitlement()
    }

    pub fn owned_packs(&self) -> BTreeSet<Pack> {
        self.spin.owned_packs()
    }

    pub fn active_pack(&self) -> Pack {
        self.spin.active_pack()
    }

    pub fn grant_premium(&mut self, kind: SubscriptionKind) -> SpinResult<()> {
        self.spin.grant_premium(kind)
    }

    pub fn revoke_premium(&mut self) -> SpinResult<()> {
        self.spin.revoke_premium()
    }

    pub fn purchase_pack(&mut self, pack: Pack) -> SpinResult<bool> {
        self.spin.purchase_pack(pack)
    }

    pub fn set_active_pack(&mut self, pack: Pack) -> SpinResult<bool> {
        self.spin.set_active_pack(pack)
    }

    pub fn reset_all(&mut self) -> SpinResult<()> {
        self.spin.reset_all()
    }

    pub fn ad_viewed(&mut self) -> Option<OfferDescriptor> {
        self.spin.ad_viewed()
    }

    pub fn game_ended(&mut self) -> Option<OfferDescriptor> {
        self.spin.game_ended()
    }

    pub fn shop_entered(&mut self) -> Option<OfferDescriptor> {
        self.spin.shop_entered()
    }

    pub fn tally(&self, kind: TriggerKind) -> Tally {
        self.spin.tally(kind)
    }

    pub fn take_follow_up_offer(&mut self) -> Option<OfferDescriptor> {
        self.spin.take_follow_up_offer()
    }

    pub fn purchase(&mut self, product: Product) -> SpinResult<()> {
        self.rt.block_on(self.spin.purchase(product))
    }

    pub fn restore(&mut self) -> SpinResult<usize> {
        self.rt.block_on(self.spin.restore())
    }

    pub fn purchase_requested(&mut self, product_id: &str) -> bool {
        self.rt.block_on(self.spin.purchase_requested(product_id))
    }

    pub fn restore_requested(&mut self) -> bool {
        self.rt.block_on(self.spin.restore_requested())
    }

    pub fn reset_requested(&mut self) -> bool {
        self.spin.reset_requested()
    }

    pub fn debug_info(&self) -> SpinResult<String> {
        self.spin.debug_info()
    }
}
