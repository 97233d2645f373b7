use crate::io::{PurchaseProvider, Store};
use crate::logic::offers::follow_up_offer;
use crate::model::catalog::Product;
use crate::model::errors::{SpinErrKind, SpinResult};
use crate::Spin;

impl<P: PurchaseProvider, S: Store> Spin<P, S> {
    /// SpinErrKind::AlreadyPremium,
    /// SpinErrKind::AlreadyOwned,
    /// SpinErrKind::PurchaseCancelled,
    /// SpinErrKind::ProviderFailure,
    /// SpinErrKind::PersistenceFailure,
    ///
    /// Everything the product unlocks is committed together, so a failure leaves
    /// entitlements exactly as they were. On success the follow-up offer for
    /// this purchase, if any, is queued for [Spin::take_follow_up_offer].
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn purchase(&mut self, product: Product) -> SpinResult<()> {
        let unlocks = product.unlocks();

        if product.is_subscription() && self.holdings.entitlement.is_lifetime() {
            return Err(SpinErrKind::AlreadyPremium.into());
        }

        if !self.holdings.gains_from(&unlocks, self.now()) {
            return Err(if product.grants_packs() {
                SpinErrKind::AlreadyOwned
            } else {
                SpinErrKind::AlreadyPremium
            }
            .into());
        }

        self.follow_up = None;

        self.provider
            .purchase(product)
            .await
            .map_err(SpinErrKind::from)?;

        let next = self.holdings.apply(&unlocks, self.now());
        self.commit(next)?;
        info!(%product, "purchase unlocked");

        self.follow_up = follow_up_offer(product, &self.standing());

        Ok(())
    }

    /// SpinErrKind::PurchaseCancelled,
    /// SpinErrKind::ProviderFailure,
    /// SpinErrKind::PersistenceFailure,
    ///
    /// Returns how many of the store's products were recognised.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn restore(&mut self) -> SpinResult<usize> {
        let product_ids = self
            .provider
            .restore_previous_purchases()
            .await
            .map_err(SpinErrKind::from)?;

        let now = self.now();
        let mut next = self.holdings.clone();
        let mut restored = 0;

        for id in &product_ids {
            match id.parse::<Product>() {
                Ok(product) => {
                    next = next.apply(&product.unlocks(), now);
                    restored += 1;
                }
                Err(err) => warn!(product_id = %id, %err, "skipping unrecognised product"),
            }
        }

        if next != self.holdings {
            self.commit(next)?;
        }
        info!(restored, "purchases restored");

        Ok(restored)
    }

    pub async fn purchase_requested(&mut self, product_id: &str) -> bool {
        let result = match product_id.parse::<Product>() {
            Ok(product) => self.purchase(product).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(product_id, %err, "purchase failed");
                false
            }
        }
    }

    pub async fn restore_requested(&mut self) -> bool {
        match self.restore().await {
            Ok(_) => true,
            Err(err) => {
                warn!(%err, "restore failed");
                false
            }
        }
    }
}
