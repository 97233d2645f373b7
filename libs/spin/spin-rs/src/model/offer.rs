use serde::{Deserialize, Serialize};

use crate::model::catalog::{Pack, Product};

/// A counted event that may surface an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    AdView,
    GameOver,
    ShopEntry,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 3] =
        [TriggerKind::AdView, TriggerKind::GameOver, TriggerKind::ShopEntry];
}

/// What produced an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferTrigger {
    Event(TriggerKind),
    /// Queued right after a successful purchase of this product.
    FollowUp(Product),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferAction {
    GoPremium,
    BuyAllRemainingPacks,
    BuyLastRemainingPack(Pack),
    BuyEverythingBundle,
    None,
}

impl OfferAction {
    /// The product the UI should hand to the store when this action is tapped.
    pub fn product(&self) -> Option<Product> {
        match self {
            OfferAction::GoPremium => Some(Product::RemoveAds),
            OfferAction::BuyAllRemainingPacks => Some(Product::AllPacks),
            OfferAction::BuyLastRemainingPack(pack) => Some(Product::PackOffer(*pack)),
            OfferAction::BuyEverythingBundle => Some(Product::EverythingBundle),
            OfferAction::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferButton {
    pub action: OfferAction,
    /// Display price, empty when nothing is for sale.
    pub price: String,
    pub best_deal: bool,
}

impl OfferButton {
    pub fn new(action: OfferAction) -> Self {
        let price = action
            .product()
            .map(|product| product.price().to_string())
            .unwrap_or_default();
        Self { action, price, best_deal: false }
    }

    pub fn best_deal(mut self) -> Self {
        self.best_deal = true;
        self
    }
}

/// An offer for the UI to render. Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferDescriptor {
    pub id: String,
    pub title: String,
    pub description: String,
    pub trigger: OfferTrigger,
    pub primary: OfferButton,
    pub secondary: Option<OfferButton>,
    /// Nothing left to buy; purely informational.
    pub is_terminal: bool,
}

/// Event count and the count at which an offer of this kind was last shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tally {
    pub count: u64,
    pub last_shown: u64,
}
