//! The fixed catalog of theme packs and store products.
//!
//! Product ids are the identifiers registered with the platform stores. The
//! engine never trusts anything else the store says about a product: what a
//! purchase unlocks is decided here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::entitlement::SubscriptionKind;
use crate::model::errors::{SpinErr, SpinErrKind};

/// Cosmetic theme pack for the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Pack {
    #[default]
    Default,
    PackA,
    PackB,
}

impl Pack {
    /// Every pack that can be bought, in display order.
    pub const PURCHASABLE: [Pack; 2] = [Pack::PackA, Pack::PackB];

    pub fn id(&self) -> &'static str {
        match self {
            Pack::Default => "default",
            Pack::PackA => "pack_a",
            Pack::PackB => "pack_b",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Pack::Default => "Classic",
            Pack::PackA => "Neon Nights",
            Pack::PackB => "Beach Party",
        }
    }

    pub fn is_purchasable(&self) -> bool {
        !matches!(self, Pack::Default)
    }
}

impl fmt::Display for Pack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Pack {
    type Err = SpinErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Pack::Default),
            "pack_a" => Ok(Pack::PackA),
            "pack_b" => Ok(Pack::PackB),
            other => Err(SpinErrKind::UnknownProduct(other.to_string()).into()),
        }
    }
}

/// Something the platform store can sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    /// Lifetime ad removal.
    RemoveAds,
    RemoveAdsMonthly,
    RemoveAdsYearly,
    /// A single pack at full price.
    Pack(Pack),
    /// A single pack at the discounted follow-up price.
    PackOffer(Pack),
    /// Every purchasable pack, discounted.
    AllPacks,
    /// Lifetime ad removal plus every pack.
    EverythingBundle,
}

/// One unit of entitlement a product grants. Applying an unlock that is
/// already held is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unlock {
    Premium(SubscriptionKind),
    Pack(Pack),
}

impl Product {
    pub fn id(&self) -> String {
        match self {
            Product::RemoveAds => "remove_ads".to_string(),
            Product::RemoveAdsMonthly => "remove_ads_monthly".to_string(),
            Product::RemoveAdsYearly => "remove_ads_yearly".to_string(),
            Product::Pack(pack) => pack.id().to_string(),
            Product::PackOffer(pack) => format!("{}_offer", pack.id()),
            Product::AllPacks => "all_packs".to_string(),
            Product::EverythingBundle => "everything_bundle".to_string(),
        }
    }

    pub fn price(&self) -> &'static str {
        match self {
            Product::RemoveAds => "$2.99",
            Product::RemoveAdsMonthly => "$0.99",
            Product::RemoveAdsYearly => "$7.99",
            Product::Pack(_) => "$1.99",
            Product::PackOffer(_) => "$0.99",
            Product::AllPacks => "$2.99",
            Product::EverythingBundle => "$6.99",
        }
    }

    pub fn unlocks(&self) -> Vec<Unlock> {
        match self {
            Product::RemoveAds => vec![Unlock::Premium(SubscriptionKind::Lifetime)],
            Product::RemoveAdsMonthly => vec![Unlock::Premium(SubscriptionKind::Monthly)],
            Product::RemoveAdsYearly => vec![Unlock::Premium(SubscriptionKind::Yearly)],
            Product::Pack(pack) | Product::PackOffer(pack) => vec![Unlock::Pack(*pack)],
            Product::AllPacks => Pack::PURCHASABLE.iter().map(|p| Unlock::Pack(*p)).collect(),
            Product::EverythingBundle => {
                let mut unlocks = vec![Unlock::Premium(SubscriptionKind::Lifetime)];
                unlocks.extend(Pack::PURCHASABLE.iter().map(|p| Unlock::Pack(*p)));
                unlocks
            }
        }
    }

    pub fn grants_premium(&self) -> bool {
        self.unlocks()
            .iter()
            .any(|unlock| matches!(unlock, Unlock::Premium(_)))
    }

    pub fn grants_packs(&self) -> bool {
        self.unlocks()
            .iter()
            .any(|unlock| matches!(unlock, Unlock::Pack(_)))
    }

    pub fn is_subscription(&self) -> bool {
        matches!(self, Product::RemoveAdsMonthly | Product::RemoveAdsYearly)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Product {
    type Err = SpinErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let product = match s {
            "remove_ads" => Product::RemoveAds,
            "remove_ads_monthly" => Product::RemoveAdsMonthly,
            "remove_ads_yearly" => Product::RemoveAdsYearly,
            "all_packs" => Product::AllPacks,
            "everything_bundle" => Product::EverythingBundle,
            other => match other.strip_suffix("_offer") {
                Some(pack) => Product::PackOffer(pack.parse()?),
                None => Product::Pack(other.parse()?),
            },
        };

        match product {
            Product::Pack(Pack::Default) | Product::PackOffer(Pack::Default) => {
                Err(SpinErrKind::UnknownProduct(s.to_string()).into())
            }
            product => Ok(product),
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::{Pack, Product, Unlock};
    use crate::model::entitlement::SubscriptionKind;

    #[test]
    fn product_ids_parse_back() {
        let products = [
            Product::RemoveAds,
            Product::RemoveAdsMonthly,
            Product::RemoveAdsYearly,
            Product::Pack(Pack::PackA),
            Product::Pack(Pack::PackB),
            Product::PackOffer(Pack::PackB),
            Product::AllPacks,
            Product::EverythingBundle,
        ];

        for product in products {
            assert_eq!(product.id().parse::<Product>().unwrap(), product);
        }
    }

    #[test]
    fn default_pack_is_not_for_sale() {
        assert!("default".parse::<Product>().is_err());
        assert!("default_offer".parse::<Product>().is_err());
        assert!("coins_500".parse::<Product>().is_err());
    }

    #[test]
    fn everything_bundle_unlocks_premium_and_all_packs() {
        let unlocks = Product::EverythingBundle.unlocks();
        assert!(unlocks.contains(&Unlock::Premium(SubscriptionKind::Lifetime)));
        assert!(unlocks.contains(&Unlock::Pack(Pack::PackA)));
        assert!(unlocks.contains(&Unlock::Pack(Pack::PackB)));
        assert_eq!(unlocks.len(), 3);
    }
}
