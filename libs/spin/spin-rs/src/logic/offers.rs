//! Offer selection. Everything here is a pure function of the trigger and the
//! user's standing; counting and throttling happen before these are called.

use crate::model::catalog::{Pack, Product};
use crate::model::entitlement::Standing;
use crate::model::offer::{OfferAction, OfferButton, OfferDescriptor, OfferTrigger, TriggerKind};

pub fn select_offer(trigger: OfferTrigger, standing: &Standing) -> Option<OfferDescriptor> {
    match trigger {
        OfferTrigger::Event(TriggerKind::AdView) if !standing.premium => {
            Some(premium_offer(trigger, standing))
        }
        OfferTrigger::Event(TriggerKind::ShopEntry) if !standing.premium => {
            Some(premium_offer(trigger, standing))
        }
        OfferTrigger::Event(TriggerKind::GameOver) if standing.premium => {
            pack_offer(trigger, standing)
        }
        OfferTrigger::Event(TriggerKind::ShopEntry) => {
            Some(pack_offer(trigger, standing).unwrap_or_else(|| collection_complete(trigger)))
        }
        // ads aren't shown to premium users and game over is premium only
        OfferTrigger::Event(TriggerKind::AdView) | OfferTrigger::Event(TriggerKind::GameOver) => {
            None
        }
        OfferTrigger::FollowUp(product) => follow_up_offer(product, standing),
    }
}

/// The single cross-sell to queue after `purchased` succeeded, evaluated
/// against the updated standing.
pub fn follow_up_offer(purchased: Product, standing: &Standing) -> Option<OfferDescriptor> {
    let trigger = OfferTrigger::FollowUp(purchased);

    if purchased == Product::EverythingBundle {
        return None;
    }

    if purchased.grants_premium() && standing.premium {
        return pack_offer(trigger, standing);
    }

    if purchased.grants_packs() && standing.missing_packs.is_empty() && !standing.premium {
        return Some(descriptor(
            trigger,
            "complete_remove_ads",
            "Complete the set",
            "You've unlocked every theme. Keep the party going without interruptions.",
            OfferButton::new(OfferAction::GoPremium),
            None,
        ));
    }

    None
}

fn premium_offer(trigger: OfferTrigger, standing: &Standing) -> OfferDescriptor {
    let prefix = prefix(trigger);

    match standing.owned_extra_packs() {
        0 => descriptor(
            trigger,
            &format!("{prefix}_premium_bundle"),
            "Remove ads",
            "No more breaks between rounds. Or grab every theme pack with it.",
            OfferButton::new(OfferAction::GoPremium),
            Some(OfferButton::new(OfferAction::BuyEverythingBundle).best_deal()),
        ),
        1 => descriptor(
            trigger,
            &format!("{prefix}_premium"),
            "Remove ads",
            "You've got style. Now lose the ads, forever.",
            OfferButton::new(OfferAction::GoPremium),
            None,
        ),
        _ => descriptor(
            trigger,
            &format!("{prefix}_premium_collector"),
            "Remove ads",
            "Every theme is yours. The ads are the last thing left to go.",
            OfferButton::new(OfferAction::GoPremium),
            None,
        ),
    }
}

fn pack_offer(trigger: OfferTrigger, standing: &Standing) -> Option<OfferDescriptor> {
    let prefix = prefix(trigger);

    match standing.missing_packs.as_slice() {
        [] => None,
        [last] => Some(descriptor(
            trigger,
            &format!("{prefix}_last_pack"),
            &format!("{} is waiting", last.display_name()),
            "One theme left to collect, now at a discount.",
            OfferButton::new(OfferAction::BuyLastRemainingPack(*last)),
            None,
        )),
        _ => Some(descriptor(
            trigger,
            &format!("{prefix}_all_packs"),
            "New looks for the wheel",
            &format!("Get {} together and save.", theme_list(&standing.missing_packs)),
            OfferButton::new(OfferAction::BuyAllRemainingPacks).best_deal(),
            None,
        )),
    }
}

fn collection_complete(trigger: OfferTrigger) -> OfferDescriptor {
    let mut offer = descriptor(
        trigger,
        "shop_complete",
        "You own it all",
        "No ads, every theme. Thanks for supporting the party!",
        OfferButton::new(OfferAction::None),
        None,
    );
    offer.is_terminal = true;
    offer
}

fn descriptor(
    trigger: OfferTrigger, id: &str, title: &str, description: &str, primary: OfferButton,
    secondary: Option<OfferButton>,
) -> OfferDescriptor {
    OfferDescriptor {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        trigger,
        primary,
        secondary,
        is_terminal: false,
    }
}

fn prefix(trigger: OfferTrigger) -> &'static str {
    match trigger {
        OfferTrigger::Event(TriggerKind::AdView) => "ad_view",
        OfferTrigger::Event(TriggerKind::GameOver) => "post_game",
        OfferTrigger::Event(TriggerKind::ShopEntry) => "shop",
        OfferTrigger::FollowUp(_) => "follow_up",
    }
}

fn theme_list(packs: &[Pack]) -> String {
    packs
        .iter()
        .map(|pack| pack.display_name())
        .collect::<Vec<_>>()
        .join(" and ")
}

#[cfg(test)]
mod unit_tests {
    use super::{follow_up_offer, select_offer};
    use crate::model::catalog::{Pack, Product};
    use crate::model::entitlement::Standing;
    use crate::model::offer::{OfferAction, OfferTrigger, TriggerKind};

    fn standing(premium: bool, missing: &[Pack]) -> Standing {
        Standing { premium, missing_packs: missing.to_vec() }
    }

    const AD_VIEW: OfferTrigger = OfferTrigger::Event(TriggerKind::AdView);
    const GAME_OVER: OfferTrigger = OfferTrigger::Event(TriggerKind::GameOver);
    const SHOP: OfferTrigger = OfferTrigger::Event(TriggerKind::ShopEntry);

    #[test]
    fn free_user_without_packs_gets_premium_and_bundle() {
        let offer = select_offer(AD_VIEW, &standing(false, &[Pack::PackA, Pack::PackB])).unwrap();

        assert_eq!(offer.primary.action, OfferAction::GoPremium);
        assert_eq!(offer.primary.price, "$2.99");
        assert!(!offer.primary.best_deal);

        let secondary = offer.secondary.unwrap();
        assert_eq!(secondary.action, OfferAction::BuyEverythingBundle);
        assert_eq!(secondary.price, "$6.99");
        assert!(secondary.best_deal);
    }

    #[test]
    fn free_user_with_some_packs_gets_premium_only() {
        for missing in [&[Pack::PackB][..], &[][..]] {
            let offer = select_offer(SHOP, &standing(false, missing)).unwrap();
            assert_eq!(offer.primary.action, OfferAction::GoPremium);
            assert_eq!(offer.secondary, None);
            assert!(!offer.is_terminal);
        }
    }

    #[test]
    fn premium_user_without_packs_gets_discounted_pair() {
        let offer =
            select_offer(GAME_OVER, &standing(true, &[Pack::PackA, Pack::PackB])).unwrap();
        assert_eq!(offer.primary.action, OfferAction::BuyAllRemainingPacks);
        assert!(offer.primary.best_deal);
        assert_eq!(offer.secondary, None);
    }

    #[test]
    fn premium_user_with_one_pack_gets_the_other() {
        let offer = select_offer(GAME_OVER, &standing(true, &[Pack::PackA])).unwrap();
        assert_eq!(offer.primary.action, OfferAction::BuyLastRemainingPack(Pack::PackA));
        assert_eq!(offer.primary.action.product(), Some(Product::PackOffer(Pack::PackA)));
        assert_eq!(offer.secondary, None);
    }

    #[test]
    fn complete_collection_yields_nothing_after_a_game() {
        assert_eq!(select_offer(GAME_OVER, &standing(true, &[])), None);
    }

    #[test]
    fn complete_collection_yields_terminal_panel_in_shop() {
        let offer = select_offer(SHOP, &standing(true, &[])).unwrap();
        assert!(offer.is_terminal);
        assert_eq!(offer.primary.action, OfferAction::None);
        assert_eq!(offer.primary.action.product(), None);
        assert_eq!(offer.secondary, None);
    }

    #[test]
    fn mismatched_tier_yields_nothing() {
        assert_eq!(select_offer(GAME_OVER, &standing(false, &[Pack::PackA])), None);
        assert_eq!(select_offer(AD_VIEW, &standing(true, &[Pack::PackA])), None);
    }

    #[test]
    fn premium_purchase_follows_up_with_packs() {
        let offer = follow_up_offer(Product::RemoveAds, &standing(true, &[Pack::PackB])).unwrap();
        assert_eq!(offer.trigger, OfferTrigger::FollowUp(Product::RemoveAds));
        assert_eq!(offer.primary.action, OfferAction::BuyLastRemainingPack(Pack::PackB));
    }

    #[test]
    fn last_pack_follows_up_with_premium() {
        let offer =
            follow_up_offer(Product::Pack(Pack::PackA), &standing(false, &[])).unwrap();
        assert_eq!(offer.primary.action, OfferAction::GoPremium);
    }

    #[test]
    fn partial_pack_purchase_queues_nothing() {
        let offer = follow_up_offer(Product::Pack(Pack::PackA), &standing(false, &[Pack::PackB]));
        assert_eq!(offer, None);
    }

    #[test]
    fn everything_bundle_queues_nothing() {
        assert_eq!(follow_up_offer(Product::EverythingBundle, &standing(true, &[])), None);
    }
}
