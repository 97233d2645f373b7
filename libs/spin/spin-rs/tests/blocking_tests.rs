use spin_rs::blocking;
use spin_rs::{OfferAction, Pack, Product, ProviderError, SpinErrKind, TriggerKind};
use test_utils::*;

fn blocking_spin() -> blocking::Spin<FakeProvider, FlakyStore> {
    blocking::Spin::from_spin(test_spin()).unwrap()
}

#[test]
fn blocking_purchase_and_offers() {
    let mut spin = blocking_spin();

    assert_eq!(spin.ad_viewed(), None);
    assert_eq!(spin.ad_viewed(), None);
    assert_eq!(spin.ad_viewed().unwrap().primary.action, OfferAction::GoPremium);

    spin.purchase(Product::RemoveAds).unwrap();
    assert!(spin.is_premium());
    assert!(spin.take_follow_up_offer().is_some());

    assert!(spin.purchase_requested("all_packs"));
    assert_eq!(spin.owned_packs().len(), 3);
    assert_eq!(spin.tally(TriggerKind::AdView).count, 3);
}

#[test]
fn blocking_errors_pass_through() {
    let mut spin = blocking_spin();

    assert!(!spin.set_active_pack(Pack::PackA).unwrap());
    spin.grant_premium(spin_rs::SubscriptionKind::Lifetime).unwrap();
    assert_eq!(err_kind(spin.revoke_premium()), SpinErrKind::IllegalDowngrade);
}

#[test]
fn blocking_restore_and_reset() {
    let provider = FakeProvider::default();
    provider.set_restorable(&["pack_a", "pack_b"]);
    let mut spin =
        blocking::Spin::from_spin(test_spin_with(test_config(), provider.clone())).unwrap();

    assert_eq!(spin.restore().unwrap(), 2);
    assert!(spin.set_active_pack(Pack::PackB).unwrap());

    provider.fail_with(ProviderError::Cancelled);
    assert!(!spin.restore_requested());

    assert!(spin.reset_requested());
    assert_eq!(spin.active_pack(), Pack::Default);
    assert!(spin.debug_info().unwrap().contains("\"active_pack\""));
}

#[test]
fn each_facade_drives_its_own_runtime() {
    let mut first = blocking_spin();
    let mut second = blocking_spin();

    first.purchase(Product::RemoveAds).unwrap();
    drop(first);

    second.purchase(Product::AllPacks).unwrap();
    assert!(!second.is_premium());
    assert_eq!(second.owned_packs().len(), 3);
}
