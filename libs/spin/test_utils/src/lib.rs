use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use spin_rs::model::clock::{get_time, UnixTimeMillis, DAY_MILLIS};
use spin_rs::model::core_config::OfferThresholds;
use spin_rs::model::entitlement::Holdings;
use spin_rs::{
    Config, DiskStore, Product, ProviderError, PurchaseProvider, Spin, SpinErrKind, SpinResult,
    Store, Tally, TriggerKind,
};
use uuid::Uuid;

#[macro_export]
macro_rules! assert_matches (
    ($actual:expr, $expected:pat) => {
        // Only compute actual once
        let actual_value = $actual;
        match actual_value {
            $expected => {},
            _ => panic!("assertion failed: {:?} did not match expectation", actual_value)
        }
    }
);

pub type TestSpin = Spin<FakeProvider, FlakyStore>;

pub fn test_config() -> Config {
    Config {
        writeable_path: format!("/tmp/{}", Uuid::new_v4()),
        logs: false,
        stdout_logs: false,
        colored_logs: false,
        thresholds: OfferThresholds::default(),
    }
}

pub fn test_spin() -> TestSpin {
    test_spin_with(test_config(), FakeProvider::default())
}

/// Opens (or reopens) the store at `config.writeable_path`.
pub fn test_spin_with(config: Config, provider: FakeProvider) -> TestSpin {
    let store = FlakyStore::new(DiskStore::init(&config).unwrap());
    Spin::with_store(config, store, provider)
}

pub fn premium_spin() -> TestSpin {
    let mut spin = test_spin();
    spin.grant_premium(spin_rs::SubscriptionKind::Lifetime)
        .unwrap();
    spin
}

pub fn in_31_days() -> UnixTimeMillis {
    get_time() + 31 * DAY_MILLIS
}

pub fn in_366_days() -> UnixTimeMillis {
    get_time() + 366 * DAY_MILLIS
}

pub fn err_kind<T: std::fmt::Debug>(result: SpinResult<T>) -> SpinErrKind {
    result.unwrap_err().kind
}

#[derive(Default)]
struct FakeStoreFront {
    failure: Option<ProviderError>,
    restorable: Vec<String>,
    purchases: Vec<Product>,
}

/// A platform store that charges instantly unless told otherwise.
#[derive(Clone, Default)]
pub struct FakeProvider {
    inner: Arc<Mutex<FakeStoreFront>>,
}

impl FakeProvider {
    /// Every call fails with `err` until [FakeProvider::succeed] is called.
    pub fn fail_with(&self, err: ProviderError) {
        self.inner.lock().unwrap().failure = Some(err);
    }

    pub fn succeed(&self) {
        self.inner.lock().unwrap().failure = None;
    }

    pub fn set_restorable(&self, product_ids: &[&str]) {
        self.inner.lock().unwrap().restorable =
            product_ids.iter().map(|id| id.to_string()).collect();
    }

    /// Products the store actually charged for.
    pub fn purchases(&self) -> Vec<Product> {
        self.inner.lock().unwrap().purchases.clone()
    }
}

impl PurchaseProvider for FakeProvider {
    async fn purchase(&self, product: Product) -> Result<(), ProviderError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = &inner.failure {
            return Err(err.clone());
        }
        inner.purchases.push(product);
        Ok(())
    }

    async fn restore_previous_purchases(&self) -> Result<Vec<String>, ProviderError> {
        let inner = self.inner.lock().unwrap();
        if let Some(err) = &inner.failure {
            return Err(err.clone());
        }
        Ok(inner.restorable.clone())
    }
}

/// Wraps a real store with switches that make each write category fail on demand.
pub struct FlakyStore<S = DiskStore> {
    inner: S,
    fail_commits: Arc<AtomicBool>,
    fail_records: Arc<AtomicBool>,
}

impl<S: Store> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, fail_commits: Arc::default(), fail_records: Arc::default() }
    }

    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub fn fail_records(&self, fail: bool) {
        self.fail_records.store(fail, Ordering::SeqCst);
    }

    /// What's actually on disk, bypassing the engine's memory.
    pub fn persisted_holdings(&self) -> Holdings {
        self.inner.holdings()
    }

    pub fn persisted_tally(&self, kind: TriggerKind) -> Tally {
        self.inner
            .tallies()
            .get(&kind)
            .copied()
            .unwrap_or_default()
    }
}

impl<S: Store> Store for FlakyStore<S> {
    fn holdings(&self) -> Holdings {
        self.inner.holdings()
    }

    fn tallies(&self) -> HashMap<TriggerKind, Tally> {
        self.inner.tallies()
    }

    fn commit(&mut self, holdings: &Holdings) -> SpinResult<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(SpinErrKind::PersistenceFailure("injected commit failure".into()).into());
        }
        self.inner.commit(holdings)
    }

    fn clear(&mut self) -> SpinResult<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(SpinErrKind::PersistenceFailure("injected clear failure".into()).into());
        }
        self.inner.clear()
    }

    fn record(&mut self, kind: TriggerKind, tally: Tally) -> SpinResult<()> {
        if self.fail_records.load(Ordering::SeqCst) {
            return Err(SpinErrKind::PersistenceFailure("injected record failure".into()).into());
        }
        self.inner.record(kind, tally)
    }
}
