//! The library behind purchases and promotions in the spin party game.
//!
//! Game clients (iOS, Android) hand every monetisation-relevant UI event to a
//! [Spin] and render whatever offer comes back.
//!
//! - Most clients will be interested in the functions attached to the [Spin] struct. See the
//!   [service] module for evolving this functionality.
//! - The [model] module contains the data structures: the product catalog, entitlements, offers,
//!   errors and configuration.
//! - The [logic] module contains the pure decision rules: when an offer is due and which one to
//!   show.
//! - The [io] module contains interactions with disk and the platform store.
//! - The [blocking] module contains blocking variants of the async [Spin] functions for hosts
//!   without an async runtime.

#[macro_use]
extern crate tracing;

pub mod blocking;
pub mod io;
pub mod logic;
pub mod model;
pub mod service;

/// The engine handle. One per player profile, owned by whatever drives the UI
/// event loop; every operation runs to completion before the next begins.
pub struct Spin<P, S = DiskStore> {
    pub config: Config,
    pub get_time: fn() -> UnixTimeMillis,
    pub(crate) store: S,
    pub(crate) provider: P,
    pub(crate) holdings: Holdings,
    pub(crate) tracker: Tracker,
    pub(crate) follow_up: Option<OfferDescriptor>,
}

impl<P: PurchaseProvider> Spin<P> {
    #[instrument(level = "info", skip_all, err(Debug))]
    pub fn init(config: Config, provider: P) -> SpinResult<Self> {
        logging::init(&config)?;

        let store = DiskStore::init(&config)?;

        Ok(Self::with_store(config, store, provider))
    }
}

impl<P, S: Store> Spin<P, S> {
    /// Loads state from `store`. Logging is left to the caller.
    pub fn with_store(config: Config, store: S, provider: P) -> Self {
        let holdings = store.holdings();
        let tracker = Tracker::new(config.thresholds, store.tallies());

        Self {
            config,
            get_time: clock::get_time,
            store,
            provider,
            holdings,
            tracker,
            follow_up: None,
        }
    }

    pub fn now(&self) -> UnixTimeMillis {
        (self.get_time)()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

pub fn get_code_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use io::{DiskStore, ProviderError, PurchaseProvider, Store};
use logic::tracker::Tracker;
pub use model::catalog::{Pack, Product};
use model::clock::{self, UnixTimeMillis};
pub use model::core_config::Config;
use model::entitlement::Holdings;
pub use model::entitlement::{SubscriptionKind, Tier, UserEntitlement};
pub use model::errors::{SpinErr, SpinErrKind, SpinResult};
pub use model::offer::{OfferAction, OfferDescriptor, OfferTrigger, Tally, TriggerKind};
use service::logging;
