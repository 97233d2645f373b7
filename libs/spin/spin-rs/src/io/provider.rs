use crate::model::catalog::Product;
use crate::model::errors::SpinErrKind;

/// The platform's in-app-purchase SDK (App Store, Google Play), as seen by the
/// engine. Implementations live in the host apps.
pub trait PurchaseProvider {
    /// Resolves once the store has charged the user and confirmed the purchase.
    async fn purchase(&self, product: Product) -> Result<(), ProviderError>;

    /// Product ids of everything the store says this user has bought.
    async fn restore_previous_purchases(&self) -> Result<Vec<String>, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The user backed out of the store sheet.
    Cancelled,
    /// Billing isn't reachable right now (offline, store outage).
    Unavailable(String),
    /// The store refused the purchase.
    Declined(String),
}

impl From<ProviderError> for SpinErrKind {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Cancelled => SpinErrKind::PurchaseCancelled,
            ProviderError::Unavailable(msg) | ProviderError::Declined(msg) => {
                SpinErrKind::ProviderFailure(msg)
            }
        }
    }
}
