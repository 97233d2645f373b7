use std::backtrace::Backtrace;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::panic::Location;
use std::sync::PoisonError;

use serde::{Serialize, Serializer};
use tracing::error;

pub type SpinResult<T> = Result<T, SpinErr>;

#[derive(Debug)]
pub struct SpinErr {
    pub kind: SpinErrKind,
    pub backtrace: Option<Backtrace>,
}

impl Serialize for SpinErr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.kind.to_string())
    }
}

impl Display for SpinErr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for SpinErr {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinErrKind {
    /// A lifetime grant can never be taken back.
    IllegalDowngrade,
    AlreadyPremium,
    /// The product would not unlock anything the user doesn't already own.
    AlreadyOwned,
    UnknownProduct(String),
    PurchaseCancelled,
    ProviderFailure(String),
    PersistenceFailure(String),
    Unexpected(String),
}

/// Every message here may end up in front of a player, so keep them short and
/// free of internals. `Unexpected` is the exception.
impl Display for SpinErrKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SpinErrKind::IllegalDowngrade => {
                write!(f, "A lifetime purchase cannot be removed")
            }
            SpinErrKind::AlreadyPremium => write!(f, "Ads are already removed on this device"),
            SpinErrKind::AlreadyOwned => write!(f, "You already own everything in that purchase"),
            SpinErrKind::UnknownProduct(id) => write!(f, "That product is not available: {id}"),
            SpinErrKind::PurchaseCancelled => write!(f, "The purchase was cancelled"),
            SpinErrKind::ProviderFailure(msg) => {
                write!(f, "The store could not complete the request, please try again: {msg}")
            }
            SpinErrKind::PersistenceFailure(msg) => {
                write!(f, "Your purchase could not be saved, please restore purchases: {msg}")
            }
            SpinErrKind::Unexpected(msg) => write!(f, "Unexpected error: {msg}"),
        }
    }
}

impl From<SpinErrKind> for SpinErr {
    fn from(kind: SpinErrKind) -> Self {
        Self { kind, backtrace: Some(Backtrace::force_capture()) }
    }
}

pub trait Unexpected<T> {
    fn log_and_ignore(self) -> Option<T>;
    fn map_unexpected(self) -> SpinResult<T>;
}

impl<T, E: fmt::Debug> Unexpected<T> for Result<T, E> {
    #[track_caller]
    fn map_unexpected(self) -> SpinResult<T> {
        let location = Location::caller();
        self.map_err(|err| {
            SpinErrKind::Unexpected(format!(
                "unexpected error at {}:{} {err:?}",
                location.file(),
                location.line(),
            ))
            .into()
        })
    }

    #[track_caller]
    fn log_and_ignore(self) -> Option<T> {
        let location = Location::caller();
        if let Err(e) = &self {
            error!("error ignored at {}:{} {e:?}", location.file(), location.line());
        }

        self.ok()
    }
}

pub fn core_err_unexpected<T: fmt::Debug>(err: T) -> SpinErrKind {
    SpinErrKind::Unexpected(format!("{:?}", err))
}

impl From<db_rs::DbError> for SpinErr {
    fn from(err: db_rs::DbError) -> Self {
        SpinErrKind::PersistenceFailure(format!("{:?}", err)).into()
    }
}

impl From<serde_json::Error> for SpinErr {
    fn from(err: serde_json::Error) -> Self {
        SpinErrKind::Unexpected(format!("{err}")).into()
    }
}

impl<G> From<PoisonError<G>> for SpinErr {
    fn from(err: PoisonError<G>) -> Self {
        core_err_unexpected(err).into()
    }
}

impl From<io::Error> for SpinErr {
    fn from(err: io::Error) -> Self {
        SpinErrKind::PersistenceFailure(format!("{err}")).into()
    }
}
