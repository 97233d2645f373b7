pub mod billing;
pub mod debug;
pub mod entitlements;
pub mod logging;
pub mod offers;
