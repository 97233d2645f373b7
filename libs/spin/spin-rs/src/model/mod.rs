pub mod catalog;
pub mod clock;
pub mod core_config;
pub mod entitlement;
pub mod errors;
pub mod offer;
