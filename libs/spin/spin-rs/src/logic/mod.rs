pub mod offers;
pub mod tracker;
