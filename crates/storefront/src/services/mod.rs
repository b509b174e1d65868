//! Domain services that sit between routes and repositories.

pub mod cart_sync;
pub mod checkout;

pub use cart_sync::MergePlan;
pub use checkout::CheckoutError;
