pub mod checkout;
pub mod names;
pub mod webhooks;
