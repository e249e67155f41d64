//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod batch_repo;
pub mod customer_repo;
pub mod generated_name_repo;
pub mod generation_log_repo;
pub mod ip_quota_repo;
pub mod webhook_event_repo;

pub use batch_repo::BatchRepo;
pub use customer_repo::{CreditHistoryRepo, CustomerRepo};
pub use generated_name_repo::GeneratedNameRepo;
pub use generation_log_repo::GenerationLogRepo;
pub use ip_quota_repo::IpQuotaRepo;
pub use webhook_event_repo::WebhookEventRepo;
