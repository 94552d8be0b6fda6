//! Clients for the external services each submission depends on.
//!
//! Both are exposed as narrow traits so handlers can be exercised with
//! in-memory doubles; the real implementations wrap rusoto clients built
//! from the default credential chain.

/// Resolve configuration values from SSM Parameter Store
pub mod config;
/// Submit jobs to AWS Batch
pub mod batch;
