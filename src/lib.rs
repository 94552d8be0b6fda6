//! Submit nextflow pipeline runs to AWS Batch.
//!
//! Each pipeline (sash, star-align-nf, oncoanalyser) takes a small key-value
//! event describing one run, validates it against the pipeline's required
//! field set, derives output locations from naming conventions, assembles a
//! shell command line, and submits a single Batch job. Job definitions,
//! bucket names and pipeline versions are resolved from SSM at call time.

/// Key-value run request read from a JSON event
pub mod event;
/// Exact-field-set validation of run requests
pub mod validate;
/// Output, staging and scratch location naming conventions
pub mod paths;
/// Clients for the AWS services each submission talks to
pub mod aws;
/// Status response returned to the orchestrator
pub mod response;
/// One submodule per nextflow pipeline
pub mod pipeline;
