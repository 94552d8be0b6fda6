//! One submission handler per nextflow pipeline.
//!
//! Each handler validates the event against its pipeline's required field
//! set, synthesizes the `run.sh` command line, and submits a single Batch
//! job. Validation failures produce a 400 response before any external call
//! is made; configuration and dispatch failures propagate unmodified.

use std::fmt;

use clap::ValueEnum;
use thiserror::Error;

use crate::aws::batch::DispatchError;
use crate::aws::config::ConfigError;

/// Tumor/normal somatic variant calling and reporting
pub mod sash;
/// Transcriptome alignment
pub mod star_align_nf;
/// Multi-modal WGS/WTS combined analysis
pub mod oncoanalyser;

/// Memory requested for every submission container, in MiB
const JOB_MEMORY_MIB: u32 = 15000;
/// vCPUs requested for every submission container
const JOB_VCPUS: u32 = 2;

/// Failure of an external collaborator after validation passed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum PipelineKind {
    Sash,
    StarAlignNf,
    Oncoanalyser,
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineKind::Sash => write!(f, "sash"),
            PipelineKind::StarAlignNf => write!(f, "star-align-nf"),
            PipelineKind::Oncoanalyser => write!(f, "oncoanalyser"),
        }
    }
}

/// Render one `--name value` command component
fn flag(name: &str, value: &str) -> String {
    format!("--{name} {value}")
}

/// Wrap command components as a single shell invocation.
///
/// The components are space-joined and passed as one script argument, with
/// pipefail set so a failure in any piped stage fails the job.
fn shell_command(components: Vec<String>) -> Vec<String> {
    vec![
        "bash".to_string(),
        "-o".to_string(),
        "pipefail".to_string(),
        "-c".to_string(),
        components.join(" "),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::aws::batch::{DispatchError, JobDispatcher, JobSpec};
    use crate::aws::config::{ConfigError, ConfigProvider};

    /// In-memory stand-in for Parameter Store
    pub struct MemoryConfig {
        values: HashMap<String, String>,
    }

    impl MemoryConfig {
        pub fn new(values: &[(&str, &str)]) -> MemoryConfig {
            MemoryConfig {
                values: values
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl ConfigProvider for MemoryConfig {
        async fn get(&self, name: &str) -> Result<String, ConfigError> {
            self.values
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::NotFound(name.to_string()))
        }
    }

    /// Records submitted specs and hands back a fixed job id
    #[derive(Default)]
    pub struct RecordingDispatcher {
        pub submitted: RefCell<Vec<JobSpec>>,
    }

    impl JobDispatcher for RecordingDispatcher {
        async fn submit(&self, spec: JobSpec) -> Result<String, DispatchError> {
            self.submitted.borrow_mut().push(spec);
            Ok("job-0000".to_string())
        }
    }

    /// Always fails, for exercising dispatch error propagation
    pub struct FailingDispatcher;

    impl JobDispatcher for FailingDispatcher {
        async fn submit(&self, _spec: JobSpec) -> Result<String, DispatchError> {
            Err(DispatchError("quota exceeded".to_string()))
        }
    }

    /// The script argument of a pipefail-wrapped command
    pub fn script(command: &[String]) -> &str {
        assert_eq!(&command[..4], &["bash", "-o", "pipefail", "-c"]);
        &command[4]
    }
}
