use std::collections::HashMap;

use log::{error, info};
use rusoto_batch::{Batch, BatchClient, ContainerOverrides, ResourceRequirement, SubmitJobRequest};
use rusoto_core::{HttpClient, Region};
use rusoto_credential::ChainProvider;
use thiserror::Error;

/// The two queues the stack provisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobQueue {
    /// Spot-backed default queue
    Standard,
    /// On-demand queue for pipelines that can't tolerate interruption
    OnDemand,
}

impl JobQueue {
    pub fn name(&self) -> &'static str {
        match self {
            JobQueue::Standard => "nextflow-pipeline",
            JobQueue::OnDemand => "nextflow-pipeline-ondemand",
        }
    }
}

/// Everything needed to submit one pipeline run as a Batch job.
///
/// Built once per request from the validated event plus resolved
/// configuration, handed to a dispatcher, then discarded; the resulting
/// job's lifecycle is owned entirely by Batch.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    pub name: String,
    pub queue: JobQueue,
    pub definition_arn: String,
    pub command: Vec<String>,
    pub memory_mib: u32,
    pub vcpus: u32,
    pub parameters: Option<HashMap<String, String>>,
    pub tags: Option<HashMap<String, String>>,
    pub propagate_tags: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("job dispatch failed: {0}")]
pub struct DispatchError(pub String);

/// Accepts a job specification and returns the scheduler's job id.
///
/// Dispatch failures are not retried here; they propagate to the caller
/// unmodified.
#[allow(async_fn_in_trait)]
pub trait JobDispatcher {
    async fn submit(&self, spec: JobSpec) -> Result<String, DispatchError>;
}

/// AWS Batch implementation used in deployment
pub struct BatchDispatcher {
    client: BatchClient,
}

impl BatchDispatcher {
    pub fn new(region: Region) -> anyhow::Result<BatchDispatcher> {
        let client = BatchClient::new_with(HttpClient::new()?, ChainProvider::new(), region);
        Ok(BatchDispatcher { client })
    }
}

impl JobDispatcher for BatchDispatcher {
    async fn submit(&self, spec: JobSpec) -> Result<String, DispatchError> {
        let request = SubmitJobRequest {
            job_name: spec.name,
            job_queue: spec.queue.name().to_string(),
            job_definition: spec.definition_arn,
            container_overrides: Some(ContainerOverrides {
                command: Some(spec.command),
                resource_requirements: Some(vec![
                    ResourceRequirement {
                        type_: "MEMORY".to_string(),
                        value: spec.memory_mib.to_string(),
                    },
                    ResourceRequirement {
                        type_: "VCPU".to_string(),
                        value: spec.vcpus.to_string(),
                    },
                ]),
                ..Default::default()
            }),
            parameters: spec.parameters,
            tags: spec.tags,
            propagate_tags: spec.propagate_tags.then_some(true),
            ..Default::default()
        };

        let response = self
            .client
            .submit_job(request)
            .await
            .map_err(|err| {
                let err = DispatchError(err.to_string());
                error!("{err}");
                err
            })?;

        info!("Received job submission response: {response:?}");
        Ok(response.job_id)
    }
}
