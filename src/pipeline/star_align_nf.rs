use log::info;

use crate::aws::batch::{JobDispatcher, JobQueue, JobSpec};
use crate::aws::config::ConfigProvider;
use crate::event::Event;
use crate::pipeline::{flag, shell_command, SubmitError, JOB_MEMORY_MIB, JOB_VCPUS};
use crate::response::Response;
use crate::validate::validate;

const DEFINITION_ARN_KEY: &str = "/nextflow_stack/star-align-nf/batch_job_definition_arn";

const REQUIRED_FIELDS: &[&str] = &[
    "portal_run_id",
    "subject_id",
    "sample_id",
    "library_id",
    "fastq_fwd",
    "fastq_rev",
];

/// Submit one star-align-nf run.
///
/// Alignment runs on the on-demand queue and carries no parameter or tag
/// metadata; downstream pipelines locate its output by convention.
pub async fn handle(
    event: &Event,
    config: &impl ConfigProvider,
    dispatcher: &impl JobDispatcher,
) -> Result<Response, SubmitError> {
    info!("Received event: {}", event.to_json());

    if let Err(err) = validate(event, REQUIRED_FIELDS) {
        return Ok(Response::bad_request(err.to_string()));
    }

    let spec = JobSpec {
        name: job_name(event),
        queue: JobQueue::OnDemand,
        definition_arn: config.get(DEFINITION_ARN_KEY).await?,
        command: job_command(event),
        memory_mib: JOB_MEMORY_MIB,
        vcpus: JOB_VCPUS,
        parameters: None,
        tags: None,
        propagate_tags: false,
    };
    info!("Compiled job data: {spec:?}");

    let job_id = dispatcher.submit(spec).await?;
    Ok(Response::ok(format!("Submitted job with ID {job_id}")))
}

fn job_name(event: &Event) -> String {
    format!(
        "star-align-nf__{}__{}",
        &event["subject_id"], &event["library_id"]
    )
}

fn job_command(event: &Event) -> Vec<String> {
    let components = vec![
        "./assets/run.sh".to_string(),
        flag("portal_run_id", &event["portal_run_id"]),
        flag("subject_id", &event["subject_id"]),
        flag("sample_id", &event["sample_id"]),
        flag("library_id", &event["library_id"]),
        flag("fastq_fwd", &event["fastq_fwd"]),
        flag("fastq_rev", &event["fastq_rev"]),
    ];
    shell_command(components)
}
