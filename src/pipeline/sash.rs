use std::collections::HashMap;

use log::info;
use serde_json::json;

use crate::aws::batch::{JobDispatcher, JobQueue, JobSpec};
use crate::aws::config::ConfigProvider;
use crate::event::Event;
use crate::paths;
use crate::paths::JobPaths;
use crate::pipeline::{flag, shell_command, SubmitError, JOB_MEMORY_MIB, JOB_VCPUS};
use crate::response::Response;
use crate::validate::validate;

const PIPELINE_NAME: &str = "sash";

const DEFINITION_ARN_KEY: &str = "/nextflow_stack/sash/batch_job_definition_arn";
const BUCKET_KEY: &str = "/nextflow_stack/sash/nf_bucket_name";
const VERSION_KEY: &str = "/nextflow_stack/sash/pipeline_version_tag";

const REQUIRED_FIELDS: &[&str] = &[
    "portal_run_id",
    "subject_id",
    "tumor_sample_id",
    "tumor_library_id",
    "normal_sample_id",
    "normal_library_id",
    "dragen_somatic_dir",
    "dragen_germline_dir",
    "oncoanalyser_dir",
];

/// Submit one sash run.
///
/// Somatic reporting over a tumor/normal pair: takes the DRAGEN somatic and
/// germline output directories plus the matching oncoanalyser run directory,
/// and publishes under a `{tumor_library}_{normal_library}` results leaf.
pub async fn handle(
    event: &Event,
    config: &impl ConfigProvider,
    dispatcher: &impl JobDispatcher,
) -> Result<Response, SubmitError> {
    info!("Received event: {}", event.to_json());

    if let Err(err) = validate(event, REQUIRED_FIELDS) {
        return Ok(Response::bad_request(err.to_string()));
    }

    let bucket = config.get(BUCKET_KEY).await?;
    let job_paths = derive_paths(event, &bucket);

    let spec = JobSpec {
        name: job_name(event),
        queue: JobQueue::Standard,
        definition_arn: config.get(DEFINITION_ARN_KEY).await?,
        command: job_command(event, &job_paths),
        memory_mib: JOB_MEMORY_MIB,
        vcpus: JOB_VCPUS,
        parameters: Some(job_parameters(event, &job_paths, config.get(VERSION_KEY).await?)),
        tags: Some(job_tags(event)),
        propagate_tags: true,
    };
    info!("Compiled job data: {spec:?}");

    let job_id = dispatcher.submit(spec).await?;
    Ok(Response::ok(format!("Submitted job with ID {job_id}")))
}

fn derive_paths(event: &Event, bucket: &str) -> JobPaths {
    let results_leaf = format!(
        "{}_{}",
        &event["tumor_library_id"], &event["normal_library_id"]
    );
    paths::derive(
        bucket,
        PIPELINE_NAME,
        &event["subject_id"],
        &event["portal_run_id"],
        &results_leaf,
    )
}

fn job_name(event: &Event) -> String {
    format!(
        "sash__{}__{}__{}__{}",
        &event["subject_id"],
        &event["tumor_library_id"],
        &event["normal_library_id"],
        &event["portal_run_id"],
    )
}

fn job_command(event: &Event, job_paths: &JobPaths) -> Vec<String> {
    let oncoanalyser_dir = paths::existing_run_dir(
        &event["oncoanalyser_dir"],
        &event["subject_id"],
        &event["tumor_sample_id"],
    );

    let components = vec![
        "./assets/run.sh".to_string(),
        flag("subject_id", &event["subject_id"]),
        flag("tumor_sample_id", &event["tumor_sample_id"]),
        flag("tumor_library_id", &event["tumor_library_id"]),
        flag("normal_sample_id", &event["normal_sample_id"]),
        flag("normal_library_id", &event["normal_library_id"]),
        flag("dragen_somatic_dir", &event["dragen_somatic_dir"]),
        flag("dragen_germline_dir", &event["dragen_germline_dir"]),
        flag("oncoanalyser_dir", &oncoanalyser_dir),
        flag("output_results_dir", &job_paths.results),
        flag("output_staging_dir", &job_paths.staging),
        flag("output_scratch_dir", &job_paths.scratch),
    ];
    shell_command(components)
}

fn job_parameters(event: &Event, job_paths: &JobPaths, version: String) -> HashMap<String, String> {
    HashMap::from([
        ("portal_run_id".to_string(), event["portal_run_id"].to_string()),
        ("workflow".to_string(), PIPELINE_NAME.to_string()),
        ("version".to_string(), version),
        (
            "output".to_string(),
            json!({"output_directory": job_paths.results}).to_string(),
        ),
    ])
}

fn job_tags(event: &Event) -> HashMap<String, String> {
    HashMap::from([
        ("Stack".to_string(), "NextflowStack".to_string()),
        ("SubStack".to_string(), "SashStack".to_string()),
        ("RunId".to_string(), event["portal_run_id"].to_string()),
    ])
}
