use std::collections::HashMap;
use std::fmt;

use log::info;
use serde_json::json;

use crate::aws::batch::{JobDispatcher, JobQueue, JobSpec};
use crate::aws::config::ConfigProvider;
use crate::event::Event;
use crate::paths;
use crate::paths::JobPaths;
use crate::pipeline::{flag, shell_command, SubmitError, JOB_MEMORY_MIB, JOB_VCPUS};
use crate::response::Response;
use crate::validate::{fail, validate, ValidationError};

const PIPELINE_NAME: &str = "oncoanalyser";

const DEFINITION_ARN_KEY: &str = "/nextflow_stack/oncoanalyser/batch_job_definition_arn";
const BUCKET_KEY: &str = "/nextflow_stack/oncoanalyser/nf_bucket_name";
const VERSION_KEY: &str = "/nextflow_stack/oncoanalyser/pipeline_version_tag";

/// Fields required in every mode
const BASE_FIELDS: &[&str] = &["mode", "portal_run_id", "subject_id"];

/// Tumor/normal whole-genome inputs: sample, library and alignment for each
const WGS_FIELDS: &[&str] = &[
    "tumor_wgs_sample_id",
    "tumor_wgs_library_id",
    "tumor_wgs_bam",
    "normal_wgs_sample_id",
    "normal_wgs_library_id",
    "normal_wgs_bam",
];

/// Tumor whole-transcriptome inputs
const WTS_FIELDS: &[&str] = &[
    "tumor_wts_sample_id",
    "tumor_wts_library_id",
    "tumor_wts_bam",
];

/// Which combination of genomic and transcriptomic inputs a run uses.
///
/// Each mode carries its own required field set and its own command
/// fragments; the `Existing*` modes reuse partial results from a previous
/// run instead of recomputing them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Wgs,
    Wts,
    Wgts,
    WgtsExistingWgs,
    WgtsExistingWts,
    WgtsExistingBoth,
}

/// Mode names accepted in the `mode` field, in documentation order
pub const MODE_NAMES: &[&str] = &[
    "wgs",
    "wts",
    "wgts",
    "wgts_existing_wgs",
    "wgts_existing_wts",
    "wgts_existing_both",
];

impl Mode {
    pub fn parse(value: &str) -> Option<Mode> {
        match value {
            "wgs" => Some(Mode::Wgs),
            "wts" => Some(Mode::Wts),
            "wgts" => Some(Mode::Wgts),
            "wgts_existing_wgs" => Some(Mode::WgtsExistingWgs),
            "wgts_existing_wts" => Some(Mode::WgtsExistingWts),
            "wgts_existing_both" => Some(Mode::WgtsExistingBoth),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Wgs => "wgs",
            Mode::Wts => "wts",
            Mode::Wgts => "wgts",
            Mode::WgtsExistingWgs => "wgts_existing_wgs",
            Mode::WgtsExistingWts => "wgts_existing_wts",
            Mode::WgtsExistingBoth => "wgts_existing_both",
        }
    }

    fn takes_wgs_inputs(&self) -> bool {
        !matches!(self, Mode::Wts)
    }

    fn takes_wts_inputs(&self) -> bool {
        !matches!(self, Mode::Wgs)
    }

    fn reuses_wgs_results(&self) -> bool {
        matches!(self, Mode::WgtsExistingWgs | Mode::WgtsExistingBoth)
    }

    fn reuses_wts_results(&self) -> bool {
        matches!(self, Mode::WgtsExistingWts | Mode::WgtsExistingBoth)
    }

    /// The exact field set a request in this mode must carry
    pub fn required_fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = BASE_FIELDS.to_vec();
        if self.takes_wgs_inputs() {
            fields.extend_from_slice(WGS_FIELDS);
        }
        if self.takes_wts_inputs() {
            fields.extend_from_slice(WTS_FIELDS);
        }
        if self.reuses_wgs_results() {
            fields.push("existing_wgs_dir");
        }
        if self.reuses_wts_results() {
            fields.push("existing_wts_dir");
        }
        fields
    }

    /// Mode-dependent command fragments, after the shared leading flags
    fn command_components(&self, event: &Event) -> Vec<String> {
        let mut components = Vec::new();
        if self.takes_wgs_inputs() {
            components.extend(WGS_FIELDS.iter().map(|name| flag(name, &event[name])));
        }
        if self.takes_wts_inputs() {
            components.extend(WTS_FIELDS.iter().map(|name| flag(name, &event[name])));
        }
        if self.reuses_wgs_results() {
            let dir = paths::existing_run_dir(
                &event["existing_wgs_dir"],
                &event["subject_id"],
                &event["tumor_wgs_sample_id"],
            );
            components.push(flag("existing_wgs_dir", &dir));
        }
        if self.reuses_wts_results() {
            let dir = paths::existing_run_dir(
                &event["existing_wts_dir"],
                &event["subject_id"],
                &event["tumor_wts_sample_id"],
            );
            components.push(flag("existing_wts_dir", &dir));
        }
        components
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolve the request's mode before any field set check
fn resolve_mode(event: &Event) -> Result<Mode, ValidationError> {
    let Some(value) = event.get("mode") else {
        return Err(fail(ValidationError::MissingMode));
    };
    Mode::parse(value).ok_or_else(|| {
        fail(ValidationError::UnknownMode {
            mode: value.to_string(),
            allowed: MODE_NAMES,
        })
    })
}

/// Submit one oncoanalyser run.
///
/// Validation is two-staged: mode resolution first, then the exact field set
/// for the resolved mode. A request carrying fields that belong only to a
/// different mode is rejected.
pub async fn handle(
    event: &Event,
    config: &impl ConfigProvider,
    dispatcher: &impl JobDispatcher,
) -> Result<Response, SubmitError> {
    info!("Received event: {}", event.to_json());

    let mode = match resolve_mode(event) {
        Ok(mode) => mode,
        Err(err) => return Ok(Response::bad_request(err.to_string())),
    };
    if let Err(err) = validate(event, &mode.required_fields()) {
        return Ok(Response::bad_request(err.to_string()));
    }

    let bucket = config.get(BUCKET_KEY).await?;
    let job_paths = derive_paths(event, mode, &bucket);

    let spec = JobSpec {
        name: job_name(event, mode),
        queue: JobQueue::Standard,
        definition_arn: config.get(DEFINITION_ARN_KEY).await?,
        command: job_command(event, mode, &job_paths),
        memory_mib: JOB_MEMORY_MIB,
        vcpus: JOB_VCPUS,
        parameters: Some(job_parameters(event, mode, &job_paths, config.get(VERSION_KEY).await?)),
        tags: Some(job_tags(event)),
        propagate_tags: true,
    };
    info!("Compiled job data: {spec:?}");

    let job_id = dispatcher.submit(spec).await?;
    Ok(Response::ok(format!("Submitted job with ID {job_id}")))
}

/// Join the library ids present in the request, most significant first
fn library_id_string(event: &Event) -> String {
    ["tumor_wgs_library_id", "normal_wgs_library_id", "tumor_wts_library_id"]
        .iter()
        .filter_map(|name| event.get(name))
        .collect::<Vec<&str>>()
        .join("__")
}

fn derive_paths(event: &Event, mode: Mode, bucket: &str) -> JobPaths {
    let results_leaf = format!("{mode}/{}", library_id_string(event));
    paths::derive(
        bucket,
        PIPELINE_NAME,
        &event["subject_id"],
        &event["portal_run_id"],
        &results_leaf,
    )
}

fn job_name(event: &Event, mode: Mode) -> String {
    format!(
        "oncoanalyser__{mode}__{}__{}__{}",
        &event["subject_id"],
        library_id_string(event),
        &event["portal_run_id"],
    )
}

fn job_command(event: &Event, mode: Mode, job_paths: &JobPaths) -> Vec<String> {
    let mut components = vec![
        "./assets/run.sh".to_string(),
        flag("portal_run_id", &event["portal_run_id"]),
        flag("mode", mode.as_str()),
        flag("subject_id", &event["subject_id"]),
        flag("output_results_dir", &job_paths.results),
        flag("output_staging_dir", &job_paths.staging),
        flag("output_scratch_dir", &job_paths.scratch),
    ];
    components.extend(mode.command_components(event));
    shell_command(components)
}

fn job_parameters(
    event: &Event,
    mode: Mode,
    job_paths: &JobPaths,
    version: String,
) -> HashMap<String, String> {
    HashMap::from([
        ("portal_run_id".to_string(), event["portal_run_id"].to_string()),
        ("workflow".to_string(), format!("oncoanalyser_{mode}")),
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
        ("SubStack".to_string(), "OncoanalyserStack".to_string()),
        ("RunId".to_string(), event["portal_run_id"].to_string()),
    ])
}
