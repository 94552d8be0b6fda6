//! Storage location naming conventions shared by the pipelines.
//!
//! Every location lives under one bucket: final results under
//! `analysis_data/`, staging and scratch areas under `temp_data/`. All
//! derivations are pure string functions of the request.

/// The three output locations of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    pub results: String,
    pub staging: String,
    pub scratch: String,
}

/// Derive the output locations for one run.
///
/// `results_leaf` discriminates runs sharing a subject and run id (library
/// ids for sash, mode plus library ids for oncoanalyser); staging and
/// scratch are not library-specific.
pub fn derive(
    bucket: &str,
    pipeline: &str,
    subject_id: &str,
    portal_run_id: &str,
    results_leaf: &str,
) -> JobPaths {
    let temp = format!("s3://{bucket}/temp_data/{subject_id}/{pipeline}/{portal_run_id}");
    JobPaths {
        results: format!(
            "s3://{bucket}/analysis_data/{subject_id}/{pipeline}/{portal_run_id}/{results_leaf}"
        ),
        staging: format!("{temp}/staging"),
        scratch: format!("{temp}/scratch"),
    }
}

/// Locate a sample's results within a previous run's output directory.
///
/// Trailing separators on `dir` are stripped before the `{subject}_{sample}`
/// segment is appended, so callers may pass the directory with or without a
/// trailing slash.
pub fn existing_run_dir(dir: &str, subject_id: &str, sample_id: &str) -> String {
    format!(
        "{}/{subject_id}_{sample_id}/",
        dir.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_all_three_locations() {
        let paths = derive("nf-data", "sash", "SBJ00001", "20230530abcdefgh", "L1_L2");
        assert_eq!(
            paths.results,
            "s3://nf-data/analysis_data/SBJ00001/sash/20230530abcdefgh/L1_L2"
        );
        assert_eq!(
            paths.staging,
            "s3://nf-data/temp_data/SBJ00001/sash/20230530abcdefgh/staging"
        );
        assert_eq!(
            paths.scratch,
            "s3://nf-data/temp_data/SBJ00001/sash/20230530abcdefgh/scratch"
        );
    }

    #[test]
    fn derivation_is_idempotent() {
        let first = derive("b", "oncoanalyser", "S1", "R1", "wgs/L1");
        let second = derive("b", "oncoanalyser", "S1", "R1", "wgs/L1");
        assert_eq!(first, second);
    }

    #[test]
    fn existing_run_dir_appends_subject_and_sample() {
        assert_eq!(
            existing_run_dir("s3://bucket/path/", "S1", "P1"),
            "s3://bucket/path/S1_P1/"
        );
    }

    #[test]
    fn existing_run_dir_strips_all_trailing_separators() {
        assert_eq!(
            existing_run_dir("s3://bucket/path//", "S1", "P1"),
            "s3://bucket/path/S1_P1/"
        );
        assert_eq!(
            existing_run_dir("s3://bucket/path", "S1", "P1"),
            "s3://bucket/path/S1_P1/"
        );
    }
}
