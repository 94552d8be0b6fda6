use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;
use rusoto_core::Region;

use nf_batch_submit::aws::batch::BatchDispatcher;
use nf_batch_submit::aws::config::SsmConfig;
use nf_batch_submit::event::Event;
use nf_batch_submit::pipeline;
use nf_batch_submit::pipeline::PipelineKind;

/// Submit a nextflow pipeline run to AWS Batch from a JSON event file
#[derive(Debug, Parser)]
#[command(name = "nf-batch-submit", version, about)]
struct Args {
    /// Pipeline to submit the run against
    #[arg(long, value_enum)]
    pipeline: PipelineKind,
    /// Path to the JSON event describing the run
    #[arg(long)]
    event: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    info!("Submitting {} run from {}", args.pipeline, args.event.display());

    let event = Event::from_path(&args.event)?;
    let config = SsmConfig::new(Region::default())?;
    let dispatcher = BatchDispatcher::new(Region::default())?;

    let response = match args.pipeline {
        PipelineKind::Sash => pipeline::sash::handle(&event, &config, &dispatcher).await?,
        PipelineKind::StarAlignNf => {
            pipeline::star_align_nf::handle(&event, &config, &dispatcher).await?
        }
        PipelineKind::Oncoanalyser => {
            pipeline::oncoanalyser::handle(&event, &config, &dispatcher).await?
        }
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
