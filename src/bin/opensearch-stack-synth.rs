// Copyright (c) 2025 - Cowboy AI, Inc.
//! OpenSearch Stack Synthesizer
//!
//! Reads the deployment configuration from `.env` and the environment,
//! declares the OpenSearch stack and writes its CloudFormation template.
//!
//! Run with: cargo run --bin opensearch-stack-synth -- --output-dir cdk.out
//!
//! Required environment variables: see `.env.example`.

use anyhow::{Context, Result};
use aws_opensearch_stack::{
    render_pretty, write_template, ContextResolver, StackBuilder, StackConfig,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "opensearch-stack-synth")]
#[command(about = "Synthesize the OpenSearch domain stack template", long_about = None)]
struct Cli {
    /// Directory the template is written to
    #[arg(short, long, default_value = "cdk.out")]
    output_dir: PathBuf,

    /// Print the template to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Env file to read instead of `.env` in the working directory
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Cached VPC lookup context (JSON)
    #[arg(long, env = "STACK_CONTEXT_FILE")]
    context_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr so the template can be piped from stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.env_file {
        Some(path) => StackConfig::from_env_file(path),
        None => StackConfig::from_env(),
    }
    .context("Failed to load stack configuration")?;
    info!("Configuration loaded:");
    info!("  - Resource prefix: {}", config.resource_prefix);
    info!("  - Region: {}", config.deploy_region);
    info!("  - Environment: {}", config.deploy_environment);
    info!("  - VPC: {}", config.vpc_id);

    let builder = StackBuilder::new(&config);
    let declaration = match &cli.context_file {
        Some(path) => {
            let resolver = ContextResolver::from_file(path)
                .with_context(|| format!("Failed to load lookup context {}", path.display()))?;
            builder.with_resolver(resolver).build()
        }
        None => builder.build(),
    }
    .context("Failed to declare stack")?;

    if cli.stdout {
        println!("{}", render_pretty(&declaration)?);
    } else {
        let path = write_template(&declaration, &cli.output_dir)
            .context("Failed to write template")?;
        info!("Synthesized {} to {}", declaration.stack_name, path.display());
    }

    Ok(())
}
