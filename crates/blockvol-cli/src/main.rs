//! # bvol — blockvol CLI
//!
//! Operator tool for the node-local disk layer: resolve volume devices,
//! probe filesystems, format-and-mount, and inspect mount state.

mod commands;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
