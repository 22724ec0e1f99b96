// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod solve;
pub mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AssistantConfig;

/// Learning assistant CLI
#[derive(Parser, Debug)]
#[command(name = "learning-assistant")]
#[command(version = crate::version::VERSION)]
#[command(about = "Photograph a question and read the solution aloud", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE", env = "LEARNING_ASSISTANT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the solve backend
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture one frame, solve it and print the answer
    Solve(solve::SolveArgs),

    /// List installed voices and mark the one used for solutions
    Voices {
        /// espeak-compatible program (defaults to the configured one)
        #[arg(long)]
        program: Option<String>,
    },

    /// List the configured camera devices and their facing modes
    Devices,

    /// Clean a raw backend answer read from FILE or stdin
    Sanitize {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Check that the solve backend is ready
    Health,
}

impl Cli {
    /// Configuration from file and environment with the global flags on top
    pub fn load_config(&self) -> Result<AssistantConfig> {
        let mut config = AssistantConfig::load(self.config.as_deref())?;
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        Ok(config)
    }
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = cli.load_config()?;

    match cli.command {
        Commands::Solve(args) => {
            args.apply(&mut config);
            solve::run(config).await
        }
        Commands::Voices { program } => {
            tools::list_voices(program.as_deref().unwrap_or(&config.speech.program)).await
        }
        Commands::Devices => tools::list_devices(&config),
        Commands::Sanitize { file } => tools::sanitize_input(file.as_deref(), config.render_mode),
        Commands::Health => tools::check_health(&config).await,
    }
}
