use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, OutputMode};

#[derive(Parser, Debug)]
#[command(name = "douyin_hot_search", version, about = "Fetch the Douyin hot search top 10")]
pub struct Cli {
    /// Where to send the ranking (defaults to `report.mode` from config).
    #[arg(long, value_enum)]
    pub output: Option<OutputMode>,

    /// Parent directory for the dated report folder.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Config file name, without extension.
    #[arg(long)]
    pub config: Option<String>,
}

impl Cli {
    /// Command-line values win over config file and environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(mode) = self.output {
            config.report.mode = mode;
        }
        if let Some(dir) = &self.output_dir {
            config.report.output_dir = dir.clone();
        }
    }
}
