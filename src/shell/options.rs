use std::path::PathBuf;

use clap::Parser;
use crate::prelude::*;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Line-oriented shell over named finite sets")]
pub struct SetShellOptions {
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Largest set the `powerset` command will enumerate.
    #[arg(short, long, default_value_t = 16)]
    pub max_power_set: usize,

    /// Read commands from this file instead of stdin.
    #[arg(short, long)]
    pub script: Option<PathBuf>,
}

impl Default for SetShellOptions {
    fn default() -> Self {
        SetShellOptions { log_level: None, max_power_set: 16, script: None }
    }
}

impl SetShellOptions {
    /// The effective power set cap; never wider than what enumeration supports at all.
    pub fn power_set_limit(&self) -> usize {
        self.max_power_set.min(MAX_POWER_SET_ELEMENTS)
    }
}
