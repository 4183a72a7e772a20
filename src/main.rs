use std::{fs::File, io::BufReader};

use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_sets::prelude::*;

fn main() -> Result<()> {
    // Initialize program options and environment; a missing .env file is fine.
    dotenvy::dotenv().ok();
    let options = SetShellOptions::parse();
    let _logger = Logger::try_with_env_or_str(options.log_level.clone().unwrap_or("info".into()).as_str())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(
            match cfg!(debug_assertions) {
                true => AdaptiveFormat::WithThread,
                _    => AdaptiveFormat::Default
            })
        .set_palette("b196;208;195;111;67".to_owned())
        .start()?;

    // Serve the shell over the script file or stdin.
    let script = options.script.clone();
    let mut shell = SetShell::stdio(options);
    let result = match script {
        Some(path) => File::open(&path)
            .with_context(|| format!("could not open script {}", path.display()))
            .and_then(|file| shell.run(BufReader::new(file))),
        None => shell.run(std::io::stdin().lock()),
    };

    if let Err(e) = &result {
        log::error!("fatal error: {}", e);
    }
    result
}
