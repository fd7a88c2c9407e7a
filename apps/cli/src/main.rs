mod args;
mod config;
mod output;
mod source;

use crate::args::{Cli, Command};
use addrmeta::domain::LookupKey;
use addrmeta::domain::config::AppSettings;
use addrmeta_logger::{LogFormat, Logger, parse_level};
use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = config::load_settings(cli.global.config.as_deref())
        .context("Critical: Configuration is malformed")?;
    config::apply_args(&mut settings, &cli.global);

    let _log = init_logger(&settings, cli.global.verbose)?;
    let as_json = cli.global.json;

    let (rendered, success) = match cli.command {
        Command::Keys { key } => (output::keys(&parse_key(&key)?, as_json), true),
        Command::Lookup { key } => {
            let supplier = source::build_supplier(&settings).await?;
            let resolution = supplier.resolve(&parse_key(&key)?).await;
            (output::resolution(&resolution, as_json), resolution.success)
        },
        Command::Preload { region } => {
            let region = parse_key(&region)?;
            let supplier = source::build_supplier(&settings).await?;
            let summary = supplier.preload(&region).await;
            (output::preload(&region, summary, as_json), summary.success)
        },
    };

    emit(&rendered);
    Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn parse_key(raw: &str) -> anyhow::Result<LookupKey> {
    LookupKey::from_key_string(raw).with_context(|| format!("Invalid key '{raw}'"))
}

fn init_logger(settings: &AppSettings, verbose: u8) -> anyhow::Result<Logger> {
    let format = if settings.log.json { LogFormat::Json } else { LogFormat::Compact };
    let builder = Logger::builder(env!("CARGO_BIN_NAME"))
        .level(parse_level(&settings.log.level)?)
        .verbosity(verbose)
        .format(format);

    let logger = match &settings.log.dir {
        Some(dir) => builder.files(dir).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}

#[allow(clippy::print_stdout)]
fn emit(rendered: &str) {
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
}
