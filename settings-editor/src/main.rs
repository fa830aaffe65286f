use std::io;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use objconf::Format;
use settings_editor::{
    commands::{CommandHandler, SettingsCommand, SettingsKind},
    ctx::{AppContext, ContextOptions},
};

#[derive(Parser)]
#[command(name = "settings-editor", version)]
#[command(about = "Inspect and edit typed settings files")]
struct Cli {
    /// Settings directory; `${env:VAR}` placeholders are expanded.
    /// Defaults to the executable's directory.
    #[arg(short, long, global = true, env = "SETTINGS_DIR")]
    dir: Option<String>,

    /// File format: toml or json.
    #[arg(short, long, global = true)]
    format: Option<Format>,

    /// Record type of the settings file.
    #[arg(short, long, global = true, value_enum, default_value_t)]
    kind: SettingsKind,

    /// Property that labels tree nodes.
    #[arg(long, global = true)]
    label: Option<String>,

    /// Refuse settings names that would leave the settings directory.
    #[arg(long, global = true)]
    strict_names: bool,

    #[command(subcommand)]
    command: SettingsCommand,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::new(ContextOptions {
        dir: cli.dir,
        format: cli.format,
        strict_names: cli.strict_names,
        label: cli.label,
    })?;

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    CommandHandler::handle(&ctx, cli.kind, cli.command, &mut input, &mut output)
}
