//! stylecop-inject - add StyleCop references to an MSBuild project file

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod inject;

#[derive(Parser)]
#[command(name = "stylecop-inject")]
#[command(version)]
#[command(about = "Add StyleCop analyzer references to an MSBuild project file", long_about = None)]
struct Cli {
    /// Project file to edit (e.g. Assembly-CSharp.csproj)
    project: PathBuf,

    /// Directory containing Packages/ and ProjectSettings/ (defaults to the current directory)
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// TOML file overriding the package layout
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the edited project to FILE instead of stdout
    #[arg(short = 'o', long, conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Overwrite the project file
    #[arg(long)]
    in_place: bool,

    /// Do not reference the analyzer assemblies
    #[arg(long)]
    skip_analyzers: bool,

    /// Do not reference the rule set
    #[arg(long)]
    skip_rule_set: bool,

    /// Do not reference the JSON rule configuration
    #[arg(long)]
    skip_rules: bool,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout may carry the project XML
    let default_filter = if cli.verbose {
        "stylecop_cli=debug,stylecop_project=debug"
    } else {
        "stylecop_cli=info,stylecop_project=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let destination = match (cli.output, cli.in_place) {
        (Some(path), _) => inject::Destination::File(path),
        (None, true) => inject::Destination::File(cli.project.clone()),
        (None, false) => inject::Destination::Stdout,
    };

    let options = inject::InjectOptions {
        project: cli.project,
        project_root: cli.project_root,
        config: cli.config,
        skip_analyzers: cli.skip_analyzers,
        skip_rule_set: cli.skip_rule_set,
        skip_rules: cli.skip_rules,
    };

    let output = inject::run(&options)?;
    inject::write_output(&output, &destination)
}
