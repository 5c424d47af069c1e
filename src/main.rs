use anyhow::Result;
use clap::{crate_version, App, Arg};
use gazette::build::build_site;
use gazette::config::Config;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = App::new("gazette")
        .version(crate_version!())
        .about("Turns newsletter drafts into static entry pages and a JSON index")
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .value_name("FILE")
                .takes_value(true)
                .help("The project file (defaults to the nearest gazette.yaml)"),
        )
        .arg(
            Arg::with_name("drafts")
                .long("drafts")
                .value_name("DIR")
                .takes_value(true)
                .help("The directory containing draft-*.md files"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .value_name("DIR")
                .takes_value(true)
                .help("The directory receiving the generated entries"),
        )
        .get_matches();

    let mut config = match matches.value_of("config") {
        Some(path) => Config::from_project_file(Path::new(path))?,
        None => Config::from_directory(Path::new("."))?,
    };
    if let Some(drafts) = matches.value_of("drafts") {
        config.drafts_directory = PathBuf::from(drafts);
    }
    if let Some(output) = matches.value_of("output") {
        config.output_directory = PathBuf::from(output);
    }

    let records = build_site(&config)?;
    tracing::info!(
        entries = records.len(),
        duplicates = records.iter().filter(|r| r.is_duplicate()).count(),
        "done"
    );
    Ok(())
}
