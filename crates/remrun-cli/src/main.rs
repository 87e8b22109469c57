use anyhow::{anyhow, Result};
use clap::Parser;
use log::LevelFilter;
use remrun_core::{
    ExecutionSession, Language, LanguageCatalog, RunnerConfig, SessionEvent,
};
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[clap(
    name = "remrun",
    author,
    version = "0.1.0",
    about = "Submit source code to a remote execution backend and print the output"
)]
struct Cli {
    /// Source file to execute
    file: Option<PathBuf>,

    #[clap(
        long,
        short,
        default_value = "python",
        help = "Language to run the code as: catalog id or name (e.g. 1, python, bash)"
    )]
    language: String,

    #[clap(long, help = "File whose contents are passed as standard input")]
    stdin_file: Option<PathBuf>,

    #[clap(
        long,
        short,
        default_value = "remrun.yaml",
        help = "Configuration file; defaults are used when the file does not exist"
    )]
    config: String,

    #[clap(long, help = "Override the submission endpoint origin")]
    submit_url: Option<String>,

    #[clap(long, help = "Override the result endpoint origin")]
    result_url: Option<String>,

    #[clap(long, short = 'L', default_value = "info")]
    log_level: String,

    #[clap(long, help = "List the language catalog and exit")]
    list_languages: bool,
}

fn resolve_language<'a>(catalog: &'a LanguageCatalog, selector: &str) -> Result<&'a Language> {
    let language = match selector.parse::<u32>() {
        Ok(id) => catalog.find(id)?,
        Err(_) => catalog.find_by_name(selector)?,
    };
    Ok(language)
}

async fn load_config(cli: &Cli) -> Result<RunnerConfig> {
    let mut config = if tokio::fs::try_exists(&cli.config).await.unwrap_or(false) {
        RunnerConfig::from_file(&cli.config).await?
    } else {
        log::debug!(
            "Configuration file {} not found, using defaults",
            cli.config
        );
        RunnerConfig::default()
    };

    if let Some(submit_url) = &cli.submit_url {
        config.submission_url = submit_url.clone();
    }
    if let Some(result_url) = &cli.result_url {
        config.result_url = result_url.clone();
    }
    config.validate()?;

    Ok(config)
}

fn print_catalog(catalog: &LanguageCatalog) {
    println!("{:<4} {:<12} {}", "id", "name", "file");
    for language in catalog.entries() {
        println!(
            "{:<4} {:<12} {}",
            language.id, language.name, language.file_name
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    if cli.list_languages {
        print_catalog(&LanguageCatalog::builtin());
        return Ok(());
    }

    let file = cli
        .file
        .as_ref()
        .ok_or_else(|| anyhow!("No source file given. Try `remrun main.py` or --list-languages."))?;

    let config = load_config(&cli).await?;
    let catalog = LanguageCatalog::builtin();
    let language = resolve_language(&catalog, &cli.language)?;
    let language_id = language.id;
    log::info!(
        "Running {} as {} (language id {})",
        file.display(),
        language.name,
        language_id
    );

    let source_code = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| anyhow!("Failed to read {}: {}", file.display(), e))?;

    let stdin = match &cli.stdin_file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?,
        None => String::new(),
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = ExecutionSession::new(&config)?.with_events(tx);

    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let SessionEvent::PhaseChanged(phase) = event {
                log::info!("Execution phase: {:?}", phase);
            }
        }
    });

    let result = session.execute(language_id, &source_code, &stdin).await;
    drop(session);
    let _ = progress.await;

    match result {
        Ok(output) => {
            use std::io::{self, Write};
            print!("{}", output);
            io::stdout().flush()?;
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.display_text());
            std::process::exit(1);
        }
    }
}
