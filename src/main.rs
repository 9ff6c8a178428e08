use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vidpull::{
    cli::{self, Command},
    config::AppConfig,
    download::{DiskSink, Engine},
    history::HistoryStore,
    session::Session,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = cli::Cli::parse_args();
    let mut config = AppConfig::default();
    if let Some(base) = args.api_base {
        config.api_base = base;
    }
    if let Some(path) = args.history_path {
        config.history_path = path;
    }

    let history = Arc::new(HistoryStore::new(&config.history_path)?);

    match args.command {
        Command::Info { url } => {
            let engine = Engine::new(
                &config,
                Arc::clone(&history),
                DiskSink {
                    dir: config.download_dir.clone(),
                },
            );
            engine.resolve(&url).await?;
            if let Some(video) = engine.session().snapshot().video {
                println!("{}", video.title);
                for f in &video.formats {
                    println!("  {}\t{}", f.format_id, f.quality);
                }
            }
        }
        Command::Download {
            url,
            format,
            output,
        } => {
            if let Some(dir) = output {
                config.download_dir = dir;
            }
            let engine = Engine::new(
                &config,
                Arc::clone(&history),
                DiskSink {
                    dir: config.download_dir.clone(),
                },
            );
            engine.resolve(&url).await?;
            if let Some(id) = format {
                engine.select_format(&id)?;
            }

            let echo = spawn_progress_echo(engine.session().clone());
            let result = engine.download(&url).await;
            echo.abort();
            result?;

            if let Some(n) = engine.session().snapshot().notification {
                println!("{}", n.message);
            }
        }
        Command::History => {
            println!("{}", serde_json::to_string_pretty(&history.recent()?)?);
        }
    }

    Ok(())
}

/// Echo transfer progress while a download runs. Polls the session state the
/// same way any presentation layer would; aborted once the transfer returns.
fn spawn_progress_echo(session: Session) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut last = -1i64;
        loop {
            let state = session.snapshot();
            let rounded = state.progress_percent.round() as i64;
            if state.is_downloading && rounded != last {
                tracing::info!(percent = rounded, "downloading");
                last = rounded;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    })
}
