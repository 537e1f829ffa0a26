use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use yeonhaeng_backend::config;
use yeonhaeng_backend::logging;
use yeonhaeng_backend::module::archive::{QueryPipeline, RelayClient};
use yeonhaeng_frontend::app::{App, Outcome};
use yeonhaeng_frontend::render;

const PROMPT: &str = "> ";

fn print_screen(screen: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", screen)?;
    write!(stdout, "{}", PROMPT)?;
    stdout.flush()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let from_file = config::read_config()?;
    let app_config = config::config();

    let _logging_guard = logging::init_logging(&app_config.log_dir, "yeonhaeng", &app_config.log_level)?;

    tracing::info!("Yeonhaeng starting...");
    if !from_file {
        tracing::info!("No config file at {:?}, using defaults", config::config_path());
    }
    tracing::info!(
        "Archive corpus {} via {}",
        app_config.archive.corpus_scope,
        app_config.archive.relay_url
    );

    let client = RelayClient::new(app_config.archive.clone())?;
    let pipeline = QueryPipeline::new(Arc::new(client), &app_config.archive);
    let mut changes = pipeline.subscribe();
    let mut app = App::new(pipeline.clone(), app_config.clone());

    println!("{}", render::render_help());
    app.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = pipeline.snapshot().await;
                print_screen(&render::render_screen(&state))?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match app.handle_line(&line).await {
                    Outcome::Quit => break,
                    Outcome::Continue(Some(message)) => print_screen(&message)?,
                    Outcome::Continue(None) => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received.");
                break;
            }
        }
    }

    tracing::info!("Yeonhaeng stopped.");
    Ok(())
}
