use clap::Parser;
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use newsbot::cli::{ChatInput, Cli, Command, next_chat_line, parse_chat_line};
use newsbot::config::Settings;
use newsbot::outputs::console::{render_answer, render_batch, render_batch_json};
use newsbot::session::DefaultSession;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args.config, ?args.source, "Parsed CLI arguments");

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply_overrides(&mut settings);
    settings.validate()?;

    let secrets = match args.secrets().require(settings.source) {
        Ok(secrets) => secrets,
        Err(e) => {
            error!(error = %e, "Cannot start without required secrets");
            return Err(e.into());
        }
    };

    let session = DefaultSession::from_settings(&settings, &secrets)?;

    match args.command() {
        Command::Headlines { json } => {
            let batch = session.headlines().await;
            if json {
                println!("{}", render_batch_json(&batch)?);
            } else {
                print!("{}", render_batch(&batch));
            }
        }
        Command::Ask { question } => {
            print!("{}", render_batch(&*session.headlines().await));
            let exchange = session.ask(&question.join(" ")).await;
            print!("{}", render_answer(&exchange));
        }
        Command::Chat => chat(&session).await?,
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}

/// Read questions from stdin until `/quit` or end of input.
async fn chat(session: &DefaultSession) -> Result<(), Box<dyn Error>> {
    print!("{}", render_batch(&*session.headlines().await));
    println!("Ask a question about the news (/refresh to refetch, /quit to leave).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = next_chat_line(&mut lines).await? {
        match parse_chat_line(&line) {
            ChatInput::Skip => {}
            ChatInput::Quit => break,
            ChatInput::Refresh => print!("{}", render_batch(&*session.refresh().await)),
            ChatInput::Question(question) => {
                print!("{}", render_answer(&session.ask(question).await))
            }
        }
    }
    Ok(())
}
