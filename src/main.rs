//! # NALA Tutor
//!
//! Terminal client for the NALA learning platform: an interactive tutoring
//! chat and the daily-challenge workflow, with math-aware message rendering.
//!
//! ## Modes
//! - Single prompt with `-p` / `--prompt` (prints the reply and exits)
//! - Interactive TUI (default); `--continue` resumes the last conversation
//! - `--set-style` updates the stored learning-style profile

mod core;
mod tui;

use clap::Parser;
use dotenv::dotenv;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Terminal client for the NALA learning platform"
)]
struct Args {
    /// Send a single question to the tutor and print the reply
    #[arg(short = 'p', long)]
    prompt: Option<String>,

    /// Continue the most recent conversation
    #[arg(short = 'c', long = "continue")]
    continue_last: bool,

    /// Set the learning style on the stored profile and exit
    /// (interactor, architect, problem-solver, adventurer)
    #[arg(long, value_name = "STYLE")]
    set_style: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging (warn level by default; use RUST_LOG=debug for verbose)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init()
        .ok();

    let args = Args::parse();

    // Profile maintenance does not need the model endpoint configured.
    if let Some(style_name) = args.set_style {
        let Some(style) = core::profile::LearningStyle::from_name(&style_name) else {
            eprintln!(
                "Unknown learning style '{}'. Expected one of: {}",
                style_name,
                core::profile::LearningStyle::ALL
                    .iter()
                    .map(|s| s.display_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            std::process::exit(2);
        };
        let user_id = std::env::var("NALA_USER_ID")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        let mut profile = core::profile::load(user_id);
        profile.style = Some(style);
        core::profile::save(&profile)?;
        println!("Learning style set to {}", style.display_name());
        return Ok(());
    }

    let config = core::config::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let profile = core::profile::load(config.user_id);

    // Single prompt mode
    if let Some(prompt) = args.prompt {
        let outcome = core::llm::chat(core::llm::ChatRequest {
            config: &config,
            prompt: &prompt,
            previous_messages: None,
            profile: &profile,
            challenge: None,
            on_content_chunk: None,
            cancel_token: None,
        })
        .await?;
        println!("{}", outcome.content);
        return Ok(());
    }

    // Default behavior: open the TUI (interactive chat).
    // Spawns a blocking thread to avoid runtime contention.
    let config = std::sync::Arc::new(config);
    let config_clone = config.clone();
    let resume = args.continue_last;
    let join_result: Result<std::io::Result<()>, tokio::task::JoinError> =
        tokio::task::spawn_blocking(move || tui::run(config_clone, profile, resume)).await;

    // Surface the actual panic message for debugging if the TUI thread died.
    match join_result {
        Ok(io_result) => io_result?,
        Err(join_err) => {
            if let Ok(panic) = join_err.try_into_panic() {
                let msg = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    format!("{:?}", panic)
                };
                eprintln!("TUI panic: {}", msg);
            }
            return Err(Box::new(std::io::Error::other("TUI thread panicked"))
                as Box<dyn std::error::Error>);
        }
    }

    Ok(())
}
