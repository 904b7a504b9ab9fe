//! TUI: tutor chat and daily-challenge views over a shared event loop.

mod app;
mod constants;
mod draw;
mod handlers;
mod math;
mod syntax;
mod text;

use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use crossterm::event::{self, Event};
use crossterm::execute;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::core::challenges::{
    ApiError, Challenge, ChallengeClient, ChallengeStats, SubmittedAttempt,
};
use crate::core::config::Config;
use crate::core::profile::LearningProfile;
use crate::core::{history, llm, stats};

use app::{App, View, format_time_spent};
use handlers::Action;

/// Attempt score recorded when the assessment reply carries no parsable
/// `Assessment: NN%` line.
const FALLBACK_SCORE: u32 = 75;

struct PendingChat {
    target: View,
    stream_rx: mpsc::Receiver<String>,
    result_rx: mpsc::Receiver<Result<llm::ChatOutcome, llm::ChatError>>,
    cancel: CancellationToken,
}

type FetchResult = Result<(Option<Challenge>, Option<ChallengeStats>), String>;
type SubmitResult = Result<SubmittedAttempt, String>;

/// Fetch today's challenge and stats in the background. A missing daily
/// challenge (404) is not an error; a failing stats endpoint falls back to
/// deriving stats locally from the challenge list.
fn spawn_challenge_fetch(config: Arc<Config>, rt: &Arc<Runtime>) -> mpsc::Receiver<FetchResult> {
    let (tx, rx) = mpsc::channel();
    let rt = Arc::clone(rt);
    thread::spawn(move || {
        let result = rt.block_on(async {
            let client = ChallengeClient::new(&config.api_url, config.user_id);
            let challenge = match client.fetch_current().await {
                Ok(c) => Some(c),
                Err(ApiError::Status { status, .. }) if status.as_u16() == 404 => None,
                Err(e) => return Err(e.to_string()),
            };
            let stats = match client.fetch_stats().await {
                Ok(s) => Some(s),
                Err(e) => {
                    log::warn!("stats endpoint unavailable, deriving locally: {}", e);
                    match client.fetch_challenges(100).await {
                        Ok(list) => Some(stats::derive_stats(
                            &list,
                            chrono::Local::now().date_naive(),
                        )),
                        Err(e2) => {
                            log::warn!("challenge list fetch failed: {}", e2);
                            None
                        }
                    }
                }
            };
            Ok((challenge, stats))
        });
        let _ = tx.send(result);
    });
    rx
}

fn spawn_submit(
    config: Arc<Config>,
    rt: &Arc<Runtime>,
    challenge_id: u64,
    answer: String,
    score: u32,
    time_spent: String,
) -> mpsc::Receiver<SubmitResult> {
    let (tx, rx) = mpsc::channel();
    let rt = Arc::clone(rt);
    thread::spawn(move || {
        let result = rt.block_on(async {
            let client = ChallengeClient::new(&config.api_url, config.user_id);
            client
                .submit_attempt(challenge_id, &answer, score, &time_spent)
                .await
                .map_err(|e| e.to_string())
        });
        let _ = tx.send(result);
    });
    rx
}

struct ChatParams {
    prompt: String,
    previous: Option<Vec<Value>>,
    profile: LearningProfile,
    challenge: Option<Challenge>,
    target: View,
}

fn spawn_chat(config: Arc<Config>, rt: &Arc<Runtime>, params: ChatParams) -> PendingChat {
    let (stream_tx, stream_rx) = mpsc::channel();
    let (result_tx, result_rx) = mpsc::channel();
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    let rt = Arc::clone(rt);
    let target = params.target;
    thread::spawn(move || {
        let result = rt.block_on(llm::chat(llm::ChatRequest {
            config: &config,
            prompt: &params.prompt,
            previous_messages: params.previous,
            profile: &params.profile,
            challenge: params.challenge.as_ref(),
            on_content_chunk: Some(Box::new(move |chunk: &str| {
                let _ = stream_tx.send(chunk.to_string());
            })),
            cancel_token: Some(cancel_clone),
        }));
        let _ = result_tx.send(result);
    });
    PendingChat {
        target,
        stream_rx,
        result_rx,
        cancel,
    }
}

/// Guard that restores terminal state on drop (including on panic).
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
    }
}

fn save_if_dirty(app: &App, api_messages: &Option<Vec<Value>>) {
    if !app.dirty {
        return;
    }
    let Some(messages) = api_messages else { return };
    if let Err(e) = history::save_conversation(app.conversation_id.as_deref(), messages) {
        log::warn!("could not save conversation: {}", e);
    }
}

/// Run the TUI loop. Uses a dedicated Tokio runtime for background calls.
pub fn run(config: Arc<Config>, profile: LearningProfile, resume: bool) -> io::Result<()> {
    use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, enable_raw_mode};
    use ratatui::Terminal;
    use ratatui::backend::CrosstermBackend;

    let _guard = TerminalGuard;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    execute!(stdout, Clear(ClearType::All))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let rt = Arc::new(
        Runtime::new().map_err(|e| io::Error::other(format!("failed to create runtime: {}", e)))?,
    );

    let mut app = App::new(
        config.model_id.clone(),
        profile,
        config.show_timestamps,
    );
    let mut api_messages: Option<Vec<Value>> = None;

    if resume {
        match history::load_latest() {
            Some((meta, messages)) => {
                app.tutor_log.set_from_api(&messages);
                app.tutor_log
                    .push_notice(format!("Continuing \"{}\"", meta.title));
                app.conversation_id = Some(meta.id);
                api_messages = Some(messages);
            }
            None => {
                app.tutor_log
                    .push_notice("No previous conversation to continue.".to_string());
            }
        }
    }

    let mut pending_chat: Option<PendingChat> = None;
    let mut pending_fetch = Some(spawn_challenge_fetch(Arc::clone(&config), &rt));
    let mut pending_submit: Option<mpsc::Receiver<SubmitResult>> = None;

    loop {
        if let Some(ref fetch_rx) = pending_fetch
            && let Ok(result) = fetch_rx.try_recv()
        {
            match result {
                Ok((challenge, stats)) => {
                    app.challenge.challenge = challenge;
                    app.challenge.stats = stats;
                    app.challenge.fetch_error = None;
                }
                Err(e) => app.challenge.fetch_error = Some(e),
            }
            pending_fetch = None;
        }

        if let Some(ref submit_rx) = pending_submit
            && let Ok(result) = submit_rx.try_recv()
        {
            match result {
                Ok(attempt) => {
                    app.challenge_log.push_notice(format!(
                        "Attempt {} recorded · score {}%",
                        attempt.attempt_number, attempt.score
                    ));
                    // Streak and counts may have changed.
                    pending_fetch = Some(spawn_challenge_fetch(Arc::clone(&config), &rt));
                }
                Err(e) => {
                    app.challenge_log
                        .push_notice(format!("Could not record attempt: {}", e));
                }
            }
            pending_submit = None;
        }

        if let Some(ref chat) = pending_chat {
            let target = chat.target;
            while let Ok(chunk) = chat.stream_rx.try_recv() {
                app.log_for_mut(target).append_assistant_chunk(&chunk);
            }
            if let Ok(result) = chat.result_rx.try_recv() {
                app.is_streaming = false;
                app.log_for_mut(target).set_thinking(false);
                match result {
                    Ok(outcome) => {
                        app.log_for_mut(target)
                            .replace_or_push_assistant(outcome.content.clone());
                        match target {
                            View::Tutor => {
                                api_messages = Some(outcome.messages);
                                app.dirty = true;
                            }
                            View::Challenge => {
                                let score = llm::parse_assessment_score(&outcome.content)
                                    .unwrap_or_else(|| {
                                        log::warn!("assessment reply had no score line");
                                        FALLBACK_SCORE
                                    });
                                if let (Some(answer), Some(challenge)) = (
                                    app.challenge.pending_answer.take(),
                                    app.challenge.challenge.as_ref(),
                                ) {
                                    let elapsed = app
                                        .challenge
                                        .answer_started_at
                                        .take()
                                        .map(|t| t.elapsed().as_secs())
                                        .unwrap_or(0);
                                    pending_submit = Some(spawn_submit(
                                        Arc::clone(&config),
                                        &rt,
                                        challenge.id,
                                        answer,
                                        score,
                                        format_time_spent(elapsed),
                                    ));
                                }
                            }
                        }
                    }
                    Err(llm::ChatError::Cancelled) => {
                        app.log_for_mut(target).append_cancelled_notice();
                    }
                    Err(e) => {
                        app.log_for_mut(target)
                            .replace_or_push_assistant(format!("Error: {}", e));
                    }
                }
                pending_chat = None;
            }
        }

        app.thinking_frame = app.thinking_frame.wrapping_add(1);
        terminal.draw(|f| draw::draw(f, &mut app))?;

        if event::poll(std::time::Duration::from_millis(
            constants::EVENT_POLL_TIMEOUT_MS,
        ))? && let Event::Key(key) = event::read()?
        {
            match handlers::handle_key(key, &mut app) {
                Action::Continue => {}
                Action::Quit => {
                    save_if_dirty(&app, &api_messages);
                    break;
                }
                Action::CancelChat => {
                    if let Some(ref chat) = pending_chat {
                        chat.cancel.cancel();
                    }
                }
                Action::RefreshChallenge => {
                    if pending_fetch.is_none() {
                        app.challenge.fetch_error = None;
                        pending_fetch = Some(spawn_challenge_fetch(Arc::clone(&config), &rt));
                    }
                }
                Action::Send(text) => match app.view {
                    View::Tutor => {
                        app.tutor_log.push_user(&text);
                        app.tutor_log.set_thinking(true);
                        app.is_streaming = true;
                        app.scroll_from_bottom = 0;
                        pending_chat = Some(spawn_chat(
                            Arc::clone(&config),
                            &rt,
                            ChatParams {
                                prompt: text,
                                previous: api_messages.clone(),
                                profile: app.profile.clone(),
                                challenge: None,
                                target: View::Tutor,
                            },
                        ));
                    }
                    View::Challenge => {
                        let Some(challenge) = app.challenge.challenge.clone() else {
                            app.challenge_log
                                .push_notice("No challenge available to answer.".to_string());
                            continue;
                        };
                        app.challenge_log.push_user(&text);
                        app.challenge.pending_answer = Some(text.clone());
                        app.challenge_log.set_thinking(true);
                        app.is_streaming = true;
                        app.scroll_from_bottom = 0;
                        pending_chat = Some(spawn_chat(
                            Arc::clone(&config),
                            &rt,
                            ChatParams {
                                prompt: text,
                                previous: None,
                                profile: app.profile.clone(),
                                challenge: Some(challenge),
                                target: View::Challenge,
                            },
                        ));
                    }
                },
            }
        }
    }

    terminal.show_cursor()?;
    Ok(())
}
