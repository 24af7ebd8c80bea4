use std::io::{stdout, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossterm::cursor::MoveTo;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseEventKind,
};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tokio::sync::mpsc;
use vert_chat::{ChatSession, PendingQuestion};
use vert_core::{AnswerProvider, Article, ChatReply, HeadlinesProvider, PageQuery, Result};
use vert_feed::{FeedController, FeedKey};

/// Terminal rows mapped to nominal pixels so gesture thresholds and scroll
/// offsets keep their usual scale.
const CELL_PX: f64 = 16.0;
/// Synthetic scroll travel per wheel notch.
const WHEEL_PX: f64 = 3.0 * CELL_PX;
const TICK: Duration = Duration::from_millis(50);

enum TaskOutcome {
    Page(Result<Vec<Article>>),
    Reply(PendingQuestion, Result<ChatReply>),
}

pub async fn run(
    headlines: Arc<dyn HeadlinesProvider>,
    answers: Arc<dyn AnswerProvider>,
    query: PageQuery,
) -> Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let outcome = event_loop(headlines, answers, query).await;
    execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    outcome
}

async fn event_loop(
    headlines: Arc<dyn HeadlinesProvider>,
    answers: Arc<dyn AnswerProvider>,
    query: PageQuery,
) -> Result<()> {
    let (cols, rows) = size()?;
    let mut controller = FeedController::new(rows as f64 * CELL_PX, query);
    let mut session = ChatSession::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<TaskOutcome>();

    let mut scroll_offset = 0.0_f64;
    let mut drag_start: Option<u16> = None;
    let mut input = String::new();
    let mut active_url: Option<String> = None;
    let mut screen = (cols, rows);
    let mut dirty = true;

    loop {
        let now = Instant::now();

        // Deliver finished background work first.
        while let Ok(outcome) = rx.try_recv() {
            match outcome {
                TaskOutcome::Page(result) => {
                    controller.complete_prefetch(result);
                }
                TaskOutcome::Reply(pending, result) => {
                    session.apply_reply(&pending, result);
                }
            }
            dirty = true;
        }

        // The chat input line owns the keyboard while the panel is open.
        let typing = controller.chat_open() && controller.active_article().is_some();

        if event::poll(TICK).map_err(vert_core::Error::Io)? {
            match event::read().map_err(vert_core::Error::Io)? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }
                    let command = match key.code {
                        KeyCode::Up => controller.on_key(FeedKey::ArrowUp, typing),
                        KeyCode::Down => controller.on_key(FeedKey::ArrowDown, typing),
                        KeyCode::Esc => {
                            // close the panel, releasing the keyboard
                            if controller.chat_open() {
                                controller.on_key(FeedKey::Char('c'), false);
                            }
                            None
                        }
                        KeyCode::Enter if typing => {
                            if let Some(pending) = session.begin_send(&input) {
                                input.clear();
                                spawn_question(&answers, &tx, pending);
                            }
                            None
                        }
                        KeyCode::Backspace if typing => {
                            input.pop();
                            None
                        }
                        KeyCode::Char(' ') if !typing => controller.on_key(FeedKey::Space, false),
                        KeyCode::Char('q') if !typing => return Ok(()),
                        KeyCode::Char(c) => {
                            if typing {
                                input.push(c);
                                None
                            } else {
                                controller.on_key(FeedKey::Char(c), false)
                            }
                        }
                        _ => None,
                    };
                    if let Some(cmd) = command {
                        // Perform the imperative scroll and echo it back so
                        // the passive handler re-derives the same index.
                        scroll_offset = cmd.target_offset;
                        controller.on_scroll(scroll_offset, now);
                    }
                    dirty = true;
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                        let delta = if mouse.kind == MouseEventKind::ScrollDown {
                            WHEEL_PX
                        } else {
                            -WHEEL_PX
                        };
                        let max = controller.store().len().saturating_sub(1) as f64
                            * controller.viewport_height();
                        scroll_offset = (scroll_offset + delta).clamp(0.0, max.max(0.0));
                        controller.on_scroll(scroll_offset, now);
                    }
                    MouseEventKind::Down(_) => drag_start = Some(mouse.row),
                    MouseEventKind::Up(_) => {
                        if let Some(start) = drag_start.take() {
                            if let Some(cmd) = controller
                                .on_swipe(start as f64 * CELL_PX, mouse.row as f64 * CELL_PX)
                            {
                                scroll_offset = cmd.target_offset;
                                controller.on_scroll(scroll_offset, now);
                            }
                            dirty = true;
                        }
                    }
                    _ => {}
                },
                Event::Resize(new_cols, new_rows) => {
                    screen = (new_cols, new_rows);
                    controller.set_viewport_height(new_rows as f64 * CELL_PX);
                    if let Some(index) = controller.active_index() {
                        scroll_offset = index as f64 * controller.viewport_height();
                    }
                    dirty = true;
                }
                _ => {}
            }
        }

        if controller.poll_scroll(Instant::now()).is_some() {
            dirty = true;
        }

        // Keep the conversation keyed to the active article's identity.
        let current_url = controller.active_article().map(|a| a.url.clone());
        if current_url != active_url {
            if let Some(article) = controller.active_article() {
                session.reset_for(article);
            }
            active_url = current_url;
            dirty = true;
        }

        if let Some(page_query) = controller.begin_prefetch() {
            spawn_page(&headlines, &tx, page_query);
            dirty = true;
        }

        if dirty {
            draw(&controller, &session, &input, screen)?;
            dirty = false;
        }
    }
}

fn spawn_page(
    headlines: &Arc<dyn HeadlinesProvider>,
    tx: &mpsc::UnboundedSender<TaskOutcome>,
    query: PageQuery,
) {
    let provider = headlines.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = provider.fetch_page(&query).await;
        let _ = tx.send(TaskOutcome::Page(result));
    });
}

fn spawn_question(
    answers: &Arc<dyn AnswerProvider>,
    tx: &mpsc::UnboundedSender<TaskOutcome>,
    pending: PendingQuestion,
) {
    let provider = answers.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = provider.answer(&pending.question, &pending.context).await;
        let _ = tx.send(TaskOutcome::Reply(pending, result));
    });
}

fn draw(
    controller: &FeedController,
    session: &ChatSession,
    input: &str,
    (cols, rows): (u16, u16),
) -> Result<()> {
    let mut out = stdout();
    queue!(out, Clear(ClearType::All), MoveTo(0, 0)).map_err(vert_core::Error::Io)?;
    let width = cols.max(20) as usize;

    let mut lines: Vec<String> = Vec::new();
    match controller.active_article() {
        None => {
            lines.push(String::new());
            lines.push("  ⟳ Loading news articles...".to_string());
        }
        Some(article) => {
            let position = format!(
                "[{} / {}]{}",
                controller.active_index().map(|i| i + 1).unwrap_or(0),
                controller.store().len(),
                if controller.fetch_in_flight() {
                    "  ⟳ loading more"
                } else {
                    ""
                }
            );
            lines.push(position);
            lines.push(format!(
                "{} · {}",
                article.source.name,
                time_ago(article.published_at, Utc::now())
            ));
            lines.push(String::new());
            lines.push(article.title.clone());
            lines.push(String::new());
            lines.push(article.description.clone());
            if let Some(author) = &article.author {
                lines.push(String::new());
                lines.push(format!("By {}", author));
            }
            lines.push(String::new());
            lines.push(format!("Read full article: {}", article.url));
            lines.push(String::new());
            lines.push("↑/↓/space navigate · wheel/drag scroll · c chat · q quit".to_string());

            if controller.chat_open() {
                lines.push(String::new());
                lines.push("── Ask about this article ──".to_string());
                if session.messages().is_empty() {
                    lines.push("Try these questions:".to_string());
                    for prompt in session.suggested_prompts() {
                        lines.push(format!("  · {}", prompt));
                    }
                } else {
                    for message in session.messages() {
                        let speaker = if message.is_from_user { "you" } else { "ai" };
                        for chunk in message.content.split('\n') {
                            lines.push(format!("{:>4} │ {}", speaker, chunk));
                        }
                    }
                }
                if session.awaiting_reply() {
                    lines.push("  … thinking".to_string());
                }
                lines.push(format!("> {}", input));
            }
        }
    }

    for (row, line) in lines.iter().take(rows.saturating_sub(1) as usize).enumerate() {
        let truncated: String = line.chars().take(width).collect();
        queue!(out, MoveTo(0, row as u16), Print(truncated)).map_err(vert_core::Error::Io)?;
    }
    out.flush().map_err(vert_core::Error::Io)?;
    Ok(())
}

/// Coarse relative timestamp for the article header.
fn time_ago(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(published);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }
    plural(elapsed.num_days(), "day")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
