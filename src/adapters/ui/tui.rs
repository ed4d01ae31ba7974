//! Implements InputPort. Inquire-based interactive menu over the session use cases.

use crate::domain::{DomainError, Session, SessionOverview};
use crate::ports::InputPort;
use crate::shared::display::{concern_names, labelled_summary};
use crate::usecases::{SessionService, SummarizedSession};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{CustomType, InquireError, Select, Text};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Applies the prompt theme globally. Call once before the first prompt.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("?").with_fg(Color::LightCyan))
        .with_highlighted_option_prefix(Styled::new(">").with_fg(Color::LightMagenta))
        .with_answer(StyleSheet::new().with_fg(Color::LightCyan));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    SummarizeText,
    SummarizeFile,
    TranscribeAudio,
    Dashboard,
    ViewSession,
    ReSummarize,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 7] = [
        MenuAction::SummarizeText,
        MenuAction::SummarizeFile,
        MenuAction::TranscribeAudio,
        MenuAction::Dashboard,
        MenuAction::ViewSession,
        MenuAction::ReSummarize,
        MenuAction::Exit,
    ];
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MenuAction::SummarizeText => "Summarize a typed transcript",
            MenuAction::SummarizeFile => "Summarize a transcript file",
            MenuAction::TranscribeAudio => "Transcribe & summarize an audio file",
            MenuAction::Dashboard => "Past sessions",
            MenuAction::ViewSession => "View a session",
            MenuAction::ReSummarize => "Re-summarize a session",
            MenuAction::Exit => "Exit",
        };
        f.write_str(s)
    }
}

fn prompt_err(e: InquireError) -> DomainError {
    DomainError::InvalidInput(e.to_string())
}

fn is_cancel(e: &InquireError) -> bool {
    matches!(
        e,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Text block for a freshly summarized session.
pub fn format_summary(done: &SummarizedSession) -> String {
    let insights = &done.result.insights;
    let mut out = String::new();
    out.push_str(&format!("Session #{}\n\n", done.session_id));
    out.push_str(&labelled_summary(&done.result.summary));
    out.push_str("\n\n");

    let concerns = concern_names(insights);
    if concerns.is_empty() {
        out.push_str("Concerns: none detected\n");
    } else {
        out.push_str(&format!("Concerns: {}\n", concerns.join(", ")));
    }

    if !insights.breakthroughs.is_empty() {
        out.push_str("\nBreakthrough moments:\n");
        for b in &insights.breakthroughs {
            out.push_str(&format!("  \"{}\"\n", b));
        }
    }
    out
}

/// One line per session, newest first.
pub fn format_dashboard(sessions: &[SessionOverview]) -> String {
    if sessions.is_empty() {
        return "No sessions yet.\n".to_string();
    }
    sessions
        .iter()
        .map(|s| {
            let preview: String = s.summary.chars().take(80).collect();
            format!("#{:<5} {}  {}\n", s.id, s.date, preview)
        })
        .collect()
}

pub fn format_session(session: &Session) -> String {
    format!(
        "Session #{} ({})\n\n{}\n\nTranscript:\n{}\n",
        session.id,
        session.date,
        labelled_summary(&session.summary),
        session.transcript
    )
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    sessions: Arc<SessionService>,
    dashboard_limit: u32,
}

impl TuiInputPort {
    pub fn new(sessions: Arc<SessionService>, dashboard_limit: u32) -> Self {
        Self {
            sessions,
            dashboard_limit,
        }
    }

    async fn handle(&self, action: MenuAction) -> Result<(), DomainError> {
        match action {
            MenuAction::SummarizeText => {
                let text = Text::new("Transcript:").prompt().map_err(prompt_err)?;
                let pb = spinner("Summarizing...");
                let res = self.sessions.summarize_text(&text).await;
                pb.finish_and_clear();
                println!("{}", format_summary(&res?));
            }
            MenuAction::SummarizeFile => {
                let path = Text::new("Transcript file:").prompt().map_err(prompt_err)?;
                let text = tokio::fs::read_to_string(path.trim())
                    .await
                    .map_err(|e| DomainError::InvalidInput(format!("{}: {}", path.trim(), e)))?;
                let pb = spinner("Summarizing...");
                let res = self.sessions.summarize_text(&text).await;
                pb.finish_and_clear();
                println!("{}", format_summary(&res?));
            }
            MenuAction::TranscribeAudio => {
                let path = Text::new("Audio file:").prompt().map_err(prompt_err)?;
                let path = PathBuf::from(path.trim());
                let pb = spinner("Transcribing and summarizing...");
                let res = self.sessions.summarize_audio_file(&path).await;
                pb.finish_and_clear();
                println!("{}", format_summary(&res?));
            }
            MenuAction::Dashboard => self.show_dashboard().await?,
            MenuAction::ViewSession => {
                let id = CustomType::<i64>::new("Session id:")
                    .prompt()
                    .map_err(prompt_err)?;
                match self.sessions.get_session(id).await {
                    Ok(session) => println!("{}", format_session(&session)),
                    Err(DomainError::NotFound(_)) => {
                        println!("Session #{} not found.\n", id);
                        self.show_dashboard().await?;
                    }
                    Err(e) => return Err(e),
                }
            }
            MenuAction::ReSummarize => {
                let id = CustomType::<i64>::new("Session id:")
                    .prompt()
                    .map_err(prompt_err)?;
                let pb = spinner("Re-summarizing...");
                let res = self.sessions.re_summarize(id).await;
                pb.finish_and_clear();
                println!("{}", format_session(&res?));
            }
            MenuAction::Exit => {}
        }
        Ok(())
    }

    async fn show_dashboard(&self) -> Result<(), DomainError> {
        let sessions = self.sessions.list_sessions(self.dashboard_limit).await?;
        print!("{}", format_dashboard(&sessions));
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let action = match Select::new("What would you like to do?", MenuAction::ALL.to_vec())
                .prompt()
            {
                Ok(a) => a,
                Err(e) if is_cancel(&e) => return Ok(()),
                Err(e) => return Err(prompt_err(e)),
            };
            if action == MenuAction::Exit {
                return Ok(());
            }
            if let Err(e) = self.handle(action).await {
                warn!(error = %e, "action failed");
                println!("Error: {}\n", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        BreakthroughExcerpt, ConcernLabel, ConcernScore, InsightResult, SessionSummary,
        Transcript, filter_concerns,
    };

    #[test]
    fn test_format_summary() {
        let done = SummarizedSession {
            session_id: 7,
            transcript: Transcript::new("t"),
            result: SessionSummary {
                summary: "They talked about work.".to_string(),
                insights: InsightResult {
                    concerns: filter_concerns(&[ConcernScore::new(ConcernLabel::WorkStress, 0.8)]),
                    breakthroughs: vec![
                        BreakthroughExcerpt::new("I realized my job drains me.").unwrap(),
                    ],
                },
            },
        };
        let out = format_summary(&done);
        assert!(out.contains("Session #7"));
        assert!(out.contains("Summary of your therapy session:  They talked about work."));
        assert!(out.contains("Concerns: work stress"));
        assert!(out.contains("\"I realized my job drains me.\""));
    }

    #[test]
    fn test_format_dashboard() {
        assert_eq!(format_dashboard(&[]), "No sessions yet.\n");
        let rows = vec![SessionOverview {
            id: 3,
            date: "2024-05-01 10:00:00".to_string(),
            summary: "x".repeat(100),
        }];
        let out = format_dashboard(&rows);
        assert!(out.starts_with("#3"));
        assert!(out.contains("2024-05-01 10:00:00"));
        assert!(!out.contains(&"x".repeat(81)));
    }
}
