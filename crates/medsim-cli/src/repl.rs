use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use medsim_core::catalog;
use medsim_core::models::session::Session;
use medsim_core::models::transcript::TranscriptEntry;
use medsim_core::presentation::format_cost;
use medsim_render::error::RenderError;
use medsim_render::text::TextRenderer;
use medsim_session::controller::SessionController;
use medsim_session::error::SessionError;

use crate::commands::{self, COMMAND_NAMES, Command, HELP};

const NO_CASE: &str = "No active case. Start one with /new <specialty>.";

/// Completion and hints for slash commands and test ids.
#[derive(Clone)]
struct CliHelper {
    color: bool,
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if let Some(partial) = line.strip_prefix("/test ") {
            let start = pos - partial.len();
            let candidates = catalog::all_test_kinds()
                .iter()
                .filter(|k| k.id.starts_with(partial))
                .map(|k| Pair {
                    display: format!("{} ({})", k.id, k.label),
                    replacement: k.id.to_string(),
                })
                .collect();
            return Ok((start, candidates));
        }

        if line.starts_with('/') && !line.contains(' ') {
            let candidates = COMMAND_NAMES
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect();
            return Ok((0, candidates));
        }

        Ok((0, vec![]))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.color && line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.color
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            COMMAND_NAMES
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

pub enum Flow {
    Continue,
    Quit,
}

/// Interactive session state: the one current case, if any.
pub struct Repl {
    controller: SessionController,
    renderer: TextRenderer,
    color: bool,
    session: Option<Session>,
}

impl Repl {
    pub fn new(controller: SessionController, renderer: TextRenderer, color: bool) -> Self {
        Self {
            controller,
            renderer,
            color,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Prompt showing the specialty and whether the case still takes input.
    pub fn prompt(&self) -> String {
        match &self.session {
            None => "medsim> ".to_string(),
            Some(session) if self.controller.permitted_actions(session).is_empty() => {
                format!("[{} · {}] /new to start again> ", session.specialty, session.stage)
            }
            Some(session) => format!("[{}] ask, /test, /diagnose> ", session.specialty),
        }
    }

    /// Run one command and return what to print.
    pub async fn handle(&mut self, command: Command) -> (Flow, String) {
        let output = match command {
            Command::Quit => return (Flow::Quit, "Goodbye!".to_string()),
            Command::Help => Ok(HELP.to_string()),
            Command::Tests => self.renderer.render_test_menu().map_err(|e| e.to_string()),
            Command::Rules => self.show_rules().await,
            Command::New { specialty } => self.new_case(&specialty).await,
            Command::Abandon => Ok(self.abandon()),
            Command::Status => self.with_session(|r, s| r.render_header(s)),
            Command::History => self.with_session(|r, s| r.render_transcript(&s.transcript)),
            Command::Chat { text } => self.act(Act::Chat(&text)).await,
            Command::Test {
                test_type,
                body_part,
            } => self.act(Act::Test(&test_type, &body_part)).await,
            Command::Diagnose { text } => self.act(Act::Diagnose(&text)).await,
        };

        let text = match output {
            Ok(text) => text,
            Err(message) => self.warn(&message),
        };
        (Flow::Continue, text)
    }

    async fn show_rules(&self) -> Result<String, String> {
        let rules = self
            .controller
            .load_scoring_rules()
            .await
            .map_err(|e| format!("Could not load scoring rules: {e}"))?;
        self.renderer.render_rules(&rules).map_err(|e| e.to_string())
    }

    async fn new_case(&mut self, specialty: &str) -> Result<String, String> {
        let session = self
            .controller
            .create_session(specialty)
            .await
            .map_err(|e| failure(&e, &self.controller))?;

        if let Some(previous) = self.session.replace(session) {
            self.controller.abandon(previous);
        }
        self.with_session(|r, s| {
            let header = r.render_header(s)?;
            let transcript = r.render_transcript(&s.transcript)?;
            Ok(format!("{header}\n{transcript}"))
        })
    }

    fn abandon(&mut self) -> String {
        match self.session.take() {
            Some(session) => {
                self.controller.abandon(session);
                "Case abandoned.".to_string()
            }
            None => NO_CASE.to_string(),
        }
    }

    async fn act(&mut self, act: Act<'_>) -> Result<String, String> {
        let Some(current) = self.session.as_ref() else {
            return Err(NO_CASE.to_string());
        };

        let result = match act {
            Act::Chat(text) => self.controller.send_chat_message(current, text).await,
            Act::Test(test_type, body_part) => {
                self.controller
                    .request_test(current, test_type, body_part)
                    .await
            }
            Act::Diagnose(text) => self.controller.submit_diagnosis(current, text).await,
        };
        let updated = result.map_err(|e| failure(&e, &self.controller))?;

        let was_completed = current.is_completed();
        let fresh = new_entries(&current.transcript, &updated.transcript);

        let mut out = String::new();
        for entry in fresh {
            out.push_str(&self.renderer.render_entry(entry).map_err(|e| e.to_string())?);
            out.push('\n');
        }

        if !was_completed && updated.is_completed() {
            out.push_str("Case completed.\n");
            let header = self
                .renderer
                .render_header(&updated)
                .map_err(|e| e.to_string())?;
            out.push_str(&header);
        } else {
            out.push_str(&format!(
                "Points: {}  Total Cost: {}  Attempts: {}",
                updated.total_points,
                format_cost(updated.total_cost),
                updated.diagnosis_attempts,
            ));
        }

        self.session = Some(updated);
        Ok(out)
    }

    fn with_session(
        &self,
        render: impl FnOnce(&TextRenderer, &Session) -> Result<String, RenderError>,
    ) -> Result<String, String> {
        let session = self.session.as_ref().ok_or_else(|| NO_CASE.to_string())?;
        render(&self.renderer, session).map_err(|e| e.to_string())
    }

    fn warn(&self, message: &str) -> String {
        if self.color {
            format!("! {message}").red().to_string()
        } else {
            format!("! {message}")
        }
    }
}

enum Act<'a> {
    Chat(&'a str),
    Test(&'a str, &'a str),
    Diagnose(&'a str),
}

/// Entries of `after` that `before` did not have. The read-back is sorted
/// by time, so a new entry can land anywhere, not only at the end.
fn new_entries<'a>(
    before: &[TranscriptEntry],
    after: &'a [TranscriptEntry],
) -> Vec<&'a TranscriptEntry> {
    let mut unmatched: Vec<&TranscriptEntry> = before.iter().collect();
    after
        .iter()
        .filter(|entry| match unmatched.iter().position(|seen| seen == entry) {
            Some(index) => {
                unmatched.swap_remove(index);
                false
            }
            None => true,
        })
        .collect()
}

/// User-facing text for a failed operation: the controller's notice when
/// it recorded one.
fn failure(error: &SessionError, controller: &SessionController) -> String {
    controller.notice().unwrap_or_else(|| error.to_string())
}

/// Read lines until `/quit` or end of input.
pub async fn run(mut repl: Repl) -> eyre::Result<()> {
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper { color: repl.color }));

    let banner = "=== Medical Simulation ===";
    if repl.color {
        println!("{}", banner.bright_magenta().bold());
    } else {
        println!("{banner}");
    }
    println!("Start a case with /new <specialty>, or /help for all commands.");
    println!();

    loop {
        let line = match rl.readline(&repl.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", repl.warn(&e.to_string()));
                continue;
            }
        };
        let _ = rl.add_history_entry(line.as_str());

        let (flow, output) = repl.handle(command).await;
        println!("{output}");
        if let Flow::Quit = flow {
            break;
        }
    }

    Ok(())
}
