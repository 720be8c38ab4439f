//! Plain-terminal renderer built on Tera templates.

use colored::{ColoredString, Colorize};
use jiff::tz::TimeZone;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use medsim_core::catalog;
use medsim_core::models::scoring::{ScoringRule, ScoringRules};
use medsim_core::models::session::Session;
use medsim_core::models::transcript::TranscriptEntry;
use medsim_core::presentation::{format_cost, stage_label};

use crate::error::RenderError;
use crate::view::{Origin, Tone, entry_view};

const ENTRY: &str = "entry.txt";
const HEADER: &str = "header.txt";
const RULES: &str = "rules.txt";
const MENU: &str = "menu.txt";

const EMPTY_TRANSCRIPT: &str =
    "No messages yet. Ask the attending physician a question to begin.";

#[derive(Serialize)]
struct EntryContext {
    heading: String,
    time: String,
    badges: Vec<String>,
    notes: Vec<NoteContext>,
    body_label: Option<String>,
    body: Vec<String>,
    image: Option<String>,
}

#[derive(Serialize)]
struct NoteContext {
    label: String,
    text: String,
}

#[derive(Serialize)]
struct HeaderContext {
    title: String,
    specialty: String,
    status: String,
    points: String,
    cost: String,
    attempts: u32,
    scenario: Vec<String>,
}

#[derive(Serialize)]
struct RuleContext {
    label: &'static str,
    points: String,
}

#[derive(Serialize)]
struct RulesContext {
    title: String,
    earn: String,
    lose: String,
    rewards: Vec<RuleContext>,
    penalties: Vec<RuleContext>,
}

#[derive(Serialize)]
struct MenuContext {
    title: String,
    kinds: Vec<MenuRow>,
}

#[derive(Serialize)]
struct MenuRow {
    id: &'static str,
    pad: String,
    label: &'static str,
}

/// Renders sessions, transcripts and the scoring panel as terminal text.
///
/// Colour is opt-in; with it off the output carries no escape codes.
pub struct TextRenderer {
    tera: Tera,
    color: bool,
    tz: TimeZone,
}

impl TextRenderer {
    /// Renderer using the system time zone for entry timestamps.
    pub fn new(color: bool) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (ENTRY, include_str!("templates/entry.txt")),
            (HEADER, include_str!("templates/header.txt")),
            (RULES, include_str!("templates/rules.txt")),
            (MENU, include_str!("templates/menu.txt")),
        ])
        .map_err(|e| RenderError::TemplateParse(e.to_string()))?;

        Ok(Self {
            tera,
            color,
            tz: TimeZone::system(),
        })
    }

    pub fn with_time_zone(mut self, tz: TimeZone) -> Self {
        self.tz = tz;
        self
    }

    pub fn render_entry(&self, entry: &TranscriptEntry) -> Result<String, RenderError> {
        let view = entry_view(entry, &self.tz);

        let heading_tone = match view.origin {
            Origin::User => Tone::Info,
            Origin::Physician => Tone::Positive,
            Origin::TestResult => Tone::Neutral,
            Origin::Diagnosis => Tone::Warning,
        };

        let context = EntryContext {
            heading: self.bold(&view.heading, heading_tone),
            time: self.paint(&view.time, Tone::Neutral),
            badges: view
                .badges
                .iter()
                .map(|b| self.paint(&format!("[{}]", b.text), b.tone))
                .collect(),
            notes: view
                .notes
                .iter()
                .map(|n| NoteContext {
                    label: self.paint(&n.label, n.tone),
                    text: n.text.clone(),
                })
                .collect(),
            body_label: view.body_label,
            body: view.body.lines().map(str::to_string).collect(),
            image: view.image,
        };

        self.render(ENTRY, &context)
    }

    /// All entries in order, separated by blank lines.
    pub fn render_transcript(&self, entries: &[TranscriptEntry]) -> Result<String, RenderError> {
        if entries.is_empty() {
            return Ok(format!("{}\n", self.paint(EMPTY_TRANSCRIPT, Tone::Neutral)));
        }

        let rendered = entries
            .iter()
            .map(|e| self.render_entry(e))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rendered.join("\n"))
    }

    /// Case header: specialty, status, running totals and the scenario.
    pub fn render_header(&self, session: &Session) -> Result<String, RenderError> {
        let tier = session.points_tier();
        let points = format!("{} {}", tier.marker(), session.total_points);

        let status_tone = if session.is_completed() {
            Tone::Positive
        } else {
            Tone::Info
        };

        let context = HeaderContext {
            title: self.bold("Medical Simulation", Tone::Info),
            specialty: session.specialty.clone(),
            status: self.paint(stage_label(session.stage), status_tone),
            points: self.paint(&points, tier.style().into()),
            cost: self.paint(&format_cost(session.total_cost), Tone::Info),
            attempts: session.diagnosis_attempts,
            scenario: session.scenario.lines().map(str::to_string).collect(),
        };

        self.render(HEADER, &context)
    }

    pub fn render_rules(&self, rules: &ScoringRules) -> Result<String, RenderError> {
        let row = |rule: &ScoringRule| RuleContext {
            label: rule.label,
            points: format!("{:+}", rule.points),
        };

        let context = RulesContext {
            title: self.bold("Scoring System", Tone::Warning),
            earn: self.paint("Earn Points For:", Tone::Positive),
            lose: self.paint("Lose Points For:", Tone::Negative),
            rewards: rules.rewards().iter().map(row).collect(),
            penalties: rules.penalties().iter().map(row).collect(),
        };

        self.render(RULES, &context)
    }

    /// The suggested test menu: wire id and label per row.
    pub fn render_test_menu(&self) -> Result<String, RenderError> {
        let kinds = catalog::all_test_kinds();
        let width = kinds.iter().map(|k| k.id.len()).max().unwrap_or(0) + 2;

        let context = MenuContext {
            title: self.bold("Available tests", Tone::Info),
            kinds: kinds
                .iter()
                .map(|k| MenuRow {
                    id: k.id,
                    pad: " ".repeat(width - k.id.len()),
                    label: k.label,
                })
                .collect(),
        };

        self.render(MENU, &context)
    }

    fn render<C: Serialize>(&self, template: &str, context: &C) -> Result<String, RenderError> {
        let value = serde_json::to_value(context)?;
        let context =
            Context::from_value(value).map_err(|e| RenderError::TemplateRender(e.to_string()))?;
        let rendered = self.tera.render(template, &context)?;
        debug!(template, bytes = rendered.len(), "rendered");
        Ok(rendered)
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if self.color {
            tint(text, tone).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str, tone: Tone) -> String {
        if self.color {
            tint(text, tone).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

fn tint(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Positive => text.green(),
        Tone::Negative => text.red(),
        Tone::Neutral => text.bright_black(),
        Tone::Info => text.cyan(),
        Tone::Warning => text.yellow(),
    }
}
