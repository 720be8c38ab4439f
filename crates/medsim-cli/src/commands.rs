//! REPL input parsing.
//!
//! Lines starting with `/` are commands; anything else is a chat message.
//! Argument checks beyond "is it there" are left to the session controller
//! so the same rules apply no matter where input comes from.

use thiserror::Error;

use medsim_core::catalog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New { specialty: String },
    Chat { text: String },
    Test { test_type: String, body_part: String },
    Diagnose { text: String },
    Rules,
    Tests,
    Status,
    History,
    Abandon,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command {0}; type /help for a list")]
    Unknown(String),
}

/// Names offered for completion, in help order.
pub const COMMAND_NAMES: &[&str] = &[
    "/new", "/test", "/diagnose", "/rules", "/tests", "/status", "/history", "/abandon", "/help",
    "/quit",
];

pub const HELP: &str = "\
Commands:
  /new <specialty>           start a new case, e.g. /new orthopedics
  /test <type> [body part]   order a diagnostic test, e.g. /test mri knee
                             (off-menu types are one word; join words with _,
                             e.g. /test bone_scan hip)
  /diagnose <diagnosis>      submit a diagnosis
  /rules                     show the scoring system
  /tests                     list the suggested tests
  /status                    show the case summary
  /history                   show the whole transcript
  /abandon                   drop the current case
  /help                      show this help
  /quit                      leave
Anything else is sent to the attending physician as a chat message.";

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        // Chat goes out exactly as typed.
        return Ok(Some(Command::Chat {
            text: line.to_string(),
        }));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "new" => Command::New {
            specialty: args.to_string(),
        },
        "test" | "order" => parse_test(args),
        "diagnose" | "dx" => Command::Diagnose {
            text: args.to_string(),
        },
        "rules" | "scoring" => Command::Rules,
        "tests" => Command::Tests,
        "status" => Command::Status,
        "history" => Command::History,
        "abandon" => Command::Abandon,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(ParseError::Unknown(format!("/{name}"))),
    };
    Ok(Some(command))
}

/// `<type> [body part]`. Menu tests are matched by id or label, including
/// two-word labels such as `ct scan`. Anything else takes its first word as
/// the type, so multi-word off-menu types are written with `_`.
fn parse_test(args: &str) -> Command {
    let words: Vec<&str> = args.split_whitespace().collect();

    for take in [2, 1] {
        if words.len() < take {
            continue;
        }
        if let Some(kind) = catalog::resolve_test_kind(&words[..take].join(" ")) {
            return Command::Test {
                test_type: kind.id.to_string(),
                body_part: words[take..].join(" "),
            };
        }
    }

    Command::Test {
        test_type: words.first().map(|w| w.to_string()).unwrap_or_default(),
        body_part: words.get(1..).map(|rest| rest.join(" ")).unwrap_or_default(),
    }
}
