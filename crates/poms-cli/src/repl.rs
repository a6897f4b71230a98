//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::{build_router, Router};
use rustyline::error::ReadlineError;
use rustyline::{Config as EditorConfig, DefaultEditor};
use std::path::PathBuf;

/// Run the interactive REPL.
///
/// The model session is built up front, so a missing credential stops the
/// REPL before the first prompt.
pub async fn run_repl(config: &mut Config, formatter: &Formatter) -> Result<()> {
    let mut router = build_router(config)?;

    println!(
        "{}",
        formatter.info("P.O.M.S REPL - Type a query, 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = EditorConfig::builder()
        .max_history_size(config.settings.history_size)
        .map_err(readline_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(readline_error)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("poms> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, &mut router, config, formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    Examples,
    Classify(String),
    Profile(ProfileAction),
    Query(String),
}

/// Parse a REPL line. Anything that is not a command is a query.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let Some(first) = parts.first() else {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    };

    match *first {
        "exit" | "quit" | "q" if parts.len() == 1 => Ok(ReplCommand::Exit),
        "help" | "?" if parts.len() == 1 => Ok(ReplCommand::Help),
        "examples" if parts.len() == 1 => Ok(ReplCommand::Examples),
        "classify" => {
            if parts.len() < 2 {
                return Err(CliError::InvalidInput("Usage: classify <text>".to_string()));
            }
            Ok(ReplCommand::Classify(parts[1..].join(" ")))
        }
        "profile" => parse_profile_command(&parts[1..])
            .unwrap_or_else(|| Ok(ReplCommand::Query(line.to_string()))),
        _ => Ok(ReplCommand::Query(line.to_string())),
    }
}

/// `None` when the words after `profile` are not a profile action.
fn parse_profile_command(args: &[&str]) -> Option<Result<ReplCommand>> {
    let action = match args.first().copied() {
        None | Some("show") => ProfileAction::Show,
        Some("list") => ProfileAction::List,
        Some("switch") => match args.get(1) {
            Some(name) => ProfileAction::Switch {
                name: name.to_string(),
            },
            None => {
                return Some(Err(CliError::InvalidInput(
                    "Usage: profile switch <name>".to_string(),
                )))
            }
        },
        Some(_) => return None,
    };

    Some(Ok(ReplCommand::Profile(action)))
}

/// Execute a REPL command.
async fn execute_repl_command(
    cmd: ReplCommand,
    router: &mut Router,
    config: &mut Config,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        ReplCommand::Query(text) => commands::execute_query(&text, &*router, formatter).await,
        ReplCommand::Classify(text) => {
            println!("{}", formatter.format_intent(&text, router.classify(&text))?);
            Ok(())
        }
        ReplCommand::Examples => commands::execute_examples(formatter),
        ReplCommand::Profile(ProfileAction::Switch { name }) => {
            *router = switch_session(name.clone(), config, build_router)?;
            println!(
                "{}",
                formatter.success(&format!("Switched to profile '{}'", name))
            );
            Ok(())
        }
        ReplCommand::Profile(action) => commands::execute_profile(ProfileArgs { action }, config, formatter),
        ReplCommand::Help => {
            print_help(formatter);
            Ok(())
        }
        ReplCommand::Exit => Ok(()),
    }
}

/// Switch profiles on a copy of the config. The config is only replaced and
/// saved once the new session has been built.
fn switch_session<R>(
    name: String,
    config: &mut Config,
    build: impl FnOnce(&Config) -> Result<R>,
) -> Result<R> {
    let mut candidate = config.clone();
    candidate.switch_profile(name)?;
    let session = build(&candidate)?;
    candidate.save()?;
    *config = candidate;
    Ok(session)
}

fn readline_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("Failed to initialize editor: {}", e),
    ))
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let poms_dir = home.join(".poms");
    std::fs::create_dir_all(&poms_dir)?;
    Ok(poms_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Type a question to extract orders, holdings or performance requests."));
    println!();
    println!("  <query>                        - Route and extract (e.g. Buy 250 AAPL in account capers)");
    println!("  classify <text>                - Show which pipeline a query would use");
    println!("  examples                       - List example queries");
    println!("  profile [list|show|switch <n>] - Manage model profiles");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_plain_lines_are_queries() {
        assert_eq!(
            parse_repl_command("Buy 250 AAPL in account capers").unwrap(),
            ReplCommand::Query("Buy 250 AAPL in account capers".to_string())
        );
        // A query that merely starts with a command word
        assert_eq!(
            parse_repl_command("help me sell 10 TSLA").unwrap(),
            ReplCommand::Query("help me sell 10 TSLA".to_string())
        );
    }

    #[test]
    fn test_builtin_commands() {
        assert_eq!(parse_repl_command("exit").unwrap(), ReplCommand::Exit);
        assert_eq!(parse_repl_command("q").unwrap(), ReplCommand::Exit);
        assert_eq!(parse_repl_command("?").unwrap(), ReplCommand::Help);
        assert_eq!(parse_repl_command("examples").unwrap(), ReplCommand::Examples);
        assert_eq!(
            parse_repl_command("classify show   my positions").unwrap(),
            ReplCommand::Classify("show my positions".to_string())
        );
        assert!(parse_repl_command("classify").is_err());
    }

    #[test]
    fn test_profile_commands() {
        assert_eq!(
            parse_repl_command("profile").unwrap(),
            ReplCommand::Profile(ProfileAction::Show)
        );
        assert_eq!(
            parse_repl_command("profile list").unwrap(),
            ReplCommand::Profile(ProfileAction::List)
        );
        assert_eq!(
            parse_repl_command("profile switch local").unwrap(),
            ReplCommand::Profile(ProfileAction::Switch {
                name: "local".to_string()
            })
        );
        assert!(parse_repl_command("profile switch").is_err());
    }

    #[test]
    fn test_profile_word_in_a_query() {
        for line in ["profile delete x", "profile performance YTD", "Profile list"] {
            assert_eq!(
                parse_repl_command(line).unwrap(),
                ReplCommand::Query(line.to_string())
            );
        }
    }

    #[test]
    fn test_failed_switch_keeps_current_profile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::load_or_default(&path).unwrap();

        let result = switch_session("local".to_string(), &mut config, |_| -> Result<()> {
            Err(CliError::Config("Missing API key".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(config.active_profile, "default");
        assert!(!path.exists());
    }

    #[test]
    fn test_switch_session_builds_from_new_profile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::load_or_default(&path).unwrap();

        let model = switch_session("local".to_string(), &mut config, |candidate| {
            Ok(candidate.get_active_profile()?.model.clone())
        })
        .unwrap();

        assert_eq!(model, "llama3.1");
        assert_eq!(config.active_profile, "local");
        assert_eq!(Config::from_file(&path).unwrap().active_profile, "local");
    }

    #[test]
    fn test_switch_to_unknown_profile_does_not_build() {
        let mut config = Config::default();
        let mut built = false;

        let result = switch_session("nope".to_string(), &mut config, |_| {
            built = true;
            Ok(())
        });

        assert!(result.is_err());
        assert!(!built);
        assert_eq!(config.active_profile, "default");
    }
}
