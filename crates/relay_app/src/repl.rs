//! Line command parsing for the interactive session.

use std::path::PathBuf;

use relay_ai::PriorityWeights;
use relay_core::RelayError;

use crate::state::TokenBudget;

pub const HELP: &str = "\
Commands:
  rank                        show the model ranking under the current weights
  weights <cost> <lat> <qual> set priority weights
  name <text>                 set the profile name used for export
  model <id|auto>             pin a model or return to automatic routing
  tokens <input|auto> <max>   set the token budget used for estimates
  estimate [prompt]           estimate the next run
  run <prompt>                route and run a prompt (Ctrl-C cancels)
  history                     list recent runs, newest first
  summary                     usage totals over the history
  export [dir]                write settings as JSON
  import <file>               load settings from a JSON file
  csv                         print the history as CSV
  clear                       clear the history
  notifications               show unread notifications
  state                       show the current settings
  help                        show this text
  quit                        leave";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Help,
    Rank,
    Weights(PriorityWeights),
    Name(String),
    Model(Option<String>),
    Tokens(TokenBudget),
    Estimate(String),
    Run(String),
    History,
    Summary,
    Export(Option<PathBuf>),
    Import(PathBuf),
    Csv,
    Clear,
    Notifications,
    State,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, RelayError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "help" | "?" => ReplCommand::Help,
        "rank" => ReplCommand::Rank,
        "weights" => ReplCommand::Weights(parse_weights(rest)?),
        "name" => ReplCommand::Name(rest.to_string()),
        "model" => match rest {
            "" => return Err(usage("model <id|auto>")),
            r if r.eq_ignore_ascii_case("auto") => ReplCommand::Model(None),
            r => ReplCommand::Model(Some(r.to_string())),
        },
        "tokens" => ReplCommand::Tokens(parse_budget(rest)?),
        "estimate" => ReplCommand::Estimate(rest.to_string()),
        "run" => {
            if rest.is_empty() {
                return Err(usage("run <prompt>"));
            }
            ReplCommand::Run(rest.to_string())
        }
        "history" => ReplCommand::History,
        "summary" => ReplCommand::Summary,
        "export" => ReplCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "import" => {
            if rest.is_empty() {
                return Err(usage("import <file>"));
            }
            ReplCommand::Import(PathBuf::from(rest))
        }
        "csv" => ReplCommand::Csv,
        "clear" => ReplCommand::Clear,
        "notifications" => ReplCommand::Notifications,
        "state" => ReplCommand::State,
        "quit" | "exit" => ReplCommand::Quit,
        other => {
            return Err(RelayError::InvalidInput(format!(
                "Unknown command '{other}'. Type 'help' for a list."
            )));
        }
    };
    Ok(Some(command))
}

fn usage(text: &str) -> RelayError {
    RelayError::InvalidInput(format!("Usage: {text}"))
}

fn parse_weights(rest: &str) -> Result<PriorityWeights, RelayError> {
    let values: Vec<f64> = rest
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<Result<_, _>>()
        .map_err(|_| usage("weights <cost> <latency> <quality>"))?;

    match values.as_slice() {
        [cost, latency, quality] => {
            let weights = PriorityWeights::new(*cost, *latency, *quality);
            if !weights.is_finite() {
                return Err(RelayError::InvalidInput(
                    "Weights must be finite numbers.".into(),
                ));
            }
            Ok(weights)
        }
        _ => Err(usage("weights <cost> <latency> <quality>")),
    }
}

fn parse_budget(rest: &str) -> Result<TokenBudget, RelayError> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let [input, max] = parts.as_slice() else {
        return Err(usage("tokens <input|auto> <max>"));
    };

    let input_tokens = if input.eq_ignore_ascii_case("auto") {
        None
    } else {
        Some(
            input
                .parse::<u32>()
                .map_err(|_| usage("tokens <input|auto> <max>"))?,
        )
    };
    let max_tokens = max
        .parse::<u32>()
        .map_err(|_| usage("tokens <input|auto> <max>"))?;

    Ok(TokenBudget {
        input_tokens,
        max_tokens,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ReplCommand {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn blank_line_is_none() {
        assert!(parse_line("   ").unwrap().is_none());
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse("rank"), ReplCommand::Rank);
        assert_eq!(parse("HISTORY"), ReplCommand::History);
        assert_eq!(parse("exit"), ReplCommand::Quit);
        assert_eq!(parse("?"), ReplCommand::Help);
    }

    #[test]
    fn weights_parse() {
        assert_eq!(
            parse("weights 1 0 0.5"),
            ReplCommand::Weights(PriorityWeights::new(1.0, 0.0, 0.5))
        );
        assert!(parse_line("weights 1 0").is_err());
        assert!(parse_line("weights a b c").is_err());
        assert!(parse_line("weights inf 0 0").is_err());
    }

    #[test]
    fn model_auto_and_id() {
        assert_eq!(parse("model auto"), ReplCommand::Model(None));
        assert_eq!(
            parse("model Titan Ultra"),
            ReplCommand::Model(Some("Titan Ultra".into()))
        );
        assert!(parse_line("model").is_err());
    }

    #[test]
    fn tokens_parse() {
        assert_eq!(
            parse("tokens 40 120"),
            ReplCommand::Tokens(TokenBudget {
                input_tokens: Some(40),
                max_tokens: 120
            })
        );
        assert_eq!(
            parse("tokens auto 256"),
            ReplCommand::Tokens(TokenBudget {
                input_tokens: None,
                max_tokens: 256
            })
        );
        assert!(parse_line("tokens -1 5").is_err());
    }

    #[test]
    fn run_keeps_prompt_text() {
        assert_eq!(
            parse("run  Explain   ownership "),
            ReplCommand::Run("Explain   ownership".into())
        );
        assert!(parse_line("run").is_err());
    }

    #[test]
    fn export_optional_dir() {
        assert_eq!(parse("export"), ReplCommand::Export(None));
        assert_eq!(
            parse("export /tmp/out"),
            ReplCommand::Export(Some(PathBuf::from("/tmp/out")))
        );
    }

    #[test]
    fn unknown_command_errors() {
        let err = parse_line("frobnicate").unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }
}
