// src/bot/command.rs — Chat command parsing
//
// Turns a chat line such as `!po start 500 Alice, Bob` into a typed
// `PokerCommand`. Lines that are not addressed to the bot parse to `None`.

use thiserror::Error;

/// A command addressed to the bot.
#[derive(Debug, Clone, PartialEq)]
pub enum PokerCommand {
    Ping,
    Help,
    Start { buy_in: f64, players: Vec<String> },
    In(String),
    Out(String),
    Win(String),
    Pnl(Option<String>),
    Events,
    End,
}

impl PokerCommand {
    /// Whether the command works without an active session.
    pub fn needs_session(&self) -> bool {
        !matches!(
            self,
            PokerCommand::Ping | PokerCommand::Help | PokerCommand::Start { .. }
        )
    }
}

/// Malformed command. The Display text is the usage hint sent back to chat.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("❌ Invalid command. Use '{prefix} help' to see available commands.")]
    Unknown { prefix: String },

    #[error("❌ Invalid start command. Format: {prefix} start <buy-in> <player1,player2,...>")]
    StartUsage { prefix: String },

    #[error("❌ Invalid buy-in amount. Please provide a number.")]
    InvalidBuyIn,

    #[error("❌ Invalid buy-in amount: {0}. It must be a positive number.")]
    NonPositiveBuyIn(String),

    #[error("❌ No valid players provided. Format: {prefix} start <buy-in> <player1,player2,...>")]
    NoPlayers { prefix: String },

    #[error("❌ Invalid command. Format: {prefix} {verb} <player-name>")]
    MissingPlayer { prefix: String, verb: String },
}

/// Parse one chat line.
///
/// `!ping` is always recognised. Everything else must start with `prefix`
/// as a separate word; the verb after it is case-insensitive.
pub fn parse(text: &str, prefix: &str) -> Result<Option<PokerCommand>, CommandError> {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(None);
    };

    if first == "!ping" {
        return Ok(Some(PokerCommand::Ping));
    }
    if first != prefix {
        return Ok(None);
    }

    let args: Vec<&str> = words.collect();
    let Some(verb) = args.first() else {
        return Err(CommandError::Unknown {
            prefix: prefix.to_string(),
        });
    };
    let verb = verb.to_lowercase();
    let rest = &args[1..];

    let command = match verb.as_str() {
        "help" => PokerCommand::Help,
        "events" | "event" => PokerCommand::Events,
        "end" => PokerCommand::End,
        "start" => parse_start(rest, prefix)?,
        "in" => PokerCommand::In(player_name(rest, prefix, &verb)?),
        "out" => PokerCommand::Out(player_name(rest, prefix, &verb)?),
        "win" => PokerCommand::Win(player_name(rest, prefix, &verb)?),
        "pnl" => {
            let name = rest.join(" ");
            PokerCommand::Pnl((!name.is_empty()).then_some(name))
        }
        _ => {
            return Err(CommandError::Unknown {
                prefix: prefix.to_string(),
            })
        }
    };

    Ok(Some(command))
}

fn parse_start(rest: &[&str], prefix: &str) -> Result<PokerCommand, CommandError> {
    if rest.len() < 2 {
        return Err(CommandError::StartUsage {
            prefix: prefix.to_string(),
        });
    }

    let buy_in: f64 = rest[0].parse().map_err(|_| CommandError::InvalidBuyIn)?;
    if !buy_in.is_finite() {
        return Err(CommandError::InvalidBuyIn);
    }
    if buy_in <= 0.0 {
        return Err(CommandError::NonPositiveBuyIn(rest[0].to_string()));
    }

    let players: Vec<String> = rest[1..]
        .join(" ")
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();

    if players.is_empty() {
        return Err(CommandError::NoPlayers {
            prefix: prefix.to_string(),
        });
    }

    Ok(PokerCommand::Start { buy_in, players })
}

fn player_name(rest: &[&str], prefix: &str, verb: &str) -> Result<String, CommandError> {
    let name = rest.join(" ");
    if name.is_empty() {
        return Err(CommandError::MissingPlayer {
            prefix: prefix.to_string(),
            verb: verb.to_string(),
        });
    }
    Ok(name)
}

/// Help text listing every command with the configured prefix.
pub fn help_text(prefix: &str) -> String {
    format!(
        "🎮 **Poker Manager Bot Commands**

**Game Session Commands:**
`{p} start <buy-in> <player1,player2,...>` - Start new session (ends current session if exists)
`{p} in <player>` - Add player to session
`{p} out <player>` - Remove player from session
`{p} win <player>` - Record game winner (auto-starts next game)
`{p} end` - End current session and show final results

**Information Commands:**
`{p} events` - Show session history
`{p} pnl` - Show all players' profit/loss
`{p} pnl <player>` - Show specific player's profit/loss

**Example:**
```
{p} start 500 Alice, Bob, Carol
{p} win Alice
{p} in Dave
{p} pnl
{p} end
```",
        p = prefix
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const P: &str = "!po";

    fn ok(text: &str) -> PokerCommand {
        parse(text, P).unwrap().unwrap()
    }

    #[test]
    fn test_ignores_unrelated_lines() {
        assert_eq!(parse("hello there", P), Ok(None));
        assert_eq!(parse("", P), Ok(None));
        assert_eq!(parse("!poker start", P), Ok(None));
    }

    #[test]
    fn test_ping() {
        assert_eq!(ok("!ping"), PokerCommand::Ping);
    }

    #[test]
    fn test_simple_verbs() {
        assert_eq!(ok("!po help"), PokerCommand::Help);
        assert_eq!(ok("!po events"), PokerCommand::Events);
        assert_eq!(ok("!po event"), PokerCommand::Events);
        assert_eq!(ok("!po END"), PokerCommand::End);
    }

    #[test]
    fn test_start_with_comma_list() {
        assert_eq!(
            ok("!po start 500 Alice, Bob ,Carol"),
            PokerCommand::Start {
                buy_in: 500.0,
                players: vec!["Alice".into(), "Bob".into(), "Carol".into()],
            }
        );
    }

    #[test]
    fn test_start_multi_word_names_and_empties() {
        assert_eq!(
            ok("!po start 12.5 Mary Ann,, Bob"),
            PokerCommand::Start {
                buy_in: 12.5,
                players: vec!["Mary Ann".into(), "Bob".into()],
            }
        );
    }

    #[test]
    fn test_start_errors() {
        assert_eq!(
            parse("!po start 500", P),
            Err(CommandError::StartUsage { prefix: P.into() })
        );
        assert_eq!(parse("!po start abc Alice", P), Err(CommandError::InvalidBuyIn));
        assert_eq!(parse("!po start NaN Alice", P), Err(CommandError::InvalidBuyIn));
        assert_eq!(
            parse("!po start -5 Alice", P),
            Err(CommandError::NonPositiveBuyIn("-5".into()))
        );
        assert_eq!(
            parse("!po start 500 , ,", P),
            Err(CommandError::NoPlayers { prefix: P.into() })
        );
    }

    #[test]
    fn test_player_commands_join_words() {
        assert_eq!(ok("!po in Mary Ann"), PokerCommand::In("Mary Ann".into()));
        assert_eq!(ok("!po out Bob"), PokerCommand::Out("Bob".into()));
        assert_eq!(ok("!po Win Bob"), PokerCommand::Win("Bob".into()));
    }

    #[test]
    fn test_player_command_without_name() {
        let err = parse("!po out", P).unwrap_err();
        assert_eq!(err.to_string(), "❌ Invalid command. Format: !po out <player-name>");
    }

    #[test]
    fn test_pnl_optional_name() {
        assert_eq!(ok("!po pnl"), PokerCommand::Pnl(None));
        assert_eq!(ok("!po pnl Mary Ann"), PokerCommand::Pnl(Some("Mary Ann".into())));
    }

    #[test]
    fn test_empty_and_unknown() {
        let err = parse("!po", P).unwrap_err();
        assert_eq!(
            err.to_string(),
            "❌ Invalid command. Use '!po help' to see available commands."
        );
        assert!(matches!(parse("!po deal", P), Err(CommandError::Unknown { .. })));
    }

    #[test]
    fn test_custom_prefix() {
        assert_eq!(parse("!poker end", "!poker"), Ok(Some(PokerCommand::End)));
        assert_eq!(parse("!po end", "!poker"), Ok(None));
    }

    #[test]
    fn test_needs_session() {
        assert!(!PokerCommand::Help.needs_session());
        assert!(!ok("!po start 10 A").needs_session());
        assert!(PokerCommand::End.needs_session());
        assert!(PokerCommand::Pnl(None).needs_session());
    }

    #[test]
    fn test_help_uses_prefix() {
        let help = help_text("!pp");
        assert!(help.contains("`!pp start <buy-in>"));
        assert!(!help.contains("!po "));
    }
}
