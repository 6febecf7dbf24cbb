//! Parsing of terminal input into front-end commands.

use std::str::FromStr;

use saathi_core::ProfileField;

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text sent to the assistant.
    Send(String),
    /// Empty line: send whatever the draft holds.
    SendDraft,
    SetProfile { field: ProfileField, value: String },
    ShowProfile,
    ResetProfile,
    Language(String),
    Voice(bool),
    Listen,
    Stop,
    Clear,
    Health,
    Schemes(Option<String>),
    Scheme(String),
    Help,
    Quit,
}

/// A line that looked like a command but could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(pub String);

pub const HELP: &str = "\
Commands:
  <text>                      send a message
  <enter>                     send the voice draft
  /profile                    show your profile
  /profile <field> <value>    set age, income, state, district, occupation or category
  /reset                      clear your profile
  /lang <en|hi>               switch language
  /voice <on|off>             toggle spoken replies
  /listen, /stop              start or stop voice input
  /clear                      clear the draft
  /schemes [category]         browse the scheme catalogue
  /scheme <id>                show one scheme
  /health                     check the server
  /quit                       exit";

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::SendDraft);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Send(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match name.to_ascii_lowercase().as_str() {
        "profile" if args.is_empty() => Ok(Command::ShowProfile),
        "profile" => {
            let (field, value) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
            let field = ProfileField::from_str(field).map_err(|e| ParseError(e.to_string()))?;
            Ok(Command::SetProfile {
                field,
                value: value.trim().to_string(),
            })
        }
        "reset" => Ok(Command::ResetProfile),
        "lang" | "language" if !args.is_empty() => Ok(Command::Language(args.to_string())),
        "lang" | "language" => Err(ParseError("usage: /lang <code>".to_string())),
        "voice" => match args.to_ascii_lowercase().as_str() {
            "on" => Ok(Command::Voice(true)),
            "off" => Ok(Command::Voice(false)),
            _ => Err(ParseError("usage: /voice <on|off>".to_string())),
        },
        "listen" | "start" => Ok(Command::Listen),
        "stop" => Ok(Command::Stop),
        "clear" => Ok(Command::Clear),
        "health" => Ok(Command::Health),
        "schemes" => Ok(Command::Schemes(
            (!args.is_empty()).then(|| args.to_string()),
        )),
        "scheme" if !args.is_empty() => Ok(Command::Scheme(args.to_string())),
        "scheme" => Err(ParseError("usage: /scheme <id>".to_string())),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(ParseError(format!("unknown command: /{}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_sent() {
        assert_eq!(
            parse("  I am 23, income 250000, Pune "),
            Ok(Command::Send("I am 23, income 250000, Pune".to_string()))
        );
        assert_eq!(parse("   "), Ok(Command::SendDraft));
    }

    #[test]
    fn test_profile_commands() {
        assert_eq!(parse("/profile"), Ok(Command::ShowProfile));
        assert_eq!(
            parse("/profile district  Pune City"),
            Ok(Command::SetProfile {
                field: ProfileField::District,
                value: "Pune City".to_string()
            })
        );
        assert_eq!(
            parse("/profile age"),
            Ok(Command::SetProfile {
                field: ProfileField::Age,
                value: String::new()
            })
        );
        assert!(parse("/profile height 180").is_err());
        assert_eq!(parse("/reset"), Ok(Command::ResetProfile));
    }

    #[test]
    fn test_voice_and_language() {
        assert_eq!(parse("/voice ON"), Ok(Command::Voice(true)));
        assert_eq!(parse("/voice off"), Ok(Command::Voice(false)));
        assert!(parse("/voice maybe").is_err());
        assert_eq!(parse("/lang hi"), Ok(Command::Language("hi".to_string())));
        assert!(parse("/lang").is_err());
        assert_eq!(parse("/listen"), Ok(Command::Listen));
        assert_eq!(parse("/stop"), Ok(Command::Stop));
    }

    #[test]
    fn test_catalogue_commands() {
        assert_eq!(parse("/schemes"), Ok(Command::Schemes(None)));
        assert_eq!(
            parse("/schemes agriculture"),
            Ok(Command::Schemes(Some("agriculture".to_string())))
        );
        assert_eq!(parse("/scheme pm-kisan"), Ok(Command::Scheme("pm-kisan".to_string())));
        assert!(parse("/scheme").is_err());
        assert_eq!(parse("/health"), Ok(Command::Health));
    }

    #[test]
    fn test_unknown_command() {
        let err = parse("/dance").unwrap_err();
        assert_eq!(err.to_string(), "unknown command: /dance");
        assert_eq!(parse("/quit"), Ok(Command::Quit));
        assert_eq!(parse("/HELP"), Ok(Command::Help));
    }
}
