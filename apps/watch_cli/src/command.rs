//! Stdin commands standing in for pointer input.

use anyhow::{anyhow, bail, Result};
use shared::domain::ButtonId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Down { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Tap(ButtonId),
    Quit,
}

pub const USAGE: &str = "commands: down <x> <y> | up <x> <y> | tap <top-left|bottom-left|top-right|bottom-right> | quit";

/// Parses one input line; blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };

    let command = match verb {
        "down" | "up" => {
            let x = parse_coordinate(parts.next(), "x")?;
            let y = parse_coordinate(parts.next(), "y")?;
            if verb == "down" {
                Command::Down { x, y }
            } else {
                Command::Up { x, y }
            }
        }
        "tap" => {
            let raw = parts.next().ok_or_else(|| anyhow!("tap needs a button"))?;
            let button = ButtonId::parse(raw).ok_or_else(|| anyhow!("unknown button {raw:?}"))?;
            Command::Tap(button)
        }
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command {other:?}; {USAGE}"),
    };

    if let Some(extra) = parts.next() {
        bail!("unexpected argument {extra:?}");
    }
    Ok(Some(command))
}

fn parse_coordinate(raw: Option<&str>, name: &str) -> Result<f32> {
    let raw = raw.ok_or_else(|| anyhow!("missing {name} coordinate"))?;
    raw.parse::<f32>()
        .map_err(|err| anyhow!("invalid {name} coordinate {raw:?}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pointer_and_tap_commands() {
        assert_eq!(
            parse_command("down 8 66").expect("parse"),
            Some(Command::Down { x: 8.0, y: 66.0 })
        );
        assert_eq!(
            parse_command("  up 8.5 70 ").expect("parse"),
            Some(Command::Up { x: 8.5, y: 70.0 })
        );
        assert_eq!(
            parse_command("tap bottom-right").expect("parse"),
            Some(Command::Tap(ButtonId::BottomRight))
        );
        assert_eq!(parse_command("quit").expect("parse"), Some(Command::Quit));
        assert_eq!(parse_command("   ").expect("parse"), None);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("tap middle").is_err());
        assert!(parse_command("down 1").is_err());
        assert!(parse_command("down a b").is_err());
        assert!(parse_command("up 1 2 3").is_err());
        assert!(parse_command("wave").is_err());
    }
}
