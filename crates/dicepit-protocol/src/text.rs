//! The `KEYWORD:payload` line grammar.
//!
//! ```text
//! client → server                         server → client
//! ROLL | ROLL:<i0>,<i1>,...               INDEX:<id>
//! MOVE:<cat>:<d1 d2 d3 d4 d5>:<row>:<col> INFO:<text>
//! RESTART                                 DICE:<d1> <d2> <d3> <d4> <d5>
//! QUIT                                    TURN:<id>
//!                                         SCORE:<row>,<col>,<score>
//!                                         GAME_OVER_SUMMARY:
//! ```
//!
//! Keywords are case-insensitive and surrounding whitespace is ignored.

use std::str::FromStr;

use dicepit_rules::{Category, DICE_COUNT, Dice, HoldMask, ParticipantId};

use crate::{Codec, Command, Event, ProtocolError};

const MOVE_USAGE: &str = "expected MOVE:<category>:<d1 d2 d3 d4 d5>:<row>:<col>";

/// The plain-text codec spoken by the reference clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl Codec for TextCodec {
    fn decode_command(&self, line: &str) -> Result<Command, ProtocolError> {
        let (keyword, payload) = split_keyword(line)?;

        match keyword.as_str() {
            "ROLL" => {
                let hold = match payload {
                    Some(p) if !p.trim().is_empty() => {
                        let indices = p
                            .split(',')
                            .map(|i| parse_number::<i64>("held index", i))
                            .collect::<Result<Vec<_>, _>>()?;
                        HoldMask::from_indices(indices)
                    }
                    _ => HoldMask::NONE,
                };
                Ok(Command::Roll { hold })
            }
            "MOVE" => decode_move(payload.unwrap_or_default()),
            "RESTART" => no_payload(payload, Command::Restart),
            "QUIT" | "EXIT" => no_payload(payload, Command::Quit),
            _ => Err(ProtocolError::UnknownCommand(keyword.clone())),
        }
    }

    fn encode_command(&self, command: &Command) -> Result<String, ProtocolError> {
        Ok(match command {
            Command::Roll { hold } if hold.is_empty() => "ROLL".to_string(),
            Command::Roll { hold } => {
                let indices: Vec<String> = hold.indices().map(|i| i.to_string()).collect();
                format!("ROLL:{}", indices.join(","))
            }
            Command::Move {
                category,
                dice,
                row,
                col,
            } => format!("MOVE:{category}:{dice}:{row}:{col}"),
            Command::Restart => "RESTART".to_string(),
            Command::Quit => "QUIT".to_string(),
        })
    }

    fn decode_event(&self, line: &str) -> Result<Event, ProtocolError> {
        let (keyword, payload) = split_keyword(line)?;
        let payload = payload.unwrap_or_default();

        match keyword.as_str() {
            "INDEX" => Ok(Event::Index {
                participant: ParticipantId(parse_number("participant", payload)?),
            }),
            "INFO" => Ok(Event::info(payload.trim())),
            "DICE" => Ok(Event::Dice {
                dice: parse_dice(payload)?,
            }),
            "TURN" => Ok(Event::Turn {
                participant: ParticipantId(parse_number("participant", payload)?),
            }),
            "SCORE" => {
                let parts: Vec<&str> = payload.split(',').collect();
                let [row, col, score] = parts.as_slice() else {
                    return Err(ProtocolError::Malformed(
                        "expected SCORE:<row>,<col>,<score>".into(),
                    ));
                };
                Ok(Event::Score {
                    row: parse_number("row", row)?,
                    col: parse_number("col", col)?,
                    score: parse_number("score", score)?,
                })
            }
            "GAME_OVER_SUMMARY" => Ok(Event::GameOverSummary),
            _ => Err(ProtocolError::UnknownEvent(keyword.clone())),
        }
    }

    fn encode_event(&self, event: &Event) -> Result<String, ProtocolError> {
        Ok(match event {
            Event::Index { participant } => format!("INDEX:{}", participant.0),
            // Newlines would split one notice into several wire lines.
            Event::Info { text } => format!("INFO:{}", text.replace(['\r', '\n'], " ")),
            Event::Dice { dice } => format!("DICE:{dice}"),
            Event::Turn { participant } => format!("TURN:{}", participant.0),
            Event::Score { row, col, score } => format!("SCORE:{row},{col},{score}"),
            Event::GameOverSummary => "GAME_OVER_SUMMARY:".to_string(),
        })
    }
}

/// Splits `KEYWORD:payload` and upper-cases the keyword.
fn split_keyword(line: &str) -> Result<(String, Option<&str>), ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::Malformed("empty line".into()));
    }
    let (keyword, payload) = match line.split_once(':') {
        Some((k, p)) => (k, Some(p)),
        None => (line, None),
    };
    Ok((keyword.trim().to_ascii_uppercase(), payload))
}

fn no_payload(payload: Option<&str>, command: Command) -> Result<Command, ProtocolError> {
    match payload {
        Some(p) if !p.trim().is_empty() => Err(ProtocolError::Malformed(format!(
            "unexpected argument {:?}",
            p.trim()
        ))),
        _ => Ok(command),
    }
}

fn decode_move(payload: &str) -> Result<Command, ProtocolError> {
    let parts: Vec<&str> = payload.split(':').collect();
    let [category, dice, row, col] = parts.as_slice() else {
        return Err(ProtocolError::Malformed(MOVE_USAGE.into()));
    };

    let category = Category::from_str(category)
        .map_err(|_| ProtocolError::InvalidCategory(category.trim().to_string()))?;

    Ok(Command::Move {
        category,
        dice: parse_dice(dice)?,
        row: parse_number("row", row)?,
        col: parse_number("col", col)?,
    })
}

/// Five faces separated by spaces (commas are tolerated).
fn parse_dice(field: &str) -> Result<Dice, ProtocolError> {
    let faces = field
        .split([' ', ',', '\t'])
        .filter(|f| !f.is_empty())
        .map(|f| parse_number::<u8>("die", f))
        .collect::<Result<Vec<_>, _>>()?;

    let faces: [u8; DICE_COUNT] = faces.as_slice().try_into().map_err(|_| {
        ProtocolError::Malformed(format!("expected {DICE_COUNT} dice, got {}", faces.len()))
    })?;

    Dice::new(faces).map_err(ProtocolError::InvalidDice)
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, ProtocolError> {
    let value = value.trim();
    value.parse().map_err(|_| ProtocolError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
