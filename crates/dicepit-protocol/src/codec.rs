//! Codec trait and the JSON implementation.
//!
//! A "codec" converts between typed protocol values and single lines of
//! text. The server doesn't care HOW a line is structured, it just needs
//! something that implements [`Codec`]. The default is
//! [`TextCodec`](crate::TextCodec), the `KEYWORD:payload` grammar;
//! [`JsonCodec`] carries the same values as one JSON object per line.

use crate::{Command, Event, ProtocolError};

/// Translates between lines and protocol values, in both directions.
///
/// Implementations are stateless, so one codec is shared by every
/// connection task (`Send + Sync + 'static`).
///
/// Lines never include the trailing newline; framing belongs to the
/// transport.
pub trait Codec: Send + Sync + 'static {
    /// Parses a client line into a command.
    ///
    /// # Errors
    /// Any [`ProtocolError`] describing why the line was rejected.
    fn decode_command(&self, line: &str) -> Result<Command, ProtocolError>;

    /// Serializes a command, as a client would send it.
    fn encode_command(&self, command: &Command) -> Result<String, ProtocolError>;

    /// Parses a server line into an event, as a client would read it.
    fn decode_event(&self, line: &str) -> Result<Event, ProtocolError>;

    /// Serializes an event for the wire.
    fn encode_event(&self, event: &Event) -> Result<String, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that writes each value as a single-line JSON object.
///
/// Handy for tooling and browser clients that would rather not parse the
/// text grammar. Behind the `json` feature (enabled by default).
///
/// ## Example
///
/// ```rust
/// use dicepit_protocol::{Codec, Event, JsonCodec};
///
/// let codec = JsonCodec;
/// let line = codec.encode_event(&Event::info("hello")).unwrap();
/// assert_eq!(line, r#"{"type":"info","text":"hello"}"#);
/// assert_eq!(codec.decode_event(&line).unwrap(), Event::info("hello"));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn decode_command(&self, line: &str) -> Result<Command, ProtocolError> {
        serde_json::from_str(line.trim()).map_err(ProtocolError::Decode)
    }

    fn encode_command(&self, command: &Command) -> Result<String, ProtocolError> {
        serde_json::to_string(command).map_err(ProtocolError::Encode)
    }

    fn decode_event(&self, line: &str) -> Result<Event, ProtocolError> {
        serde_json::from_str(line.trim()).map_err(ProtocolError::Decode)
    }

    fn encode_event(&self, event: &Event) -> Result<String, ProtocolError> {
        serde_json::to_string(event).map_err(ProtocolError::Encode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use dicepit_rules::{Category, Dice, HoldMask, ParticipantId};

    use super::*;

    #[test]
    fn test_json_roll_carries_hold_indices() {
        let codec = JsonCodec;
        let cmd = Command::Roll {
            hold: HoldMask::from_indices([1, 3]),
        };
        let line = codec.encode_command(&cmd).unwrap();
        assert_eq!(line, r#"{"type":"roll","hold":[1,3]}"#);
        assert_eq!(codec.decode_command(&line).unwrap(), cmd);
    }

    #[test]
    fn test_json_move_uses_category_keys() {
        let codec = JsonCodec;
        let line = r#"{"type":"move","category":"full_house","dice":[3,3,3,2,2],"row":8,"col":1}"#;
        let cmd = codec.decode_command(line).unwrap();
        assert_eq!(
            cmd,
            Command::Move {
                category: Category::FullHouse,
                dice: Dice::new([3, 3, 3, 2, 2]).unwrap(),
                row: 8,
                col: 1,
            }
        );
    }

    #[test]
    fn test_json_category_names_are_tolerant() {
        let codec = JsonCodec;
        for name in ["Full House", " FULL_HOUSE ", "full-house"] {
            let line = format!(
                r#"{{"type":"move","category":"{name}","dice":[3,3,3,2,2],"row":8,"col":1}}"#
            );
            match codec.decode_command(&line).unwrap() {
                Command::Move { category, .. } => assert_eq!(category, Category::FullHouse),
                other => panic!("expected a move, got {other:?}"),
            }
        }

        let unknown = r#"{"type":"move","category":"sevens","dice":[1,2,3,4,5],"row":0,"col":0}"#;
        assert!(matches!(
            codec.decode_command(unknown),
            Err(ProtocolError::Decode(_))
        ));
    }

    #[test]
    fn test_json_rejects_illegal_dice() {
        let codec = JsonCodec;
        let line = r#"{"type":"move","category":"chance","dice":[1,2,3,4,9],"row":0,"col":0}"#;
        assert!(matches!(
            codec.decode_command(line),
            Err(ProtocolError::Decode(_))
        ));
    }

    #[test]
    fn test_json_event_is_single_line() {
        let codec = JsonCodec;
        let line = codec
            .encode_event(&Event::Turn {
                participant: ParticipantId(1),
            })
            .unwrap();
        assert_eq!(line, r#"{"type":"turn","participant":1}"#);
        assert!(!line.contains('\n'));
    }
}
