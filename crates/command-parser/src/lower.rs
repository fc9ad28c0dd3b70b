//! Lowering of structured descriptors into the dispatcher's token stream

use crate::descriptor::{
    CameraAction, Command, CommandDescriptor, MoveCommand, MoveDirection, RotateDirection,
    SafetyAction, TurnDirection,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One entry of the dispatcher alphabet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstructionToken {
    Move(MoveDirection),
    MoveDistance(f64),
    MoveDuration(u64),
    MoveSpeed(f64),
    Turn(TurnDirection),
    Rotate(RotateDirection, f64),
    CameraPhoto,
    CameraRecord,
    CameraZoom(f64),
    Siren,
    Flash,
    Spray,
    Taser,
    Wait(u64),
    EmergencyStop,
    Unknown,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized instruction token: {0}")]
pub struct TokenParseError(pub String);

impl InstructionToken {
    /// Delay the dispatcher must honour before sending the next token
    pub fn wait_ms(&self) -> Option<u64> {
        match self {
            InstructionToken::Wait(ms) => Some(*ms),
            _ => None,
        }
    }
}

impl fmt::Display for InstructionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstructionToken::Move(dir) => write!(f, "move.{}", dir.as_str()),
            InstructionToken::MoveDistance(m) => write!(f, "move.distance:{}m", number(*m)),
            InstructionToken::MoveDuration(ms) => write!(f, "move.duration:{ms}"),
            InstructionToken::MoveSpeed(p) => write!(f, "move.speed:{}", number(*p)),
            InstructionToken::Turn(TurnDirection::Left) => f.write_str("turn.left"),
            InstructionToken::Turn(TurnDirection::Right) => f.write_str("turn.right"),
            InstructionToken::Rotate(RotateDirection::Clockwise, deg) => {
                write!(f, "rotate.cw.deg:{}", number(*deg))
            }
            InstructionToken::Rotate(RotateDirection::CounterClockwise, deg) => {
                write!(f, "rotate.ccw.deg:{}", number(*deg))
            }
            InstructionToken::CameraPhoto => f.write_str("camera.photo"),
            InstructionToken::CameraRecord => f.write_str("camera.record"),
            InstructionToken::CameraZoom(v) => write!(f, "camera.zoom:{}", number(*v)),
            InstructionToken::Siren => f.write_str("siren"),
            InstructionToken::Flash => f.write_str("flash"),
            InstructionToken::Spray => f.write_str("spray"),
            InstructionToken::Taser => f.write_str("taser"),
            InstructionToken::Wait(ms) => write!(f, "wait:{ms}"),
            InstructionToken::EmergencyStop => f.write_str("safety.estop"),
            InstructionToken::Unknown => f.write_str("unknown"),
        }
    }
}

impl FromStr for InstructionToken {
    type Err = TokenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TokenParseError(s.to_string());
        let token = match s {
            "move.forward" => InstructionToken::Move(MoveDirection::Forward),
            "move.backward" => InstructionToken::Move(MoveDirection::Backward),
            "move.left" => InstructionToken::Move(MoveDirection::Left),
            "move.right" => InstructionToken::Move(MoveDirection::Right),
            "move.stop" => InstructionToken::Move(MoveDirection::Stop),
            "turn.left" => InstructionToken::Turn(TurnDirection::Left),
            "turn.right" => InstructionToken::Turn(TurnDirection::Right),
            "camera.photo" => InstructionToken::CameraPhoto,
            "camera.record" => InstructionToken::CameraRecord,
            "siren" => InstructionToken::Siren,
            "flash" => InstructionToken::Flash,
            "spray" => InstructionToken::Spray,
            "taser" => InstructionToken::Taser,
            "safety.estop" => InstructionToken::EmergencyStop,
            "unknown" => InstructionToken::Unknown,
            _ => {
                let (head, arg) = s.split_once(':').ok_or_else(err)?;
                match head {
                    "move.distance" => {
                        let meters = arg.strip_suffix('m').ok_or_else(err)?;
                        InstructionToken::MoveDistance(meters.parse().map_err(|_| err())?)
                    }
                    "move.duration" => {
                        InstructionToken::MoveDuration(arg.parse().map_err(|_| err())?)
                    }
                    "move.speed" => InstructionToken::MoveSpeed(arg.parse().map_err(|_| err())?),
                    "rotate.cw.deg" => InstructionToken::Rotate(
                        RotateDirection::Clockwise,
                        arg.parse().map_err(|_| err())?,
                    ),
                    "rotate.ccw.deg" => InstructionToken::Rotate(
                        RotateDirection::CounterClockwise,
                        arg.parse().map_err(|_| err())?,
                    ),
                    "camera.zoom" => InstructionToken::CameraZoom(arg.parse().map_err(|_| err())?),
                    "wait" => InstructionToken::Wait(arg.parse().map_err(|_| err())?),
                    _ => return Err(err()),
                }
            }
        };
        Ok(token)
    }
}

impl Serialize for InstructionToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InstructionToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Integral values print without a fractional part
fn number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Flatten descriptors into tokens. `unknown` contributes nothing; an empty
/// result is reported as a single `unknown` token.
pub fn lower(descriptors: &[CommandDescriptor]) -> Vec<InstructionToken> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < descriptors.len() {
        let command = &descriptors[i].command;
        lower_command(command, &mut tokens);
        i += 1;
        if let Command::Move(MoveCommand {
            duration_ms: Some(ms),
            ..
        }) = command
        {
            // the classifier's own wait/stop pair is already covered by the bracket
            if is_bracket_tail(&descriptors[i..], *ms) {
                i += 2;
            }
        }
    }
    if tokens.is_empty() {
        tokens.push(InstructionToken::Unknown);
    }
    tokens
}

/// Wire strings for `lower`
pub fn lower_to_strings(descriptors: &[CommandDescriptor]) -> Vec<String> {
    lower(descriptors).iter().map(ToString::to_string).collect()
}

fn is_bracket_tail(rest: &[CommandDescriptor], ms: u64) -> bool {
    match rest {
        [wait, stop, ..] => {
            wait.command == Command::Wait { ms }
                && matches!(&stop.command, Command::Move(m) if m.is_stop())
        }
        _ => false,
    }
}

fn lower_command(command: &Command, out: &mut Vec<InstructionToken>) {
    match command {
        Command::Safety {
            action: SafetyAction::EmergencyStop,
        } => out.push(InstructionToken::EmergencyStop),
        Command::Move(motion) => {
            out.push(InstructionToken::Move(motion.direction));
            if let Some(meters) = motion.distance_meters {
                out.push(InstructionToken::MoveDistance(meters));
            }
            if let Some(ms) = motion.duration_ms {
                out.push(InstructionToken::MoveDuration(ms));
                out.push(InstructionToken::Wait(ms));
                out.push(InstructionToken::Move(MoveDirection::Stop));
            }
        }
        Command::Turn(turn) => out.push(InstructionToken::Turn(turn.direction)),
        Command::Rotate(rotate) => {
            out.push(InstructionToken::Rotate(rotate.direction, rotate.degrees))
        }
        Command::Speed { percent } => out.push(InstructionToken::MoveSpeed(*percent)),
        Command::Camera { action } => out.push(match action {
            CameraAction::Photo => InstructionToken::CameraPhoto,
            CameraAction::Record => InstructionToken::CameraRecord,
            CameraAction::Zoom { value } => InstructionToken::CameraZoom(*value),
        }),
        Command::Siren => out.push(InstructionToken::Siren),
        Command::Lights => out.push(InstructionToken::Flash),
        Command::Spray => out.push(InstructionToken::Spray),
        Command::Taser => out.push(InstructionToken::Taser),
        Command::Wait { ms } => out.push(InstructionToken::Wait(*ms)),
        Command::Unknown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{confidence, MoveStyle, RotateCommand, TurnCommand, TurnStyle};

    fn desc(command: Command) -> CommandDescriptor {
        CommandDescriptor::new(command, confidence::QUANTIFIED, "test")
    }

    #[test]
    fn test_timed_move_bracket() {
        let descriptors = vec![
            desc(Command::Move(
                MoveCommand::toward(MoveDirection::Forward, MoveStyle::Normal)
                    .with_duration(120_000),
            )),
            desc(Command::Wait { ms: 120_000 }),
            desc(Command::Move(MoveCommand::stop())),
        ];
        assert_eq!(
            lower_to_strings(&descriptors),
            vec![
                "move.forward",
                "move.duration:120000",
                "wait:120000",
                "move.stop"
            ]
        );
    }

    #[test]
    fn test_standalone_wait_is_kept() {
        let descriptors = vec![
            desc(Command::Move(
                MoveCommand::toward(MoveDirection::Left, MoveStyle::Normal).with_duration(1000),
            )),
            desc(Command::Wait { ms: 500 }),
        ];
        assert_eq!(
            lower_to_strings(&descriptors),
            vec![
                "move.left",
                "move.duration:1000",
                "wait:1000",
                "move.stop",
                "wait:500"
            ]
        );
    }

    #[test]
    fn test_distance_move() {
        let descriptors = vec![desc(Command::Move(
            MoveCommand::toward(MoveDirection::Left, MoveStyle::Normal).with_distance(1.5),
        ))];
        assert_eq!(
            lower_to_strings(&descriptors),
            vec!["move.left", "move.distance:1.5m"]
        );
    }

    #[test]
    fn test_every_variant_lowers() {
        let commands = vec![
            Command::Safety {
                action: SafetyAction::EmergencyStop,
            },
            Command::Move(MoveCommand::stop()),
            Command::Turn(TurnCommand {
                direction: TurnDirection::Left,
                style: TurnStyle::Sharp,
            }),
            Command::Rotate(RotateCommand {
                direction: RotateDirection::CounterClockwise,
                degrees: 45.0,
                relative: true,
            }),
            Command::Speed { percent: 45.0 },
            Command::Camera {
                action: CameraAction::Zoom { value: 2.5 },
            },
            Command::Siren,
            Command::Lights,
            Command::Spray,
            Command::Taser,
            Command::Wait { ms: 1500 },
        ];
        let expected = [
            "safety.estop",
            "move.stop",
            "turn.left",
            "rotate.ccw.deg:45",
            "move.speed:45",
            "camera.zoom:2.5",
            "siren",
            "flash",
            "spray",
            "taser",
            "wait:1500",
        ];
        for (command, token) in commands.into_iter().zip(expected) {
            let lowered = lower_to_strings(&[desc(command)]);
            assert_eq!(lowered, vec![token]);
        }
    }

    #[test]
    fn test_all_unknown_lowers_to_unknown() {
        let descriptors = vec![
            CommandDescriptor::unknown("hello"),
            CommandDescriptor::unknown("robot"),
        ];
        assert_eq!(lower_to_strings(&descriptors), vec!["unknown"]);
        assert_eq!(lower(&[]), vec![InstructionToken::Unknown]);
    }

    #[test]
    fn test_unknown_contributes_nothing() {
        let descriptors = vec![
            CommandDescriptor::unknown("hello"),
            desc(Command::Siren),
        ];
        assert_eq!(lower_to_strings(&descriptors), vec!["siren"]);
    }

    #[test]
    fn test_wire_strings_parse_back() {
        let wire = [
            "move.forward",
            "move.backward",
            "move.left",
            "move.right",
            "move.stop",
            "move.distance:2m",
            "move.distance:0.25m",
            "move.duration:1500",
            "move.speed:45",
            "turn.left",
            "turn.right",
            "rotate.cw.deg:90",
            "rotate.ccw.deg:12.5",
            "camera.photo",
            "camera.record",
            "camera.zoom:1",
            "siren",
            "flash",
            "spray",
            "taser",
            "wait:1500",
            "safety.estop",
            "unknown",
        ];
        for s in wire {
            let token: InstructionToken = s.parse().unwrap();
            assert_eq!(token.to_string(), s);
        }
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        for s in ["move.up", "wait:soon", "move.distance:2", "rotate.deg:5", ""] {
            assert!(s.parse::<InstructionToken>().is_err(), "{s}");
        }
    }

    #[test]
    fn test_token_serde_as_string() {
        let json = serde_json::to_string(&InstructionToken::Wait(250)).unwrap();
        assert_eq!(json, "\"wait:250\"");
        let back: InstructionToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, InstructionToken::Wait(250));
    }
}
