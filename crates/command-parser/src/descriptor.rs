//! Structured command descriptors produced by the classifier

use serde::{Deserialize, Serialize};

/// Confidence levels assigned by the classifier cascade
pub mod confidence {
    pub const SAFETY: f32 = 0.99;
    pub const STOP: f32 = 0.95;
    pub const QUANTIFIED: f32 = 0.9;
    pub const DIRECTIONAL: f32 = 0.85;
    pub const ACCESSORY: f32 = 0.85;
    pub const CARDINAL: f32 = 0.75;
    pub const ELLIPSIS: f32 = 0.4;
    pub const UNKNOWN: f32 = 0.2;
}

/// Directions for translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
}

impl MoveDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            MoveDirection::Forward => "forward",
            MoveDirection::Backward => "backward",
            MoveDirection::Left => "left",
            MoveDirection::Right => "right",
            MoveDirection::Stop => "stop",
        }
    }

    pub fn is_lateral(self) -> bool {
        matches!(self, MoveDirection::Left | MoveDirection::Right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveStyle {
    #[default]
    Normal,
    Little,
    Sharp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnDirection {
    Left,
    Right,
}

impl From<TurnDirection> for MoveDirection {
    fn from(dir: TurnDirection) -> Self {
        match dir {
            TurnDirection::Left => MoveDirection::Left,
            TurnDirection::Right => MoveDirection::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStyle {
    #[default]
    Normal,
    Sharp,
}

impl From<TurnStyle> for MoveStyle {
    fn from(style: TurnStyle) -> Self {
        match style {
            TurnStyle::Normal => MoveStyle::Normal,
            TurnStyle::Sharp => MoveStyle::Sharp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraAction {
    Photo,
    Record,
    Zoom { value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyAction {
    EmergencyStop,
}

/// Translation command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveCommand {
    pub direction: MoveDirection,
    /// Absent for stop
    pub style: Option<MoveStyle>,
    pub distance_meters: Option<f64>,
    pub duration_ms: Option<u64>,
    /// Bounded by a distance or a duration
    pub relative: bool,
}

impl MoveCommand {
    pub fn stop() -> Self {
        Self {
            direction: MoveDirection::Stop,
            style: None,
            distance_meters: None,
            duration_ms: None,
            relative: false,
        }
    }

    /// Open-ended move in a direction
    pub fn toward(direction: MoveDirection, style: MoveStyle) -> Self {
        Self {
            direction,
            style: Some(style),
            distance_meters: None,
            duration_ms: None,
            relative: false,
        }
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.distance_meters = Some(meters);
        self.relative = true;
        self
    }

    pub fn with_duration(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self.relative = true;
        self
    }

    pub fn is_stop(&self) -> bool {
        self.direction == MoveDirection::Stop
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCommand {
    pub direction: TurnDirection,
    pub style: TurnStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotateCommand {
    pub direction: RotateDirection,
    pub degrees: f64,
    /// Rotations are deltas against the current heading
    pub relative: bool,
}

/// Closed set of command variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Safety { action: SafetyAction },
    Move(MoveCommand),
    Turn(TurnCommand),
    Rotate(RotateCommand),
    Speed { percent: f64 },
    Camera { action: CameraAction },
    Siren,
    Lights,
    Spray,
    Taser,
    Wait { ms: u64 },
    Unknown,
}

/// A classified instruction with its confidence and source clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    #[serde(flatten)]
    pub command: Command,
    /// Confidence score (0.0 to 1.0)
    pub confidence: f32,
    /// Clause text the command was classified from
    pub raw: String,
}

impl CommandDescriptor {
    pub fn new(command: Command, confidence: f32, raw: impl Into<String>) -> Self {
        Self {
            command,
            confidence: confidence.clamp(0.0, 1.0),
            raw: raw.into(),
        }
    }

    pub fn unknown(raw: impl Into<String>) -> Self {
        Self::new(Command::Unknown, confidence::UNKNOWN, raw)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.command, Command::Unknown)
    }

    /// True when the confidence reaches `threshold`
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}
