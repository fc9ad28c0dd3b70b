//! Precedence-ordered classification of a single clause

use crate::context::ContextMemory;
use crate::descriptor::{
    confidence, CameraAction, Command, CommandDescriptor, MoveCommand, MoveDirection, MoveStyle,
    RotateCommand, RotateDirection, SafetyAction, TurnCommand, TurnDirection, TurnStyle,
};
use crate::error::Result;
use crate::lexicon::contains_phrase;
use crate::quantity::{Quantity, QuantityExtractor, Unit};

const SAFETY_WORDS: &[&str] = &["emergency", "estop", "e-stop", "abort", "panic"];
const SAFETY_PHRASES: &[&str] = &["e stop", "kill switch"];
const STOP_WORDS: &[&str] = &["stop", "halt", "freeze", "brake"];
const SPEED_WORDS: &[&str] = &["speed", "throttle", "power", "velocity"];
const WAIT_WORDS: &[&str] = &["wait", "pause"];
const DURATION_WORDS: &[&str] = &["for"];
const ROTATE_WORDS: &[&str] = &["rotate", "spin", "rotation", "rotating", "spinning"];
const ABOUT_FACE_PHRASES: &[&str] = &["turn around", "u-turn", "u turn"];
const TURN_WORDS: &[&str] = &["turn", "sharp", "steer"];
const SHARP_WORDS: &[&str] = &["sharp", "sharply", "hard"];
const LITTLE_WORDS: &[&str] = &["little", "slightly", "slight", "bit"];
const CCW_WORDS: &[&str] = &["left", "counterclockwise", "anticlockwise", "ccw"];
const CCW_PHRASES: &[&str] = &["counter clockwise", "anti clockwise"];
const ZOOM_WORDS: &[&str] = &["zoom"];
const RECORD_WORDS: &[&str] = &["record", "recording", "video", "film"];
const PHOTO_WORDS: &[&str] = &[
    "photo", "photograph", "picture", "pic", "snapshot", "snap", "capture", "camera",
];
const SIREN_WORDS: &[&str] = &["siren", "alarm"];
const LIGHTS_WORDS: &[&str] = &[
    "lights", "light", "flash", "flashlight", "torch", "headlights", "headlight", "lamp",
];
const SPRAY_WORDS: &[&str] = &["spray", "sprayer", "mist"];
const TASER_WORDS: &[&str] = &["taser", "tase", "shock", "stun"];

/// Rules of the cascade, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Safety,
    Stop,
    Speed,
    Wait,
    TimedMove,
    DistanceMove,
    Rotate,
    Turn,
    CardinalMove,
    Accessory,
}

impl Rule {
    pub const CASCADE: [Rule; 10] = [
        Rule::Safety,
        Rule::Stop,
        Rule::Speed,
        Rule::Wait,
        Rule::TimedMove,
        Rule::DistanceMove,
        Rule::Rotate,
        Rule::Turn,
        Rule::CardinalMove,
        Rule::Accessory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rule::Safety => "safety",
            Rule::Stop => "stop",
            Rule::Speed => "speed",
            Rule::Wait => "wait",
            Rule::TimedMove => "timed_move",
            Rule::DistanceMove => "distance_move",
            Rule::Rotate => "rotate",
            Rule::Turn => "turn",
            Rule::CardinalMove => "cardinal_move",
            Rule::Accessory => "accessory",
        }
    }
}

/// Tokenized view of one clause with its extracted quantity
#[derive(Debug)]
struct ClauseView<'a> {
    raw: &'a str,
    joined: String,
    words: Vec<String>,
    quantity: Quantity,
}

impl<'a> ClauseView<'a> {
    fn new(raw: &'a str, quantity: Quantity) -> Self {
        let words: Vec<String> = raw
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let joined = words.join(" ");
        Self {
            raw,
            joined,
            words,
            quantity,
        }
    }

    fn has(&self, cues: &[&str]) -> bool {
        self.words.iter().any(|w| cues.contains(&w.as_str()))
    }

    fn has_phrase(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| contains_phrase(&self.joined, p))
    }

    /// First direction cue in reading order
    fn direction(&self) -> Option<MoveDirection> {
        self.words.iter().find_map(|w| match w.as_str() {
            "forward" | "forwards" | "ahead" | "straight" => Some(MoveDirection::Forward),
            "back" | "backward" | "backwards" | "reverse" => Some(MoveDirection::Backward),
            "left" => Some(MoveDirection::Left),
            "right" => Some(MoveDirection::Right),
            _ => None,
        })
    }

    fn lateral(&self) -> Option<TurnDirection> {
        self.words.iter().find_map(|w| match w.as_str() {
            "left" => Some(TurnDirection::Left),
            "right" => Some(TurnDirection::Right),
            _ => None,
        })
    }

    /// sharp > little > normal
    fn style(&self) -> MoveStyle {
        if self.has(SHARP_WORDS) {
            MoveStyle::Sharp
        } else if self.has(LITTLE_WORDS) {
            MoveStyle::Little
        } else {
            MoveStyle::Normal
        }
    }

    /// Right/clockwise, or no side named at all, reads as clockwise.
    fn rotation(&self) -> RotateDirection {
        if self.has(CCW_WORDS) || self.has_phrase(CCW_PHRASES) {
            RotateDirection::CounterClockwise
        } else {
            RotateDirection::Clockwise
        }
    }

    fn descriptor(&self, command: Command, confidence: f32) -> CommandDescriptor {
        CommandDescriptor::new(command, confidence, self.raw)
    }
}

/// Maps one clause to its descriptors, updating context on success
#[derive(Debug, Clone)]
pub struct Classifier {
    quantities: QuantityExtractor,
    zoom_step: f64,
}

impl Classifier {
    pub fn new(zoom_step: f64) -> Result<Self> {
        Ok(Self {
            quantities: QuantityExtractor::new()?,
            zoom_step,
        })
    }

    pub fn quantities(&self) -> &QuantityExtractor {
        &self.quantities
    }

    /// Run the cascade; the first matching rule wins. A clause nothing
    /// matches yields a single `unknown` and leaves `context` untouched.
    pub fn classify(&self, clause: &str, context: &mut ContextMemory) -> Vec<CommandDescriptor> {
        let view = ClauseView::new(clause, self.quantities.extract(clause));
        for rule in Rule::CASCADE {
            if let Some(descriptors) = self.apply(rule, &view, context) {
                tracing::debug!(
                    rule = rule.name(),
                    clause,
                    count = descriptors.len(),
                    "clause classified"
                );
                return descriptors;
            }
        }
        tracing::debug!(clause, "clause unmatched");
        vec![CommandDescriptor::unknown(clause)]
    }

    fn apply(
        &self,
        rule: Rule,
        clause: &ClauseView<'_>,
        ctx: &mut ContextMemory,
    ) -> Option<Vec<CommandDescriptor>> {
        match rule {
            Rule::Safety => self.safety(clause),
            Rule::Stop => self.stop(clause, ctx),
            Rule::Speed => self.speed(clause, ctx),
            Rule::Wait => self.wait(clause),
            Rule::TimedMove => self.timed_move(clause, ctx),
            Rule::DistanceMove => self.distance_move(clause, ctx),
            Rule::Rotate => self.rotate(clause, ctx),
            Rule::Turn => self.turn(clause, ctx),
            Rule::CardinalMove => self.cardinal_move(clause, ctx),
            Rule::Accessory => self.accessory(clause),
        }
    }

    fn safety(&self, clause: &ClauseView<'_>) -> Option<Vec<CommandDescriptor>> {
        if !(clause.has(SAFETY_WORDS) || clause.has_phrase(SAFETY_PHRASES)) {
            return None;
        }
        let command = Command::Safety {
            action: SafetyAction::EmergencyStop,
        };
        Some(vec![clause.descriptor(command, confidence::SAFETY)])
    }

    fn stop(
        &self,
        clause: &ClauseView<'_>,
        ctx: &mut ContextMemory,
    ) -> Option<Vec<CommandDescriptor>> {
        if !clause.has(STOP_WORDS) {
            return None;
        }
        ctx.record_stop();
        let command = Command::Move(MoveCommand::stop());
        Some(vec![clause.descriptor(command, confidence::STOP)])
    }

    fn speed(
        &self,
        clause: &ClauseView<'_>,
        ctx: &mut ContextMemory,
    ) -> Option<Vec<CommandDescriptor>> {
        if !clause.has(SPEED_WORDS) {
            return None;
        }
        let q = clause.quantity;
        let value = q.value?;
        if !matches!(q.unit, None | Some(Unit::Percent)) {
            return None;
        }
        let percent = value.clamp(0.0, 100.0);
        ctx.record_speed(percent);
        let command = Command::Speed { percent };
        Some(vec![clause.descriptor(command, confidence::QUANTIFIED)])
    }

    fn wait(&self, clause: &ClauseView<'_>) -> Option<Vec<CommandDescriptor>> {
        if !clause.has(WAIT_WORDS) {
            return None;
        }
        let ms = clause.quantity.as_millis()?;
        Some(vec![
            clause.descriptor(Command::Wait { ms }, confidence::QUANTIFIED)
        ])
    }

    fn timed_move(
        &self,
        clause: &ClauseView<'_>,
        ctx: &mut ContextMemory,
    ) -> Option<Vec<CommandDescriptor>> {
        if !clause.has(DURATION_WORDS) {
            return None;
        }
        let ms = clause.quantity.as_millis()?;
        let direction = clause.direction()?;
        ctx.record_direction(direction);
        let motion = MoveCommand::toward(direction, clause.style()).with_duration(ms);
        Some(vec![
            clause.descriptor(Command::Move(motion), confidence::QUANTIFIED),
            clause.descriptor(Command::Wait { ms }, confidence::QUANTIFIED),
            clause.descriptor(Command::Move(MoveCommand::stop()), confidence::QUANTIFIED),
        ])
    }

    fn distance_move(
        &self,
        clause: &ClauseView<'_>,
        ctx: &mut ContextMemory,
    ) -> Option<Vec<CommandDescriptor>> {
        let direction = clause.direction()?;
        let meters = clause.quantity.as_meters()?;
        ctx.record_direction(direction);
        let motion = MoveCommand::toward(direction, clause.style()).with_distance(meters);
        Some(vec![
            clause.descriptor(Command::Move(motion), confidence::QUANTIFIED)
        ])
    }

    fn rotate(
        &self,
        clause: &ClauseView<'_>,
        ctx: &mut ContextMemory,
    ) -> Option<Vec<CommandDescriptor>> {
        let degrees = if clause.has(ROTATE_WORDS) {
            clause.quantity.as_degrees()?
        } else if clause.has_phrase(ABOUT_FACE_PHRASES) && clause.quantity.value.is_none() {
            180.0
        } else {
            return None;
        };
        let direction = clause.rotation();
        let signed = match direction {
            RotateDirection::Clockwise => degrees,
            RotateDirection::CounterClockwise => -degrees,
        };
        ctx.record_rotation(signed);
        let command = Command::Rotate(RotateCommand {
            direction,
            degrees,
            relative: true,
        });
        Some(vec![clause.descriptor(command, confidence::DIRECTIONAL)])
    }

    fn turn(
        &self,
        clause: &ClauseView<'_>,
        ctx: &mut ContextMemory,
    ) -> Option<Vec<CommandDescriptor>> {
        if !clause.has(TURN_WORDS) {
            return None;
        }
        let direction = clause.lateral()?;
        let style = if clause.has(SHARP_WORDS) {
            TurnStyle::Sharp
        } else {
            TurnStyle::Normal
        };
        ctx.record_turn(direction.into(), style);
        let command = Command::Turn(TurnCommand { direction, style });
        Some(vec![clause.descriptor(command, confidence::DIRECTIONAL)])
    }

    fn cardinal_move(
        &self,
        clause: &ClauseView<'_>,
        ctx: &mut ContextMemory,
    ) -> Option<Vec<CommandDescriptor>> {
        let direction = clause.direction()?;
        ctx.record_direction(direction);
        let command = Command::Move(MoveCommand::toward(direction, clause.style()));
        Some(vec![clause.descriptor(command, confidence::CARDINAL)])
    }

    fn accessory(&self, clause: &ClauseView<'_>) -> Option<Vec<CommandDescriptor>> {
        let mut out = Vec::new();
        let camera = if clause.has(ZOOM_WORDS) {
            Some(CameraAction::Zoom {
                value: clause.quantity.value.unwrap_or(self.zoom_step),
            })
        } else if clause.has(RECORD_WORDS) {
            Some(CameraAction::Record)
        } else if clause.has(PHOTO_WORDS) {
            Some(CameraAction::Photo)
        } else {
            None
        };
        if let Some(action) = camera {
            out.push(clause.descriptor(Command::Camera { action }, confidence::ACCESSORY));
        }
        let triggers = [
            (SIREN_WORDS, Command::Siren),
            (LIGHTS_WORDS, Command::Lights),
            (SPRAY_WORDS, Command::Spray),
            (TASER_WORDS, Command::Taser),
        ];
        for (cues, command) in triggers {
            if clause.has(cues) {
                out.push(clause.descriptor(command, confidence::ACCESSORY));
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }
}
