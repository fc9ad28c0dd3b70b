//! Session-scoped context memory used for ellipsis resolution

use crate::descriptor::{MoveDirection, TurnStyle};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SPEED_PERCENT: f64 = 50.0;

/// Last-known-good motion state of one operator session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMemory {
    /// Never `Stop`; a stop clears it instead
    pub last_direction: Option<MoveDirection>,
    pub last_speed_percent: f64,
    pub last_heading_deg: f64,
    pub last_turn_style: TurnStyle,
}

impl Default for ContextMemory {
    fn default() -> Self {
        Self {
            last_direction: None,
            last_speed_percent: DEFAULT_SPEED_PERCENT,
            last_heading_deg: 0.0,
            last_turn_style: TurnStyle::Normal,
        }
    }
}

impl ContextMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_direction(&mut self, direction: MoveDirection) {
        if direction == MoveDirection::Stop {
            self.last_direction = None;
        } else {
            self.last_direction = Some(direction);
        }
    }

    pub(crate) fn record_stop(&mut self) {
        self.last_direction = None;
    }

    pub(crate) fn record_speed(&mut self, percent: f64) {
        self.last_speed_percent = percent;
    }

    pub(crate) fn record_turn(&mut self, direction: MoveDirection, style: TurnStyle) {
        self.record_direction(direction);
        self.last_turn_style = style;
    }

    /// Clockwise adds, counterclockwise subtracts
    pub(crate) fn record_rotation(&mut self, signed_degrees: f64) {
        self.last_heading_deg += signed_degrees;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = ContextMemory::default();
        assert_eq!(ctx.last_direction, None);
        assert_eq!(ctx.last_speed_percent, 50.0);
        assert_eq!(ctx.last_heading_deg, 0.0);
        assert_eq!(ctx.last_turn_style, TurnStyle::Normal);
    }

    #[test]
    fn test_stop_clears_direction() {
        let mut ctx = ContextMemory::default();
        ctx.record_direction(MoveDirection::Forward);
        assert_eq!(ctx.last_direction, Some(MoveDirection::Forward));
        ctx.record_direction(MoveDirection::Stop);
        assert_eq!(ctx.last_direction, None);
    }

    #[test]
    fn test_heading_accumulates() {
        let mut ctx = ContextMemory::default();
        ctx.record_rotation(90.0);
        ctx.record_rotation(-30.0);
        assert_eq!(ctx.last_heading_deg, 60.0);
    }
}
