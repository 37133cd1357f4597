use glam::Vec2;
use ripplefx_common::DistortMode;

/// Slowest ripple speed offered to users.
pub const MIN_STEP: i32 = 1;
/// Fastest ripple speed offered to users.
pub const MAX_STEP: i32 = 50;

/// A high-level action produced by the viewer's input handling.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start a ripple at a canvas-space point.
    AddRipple(Vec2),
    SetDistortMode(DistortMode),
    ToggleDistortMode,
    /// Change the speed used for new ripples.
    SetStep(i32),
    /// Switch the sampled texture by index.
    SelectTexture(usize),
    /// Input that isn't bound to anything.
    Noop,
}

/// Map a pointer position in window pixels (origin top-left, y down) to
/// canvas coordinates (origin at the window centre, y up).
pub fn window_to_canvas(pointer: Vec2, window_size: Vec2) -> Vec2 {
    Vec2::new(
        pointer.x - window_size.x * 0.5,
        window_size.y * 0.5 - pointer.y,
    )
}

pub fn clamp_step(step: i32) -> i32 {
    step.clamp(MIN_STEP, MAX_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_centre_is_canvas_origin() {
        let p = window_to_canvas(Vec2::new(256.0, 256.0), Vec2::new(512.0, 512.0));
        assert_eq!(p, Vec2::ZERO);
    }

    #[test]
    fn window_top_left_is_canvas_upper_left() {
        let p = window_to_canvas(Vec2::ZERO, Vec2::new(800.0, 600.0));
        assert_eq!(p, Vec2::new(-400.0, 300.0));
        let p = window_to_canvas(Vec2::new(800.0, 600.0), Vec2::new(800.0, 600.0));
        assert_eq!(p, Vec2::new(400.0, -300.0));
    }

    #[test]
    fn step_is_clamped() {
        assert_eq!(clamp_step(0), MIN_STEP);
        assert_eq!(clamp_step(-5), MIN_STEP);
        assert_eq!(clamp_step(7), 7);
        assert_eq!(clamp_step(500), MAX_STEP);
    }

    #[test]
    fn actions_compare() {
        assert_eq!(
            Action::SetDistortMode(DistortMode::Vertices),
            Action::SetDistortMode(DistortMode::Vertices)
        );
        assert_ne!(Action::SelectTexture(0), Action::SelectTexture(1));
        assert!(matches!(Action::AddRipple(Vec2::ONE), Action::AddRipple(_)));
    }
}
