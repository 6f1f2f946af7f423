use std::time::Duration;

use crate::shared::{Color, LOAD_MAX, LOAD_MIN, Pixel, Rgb};

pub const LINE_WEIGHT: f64 = 5.0;
pub const LINE_OPACITY: f64 = 0.8;
pub const SELECTED_LINE_WEIGHT: f64 = 8.0;
pub const HOVER_LINE_WEIGHT: f64 = 10.0;
pub const SELECTED_LINE_Z: i32 = 400;

pub const INACTIVE_RADIUS: f64 = 7.0;
pub const ACTIVE_RADIUS: f64 = LOAD_MIN as f64;
pub const MAX_RADIUS: f64 = LOAD_MAX as f64;
pub const INACTIVE_OUTLINE: f64 = 2.0;
pub const ACTIVE_OUTLINE: f64 = 4.0;

pub const VEHICLE_RADIUS: f64 = 6.0;
pub const BUS_COLOR: Rgb = Rgb::from_hex(0x2563eb);
pub const TRAIN_COLOR: Rgb = Rgb::from_hex(0xef4444);

pub const RING_COUNT: usize = 3;
pub const RING_SIZE: f64 = 60.0;
pub const RING_PERIOD: Duration = Duration::from_millis(1500);
pub const RING_PHASE_STEP: Duration = Duration::from_millis(100);

/// Gap between the top of a marker and its value bubble.
pub const BUBBLE_GAP: f64 = 12.0;
pub const POPUP_DELAY: Duration = Duration::from_secs(1);
pub const FIT_PADDING: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgb,
    pub weight: f64,
    pub opacity: f64,
    pub z_index: i32,
    pub glow: bool,
}

impl LineStyle {
    pub fn base(color: Rgb) -> Self {
        Self {
            color,
            weight: LINE_WEIGHT,
            opacity: LINE_OPACITY,
            z_index: 0,
            glow: false,
        }
    }

    pub fn selected(color: Rgb) -> Self {
        Self {
            color,
            weight: SELECTED_LINE_WEIGHT,
            opacity: 1.0,
            z_index: SELECTED_LINE_Z,
            glow: true,
        }
    }

    /// Pointer over the line, keeps stacking and glow of `self`.
    pub fn hovered(&self) -> Self {
        Self {
            weight: HOVER_LINE_WEIGHT,
            opacity: 1.0,
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill: Color,
    pub outline: Color,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl MarkerStyle {
    pub fn inactive() -> Self {
        Self {
            radius: INACTIVE_RADIUS,
            fill: Color::BLACK,
            outline: Color::WHITE,
            weight: INACTIVE_OUTLINE,
            fill_opacity: 1.0,
        }
    }

    pub fn active(radius: f64, fill: Color) -> Self {
        Self {
            radius,
            fill,
            outline: Color::WHITE,
            weight: ACTIVE_OUTLINE,
            fill_opacity: 1.0,
        }
    }

    pub fn vehicle(color: Rgb) -> Self {
        Self {
            radius: VEHICLE_RADIUS,
            fill: color.into(),
            outline: color.into(),
            weight: INACTIVE_OUTLINE,
            fill_opacity: 0.2,
        }
    }
}

/// Radius for an active station, 14 at load 14 up to 28 at load 28.
pub fn load_radius(value: i32) -> f64 {
    (value as f64).clamp(ACTIVE_RADIUS, MAX_RADIUS)
}

/// Three concentric rings expanding and fading on a loop, each started a little later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSet {
    pub color: Color,
    pub size: f64,
    pub period: Duration,
    pub phases: [Duration; RING_COUNT],
}

impl RingSet {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            size: RING_SIZE,
            period: RING_PERIOD,
            phases: [Duration::ZERO, RING_PHASE_STEP, RING_PHASE_STEP * 2],
        }
    }
}

/// Screen offset of a bubble from its station, independent of zoom.
pub fn bubble_offset(radius: f64) -> Pixel {
    Pixel::new(0.0, -(radius + BUBBLE_GAP))
}

pub const PULSE_STYLESHEET_ID: &str = "pulse-ring-style";

pub const PULSE_STYLESHEET: &str = r#"
.pulse-ring {
  position: absolute;
  left: 50%;
  top: 50%;
  width: 60px;
  height: 60px;
  margin-left: -30px;
  margin-top: -30px;
  border-radius: 50%;
  pointer-events: none;
  box-sizing: border-box;
  border: 3px solid var(--pulse-color, #fff);
  opacity: 0.7;
}
.pulse-ring.ring1 { animation: pulse 1.5s cubic-bezier(0.66,0,0,1) 0s infinite; }
.pulse-ring.ring2 { animation: pulse 1.5s cubic-bezier(0.66,0,0,1) 0.1s infinite; }
.pulse-ring.ring3 { animation: pulse 1.5s cubic-bezier(0.66,0,0,1) 0.2s infinite; }
@keyframes pulse {
  0% { transform: scale(0.7); opacity: 0.7; }
  70% { transform: scale(1.5); opacity: 0; }
  100% { transform: scale(0.7); opacity: 0; }
}
"#;

#[test]
fn load_radius_test() {
    assert_eq!(load_radius(14), 14.0);
    assert_eq!(load_radius(21), 21.0);
    assert_eq!(load_radius(28), 28.0);
    assert_eq!(load_radius(2), 14.0);
    assert_eq!(load_radius(90), 28.0);
}

#[test]
fn ring_phases_test() {
    let rings = RingSet::new(Color::WHITE);
    assert_eq!(rings.phases[1] - rings.phases[0], RING_PHASE_STEP);
    assert_eq!(rings.phases[2] - rings.phases[1], RING_PHASE_STEP);
}
