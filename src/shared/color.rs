use std::fmt::Display;

pub const LOAD_MIN: i32 = 14;
pub const LOAD_MID: i32 = 21;
pub const LOAD_MAX: i32 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self(0xff, 0xff, 0xff);

    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Component-wise interpolation, `t` in `[0, 1]`.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            hue: self.hue + (to.hue - self.hue) * t,
            saturation: self.saturation + (to.saturation - self.saturation) * t,
            lightness: self.lightness + (to.lightness - self.lightness) * t,
        }
    }
}

impl Display for Hsl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hsl({},{}%,{}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb(Rgb),
    Hsl(Hsl),
}

impl Color {
    pub const BLACK: Self = Self::Rgb(Rgb::BLACK);
    pub const WHITE: Self = Self::Rgb(Rgb::WHITE);
}

impl From<Rgb> for Color {
    fn from(value: Rgb) -> Self {
        Self::Rgb(value)
    }
}

impl From<Hsl> for Color {
    fn from(value: Hsl) -> Self {
        Self::Hsl(value)
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Rgb(rgb) => rgb.fmt(f),
            Color::Hsl(hsl) => hsl.fmt(f),
        }
    }
}

pub const LOAD_LOW: Hsl = Hsl::new(142.0, 70.0, 49.0);
pub const LOAD_MEDIUM: Hsl = Hsl::new(50.0, 100.0, 50.0);
pub const LOAD_HIGH: Hsl = Hsl::new(0.0, 84.0, 60.0);

/// Three point ramp green -> yellow -> red over the expected load range.
/// Values outside the range take the nearest end color.
pub fn load_color(value: i32) -> Hsl {
    if value <= LOAD_MIN {
        return LOAD_LOW;
    }
    if value >= LOAD_MAX {
        return LOAD_HIGH;
    }
    let value = value as f64;
    if value <= LOAD_MID as f64 {
        let t = (value - LOAD_MIN as f64) / (LOAD_MID - LOAD_MIN) as f64;
        LOAD_LOW.lerp(&LOAD_MEDIUM, t)
    } else {
        let t = (value - LOAD_MID as f64) / (LOAD_MAX - LOAD_MID) as f64;
        LOAD_MEDIUM.lerp(&LOAD_HIGH, t)
    }
}

pub const DEFAULT_LINE_COLOR: Rgb = Rgb::from_hex(0x00bcd4);

const LINE_PALETTE: [(&str, Rgb); 6] = [
    ("red", Rgb::from_hex(0xd32f2f)),
    ("blue", Rgb::from_hex(0x1976d2)),
    ("orange", Rgb::from_hex(0xf57c00)),
    ("green", Rgb::from_hex(0x388e3c)),
    ("silver", Rgb::from_hex(0x757575)),
    ("mattapan", Rgb::from_hex(0xad1457)),
];

/// Lowercased first line of a possibly shared name, `"Red/Blue"` is `"red"`.
pub fn canonical_line_name(line: &str) -> String {
    line.split('/').next().unwrap_or_default().trim().to_lowercase()
}

pub fn line_color(line: &str) -> Rgb {
    let canonical = canonical_line_name(line);
    LINE_PALETTE
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_LINE_COLOR)
}

#[test]
fn load_color_ends_test() {
    assert_eq!(load_color(LOAD_MIN), LOAD_LOW);
    assert_eq!(load_color(LOAD_MAX), LOAD_HIGH);
    assert_eq!(load_color(3), LOAD_LOW);
    assert_eq!(load_color(40), LOAD_HIGH);
}

#[test]
fn load_color_midpoint_test() {
    assert_eq!(load_color(LOAD_MID), LOAD_MEDIUM);
}

#[test]
fn load_color_monotonic_hue_test() {
    let mut last = f64::INFINITY;
    for value in LOAD_MIN..=LOAD_MAX {
        let hue = load_color(value).hue;
        assert!(hue <= last, "hue rose at {value}");
        last = hue;
    }
}

#[test]
fn line_color_test() {
    assert_eq!(line_color("Red"), Rgb::from_hex(0xd32f2f));
    assert_eq!(line_color("ORANGE/Red"), Rgb::from_hex(0xf57c00));
    assert_eq!(line_color(" blue "), Rgb::from_hex(0x1976d2));
    assert_eq!(line_color("Purple"), DEFAULT_LINE_COLOR);
    assert_eq!(line_color(""), DEFAULT_LINE_COLOR);
}

#[test]
fn css_test() {
    assert_eq!(Rgb::from_hex(0x22c55e).to_string(), "#22c55e");
    assert_eq!(LOAD_MEDIUM.to_string(), "hsl(50,100%,50%)");
}
