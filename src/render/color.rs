//! Chart colors and the urgency palette.
//!
//! Objects are drawn in grays on a dark background: the sooner the closest
//! approach, the brighter the fill.

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };

    pub const fn gray(level: u8) -> Self {
        Self { r: level, g: level, b: level, a: 255 }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#rrggbb`; alpha is written separately where needed.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0–1 opacity.
    pub fn opacity(self) -> f32 {
        const INV_255: f32 = 1.0 / 255.0;
        self.a as f32 * INV_255
    }
}

/// Chart chrome.
pub const BACKGROUND: Rgba = Rgba::rgb(11, 13, 23);
pub const GRID: Rgba = Rgba::rgb(52, 56, 74);
pub const LABEL: Rgba = Rgba::rgb(150, 156, 178);
pub const EARTH: Rgba = Rgba::rgb(70, 130, 220);
pub const PANEL: Rgba = Rgba { r: 24, g: 27, b: 42, a: 235 };
pub const PANEL_BORDER: Rgba = Rgba::rgb(120, 126, 150);
pub const PANEL_TEXT: Rgba = Rgba::rgb(230, 232, 240);

/// Fill bucket chosen from days until closest approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApproachColor {
    /// Closest approach is today
    White,
    /// Within the week
    LightGray,
    /// Within the month
    MidGray,
    /// Within two months
    DarkGray,
    /// Further out
    Darkest,
}

impl ApproachColor {
    pub const ALL: [ApproachColor; 5] = [
        ApproachColor::White,
        ApproachColor::LightGray,
        ApproachColor::MidGray,
        ApproachColor::DarkGray,
        ApproachColor::Darkest,
    ];

    pub fn rgba(self) -> Rgba {
        match self {
            ApproachColor::White => Rgba::WHITE,
            ApproachColor::LightGray => Rgba::gray(204),
            ApproachColor::MidGray => Rgba::gray(153),
            ApproachColor::DarkGray => Rgba::gray(102),
            ApproachColor::Darkest => Rgba::gray(68),
        }
    }

    /// CSS class suffix used by the SVG writer.
    pub fn class_name(self) -> &'static str {
        match self {
            ApproachColor::White => "white",
            ApproachColor::LightGray => "light-gray",
            ApproachColor::MidGray => "mid-gray",
            ApproachColor::DarkGray => "dark-gray",
            ApproachColor::Darkest => "darkest",
        }
    }
}
