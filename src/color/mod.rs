//! Color: True-color values and the named palette.
//!
//! Segments carry an optional foreground color; `None` means "inherit the
//! terminal default". The named constants cover the rainbow defaults and
//! the handful of CSS-style names the demos use.

/// True-color RGB representation.
///
/// Uses 3 bytes for 24-bit color depth. Named constants follow the CSS
/// color keywords so animation scripts read naturally.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Red
    pub const RED: Self = Self::from_u32(0xFF0000);
    /// Orange
    pub const ORANGE: Self = Self::from_u32(0xFFA500);
    /// Yellow
    pub const YELLOW: Self = Self::from_u32(0xFFFF00);
    /// Green
    pub const GREEN: Self = Self::from_u32(0x008000);
    /// Blue
    pub const BLUE: Self = Self::from_u32(0x0000FF);
    /// Hot pink
    pub const HOT_PINK: Self = Self::from_u32(0xFF69B4);
    /// Violet
    pub const VIOLET: Self = Self::from_u32(0xEE82EE);
    /// Firebrick
    pub const FIREBRICK: Self = Self::from_u32(0xB22222);
    /// Orange red
    pub const ORANGE_RED: Self = Self::from_u32(0xFF4500);
    /// Green yellow
    pub const GREEN_YELLOW: Self = Self::from_u32(0xADFF2F);
    /// Light blue
    pub const LIGHT_BLUE: Self = Self::from_u32(0xADD8E6);

    /// Look up a CSS-style color keyword (case-insensitive).
    ///
    /// Only the keywords the engine and demos use are recognized;
    /// unknown names return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "orange" => Self::ORANGE,
            "yellow" => Self::YELLOW,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "hotpink" => Self::HOT_PINK,
            "violet" => Self::VIOLET,
            "firebrick" => Self::FIREBRICK,
            "orangered" => Self::ORANGE_RED,
            "greenyellow" => Self::GREEN_YELLOW,
            "lightblue" => Self::LIGHT_BLUE,
            _ => return None,
        };
        Some(color)
    }

    /// The seven-color default palette used by `rainbow`.
    pub const RAINBOW: [Self; 7] = [
        Self::RED,
        Self::ORANGE,
        Self::YELLOW,
        Self::GREEN,
        Self::BLUE,
        Self::HOT_PINK,
        Self::VIOLET,
    ];
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    /// Convert from a 24-bit hex color (e.g., 0xFF5500)
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}
