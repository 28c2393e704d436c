use ratatui::style::Color;

/// Full set of colors a theme hands to the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub background: Color,
    pub foreground: Color,
    pub foreground_dim: Color,
    pub surface: Color,
    pub border: Color,
    pub selection: Color,
    pub accent: Color,
    pub accent_secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    /// Background of freshly added settings while they are highlighted.
    pub highlight: Color,
}

impl ColorPalette {
    /// Builds a palette from `0xRRGGBB` values in field order.
    pub fn from_hex(hex: [u32; 13]) -> Self {
        let [
            background,
            foreground,
            foreground_dim,
            surface,
            border,
            selection,
            accent,
            accent_secondary,
            success,
            warning,
            error,
            info,
            highlight,
        ] = hex.map(hex_to_color);

        Self {
            background,
            foreground,
            foreground_dim,
            surface,
            border,
            selection,
            accent,
            accent_secondary,
            success,
            warning,
            error,
            info,
            highlight,
        }
    }
}

pub fn hex_to_color(hex: u32) -> Color {
    let r = ((hex >> 16) & 0xFF) as u8;
    let g = ((hex >> 8) & 0xFF) as u8;
    let b = (hex & 0xFF) as u8;
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_color() {
        assert_eq!(hex_to_color(0x1a2b3c), Color::Rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(hex_to_color(0xffffff), Color::Rgb(255, 255, 255));
    }
}
