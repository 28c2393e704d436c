use std::sync::OnceLock;

use ratatui::style::Color;

use super::{colors::ColorPalette, Theme};

pub struct PaletteTheme {
    name: &'static str,
    palette: ColorPalette,
}

impl PaletteTheme {
    pub fn dark() -> &'static PaletteTheme {
        static DARK: OnceLock<PaletteTheme> = OnceLock::new();
        DARK.get_or_init(|| PaletteTheme {
            name: "Dark",
            palette: ColorPalette::from_hex([
                0x111827, 0xe5e7eb, 0x6b7280, 0x1f2937, 0x374151, 0x1e3a8a, 0x60a5fa,
                0xa78bfa, 0x34d399, 0xfbbf24, 0xf87171, 0x38bdf8, 0x14532d,
            ]),
        })
    }

    pub fn light() -> &'static PaletteTheme {
        static LIGHT: OnceLock<PaletteTheme> = OnceLock::new();
        LIGHT.get_or_init(|| PaletteTheme {
            name: "Light",
            palette: ColorPalette::from_hex([
                0xf9fafb, 0x111827, 0x6b7280, 0xffffff, 0xd1d5db, 0xdbeafe, 0x2563eb,
                0x7c3aed, 0x059669, 0xd97706, 0xdc2626, 0x0284c7, 0xdcfce7,
            ]),
        })
    }
}

impl Theme for PaletteTheme {
    fn name(&self) -> &'static str {
        self.name
    }

    fn background(&self) -> Color {
        self.palette.background
    }

    fn foreground(&self) -> Color {
        self.palette.foreground
    }

    fn foreground_dim(&self) -> Color {
        self.palette.foreground_dim
    }

    fn surface(&self) -> Color {
        self.palette.surface
    }

    fn border(&self) -> Color {
        self.palette.border
    }

    fn selection(&self) -> Color {
        self.palette.selection
    }

    fn accent(&self) -> Color {
        self.palette.accent
    }

    fn accent_secondary(&self) -> Color {
        self.palette.accent_secondary
    }

    fn success(&self) -> Color {
        self.palette.success
    }

    fn warning(&self) -> Color {
        self.palette.warning
    }

    fn error(&self) -> Color {
        self.palette.error
    }

    fn info(&self) -> Color {
        self.palette.info
    }

    fn highlight(&self) -> Color {
        self.palette.highlight
    }
}
