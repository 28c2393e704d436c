mod colors;
mod palettes;

pub use colors::{hex_to_color, ColorPalette};
pub use palettes::PaletteTheme;

use agenthub_core::ThemeMode;
use ratatui::style::Color;

pub trait Theme: Send + Sync {
    fn name(&self) -> &'static str;

    fn background(&self) -> Color;
    fn foreground(&self) -> Color;
    fn foreground_dim(&self) -> Color;

    fn surface(&self) -> Color;
    fn border(&self) -> Color;
    fn selection(&self) -> Color;

    fn accent(&self) -> Color;
    fn accent_secondary(&self) -> Color;

    fn success(&self) -> Color;
    fn warning(&self) -> Color;
    fn error(&self) -> Color;
    fn info(&self) -> Color;
    fn highlight(&self) -> Color;
}

/// Maps the persisted dark/light mode onto a concrete palette.
pub struct ThemeManager {
    mode: ThemeMode,
}

impl ThemeManager {
    pub fn new(mode: ThemeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ThemeMode) {
        self.mode = mode;
    }

    pub fn current_theme(&self) -> &'static dyn Theme {
        match self.mode {
            ThemeMode::Dark => PaletteTheme::dark(),
            ThemeMode::Light => PaletteTheme::light(),
        }
    }

    pub fn current_theme_name(&self) -> &'static str {
        self.current_theme().name()
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}
