use ratatui::style::Color;

use crate::model::preference::ThemeMode;

/// Color scheme for the TUI, picked by the stored user preference.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub highlight: Color,
    pub border: Color,
    pub tag: Color,
    pub good: Color,
    pub bad: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            background: Color::Rgb(0x12, 0x12, 0x1A),
            text: Color::Rgb(0xC8, 0xC8, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x6A, 0x6A, 0x80),
            highlight: Color::Rgb(0xFF, 0xA7, 0x26),
            border: Color::Rgb(0x50, 0x50, 0x68),
            tag: Color::Rgb(0x57, 0xB2, 0xFF),
            good: Color::Rgb(0x4C, 0xD9, 0x80),
            bad: Color::Rgb(0xE8, 0x55, 0x55),
        }
    }

    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xF5, 0xF5, 0xF0),
            text: Color::Rgb(0x2A, 0x2A, 0x35),
            text_bright: Color::Rgb(0x00, 0x00, 0x00),
            dim: Color::Rgb(0x8A, 0x8A, 0x95),
            highlight: Color::Rgb(0xC2, 0x6A, 0x00),
            border: Color::Rgb(0xA0, 0xA0, 0xAA),
            tag: Color::Rgb(0x14, 0x63, 0xB0),
            good: Color::Rgb(0x1E, 0x8A, 0x4A),
            bad: Color::Rgb(0xB8, 0x2E, 0x2E),
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Theme::dark(),
            ThemeMode::Light => Theme::light(),
        }
    }
}
