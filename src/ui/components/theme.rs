//! Color palettes for the picker.
//!
//! Two palettes (dark and light) share one set of roles; widgets only ever
//! ask the palette for a style, never for a raw color.

use ratatui::style::{Color, Modifier, Style};

pub mod colors {
    use ratatui::style::Color;

    pub const BG_DEEP: Color = Color::Rgb(26, 27, 38); // #1a1b26
    pub const BG_SURFACE: Color = Color::Rgb(36, 40, 59); // #24283b
    pub const BG_HIGHLIGHT: Color = Color::Rgb(41, 46, 66); // #292e42
    pub const BORDER: Color = Color::Rgb(59, 66, 97); // #3b4261
    pub const BORDER_FOCUS: Color = Color::Rgb(125, 145, 200); // #7d91c8

    pub const TEXT_PRIMARY: Color = Color::Rgb(192, 202, 245); // #c0caf5
    pub const TEXT_MUTED: Color = Color::Rgb(105, 114, 158); // #696e9e

    pub const ACCENT_PRIMARY: Color = Color::Rgb(122, 162, 247); // #7aa2f7
    pub const ACCENT_SECONDARY: Color = Color::Rgb(187, 154, 247); // #bb9af7

    pub const STATUS_SUCCESS: Color = Color::Rgb(115, 218, 202); // #73daca
    pub const STATUS_WARNING: Color = Color::Rgb(224, 175, 104); // #e0af68
    pub const STATUS_ERROR: Color = Color::Rgb(247, 118, 142); // #f7768e
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemePalette {
    pub accent: Color,
    pub accent_alt: Color,
    pub bg: Color,
    pub fg: Color,
    pub surface: Color,
    pub highlight: Color,
    pub hint: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl ThemePalette {
    pub fn light() -> Self {
        Self {
            accent: Color::Rgb(47, 107, 231),
            accent_alt: Color::Rgb(124, 93, 198),
            bg: Color::Rgb(250, 250, 252),
            fg: Color::Rgb(36, 41, 46),
            surface: Color::Rgb(240, 241, 245),
            highlight: Color::Rgb(222, 230, 250),
            hint: Color::Rgb(125, 134, 144),
            border: Color::Rgb(216, 222, 228),
            success: Color::Rgb(45, 138, 72),
            warning: Color::Rgb(177, 133, 41),
            error: Color::Rgb(207, 34, 46),
        }
    }

    pub fn dark() -> Self {
        Self {
            accent: colors::ACCENT_PRIMARY,
            accent_alt: colors::ACCENT_SECONDARY,
            bg: colors::BG_DEEP,
            fg: colors::TEXT_PRIMARY,
            surface: colors::BG_SURFACE,
            highlight: colors::BG_HIGHLIGHT,
            hint: colors::TEXT_MUTED,
            border: colors::BORDER,
            success: colors::STATUS_SUCCESS,
            warning: colors::STATUS_WARNING,
            error: colors::STATUS_ERROR,
        }
    }

    pub fn for_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn name(self) -> &'static str {
        if self == Self::light() { "light" } else { "dark" }
    }

    pub fn toggled(self) -> Self {
        if self == Self::light() {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn title(self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text(self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn hint_style(self) -> Style {
        Style::default().fg(self.hint)
    }

    pub fn border_style(self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focus_style(self) -> Style {
        Style::default().fg(colors::BORDER_FOCUS)
    }

    /// Row style of the active photo.
    pub fn active_style(self) -> Style {
        Style::default()
            .bg(self.highlight)
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_style(self, kind: StatusKind) -> Style {
        let color = match kind {
            StatusKind::Info => self.hint,
            StatusKind::Busy => self.warning,
            StatusKind::Done => self.success,
            StatusKind::Error => self.error,
        };
        Style::default().fg(color)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Busy,
    Done,
    Error,
}

/// Parse a `#rrggbb` dominant-color string into a terminal color.
pub fn swatch(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatch_parses_hex_colors() {
        assert_eq!(swatch("#0c2633"), Some(Color::Rgb(12, 38, 51)));
        assert_eq!(swatch("0c2633"), None);
        assert_eq!(swatch("#zzzzzz"), None);
        assert_eq!(swatch("#fff"), None);
    }

    #[test]
    fn palette_names_round_trip() {
        assert_eq!(ThemePalette::for_name("light").name(), "light");
        assert_eq!(ThemePalette::for_name("anything").name(), "dark");
        assert_eq!(ThemePalette::dark().toggled(), ThemePalette::light());
    }
}
