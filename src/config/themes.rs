use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    HighContrast,
    Solarized,
}

/// Colors used by the renderer for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub backdrop: Color,
    pub header: Color,
    pub card_bg: Color,
    pub card_fg: Color,
    pub card_meta: Color,
    pub card_selected: Color,
    pub hint: Color,
    pub modal_bg: Color,
    pub modal_fg: Color,
    pub accent: Color,
    pub disabled: Color,
}

#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: Vec<(ThemeName, Palette)>,
}

impl ThemeRegistry {
    pub fn palette(&self, theme: ThemeName) -> Palette {
        self.themes
            .iter()
            .find(|(name, _)| *name == theme)
            .map(|(_, palette)| *palette)
            .unwrap_or_else(|| builtin_palette(ThemeName::Dark))
    }

    pub fn all(&self) -> impl Iterator<Item = &ThemeName> {
        self.themes.iter().map(|(name, _)| name)
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        let themes = ThemeName::iter()
            .map(|name| (name, builtin_palette(name)))
            .collect();
        Self { themes }
    }
}

fn builtin_palette(theme: ThemeName) -> Palette {
    match theme {
        ThemeName::Dark => Palette {
            backdrop: Color::Reset,
            header: Color::LightGreen,
            card_bg: Color::LightYellow,
            card_fg: Color::Black,
            card_meta: Color::DarkGray,
            card_selected: Color::Cyan,
            hint: Color::Gray,
            modal_bg: Color::Black,
            modal_fg: Color::White,
            accent: Color::Blue,
            disabled: Color::DarkGray,
        },
        ThemeName::Light => Palette {
            backdrop: Color::White,
            header: Color::Blue,
            card_bg: Color::Yellow,
            card_fg: Color::Black,
            card_meta: Color::DarkGray,
            card_selected: Color::Blue,
            hint: Color::DarkGray,
            modal_bg: Color::White,
            modal_fg: Color::Black,
            accent: Color::Blue,
            disabled: Color::Gray,
        },
        ThemeName::HighContrast => Palette {
            backdrop: Color::Black,
            header: Color::White,
            card_bg: Color::Black,
            card_fg: Color::White,
            card_meta: Color::Yellow,
            card_selected: Color::LightMagenta,
            hint: Color::White,
            modal_bg: Color::Black,
            modal_fg: Color::White,
            accent: Color::LightYellow,
            disabled: Color::DarkGray,
        },
        ThemeName::Solarized => Palette {
            backdrop: Color::Rgb(0, 43, 54),
            header: Color::Rgb(42, 161, 152),
            card_bg: Color::Rgb(253, 246, 227),
            card_fg: Color::Rgb(88, 110, 117),
            card_meta: Color::Rgb(147, 161, 161),
            card_selected: Color::Rgb(38, 139, 210),
            hint: Color::Rgb(131, 148, 150),
            modal_bg: Color::Rgb(7, 54, 66),
            modal_fg: Color::Rgb(238, 232, 213),
            accent: Color::Rgb(38, 139, 210),
            disabled: Color::Rgb(88, 110, 117),
        },
    }
}
