use serde::{Deserialize, Serialize};

/// The two fixed palettes of the effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Draw colors for one theme, straight RGBA.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: [f32; 4],
    pub dot: [f32; 4],
    pub line: [f32; 4],
}

const fn rgba(r: u8, g: u8, b: u8, a: f32) -> [f32; 4] {
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a,
    ]
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Pure lookup. Switching the theme changes colors and nothing else.
    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: rgba(15, 23, 42, 1.0),
                dot: rgba(56, 189, 248, 0.6),
                line: rgba(56, 189, 248, 0.15),
            },
            Theme::Light => Palette {
                background: rgba(248, 250, 252, 1.0),
                dot: rgba(14, 165, 233, 0.6),
                line: rgba(14, 165, 233, 0.15),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_involution() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn palettes_are_stable_and_distinct() {
        assert_eq!(Theme::Dark.palette(), Theme::Dark.palette());
        assert_ne!(Theme::Dark.palette(), Theme::Light.palette());
    }

    #[test]
    fn line_color_is_fainter_than_dot_color() {
        for theme in [Theme::Dark, Theme::Light] {
            let palette = theme.palette();
            assert!(palette.line[3] < palette.dot[3]);
        }
    }
}
