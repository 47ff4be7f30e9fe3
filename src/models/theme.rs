use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Colour scheme of the page the diagram lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn is_light(self) -> bool {
        self == Theme::Light
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}

/// Shared light-mode flag.
///
/// Owned and toggled by the UI side; the renderer only calls [`ThemeFlag::get`]
/// once per frame, so a toggle shows up on the next frame.
#[derive(Debug, Clone, Default)]
pub struct ThemeFlag {
    light: Arc<AtomicBool>,
}

impl ThemeFlag {
    pub fn new(theme: Theme) -> Self {
        Self {
            light: Arc::new(AtomicBool::new(theme.is_light())),
        }
    }

    pub fn get(&self) -> Theme {
        if self.light.load(Ordering::Relaxed) {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    pub fn set(&self, theme: Theme) {
        self.light.store(theme.is_light(), Ordering::Relaxed);
    }

    /// Flip the theme and return the new value.
    pub fn toggle(&self) -> Theme {
        let was_light = self.light.fetch_xor(true, Ordering::Relaxed);
        if was_light {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_is_shared_between_clones() {
        let ui = ThemeFlag::new(Theme::Dark);
        let renderer_view = ui.clone();

        assert_eq!(ui.toggle(), Theme::Light);
        assert_eq!(renderer_view.get(), Theme::Light);

        renderer_view.set(Theme::Dark);
        assert_eq!(ui.get(), Theme::Dark);
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!("Light".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_default_is_dark() {
        assert_eq!(ThemeFlag::default().get(), Theme::Dark);
        assert_eq!(Theme::default(), Theme::Dark);
    }
}
