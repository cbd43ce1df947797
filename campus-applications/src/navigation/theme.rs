//! Light/dark preference kept in local storage

use crate::session::{LocalStore, THEME_KEY};
use campus_core::{CampusResult, Theme};
use std::sync::Arc;
use tracing::warn;

pub struct ThemePreference {
    local: Arc<dyn LocalStore>,
}

impl ThemePreference {
    pub fn new(local: Arc<dyn LocalStore>) -> Self {
        Self { local }
    }

    /// Stored theme; anything but `dark` reads as light
    pub fn current(&self) -> CampusResult<Theme> {
        Ok(match self.local.get_item(THEME_KEY)?.as_deref() {
            Some("dark") => Theme::Dark,
            Some("light") | None => Theme::Light,
            Some(other) => {
                warn!(stored = other, "Unknown theme, using light");
                Theme::Light
            }
        })
    }

    pub fn set(&self, theme: Theme) -> CampusResult<()> {
        self.local.set_item(THEME_KEY, theme.as_str())
    }

    /// Flip and persist, returning the new theme
    pub fn toggle(&self) -> CampusResult<Theme> {
        let next = self.current()?.toggled();
        self.set(next)?;
        Ok(next)
    }
}
