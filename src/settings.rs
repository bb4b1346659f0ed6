use std::path::PathBuf;

use directories::ProjectDirs;
use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Alignment, Element, Length};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::listing::SectionKind;
use crate::media::{ACCENT_BLUE, ACCENT_PURPLE, BACKGROUND_BLACK, ERROR_RED, TEXT_GRAY, TEXT_WHITE};

pub const API_KEY_ENV: &str = "TMDB_API_KEY";
const DEFAULT_LANGUAGE: &str = "en-US";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub api_key: String,
    pub language: String,
    pub sections: Vec<SectionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: String::from(DEFAULT_LANGUAGE),
            sections: SectionKind::default_enabled(),
            base_url: None,
        }
    }
}

impl AppSettings {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "marquee")
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Self::project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Stored settings, or defaults when no file exists yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// `TMDB_API_KEY` wins over the stored key.
    pub fn effective_api_key(&self) -> Option<String> {
        resolve_api_key(std::env::var(API_KEY_ENV).ok(), &self.api_key)
    }

    /// Enabled sections in display order, without duplicates.
    pub fn enabled_sections(&self) -> Vec<SectionKind> {
        SectionKind::ALL
            .into_iter()
            .filter(|kind| self.sections.contains(kind))
            .collect()
    }
}

fn resolve_api_key(env: Option<String>, stored: &str) -> Option<String> {
    env.into_iter()
        .chain(std::iter::once(stored.to_string()))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

#[derive(Debug, Clone)]
pub enum SetupMessage {
    ApiKeyChanged(String),
    LanguageChanged(String),
    Submit,
}

/// Shown instead of the catalog while no client could be built.
pub struct SetupPage {
    pub api_key: String,
    pub language: String,
    pub notice: String,
    pub error: Option<String>,
    base: AppSettings,
}

impl Default for SetupPage {
    fn default() -> Self {
        Self::new(AppSettings::default(), &ConfigError::MissingApiKey)
    }
}

impl SetupPage {
    pub fn new(base: AppSettings, reason: &ConfigError) -> Self {
        Self {
            api_key: base.api_key.clone(),
            language: base.language.clone(),
            notice: reason.to_string(),
            error: None,
            base,
        }
    }

    pub fn update(&mut self, message: SetupMessage) -> Option<AppSettings> {
        match message {
            SetupMessage::ApiKeyChanged(key) => {
                self.api_key = key;
                self.error = None;
                None
            }
            SetupMessage::LanguageChanged(lang) => {
                self.language = lang;
                None
            }
            SetupMessage::Submit => self.submit_with(AppSettings::save),
        }
    }

    /// A key that fails to persist is still used for this session.
    fn submit_with(
        &mut self,
        persist: impl FnOnce(&AppSettings) -> Result<(), ConfigError>,
    ) -> Option<AppSettings> {
        if self.api_key.trim().is_empty() {
            self.error = Some(String::from("API key is required"));
            return None;
        }
        let settings = AppSettings {
            api_key: self.api_key.trim().to_string(),
            language: if self.language.trim().is_empty() {
                String::from(DEFAULT_LANGUAGE)
            } else {
                self.language.trim().to_string()
            },
            sections: self.base.sections.clone(),
            base_url: self.base.base_url.clone(),
        };
        if let Err(e) = persist(&settings) {
            tracing::warn!(error = %e, "failed to persist settings, continuing with this session only");
        }
        Some(settings)
    }

    pub fn view(&self) -> Element<'_, SetupMessage> {
        let logo = text("MARQUEE")
            .size(48)
            .color(ACCENT_PURPLE)
            .font(iced::Font::with_name("sans-serif"));

        let notice = text(&self.notice).size(16).color(ERROR_RED);
        let subtitle = text("Configure your TMDB API settings to browse the catalog")
            .size(14)
            .color(TEXT_GRAY);

        let api_label = text("TMDB API Key").size(14).color(TEXT_WHITE);
        let api_hint = text("Get your free API key at themoviedb.org/settings/api")
            .size(12)
            .color(TEXT_GRAY);
        let api_input = text_input("Enter your TMDB API key...", &self.api_key)
            .on_input(SetupMessage::ApiKeyChanged)
            .on_submit(SetupMessage::Submit)
            .padding(12)
            .size(14)
            .width(Length::Fill);

        let lang_label = text("Language").size(14).color(TEXT_WHITE);
        let lang_input = text_input(DEFAULT_LANGUAGE, &self.language)
            .on_input(SetupMessage::LanguageChanged)
            .on_submit(SetupMessage::Submit)
            .padding(12)
            .size(14)
            .width(Length::Fill);

        let submit_button = button(text("Save and Continue").size(16).color(TEXT_WHITE))
            .padding([12, 32])
            .style(|_theme, status| {
                let bg = match status {
                    button::Status::Hovered => ACCENT_PURPLE,
                    _ => ACCENT_BLUE,
                };
                button::Style {
                    background: Some(iced::Background::Color(bg)),
                    text_color: TEXT_WHITE,
                    border: iced::Border::default().rounded(999),
                    ..Default::default()
                }
            })
            .on_press(SetupMessage::Submit);

        let error_text = match &self.error {
            Some(err) => text(err).size(14).color(ERROR_RED),
            None => text("").size(14),
        };

        let spacer = || Space::new().height(16);
        let small_spacer = || Space::new().height(4);

        let form = column![
            logo,
            spacer(),
            notice,
            small_spacer(),
            subtitle,
            spacer(),
            api_label,
            small_spacer(),
            api_hint,
            small_spacer(),
            api_input,
            spacer(),
            lang_label,
            small_spacer(),
            lang_input,
            spacer(),
            error_text,
            small_spacer(),
            row![submit_button].width(Length::Fill),
        ]
        .width(Length::Fixed(420.0))
        .align_x(Alignment::Start);

        container(form)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(BACKGROUND_BLACK)),
                ..Default::default()
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_overrides_stored_key() {
        assert_eq!(
            resolve_api_key(Some(String::from("from-env")), "stored"),
            Some(String::from("from-env"))
        );
    }

    #[test]
    fn test_blank_env_key_falls_back_to_stored() {
        assert_eq!(
            resolve_api_key(Some(String::from("  ")), " stored "),
            Some(String::from("stored"))
        );
    }

    #[test]
    fn test_no_key_anywhere_is_none() {
        assert_eq!(resolve_api_key(None, ""), None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        // Arrange
        let json = r#"{ "api_key": "abc" }"#;

        // Act
        let settings = AppSettings::from_json(json).unwrap();

        // Assert
        assert_eq!(settings.language, "en-US");
        assert_eq!(settings.sections, SectionKind::default_enabled());
    }

    #[test]
    fn test_enabled_sections_follow_display_order() {
        let settings = AppSettings {
            sections: vec![
                SectionKind::PopularSeries,
                SectionKind::Trending,
                SectionKind::Trending,
            ],
            ..AppSettings::default()
        };
        assert_eq!(
            settings.enabled_sections(),
            vec![SectionKind::Trending, SectionKind::PopularSeries]
        );
    }

    #[test]
    fn test_malformed_json_is_serialize_error() {
        assert!(matches!(
            AppSettings::from_json("{ nope"),
            Err(ConfigError::Serialize(_))
        ));
    }

    #[test]
    fn test_setup_submit_requires_key() {
        let mut page = SetupPage::default();
        assert!(page.update(SetupMessage::Submit).is_none());
        assert_eq!(page.error.as_deref(), Some("API key is required"));
        assert!(page.notice.contains("TMDB_API_KEY"));
    }

    #[test]
    fn test_submit_continues_when_save_fails() {
        // Arrange
        let mut page = SetupPage::default();
        page.update(SetupMessage::ApiKeyChanged(String::from(" valid-key ")));

        // Act
        let settings = page.submit_with(|_| Err(ConfigError::Io(String::from("Not a directory"))));

        // Assert
        let settings = settings.expect("key should be accepted");
        assert_eq!(settings.api_key, "valid-key");
        assert_eq!(settings.language, "en-US");
        assert!(page.error.is_none());
    }

    #[test]
    fn test_submit_hands_saved_settings_back() {
        let mut page = SetupPage::default();
        page.update(SetupMessage::ApiKeyChanged(String::from("k")));
        page.update(SetupMessage::LanguageChanged(String::from("fr-FR")));

        let mut persisted = None;
        let settings = page.submit_with(|s| {
            persisted = Some(s.clone());
            Ok(())
        });

        assert_eq!(settings, persisted);
        assert_eq!(settings.map(|s| s.language), Some(String::from("fr-FR")));
    }
}
