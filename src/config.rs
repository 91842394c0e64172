// src/config.rs

use crate::error::Result;
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

pub const KEY_THEME: &str = "theme";
pub const KEY_FAVORITES: &str = "favorites";
pub const KEY_ACCESSIBILITY: &str = "accessibilityPreferences";
pub const KEY_QUIZ_BEST: &str = "quizBestScore";
pub const KEY_QUIZ_STREAK: &str = "quizMaxStreak";

// --- Key-value store ---

/// One JSON file per key under the platform config directory
#[derive(Debug, Clone)]
pub struct PrefStore {
  dir: PathBuf,
}

impl PrefStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  /// e.g. ~/.config/ptview/
  pub fn open_default() -> Self {
    if let Some(proj) = ProjectDirs::from("org", "ptview", "ptview") {
      Self::new(proj.config_dir())
    } else {
      Self::new(PathBuf::from("."))
    }
  }

  fn path(&self, key: &str) -> PathBuf {
    self.dir.join(format!("{}.json", key))
  }

  /// Missing or unreadable blobs are treated as absent
  pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let path = self.path(key);
    if !path.exists() {
      return None;
    }
    let file = match File::open(&path) {
      Ok(f) => f,
      Err(e) => {
        log::warn!("Error opening preference {:?}: {}", path, e);
        return None;
      }
    };
    match serde_json::from_reader(BufReader::new(file)) {
      Ok(value) => Some(value),
      Err(e) => {
        log::warn!("Ignoring corrupt preference '{}': {}", key, e);
        None
      }
    }
  }

  pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
    fs::create_dir_all(&self.dir)?;
    let writer = BufWriter::new(File::create(self.path(key))?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
  }

  pub fn remove(&self, key: &str) -> Result<()> {
    let path = self.path(key);
    if path.exists() {
      fs::remove_file(path)?;
    }
    Ok(())
  }
}

// --- Typed preferences ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  Light,
  Dark,
}

impl Theme {
  pub fn toggled(self) -> Self {
    match self {
      Theme::Light => Theme::Dark,
      Theme::Dark => Theme::Light,
    }
  }

  pub fn is_dark(self) -> bool {
    self == Theme::Dark
  }
}

pub const FONT_SCALE_MIN: u32 = 80;
pub const FONT_SCALE_MAX: u32 = 150;
pub const FONT_SCALE_STEP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Accessibility {
  pub high_contrast: bool,
  pub reduced_motion: bool,
  /// Percent of the default font size
  #[serde(rename = "fontSize")]
  pub font_scale: u32,
  pub screen_reader_mode: bool,
  pub keyboard_navigation: bool,
  pub focus_visible: bool,
}

impl Default for Accessibility {
  fn default() -> Self {
    Self {
      high_contrast: false,
      reduced_motion: false,
      font_scale: 100,
      screen_reader_mode: false,
      keyboard_navigation: false,
      focus_visible: false,
    }
  }
}

impl Accessibility {
  pub fn set_font_scale(&mut self, percent: u32) {
    self.font_scale = percent.clamp(FONT_SCALE_MIN, FONT_SCALE_MAX);
  }

  pub fn font_factor(&self) -> f64 {
    self.font_scale as f64 / 100.0
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizRecords {
  pub best_score: u32,
  pub max_streak: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
  /// None follows the system preference
  pub theme: Option<Theme>,
  pub accessibility: Accessibility,
  pub favorites: Vec<u32>,
  pub quiz: QuizRecords,
}

impl Config {
  pub fn load(store: &PrefStore) -> (Self, String) {
    let mut accessibility: Accessibility = store.get(KEY_ACCESSIBILITY).unwrap_or_default();
    accessibility.set_font_scale(accessibility.font_scale);

    let cfg = Self {
      theme: store.get(KEY_THEME),
      accessibility,
      favorites: store.get(KEY_FAVORITES).unwrap_or_default(),
      quiz: QuizRecords {
        best_score: store.get(KEY_QUIZ_BEST).unwrap_or(0),
        max_streak: store.get(KEY_QUIZ_STREAK).unwrap_or(0),
      },
    };
    let msg = format!(
      "Preferences loaded from {:?} ({} favorites)",
      store.dir,
      cfg.favorites.len()
    );
    (cfg, msg)
  }

  pub fn save(&self, store: &PrefStore) -> String {
    let result = (|| -> Result<()> {
      match self.theme {
        Some(theme) => store.set(KEY_THEME, &theme)?,
        None => store.remove(KEY_THEME)?,
      }
      store.set(KEY_ACCESSIBILITY, &self.accessibility)?;
      store.set(KEY_FAVORITES, &self.favorites)?;
      store.set(KEY_QUIZ_BEST, &self.quiz.best_score)?;
      store.set(KEY_QUIZ_STREAK, &self.quiz.max_streak)?;
      Ok(())
    })();

    match result {
      Ok(()) => format!("Preferences saved to {:?}", store.dir),
      Err(e) => format!("Failed to save preferences: {}", e),
    }
  }
}
