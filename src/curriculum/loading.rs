//! Loading requirements from TOML.

use super::types::Requirements;
use std::path::Path;
use thiserror::Error;

/// Failure to read or parse a requirements file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Requirements {
    /// Parses requirements from a TOML document.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_timetable::curriculum::Requirements;
    ///
    /// let req = Requirements::from_toml_str(r#"
    ///     [grid]
    ///     days = 3
    ///     periods_per_day = 3
    ///
    ///     [[courses]]
    ///     id = 0
    ///     session_count = 3
    ///
    ///     [[teachers]]
    ///     id = 0
    ///     preferences = [0]
    ///
    ///     [[class_groups]]
    ///     members = [0]
    /// "#).unwrap();
    ///
    /// assert_eq!(req.grid.slot_count(), 9);
    /// assert_eq!(req.courses[0].session_count, 3);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
