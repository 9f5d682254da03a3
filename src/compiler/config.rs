//! Compiler configuration.

/// Configuration for the [`ModelCompiler`](super::ModelCompiler).
///
/// The two ordering switches only control symmetry breaking; turning them
/// off never changes whether a curriculum is feasible, only how much
/// equivalent search space an engine sees.
///
/// # Examples
///
/// ```
/// use u_timetable::compiler::CompilerConfig;
///
/// let config = CompilerConfig::default()
///     .with_model_name("fall-semester")
///     .with_course_ordering(false);
/// assert!(config.validate().is_ok());
/// assert!(config.order_sessions);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Name given to the compiled model.
    pub model_name: String,

    /// Post `course[i] < course[i+1]` over the identity variables.
    pub order_courses: bool,

    /// Post `session[j] < session[j+1]` within every course.
    pub order_sessions: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            model_name: "timetable".into(),
            order_courses: true,
            order_sessions: true,
        }
    }
}

impl CompilerConfig {
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    pub fn with_course_ordering(mut self, enabled: bool) -> Self {
        self.order_courses = enabled;
        self
    }

    pub fn with_session_ordering(mut self, enabled: bool) -> Self {
        self.order_sessions = enabled;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.model_name.trim().is_empty() {
            return Err("model_name must not be empty".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompilerConfig::default();
        assert_eq!(config.model_name, "timetable");
        assert!(config.order_courses);
        assert!(config.order_sessions);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_name() {
        let config = CompilerConfig::default().with_model_name("  ");
        assert!(config.validate().is_err());
    }
}
