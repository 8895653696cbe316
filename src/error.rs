//! Error types and helpers for user-friendly error messages
//!
//! Every error the driver surfaces carries an optional hint telling the user
//! how to fix the problem. Failures of the external tools themselves are not
//! errors unless `--strict` is in effect.

use std::path::PathBuf;

use thiserror::Error;

/// Custom error types with helpful context and suggestions
#[derive(Error, Debug)]
pub enum GenError {
    /// Malformed or unrecognized command-line option value
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        message: String,
        hint: Option<String>,
    },

    /// Output directory could not be created
    #[error("Failed to create directory {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        hint: Option<String>,
    },

    /// Project configuration file errors
    #[error("Configuration error in {}: {message}", .path.display())]
    Config {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<toml::de::Error>,
        hint: Option<String>,
    },

    /// External step did not succeed (only raised in strict mode)
    #[error("{step} step failed: {message}")]
    StepFailed {
        step: String,
        message: String,
        hint: Option<String>,
    },
}

impl GenError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an invalid argument error with a hint
    pub fn invalid_argument_with_hint(
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create a filesystem error for a directory that could not be created
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let hint = match source.kind() {
            std::io::ErrorKind::PermissionDenied => Some(hints::permission_denied().to_string()),
            _ => None,
        };
        Self::Filesystem {
            path: path.into(),
            source,
            hint,
        }
    }

    /// Create a configuration error
    pub fn config_error(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: Option<toml::de::Error>,
    ) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
            source,
            hint: Some(hints::invalid_gen_toml().to_string()),
        }
    }

    /// Create a step failure error
    pub fn step_failed(
        step: impl Into<String>,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self::StepFailed {
            step: step.into(),
            message: message.into(),
            hint,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            GenError::InvalidArgument { .. } => 2,
            GenError::Filesystem { .. }
            | GenError::Config { .. }
            | GenError::StepFailed { .. } => 1,
        }
    }

    /// Hint attached to this error, if any
    pub fn hint(&self) -> Option<&str> {
        match self {
            GenError::InvalidArgument { hint, .. }
            | GenError::Filesystem { hint, .. }
            | GenError::Config { hint, .. }
            | GenError::StepFailed { hint, .. } => hint.as_deref(),
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        if let Some(h) = self.hint() {
            eprintln!("\n{} {}", style("HINT:").yellow().bold(), h);
        }

        eprintln!();
    }
}

impl From<clap::Error> for GenError {
    fn from(err: clap::Error) -> Self {
        // clap renders "error: <message>\n\nUsage: ..." and we only want the message
        let rendered = err.to_string();
        let message = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string();
        Self::invalid_argument_with_hint(message, hints::usage())
    }
}

/// Common error hints
pub mod hints {
    /// Get hint for missing CMake
    pub fn cmake() -> &'static str {
        "Install CMake from https://cmake.org/ or use your package manager:\n\
         • macOS: brew install cmake\n\
         • Ubuntu: sudo apt install cmake\n\
         • Windows: winget install Kitware.CMake\n\
         \n\
         Or point --cmake (EZIO_GEN_CMAKE) at an existing cmake binary."
    }

    /// Get hint for missing Ninja
    pub fn ninja() -> &'static str {
        "The default generator is Ninja. Install it or pick another generator:\n\
         • macOS: brew install ninja\n\
         • Ubuntu: sudo apt install ninja-build\n\
         • Or: ezio-gen --generator \"Unix Makefiles\""
    }

    /// Get hint for argument errors
    pub fn usage() -> &'static str {
        "Run ezio-gen --help to see accepted options.\n\
         Boolean options accept: yes/no, true/false, on/off, 1/0, y/n, t/f."
    }

    /// Get hint for a directory that cannot be created
    pub fn permission_denied() -> &'static str {
        "Check that you have write access to the project directory,\n\
         or choose another location with --project-root."
    }

    /// Get hint for invalid gen.toml
    pub fn invalid_gen_toml() -> &'static str {
        "gen.toml is invalid. Common issues:\n\
         • Keys outside the [cmake] table\n\
         • jobs must be a positive integer\n\
         • [cmake.variables] values must be strings"
    }

    /// Get hint for a failed external step in strict mode
    pub fn step_failed() -> &'static str {
        "See the CMake output above for details.\n\
         Run without --strict to ignore step failures."
    }
}
