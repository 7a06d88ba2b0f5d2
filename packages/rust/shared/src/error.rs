//! Error types for md2web.
//!
//! Library crates use [`Md2WebError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::fmt;
use std::path::PathBuf;

/// Top-level error type for all md2web operations.
#[derive(Debug, thiserror::Error)]
pub enum Md2WebError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file watcher could not be created or attached.
    #[error("watch error: {0}")]
    Watch(String),

    /// One or both generation tasks of a pipeline run failed.
    #[error("generation failed: {}", join_failures(.failures))]
    Generation { failures: Vec<TaskFailure> },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, Md2WebError>;

/// Which generation task produced a [`TaskFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationTask {
    Routes,
    Components,
}

impl fmt::Display for GenerationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routes => f.write_str("routes"),
            Self::Components => f.write_str("components"),
        }
    }
}

/// A single failed task inside [`Md2WebError::Generation`].
#[derive(Debug)]
pub struct TaskFailure {
    pub task: GenerationTask,
    pub error: Box<Md2WebError>,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.task, self.error)
    }
}

fn join_failures(failures: &[TaskFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Md2WebError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = Md2WebError::config("rootDir and componentsDir must be different");
        assert_eq!(
            err.to_string(),
            "config error: rootDir and componentsDir must be different"
        );
        assert!(err.is_config());
    }

    #[test]
    fn generation_error_lists_every_task() {
        let err = Md2WebError::Generation {
            failures: vec![
                TaskFailure {
                    task: GenerationTask::Routes,
                    error: Box::new(Md2WebError::io(
                        "src/router/md.ts",
                        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                    )),
                },
                TaskFailure {
                    task: GenerationTask::Components,
                    error: Box::new(Md2WebError::io(
                        "docs/a.md",
                        std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
                    )),
                },
            ],
        };

        let msg = err.to_string();
        assert!(msg.starts_with("generation failed: routes: I/O error"));
        assert!(msg.contains("; components: I/O error"));
        assert!(msg.contains("denied"));
        assert!(msg.contains("gone"));
    }
}
