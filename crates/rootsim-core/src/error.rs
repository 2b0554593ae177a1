use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

/// The kind of catalog or filesystem item a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Package,
    Release,
    Bundle,
    Script,
    Binary,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Release => "release",
            Self::Bundle => "bundle",
            Self::Script => "script",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by every simulation component.
///
/// Callers are expected to match on the variant; the message only carries context.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: ItemKind, name: String },

    #[error("database not loaded")]
    NotLoaded,

    #[error("unsupported installation method '{0}'")]
    Unsupported(String),

    #[error("binary is not executable: {}", .0.display())]
    NotExecutable(PathBuf),

    #[error("package '{0}' is not installed")]
    NotInstalled(String),

    #[error("failed to load fixture {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("invalid package definition: {0}")]
    InvalidPackage(String),

    #[error("injected failure for '{package}': {message}")]
    Injected { package: String, message: String },

    #[error("virtual root was already cleaned up: {}", .0.display())]
    CleanedUp(PathBuf),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl SimError {
    pub fn not_found(kind: ItemKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn load(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn is_not_found(&self, expected: ItemKind) -> bool {
        matches!(self, Self::NotFound { kind, .. } if *kind == expected)
    }
}

/// Attaches a lazily built context string to an `io::Result`, mirroring
/// `anyhow::Context::with_context` for the typed error.
pub trait IoContext<T> {
    fn io_context<F, C>(self, context: F) -> SimResult<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context<F, C>(self, context: F) -> SimResult<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|source| SimError::io(context(), source))
    }
}
