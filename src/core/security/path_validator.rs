use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::SecurityConfig;

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlink '{path}' points outside allowed root directory")]
    SymlinkOutsideRoot { path: PathBuf },

    #[error("Cannot canonicalize path '{path}': {error}")]
    CannotCanonicalize { path: PathBuf, error: io::Error },

    #[error("Path does not exist: '{path}'")]
    PathNotFound { path: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

/// Filesystem boundary for tools that read from disk.
///
/// Without a root every existing path is accepted. With a root, paths are
/// canonicalized (resolving `.`, `..` and symlinks) and must land inside it.
/// Relative paths are resolved against the root, not the working directory.
#[derive(Debug, Clone, Default)]
pub struct PathSandbox {
    root: Option<PathBuf>,
    allow_symlinks: bool,
}

impl PathSandbox {
    /// Build a sandbox from the security configuration.
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            root: config.root_path.clone(),
            allow_symlinks: config.allow_symlinks,
        }
    }

    /// Resolve `input` to a canonical path inside the sandbox.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let sandbox = PathSandbox::new(&config.security);
    /// let safe = sandbox.resolve("src/main.rs")?;
    /// ```
    pub fn resolve(&self, input: &str) -> Result<PathBuf, PathSecurityError> {
        let Some(ref root) = self.root else {
            return canonicalize_existing(Path::new(input));
        };

        let canonical_root = root
            .canonicalize()
            .map_err(|e| PathSecurityError::IoError {
                path: root.clone(),
                error: e,
            })?;

        let path = canonical_root.join(input);

        if !path.exists() {
            return Err(PathSecurityError::PathNotFound { path });
        }

        if path.is_symlink() && !self.allow_symlinks {
            let target = path.read_link().map_err(|e| PathSecurityError::IoError {
                path: path.clone(),
                error: e,
            })?;
            let target = path.parent().map(|p| p.join(&target)).unwrap_or(target);

            let canonical_target = canonicalize_existing(&target)
                .map_err(|_| PathSecurityError::SymlinkOutsideRoot { path: path.clone() })?;
            if !canonical_target.starts_with(&canonical_root) {
                return Err(PathSecurityError::SymlinkOutsideRoot { path });
            }
        }

        let canonical = path
            .canonicalize()
            .map_err(|e| PathSecurityError::CannotCanonicalize {
                path: path.clone(),
                error: e,
            })?;

        if !canonical.starts_with(&canonical_root) {
            if path.is_symlink() {
                return Err(PathSecurityError::SymlinkOutsideRoot { path });
            }
            return Err(PathSecurityError::OutsideRootDirectory {
                path: canonical,
                root: canonical_root,
            });
        }

        Ok(canonical)
    }
}

fn canonicalize_existing(path: &Path) -> Result<PathBuf, PathSecurityError> {
    path.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathSecurityError::PathNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PathSecurityError::CannotCanonicalize {
                path: path.to_path_buf(),
                error: e,
            }
        }
    })
}
