//! Forbidden location detection
//!
//! Autosaves are never written under a system temp directory or the host
//! application's install directory. Prefixes are canonicalized once when the
//! set is built and compared component-wise, so `/tmp2` is not under `/tmp`.

use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Ordered set of canonical directory prefixes where autosaving is disallowed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForbiddenPathSet {
    prefixes: Vec<PathBuf>,
}

impl ForbiddenPathSet {
    /// Build a set from raw directories
    ///
    /// Each directory is canonicalized. Directories that cannot be resolved
    /// (missing, unreadable) are kept in lexically normalized form; relative
    /// entries are dropped. Duplicates keep their first position.
    pub fn resolve<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut prefixes: Vec<PathBuf> = Vec::new();

        for dir in dirs {
            let dir = dir.as_ref();
            if dir.as_os_str().is_empty() || !dir.is_absolute() {
                debug!("Ignoring non-absolute forbidden prefix: {:?}", dir);
                continue;
            }

            let resolved = canonical_or_normalized(dir);
            if !prefixes.contains(&resolved) {
                prefixes.push(resolved);
            }
        }

        Self { prefixes }
    }

    /// Build a set from already canonical prefixes without touching the filesystem
    pub fn from_canonical(prefixes: Vec<PathBuf>) -> Self {
        Self { prefixes }
    }

    /// Check whether a canonical path lies inside any forbidden prefix
    pub fn contains(&self, canonical: &Path) -> bool {
        self.prefixes.iter().any(|prefix| canonical.starts_with(prefix))
    }

    /// The resolved prefixes, in insertion order
    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }
}

/// Canonicalize a path that may not exist
///
/// When the path itself cannot be resolved (a document saved to a directory
/// that was since removed, a temp dir that was never created), the deepest
/// existing ancestor is canonicalized and the missing components are joined
/// back on, so symlinks above the missing part are still followed. Only when
/// no ancestor resolves is the lexically normalized path returned.
pub fn canonical_or_normalized(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }

    let normalized = normalize_lexically(path);
    let mut missing = Vec::new();
    let mut ancestor = normalized.as_path();

    loop {
        if let Ok(canonical) = std::fs::canonicalize(ancestor) {
            return missing
                .iter()
                .rev()
                .fold(canonical, |resolved, name| resolved.join(name));
        }
        match (ancestor.parent(), ancestor.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                ancestor = parent;
            }
            _ => return normalized,
        }
    }
}

/// Resolve `.` and `..` components without consulting the filesystem
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if !at_root {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    out
}
