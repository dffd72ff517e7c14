//! Source file discovery.
//!
//! `includes` entries without `*` or `?` are literal directory paths; the
//! others are glob patterns expanded to directories. `ignores` work the same
//! way: literal entries are path prefixes, glob entries match full paths.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Matching files, sorted.
    pub files: BTreeSet<String>,
    /// Paths that could not be read while walking.
    pub skipped_count: usize,
}

/// Filters shared by every scan root.
pub struct ScanFilter {
    literal_ignores: Vec<PathBuf>,
    glob_ignores: Vec<Pattern>,
    extensions: Vec<String>,
}

impl ScanFilter {
    pub fn new(base_dir: &Path, ignore_patterns: &[String], extensions: &[String]) -> Self {
        let mut literal_ignores = Vec::new();
        let mut glob_ignores = Vec::new();

        for p in ignore_patterns {
            if is_glob_pattern(p) {
                match Pattern::new(p) {
                    Ok(pattern) => glob_ignores.push(pattern),
                    Err(e) => log::warn!("invalid ignore pattern '{}': {}", p, e),
                }
            } else {
                literal_ignores.push(base_dir.join(p));
            }
        }

        Self {
            literal_ignores,
            glob_ignores,
            extensions: extensions.to_vec(),
        }
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.literal_ignores.iter().any(|p| path.starts_with(p))
            || self.glob_ignores.iter().any(|p| p.matches(&path_str))
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }
}

/// Expand `includes` relative to `base_dir` into directories to walk.
pub fn resolve_includes(base_dir: &Path, includes: &[String]) -> Vec<PathBuf> {
    if includes.is_empty() {
        return vec![base_dir.to_path_buf()];
    }

    let mut paths = Vec::new();
    for inc in includes {
        if is_glob_pattern(inc) {
            let full_pattern = base_dir.join(inc);
            match glob(&full_pattern.to_string_lossy()) {
                Ok(entries) => paths.extend(entries.flatten().filter(|p| p.is_dir())),
                Err(e) => log::warn!("invalid include pattern '{}': {}", inc, e),
            }
        } else {
            let path = base_dir.join(inc);
            if path.exists() {
                paths.push(path);
            } else {
                log::warn!("include path does not exist: {}", path.display());
            }
        }
    }
    paths
}

/// Walk `roots` collecting files that pass `filter`.
pub fn scan_files(roots: &[PathBuf], filter: &ScanFilter) -> ScanResult {
    let mut result = ScanResult::default();

    for root in roots {
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    result.skipped_count += 1;
                    log::warn!("cannot access path: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            if filter.is_ignored(path) {
                log::debug!("ignored {}", path.display());
                continue;
            }

            if entry.file_type().is_file() && filter.has_extension(path) {
                result.files.insert(path.to_string_lossy().into_owned());
            }
        }
    }

    result
}
