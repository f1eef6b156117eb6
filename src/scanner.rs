//! Discovery of directories that hold AGENTS.md or CLAUDE.md.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::config::Config;
use crate::constants::{AGENTS_FILENAME, CLAUDE_FILENAME, DEFAULT_EXCLUDE};
use crate::error::{Error, Result};
use crate::scenario::{analyze_directory, DirectoryInfo};

/// What to scan and what to leave out
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub root: PathBuf,
    /// Patterns given on the command line
    pub exclude: Vec<String>,
    /// Patterns from the configuration (the built-in defaults when unconfigured)
    pub config_excludes: Vec<String>,
    pub verbose: bool,
}

impl ScanOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude: Vec::new(),
            config_excludes: DEFAULT_EXCLUDE.iter().map(|p| p.to_string()).collect(),
            verbose: false,
        }
    }

    /// Takes excludes and verbosity from a loaded configuration
    pub fn with_config(mut self, config: &Config) -> Self {
        self.config_excludes = config.exclude.clone();
        self.verbose = self.verbose || config.scan_options.verbose;
        self
    }

    pub fn with_excludes(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Config patterns first, then command-line patterns
    pub fn exclude_patterns(&self) -> Vec<String> {
        self.config_excludes
            .iter()
            .chain(self.exclude.iter())
            .cloned()
            .collect()
    }
}

/// Inventory produced by a scan
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Sorted by path
    pub directories: Vec<DirectoryInfo>,
    pub total_scanned: usize,
    pub duration: Duration,
}

/// Glob-based exclusion, matched against paths relative to the scan root.
///
/// Patterns of the form `<prefix>/**` also prune any directory matching
/// `<prefix>`, so excluded trees are never descended into.
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    paths: GlobSet,
    dirs: GlobSet,
}

impl ExcludeMatcher {
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] for a pattern that is not a valid glob.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut paths = GlobSetBuilder::new();
        let mut dirs = GlobSetBuilder::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            paths.add(build_glob(pattern)?);
            if let Some(prefix) = pattern.strip_suffix("/**") {
                if !prefix.is_empty() {
                    dirs.add(build_glob(prefix)?);
                }
            }
        }

        Ok(Self {
            paths: build_set(paths)?,
            dirs: build_set(dirs)?,
        })
    }

    pub fn is_excluded(&self, relative: &Path, is_dir: bool) -> bool {
        self.paths.is_match(relative) || (is_dir && self.dirs.is_match(relative))
    }
}

fn build_glob(pattern: &str) -> Result<globset::Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| Error::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

fn build_set(builder: GlobSetBuilder) -> Result<GlobSet> {
    builder.build().map_err(|e| Error::Pattern {
        pattern: String::new(),
        message: e.to_string(),
    })
}

fn is_convention_file(name: &OsStr) -> bool {
    name == OsStr::new(AGENTS_FILENAME) || name == OsStr::new(CLAUDE_FILENAME)
}

/// Finds every directory under `root` holding AGENTS.md or CLAUDE.md.
///
/// Symlinks are never followed during the walk; a symlinked convention file
/// is still reported. Unreadable paths are skipped.
///
/// # Errors
///
/// Returns [`Error::Pattern`] for an invalid exclude pattern.
pub fn find_candidate_directories(root: &Path, patterns: &[String]) -> Result<BTreeSet<PathBuf>> {
    let matcher = ExcludeMatcher::new(patterns)?;
    let walk_root = root.to_path_buf();

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let relative = entry.path().strip_prefix(&walk_root).unwrap_or(entry.path());
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !matcher.is_excluded(relative, is_dir)
        })
        .build();

    let mut directories = BTreeSet::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable path");
                continue;
            }
        };

        let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
        if is_dir || !is_convention_file(entry.file_name()) {
            continue;
        }

        if let Some(parent) = entry.path().parent() {
            directories.insert(parent.to_path_buf());
        }
    }

    Ok(directories)
}

/// Scans `options.root` and classifies every candidate directory once.
///
/// # Errors
///
/// An unexpected I/O failure while classifying any directory aborts the scan,
/// since the inventory would otherwise be silently incomplete.
pub fn scan_directories(options: &ScanOptions) -> Result<ScanResult> {
    let started = Instant::now();
    let patterns = options.exclude_patterns();

    tracing::debug!(
        root = %options.root.display(),
        excludes = patterns.len(),
        "scanning for instruction files"
    );

    let candidates = find_candidate_directories(&options.root, &patterns)?;

    let mut directories = candidates
        .iter()
        .map(|dir| analyze_directory(dir))
        .collect::<Result<Vec<_>>>()?;
    directories.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));

    if options.verbose {
        for dir in &directories {
            tracing::info!(
                dir = %dir.path.display(),
                agents = %dir.agents_status,
                claude = %dir.claude_status,
                scenario = %dir.scenario,
                "classified"
            );
        }
    }

    let duration = started.elapsed();
    tracing::debug!(
        found = directories.len(),
        elapsed_ms = duration.as_millis() as u64,
        "scan finished"
    );

    Ok(ScanResult {
        total_scanned: candidates.len(),
        directories,
        duration,
    })
}

/// Loads the configuration for `root` and scans with its excludes followed
/// by `cli_excludes`.
///
/// # Errors
///
/// See [`scan_directories`].
pub fn scan_directories_with_config(root: &Path, cli_excludes: Vec<String>) -> Result<ScanResult> {
    let config = crate::config::load_config(root);
    let options = ScanOptions::new(root)
        .with_config(&config)
        .with_excludes(cli_excludes);
    scan_directories(&options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_exclude_matcher_prunes_directories() {
        let matcher = ExcludeMatcher::new(["**/node_modules/**"]).unwrap();

        assert!(matcher.is_excluded(Path::new("node_modules"), true));
        assert!(matcher.is_excluded(Path::new("a/b/node_modules"), true));
        assert!(matcher.is_excluded(Path::new("a/node_modules/pkg/AGENTS.md"), false));
        assert!(!matcher.is_excluded(Path::new("a/node_modules_old"), true));
        assert!(!matcher.is_excluded(Path::new("a/AGENTS.md"), false));
    }

    #[test]
    fn test_exclude_matcher_rejects_bad_glob() {
        let result = ExcludeMatcher::new(["a[b"]);
        assert!(matches!(result, Err(Error::Pattern { .. })));
    }

    #[test]
    fn test_exclude_patterns_order() {
        let options = ScanOptions::new("/root").with_excludes(vec!["**/cli/**".to_string()]);
        let patterns = options.exclude_patterns();
        assert_eq!(patterns.first().map(String::as_str), Some(DEFAULT_EXCLUDE[0]));
        assert_eq!(patterns.last().map(String::as_str), Some("**/cli/**"));
    }

    #[test]
    fn test_scan_groups_and_sorts() {
        let root = tempdir().unwrap();
        let beta = root.path().join("beta");
        let alpha = root.path().join("alpha");
        let empty = root.path().join("empty");
        fs::create_dir_all(&beta).unwrap();
        fs::create_dir_all(&alpha).unwrap();
        fs::create_dir_all(&empty).unwrap();

        fs::write(beta.join(AGENTS_FILENAME), "# Beta").unwrap();
        fs::write(alpha.join(AGENTS_FILENAME), "# Alpha").unwrap();
        fs::write(alpha.join(CLAUDE_FILENAME), "@AGENTS.md\n").unwrap();

        let result = scan_directories(&ScanOptions::new(root.path())).unwrap();

        assert_eq!(result.total_scanned, 2);
        let paths: Vec<_> = result.directories.iter().map(|d| d.path.clone()).collect();
        assert_eq!(paths, vec![alpha.clone(), beta.clone()]);
        assert_eq!(result.directories[0].scenario, Scenario::Optimal);
        assert_eq!(result.directories[1].scenario, Scenario::OnlyAgents);
    }

    #[test]
    fn test_scan_honors_default_and_cli_excludes() {
        let root = tempdir().unwrap();
        let vendored = root.path().join("app/node_modules/dep");
        let skipped = root.path().join("scratch");
        let kept = root.path().join("app");
        fs::create_dir_all(&vendored).unwrap();
        fs::create_dir_all(&skipped).unwrap();

        fs::write(vendored.join(CLAUDE_FILENAME), "dep").unwrap();
        fs::write(skipped.join(CLAUDE_FILENAME), "scratch").unwrap();
        fs::write(kept.join(CLAUDE_FILENAME), "app").unwrap();

        let options =
            ScanOptions::new(root.path()).with_excludes(vec!["**/scratch/**".to_string()]);
        let result = scan_directories(&options).unwrap();

        assert_eq!(result.directories.len(), 1);
        assert_eq!(result.directories[0].path, kept);
        assert_eq!(result.directories[0].scenario, Scenario::OnlyClaude);
    }

    #[test]
    fn test_scan_finds_files_in_root_and_hidden_dirs() {
        let root = tempdir().unwrap();
        let hidden = root.path().join(".hidden");
        fs::create_dir_all(&hidden).unwrap();
        fs::write(root.path().join(AGENTS_FILENAME), "# root").unwrap();
        fs::write(hidden.join(AGENTS_FILENAME), "# hidden").unwrap();

        let result = scan_directories(&ScanOptions::new(root.path())).unwrap();
        let paths: Vec<_> = result.directories.iter().map(|d| d.path.clone()).collect();
        assert_eq!(paths, vec![root.path().to_path_buf(), hidden]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_reports_dangling_symlink_without_following() {
        let root = tempdir().unwrap();
        let project = root.path().join("project");
        fs::create_dir_all(&project).unwrap();
        std::os::unix::fs::symlink("nowhere.md", project.join(CLAUDE_FILENAME)).unwrap();

        let result = scan_directories(&ScanOptions::new(root.path())).unwrap();
        assert_eq!(result.directories.len(), 1);
        assert_eq!(result.directories[0].scenario, Scenario::BrokenSymlinks);
    }

    #[test]
    fn test_scan_with_project_config_replaces_defaults() {
        let root = tempdir().unwrap();
        let vendored = root.path().join("node_modules/dep");
        let drafts = root.path().join("drafts");
        fs::create_dir_all(&vendored).unwrap();
        fs::create_dir_all(&drafts).unwrap();
        fs::write(vendored.join(AGENTS_FILENAME), "dep").unwrap();
        fs::write(drafts.join(AGENTS_FILENAME), "draft").unwrap();
        fs::write(root.path().join("config.yml"), "exclude:\n  - \"**/drafts/**\"\n").unwrap();

        let result = scan_directories_with_config(root.path(), Vec::new()).unwrap();
        let paths: Vec<_> = result.directories.iter().map(|d| d.path.clone()).collect();
        assert_eq!(paths, vec![vendored]);
    }

    #[test]
    fn test_empty_tree() {
        let root = tempdir().unwrap();
        let result = scan_directories(&ScanOptions::new(root.path())).unwrap();
        assert!(result.directories.is_empty());
        assert_eq!(result.total_scanned, 0);
    }
}
