//! Audio file scanner
//!
//! Depth-first, pre-order walk of a directory tree. The same walk serves
//! both passes of a scan: the count pass only tallies matching files, the
//! process pass hands each one to a [`FileVisitor`].
//!
//! The relative path of the current directory is kept in [`TraversalState`]:
//! entering a directory appends `name/`, leaving it removes exactly that
//! suffix, so the accumulator is back to its starting value when the walk
//! returns.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension identifying audio files (compared case-insensitively)
pub const AUDIO_EXTENSION: &str = "mp3";

/// Audio file scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Root directory cannot be listed
    #[error("Unable to open source directory {0}: {1}")]
    OpenDirectory(PathBuf, String),
}

/// Which pass of the two-pass protocol is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Tally matching files only
    CountOnly,
    /// Hand every matching file to the visitor
    Process,
}

/// Mutable state of one top-level walk
#[derive(Debug, Clone)]
pub struct TraversalState {
    relative_path: String,
    /// Name lengths of the directories currently entered, innermost last
    entered: Vec<usize>,
    file_count: usize,
    mode: ScanMode,
}

impl TraversalState {
    pub fn new(mode: ScanMode) -> Self {
        Self {
            relative_path: String::new(),
            entered: Vec::new(),
            file_count: 0,
            mode,
        }
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Relative path of the current directory: `""` at the root, `"a/b/"` below it
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Matching files seen so far
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Number of directories currently entered below the root
    pub fn depth(&self) -> usize {
        self.entered.len()
    }

    /// Descend into `name`
    pub fn enter(&mut self, name: &str) {
        self.relative_path.push_str(name);
        self.relative_path.push('/');
        self.entered.push(name.len());
    }

    /// Return to the parent directory; false when already at the root
    pub fn leave(&mut self) -> bool {
        match self.entered.pop() {
            Some(name_len) => {
                let parent_len = self.relative_path.len() - name_len - 1;
                self.relative_path.truncate(parent_len);
                true
            }
            None => false,
        }
    }

    fn leave_to(&mut self, depth: usize) {
        while self.entered.len() > depth && self.leave() {}
    }
}

/// A matching file found by the process pass
#[derive(Debug, Clone, Copy)]
pub struct AudioFile<'a> {
    /// Full path of the file
    pub path: &'a Path,
    /// File name without directory
    pub file_name: &'a str,
    /// Directory relative to the scan root (`""`, `"a/"`, ...)
    pub relative_dir: &'a str,
    /// Canonical absolute directory
    pub absolute_dir: &'a Path,
    /// File size in bytes
    pub size: u64,
}

/// Receives matching files during the process pass
pub trait FileVisitor {
    fn visit(&mut self, file: &AudioFile<'_>);
}

/// Visitor for passes that need no per-file work
impl FileVisitor for () {
    fn visit(&mut self, _file: &AudioFile<'_>) {}
}

/// Check the audio-extension predicate on a file name
pub fn is_audio_file_name(name: &str) -> bool {
    name.rfind('.')
        .map(|dot| name[dot + 1..].eq_ignore_ascii_case(AUDIO_EXTENSION))
        .unwrap_or(false)
}

/// Audio file scanner
#[derive(Debug, Clone, Copy, Default)]
pub struct FileScanner {
    recursive: bool,
}

impl FileScanner {
    /// Create a scanner; subdirectories are only visited when `recursive`
    pub fn new(recursive: bool) -> Self {
        Self { recursive }
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Walk `root` and return the number of matching files.
    ///
    /// # Arguments
    /// * `root` - Directory to walk; symbolic links below it are followed
    /// * `state` - Accumulator for this walk; its mode decides whether files
    ///   are only counted or also handed to `visitor`
    /// * `visitor` - Receives every matching file in process mode
    ///
    /// # Returns
    /// The state's file count after the walk. The relative path is back at
    /// the value it had on entry.
    ///
    /// # Errors
    /// Returns [`ScanError`] when `root` is missing, is not a directory or
    /// cannot be listed. Directories below the root that cannot be entered,
    /// link loops included, are logged and skipped.
    pub fn scan(
        &self,
        root: &Path,
        state: &mut TraversalState,
        visitor: &mut dyn FileVisitor,
    ) -> Result<usize, ScanError> {
        let root = open_root(root)?;
        let base_depth = state.depth();
        let mut canonical_dirs = CanonicalDirs::default();

        let walker = WalkDir::new(&root)
            .follow_links(true)
            .max_depth(if self.recursive { usize::MAX } else { 1 });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ScanError::OpenDirectory(root.clone(), e.to_string()));
                }
                Err(e) => {
                    warn!("Error accessing entry: {}", e);
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            // Siblings and ancestors' siblings: pop back to this entry's parent
            state.leave_to(base_depth + entry.depth() - 1);

            let name = entry.file_name().to_string_lossy();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if self.recursive {
                    state.enter(&name);
                }
                continue;
            }

            if !file_type.is_file() || !is_audio_file_name(&name) {
                continue;
            }

            state.file_count += 1;

            if state.mode == ScanMode::Process {
                let size = match entry.metadata() {
                    Ok(metadata) => metadata.len(),
                    Err(e) => {
                        warn!("Unable to read size of {}: {}", entry.path().display(), e);
                        0
                    }
                };
                let parent = entry.path().parent().unwrap_or(&root);
                let absolute_dir = match canonical_dirs.resolve(parent, entry.depth() - 1) {
                    Ok(dir) => dir,
                    Err(e) => {
                        warn!("Unable to resolve directory {}: {}", parent.display(), e);
                        parent
                    }
                };

                visitor.visit(&AudioFile {
                    path: entry.path(),
                    file_name: &name,
                    relative_dir: state.relative_path(),
                    absolute_dir,
                    size,
                });
            }
        }

        state.leave_to(base_depth);

        debug!(
            root = %root.display(),
            mode = ?state.mode,
            files = state.file_count,
            "Directory walk complete"
        );

        Ok(state.file_count)
    }
}

/// Canonical form of each directory on the current walk position, by depth
#[derive(Debug, Default)]
struct CanonicalDirs {
    by_depth: Vec<Option<(PathBuf, PathBuf)>>,
}

impl CanonicalDirs {
    /// Canonical path of `dir`, resolved once while the walk stays inside it
    fn resolve<'a>(&'a mut self, dir: &'a Path, depth: usize) -> std::io::Result<&'a Path> {
        self.by_depth.resize(depth + 1, None);

        let cached = matches!(&self.by_depth[depth], Some((raw, _)) if raw.as_path() == dir);
        if !cached {
            self.by_depth[depth] = Some((dir.to_path_buf(), dir.canonicalize()?));
        }

        Ok(self.by_depth[depth]
            .as_ref()
            .map(|(_, canonical)| canonical.as_path())
            .unwrap_or(dir))
    }
}

/// Validate the root and return its canonical form
fn open_root(root: &Path) -> Result<PathBuf, ScanError> {
    if !root.exists() {
        return Err(ScanError::PathNotFound(root.to_path_buf()));
    }

    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    std::fs::read_dir(root)
        .map_err(|e| ScanError::OpenDirectory(root.to_path_buf(), e.to_string()))?;

    root.canonicalize()
        .map_err(|e| ScanError::OpenDirectory(root.to_path_buf(), e.to_string()))
}
