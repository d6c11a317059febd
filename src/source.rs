//! Run sources: where run listings and run documents come from.
//!
//! The pipeline only needs the bytes of a run document. A [`RunSource`]
//! lists the available runs and fetches one by its [`RunInfo`]. Two
//! implementations exist: a local directory tree and the backend HTTP API.

use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::settings::SourceConfig;
use crate::state::RUN_EXTENSIONS;

const USER_AGENT: &str = concat!("Travelog/", env!("CARGO_PKG_VERSION"));

/// Files larger than this are memory-mapped instead of read
const MMAP_THRESHOLD: u64 = 4 * 1024 * 1024;

/// Errors raised while listing or fetching runs
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Non-success HTTP status
    #[error("Failed to fetch file: {0}")]
    Status(u16),

    #[error("Failed to fetch runs: {0}")]
    ListStatus(u16),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Failed to parse run list: {0}")]
    Decode(String),
}

/// A run as listed by a source
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub id: i64,
    /// Storage path of the run document
    #[serde(rename = "srcPath")]
    pub src_path: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
}

impl RunInfo {
    /// Title for lists and banners
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled Run")
    }
}

/// Bytes of a run document.
///
/// Large local files stay mapped and are parsed in place; everything else is
/// an owned buffer.
pub enum RunBytes {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl RunBytes {
    pub fn is_mapped(&self) -> bool {
        matches!(self, RunBytes::Mapped(_))
    }
}

impl Deref for RunBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            RunBytes::Owned(bytes) => bytes,
            RunBytes::Mapped(map) => map,
        }
    }
}

impl From<Vec<u8>> for RunBytes {
    fn from(bytes: Vec<u8>) -> Self {
        RunBytes::Owned(bytes)
    }
}

impl std::fmt::Debug for RunBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_mapped() { "Mapped" } else { "Owned" };
        write!(f, "RunBytes::{}({} bytes)", kind, self.len())
    }
}

/// Storage collaborator: lists runs and fetches run documents
pub trait RunSource: Send + Sync {
    /// Short description for the status bar
    fn describe(&self) -> String;

    fn list_runs(&self) -> Result<Vec<RunInfo>, SourceError>;

    /// Raw bytes of the run document
    fn fetch(&self, run: &RunInfo) -> Result<RunBytes, SourceError>;
}

/// Build the source selected by configuration
pub fn from_config(config: &SourceConfig) -> Box<dyn RunSource> {
    match config {
        SourceConfig::Directory(root) => Box::new(DirectorySource::new(root.clone())),
        SourceConfig::Backend(url) => Box::new(BackendSource::new(url.clone())),
    }
}

// ============================================================================
// Local directory
// ============================================================================

/// Every `*.json` file under a root directory is a run
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collect(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), SourceError> {
        let entries = std::fs::read_dir(dir).map_err(|source| SourceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                self.collect(&path, out)?;
            } else if path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| RUN_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
            {
                out.push(path);
            }
        }
        Ok(())
    }
}

/// Open a run file. Files from `MMAP_THRESHOLD` up are mapped, not copied.
pub fn read_file(path: &Path) -> Result<RunBytes, SourceError> {
    let io_err = |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let len = file.metadata().map_err(io_err)?.len();
    if len < MMAP_THRESHOLD {
        return std::fs::read(path).map(RunBytes::Owned).map_err(io_err);
    }

    // SAFETY: the map is only read. A file truncated underneath it can fault
    // the parser, the same exposure every mmap reader of user files accepts.
    let map = unsafe { Mmap::map(&file) }.map_err(io_err)?;
    tracing::debug!("Mapped {} ({} bytes)", path.display(), len);
    Ok(RunBytes::Mapped(map))
}

impl RunSource for DirectorySource {
    fn describe(&self) -> String {
        format!("Directory {}", self.root.display())
    }

    fn list_runs(&self) -> Result<Vec<RunInfo>, SourceError> {
        let mut paths = Vec::new();
        self.collect(&self.root, &mut paths)?;
        paths.sort();

        let runs: Vec<RunInfo> = paths
            .iter()
            .enumerate()
            .map(|(id, path)| {
                let relative = path.strip_prefix(&self.root).unwrap_or(path);
                RunInfo {
                    id: id as i64,
                    src_path: relative.to_string_lossy().replace('\\', "/"),
                    title: path.file_stem().map(|s| s.to_string_lossy().into_owned()),
                    date: None,
                    location: None,
                    length: None,
                }
            })
            .collect();

        tracing::info!("Found {} runs under {:?}", runs.len(), self.root);
        Ok(runs)
    }

    fn fetch(&self, run: &RunInfo) -> Result<RunBytes, SourceError> {
        read_file(&self.root.join(&run.src_path))
    }
}

// ============================================================================
// Backend HTTP API
// ============================================================================

/// The backend run API
#[derive(Clone, Debug)]
pub struct BackendSource {
    base_url: String,
    timeout: Duration,
}

impl BackendSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn runs_url(&self) -> String {
        format!("{}/api/runs/", self.base_url)
    }

    pub fn file_url(&self) -> String {
        format!("{}/api/s3/file", self.base_url)
    }

    fn agent(&self) -> ureq::Agent {
        ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build()
            .into()
    }
}

impl RunSource for BackendSource {
    fn describe(&self) -> String {
        format!("Backend {}", self.base_url)
    }

    fn list_runs(&self) -> Result<Vec<RunInfo>, SourceError> {
        let url = self.runs_url();
        tracing::debug!("GET {}", url);

        let mut response = match self
            .agent()
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .call()
        {
            Ok(resp) => resp,
            Err(ureq::Error::StatusCode(status)) => return Err(SourceError::ListStatus(status)),
            Err(e) => return Err(SourceError::Transport(e.to_string())),
        };

        let runs: Vec<RunInfo> = response
            .body_mut()
            .read_json()
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        tracing::info!("Backend listed {} runs", runs.len());
        Ok(runs)
    }

    fn fetch(&self, run: &RunInfo) -> Result<RunBytes, SourceError> {
        let url = self.file_url();
        tracing::debug!("GET {}?path={}", url, run.src_path);

        let mut response = match self
            .agent()
            .get(&url)
            .query("path", &run.src_path)
            .header("User-Agent", USER_AGENT)
            .call()
        {
            Ok(resp) => resp,
            Err(ureq::Error::StatusCode(status)) => return Err(SourceError::Status(status)),
            Err(e) => return Err(SourceError::Transport(e.to_string())),
        };

        response
            .body_mut()
            .with_config()
            .limit(512 * 1024 * 1024)
            .read_to_vec()
            .map(RunBytes::Owned)
            .map_err(|e| SourceError::Transport(e.to_string()))
    }
}
