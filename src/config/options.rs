// src/config/options.rs
use std::path::{Path, PathBuf};

use super::consts::*;

/// Shape of the payload a source delivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Profile page markup (HTML).
    Markup,
    /// REST API JSON payload.
    Structured,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceSpec {
    Url { url: String, kind: SourceKind },
    File { path: PathBuf, kind: SourceKind },
}

impl SourceSpec {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceSpec::Url { kind, .. } | SourceSpec::File { kind, .. } => *kind,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SourceSpec::Url { .. })
    }

    /// Human-readable location for status lines and logs.
    pub fn describe(&self) -> String {
        match self {
            SourceSpec::Url { url, .. } => url.clone(),
            SourceSpec::File { path, .. } => path.display().to_string(),
        }
    }
}

impl Default for SourceSpec {
    fn default() -> Self {
        SourceSpec::Url { url: s!(DEFAULT_PROFILE_URL), kind: SourceKind::Markup }
    }
}

/// Process environment toggles, captured once and passed along explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnvFlags {
    /// Running under CI (`GITHUB_ACTIONS` set).
    pub in_ci: bool,
    /// CI opted in to browser-based fetching (`ALLOW_PLAYWRIGHT` set).
    pub allow_browser: bool,
}

impl EnvFlags {
    pub fn from_env() -> Self {
        let set = |k: &str| std::env::var_os(k).is_some_and(|v| !v.is_empty());
        Self { in_ci: set(ENV_CI), allow_browser: set(ENV_ALLOW_BROWSER) }
    }

    /// CI without an explicit opt-in: never go past the plain HTTP fetch.
    pub fn restrict_fetch(&self) -> bool {
        self.in_ci && !self.allow_browser
    }
}

/// Everything one export run needs to know.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub source: SourceSpec,
    pub output: PathBuf,
    previous: Option<PathBuf>,
    overrides: Option<PathBuf>,
    history: Option<PathBuf>,
    pub history_limit: usize,
    /// Write the default override map to disk when none existed.
    pub persist_synthesized_overrides: bool,
    pub env: EnvFlags,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            source: SourceSpec::default(),
            output: PathBuf::from(DEFAULT_OUT_DIR).join(DEFAULT_OUTPUT_FILE),
            previous: None,
            overrides: None,
            history: None,
            history_limit: HISTORY_LIMIT,
            persist_synthesized_overrides: false,
            env: EnvFlags::default(),
        }
    }
}

impl RunOptions {
    /// Defaults plus the environment toggles of the current process.
    pub fn from_env() -> Self {
        Self { env: EnvFlags::from_env(), ..Self::default() }
    }

    fn sibling(&self, file_name: &str) -> PathBuf {
        match self.output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(file_name),
            _ => PathBuf::from(file_name),
        }
    }

    pub fn previous_path(&self) -> PathBuf {
        self.previous.clone().unwrap_or_else(|| self.sibling(PREVIOUS_FILE))
    }

    pub fn overrides_path(&self) -> PathBuf {
        self.overrides.clone().unwrap_or_else(|| self.sibling(OVERRIDES_FILE))
    }

    pub fn history_path(&self) -> PathBuf {
        self.history.clone().unwrap_or_else(|| self.sibling(HISTORY_FILE))
    }

    pub fn set_previous_path(&mut self, p: impl AsRef<Path>) {
        self.previous = Some(p.as_ref().to_path_buf());
    }

    pub fn set_overrides_path(&mut self, p: impl AsRef<Path>) {
        self.overrides = Some(p.as_ref().to_path_buf());
    }

    pub fn set_history_path(&mut self, p: impl AsRef<Path>) {
        self.history = Some(p.as_ref().to_path_buf());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_files_follow_output_dir() {
        let mut opts = RunOptions::default();
        opts.output = PathBuf::from("site/data/brawlers.json");
        assert_eq!(opts.previous_path(), PathBuf::from("site/data/brawlers.prev.json"));
        assert_eq!(opts.overrides_path(), PathBuf::from("site/data/overrides.json"));
        assert_eq!(opts.history_path(), PathBuf::from("site/data/history.json"));
    }

    #[test]
    fn bare_output_keeps_side_files_local() {
        let mut opts = RunOptions::default();
        opts.output = PathBuf::from("brawlers.json");
        assert_eq!(opts.history_path(), PathBuf::from("history.json"));
    }

    #[test]
    fn explicit_paths_win() {
        let mut opts = RunOptions::default();
        opts.set_history_path("/tmp/h.json");
        assert_eq!(opts.history_path(), PathBuf::from("/tmp/h.json"));
        assert_eq!(opts.overrides_path(), PathBuf::from(DEFAULT_OUT_DIR).join(OVERRIDES_FILE));
    }

    #[test]
    fn fetch_restricted_only_in_ci_without_opt_in() {
        assert!(!EnvFlags { in_ci: false, allow_browser: false }.restrict_fetch());
        assert!(EnvFlags { in_ci: true, allow_browser: false }.restrict_fetch());
        assert!(!EnvFlags { in_ci: true, allow_browser: true }.restrict_fetch());
    }

    #[test]
    fn default_source_is_profile_markup() {
        let src = SourceSpec::default();
        assert_eq!(src.kind(), SourceKind::Markup);
        assert!(src.is_remote());
    }
}
