// src/config/consts.rs

// Source
pub const DEFAULT_PROFILE_URL: &str = "https://brawlify.com/stats/profile/22PLQCR29";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// Net
pub const FETCH_TIMEOUT_SECS: u64 = 20;
pub const FETCH_RETRIES: u32 = 3;
pub const FETCH_BACKOFF_MS: u64 = 1_000;
pub const RETRY_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

// Records
pub const UNKNOWN_NAME: &str = "UNKNOWN";
pub const TOTAL_NAME: &str = "TOTAL";
pub const MAX_LEVEL: i64 = 11;

// Overrides
pub const DEFAULT_OVERRIDE_KEY: &str = "Hypercharge";
pub const DEFAULT_OVERRIDE_VALUE: &str = "Yes";

// History
pub const HISTORY_LIMIT: usize = 24;
pub const DIFF_LINE_LIMIT: usize = 24;
pub const HISTORY_TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M";

// Output files (siblings of the output unless overridden)
pub const DEFAULT_OUT_DIR: &str = "frontend/public";
pub const DEFAULT_OUTPUT_FILE: &str = "brawlers.json";
pub const PREVIOUS_FILE: &str = "brawlers.prev.json";
pub const OVERRIDES_FILE: &str = "overrides.json";
pub const HISTORY_FILE: &str = "history.json";

// Local log
pub const LOG_FILE: &str = ".store/export.log";

// Environment toggles (read once by RunOptions::from_env)
pub const ENV_CI: &str = "GITHUB_ACTIONS";
pub const ENV_ALLOW_BROWSER: &str = "ALLOW_PLAYWRIGHT";
