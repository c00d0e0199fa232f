//! Default values for the gateway configuration

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_MAX_CONCURRENT: usize = 3;

/// Calls per refill window
pub const DEFAULT_MAX_TOKENS_PER_MINUTE: u32 = 50;
pub const DEFAULT_REFILL_INTERVAL_MS: u64 = 60_000;

pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;
pub const DEFAULT_RESET_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_HALF_OPEN_TIMEOUT_MS: u64 = 30_000;

/// Environment variables consulted by the loader, highest priority first
pub const ENV_API_KEY: &[&str] = &["TALLY_API_KEY", "ANTHROPIC_API_KEY"];
pub const ENV_BASE_URL: &str = "TALLY_BASE_URL";
pub const ENV_MODEL: &str = "TALLY_MODEL";
