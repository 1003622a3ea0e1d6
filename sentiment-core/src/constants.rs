//! Defaults shared by the service, cache, and HTTP layers.

// ═══════════════════════════════════════════════════════════════════════════════
// PIPELINE
// ═══════════════════════════════════════════════════════════════════════════════

/// Timeout applied around each remote provider call.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1_000;

/// Limit value meaning "return every sentence".
pub const NO_LIMIT: i64 = -1;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// Memory ceiling of the result cache in megabytes.
pub const DEFAULT_CACHE_MAX_SIZE_MB: usize = 64;

/// Lifetime of a cache entry (10 minutes).
pub const DEFAULT_CACHE_ENTRY_TTL_MS: u64 = 10 * 60 * 1_000;

/// Number of independently locked cache shards. Must be a power of two.
pub const DEFAULT_CACHE_SHARDS: usize = 16;

/// Interval between background sweeps of expired entries.
pub const DEFAULT_CACHE_CLEAN_WINDOW_MS: u64 = 60 * 1_000;

/// Bookkeeping bytes charged per cache entry on top of key and payload.
pub const CACHE_ENTRY_OVERHEAD_BYTES: usize = 64;

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP
// ═══════════════════════════════════════════════════════════════════════════════

/// Default listen address of the HTTP server.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Deadline applied to each inbound HTTP request.
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// Maximum accepted request body size.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
