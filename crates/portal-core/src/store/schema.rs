//! SQLite schema backing the key-value store.

/// Complete schema for the portal store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Key-Value Entries
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv_entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                          -- JSON-serialized payload
    expires_at INTEGER,                           -- unix seconds, NULL = no expiry
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_kv_expires ON kv_entries(expires_at);

-- ============================================================================
-- Set Membership
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv_set_members (
    set_key TEXT NOT NULL,
    member TEXT NOT NULL,
    added_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (set_key, member)
);

CREATE INDEX IF NOT EXISTS idx_set_members_key ON kv_set_members(set_key);
"#;
