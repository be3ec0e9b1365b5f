// crates/dockyards-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the CLI.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for Dockyards configuration. The output is deterministic
//! and must always pass validation.

/// Returns a canonical example `dockyards.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"global_namespace = "dockyards-system"

[server]
bind = "127.0.0.1:9000"
max_body_bytes = 1048576

[auth]
access_token_ttl_secs = 1800
refresh_token_ttl_secs = 86400
bcrypt_cost = 10

[store]
type = "sqlite"
path = "dockyards.db"
journal_mode = "wal"
sync_mode = "full"
busy_timeout_ms = 5000

[limits]
max_replicas = 16

[audit]
sink = "stderr"
"#,
    )
}
