//! Structured Logging with Sensitive Data Redaction
//!
//! A logger is an explicit capability handed to the call sites that need
//! one; hash and encode functions stay pure. Field values are redacted
//! automatically: signing-key material is never written out, addresses
//! and digests are partially masked.

use std::fmt;

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Level-filtering logger instance.
///
/// Filtering is owned by the instance, not by process-wide state; two
/// call sites can run at different verbosities in the same process.
#[derive(Debug, Clone)]
pub struct Logger {
    min_level: LogLevel,
}

impl Logger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Write an entry if it clears the level filter.
    pub fn emit(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }

        let fields_str = entry
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");

        if fields_str.is_empty() {
            eprintln!("[{}] {} [{}] {}", timestamp, entry.level, entry.module, entry.message);
        } else {
            eprintln!(
                "[{}] {} [{}] {} | {}",
                timestamp, entry.level, entry.module, entry.message, fields_str
            );
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

/// Structured log entry
#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field (auto-redacts sensitive keys)
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        let value_str = value.to_string();
        let redacted = redact_if_sensitive(key, &value_str);
        self.fields.push((key, redacted));
        self
    }

    /// Add a field with explicit full redaction
    pub fn redacted_field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        let redacted = redact_value(&value.to_string());
        self.fields.push((key, redacted));
        self
    }
}

/// Redact a value if the key suggests it's sensitive
fn redact_if_sensitive(key: &str, value: &str) -> String {
    let key_lower = key.to_lowercase();

    // Keys that are always fully redacted
    let fully_redacted_keys = ["private_key", "privatekey", "secret", "signing_key", "key_hex", "seed"];

    for sensitive_key in &fully_redacted_keys {
        if key_lower.contains(sensitive_key) {
            return redact_value(value);
        }
    }

    // Addresses: show prefix and suffix only
    let address_keys = ["address", "authority", "target", "recipient", "currency", "contract", "signer"];
    for addr_key in &address_keys {
        if key_lower.contains(addr_key) {
            return redact_address(value);
        }
    }

    // Digests and group ids: show partial
    let hash_keys = ["digest", "hash", "group_id", "root"];
    for hash_key in &hash_keys {
        if key_lower.contains(hash_key) {
            return redact_hash(value);
        }
    }

    value.to_string()
}

/// Fully redact a sensitive value
fn redact_value(value: &str) -> String {
    if value.is_empty() {
        return "[EMPTY]".to_string();
    }

    let len = value.len();
    if len <= 4 {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED:{}chars]", len)
    }
}

/// Partially redact an address (show first 8 and last 4 chars)
fn redact_address(address: &str) -> String {
    let trimmed = address.trim();

    if trimmed.is_empty() {
        return "[EMPTY]".to_string();
    }

    if trimmed.len() <= 12 {
        return redact_value(trimmed);
    }

    let prefix_len = if trimmed.starts_with("0x") { 8 } else { 6 };
    let suffix_len = 4;

    let prefix = &trimmed[..prefix_len];
    let suffix = &trimmed[trimmed.len() - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Partially redact a digest (show first 12 and last 6 chars)
fn redact_hash(digest: &str) -> String {
    let trimmed = digest.trim();

    if trimmed.is_empty() {
        return "[EMPTY]".to_string();
    }

    if trimmed.len() <= 20 {
        return trimmed.to_string();
    }

    let prefix_len = if trimmed.starts_with("0x") { 12 } else { 10 };
    let suffix_len = 6;

    let prefix = &trimmed[..prefix_len];
    let suffix = &trimmed[trimmed.len() - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_value() {
        assert_eq!(redact_value(""), "[EMPTY]");
        assert_eq!(redact_value("abc"), "[REDACTED]");
        assert_eq!(redact_value("secret_key_12345"), "[REDACTED:16chars]");
    }

    #[test]
    fn test_redact_address() {
        let addr = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
        let redacted = redact_address(addr);
        assert!(redacted.starts_with("0xd8dA6B"));
        assert!(redacted.ends_with("6045"));
        assert!(redacted.contains("..."));
    }

    #[test]
    fn test_redact_hash() {
        let digest = "0xd8283ec13b28c9220077721a2c20aaae180a38c82ac58da608be0527f26d7ab6";
        let redacted = redact_hash(digest);
        assert!(redacted.starts_with("0xd8283ec13b"));
        assert!(redacted.ends_with("d7ab6"));
    }

    #[test]
    fn test_redact_if_sensitive() {
        assert!(redact_if_sensitive("signing_key", "secret123").contains("REDACTED"));

        let addr_redacted = redact_if_sensitive("authority", "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        assert!(addr_redacted.contains("..."));

        assert_eq!(redact_if_sensitive("amount", "100"), "100");
    }

    #[test]
    fn test_log_entry_redacts_fields() {
        let entry = LogEntry::new(LogLevel::Info, "test", "issued authorization")
            .field("amount", "100")
            .field("signing_key", "secret")
            .field("target", "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");

        let key_field = entry.fields.iter().find(|(k, _)| *k == "signing_key").unwrap();
        assert!(key_field.1.contains("REDACTED"));

        let addr_field = entry.fields.iter().find(|(k, _)| *k == "target").unwrap();
        assert!(addr_field.1.contains("..."));
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }
}
