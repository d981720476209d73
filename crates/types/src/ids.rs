//! Record identifiers.
//!
//! Every generated record is identified by a human-readable prefix and a zero-padded
//! sequence number, e.g. `TCH-000001` or `ENC-00000001`. Uniqueness comes from the
//! counter alone.

/// Monotonic id allocator for a single entity type.
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: &'static str,
    width: usize,
    issued: u64,
}

impl IdSequence {
    pub fn new(prefix: &'static str, width: usize) -> Self {
        Self {
            prefix,
            width,
            issued: 0,
        }
    }

    /// Issues the next id. The first id issued is sequence number 1.
    pub fn next_id(&mut self) -> String {
        self.issued += 1;
        Self::format(self.prefix, self.width, self.issued)
    }

    /// Formats an id for an explicit 1-based position without touching any counter.
    pub fn format(prefix: &str, width: usize, position: u64) -> String {
        format!("{prefix}-{position:0width$}")
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }
}
