use std::sync::atomic::{AtomicU64, Ordering};

use super::Id;

/// Source of fresh record ids; injected so imports are reproducible in tests.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> Id;
}

#[derive(Debug, Clone, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn new_id(&self) -> Id {
        Id::new()
    }
}

/// Yields `prefix-1`, `prefix-2`, ... in call order.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    issued: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            issued: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn new_id(&self) -> Id {
        let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        Id::from_string(format!("{}-{n}", self.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_from_one() {
        let ids = SequentialIdGenerator::new("refund");
        assert_eq!(ids.new_id().as_str(), "refund-1");
        assert_eq!(ids.new_id().as_str(), "refund-2");
    }
}
