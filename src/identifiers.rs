// Copyright 2025 Cowboy AI, LLC.

//! Identifier generation for documents and nested entities
//!
//! Identifiers are opaque strings owned by the server. The generator is a
//! capability handed to validation so tests can use predictable ids.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of fresh identifiers
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Produce an identifier that has never been returned before
    fn next_id(&self) -> String;
}

/// Random UUID v4 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic identifiers `<prefix>-1`, `<prefix>-2`, ...
///
/// # Examples
///
/// ```rust
/// use profile_manager::{IdGenerator, SequentialIdGenerator};
///
/// let ids = SequentialIdGenerator::new("norm");
/// assert_eq!(ids.next_id(), "norm-1");
/// assert_eq!(ids.next_id(), "norm-2");
/// ```
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator whose ids start with `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Number of identifiers handed out so far
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let next = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", self.prefix, next)
    }
}
