//! # Journal
//!
//! Frame-structured write overlay over a [`ContractStorage`] backend.
//!
//! Every atomic operation opens a frame. Reads see the newest write across
//! all open frames, then the backend. Committing a frame merges it into its
//! parent; committing the outermost frame flushes to the backend. Reverting a
//! frame drops its writes and logs, leaving everything below untouched.

use crate::domain::entities::Log;
use crate::domain::layout::{chunks, data_start, BytesHeader};
use crate::domain::value_objects::{StorageKey, StorageValue};
use crate::errors::StateError;
use crate::ports::outbound::ContractStorage;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Frame {
    writes: BTreeMap<StorageKey, StorageValue>,
    logs: Vec<Log>,
}

/// Journaled view of one contract's persisted state.
pub struct Journal {
    backend: Box<dyn ContractStorage>,
    frames: Vec<Frame>,
    committed_logs: Vec<Log>,
}

impl Journal {
    /// Wraps a storage backend.
    pub fn new(backend: impl ContractStorage + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            frames: Vec::new(),
            committed_logs: Vec::new(),
        }
    }

    /// Reads a slot through the open frames.
    pub fn load(&self, key: &StorageKey) -> Result<StorageValue, StateError> {
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.writes.get(key) {
                return Ok(*value);
            }
        }
        self.backend.load(key)
    }

    /// Writes a slot into the innermost frame (or the backend if none is open).
    pub fn store(&mut self, key: StorageKey, value: StorageValue) -> Result<(), StateError> {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.writes.insert(key, value);
                Ok(())
            }
            None => self.backend.store(key, value),
        }
    }

    /// Records a log in the innermost frame.
    pub fn emit(&mut self, log: Log) {
        match self.frames.last_mut() {
            Some(frame) => frame.logs.push(log),
            None => self.committed_logs.push(log),
        }
    }

    /// Opens a frame.
    pub fn checkpoint(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Commits the innermost frame.
    ///
    /// When it is the outermost one, its writes go to the backend as a single
    /// all-or-nothing write set.
    pub fn commit(&mut self) -> Result<(), StateError> {
        let Some(frame) = self.frames.pop() else {
            return Ok(());
        };
        match self.frames.last_mut() {
            Some(parent) => {
                parent.writes.extend(frame.writes);
                parent.logs.extend(frame.logs);
            }
            None => {
                self.backend.apply(frame.writes)?;
                self.committed_logs.extend(frame.logs);
            }
        }
        Ok(())
    }

    /// Discards the innermost frame.
    pub fn revert(&mut self) {
        self.frames.pop();
    }

    /// Number of open frames.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Drains logs committed so far.
    pub fn take_logs(&mut self) -> Vec<Log> {
        std::mem::take(&mut self.committed_logs)
    }

    // =========================================================================
    // DYNAMIC BYTES
    // =========================================================================

    /// Reads a dynamic byte string stored at `slot`.
    pub fn load_bytes(&self, slot: &StorageKey) -> Result<Vec<u8>, StateError> {
        match self.bytes_header(slot)? {
            BytesHeader::Short(data) => Ok(data),
            BytesHeader::Long { len } => {
                let start = data_start(slot);
                let mut out = Vec::new();
                for i in 0..chunks(len) {
                    out.extend_from_slice(self.load(&start.offset(i))?.as_bytes());
                }
                out.truncate(len);
                Ok(out)
            }
        }
    }

    /// Writes a dynamic byte string at `slot`, zeroing data slots the previous
    /// value used beyond the new length.
    pub fn store_bytes(&mut self, slot: StorageKey, data: &[u8]) -> Result<(), StateError> {
        let previous = self.bytes_header(&slot)?;
        let header = BytesHeader::for_data(data);
        let start = data_start(&slot);

        if let BytesHeader::Long { .. } = header {
            for (i, chunk) in (0u64..).zip(data.chunks(32)) {
                let mut word = [0u8; 32];
                word[..chunk.len()].copy_from_slice(chunk);
                self.store(start.offset(i), StorageValue::new(word))?;
            }
        }
        for i in header.data_slots()..previous.data_slots() {
            self.store(start.offset(i), StorageValue::ZERO)?;
        }
        self.store(slot, header.encode())
    }

    fn bytes_header(&self, slot: &StorageKey) -> Result<BytesHeader, StateError> {
        BytesHeader::decode(&self.load(slot)?)
            .ok_or_else(|| StateError::Corrupted(format!("bytes header at {slot:?}")))
    }
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal")
            .field("frames", &self.frames.len())
            .field("committed_logs", &self.committed_logs.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
