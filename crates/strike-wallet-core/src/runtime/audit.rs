// crates/strike-wallet-core/src/runtime/audit.rs
// ============================================================================
// Module: Strike Wallet Audit Sinks
// Description: JSON-lines audit sinks for processed wallet transactions.
// Purpose: Route audit events to stderr, a file, memory, or nowhere.
// Dependencies: serde_json, crate::interfaces
// ============================================================================

//! ## Overview
//! Sinks serialize each [`WalletAuditEvent`] as one JSON line. Serialization
//! and write failures are dropped; auditing never changes an instruction's
//! outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use crate::interfaces::WalletAuditEvent;
use crate::interfaces::WalletAuditSink;

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct WalletStderrAuditSink;

impl WalletAuditSink for WalletStderrAuditSink {
    fn record(&self, event: &WalletAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct WalletFileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl WalletFileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl WalletAuditSink for WalletFileAuditSink {
    fn record(&self, event: &WalletAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct WalletNoopAuditSink;

impl WalletAuditSink for WalletNoopAuditSink {
    fn record(&self, _event: &WalletAuditEvent) {}
}

/// Audit sink that keeps events in memory.
#[derive(Debug, Default, Clone)]
pub struct WalletMemoryAuditSink {
    /// Recorded events.
    events: Arc<Mutex<Vec<WalletAuditEvent>>>,
}

impl WalletMemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<WalletAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl WalletAuditSink for WalletMemoryAuditSink {
    fn record(&self, event: &WalletAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

impl<T: WalletAuditSink + ?Sized> WalletAuditSink for Box<T> {
    fn record(&self, event: &WalletAuditEvent) {
        (**self).record(event);
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
