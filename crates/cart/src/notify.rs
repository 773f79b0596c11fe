//! User-facing notifications.
//!
//! Every rejected or failed cart operation ends in exactly one
//! [`Notification`]. The set of messages is closed; front ends decide how to
//! present them (toast, status line, log).

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// One of the fixed messages a cart operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// Requested quantity is not available (add or update).
    StockExceeded,
    /// Adding a product failed (lookup or storage).
    AddFailed,
    /// Removing a product failed (not in cart or storage).
    RemoveFailed,
    /// Update requested a quantity of zero or less.
    InvalidQuantity,
    /// Updating a quantity failed (lookup or storage).
    UpdateFailed,
}

impl Notification {
    /// Display text for this notification.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::StockExceeded => "requested quantity exceeds stock",
            Self::AddFailed => "error adding product",
            Self::RemoveFailed => "error removing product",
            Self::InvalidQuantity => "quantity cannot be less than zero",
            Self::UpdateFailed => "error updating product quantity",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Sink for user-facing notifications. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Emits notifications as `warn` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::warn!(kind = ?notification, "{}", notification.message());
    }
}

/// Keeps every notification in memory, in the order received.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent notification, if any.
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }

    /// Drain and return everything received so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
