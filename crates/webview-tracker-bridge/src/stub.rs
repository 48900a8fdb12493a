// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process stand-ins for host channels and page state, for desktop/CI
// builds and tests where no WebView host is attached.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use webview_tracker_core::error::{BridgeError, Result};
use webview_tracker_core::types::ChannelId;

use crate::payload::Payload;
use crate::traits::{Channel, HostPage};

/// Channel that keeps every payload it is sent.
///
/// Availability can be toggled at runtime, and a failure can be injected to
/// exercise error propagation.
pub struct RecordingChannel {
    channel: ChannelId,
    available: AtomicBool,
    failure: Mutex<Option<String>>,
    sent: Mutex<Vec<Payload>>,
}

impl RecordingChannel {
    pub fn new(channel: ChannelId) -> Self {
        Self {
            channel,
            available: AtomicBool::new(true),
            failure: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make every following `send` fail with `reason` (or succeed again with
    /// `None`). Failed sends are still recorded.
    pub fn fail_with(&self, reason: Option<&str>) {
        *lock(&self.failure) = reason.map(str::to_owned);
    }

    /// Payloads received so far, oldest first.
    pub fn sent(&self) -> Vec<Payload> {
        lock(&self.sent).clone()
    }

    pub fn send_count(&self) -> usize {
        lock(&self.sent).len()
    }
}

impl Channel for RecordingChannel {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn send(&self, payload: &Payload) -> Result<()> {
        lock(&self.sent).push(payload.clone());
        match lock(&self.failure).as_deref() {
            Some(reason) => Err(BridgeError::transport(self.channel, reason)),
            None => Ok(()),
        }
    }
}

// A panicking test thread must not take the recorder down with it.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Snapshot of `location.href`, `document.title` and `document.referrer`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    pub href: String,
    pub title: String,
    pub referrer: String,
}

/// Page whose state can be changed between tracking calls.
#[derive(Debug, Default)]
pub struct StaticPage {
    state: RwLock<PageState>,
}

impl StaticPage {
    pub fn new(href: impl Into<String>, title: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(PageState {
                href: href.into(),
                title: title.into(),
                referrer: referrer.into(),
            }),
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.write().title = title.into();
    }

    pub fn navigate(&self, href: impl Into<String>, referrer: impl Into<String>) {
        let mut state = self.write();
        state.href = href.into();
        state.referrer = referrer.into();
    }

    fn read(&self) -> PageState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, PageState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HostPage for StaticPage {
    fn location_href(&self) -> String {
        self.read().href
    }

    fn document_title(&self) -> String {
        self.read().title
    }

    fn document_referrer(&self) -> String {
        self.read().referrer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_payloads_in_order() {
        let channel = RecordingChannel::new(ChannelId::ReactNative);
        channel.send(&Payload::Text("a".into())).unwrap();
        channel.send(&Payload::Text("b".into())).unwrap();
        assert_eq!(
            channel.sent(),
            vec![Payload::Text("a".into()), Payload::Text("b".into())]
        );
    }

    #[test]
    fn injected_failure_is_a_transport_error() {
        let channel = RecordingChannel::new(ChannelId::Flutter);
        channel.fail_with(Some("channel closed"));
        let err = channel.send(&Payload::Text("x".into())).unwrap_err();
        assert_eq!(err.to_string(), "flutter transport failed: channel closed");
        assert_eq!(channel.send_count(), 1);
    }

    #[test]
    fn availability_toggles() {
        let channel = RecordingChannel::new(ChannelId::WebInterface);
        assert!(channel.is_available());
        channel.set_available(false);
        assert!(!channel.is_available());
    }

    #[test]
    fn page_reads_current_state() {
        let page = StaticPage::new("https://a.example/", "A", "");
        page.set_title("B");
        page.navigate("https://b.example/", "https://a.example/");
        assert_eq!(page.document_title(), "B");
        assert_eq!(page.location_href(), "https://b.example/");
        assert_eq!(page.document_referrer(), "https://a.example/");
    }
}
