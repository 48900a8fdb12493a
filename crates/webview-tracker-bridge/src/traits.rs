// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for host messaging channels.
//
// `Channel` is the generic seam the dispatcher talks to. The typed traits
// below mirror the primitives each host actually exposes; the adapters in
// `adapters` turn them into `Channel`s.

use webview_tracker_core::error::Result;

use crate::payload::Payload;

/// A host messaging endpoint.
///
/// `is_available` is asked on every tracking call, so an endpoint may come
/// and go during the life of the page.
pub trait Channel: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    /// Hand one encoded event to the host.
    fn send(&self, payload: &Payload) -> Result<()>;
}

/// State of the page the tracker is embedded in. Read fresh on every page
/// view; never cached.
pub trait HostPage: Send + Sync {
    /// `window.location.href`
    fn location_href(&self) -> String;
    /// `document.title`
    fn document_title(&self) -> String;
    /// `document.referrer`
    fn document_referrer(&self) -> String;
}

/// Android `SnowplowWebInterface`: one JavaScript-interface method per event
/// kind, all arguments positional. Context arrives as a JSON string.
pub trait WebInterface: Send + Sync {
    fn track_self_describing_event(
        &self,
        schema: &str,
        data: &str,
        context: Option<&str>,
        trackers: Option<&[String]>,
    ) -> Result<()>;

    #[allow(clippy::too_many_arguments)]
    fn track_struct_event(
        &self,
        category: &str,
        action: &str,
        label: Option<&str>,
        property: Option<&str>,
        value: Option<f64>,
        context: Option<&str>,
        trackers: Option<&[String]>,
    ) -> Result<()>;

    #[allow(clippy::too_many_arguments)]
    fn track_screen_view(
        &self,
        name: &str,
        id: &str,
        screen_type: Option<&str>,
        previous_name: Option<&str>,
        previous_id: Option<&str>,
        previous_type: Option<&str>,
        transition_type: Option<&str>,
        context: Option<&str>,
        trackers: Option<&[String]>,
    ) -> Result<()>;

    fn track_page_view(
        &self,
        page_url: &str,
        page_title: &str,
        referrer: &str,
        context: Option<&str>,
        trackers: Option<&[String]>,
    ) -> Result<()>;
}

/// Android `SnowplowWebInterfaceV2` (mobile tracker 6.1+).
pub trait WebInterfaceV2: Send + Sync {
    fn track_web_view_event(
        &self,
        atomic_properties: &str,
        self_describing_event_data: Option<&str>,
        context: Option<&str>,
        trackers: Option<&[String]>,
    ) -> Result<()>;
}

/// webkit `messageHandlers.<name>.postMessage(object)`.
pub trait MessageHandler: Send + Sync {
    fn post_message(&self, message: &serde_json::Value) -> Result<()>;
}

/// `postMessage(string)` as exposed by React Native WebViews and Flutter
/// JavaScript channels.
pub trait MessagePort: Send + Sync {
    fn post_message(&self, message: &str) -> Result<()>;
}

impl<F> MessageHandler for F
where
    F: Fn(&serde_json::Value) -> Result<()> + Send + Sync,
{
    fn post_message(&self, message: &serde_json::Value) -> Result<()> {
        self(message)
    }
}

impl<F> MessagePort for F
where
    F: Fn(&str) -> Result<()> + Send + Sync,
{
    fn post_message(&self, message: &str) -> Result<()> {
        self(message)
    }
}
