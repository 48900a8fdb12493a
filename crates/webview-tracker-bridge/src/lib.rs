// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WebView tracker bridge — forwards events tracked inside a WebView to every
// host tracker that is listening.
//
// The host injects its messaging endpoints into a `ChannelRegistry` (directly
// or by resolving them from a `HostObject` model of its globals). Each
// `WebViewTracker::track_*` call encodes the event once per reachable channel
// in that channel's wire shape and sends it. Android v1/v2 interfaces, webkit
// message handlers v1/v2, and the React Native and Flutter string channels
// are supported.

pub mod adapters;
pub mod dispatch;
pub mod payload;
pub mod registry;
pub mod stub;
pub mod traits;

pub use dispatch::WebViewTracker;
pub use payload::{LegacyCall, Payload, TrackRequest, WebViewCall};
pub use registry::{ChannelRegistry, HostObject, HostValue};
pub use traits::{Channel, HostPage};
