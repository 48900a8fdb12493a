// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adapters from the typed host interfaces to the generic `Channel` seam.
//
// Each adapter unpacks the payload shape its host understands and invokes the
// host primitive. Handing an adapter the wrong shape is a wiring bug and is
// reported as `PayloadMismatch` rather than silently dropped.

use webview_tracker_core::error::{BridgeError, Result};
use webview_tracker_core::types::ChannelId;

use crate::payload::{LegacyCall, Payload};
use crate::traits::{Channel, MessageHandler, MessagePort, WebInterface, WebInterfaceV2};

/// v1 Android interface as a channel.
pub struct WebInterfaceChannel<T>(pub T);

impl<T: WebInterface> Channel for WebInterfaceChannel<T> {
    fn send(&self, payload: &Payload) -> Result<()> {
        let Payload::Legacy(call) = payload else {
            return Err(BridgeError::PayloadMismatch {
                channel: ChannelId::WebInterface,
                expected: "legacy call",
            });
        };

        let iface = &self.0;
        match call {
            LegacyCall::SelfDescribingEvent {
                schema,
                data,
                context,
                trackers,
            } => iface.track_self_describing_event(
                schema,
                data,
                context.as_deref(),
                trackers.as_deref(),
            ),
            LegacyCall::StructEvent {
                category,
                action,
                label,
                property,
                value,
                context,
                trackers,
            } => iface.track_struct_event(
                category,
                action,
                label.as_deref(),
                property.as_deref(),
                *value,
                context.as_deref(),
                trackers.as_deref(),
            ),
            LegacyCall::ScreenView {
                name,
                id,
                screen_type,
                previous_name,
                previous_id,
                previous_type,
                transition_type,
                context,
                trackers,
            } => iface.track_screen_view(
                name,
                id,
                screen_type.as_deref(),
                previous_name.as_deref(),
                previous_id.as_deref(),
                previous_type.as_deref(),
                transition_type.as_deref(),
                context.as_deref(),
                trackers.as_deref(),
            ),
            LegacyCall::PageView {
                page_url,
                page_title,
                referrer,
                context,
                trackers,
            } => iface.track_page_view(
                page_url,
                page_title,
                referrer,
                context.as_deref(),
                trackers.as_deref(),
            ),
        }
    }
}

/// v2 Android interface as a channel.
pub struct WebInterfaceV2Channel<T>(pub T);

impl<T: WebInterfaceV2> Channel for WebInterfaceV2Channel<T> {
    fn send(&self, payload: &Payload) -> Result<()> {
        let Payload::WebView(call) = payload else {
            return Err(BridgeError::PayloadMismatch {
                channel: ChannelId::WebInterfaceV2,
                expected: "web view call",
            });
        };
        self.0.track_web_view_event(
            &call.atomic_properties,
            call.self_describing_event_data.as_deref(),
            call.context.as_deref(),
            call.trackers.as_deref(),
        )
    }
}

/// A webkit message handler (v1 or v2) as a channel.
pub struct MessageHandlerChannel<T> {
    channel: ChannelId,
    handler: T,
}

impl<T: MessageHandler> MessageHandlerChannel<T> {
    pub fn new(channel: ChannelId, handler: T) -> Self {
        Self { channel, handler }
    }
}

impl<T: MessageHandler> Channel for MessageHandlerChannel<T> {
    fn send(&self, payload: &Payload) -> Result<()> {
        match payload {
            Payload::Message(message) => self.handler.post_message(message),
            _ => Err(BridgeError::PayloadMismatch {
                channel: self.channel,
                expected: "message object",
            }),
        }
    }
}

/// A string `postMessage` endpoint as a channel.
pub struct MessagePortChannel<T> {
    channel: ChannelId,
    port: T,
}

impl<T: MessagePort> MessagePortChannel<T> {
    pub fn new(channel: ChannelId, port: T) -> Self {
        Self { channel, port }
    }
}

impl<T: MessagePort> Channel for MessagePortChannel<T> {
    fn send(&self, payload: &Payload) -> Result<()> {
        match payload {
            Payload::Text(message) => self.port.post_message(message),
            _ => Err(BridgeError::PayloadMismatch {
                channel: self.channel,
                expected: "message string",
            }),
        }
    }
}
