// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Event fan-out.
//
// Each tracking call resolves its event, then walks the route table for that
// event kind. Every reachable channel gets its own encoding and one send.
// Absent channels are skipped silently. A failing channel does not stop the
// others; the first error is returned once the fan-out is complete.

use std::sync::Arc;

use tracing::{debug, instrument, trace, warn};

use webview_tracker_core::config::BridgeConfig;
use webview_tracker_core::error::{BridgeError, Result};
use webview_tracker_core::types::{
    CommonEventProperties, Event, PageViewEvent, ScreenView, SelfDescribingEvent, StructuredEvent,
    WebViewEvent,
};

use crate::payload::{TrackRequest, routes};
use crate::registry::{ChannelRegistry, HostObject};
use crate::traits::HostPage;

/// Forwards events from the page to every host tracker listening.
pub struct WebViewTracker {
    registry: ChannelRegistry,
    page: Arc<dyn HostPage>,
}

impl WebViewTracker {
    pub fn new(registry: ChannelRegistry, page: Arc<dyn HostPage>) -> Self {
        Self { registry, page }
    }

    /// Build a tracker whose channels are resolved from the host globals.
    pub fn from_host(host: &HostObject, page: Arc<dyn HostPage>, config: &BridgeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(ChannelRegistry::from_host(host, config), page))
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ChannelRegistry {
        &mut self.registry
    }

    /// See [`ChannelRegistry::has_mobile_interface`].
    pub fn has_mobile_interface(&self) -> bool {
        self.registry.has_mobile_interface()
    }

    /// Track a visit to the current page. URL, document title and referrer
    /// are read from the page now; `event.title` overrides the title.
    pub fn track_page_view(
        &self,
        event: &PageViewEvent,
        common: &CommonEventProperties,
        trackers: Option<&[String]>,
    ) -> Result<()> {
        let resolved = event.resolve(
            self.page.location_href(),
            self.page.document_title(),
            self.page.document_referrer(),
        );
        self.dispatch(TrackRequest::new(
            Event::PageView(&resolved),
            common.context.as_deref(),
            trackers,
        ))
    }

    /// Track the user viewing a screen within a mobile application.
    pub fn track_screen_view(
        &self,
        event: &ScreenView,
        common: &CommonEventProperties,
        trackers: Option<&[String]>,
    ) -> Result<()> {
        self.dispatch(TrackRequest::new(
            Event::ScreenView(event),
            common.context.as_deref(),
            trackers,
        ))
    }

    /// Track a category/action event.
    pub fn track_struct_event(
        &self,
        event: &StructuredEvent,
        common: &CommonEventProperties,
        trackers: Option<&[String]>,
    ) -> Result<()> {
        self.dispatch(TrackRequest::new(
            Event::Structured(event),
            common.context.as_deref(),
            trackers,
        ))
    }

    /// Track a custom event described by its own schema.
    pub fn track_self_describing_event(
        &self,
        event: &SelfDescribingEvent,
        common: &CommonEventProperties,
        trackers: Option<&[String]>,
    ) -> Result<()> {
        self.dispatch(TrackRequest::new(
            Event::SelfDescribing(event),
            common.context.as_deref(),
            trackers,
        ))
    }

    /// Forward an event captured by a web tracker inside the WebView. Goes to
    /// the v2 native interfaces and the string channels only.
    pub fn track_web_view_event(
        &self,
        event: &WebViewEvent,
        common: &CommonEventProperties,
        trackers: Option<&[String]>,
    ) -> Result<()> {
        self.dispatch(TrackRequest::new(
            Event::WebView(event),
            common.context.as_deref(),
            trackers,
        ))
    }

    #[instrument(skip_all, fields(command = request.kind().command()))]
    fn dispatch(&self, request: TrackRequest<'_>) -> Result<()> {
        let mut first_error: Option<BridgeError> = None;

        for route in routes(request.kind()) {
            let Some(channel) = self.registry.detect(route.channel) else {
                trace!(channel = %route.channel, "channel not reachable, skipping");
                continue;
            };

            let outcome = (route.build)(&request).and_then(|payload| {
                let shape = payload.shape();
                channel.send(&payload)?;
                debug!(channel = %route.channel, shape, "event forwarded");
                Ok(())
            });

            if let Err(err) = outcome {
                warn!(channel = %route.channel, error = %err, "event not delivered");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}
