// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-channel payload encoding.
//
// Every builder here is a pure function of the request. Four wire shapes
// exist:
//
//   Legacy: positional arguments for the v1 Android interface
//   WebView: three JSON strings + trackers for the v2 Android interface
//   Message: a JSON object for webkit message handlers (v1 envelope,
//   v2 pre-serialized fields)
//   Text: the v1 envelope as one JSON string (React Native, Flutter)
//
// Absent optionals stay absent: they become `None` positionally, `null` in
// the v2 objects, and are omitted from the envelope. Present values such as
// `0` or `""` are never coerced away.

use serde::Serialize;
use serde_json::Value;

use webview_tracker_core::error::{BridgeError, Result};
use webview_tracker_core::types::{
    AtomicProperties, ChannelId, Event, EventKind, PageView, ScreenView, SelfDescribingEvent,
    SelfDescribingJson, StructuredEvent, js_number,
};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One tracking call: the resolved event plus its optional context and
/// tracker selector.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRequest<'a> {
    pub event: Event<'a>,
    pub context: Option<&'a [SelfDescribingJson]>,
    pub trackers: Option<&'a [String]>,
}

impl<'a> TrackRequest<'a> {
    pub fn new(
        event: Event<'a>,
        context: Option<&'a [SelfDescribingJson]>,
        trackers: Option<&'a [String]>,
    ) -> Self {
        Self {
            event,
            context,
            trackers,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }

    fn owned_trackers(&self) -> Option<Vec<String>> {
        self.trackers.map(<[String]>::to_vec)
    }
}

// ---------------------------------------------------------------------------
// Payload shapes
// ---------------------------------------------------------------------------

/// Transport-ready representation of one event for one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Legacy(LegacyCall),
    WebView(WebViewCall),
    Message(Value),
    Text(String),
}

impl Payload {
    /// Short name of the shape, for logs and mismatch errors.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Legacy(_) => "legacy call",
            Self::WebView(_) => "web view call",
            Self::Message(_) => "message object",
            Self::Text(_) => "message string",
        }
    }
}

/// Positional arguments for one method of the v1 Android interface.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyCall {
    SelfDescribingEvent {
        schema: String,
        /// JSON-encoded `data`.
        data: String,
        context: Option<String>,
        trackers: Option<Vec<String>>,
    },
    StructEvent {
        category: String,
        action: String,
        label: Option<String>,
        property: Option<String>,
        value: Option<f64>,
        context: Option<String>,
        trackers: Option<Vec<String>>,
    },
    ScreenView {
        name: String,
        id: String,
        screen_type: Option<String>,
        previous_name: Option<String>,
        previous_id: Option<String>,
        previous_type: Option<String>,
        transition_type: Option<String>,
        context: Option<String>,
        trackers: Option<Vec<String>>,
    },
    PageView {
        page_url: String,
        page_title: String,
        referrer: String,
        context: Option<String>,
        trackers: Option<Vec<String>>,
    },
}

impl LegacyCall {
    /// Name of the interface method this call targets.
    pub fn method(&self) -> &'static str {
        match self {
            Self::SelfDescribingEvent { .. } => EventKind::SelfDescribing.command(),
            Self::StructEvent { .. } => EventKind::Structured.command(),
            Self::ScreenView { .. } => EventKind::ScreenView.command(),
            Self::PageView { .. } => EventKind::PageView.command(),
        }
    }

    /// The argument list in call order, with `null` for every absent value.
    pub fn arguments(&self) -> Vec<Value> {
        match self {
            Self::SelfDescribingEvent {
                schema,
                data,
                context,
                trackers,
            } => vec![
                Value::from(schema.as_str()),
                Value::from(data.as_str()),
                opt_str(context),
                opt_list(trackers),
            ],
            Self::StructEvent {
                category,
                action,
                label,
                property,
                value,
                context,
                trackers,
            } => vec![
                Value::from(category.as_str()),
                Value::from(action.as_str()),
                opt_str(label),
                opt_str(property),
                value.map_or(Value::Null, number),
                opt_str(context),
                opt_list(trackers),
            ],
            Self::ScreenView {
                name,
                id,
                screen_type,
                previous_name,
                previous_id,
                previous_type,
                transition_type,
                context,
                trackers,
            } => vec![
                Value::from(name.as_str()),
                Value::from(id.as_str()),
                opt_str(screen_type),
                opt_str(previous_name),
                opt_str(previous_id),
                opt_str(previous_type),
                opt_str(transition_type),
                opt_str(context),
                opt_list(trackers),
            ],
            Self::PageView {
                page_url,
                page_title,
                referrer,
                context,
                trackers,
            } => vec![
                Value::from(page_url.as_str()),
                Value::from(page_title.as_str()),
                Value::from(referrer.as_str()),
                opt_str(context),
                opt_list(trackers),
            ],
        }
    }
}

fn opt_str(value: &Option<String>) -> Value {
    value.as_deref().map_or(Value::Null, Value::from)
}

fn opt_list(value: &Option<Vec<String>>) -> Value {
    value.as_ref().map_or(Value::Null, |list| Value::from(list.clone()))
}

fn number(value: f64) -> Value {
    js_number::serialize_f64(value, serde_json::value::Serializer).unwrap_or(Value::Null)
}

/// Arguments for the v2 Android `trackWebViewEvent`.
#[derive(Debug, Clone, PartialEq)]
pub struct WebViewCall {
    pub atomic_properties: String,
    pub self_describing_event_data: Option<String>,
    pub context: Option<String>,
    pub trackers: Option<Vec<String>>,
}

/// Object posted to the v2 webkit handler. The context travels under
/// `entities`, which is what the native side reads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebkitV2Message<'a> {
    atomic_properties: &'a str,
    self_describing_event_data: Option<&'a str>,
    entities: Option<&'a str>,
    trackers: Option<&'a [String]>,
}

/// The v1 envelope shared by the webkit handler and the string channels.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub command: &'static str,
    pub event: EnvelopeEvent<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a [SelfDescribingJson]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trackers: Option<&'a [String]>,
}

/// The `event` field of an envelope, shaped per event kind.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EnvelopeEvent<'a> {
    PageView(&'a PageView),
    ScreenView(&'a ScreenView),
    Structured(&'a StructuredEvent),
    /// Self-describing events carry their `{schema, data}` pair as is.
    SelfDescribing(&'a SelfDescribingJson),
    WebView(WebViewEnvelopeEvent<'a>),
}

/// Atomic properties spread alongside the optional self-describing payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebViewEnvelopeEvent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_describing_event_data: Option<&'a SelfDescribingEvent>,
    #[serde(flatten)]
    pub properties: &'a AtomicProperties,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// JSON-encode context entities; `None` when there is no context. An empty
/// list is still context and encodes as `[]`.
pub fn serialize_context(context: Option<&[SelfDescribingJson]>) -> Result<Option<String>> {
    context
        .map(serde_json::to_string)
        .transpose()
        .map_err(BridgeError::from)
}

/// JSON-encode the optional self-describing part of a WebView event.
pub fn serialize_self_describing_event(event: Option<&SelfDescribingEvent>) -> Result<Option<String>> {
    event
        .map(serde_json::to_string)
        .transpose()
        .map_err(BridgeError::from)
}

/// Positional call for the v1 Android interface.
pub fn legacy_call(request: &TrackRequest<'_>) -> Result<LegacyCall> {
    let context = serialize_context(request.context)?;
    let trackers = request.owned_trackers();

    let call = match request.event {
        Event::SelfDescribing(sd) => LegacyCall::SelfDescribingEvent {
            schema: sd.event.schema.clone(),
            data: serde_json::to_string(&sd.event.data)?,
            context,
            trackers,
        },
        Event::Structured(se) => LegacyCall::StructEvent {
            category: se.category.clone(),
            action: se.action.clone(),
            label: se.label.clone(),
            property: se.property.clone(),
            value: se.value,
            context,
            trackers,
        },
        Event::ScreenView(sv) => LegacyCall::ScreenView {
            name: sv.name.clone(),
            id: sv.id.clone(),
            screen_type: sv.screen_type.clone(),
            previous_name: sv.previous_name.clone(),
            previous_id: sv.previous_id.clone(),
            previous_type: sv.previous_type.clone(),
            transition_type: sv.transition_type.clone(),
            context,
            trackers,
        },
        Event::PageView(pv) => LegacyCall::PageView {
            page_url: pv.url.clone(),
            page_title: pv.title.clone(),
            referrer: pv.referrer.clone(),
            context,
            trackers,
        },
        Event::WebView(_) => {
            return Err(BridgeError::UnsupportedEvent {
                channel: ChannelId::WebInterface,
                kind: EventKind::WebView,
            });
        }
    };
    Ok(call)
}

/// Arguments for the v2 Android interface. Only WebView events have this
/// encoding.
pub fn web_view_call(request: &TrackRequest<'_>) -> Result<WebViewCall> {
    let Event::WebView(event) = request.event else {
        return Err(BridgeError::UnsupportedEvent {
            channel: ChannelId::WebInterfaceV2,
            kind: request.kind(),
        });
    };

    Ok(WebViewCall {
        atomic_properties: serde_json::to_string(&event.properties)?,
        self_describing_event_data: serialize_self_describing_event(event.event.as_ref())?,
        context: serialize_context(request.context)?,
        trackers: request.owned_trackers(),
    })
}

/// Object for the v2 webkit handler, built from the same strings as
/// [`web_view_call`].
pub fn webkit_v2_message(request: &TrackRequest<'_>) -> Result<Value> {
    let call = web_view_call(request).map_err(|err| match err {
        BridgeError::UnsupportedEvent { kind, .. } => BridgeError::UnsupportedEvent {
            channel: ChannelId::WebkitHandlerV2,
            kind,
        },
        other => other,
    })?;

    let message = WebkitV2Message {
        atomic_properties: &call.atomic_properties,
        self_describing_event_data: call.self_describing_event_data.as_deref(),
        entities: call.context.as_deref(),
        trackers: call.trackers.as_deref(),
    };
    Ok(serde_json::to_value(&message)?)
}

/// The v1 envelope for any event kind.
pub fn envelope<'a>(request: &'a TrackRequest<'a>) -> Envelope<'a> {
    let event = match request.event {
        Event::PageView(pv) => EnvelopeEvent::PageView(pv),
        Event::ScreenView(sv) => EnvelopeEvent::ScreenView(sv),
        Event::Structured(se) => EnvelopeEvent::Structured(se),
        Event::SelfDescribing(sd) => EnvelopeEvent::SelfDescribing(&sd.event),
        Event::WebView(wv) => EnvelopeEvent::WebView(WebViewEnvelopeEvent {
            self_describing_event_data: wv.event.as_ref(),
            properties: &wv.properties,
        }),
    };

    Envelope {
        command: request.kind().command(),
        event,
        context: request.context,
        trackers: request.trackers,
    }
}

/// Envelope as a JSON object, for the v1 webkit handler.
pub fn envelope_message(request: &TrackRequest<'_>) -> Result<Value> {
    Ok(serde_json::to_value(envelope(request))?)
}

/// Envelope as a JSON string, for React Native and Flutter.
pub fn envelope_text(request: &TrackRequest<'_>) -> Result<String> {
    Ok(serde_json::to_string(&envelope(request))?)
}

// ---------------------------------------------------------------------------
// Route table
// ---------------------------------------------------------------------------

/// Encodes a request for one particular channel.
pub type Builder = fn(&TrackRequest<'_>) -> Result<Payload>;

/// A channel together with the builder that encodes for it.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub channel: ChannelId,
    pub build: Builder,
}

fn build_legacy(request: &TrackRequest<'_>) -> Result<Payload> {
    legacy_call(request).map(Payload::Legacy)
}

fn build_web_view(request: &TrackRequest<'_>) -> Result<Payload> {
    web_view_call(request).map(Payload::WebView)
}

fn build_webkit_v2(request: &TrackRequest<'_>) -> Result<Payload> {
    webkit_v2_message(request).map(Payload::Message)
}

fn build_envelope_message(request: &TrackRequest<'_>) -> Result<Payload> {
    envelope_message(request).map(Payload::Message)
}

fn build_envelope_text(request: &TrackRequest<'_>) -> Result<Payload> {
    envelope_text(request).map(Payload::Text)
}

static CLASSIC_ROUTES: [Route; 4] = [
    Route {
        channel: ChannelId::WebInterface,
        build: build_legacy,
    },
    Route {
        channel: ChannelId::WebkitHandler,
        build: build_envelope_message,
    },
    Route {
        channel: ChannelId::ReactNative,
        build: build_envelope_text,
    },
    Route {
        channel: ChannelId::Flutter,
        build: build_envelope_text,
    },
];

static WEB_VIEW_ROUTES: [Route; 4] = [
    Route {
        channel: ChannelId::WebInterfaceV2,
        build: build_web_view,
    },
    Route {
        channel: ChannelId::WebkitHandlerV2,
        build: build_webkit_v2,
    },
    Route {
        channel: ChannelId::ReactNative,
        build: build_envelope_text,
    },
    Route {
        channel: ChannelId::Flutter,
        build: build_envelope_text,
    },
];

/// Channels an event kind is delivered through, in attempt order.
pub fn routes(kind: EventKind) -> &'static [Route] {
    match kind {
        EventKind::WebView => &WEB_VIEW_ROUTES,
        EventKind::PageView
        | EventKind::ScreenView
        | EventKind::Structured
        | EventKind::SelfDescribing => &CLASSIC_ROUTES,
    }
}
