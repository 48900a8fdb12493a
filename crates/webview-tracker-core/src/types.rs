// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core event types for the WebView tracker bridge.
//
// All wire encodings are camelCase. Optional fields that are absent are
// omitted from JSON output rather than written as `null`; a present value is
// always kept, including `0` and `""`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A `{schema, data}` pair. `data` is claimed to conform to `schema`; the
/// bridge never checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfDescribingJson {
    /// e.g. `iglu:com.snowplowanalytics.snowplow/web_page/jsonschema/1-0-0`
    pub schema: String,
    pub data: serde_json::Value,
}

impl SelfDescribingJson {
    pub fn new(schema: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            schema: schema.into(),
            data,
        }
    }
}

/// A custom event described by its own schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfDescribingEvent {
    pub event: SelfDescribingJson,
}

impl SelfDescribingEvent {
    pub fn new(schema: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: SelfDescribingJson::new(schema, data),
        }
    }
}

/// Classic category/action event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredEvent {
    /// Group of objects being tracked, e.g. "media", "ecomm".
    pub category: String,
    /// Type of user interaction.
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number::serialize"
    )]
    pub value: Option<f64>,
}

impl StructuredEvent {
    pub fn new(category: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            action: action.into(),
            ..Default::default()
        }
    }
}

/// A user viewing a screen within a mobile application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenView {
    pub name: String,
    /// UUID v4 of the screen.
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub screen_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_type: Option<String>,
}

impl ScreenView {
    /// Screen view with a freshly generated v4 id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: Uuid::new_v4().to_string(),
            ..Default::default()
        }
    }
}

/// Page view as supplied by the caller. Only the title can be overridden;
/// URL and referrer always come from the host page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageViewEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PageViewEvent {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }

    /// Resolve against the page state read at call time. An explicit title,
    /// even an empty one, wins over the document title.
    pub fn resolve(&self, url: String, document_title: String, referrer: String) -> PageView {
        PageView {
            url,
            title: self.title.clone().unwrap_or(document_title),
            referrer,
        }
    }
}

/// Page view with every field resolved. This is the shape sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub url: String,
    pub title: String,
    pub referrer: String,
}

/// Event properties that map straight onto atomic columns rather than a
/// self-describing schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtomicProperties {
    /// Event type, e.g. "pp" for page ping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub useragent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number::serialize"
    )]
    pub value: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number::serialize"
    )]
    pub ping_x_offset_min: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number::serialize"
    )]
    pub ping_x_offset_max: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number::serialize"
    )]
    pub ping_y_offset_min: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number::serialize"
    )]
    pub ping_y_offset_max: Option<f64>,
}

/// Atomic properties plus an optional self-describing payload, forwarded by
/// web trackers running inside the WebView.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebViewEvent {
    pub properties: AtomicProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<SelfDescribingEvent>,
}

/// Data points that can accompany any event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonEventProperties {
    /// Context entities. `None` means "no context", which is not the same as
    /// an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<SelfDescribingJson>>,
}

impl CommonEventProperties {
    pub fn with_context(context: Vec<SelfDescribingJson>) -> Self {
        Self {
            context: Some(context),
        }
    }
}

/// A fully resolved event, ready for payload building. Borrows the caller's
/// event for the duration of one tracking call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    PageView(&'a PageView),
    ScreenView(&'a ScreenView),
    Structured(&'a StructuredEvent),
    SelfDescribing(&'a SelfDescribingEvent),
    WebView(&'a WebViewEvent),
}

impl Event<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PageView(_) => EventKind::PageView,
            Self::ScreenView(_) => EventKind::ScreenView,
            Self::Structured(_) => EventKind::Structured,
            Self::SelfDescribing(_) => EventKind::SelfDescribing,
            Self::WebView(_) => EventKind::WebView,
        }
    }
}

/// The five tracking entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    PageView,
    ScreenView,
    Structured,
    SelfDescribing,
    WebView,
}

impl EventKind {
    /// Name carried in the envelope `command` field.
    pub fn command(&self) -> &'static str {
        match self {
            Self::PageView => "trackPageView",
            Self::ScreenView => "trackScreenView",
            Self::Structured => "trackStructEvent",
            Self::SelfDescribing => "trackSelfDescribingEvent",
            Self::WebView => "trackWebViewEvent",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command())
    }
}

/// Host messaging channels the bridge knows how to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelId {
    /// Android `SnowplowWebInterface`: one method per event kind.
    WebInterface,
    /// Android `SnowplowWebInterfaceV2`: single `trackWebViewEvent`.
    WebInterfaceV2,
    /// iOS `webkit.messageHandlers.snowplow`: structured envelope.
    WebkitHandler,
    /// iOS `webkit.messageHandlers.snowplowV2`: pre-serialized fields.
    WebkitHandlerV2,
    /// `ReactNativeWebView.postMessage(string)`.
    ReactNative,
    /// `FlutterSnowplowChannel.postMessage(string)`.
    Flutter,
}

impl ChannelId {
    pub const ALL: [ChannelId; 6] = [
        Self::WebInterface,
        Self::WebInterfaceV2,
        Self::WebkitHandler,
        Self::WebkitHandlerV2,
        Self::ReactNative,
        Self::Flutter,
    ];

    /// Channels whose presence means a current-generation mobile tracker
    /// is listening. The v1 channels and Flutter are intentionally absent.
    pub const MOBILE_INTERFACES: [ChannelId; 3] =
        [Self::WebInterfaceV2, Self::WebkitHandlerV2, Self::ReactNative];

    pub fn name(&self) -> &'static str {
        match self {
            Self::WebInterface => "web-interface",
            Self::WebInterfaceV2 => "web-interface-v2",
            Self::WebkitHandler => "webkit-handler",
            Self::WebkitHandlerV2 => "webkit-handler-v2",
            Self::ReactNative => "react-native",
            Self::Flutter => "flutter",
        }
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Writes integral floats the way a JavaScript host would (`0`, not `0.0`).
///
/// Whole numbers are written as integers up to the `u64` range. Beyond 2^64
/// they fall back to exponent form, which parses to the same value.
pub mod js_number {
    use serde::Serializer;

    // 2^63 and 2^64, the exclusive upper bounds of i64 and u64.
    const I64_END: f64 = 9_223_372_036_854_775_808.0;
    const U64_END: f64 = 18_446_744_073_709_551_616.0;

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serialize_f64(*v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn serialize_f64<S: Serializer>(v: f64, serializer: S) -> Result<S::Ok, S::Error> {
        if !v.is_finite() || v.fract() != 0.0 {
            serializer.serialize_f64(v)
        } else if (-I64_END..I64_END).contains(&v) {
            serializer.serialize_i64(v as i64)
        } else if (0.0..U64_END).contains(&v) {
            serializer.serialize_u64(v as u64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explicit_title_wins_even_when_empty() {
        let resolved = PageViewEvent::titled("").resolve(
            "https://example.com/".into(),
            "Document".into(),
            "https://ref.example/".into(),
        );
        assert_eq!(resolved.title, "");
    }

    #[test]
    fn missing_title_falls_back_to_document() {
        let resolved = PageViewEvent::default().resolve(
            "https://example.com/".into(),
            "Document".into(),
            String::new(),
        );
        assert_eq!(resolved.title, "Document");
        assert_eq!(resolved.referrer, "");
    }

    #[test]
    fn structured_event_omits_absent_fields_and_keeps_zero() {
        let event = StructuredEvent {
            value: Some(0.0),
            ..StructuredEvent::new("media", "play")
        };
        let encoded = serde_json::to_value(&event).unwrap();
        assert_eq!(encoded, json!({"category": "media", "action": "play", "value": 0}));
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"category":"media","action":"play","value":0}"#
        );
    }

    #[test]
    fn fractional_values_stay_fractional() {
        let event = StructuredEvent {
            value: Some(2.5),
            ..StructuredEvent::new("c", "a")
        };
        assert!(serde_json::to_string(&event).unwrap().ends_with(r#""value":2.5}"#));
    }

    #[test]
    fn screen_view_uses_wire_names() {
        let view = ScreenView {
            screen_type: Some("feed".into()),
            previous_name: Some("home".into()),
            ..ScreenView::new("timeline")
        };
        let encoded = serde_json::to_value(&view).unwrap();
        assert_eq!(encoded["type"], "feed");
        assert_eq!(encoded["previousName"], "home");
        assert!(encoded.get("transitionType").is_none());
        assert!(Uuid::parse_str(&view.id).is_ok());
    }

    #[test]
    fn atomic_properties_are_camel_case() {
        let props = AtomicProperties {
            event_name: Some("pp".into()),
            ping_x_offset_min: Some(0.0),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&props).unwrap(),
            json!({"eventName": "pp", "pingXOffsetMin": 0})
        );
    }

    #[test]
    fn fractional_ping_offsets_round_trip() {
        let props: AtomicProperties =
            serde_json::from_str(r#"{"eventName":"pp","pingXOffsetMin":12.5,"pingYOffsetMax":40}"#)
                .unwrap();
        assert_eq!(props.ping_x_offset_min, Some(12.5));
        assert_eq!(props.ping_y_offset_max, Some(40.0));
        assert_eq!(
            serde_json::to_string(&props).unwrap(),
            r#"{"eventName":"pp","pingXOffsetMin":12.5,"pingYOffsetMax":40}"#
        );
    }

    #[test]
    fn large_whole_numbers_are_written_as_integers() {
        let big = StructuredEvent {
            value: Some(1e19),
            ..StructuredEvent::new("c", "a")
        };
        assert!(serde_json::to_string(&big).unwrap().ends_with(r#""value":10000000000000000000}"#));

        let negative = StructuredEvent {
            value: Some(-4_611_686_018_427_387_904.0),
            ..StructuredEvent::new("c", "a")
        };
        assert_eq!(
            serde_json::to_value(&negative).unwrap()["value"],
            json!(-4_611_686_018_427_387_904i64)
        );
    }

    #[test]
    fn commands_match_entry_points() {
        assert_eq!(EventKind::Structured.command(), "trackStructEvent");
        assert_eq!(EventKind::WebView.to_string(), "trackWebViewEvent");
        let sd = SelfDescribingEvent::new("iglu:x", json!({}));
        assert_eq!(Event::SelfDescribing(&sd).kind(), EventKind::SelfDescribing);
    }

    #[test]
    fn event_borrows_the_callers_value() {
        let view = ScreenView::new("home");
        let event = Event::ScreenView(&view);
        let copy = event;
        let Event::ScreenView(borrowed) = copy else {
            panic!("expected a screen view");
        };
        assert!(std::ptr::eq(borrowed, &view));
        assert_eq!(event, copy);
    }
}
