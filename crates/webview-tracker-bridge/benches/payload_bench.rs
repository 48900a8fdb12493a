// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for per-channel payload encoding and the full fan-out
// in the webview-tracker-bridge crate.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use webview_tracker_bridge::payload::{envelope_text, legacy_call, web_view_call};
use webview_tracker_bridge::stub::StaticPage;
use webview_tracker_bridge::{Channel, ChannelRegistry, Payload, TrackRequest, WebViewTracker};
use webview_tracker_core::error::Result;
use webview_tracker_core::types::{
    AtomicProperties, ChannelId, CommonEventProperties, Event, SelfDescribingEvent,
    SelfDescribingJson, StructuredEvent, WebViewEvent,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn context(entities: usize) -> Vec<SelfDescribingJson> {
    (0..entities)
        .map(|i| {
            SelfDescribingJson::new(
                "iglu:com.acme/entity/jsonschema/1-0-0",
                json!({"index": i, "label": format!("entity-{i}")}),
            )
        })
        .collect()
}

fn self_describing() -> SelfDescribingEvent {
    SelfDescribingEvent::new(
        "iglu:com.acme/add_to_cart/jsonschema/1-0-0",
        json!({"sku": "A-1", "quantity": 2, "price": 19.99}),
    )
}

/// Accepts and drops everything, so the fan-out cost is pure encoding.
struct NullChannel;

impl Channel for NullChannel {
    fn send(&self, payload: &Payload) -> Result<()> {
        black_box(payload);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Encode one self-describing event for each shape, with 0, 5 and 50 context
/// entities attached.
fn bench_encoders(c: &mut Criterion) {
    let event = self_describing();
    let mut group = c.benchmark_group("encode_self_describing");
    for entities in [0usize, 5, 50] {
        let ctx = context(entities);
        let request = TrackRequest::new(Event::SelfDescribing(&event), Some(ctx.as_slice()), None);

        group.bench_function(format!("legacy ({entities} entities)"), |b| {
            b.iter(|| black_box(legacy_call(black_box(&request)).expect("encode")));
        });
        group.bench_function(format!("envelope text ({entities} entities)"), |b| {
            b.iter(|| black_box(envelope_text(black_box(&request)).expect("encode")));
        });
    }
    group.finish();

    let web_view = WebViewEvent {
        properties: AtomicProperties {
            event_name: Some("se".into()),
            category: Some("media".into()),
            action: Some("play".into()),
            value: Some(0.0),
            ..Default::default()
        },
        event: None,
    };
    let request = TrackRequest::new(Event::WebView(&web_view), None, None);
    c.bench_function("encode_web_view_call", |b| {
        b.iter(|| black_box(web_view_call(black_box(&request)).expect("encode")));
    });
}

/// Full fan-out of a structured event to all four classic channels.
fn bench_fan_out(c: &mut Criterion) {
    let mut registry = ChannelRegistry::new();
    for id in [
        ChannelId::WebInterface,
        ChannelId::WebkitHandler,
        ChannelId::ReactNative,
        ChannelId::Flutter,
    ] {
        registry.register(id, Arc::new(NullChannel));
    }
    let page = Arc::new(StaticPage::new("https://bench.example/", "Bench", ""));
    let tracker = WebViewTracker::new(registry, page);
    let event = StructuredEvent::new("media", "play");
    let common = CommonEventProperties::with_context(context(5));

    c.bench_function("fan_out_struct_event (4 channels)", |b| {
        b.iter(|| {
            tracker
                .track_struct_event(black_box(&event), &common, None)
                .expect("dispatch");
        });
    });
}

criterion_group!(benches, bench_encoders, bench_fan_out);
criterion_main!(benches);
