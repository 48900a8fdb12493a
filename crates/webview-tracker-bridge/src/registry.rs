// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Channel detection.
//
// A `ChannelRegistry` holds whichever channels the host injected. Whether a
// channel is reachable is decided per query: it must be registered and
// report itself available at that moment. Nothing is cached.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace};

use webview_tracker_core::config::BridgeConfig;
use webview_tracker_core::types::ChannelId;

use crate::traits::Channel;

// ---------------------------------------------------------------------------
// Host object graph
// ---------------------------------------------------------------------------

/// A value hanging off the host's global scope.
#[derive(Clone)]
pub enum HostValue {
    Object(HostObject),
    Channel(Arc<dyn Channel>),
}

/// Model of the host's global object: named properties that are either
/// nested objects or channel endpoints, e.g. `webkit.messageHandlers.snowplow`.
#[derive(Clone, Default)]
pub struct HostObject {
    properties: BTreeMap<String, HostValue>,
}

impl HostObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `channel` at `path`, creating intermediate objects as needed.
    /// Anything already on the path that is not an object is replaced.
    pub fn insert(&mut self, path: &[&str], channel: Arc<dyn Channel>) {
        let Some((leaf, parents)) = path.split_last() else {
            return;
        };

        let mut node = self;
        for name in parents {
            let slot = node
                .properties
                .entry((*name).to_owned())
                .or_insert_with(|| HostValue::Object(HostObject::new()));
            if let HostValue::Channel(_) = slot {
                *slot = HostValue::Object(HostObject::new());
            }
            let HostValue::Object(object) = slot else {
                return;
            };
            node = object;
        }
        node.properties
            .insert((*leaf).to_owned(), HostValue::Channel(channel));
    }

    pub fn with_channel(mut self, path: &[&str], channel: Arc<dyn Channel>) -> Self {
        self.insert(path, channel);
        self
    }

    /// Set a plain property to an object, e.g. a `webkit` global that has no
    /// message handlers yet.
    pub fn with_object(mut self, name: &str, object: HostObject) -> Self {
        self.properties
            .insert(name.to_owned(), HostValue::Object(object));
        self
    }

    /// Walk `path` from this object. Any missing or non-object intermediate,
    /// or a leaf that is not a channel, yields `None`.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<Arc<dyn Channel>> {
        let (leaf, parents) = path.split_last()?;

        let mut node = self;
        for name in parents {
            match node.properties.get(name.as_ref())? {
                HostValue::Object(object) => node = object,
                HostValue::Channel(_) => return None,
            }
        }
        match node.properties.get(leaf.as_ref())? {
            HostValue::Channel(channel) => Some(Arc::clone(channel)),
            HostValue::Object(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The set of channels the host provides, keyed by channel id.
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    channels: BTreeMap<ChannelId, Arc<dyn Channel>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every enabled channel from the host globals using the
    /// configured property paths.
    pub fn from_host(host: &HostObject, config: &BridgeConfig) -> Self {
        let mut registry = Self::new();
        for id in ChannelId::ALL {
            if !config.is_enabled(id) {
                trace!(channel = %id, "channel disabled by configuration");
                continue;
            }
            let path = config.channel_paths.get(id);
            match host.lookup(path) {
                Some(channel) => {
                    debug!(channel = %id, path = %path.join("."), "host channel found");
                    registry.register(id, channel);
                }
                None => trace!(channel = %id, path = %path.join("."), "host channel not present"),
            }
        }
        registry
    }

    /// Register `channel` under `id`, returning whatever it replaced.
    pub fn register(&mut self, id: ChannelId, channel: Arc<dyn Channel>) -> Option<Arc<dyn Channel>> {
        self.channels.insert(id, channel)
    }

    pub fn with(mut self, id: ChannelId, channel: Arc<dyn Channel>) -> Self {
        self.register(id, channel);
        self
    }

    pub fn unregister(&mut self, id: ChannelId) -> Option<Arc<dyn Channel>> {
        self.channels.remove(&id)
    }

    /// The channel for `id` if it is registered and currently available.
    pub fn detect(&self, id: ChannelId) -> Option<&dyn Channel> {
        self.channels
            .get(&id)
            .map(|channel| channel.as_ref())
            .filter(|channel| channel.is_available())
    }

    pub fn is_reachable(&self, id: ChannelId) -> bool {
        self.detect(id).is_some()
    }

    /// Every channel reachable right now, in `ChannelId` order.
    pub fn reachable(&self) -> Vec<ChannelId> {
        ChannelId::ALL
            .into_iter()
            .filter(|id| self.is_reachable(*id))
            .collect()
    }

    /// True iff a current-generation mobile tracker is listening: the v2
    /// Android interface, the v2 webkit handler, or React Native.
    ///
    /// The v1 channels and Flutter still receive events but do not count.
    pub fn has_mobile_interface(&self) -> bool {
        ChannelId::MOBILE_INTERFACES
            .into_iter()
            .any(|id| self.is_reachable(id))
    }
}

impl std::fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelRegistry")
            .field("registered", &self.channels.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::RecordingChannel;

    fn recorder(id: ChannelId) -> Arc<RecordingChannel> {
        Arc::new(RecordingChannel::new(id))
    }

    #[test]
    fn empty_registry_reaches_nothing() {
        let registry = ChannelRegistry::new();
        assert!(registry.reachable().is_empty());
        assert!(!registry.has_mobile_interface());
    }

    #[test]
    fn detection_follows_availability() {
        let rn = recorder(ChannelId::ReactNative);
        let registry = ChannelRegistry::new().with(ChannelId::ReactNative, rn.clone());
        assert!(registry.is_reachable(ChannelId::ReactNative));

        rn.set_available(false);
        assert!(!registry.is_reachable(ChannelId::ReactNative));
        assert!(!registry.has_mobile_interface());

        rn.set_available(true);
        assert!(registry.has_mobile_interface());
    }

    #[test]
    fn mobile_interface_ignores_legacy_and_flutter() {
        let registry = ChannelRegistry::new()
            .with(ChannelId::WebInterface, recorder(ChannelId::WebInterface))
            .with(ChannelId::WebkitHandler, recorder(ChannelId::WebkitHandler))
            .with(ChannelId::Flutter, recorder(ChannelId::Flutter));
        assert_eq!(registry.reachable().len(), 3);
        assert!(!registry.has_mobile_interface());
    }

    #[test]
    fn each_v2_channel_counts_as_mobile() {
        for id in ChannelId::MOBILE_INTERFACES {
            let registry = ChannelRegistry::new().with(id, recorder(id));
            assert!(registry.has_mobile_interface(), "{id} should count");
        }
    }

    #[test]
    fn host_lookup_tolerates_missing_levels() {
        let config = BridgeConfig::default();

        // `webkit` exists but has no `messageHandlers`.
        let host = HostObject::new().with_object("webkit", HostObject::new());
        let registry = ChannelRegistry::from_host(&host, &config);
        assert!(!registry.is_reachable(ChannelId::WebkitHandler));

        // `messageHandlers` exists but only carries the v1 handler.
        let host = HostObject::new().with_channel(
            &["webkit", "messageHandlers", "snowplow"],
            recorder(ChannelId::WebkitHandler),
        );
        let registry = ChannelRegistry::from_host(&host, &config);
        assert_eq!(registry.reachable(), [ChannelId::WebkitHandler]);
        assert!(!registry.has_mobile_interface());
    }

    #[test]
    fn host_lookup_rejects_channel_used_as_namespace() {
        let host = HostObject::new().with_channel(&["webkit"], recorder(ChannelId::WebkitHandler));
        assert!(host.lookup(&["webkit", "messageHandlers", "snowplow"]).is_none());
        assert!(host.lookup::<&str>(&[]).is_none());
    }

    #[test]
    fn host_resolution_uses_configured_paths_and_switches() {
        let host = HostObject::new()
            .with_channel(&["SnowplowWebInterfaceV2"], recorder(ChannelId::WebInterfaceV2))
            .with_channel(&["ReactNativeWebView"], recorder(ChannelId::ReactNative))
            .with_channel(&["MyFlutter"], recorder(ChannelId::Flutter));

        let mut config = BridgeConfig::default();
        config.channel_paths.flutter = vec!["MyFlutter".into()];
        config.enabled_channels.retain(|id| *id != ChannelId::ReactNative);

        let registry = ChannelRegistry::from_host(&host, &config);
        assert_eq!(
            registry.reachable(),
            [ChannelId::WebInterfaceV2, ChannelId::Flutter]
        );
    }

    #[test]
    fn insert_replaces_leaf_in_the_way() {
        let mut host = HostObject::new().with_channel(&["webkit"], recorder(ChannelId::WebkitHandler));
        host.insert(
            &["webkit", "messageHandlers", "snowplowV2"],
            recorder(ChannelId::WebkitHandlerV2),
        );
        assert!(host.lookup(&["webkit", "messageHandlers", "snowplowV2"]).is_some());
        assert!(host.lookup(&["webkit"]).is_none());
    }

    #[test]
    fn insert_reuses_existing_objects() {
        let mut host = HostObject::new().with_channel(
            &["webkit", "messageHandlers", "snowplow"],
            recorder(ChannelId::WebkitHandler),
        );
        host.insert(
            &["webkit", "messageHandlers", "snowplowV2"],
            recorder(ChannelId::WebkitHandlerV2),
        );
        assert!(host.lookup(&["webkit", "messageHandlers", "snowplow"]).is_some());
        assert!(host.lookup(&["webkit", "messageHandlers", "snowplowV2"]).is_some());
    }
}
