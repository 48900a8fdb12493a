// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::types::ChannelId;

/// Where each channel lives in the host's global object graph.
///
/// Each path is a list of property names walked from the global scope, e.g.
/// `["webkit", "messageHandlers", "snowplow"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelPaths {
    pub web_interface: Vec<String>,
    pub web_interface_v2: Vec<String>,
    pub webkit_handler: Vec<String>,
    pub webkit_handler_v2: Vec<String>,
    pub react_native: Vec<String>,
    pub flutter: Vec<String>,
}

impl ChannelPaths {
    pub fn get(&self, channel: ChannelId) -> &[String] {
        match channel {
            ChannelId::WebInterface => &self.web_interface,
            ChannelId::WebInterfaceV2 => &self.web_interface_v2,
            ChannelId::WebkitHandler => &self.webkit_handler,
            ChannelId::WebkitHandlerV2 => &self.webkit_handler_v2,
            ChannelId::ReactNative => &self.react_native,
            ChannelId::Flutter => &self.flutter,
        }
    }
}

fn path(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for ChannelPaths {
    fn default() -> Self {
        Self {
            web_interface: path(&["SnowplowWebInterface"]),
            web_interface_v2: path(&["SnowplowWebInterfaceV2"]),
            webkit_handler: path(&["webkit", "messageHandlers", "snowplow"]),
            webkit_handler_v2: path(&["webkit", "messageHandlers", "snowplowV2"]),
            react_native: path(&["ReactNativeWebView"]),
            flutter: path(&["FlutterSnowplowChannel"]),
        }
    }
}

/// Bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// Global property paths used when resolving channels from a host object.
    pub channel_paths: ChannelPaths,
    /// Channels the bridge may send to. A channel left out here is treated as
    /// absent even if the host provides it.
    pub enabled_channels: Vec<ChannelId>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel_paths: ChannelPaths::default(),
            enabled_channels: ChannelId::ALL.to_vec(),
        }
    }
}

impl BridgeConfig {
    /// Parse and validate a JSON configuration document. Missing keys take
    /// their default values.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for channel in ChannelId::ALL {
            let segments = self.channel_paths.get(channel);
            if segments.is_empty() {
                return Err(BridgeError::InvalidConfig(format!(
                    "{channel} has an empty global path"
                )));
            }
            if segments.iter().any(|s| s.is_empty()) {
                return Err(BridgeError::InvalidConfig(format!(
                    "{channel} path contains an empty segment"
                )));
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self, channel: ChannelId) -> bool {
        self.enabled_channels.contains(&channel)
    }
}
