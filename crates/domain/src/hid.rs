//! Stable hardware identifier derivation.
//!
//! Clients present a free-form `uid` string; the cloud addresses them by a
//! stable hex identifier. A handful of identifiers predate the hashing
//! scheme and are pinned to their historical values so existing hardware
//! keeps its registration.

use sha1::{Digest, Sha1};
use tracing::{info, warn};

/// Gateway uid assigned before the hashing scheme existed.
const LEGACY_GATEWAY_UID: &str = "smartfeeder-795ae773737d";
const LEGACY_GATEWAY_HID: &str = "6ec68eb4db216f61822a9aa4333d9824ae7d1abc";

/// Device uid assigned before the hashing scheme existed.
const LEGACY_DEVICE_UID: &str = "smartfeeder-795ae773737d-prod";
const LEGACY_DEVICE_HID: &str = "e954822c15b4e7a0c23a92b73edc1280722c3b34";

fn sha1_hex(uid: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(uid.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derive the stable hardware identifier for a gateway uid.
///
/// Deterministic and total: any input, including the empty string, maps to
/// the same output on every call.
pub fn derive_gateway_hid(uid: &str) -> String {
    if uid == LEGACY_GATEWAY_UID {
        return LEGACY_GATEWAY_HID.to_string();
    }
    warn!("seeing unknown feeder uid: {uid}");
    sha1_hex(uid)
}

/// Derive the stable hardware identifier for a device uid.
pub fn derive_device_hid(uid: &str) -> String {
    if uid == LEGACY_DEVICE_UID {
        return LEGACY_DEVICE_HID.to_string();
    }
    info!("generating based on incoming uid: {uid}");
    sha1_hex(uid)
}
