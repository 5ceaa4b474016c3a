//! Canned attribute values used by the synthetic feeds.
//!
//! Generated records vary only in identifier, service name, and mechanism.
//! Everything else comes from these fixtures so that downstream consumers see
//! stable, recognizable payloads.

use std::collections::BTreeMap;

/// Transport-medium tag stamped on every generated cross-connect.
pub const PAYLOAD: &str = "Ethernet";

/// Manager owning the sender side of a cross-manager pair.
pub const SOURCE_MANAGER: &str = "meshd-0";

/// Manager owning the receiver side of a cross-manager pair.
pub const DESTINATION_MANAGER: &str = "meshd-1";

/// Exclusive upper bound for randomly drawn service names.
///
/// Names are the lowercase hex rendering of a draw from
/// `0..SERVICE_NAME_SPACE`.
pub const SERVICE_NAME_SPACE: u32 = 0x10_0000;

/// Parameter entries attached to every generated connection record.
pub const PARAMETER_ENTRIES: [(&str, &str); 2] =
    [("para_key1", "para_val1"), ("para_key2", "para_val2")];

/// Context entries attached to every generated connection record.
pub const CONTEXT_ENTRIES: [(&str, &str); 2] = [("ctx_key1", "ctx_val1"), ("ctx_key2", "ctx_val2")];

/// Label entries attached to every generated connection record.
pub const LABEL_ENTRIES: [(&str, &str); 2] = [("lbl_key1", "lbl_val1"), ("lbl_key2", "lbl_val2")];

/// Builds an owned string map from borrowed pairs.
#[must_use]
pub fn map_of(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries.iter().map(|&(key, value)| (key.to_owned(), value.to_owned())).collect()
}

/// Full parameter map for a generated record.
#[must_use]
pub fn parameters() -> BTreeMap<String, String> {
    map_of(&PARAMETER_ENTRIES)
}

/// Full context map for a generated record.
#[must_use]
pub fn context() -> BTreeMap<String, String> {
    map_of(&CONTEXT_ENTRIES)
}

/// Full label map for a generated record.
#[must_use]
pub fn labels() -> BTreeMap<String, String> {
    map_of(&LABEL_ENTRIES)
}

/// Parameter map carrying a single interface inode, used by the fixed-pair
/// feed.
#[must_use]
pub fn inode_parameters(inode: &str) -> BTreeMap<String, String> {
    map_of(&[("inode", inode)])
}
