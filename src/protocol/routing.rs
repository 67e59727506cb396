//! Discriminator lookup tables

use crate::types::{Category, JsonValue};
use serde::{Deserialize, Serialize};

/// Where the body of an outgoing message lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentBody {
    /// `params.body`
    ParamsBody,
    /// `params`
    Params,
}

impl SentBody {
    /// Locate the body inside a message
    pub fn locate(self, message: &JsonValue) -> Option<&JsonValue> {
        let params = message.get("params")?;
        match self {
            SentBody::ParamsBody => params.get("body"),
            SentBody::Params => Some(params),
        }
    }
}

/// What to do with a message, by opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeAction {
    /// Entity state update, routed by key
    Object,
    /// Outgoing action, fingerprinted
    Sent(SentBody),
    /// Known, carries nothing of interest
    Ignore,
}

const OPCODE_TABLE: &[(&str, OpcodeAction)] = &[
    ("object", OpcodeAction::Object),
    ("client/send", OpcodeAction::Sent(SentBody::ParamsBody)),
    ("text/update", OpcodeAction::Sent(SentBody::Params)),
    ("object/update", OpcodeAction::Sent(SentBody::Params)),
    ("client/welcome", OpcodeAction::Ignore),
    ("room/lock", OpcodeAction::Ignore),
    ("room/exit", OpcodeAction::Ignore),
    ("ok", OpcodeAction::Ignore),
    ("text", OpcodeAction::Ignore),
    ("drop", OpcodeAction::Ignore),
];

/// Look up an opcode; `None` means unhandled
pub fn lookup_opcode(opcode: &str) -> Option<OpcodeAction> {
    OPCODE_TABLE
        .iter()
        .find(|(name, _)| *name == opcode)
        .map(|(_, action)| *action)
}

/// Entity keys that are known and carry no model data
const IGNORED_KEYS: &[&str] = &[
    "textDescriptions",
    "connectedPlayers",
    "roundInfo",
    "horseRaceInfo",
];

/// Result of routing an `object` message key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRoute {
    Category(Category),
    /// Known or per-entity key that is not modelled (`action:<id>` etc.)
    Ignored,
    Unhandled,
}

/// Route an entity key to a category
pub fn route_key(key: &str) -> KeyRoute {
    if key == "bc:room" || key == "room" {
        KeyRoute::Category(Category::Room)
    } else if key.starts_with("bc:customer:") || key.starts_with("player:") {
        KeyRoute::Category(Category::Player)
    } else if key.contains(':') || IGNORED_KEYS.contains(&key) {
        KeyRoute::Ignored
    } else {
        KeyRoute::Unhandled
    }
}

/// Protocol generation a capture was recorded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Older protocol, `bc:` prefixed keys
    Blobcast,
    /// Newer protocol
    Ecast,
}

impl Dialect {
    /// Dialect implied by a category key
    pub fn from_key(key: &str) -> Self {
        if key.starts_with("bc:") {
            Dialect::Blobcast
        } else {
            Dialect::Ecast
        }
    }

    /// Base class generated clients derive from
    pub fn client_base_class(self) -> &'static str {
        match self {
            Dialect::Blobcast => "BcSerializedClient",
            Dialect::Ecast => "PlayerSerializedClient",
        }
    }
}
