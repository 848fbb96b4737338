//! Embedded shortcut inspection.
//!
//! A `longUrl` to be shortened carries a shortcut record after an `import/`
//! marker, as standard (padded) base64 of a JSON object:
//!
//! ```text
//! https://maps.example/import/eyJ0eXBlIjoiU2hvcnRjdXRMb2NhdGlvbiIs...
//!                             └─ base64({"type": "ShortcutLocation", ...})
//! ```
//!
//! The record is closed-schema: its `type` fixes the exact key set.
//!
//! | type               | keys                                                             |
//! |--------------------|------------------------------------------------------------------|
//! | `ShortcutLocation` | type, id, name, waypoint                                         |
//! | `ShortcutRoute`    | type, id, name, waypoints, routeTimeText, routeLengthText        |

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};

use crate::error::Rejection;

/// Marker preceding the encoded payload.
pub const IMPORT_MARKER: &str = "import/";

/// The two known shortcut shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKind {
    Location,
    Route,
}

impl ShortcutKind {
    /// Resolve a `type` tag. Exact, case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ShortcutLocation" => Some(Self::Location),
            "ShortcutRoute" => Some(Self::Route),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Location => "ShortcutLocation",
            Self::Route => "ShortcutRoute",
        }
    }

    /// Keys required beyond `type`, `id` and `name`.
    pub fn variant_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Location => &["waypoint"],
            Self::Route => &["waypoints", "routeTimeText", "routeLengthText"],
        }
    }

    /// Total number of keys the record may carry.
    pub fn max_keys(&self) -> usize {
        3 + self.variant_keys().len()
    }
}

impl fmt::Display for ShortcutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutLocation {
    pub id: Value,
    pub name: Value,
    pub waypoint: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutRoute {
    pub id: Value,
    pub name: Value,
    pub waypoints: Value,
    pub route_time_text: Value,
    pub route_length_text: Value,
}

/// A shortcut record that passed schema validation.
///
/// Field values are carried as-is; only their presence is checked.
#[derive(Debug, Clone, PartialEq)]
pub enum Shortcut {
    Location(ShortcutLocation),
    Route(ShortcutRoute),
}

impl Shortcut {
    pub fn kind(&self) -> ShortcutKind {
        match self {
            Self::Location(_) => ShortcutKind::Location,
            Self::Route(_) => ShortcutKind::Route,
        }
    }

    pub fn id(&self) -> &Value {
        match self {
            Self::Location(location) => &location.id,
            Self::Route(route) => &route.id,
        }
    }
}

/// Decode and validate the shortcut embedded in `long_url`.
pub fn inspect(long_url: &str) -> Result<Shortcut, Rejection> {
    let payload = decode_payload(long_url)?;
    check_shortcut(payload)
}

/// Extract the payload after the last `import/` and decode it into a JSON
/// object.
pub fn decode_payload(long_url: &str) -> Result<Map<String, Value>, Rejection> {
    let (_, encoded) = long_url
        .rsplit_once(IMPORT_MARKER)
        .ok_or(Rejection::MissingImportMarker)?;

    if encoded.is_empty() {
        return Err(Rejection::EmptyPayload);
    }

    let decoded = STANDARD.decode(encoded)?;

    match serde_json::from_slice::<Value>(&decoded).map_err(Rejection::InvalidPayloadJson)? {
        Value::Object(map) => Ok(map),
        _ => Err(Rejection::PayloadNotObject),
    }
}

/// Check the common keys, resolve the tag and apply the per-tag closed schema.
pub fn check_shortcut(mut map: Map<String, Value>) -> Result<Shortcut, Rejection> {
    let kind = match map.get("type") {
        None | Some(Value::Null) => return Err(Rejection::MissingType),
        Some(Value::String(tag)) => ShortcutKind::from_tag(tag).ok_or(Rejection::UnknownType)?,
        Some(_) => return Err(Rejection::UnknownType),
    };

    for key in ["id", "name"] {
        if !map.contains_key(key) {
            return Err(Rejection::MissingKey(key));
        }
    }

    if map.len() > kind.max_keys() {
        return Err(Rejection::TooManyKeys {
            kind,
            count: map.len(),
            max: kind.max_keys(),
        });
    }

    for key in kind.variant_keys() {
        if !map.contains_key(*key) {
            return Err(Rejection::MissingKey(*key));
        }
    }

    let mut take = |key: &str| map.remove(key).unwrap_or(Value::Null);

    Ok(match kind {
        ShortcutKind::Location => Shortcut::Location(ShortcutLocation {
            id: take("id"),
            name: take("name"),
            waypoint: take("waypoint"),
        }),
        ShortcutKind::Route => Shortcut::Route(ShortcutRoute {
            id: take("id"),
            name: take("name"),
            waypoints: take("waypoints"),
            route_time_text: take("routeTimeText"),
            route_length_text: take("routeLengthText"),
        }),
    })
}
