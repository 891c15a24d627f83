#![forbid(unsafe_code)]

//! JSON input parser for host-encoded DOM events.
//!
//! [`parse_host_input`] accepts one JSON object written by the page glue and
//! returns the matching [`PickerInput`]. Event kinds the picker does not
//! consume (pointer moves, keyboard, focus) return `Ok(None)`.
//!
//! ```json
//! {"kind":"mutation","tokens":[{"element":1,"id":"x1"},{"element":2,"disabled":true}]}
//! {"kind":"dragstart","element":1}
//! {"kind":"dragover","zone":7}
//! {"kind":"drop","zone":7,"data":"x1"}
//! {"kind":"tap","target":"token","element":3}
//! {"kind":"tap","target":"outside"}
//! {"kind":"tick","now_ms":300}
//! ```
//!
//! # Design
//!
//! The parser keeps the picker free of `serde` in its default build; it is
//! feature-gated behind `input-parser`.

use core::time::Duration;

use serde::Deserialize;
use varpick_core::{ElementId, TokenElement};

use crate::dispatch::{PickerInput, TapTarget};

/// Errors from parsing encoded host input JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Unknown tap target value.
    UnknownTarget(String),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownTarget(target) => write!(f, "unknown tap target: {target}"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    element: Option<u32>,
    #[serde(default)]
    zone: Option<u32>,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    tokens: Option<Vec<RawToken>>,
    #[serde(default)]
    now_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawToken {
    element: u32,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    disabled: bool,
}

impl From<RawToken> for TokenElement {
    fn from(raw: RawToken) -> Self {
        Self {
            element: ElementId::new(raw.element),
            id: raw.id,
            disabled: raw.disabled,
        }
    }
}

/// Parse one JSON-encoded host event into a [`PickerInput`].
///
/// Returns `Ok(None)` for event kinds the picker has no use for.
///
/// Returns `Err` for malformed JSON, missing required fields, or an unknown
/// tap target.
pub fn parse_host_input(json: &str) -> Result<Option<PickerInput>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    let input = match raw.kind.as_str() {
        "mutation" => PickerInput::Mutation {
            tokens: raw
                .tokens
                .ok_or(InputParseError::MissingField("tokens"))?
                .into_iter()
                .map(TokenElement::from)
                .collect(),
        },
        "dragstart" => PickerInput::DragStart {
            token: element(&raw)?,
        },
        "dragend" => PickerInput::DragEnd {
            token: element(&raw)?,
        },
        "dragenter" => PickerInput::DragEnter { zone: zone(&raw)? },
        "dragover" => PickerInput::DragOver { zone: zone(&raw)? },
        "dragleave" => PickerInput::DragLeave { zone: zone(&raw)? },
        "drop" => PickerInput::Drop {
            zone: zone(&raw)?,
            data: raw.data,
        },
        "tap" => PickerInput::Tap {
            target: parse_tap_target(&raw)?,
        },
        "tick" => PickerInput::Tick {
            now: Duration::from_millis(raw.now_ms.ok_or(InputParseError::MissingField("now_ms"))?),
        },
        _ => return Ok(None),
    };
    Ok(Some(input))
}

fn element(raw: &RawInput) -> Result<ElementId, InputParseError> {
    raw.element
        .map(ElementId::new)
        .ok_or(InputParseError::MissingField("element"))
}

fn zone(raw: &RawInput) -> Result<ElementId, InputParseError> {
    raw.zone
        .map(ElementId::new)
        .ok_or(InputParseError::MissingField("zone"))
}

fn parse_tap_target(raw: &RawInput) -> Result<TapTarget, InputParseError> {
    match raw.target.as_deref() {
        None => Err(InputParseError::MissingField("target")),
        Some("token") => element(raw).map(TapTarget::Token),
        // Zone taps name the zone through `element`, like token taps.
        Some("zone") => raw
            .element
            .or(raw.zone)
            .map(|id| TapTarget::Zone(ElementId::new(id)))
            .ok_or(InputParseError::MissingField("element")),
        Some("outside" | "document") => Ok(TapTarget::Outside),
        Some(other) => Err(InputParseError::UnknownTarget(other.to_owned())),
    }
}
