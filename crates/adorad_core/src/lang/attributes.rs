//! Function attribute vocabulary.
//!
//! Attributes are written as a bracket-wrapped identifier before a function, e.g. `[comptime]`. This registry
//! centralizes the recognized names so the parser can warn on unknown ones without string comparisons elsewhere.

use super::registry::{Since, Stability};

/// Stable identifier for recognized attributes.
///
/// `Ord` is derived so modifier sets iterate in a deterministic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeId {
    Comptime,
    Inline,
    NoInline,
    NoReturn,
    Likely,
    Unlikely,
}

/// Metadata entry for an attribute.
#[derive(Debug, Clone, Copy)]
pub struct AttributeInfo {
    pub id: AttributeId,
    pub canonical: &'static str,
    pub description: &'static str,
    pub since: Since,
    pub stability: Stability,
}

/// Registry of recognized attributes.
pub const ATTRIBUTES: &[AttributeInfo] = &[
    info(
        AttributeId::Comptime,
        "comptime",
        "Evaluate the function at compile time only.",
        Stability::Draft,
    ),
    info(
        AttributeId::Inline,
        "inline",
        "Hint that calls should be inlined.",
        Stability::Stable,
    ),
    info(
        AttributeId::NoInline,
        "noinline",
        "Forbid inlining of the function.",
        Stability::Stable,
    ),
    info(
        AttributeId::NoReturn,
        "noreturn",
        "The function never returns to its caller.",
        Stability::Stable,
    ),
    info(
        AttributeId::Likely,
        "likely",
        "Hint that calls to the function are on the hot path.",
        Stability::Draft,
    ),
    info(
        AttributeId::Unlikely,
        "unlikely",
        "Hint that calls to the function are on a cold path.",
        Stability::Draft,
    ),
];

/// Canonical spelling.
pub fn as_str(id: AttributeId) -> &'static str {
    info_for(id).canonical
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: AttributeId) -> &'static AttributeInfo {
    ATTRIBUTES.iter().find(|a| a.id == id).expect("attribute info missing")
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<AttributeId> {
    ATTRIBUTES.iter().find(|a| a.canonical == s).map(|a| a.id)
}

const fn info(id: AttributeId, canonical: &'static str, description: &'static str, stability: Stability) -> AttributeInfo {
    AttributeInfo {
        id,
        canonical,
        description,
        since: Since(0, 1),
        stability,
    }
}
