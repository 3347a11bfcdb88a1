//! Reference-link token grammar.
//!
//! Game clients embed entity references in chat text as pipe-escaped links,
//! `|c<color>|H<prefix>:<fields>|h[<label>]|h|r`, and operators paste those
//! links straight into admin commands. This module extracts the typed
//! identifier out of a single such token. It is purely syntactic: whether the
//! referenced entity exists is the caller's problem, answered through the
//! world seam.
//!
//! Accepted shapes per token:
//! - a bare unsigned decimal integer (shorthand accepted wherever a link is);
//! - the full pipe-escaped link above;
//! - the undecorated payload `<prefix>:<fields>` (what survives when a client
//!   strips the escapes).
//!
//! Player/creature/game-object references arrive as a single packed 64-bit
//! identifier whose high 16 bits carry the entity kind. [decode_packed_guid]
//! turns that into an explicit [EntityRef] variant and rejects tags outside
//! the three mapped kinds; nothing downstream ever re-packs the integer.
//!
//! A failed parse means "no argument supplied". It is never identifier zero.

use thiserror::Error;

/// On-wire tag for a player character in the packed-identifier high bits.
pub const GUID_TAG_PLAYER: u16 = 0x0000;
/// On-wire tag for a spawned game object.
pub const GUID_TAG_GAME_OBJECT: u16 = 0xF110;
/// On-wire tag for a spawned creature.
pub const GUID_TAG_CREATURE: u16 = 0xF130;

const GUID_LOW_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;

/// A typed entity reference extracted from one token of untrusted text.
///
/// Constructed only by this module's parsers; handlers consume it immediately
/// and never persist it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Player(u64),
    Creature(u64),
    GameObject(u64),
    Spell(u32),
    Item(u32),
    ItemSet(u32),
    Skill(u32),
}

impl EntityRef {
    pub fn kind_name(&self) -> &'static str {
        match self {
            EntityRef::Player(_) => "player",
            EntityRef::Creature(_) => "creature",
            EntityRef::GameObject(_) => "game object",
            EntityRef::Spell(_) => "spell",
            EntityRef::Item(_) => "item",
            EntityRef::ItemSet(_) => "item set",
            EntityRef::Skill(_) => "skill",
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            EntityRef::Player(v) | EntityRef::Creature(v) | EntityRef::GameObject(v) => *v,
            EntityRef::Spell(v)
            | EntityRef::Item(v)
            | EntityRef::ItemSet(v)
            | EntityRef::Skill(v) => u64::from(*v),
        }
    }
}

/// Why a token failed to parse. All recoverable; callers render a
/// bad-argument reply.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("empty token")]
    Empty,
    #[error("unrecognized link prefix '{0}'")]
    UnknownPrefix(String),
    #[error("expected {expected} link, got {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },
    #[error("link has no numeric payload")]
    MissingPayload,
    #[error("numeric value out of range")]
    Overflow,
    #[error("unknown entity tag {tag:#06x} in packed identifier")]
    UnknownTag { tag: u16 },
    #[error("malformed link escape")]
    MalformedEscape,
}

/// The link kinds a simple-id token can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Item,
    ItemSet,
    Skill,
    Spell,
}

impl LinkKind {
    /// Wire prefixes that select this kind. The spell family has three: the
    /// enchant and trade variants carry a spell id in their first field too.
    fn prefixes(self) -> &'static [&'static str] {
        match self {
            LinkKind::Item => &["Hitem"],
            LinkKind::ItemSet => &["Hitemset"],
            LinkKind::Skill => &["Hskill"],
            LinkKind::Spell => &["Hspell", "Henchant", "Htrade"],
        }
    }

    fn label(self) -> &'static str {
        match self {
            LinkKind::Item => "item",
            LinkKind::ItemSet => "item set",
            LinkKind::Skill => "skill",
            LinkKind::Spell => "spell",
        }
    }

    fn make(self, id: u32) -> EntityRef {
        match self {
            LinkKind::Item => EntityRef::Item(id),
            LinkKind::ItemSet => EntityRef::ItemSet(id),
            LinkKind::Skill => EntityRef::Skill(id),
            LinkKind::Spell => EntityRef::Spell(id),
        }
    }

    fn of_prefix(prefix: &str) -> Option<LinkKind> {
        for kind in [
            LinkKind::Item,
            LinkKind::ItemSet,
            LinkKind::Skill,
            LinkKind::Spell,
        ] {
            if kind.prefixes().contains(&prefix) {
                return Some(kind);
            }
        }
        None
    }
}

/// Parse one token as a reference of the `expected` kind.
///
/// Bare decimal integers are accepted as shorthand; otherwise the token must
/// be a link (decorated or undecorated) whose prefix selects `expected`.
pub fn parse_entity_token(token: &str, expected: LinkKind) -> Result<EntityRef, LinkError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(LinkError::Empty);
    }

    if token.bytes().all(|b| b.is_ascii_digit()) {
        let id: u32 = token.parse().map_err(|_| LinkError::Overflow)?;
        return Ok(expected.make(id));
    }

    let payload = strip_link_escape(token)?;
    let (prefix, fields) = match payload.split_once(':') {
        Some((p, f)) => (p, f),
        None => (payload, ""),
    };

    match LinkKind::of_prefix(prefix) {
        Some(kind) if kind == expected => {}
        Some(kind) => {
            return Err(LinkError::WrongKind {
                expected: expected.label(),
                found: kind.label(),
            })
        }
        None => return Err(LinkError::UnknownPrefix(prefix.to_string())),
    }

    let first = fields.split(':').next().unwrap_or("");
    if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LinkError::MissingPayload);
    }
    let id: u32 = first.parse().map_err(|_| LinkError::Overflow)?;
    Ok(expected.make(id))
}

/// Split the leading argument token off `args`.
///
/// A pipe-escaped link stays one token even though its `[label]` usually
/// contains spaces; everything else splits at the first whitespace.
pub fn split_token(args: &str) -> (&str, &str) {
    let trimmed = args.trim_start();
    if trimmed.starts_with('|') {
        if let Some(end) = trimmed.find("|r") {
            let cut = end + 2;
            return (&trimmed[..cut], &trimmed[cut..]);
        }
    }
    match trimmed.split_once(|c: char| c.is_whitespace()) {
        Some((first, rest)) => (first, rest),
        None => (trimmed, ""),
    }
}

/// Parse a simple-id token and hand back the bare identifier. Most call
/// sites only want the number; the variant is implied by `expected`.
pub fn parse_simple_id(token: &str, expected: LinkKind) -> Result<u32, LinkError> {
    match parse_entity_token(token, expected)? {
        EntityRef::Item(v) | EntityRef::ItemSet(v) | EntityRef::Skill(v) | EntityRef::Spell(v) => {
            Ok(v)
        }
        other => Err(LinkError::WrongKind {
            expected: expected.label(),
            found: other.kind_name(),
        }),
    }
}

/// Decode a packed 64-bit identifier into the entity kind its reserved high
/// bits name. Tags outside the three mapped kinds are rejected.
pub fn decode_packed_guid(raw: u64) -> Result<EntityRef, LinkError> {
    let tag = (raw >> 48) as u16;
    let low = raw & GUID_LOW_MASK;
    match tag {
        GUID_TAG_PLAYER => Ok(EntityRef::Player(low)),
        GUID_TAG_CREATURE => Ok(EntityRef::Creature(low)),
        GUID_TAG_GAME_OBJECT => Ok(EntityRef::GameObject(low)),
        other => Err(LinkError::UnknownTag { tag: other }),
    }
}

/// Parse a packed identifier token (decimal, or hex with a `0x` prefix) and
/// decode it.
pub fn parse_packed_guid(token: &str) -> Result<EntityRef, LinkError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(LinkError::Empty);
    }
    let raw = if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|_| LinkError::Overflow)?
    } else if token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse().map_err(|_| LinkError::Overflow)?
    } else {
        return Err(LinkError::MissingPayload);
    };
    decode_packed_guid(raw)
}

/// Reduce a pipe-escaped link to its `prefix:fields` payload. Tokens that do
/// not start with `|` pass through untouched.
fn strip_link_escape(token: &str) -> Result<&str, LinkError> {
    if !token.starts_with('|') {
        return Ok(token);
    }
    // |c<8 hex>|H<payload>|h[<label>]|h|r - the color segment is optional in
    // practice, so accept a leading |H as well.
    let mut rest = &token[1..];
    if let Some(after_color) = rest.strip_prefix('c') {
        if after_color.len() < 8 || !after_color[..8].bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(LinkError::MalformedEscape);
        }
        rest = after_color[8..]
            .strip_prefix('|')
            .ok_or(LinkError::MalformedEscape)?;
    }
    if !rest.starts_with('H') {
        return Err(LinkError::MalformedEscape);
    }
    // The payload keeps its leading H: the prefix table matches "Hitem", not
    // "item", so decorated and undecorated tokens reduce identically.
    let end = rest.find('|').ok_or(LinkError::MalformedEscape)?;
    Ok(&rest[..end])
}
