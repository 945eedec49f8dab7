//! Frame command grammar
//!
//! Rules are tried in priority order:
//! 1. `whoami` prefix: reply with own id
//! 2. trimmed frame starts with a digit and contains `:`: personal message
//!    to the id formed by the leading digits
//! 3. `all` prefix with a `:`: broadcast of the text after the colon
//! 4. anything else: broadcast of the raw frame
//!
//! Frames are raw bytes and are never decoded. Prefix checks use
//! `starts_with`, so frames shorter than the keyword just fall through to
//! the next rule. Message text is sliced out of the frame without copying.

use std::str;

use bytes::Bytes;

use crate::types::ClientId;

const WHOAMI: &[u8] = b"whoami";
const ALL: &[u8] = b"all";

/// A classified frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask for own id
    WhoAmI,
    /// Point-to-point message
    Personal { receiver: ClientId, text: Bytes },
    /// Message for every client
    Broadcast { text: Bytes },
}

/// Classify a frame
///
/// Returns `None` when the frame looks like a personal message but the
/// receiver id does not parse; such frames are skipped.
pub fn parse_frame(frame: &Bytes) -> Option<Command> {
    if frame.starts_with(WHOAMI) {
        return Some(Command::WhoAmI);
    }

    if is_personal_message(frame) {
        let receiver = leading_id(frame.trim_ascii())?;
        return Some(Command::Personal {
            receiver,
            text: text_after_colon(frame)?,
        });
    }

    if frame.starts_with(ALL) {
        if let Some(text) = text_after_colon(frame) {
            return Some(Command::Broadcast { text });
        }
    }

    Some(Command::Broadcast {
        text: frame.clone(),
    })
}

fn is_personal_message(frame: &[u8]) -> bool {
    let starts_with_digit = frame
        .trim_ascii()
        .first()
        .is_some_and(|b| b.is_ascii_digit());
    starts_with_digit && frame.contains(&b':')
}

/// Id formed by the run of leading ASCII digits
fn leading_id(trimmed: &[u8]) -> Option<ClientId> {
    let end = trimmed
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(trimmed.len());
    str::from_utf8(&trimmed[..end]).ok()?.parse().ok()
}

/// Everything after the first `:`, with ASCII whitespace trimmed
fn text_after_colon(frame: &Bytes) -> Option<Bytes> {
    let colon = frame.iter().position(|&b| b == b':')?;
    let rest = &frame[colon + 1..];
    let start = rest
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(rest.len());
    let trimmed_len = rest[start..].trim_ascii_end().len();
    let from = colon + 1 + start;
    Some(frame.slice(from..from + trimmed_len))
}
