//! Modal form controllers.
//!
//! - [`bill`]: create-bill modal with participant rows and derived total
//! - [`friend`]: add-friend modal
//!
//! Both forms surface every failure through the [`Notifier`](crate::notify::Notifier)
//! and report the result as an [`Outcome`]. A [`Outcome::Committed`]
//! result tells the caller to refetch server state.

pub mod bill;
pub mod friend;

pub use bill::{BillForm, BillFormState, ParticipantRow, calculate_final_amount};
pub use friend::FriendForm;

use crate::api::ActionResponse;

/// Result of a user-triggered action.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The server accepted the change.
    Committed(ActionResponse),
    /// Client-side validation failed; nothing was sent.
    Invalid,
    /// The request failed or the server rejected it.
    Failed,
    /// The user declined a confirmation; nothing was sent.
    Cancelled,
    /// The action does not apply in the current state.
    Ignored,
}

impl Outcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Parse a number the way a browser's `parseFloat` does.
///
/// Leading whitespace is skipped and the longest numeric prefix is used,
/// so `"12abc"` is `12` and `"abc"` is `None`. Non-finite results are
/// `None`.
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut j = end + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - (end + 1);
        if digits > 0 {
            end = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut j = end + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an integer the way a browser's `parseInt(_, 10)` does.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}
