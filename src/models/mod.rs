pub mod folder;
pub mod note;
pub mod tag;
pub mod user;

pub use folder::Folder;
pub use note::{Note, NoteWithTags};
pub use tag::Tag;
pub use user::User;

use chrono::{SecondsFormat, Utc};

/// Current UTC time as RFC 3339 with a fixed-width fraction, so that
/// string comparison of two timestamps matches their chronological order.
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
