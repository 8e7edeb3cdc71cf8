pub mod filter;
pub mod folders;
pub mod notes;
pub mod tags;

pub use filter::{FolderFilter, ListNotesParams, NoteFilter, SortKey, SortOrder};
pub use notes::{NewNote, NoteChanges, NoteStore};
