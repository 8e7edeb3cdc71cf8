use serde::Deserialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Sentinel value for the `folder` query parameter selecting unfiled
/// notes. Folder ids are UUIDs, so the literal can never collide.
pub const UNFILED_SENTINEL: &str = "none";

/// Raw, untrusted query parameters as they arrive on the note list
/// endpoint. Everything is optional and loosely typed; normalization
/// into [`NoteFilter`] degrades unrecognized values to defaults instead
/// of failing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesParams {
    pub folder: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub is_pinned: Option<String>,
    pub is_archived: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderFilter {
    /// No folder predicate.
    Any,
    /// Only notes with a null folder reference.
    Unfiled,
    /// Only notes in the given folder.
    In(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortKey {
    pub fn column(self) -> &'static str {
        match self {
            SortKey::CreatedAt => "n.created_at",
            SortKey::UpdatedAt => "n.updated_at",
            SortKey::Title => "n.title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Fully typed filter descriptor consumed by the note store.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteFilter {
    pub folder: FolderFilter,
    pub tag: Option<String>,
    pub search: Option<String>,
    /// Tri-state as received; the store only narrows on an explicit true.
    pub pinned: Option<bool>,
    pub archived: bool,
    pub page: i64,
    pub limit: i64,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl NoteFilter {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

fn positive_int(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

impl From<ListNotesParams> for NoteFilter {
    fn from(params: ListNotesParams) -> Self {
        let folder = match params.folder.as_deref() {
            None | Some("") => FolderFilter::Any,
            Some(UNFILED_SENTINEL) => FolderFilter::Unfiled,
            Some(id) => FolderFilter::In(id.to_string()),
        };

        let pinned = match params.is_pinned.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };

        let archived = matches!(params.is_archived.as_deref(), Some("true"));

        let sort = match params.sort_by.as_deref() {
            Some("created_at") => SortKey::CreatedAt,
            Some("title") => SortKey::Title,
            _ => SortKey::UpdatedAt,
        };

        let order = match params
            .sort_order
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };

        NoteFilter {
            folder,
            tag: params.tag.filter(|t| !t.is_empty()),
            search: params.search.filter(|s| !s.is_empty()),
            pinned,
            archived,
            page: positive_int(params.page.as_deref(), DEFAULT_PAGE),
            limit: positive_int(params.limit.as_deref(), DEFAULT_LIMIT),
            sort,
            order,
        }
    }
}
