use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Raised when a link matches none of the known Google URL shapes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("not a recognizable Google link: {0}")]
pub struct InvalidLinkError(pub String);

// The three link shapes we understand, tried in this order. The order is a
// contract: the path-based shapes must win over the `id=` query fallback,
// because a sharing URL can carry both at once.
static DOC_PATH_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(spreadsheets|presentation)/d/([a-zA-Z0-9-_]+)").unwrap());
static DRIVE_PATH_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/drive/(folders|d)/([a-zA-Z0-9-_]+)").unwrap());
static ID_PARAM_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(id)=([a-zA-Z0-9_-]+)").unwrap());

/// Extracts the file or folder id from a Google sharing link.
///
/// Handles spreadsheet/presentation links (`…/spreadsheets/d/<id>`),
/// drive links (`…/drive/folders/<id>`, `…/drive/d/<id>`) and the generic
/// `id=<id>` query-parameter form, in that priority order. The first
/// matching shape wins. The id is returned exactly as it appears in the
/// link.
///
/// Shared-drive layouts with extra path segments (`/drive/u/0/folders/…`)
/// are not recognized and fail like any other unknown shape.
// TODO: support /drive/u/0/folders/... links
pub fn extract_id(link: &str) -> Result<String, InvalidLinkError> {
    for shape in [&DOC_PATH_SHAPE, &DRIVE_PATH_SHAPE, &ID_PARAM_SHAPE] {
        if let Some(caps) = shape.captures(link) {
            // Group 1 is the structural keyword, group 2 the id itself.
            return Ok(caps[2].to_string());
        }
    }
    Err(InvalidLinkError(link.to_string()))
}

/// A document or folder named either by a sharing link or by its raw id.
///
/// Every client operation takes one of these, so callers can pass whatever
/// they have on hand. Ids are taken at face value; links go through
/// [`extract_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentRef {
    Id(String),
    Link(String),
}

impl DocumentRef {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn link(link: impl Into<String>) -> Self {
        Self::Link(link.into())
    }

    /// Resolve to the underlying resource id.
    pub fn resolve(&self) -> Result<String, InvalidLinkError> {
        match self {
            Self::Id(id) => Ok(id.clone()),
            Self::Link(link) => extract_id(link),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_spreadsheet_id() {
        assert_eq!(
            extract_id("https://docs.google.com/spreadsheets/d/1A2b3C4d/edit"),
            Ok("1A2b3C4d".to_string())
        );
    }

    #[test]
    fn extracts_presentation_id() {
        assert_eq!(
            extract_id("https://docs.google.com/presentation/d/1xYz_0-9/edit#slide=id.p"),
            Ok("1xYz_0-9".to_string())
        );
    }

    #[test]
    fn extracts_folder_id() {
        assert_eq!(
            extract_id("https://drive.google.com/drive/folders/XyZ_9-8"),
            Ok("XyZ_9-8".to_string())
        );
    }

    #[test]
    fn extracts_drive_file_id() {
        assert_eq!(
            extract_id("https://drive.google.com/drive/d/0B_abc123"),
            Ok("0B_abc123".to_string())
        );
    }

    #[test]
    fn extracts_id_query_param() {
        assert_eq!(
            extract_id("https://example.com/open?id=abc-123_XYZ"),
            Ok("abc-123_XYZ".to_string())
        );
    }

    #[test]
    fn path_shape_wins_over_id_param() {
        // The spreadsheet path must win even when an id= parameter is present.
        let link = "https://docs.google.com/spreadsheets/d/sheetId123/edit?id=paramId456";
        assert_eq!(extract_id(link), Ok("sheetId123".to_string()));
    }

    #[test]
    fn drive_shape_wins_over_id_param() {
        let link = "https://drive.google.com/drive/folders/folderId?id=other";
        assert_eq!(extract_id(link), Ok("folderId".to_string()));
    }

    #[test]
    fn rejects_unrecognized_link() {
        let err = extract_id("https://example.com/no-match-here").unwrap_err();
        assert_eq!(err.0, "https://example.com/no-match-here");
    }

    #[test]
    fn rejects_bare_domain() {
        assert!(extract_id("https://drive.google.com").is_err());
    }

    #[test]
    fn rejects_multi_account_folder_layout() {
        // Known limitation: the extra /u/0 segment breaks the drive shape.
        assert!(extract_id("https://drive.google.com/drive/u/0/folders/XyZ_9-8").is_err());
    }

    #[test]
    fn extraction_is_idempotent() {
        let link = "https://docs.google.com/spreadsheets/d/1A2b3C4d/edit";
        assert_eq!(extract_id(link), extract_id(link));
    }

    #[test]
    fn document_ref_passes_ids_through() {
        assert_eq!(DocumentRef::id("raw-id").resolve(), Ok("raw-id".to_string()));
    }

    #[test]
    fn document_ref_resolves_links() {
        let doc = DocumentRef::link("https://drive.google.com/drive/folders/XyZ_9-8");
        assert_eq!(doc.resolve(), Ok("XyZ_9-8".to_string()));
    }

    #[test]
    fn document_ref_surfaces_link_errors() {
        assert!(DocumentRef::link("not a link").resolve().is_err());
    }
}
