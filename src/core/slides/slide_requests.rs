use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};

// =============================================================================
// BATCH UPDATE REQUEST BUILDERS
// =============================================================================
//
// The Slides API takes mutations as a batch of request objects. These
// builders shape the JSON; submitting the batch is the client's job.

/// Request that places an image on a page, reusing the size and transform
/// of an existing element (typically a placeholder being replaced).
pub fn create_image_request(img_url: &str, page_object_id: &str, size: &Value, transform: &Value) -> Value {
    json!({
        "createImage": {
            "url": img_url,
            "elementProperties": {
                "pageObjectId": page_object_id,
                "size": size,
                "transform": transform,
            },
        }
    })
}

/// Request that removes a page element (or a whole slide) by object id.
pub fn delete_object_request(object_id: &str) -> Value {
    json!({ "deleteObject": { "objectId": object_id } })
}

/// Request that replaces every occurrence of `find_text` across the
/// presentation, case-insensitively.
pub fn replace_all_text_request(new_text: &str, find_text: &str) -> Value {
    json!({
        "replaceAllText": {
            "containsText": { "matchCase": false, "text": find_text },
            "pageObjectIds": [],
            "replaceText": new_text,
        }
    })
}

// =============================================================================
// SPEAKER NOTES
// =============================================================================

/// The subset of a presentation response we care about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    #[serde(default)]
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub object_id: String,
    pub slide_properties: Option<SlideProperties>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideProperties {
    pub notes_page: Option<NotesPage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesPage {
    #[serde(default)]
    pub page_elements: Vec<PageElement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageElement {
    pub shape: Option<Shape>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub text_elements: Vec<TextElement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub text_run: Option<TextRun>,
}

static HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#[a-zA-Z0-9-_]+").unwrap());

/// Maps hashtags found in speaker notes to the slides carrying them.
///
/// Deck templates put the speaker-notes text box as the second page element
/// of the notes page, with the note body in the second text element. Slides
/// without notes, or whose notes carry no `#tag`, are skipped. Used to
/// select template slides for deletion by tag.
pub fn hashtag_slide_map(slides: &[Slide]) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for slide in slides {
        let Some(content) = notes_text(slide) else {
            continue;
        };
        if let Some(tag) = HASHTAG.find(&content) {
            map.entry(tag.as_str().to_string())
                .or_default()
                .push(slide.object_id.clone());
        }
    }
    map
}

fn notes_text(slide: &Slide) -> Option<String> {
    slide
        .slide_properties
        .as_ref()?
        .notes_page
        .as_ref()?
        .page_elements
        .get(1)?
        .shape
        .as_ref()?
        .text
        .as_ref()?
        .text_elements
        .get(1)?
        .text_run
        .as_ref()?
        .content
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slide_with_note(object_id: &str, note: &str) -> Slide {
        serde_json::from_value(json!({
            "objectId": object_id,
            "slideProperties": {
                "notesPage": {
                    "pageElements": [
                        { "shape": null },
                        {
                            "shape": {
                                "text": {
                                    "textElements": [
                                        {},
                                        { "textRun": { "content": note } }
                                    ]
                                }
                            }
                        }
                    ]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn create_image_request_shape() {
        let size = json!({"width": {"magnitude": 3_000_000, "unit": "EMU"}});
        let transform = json!({"scaleX": 1, "scaleY": 1, "unit": "EMU"});
        let req = create_image_request("https://img.example/x.png", "page1", &size, &transform);
        assert_eq!(req["createImage"]["url"], "https://img.example/x.png");
        assert_eq!(req["createImage"]["elementProperties"]["pageObjectId"], "page1");
        assert_eq!(req["createImage"]["elementProperties"]["size"], size);
    }

    #[test]
    fn delete_object_request_shape() {
        let req = delete_object_request("obj42");
        assert_eq!(req, json!({"deleteObject": {"objectId": "obj42"}}));
    }

    #[test]
    fn replace_all_text_is_case_insensitive() {
        let req = replace_all_text_request("Acme Corp", "{{CLIENT_NAME}}");
        assert_eq!(req["replaceAllText"]["containsText"]["matchCase"], false);
        assert_eq!(req["replaceAllText"]["containsText"]["text"], "{{CLIENT_NAME}}");
        assert_eq!(req["replaceAllText"]["replaceText"], "Acme Corp");
    }

    #[test]
    fn maps_hashtags_to_slide_ids() {
        let slides = vec![
            slide_with_note("s1", "intro slide #intro\n"),
            slide_with_note("s2", "#pricing details here"),
            slide_with_note("s3", "another #intro variant"),
        ];
        let map = hashtag_slide_map(&slides);
        assert_eq!(map["#intro"], vec!["s1", "s3"]);
        assert_eq!(map["#pricing"], vec!["s2"]);
    }

    #[test]
    fn only_first_hashtag_counts() {
        let slides = vec![slide_with_note("s1", "#one then #two")];
        let map = hashtag_slide_map(&slides);
        assert_eq!(map["#one"], vec!["s1"]);
        assert!(!map.contains_key("#two"));
    }

    #[test]
    fn skips_slides_without_notes() {
        let bare: Slide = serde_json::from_value(json!({"objectId": "s9"})).unwrap();
        let slides = vec![bare, slide_with_note("s1", "no tag here")];
        assert!(hashtag_slide_map(&slides).is_empty());
    }
}
