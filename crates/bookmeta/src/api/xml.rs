//! Just enough XML walking for the Goodreads search response.
//!
//! Elements are found by scanning tags with a regex and tracking the nesting depth, so only
//! direct children of the given content are ever matched. Markup inside CDATA sections is
//! not scanned.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([A-Za-z_][\w:.\-]*)[^>]*?(/?)>").expect("valid regex"));
static CDATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("valid regex"));
static MARKUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>|<[^>]+>").expect("valid regex")
});
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#x[0-9A-Fa-f]+|#[0-9]+|lt|gt|quot|apos|amp);").expect("valid regex"));

/// The inner content of every direct child element of `xml` named `tag`.
///
/// Self closing elements are returned as empty content.
pub(crate) fn children<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut depth = 0_usize;
    let mut start = None;
    let cdata: Vec<_> = CDATA_RE.find_iter(xml).map(|m| m.range()).collect();

    for caps in TAG_RE.captures_iter(xml) {
        let Some(whole) = caps.get(0) else { continue };
        if cdata.iter().any(|section| section.contains(&whole.start())) {
            continue;
        }
        let closing = !caps[1].is_empty();
        let self_closing = !caps[3].is_empty();
        let name = &caps[2];

        if closing {
            depth = depth.saturating_sub(1);
            if depth == 0 && name == tag {
                if let Some(s) = start.take() {
                    found.push(&xml[s..whole.start()]);
                }
            }
        } else if self_closing {
            if depth == 0 && name == tag {
                found.push("");
            }
        } else {
            if depth == 0 && name == tag {
                start = Some(whole.end());
            }
            depth += 1;
        }
    }

    found
}

/// The first direct child of `xml` named `tag`.
pub(crate) fn child<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    children(xml, tag).into_iter().next()
}

/// Descends through `path` one direct child at a time.
pub(crate) fn path<'a>(xml: &'a str, path: &[&str]) -> Option<&'a str> {
    path.iter().try_fold(xml, |content, tag| child(content, tag))
}

/// The text of `path` below `xml`, or an empty string when any step is missing.
pub(crate) fn text_at(xml: &str, tags: &[&str]) -> String {
    path(xml, tags).map(text).unwrap_or_default()
}

/// Plain text of element content: markup removed, CDATA unwrapped, entities decoded and trimmed.
pub(crate) fn text(content: &str) -> String {
    let stripped = MARKUP_RE.replace_all(content, |caps: &Captures<'_>| {
        caps.get(1).map_or("", |cdata| cdata.as_str()).to_owned()
    });
    decode_entities(&stripped).trim().to_owned()
}

fn decode_entities(value: &str) -> String {
    ENTITY_RE
        .replace_all(value, |caps: &Captures<'_>| {
            let entity = &caps[1];
            match entity {
                "lt" => "<".to_owned(),
                "gt" => ">".to_owned(),
                "quot" => "\"".to_owned(),
                "apos" => "'".to_owned(),
                "amp" => "&".to_owned(),
                _ => {
                    let code = entity
                        .strip_prefix("#x")
                        .map_or_else(
                            || entity[1..].parse::<u32>().ok(),
                            |hex| u32::from_str_radix(hex, 16).ok(),
                        )
                        .and_then(char::from_u32);
                    code.map_or_else(|| caps[0].to_owned(), String::from)
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    const BOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<best_book type="Book">
  <id type="integer">42</id>
  <title>Tom &amp; Jerry</title>
  <author>
    <id type="integer">7</id>
    <name><![CDATA[Fred Quimby]]></name>
  </author>
  <image_url/>
</best_book>"#;

    #[test]
    fn child_ignores_nested_elements_with_the_same_name() {
        let book = super::child(BOOK, "best_book").expect("best_book is the root");

        assert_eq!("42", super::text_at(book, &["id"]));
        assert_eq!("7", super::text_at(book, &["author", "id"]));
    }

    #[test]
    fn text_decodes_entities_and_cdata() {
        let book = super::child(BOOK, "best_book").unwrap();

        assert_eq!("Tom & Jerry", super::text_at(book, &["title"]));
        assert_eq!("Fred Quimby", super::text_at(book, &["author", "name"]));
        assert_eq!("it's", super::text("it&#39;s"));
        assert_eq!("it's", super::text("it&#x27;s"));
    }

    #[test]
    fn missing_and_self_closing_elements_are_empty() {
        let book = super::child(BOOK, "best_book").unwrap();

        assert_eq!(Some(""), super::child(book, "image_url"));
        assert_eq!("", super::text_at(book, &["small_image_url"]));
        assert!(super::path(book, &["author", "image"]).is_none());
    }

    #[test]
    fn markup_inside_cdata_is_not_scanned() {
        let xml = "<work><title><![CDATA[a <b> c </i>]]></title><id>9</id></work>";
        let work = super::child(xml, "work").unwrap();

        assert_eq!("9", super::text_at(work, &["id"]));
        assert_eq!(Some("<![CDATA[a <b> c </i>]]>"), super::child(work, "title"));
        assert_eq!("a <b> c </i>", super::text_at(work, &["title"]));
    }

    #[test]
    fn children_returns_every_sibling_in_order() {
        let xml = "<results><work><id>1</id></work><work><id>2</id></work></results>";
        let results = super::child(xml, "results").unwrap();

        let ids: Vec<_> = super::children(results, "work")
            .into_iter()
            .map(|w| super::text_at(w, &["id"]))
            .collect();
        assert_eq!(vec!["1", "2"], ids);
    }
}
