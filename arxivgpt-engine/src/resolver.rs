use crate::document::Document;
use arxivgpt_core::types::SelectorList;
use scraper::{ElementRef, Selector};

#[derive(Debug, Clone)]
pub struct ResolvedElement<'a> {
    pub source: String,
    pub selector: Selector,
    pub element: ElementRef<'a>,
}

impl ResolvedElement<'_> {
    pub fn text_content(&self) -> String {
        self.element.text().collect()
    }
}

/// First element, in document order, of the earliest selector that matches
/// anything. Selectors that do not parse are skipped.
pub fn resolve_first<'a>(
    document: &'a Document,
    selectors: &SelectorList,
) -> Option<ResolvedElement<'a>> {
    for source in selectors.iter() {
        let selector = match Selector::parse(source) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("skipping invalid selector {source:?}: {e}");
                continue;
            }
        };

        let found = document.select_first(&selector);
        if let Some(element) = found {
            return Some(ResolvedElement {
                source: source.to_string(),
                selector,
                element,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div class="b" id="b1">first b</div>
        <div class="a" id="a1">first a</div>
        <div class="a" id="a2">second a</div>
    </body></html>"#;

    fn id_of(r: &ResolvedElement<'_>) -> Option<String> {
        r.element.value().id().map(str::to_string)
    }

    #[test]
    fn earliest_matching_selector_wins_over_document_order() {
        let doc = Document::parse(PAGE);
        let r = resolve_first(&doc, &SelectorList::new([".missing", ".a", ".b"])).unwrap();
        assert_eq!(r.source, ".a");
        assert_eq!(id_of(&r).as_deref(), Some("a1"));
    }

    #[test]
    fn empty_or_unmatched_list_resolves_to_none() {
        let doc = Document::parse(PAGE);
        assert!(resolve_first(&doc, &SelectorList::empty()).is_none());
        assert!(resolve_first(&doc, &SelectorList::new([".x", "#y"])).is_none());
    }

    #[test]
    fn invalid_selector_is_skipped() {
        let doc = Document::parse(PAGE);
        let r = resolve_first(&doc, &SelectorList::new(["div[", ".b"])).unwrap();
        assert_eq!(id_of(&r).as_deref(), Some("b1"));
    }

    #[test]
    fn resolution_is_repeatable() {
        let doc = Document::parse(PAGE);
        let list = SelectorList::new(["section", "div.a", "div"]);
        let first = resolve_first(&doc, &list).map(|r| id_of(&r));
        for _ in 0..5 {
            assert_eq!(resolve_first(&doc, &list).map(|r| id_of(&r)), first);
        }
    }

    #[test]
    fn first_match_is_taken_in_document_order() {
        // The parser moves the second div in front of the table.
        let doc = Document::parse(
            r#"<div class="abs" id="outer"><table><tr><td>
            <div class="abs" id="in-cell">cell</div></td></tr>
            <div class="abs" id="fostered">moved</div></table></div>"#,
        );

        let r = resolve_first(&doc, &SelectorList::single(".abs#fostered, .abs#in-cell")).unwrap();
        assert_eq!(id_of(&r).as_deref(), Some("fostered"));

        let r = resolve_first(&doc, &SelectorList::single("td .abs, #outer > .abs")).unwrap();
        assert_eq!(id_of(&r).as_deref(), Some("fostered"));
    }

    #[test]
    fn text_content_includes_descendants() {
        let doc = Document::parse("<div class='abs'>  This <b>paper</b>\n studies X. </div>");
        let r = resolve_first(&doc, &SelectorList::single(".abs")).unwrap();
        assert_eq!(r.text_content(), "  This paper\n studies X. ");
    }
}
