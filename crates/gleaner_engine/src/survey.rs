//! Tag census: walk the parsed page once and collect what the pipeline
//! cares about.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// One `img` element as found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Trimmed `src` attribute; `None` when absent or whitespace-only.
    pub src: Option<String>,
}

/// What one pass over the document found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentSurvey {
    /// Every `img` element, in document order. Duplicates stay duplicated.
    pub images: Vec<ImageRef>,
    /// Number of `a` elements.
    pub anchor_count: usize,
}

/// Parse `html` tolerantly and walk the whole tree in document order.
/// Broken markup never fails; the parser recovers and the census covers
/// whatever tree it built.
pub fn survey_document(html: &str) -> DocumentSurvey {
    let document = Html::parse_document(html);
    let mut survey = DocumentSurvey::default();
    for child in document.root_element().children() {
        visit_node(child, &mut survey);
    }
    survey
}

fn visit_node(node: NodeRef<'_, Node>, survey: &mut DocumentSurvey) {
    if let Node::Element(_) = node.value() {
        if let Some(element) = ElementRef::wrap(node) {
            record_element(element, survey);
        }
    }
    for child in node.children() {
        visit_node(child, survey);
    }
}

fn record_element(element: ElementRef<'_>, survey: &mut DocumentSurvey) {
    match element.value().name().to_ascii_lowercase().as_str() {
        "img" => {
            let src = element
                .value()
                .attr("src")
                .map(str::trim)
                .filter(|src| !src.is_empty())
                .map(str::to_string);
            survey.images.push(ImageRef { src });
        }
        "a" => survey.anchor_count += 1,
        _ => {}
    }
}
