//! Structural queries over device administration pages.
//!
//! The management cards render configuration as plain HTML forms; these
//! helpers pull attribute values and table cells out of a parsed document.
//! Field and id names on the cards are short alphanumerics, so they can be
//! interpolated into CSS selectors directly.

use scraper::{ElementRef, Html, Selector};

/// Parse an HTML page into a queryable document.
pub(crate) fn parse(body: &str) -> Html {
    Html::parse_document(body)
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("selector built from a fixed template")
}

/// `value` attribute of `<input name="...">`, trimmed.
pub(crate) fn input_value(doc: &Html, name: &str) -> Option<String> {
    let sel = selector(&format!("input[name=\"{name}\"]"));
    doc.select(&sel)
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(|v| v.trim().to_string())
}

/// `value` attribute of `<input id="...">`, trimmed.
pub(crate) fn input_value_by_id(doc: &Html, id: &str) -> Option<String> {
    let sel = selector(&format!("input[id=\"{id}\"]"));
    doc.select(&sel)
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(|v| v.trim().to_string())
}

/// `value` attribute of the selected option of `<select name="...">`.
pub(crate) fn selected_option(doc: &Html, name: &str) -> Option<String> {
    let sel = selector(&format!("select[name=\"{name}\"] option[selected]"));
    doc.select(&sel)
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(|v| v.trim().to_string())
}

/// Text of the `<td>` following the one whose text equals `label`.
///
/// Matches on the cell's full descendant text, so the label may sit in a
/// nested element (`<td><b>UPS Model</b></td>`); likewise the returned value
/// is the full text of the sibling cell, covering the nested layout tables
/// some cards render values in.
pub(crate) fn cell_after_label(doc: &Html, label: &str) -> Option<String> {
    let td = selector("td");
    for cell in doc.select(&td) {
        if text_of(cell) != label {
            continue;
        }
        let sibling = cell
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "td");
        if let Some(value_cell) = sibling {
            return Some(text_of(value_cell));
        }
    }
    None
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Re-render an IPv4 address without leading zeros in its octets
/// (`010.008.007.006` becomes `10.8.7.6`). Pieces that are not plain numbers
/// pass through unchanged.
pub(crate) fn norm_ip(addr: &str) -> String {
    addr.split('.')
        .map(|octet| match octet.parse::<u32>() {
            Ok(n) => n.to_string(),
            Err(_) => octet.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}
