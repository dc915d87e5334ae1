//! Flattens identifier-scoped `<style>` rules into inline `style` attributes.
//!
//! Table stylers emit a `<style>` block keyed by cell ids plus a table whose
//! cells carry those ids. Many embedding targets (notebook markdown cells,
//! mail clients) drop `<style>` blocks, so the rules are moved onto the
//! elements themselves and the blocks and ids are removed.

use crate::dom::dom_tree::{self, Handle};
use crate::parser::dom_indices::DomIndices;
use crate::parser::html_tree;
use crate::style::inline_style::MergePolicy;
use crate::style::owned_css::{OwnedDeclaration, Selector, Skipped};
use crate::style::rule_parser::{self, CssMode};
use crate::Result;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InlineOptions {
    pub merge: MergePolicy,
    pub mode: CssMode,
}

/// Output of [`inline_styles_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineReport {
    pub html: String,
    /// Number of (selector, element) pairs that received declarations.
    pub applied: usize,
    /// Everything stepped over in lenient mode, in encounter order.
    pub skipped: Vec<Skipped>,
}

/// Inlines with the default options and returns the rewritten HTML.
pub fn inline_styles(html: &str) -> Result<String> {
    inline_styles_with(html, &InlineOptions::default()).map(|report| report.html)
}

pub fn inline_styles_with(html: &str, options: &InlineOptions) -> Result<InlineReport> {
    let document = html_tree::parse_html(html);
    let indices = DomIndices::build(&document);

    let mut applied = 0;
    let mut skipped = Vec::new();

    for style_element in indices.by_tag("style") {
        let css_text = dom_tree::text_content(style_element);
        if !css_text.is_empty() {
            let parsed = rule_parser::parse_stylesheet(&css_text, options.mode)?;
            skipped.extend(parsed.skipped);

            for rule in &parsed.stylesheet.rules {
                for selector in &rule.selectors {
                    let entry = match selector {
                        Selector::Id(id) => match indices.by_id(id) {
                            Some(target) => {
                                apply_declarations(target, &rule.declarations, options.merge);
                                applied += 1;
                                continue;
                            }
                            None => Skipped::UnresolvedSelector(selector.to_string()),
                        },
                        Selector::Unsupported(text) => Skipped::UnsupportedSelector(text.clone()),
                    };
                    log::debug!("skipping {}", entry);
                    skipped.push(entry);
                }
            }
        }
        dom_tree::detach(style_element);
    }

    for element in &indices.elements {
        if let Some(elem) = element.borrow_mut().as_element_mut() {
            elem.remove_attr("id");
        }
    }

    let html = document.to_html()?;
    log::debug!(
        "inlined {} selector matches, skipped {} entries",
        applied,
        skipped.len()
    );
    Ok(InlineReport {
        html,
        applied,
        skipped,
    })
}

fn apply_declarations(target: &Handle, declarations: &[OwnedDeclaration], merge: MergePolicy) {
    let mut node = target.borrow_mut();
    if let Some(elem) = node.as_element_mut() {
        let style = merge.merge(elem.attr("style"), declarations);
        elem.set_attr("style", &style);
    }
}
