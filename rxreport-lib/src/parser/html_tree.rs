//! This module contains functions and types for parsing HTML into the
//! owned tree of `crate::dom::dom_tree`.
//!
//! html5ever does the actual parsing; `DomTreeSink` receives its tree
//! construction callbacks. Parsing never fails: malformed markup is repaired
//! the way browsers repair it and the parse errors are only logged.

use crate::dom::dom_tree::{self, ElementNode, Handle, Node, NodeData};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink},
    Attribute, LocalName, Namespace, ParseOpts, QualName,
};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parses `html` the way the inliner needs it.
///
/// Input that looks like a complete document (a leading doctype or `<html>`
/// tag) is parsed as one; anything else is treated as a fragment in a
/// `<body>` context so no `<html>`/`<head>`/`<body>` wrappers are invented.
pub fn parse_html(html: &str) -> dom_tree::Document {
    if looks_like_document(html) {
        create_dom_tree(html)
    } else {
        create_fragment_tree(html)
    }
}

/// Creates a DOM tree from a complete HTML document.
pub fn create_dom_tree(html_content: &str) -> dom_tree::Document {
    let tree_sink = DomTreeSink::new(false);
    html5ever::parse_document(tree_sink, ParseOpts::default()).one(html_content)
}

/// Creates a DOM tree from an HTML fragment, parsed as the contents of `<body>`.
pub fn create_fragment_tree(html_content: &str) -> dom_tree::Document {
    let tree_sink = DomTreeSink::new(true);
    let context = QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from("body"),
    );
    html5ever::parse_fragment(tree_sink, ParseOpts::default(), context, Vec::new())
        .one(html_content)
}

fn looks_like_document(html: &str) -> bool {
    let head: String = html
        .trim_start()
        .chars()
        .take(9)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

/// Tree builder target for html5ever.
///
/// Holds the document being built and the quirks mode reported by the parser.
pub struct DomTreeSink {
    document: dom_tree::Document,
    quirks_mode: RefCell<QuirksMode>,
}

impl DomTreeSink {
    pub fn new(fragment: bool) -> Self {
        let mut document = dom_tree::new_document();
        document.fragment = fragment;
        Self {
            document,
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }
}

#[derive(Debug)]
pub struct DomElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for DomElemName {
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

impl TreeSink for DomTreeSink {
    type Handle = Handle;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = DomElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        log::debug!("html parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match target.borrow().as_element() {
            Some(elem) => DomElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            },
            None => panic!("elem_name called on non-element node"),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        let mut element = ElementNode::new(name, attrs);
        if flags.template {
            element.template_contents = Some(Node::new(NodeData::DocumentRoot));
        }
        Node::new(NodeData::Element(element))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        Node::new(NodeData::Comment(text.to_string()))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        Node::new(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => dom_tree::append_child(parent, node),
            NodeOrText::AppendText(text) => dom_tree::append_text(parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if dom_tree::parent_of(element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target
            .borrow()
            .as_element()
            .and_then(|elem| elem.template_contents.clone())
            .unwrap_or_else(|| target.clone())
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => dom_tree::insert_before(sibling, node),
            NodeOrText::AppendText(text) => dom_tree::insert_text_before(sibling, &text),
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut target_node = target.borrow_mut();
        if let Some(elem) = target_node.as_element_mut() {
            for attr in attrs {
                if !elem.attributes.iter().any(|existing| existing.name == attr.name) {
                    elem.attributes.push(attr);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        dom_tree::detach(target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        dom_tree::reparent_children(node, new_parent);
    }
}
