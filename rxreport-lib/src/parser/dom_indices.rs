use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::dom_tree::{Document, Handle, NodeData};

/// Indexes for fast DOM lookup, built once per parsed document.
#[derive(Debug, Default)]
pub struct DomIndices {
    /// Maps an element's "id" attribute to the first element (in document
    /// order) that carries it. Later duplicates are ignored.
    pub id_map: HashMap<String, Handle>,
    /// Maps a lowercase tag name (e.g., "style") to all elements with that
    /// tag, in document order.
    pub tag_map: HashMap<String, Vec<Handle>>,
    /// Every element in document order.
    pub elements: Vec<Handle>,
}

impl DomIndices {
    /// Build the indices for the entire document.
    pub fn build(document: &Document) -> Self {
        let mut indices = DomIndices::default();
        Self::traverse(&document.root, &mut indices);
        indices
    }

    pub fn by_id(&self, id: &str) -> Option<&Handle> {
        self.id_map.get(id)
    }

    /// Elements with the given tag, in document order.
    pub fn by_tag(&self, tag: &str) -> &[Handle] {
        self.tag_map
            .get(&tag.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pre-order walk; template contents are visited as children of their template.
    fn traverse(node: &Handle, indices: &mut DomIndices) {
        let node_ref = node.borrow();
        if let NodeData::Element(elem) = &node_ref.data {
            indices
                .tag_map
                .entry(elem.tag.to_ascii_lowercase())
                .or_default()
                .push(Rc::clone(node));

            if let Some(id_value) = elem.attr("id") {
                indices
                    .id_map
                    .entry(id_value.to_string())
                    .or_insert_with(|| Rc::clone(node));
            }
            indices.elements.push(Rc::clone(node));

            if let Some(contents) = &elem.template_contents {
                Self::traverse(contents, indices);
            }
        }
        for child in &node_ref.children {
            Self::traverse(child, indices);
        }
    }
}
