use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::{Rc, Weak};

pub mod dom_tree {
    use super::*;

    /// Shared, mutable handle to a node of the tree.
    pub type Handle = Rc<RefCell<Node>>;

    /// Back-pointer from a child to its parent.
    pub type WeakHandle = Weak<RefCell<Node>>;

    #[derive(Debug)]
    pub enum NodeData {
        /// The document itself, or the contents of a `<template>`.
        DocumentRoot,
        Element(ElementNode),
        Text(String),
        Comment(String),
        ProcessingInstruction { target: String, data: String },
    }

    #[derive(Debug)]
    pub struct Node {
        pub data: NodeData,
        pub parent: Option<WeakHandle>,
        pub children: Vec<Handle>,
    }

    #[derive(Debug)]
    pub struct ElementNode {
        pub tag: String,
        pub qual_name: QualName,
        /// Attributes in source order.
        pub attributes: Vec<Attribute>,
        pub template_contents: Option<Handle>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: Rc<RefCell<Node>>,
        pub doctype: RefCell<Option<Doctype>>,
        /// Set when the input was parsed as a fragment in a `<body>` context.
        pub fragment: bool,
    }

    #[derive(Debug)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    impl Node {
        pub fn new(data: NodeData) -> Handle {
            Rc::new(RefCell::new(Node {
                data,
                parent: None,
                children: Vec::new(),
            }))
        }

        pub fn as_element(&self) -> Option<&ElementNode> {
            match &self.data {
                NodeData::Element(elem) => Some(elem),
                _ => None,
            }
        }

        pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
            match &mut self.data {
                NodeData::Element(elem) => Some(elem),
                _ => None,
            }
        }
    }

    impl ElementNode {
        pub fn new(qual_name: QualName, attributes: Vec<Attribute>) -> Self {
            ElementNode {
                tag: qual_name.local.to_string(),
                qual_name,
                attributes,
                template_contents: None,
            }
        }

        /// Value of a plain (namespace-less) attribute.
        pub fn attr(&self, name: &str) -> Option<&str> {
            self.attributes
                .iter()
                .find(|attr| is_plain_attr(attr, name))
                .map(|attr| &*attr.value)
        }

        pub fn has_attr(&self, name: &str) -> bool {
            self.attr(name).is_some()
        }

        /// Overwrites the attribute in place, or appends it after the existing ones.
        pub fn set_attr(&mut self, name: &str, value: &str) {
            match self
                .attributes
                .iter_mut()
                .find(|attr| is_plain_attr(attr, name))
            {
                Some(attr) => attr.value = StrTendril::from(value),
                None => self.attributes.push(Attribute {
                    name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
                    value: StrTendril::from(value),
                }),
            }
        }

        pub fn remove_attr(&mut self, name: &str) -> Option<String> {
            let index = self
                .attributes
                .iter()
                .position(|attr| is_plain_attr(attr, name))?;
            Some(self.attributes.remove(index).value.to_string())
        }
    }

    fn is_plain_attr(attr: &Attribute, name: &str) -> bool {
        attr.name.ns.is_empty() && &*attr.name.local == name
    }

    pub fn new_document() -> Document {
        Document {
            root: Node::new(NodeData::DocumentRoot),
            doctype: RefCell::new(None),
            fragment: false,
        }
    }

    /// Removes `node` from its parent's children. No-op for detached nodes.
    pub fn detach(node: &Handle) {
        let parent = node.borrow_mut().parent.take().and_then(|p| p.upgrade());
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|child| !Rc::ptr_eq(child, node));
        }
    }

    pub fn append_child(parent: &Handle, child: Handle) {
        detach(&child);
        child.borrow_mut().parent = Some(Rc::downgrade(parent));
        parent.borrow_mut().children.push(child);
    }

    /// Appends text, merging it into a trailing text node when there is one.
    pub fn append_text(parent: &Handle, text: &str) {
        let mut parent_borrow = parent.borrow_mut();
        if let Some(last) = parent_borrow.children.last() {
            if let NodeData::Text(ref mut existing) = last.borrow_mut().data {
                existing.push_str(text);
                return;
            }
        }
        let node = Node::new(NodeData::Text(text.to_string()));
        node.borrow_mut().parent = Some(Rc::downgrade(parent));
        parent_borrow.children.push(node);
    }

    pub fn parent_of(node: &Handle) -> Option<Handle> {
        node.borrow().parent.as_ref().and_then(|p| p.upgrade())
    }

    /// Index of `node` within its parent's children.
    pub fn child_index(parent: &Handle, node: &Handle) -> Option<usize> {
        parent
            .borrow()
            .children
            .iter()
            .position(|child| Rc::ptr_eq(child, node))
    }

    /// Inserts `child` right before `sibling`. Does nothing if `sibling` has no parent.
    pub fn insert_before(sibling: &Handle, child: Handle) {
        let Some(parent) = parent_of(sibling) else {
            return;
        };
        detach(&child);
        let Some(index) = child_index(&parent, sibling) else {
            return;
        };
        child.borrow_mut().parent = Some(Rc::downgrade(&parent));
        parent.borrow_mut().children.insert(index, child);
    }

    /// Inserts text right before `sibling`, merging into a preceding text node.
    pub fn insert_text_before(sibling: &Handle, text: &str) {
        let Some(parent) = parent_of(sibling) else {
            return;
        };
        let Some(index) = child_index(&parent, sibling) else {
            return;
        };
        if index > 0 {
            let previous = parent.borrow().children[index - 1].clone();
            let mut previous = previous.borrow_mut();
            if let NodeData::Text(ref mut existing) = previous.data {
                existing.push_str(text);
                return;
            }
        }
        let node = Node::new(NodeData::Text(text.to_string()));
        node.borrow_mut().parent = Some(Rc::downgrade(&parent));
        parent.borrow_mut().children.insert(index, node);
    }

    /// Moves every child of `node` to the end of `new_parent`.
    pub fn reparent_children(node: &Handle, new_parent: &Handle) {
        let children = std::mem::take(&mut node.borrow_mut().children);
        let mut parent_borrow = new_parent.borrow_mut();
        for child in children {
            child.borrow_mut().parent = Some(Rc::downgrade(new_parent));
            parent_borrow.children.push(child);
        }
    }

    /// Concatenated text of the node's direct text children.
    pub fn text_content(node: &Handle) -> String {
        node.borrow()
            .children
            .iter()
            .filter_map(|child| match &child.borrow().data {
                NodeData::Text(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    impl std::fmt::Display for Doctype {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "<!DOCTYPE {}", self.name)?;
            match (self.public_id.is_empty(), self.system_id.is_empty()) {
                (false, false) => {
                    write!(f, " PUBLIC \"{}\" \"{}\"", self.public_id, self.system_id)?
                }
                (false, true) => write!(f, " PUBLIC \"{}\"", self.public_id)?,
                (true, false) => write!(f, " SYSTEM \"{}\"", self.system_id)?,
                (true, true) => {}
            }
            write!(f, ">")
        }
    }

    impl Document {
        /// The node whose children make up the output.
        ///
        /// Fragment parsing wraps everything in a synthetic `<html>` element.
        pub fn content_root(&self) -> Handle {
            if self.fragment {
                let root = self.root.borrow();
                if let Some(html) = root
                    .children
                    .iter()
                    .find(|child| child.borrow().as_element().is_some())
                {
                    return html.clone();
                }
            }
            self.root.clone()
        }

        /// Serializes the document (or fragment) back to HTML.
        pub fn to_html(&self) -> crate::Result<String> {
            let mut bytes = Vec::new();
            if !self.fragment {
                if let Some(doctype) = &*self.doctype.borrow() {
                    bytes.extend_from_slice(doctype.to_string().as_bytes());
                }
            }
            let opts = SerializeOpts {
                traversal_scope: TraversalScope::ChildrenOnly(None),
                ..Default::default()
            };
            serialize(&mut bytes, &SerializableHandle(self.content_root()), opts)?;
            Ok(String::from_utf8(bytes)?)
        }
    }
}

use dom_tree::{Handle, NodeData};

/// Adapter letting html5ever's serializer walk our tree.
pub struct SerializableHandle(pub Handle);

enum SerializeOp {
    Open(Handle),
    Close(QualName),
}

impl Serialize for SerializableHandle {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        let mut ops = VecDeque::new();
        match traversal_scope {
            TraversalScope::IncludeNode => ops.push_back(SerializeOp::Open(self.0.clone())),
            TraversalScope::ChildrenOnly(_) => ops.extend(
                self.0
                    .borrow()
                    .children
                    .iter()
                    .map(|child| SerializeOp::Open(child.clone())),
            ),
        }

        while let Some(op) = ops.pop_front() {
            match op {
                SerializeOp::Open(handle) => {
                    let node = handle.borrow();
                    match &node.data {
                        NodeData::Element(elem) => {
                            serializer.start_elem(
                                elem.qual_name.clone(),
                                elem.attributes.iter().map(|attr| (&attr.name, &attr.value[..])),
                            )?;

                            // Template contents live outside the regular child list.
                            let contents = elem.template_contents.as_ref().map(|t| t.borrow());
                            let children = match &contents {
                                Some(fragment) => &fragment.children,
                                None => &node.children,
                            };
                            ops.reserve(children.len() + 1);
                            ops.push_front(SerializeOp::Close(elem.qual_name.clone()));
                            for child in children.iter().rev() {
                                ops.push_front(SerializeOp::Open(child.clone()));
                            }
                        }
                        NodeData::DocumentRoot => {
                            for child in node.children.iter().rev() {
                                ops.push_front(SerializeOp::Open(child.clone()));
                            }
                        }
                        NodeData::Text(text) => serializer.write_text(text)?,
                        NodeData::Comment(text) => serializer.write_comment(text)?,
                        NodeData::ProcessingInstruction { target, data } => {
                            serializer.write_processing_instruction(target, data)?
                        }
                    }
                }
                SerializeOp::Close(name) => serializer.end_elem(name)?,
            }
        }
        Ok(())
    }
}
