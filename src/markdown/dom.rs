//! A small reference-counted DOM built by html5ever.
//!
//! The sanitizer edits this tree in place and the terminal preview walks the
//! result, so both see exactly the structure a browser would build from the
//! same markup: stray end tags dropped, open elements closed.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_document, Attribute, ParseOpts, QualName};

pub type Handle = Rc<Node>;

#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    parent: RefCell<Option<Weak<Node>>>,
    pub children: RefCell<Vec<Handle>>,
}

#[derive(Debug)]
pub enum NodeData {
    Document,
    Element {
        name: QualName,
        attrs: RefCell<Vec<(String, String)>>,
    },
    Text(RefCell<String>),
    Comment,
}

impl Node {
    fn new(data: NodeData) -> Handle {
        Rc::new(Node {
            data,
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
        })
    }

    /// Local name of an element, `None` for any other node.
    pub fn element_name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    /// Value of attribute `name` on an element.
    pub fn attr(&self, name: &str) -> Option<String> {
        match &self.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|(attr, _)| attr == name)
                .map(|(_, value)| value.clone()),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<Handle> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }
}

/// Unlinks `node` from its parent, if it has one.
pub fn detach(node: &Handle) {
    if let Some(parent) = node.parent.borrow_mut().take().and_then(|p| p.upgrade()) {
        parent.children.borrow_mut().retain(|c| !Rc::ptr_eq(c, node));
    }
}

/// Replaces `node` with its own children.
pub fn unwrap(node: &Handle) {
    let Some(parent) = node.parent() else {
        return;
    };
    let children = std::mem::take(&mut *node.children.borrow_mut());
    for child in &children {
        *child.parent.borrow_mut() = Some(Rc::downgrade(&parent));
    }
    let mut siblings = parent.children.borrow_mut();
    if let Some(pos) = siblings.iter().position(|c| Rc::ptr_eq(c, node)) {
        let tail = siblings.split_off(pos + 1);
        siblings.pop();
        siblings.extend(children);
        siblings.extend(tail);
    }
    *node.parent.borrow_mut() = None;
}

fn append_node(parent: &Handle, child: Handle) {
    detach(&child);
    *child.parent.borrow_mut() = Some(Rc::downgrade(parent));
    parent.children.borrow_mut().push(child);
}

fn append_text(parent: &Handle, text: &str) {
    if let Some(last) = parent.children.borrow().last() {
        if let NodeData::Text(existing) = &last.data {
            existing.borrow_mut().push_str(text);
            return;
        }
    }
    append_node(parent, Node::new(NodeData::Text(RefCell::new(text.to_string()))));
}

/// Parses a markup fragment and returns its `<body>` element.
pub fn parse_fragment(markup: &str) -> Handle {
    // A full document keeps leading whitespace and head-only elements in the body
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{}</body></html>", markup);
    let document = parse_document(RcSink::default(), ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes());
    find_body(&document).unwrap_or(document)
}

fn find_body(node: &Handle) -> Option<Handle> {
    if node.element_name() == Some("body") {
        return Some(node.clone());
    }
    node.children.borrow().iter().find_map(find_body)
}

/// TreeSink that builds the [`Node`] tree.
struct RcSink {
    document: Handle,
}

impl Default for RcSink {
    fn default() -> Self {
        Self {
            document: Node::new(NodeData::Document),
        }
    }
}

impl TreeSink for RcSink {
    type Handle = Handle;
    type Output = Handle;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {}

    fn get_document(&self) -> Handle {
        self.document.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };
        match &target.data {
            NodeData::Element { name, .. } => name,
            _ => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Handle {
        let attrs = attrs
            .into_iter()
            .map(|a| (a.name.local.to_string(), a.value.to_string()))
            .collect();
        Node::new(NodeData::Element {
            name,
            attrs: RefCell::new(attrs),
        })
    }

    fn create_comment(&self, _text: StrTendril) -> Handle {
        Node::new(NodeData::Comment)
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Handle {
        Node::new(NodeData::Comment)
    }

    fn append(&self, parent: &Handle, child: NodeOrText<Handle>) {
        match child {
            NodeOrText::AppendNode(node) => append_node(parent, node),
            NodeOrText::AppendText(text) => append_text(parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Handle,
        prev_element: &Handle,
        child: NodeOrText<Handle>,
    ) {
        if element.parent().is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    fn get_template_contents(&self, target: &Handle) -> Handle {
        target.clone()
    }

    fn same_node(&self, x: &Handle, y: &Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Handle, new_node: NodeOrText<Handle>) {
        let Some(parent) = sibling.parent() else {
            return;
        };
        let node = match new_node {
            NodeOrText::AppendNode(node) => {
                detach(&node);
                node
            }
            NodeOrText::AppendText(text) => {
                Node::new(NodeData::Text(RefCell::new(text.to_string())))
            }
        };
        *node.parent.borrow_mut() = Some(Rc::downgrade(&parent));
        let mut siblings = parent.children.borrow_mut();
        let pos = siblings
            .iter()
            .position(|c| Rc::ptr_eq(c, sibling))
            .unwrap_or(siblings.len());
        siblings.insert(pos, node);
    }

    fn add_attrs_if_missing(&self, target: &Handle, attrs: Vec<Attribute>) {
        if let NodeData::Element { attrs: existing, .. } = &target.data {
            let mut existing = existing.borrow_mut();
            for attr in attrs {
                let name = attr.name.local.to_string();
                if !existing.iter().any(|(n, _)| *n == name) {
                    existing.push((name, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Handle) {
        detach(target);
    }

    fn reparent_children(&self, node: &Handle, new_parent: &Handle) {
        let children = std::mem::take(&mut *node.children.borrow_mut());
        for child in children {
            *child.parent.borrow_mut() = Some(Rc::downgrade(new_parent));
            new_parent.children.borrow_mut().push(child);
        }
    }
}
