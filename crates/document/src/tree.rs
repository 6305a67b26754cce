use domqueue_core::{DomError, DomErrorKind, NodeId};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) type SharedTree = Arc<RwLock<Tree>>;

pub(crate) fn read(tree: &SharedTree) -> RwLockReadGuard<'_, Tree> {
    tree.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write(tree: &SharedTree) -> RwLockWriteGuard<'_, Tree> {
    tree.write().unwrap_or_else(PoisonError::into_inner)
}

const DATA_PREFIX: &str = "data-";

#[derive(Clone, Debug)]
pub(crate) enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Clone, Debug)]
pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) attributes: Vec<(String, String)>,
}

impl ElementData {
    pub(crate) fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    pub(crate) fn has_class(&self, class_name: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|token| token == class_name))
    }

    fn set_attribute(&mut self, name: &str, value: String) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_owned(), value)),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

/// Arena of document nodes. Index 0 is always the document root.
///
/// Detached elements stay in the arena without a parent because handles to
/// them may still be alive. Detached text and comment nodes are never handed
/// out, so their slots go on a free list and are reused by later inserts.
#[derive(Clone, Debug)]
pub(crate) struct Tree {
    nodes: Vec<NodeData>,
    free: Vec<NodeId>,
    doctype: Option<String>,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![NodeData { parent: None, children: Vec::new(), kind: NodeKind::Document }],
            free: Vec::new(),
            doctype: None,
        }
    }

    pub(crate) const fn root() -> NodeId {
        NodeId::new(0)
    }

    pub(crate) fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    pub(crate) fn set_doctype(&mut self, doctype: String) {
        self.doctype = Some(doctype);
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index())
    }

    fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let data = NodeData { parent, children: Vec::new(), kind };
        let id = match self.free.pop() {
            Some(id) if id.index() < self.nodes.len() => {
                self.nodes[id.index()] = data;
                id
            }
            _ => {
                self.nodes.push(data);
                NodeId::new(self.nodes.len() - 1)
            }
        };
        if let Some(parent) = parent
            && let Some(data) = self.nodes.get_mut(parent.index())
        {
            data.children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag: String,
        attributes: Vec<(String, String)>,
    ) -> NodeId {
        self.push_node(Some(parent), NodeKind::Element(ElementData { tag, attributes }))
    }

    pub(crate) fn create_comment(&mut self, parent: NodeId, text: String) -> NodeId {
        self.push_node(Some(parent), NodeKind::Comment(text))
    }

    /// Appends text under `parent`, merging with a trailing text sibling.
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        let last = self.node(parent).and_then(|data| data.children.last().copied());
        if let Some(last) = last
            && let Some(NodeData { kind: NodeKind::Text(existing), .. }) =
                self.nodes.get_mut(last.index())
        {
            existing.push_str(text);
            return;
        }
        self.push_node(Some(parent), NodeKind::Text(text.to_owned()));
    }

    pub(crate) fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match self.nodes.get_mut(id.index()).map(|data| &mut data.kind) {
            Some(NodeKind::Element(element)) => Ok(element),
            _ => Err(DomError::new(
                DomErrorKind::NotAnElement,
                format!("node {id} is not an element"),
            )),
        }
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|data| data.children.as_slice()).unwrap_or_default()
    }

    pub(crate) fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).iter().copied().filter(|child| self.element(*child).is_some()).collect()
    }

    /// Element siblings of `id` including itself, in document order.
    pub(crate) fn element_siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.parent(id) {
            Some(parent) => self.element_children(parent),
            None => vec![id],
        }
    }

    pub(crate) fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.element_siblings(id);
        let position = siblings.iter().position(|sibling| *sibling == id)?;
        position.checked_sub(1).map(|index| siblings[index])
    }

    /// Elements strictly below `root`, pre-order.
    pub(crate) fn descendant_elements(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.element(current).is_some() {
                out.push(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    pub(crate) fn is_connected(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == Self::root() {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub(crate) fn text_content(&self, id: NodeId) -> String {
        match self.node(id).map(|data| &data.kind) {
            Some(NodeKind::Text(text)) => text.clone(),
            Some(NodeKind::Comment(_)) | None => String::new(),
            Some(NodeKind::Document | NodeKind::Element(_)) => {
                let mut out = String::new();
                let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
                while let Some(current) = stack.pop() {
                    match self.node(current).map(|data| &data.kind) {
                        Some(NodeKind::Text(text)) => out.push_str(text),
                        Some(NodeKind::Element(_)) => {
                            stack.extend(self.children(current).iter().rev().copied());
                        }
                        _ => {}
                    }
                }
                out
            }
        }
    }

    pub(crate) fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        self.element_mut(id)?;
        let old = self
            .nodes
            .get_mut(id.index())
            .map(|data| std::mem::take(&mut data.children))
            .unwrap_or_default();
        for child in old {
            let Some(data) = self.nodes.get_mut(child.index()) else {
                continue;
            };
            data.parent = None;
            if let NodeKind::Text(content) | NodeKind::Comment(content) = &mut data.kind {
                content.clear();
                self.free.push(child);
            }
        }
        self.append_text(id, text);
        Ok(())
    }

    pub(crate) fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let name = normalize_attribute_name(name)?;
        self.element_mut(id)?.set_attribute(&name, value.to_owned());
        Ok(())
    }

    pub(crate) fn class_tokens(&self, id: NodeId) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        let raw = self.element(id).and_then(|element| element.attribute("class"));
        for token in raw.unwrap_or_default().split_ascii_whitespace() {
            if !tokens.iter().any(|existing| existing == token) {
                tokens.push(token.to_owned());
            }
        }
        tokens
    }

    /// Applies `update` to the class token set and writes it back. An element
    /// without a class attribute only gains one when the set is non-empty.
    fn update_classes<R>(
        &mut self,
        id: NodeId,
        class_name: &str,
        update: impl FnOnce(&mut Vec<String>) -> R,
    ) -> Result<R, DomError> {
        validate_class_token(class_name)?;
        let had_attribute = self.element_mut(id)?.attribute("class").is_some();
        let mut tokens = self.class_tokens(id);
        let result = update(&mut tokens);
        if had_attribute || !tokens.is_empty() {
            self.element_mut(id)?.set_attribute("class", tokens.join(" "));
        }
        Ok(result)
    }

    pub(crate) fn add_class(&mut self, id: NodeId, class_name: &str) -> Result<(), DomError> {
        self.update_classes(id, class_name, |tokens| {
            if !tokens.iter().any(|token| token == class_name) {
                tokens.push(class_name.to_owned());
            }
        })
    }

    pub(crate) fn remove_class(&mut self, id: NodeId, class_name: &str) -> Result<(), DomError> {
        self.update_classes(id, class_name, |tokens| tokens.retain(|token| token != class_name))
    }

    pub(crate) fn toggle_class(&mut self, id: NodeId, class_name: &str) -> Result<bool, DomError> {
        self.update_classes(id, class_name, |tokens| {
            if tokens.iter().any(|token| token == class_name) {
                tokens.retain(|token| token != class_name);
                false
            } else {
                tokens.push(class_name.to_owned());
                true
            }
        })
    }

    pub(crate) fn dataset(&self, id: NodeId) -> Vec<(String, String)> {
        let Some(element) = self.element(id) else {
            return Vec::new();
        };
        element
            .attributes
            .iter()
            .filter_map(|(name, value)| {
                let key = name.strip_prefix(DATA_PREFIX)?;
                Some((data_attribute_to_key(key), value.clone()))
            })
            .collect()
    }

    pub(crate) fn set_data(&mut self, id: NodeId, key: &str, value: &str) -> Result<(), DomError> {
        let name = data_key_to_attribute(key)?;
        self.set_attribute(id, &name, value)
    }

    /// First element at or below `root` whose `id` attribute equals `id`.
    pub(crate) fn find_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendant_elements(root)
            .into_iter()
            .find(|candidate| self.element(*candidate).and_then(|e| e.attribute("id")) == Some(id))
    }

    pub(crate) fn find_by_classes(&self, root: NodeId, class_names: &str) -> Vec<NodeId> {
        let wanted: Vec<&str> = class_names.split_ascii_whitespace().collect();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.descendant_elements(root)
            .into_iter()
            .filter(|candidate| {
                self.element(*candidate)
                    .is_some_and(|element| wanted.iter().all(|class| element.has_class(class)))
            })
            .collect()
    }
}

fn validate_class_token(token: &str) -> Result<(), DomError> {
    if token.is_empty() || token.chars().any(|ch| ch.is_ascii_whitespace()) {
        return Err(DomError::invalid_token(token));
    }
    Ok(())
}

fn normalize_attribute_name(name: &str) -> Result<String, DomError> {
    let invalid = name.is_empty()
        || name.chars().any(|ch| {
            ch.is_whitespace() || ch.is_control() || matches!(ch, '"' | '\'' | '>' | '/' | '=')
        });
    if invalid {
        return Err(DomError::invalid_name(name));
    }
    Ok(name.to_ascii_lowercase())
}

/// `foo-bar` (after the `data-` prefix) becomes `fooBar`.
fn data_attribute_to_key(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '-'
            && let Some(next) = chars.peek().copied()
            && next.is_ascii_lowercase()
        {
            out.push(next.to_ascii_uppercase());
            chars.next();
            continue;
        }
        out.push(ch);
    }
    out
}

/// `fooBar` becomes `data-foo-bar`. Keys with a dash followed by a lowercase
/// letter cannot round trip and are rejected.
fn data_key_to_attribute(key: &str) -> Result<String, DomError> {
    let bytes = key.as_bytes();
    let ambiguous =
        bytes.windows(2).any(|pair| pair[0] == b'-' && pair[1].is_ascii_lowercase());
    if key.is_empty() || ambiguous {
        return Err(DomError::new(DomErrorKind::InvalidName, format!("invalid data key '{key}'")));
    }
    let mut out = String::from(DATA_PREFIX);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    Ok(out)
}
