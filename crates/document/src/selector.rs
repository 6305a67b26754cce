//! CSS selector matching over the document arena.
//!
//! Parsing and matching are done by the `selectors` crate; this module only
//! supplies the selector implementation types and an [`Element`] view of the
//! arena. Structural pseudo-classes (`:first-child`, `:nth-child()`,
//! `:not()`, `:is()` ...) come with the crate; state pseudo-classes such as
//! `:hover` and all pseudo-elements are rejected at parse time.

use crate::tree::{NodeKind, Tree};
use cssparser::ToCss;
use domqueue_core::{DomError, NodeId};
use precomputed_hash::PrecomputedHash;
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::context::{
    MatchingContext, MatchingForInvalidation, MatchingMode, NeedsSelectorFlags, QuirksMode,
    SelectorCaches,
};
use selectors::matching::{self, ElementSelectorFlags};
use selectors::parser::{self, ParseRelative, SelectorParseErrorKind};
use selectors::{Element, OpaqueElement};
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Simple;

impl parser::SelectorImpl for Simple {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssName;
    type LocalName = CssName;
    type NamespaceUrl = CssName;
    type NamespacePrefix = CssName;
    type BorrowedNamespaceUrl = CssName;
    type BorrowedLocalName = CssName;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// Attribute value in a selector, serialized quoted.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CssString(String);

impl From<&str> for CssString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssString {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        cssparser::serialize_string(&self.0, dest)
    }
}

/// Tag, attribute, id, class and namespace names.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CssName(String);

impl From<&str> for CssName {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl ToCss for CssName {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        cssparser::serialize_identifier(&self.0, dest)
    }
}

impl PrecomputedHash for CssName {
    #[allow(clippy::cast_possible_truncation)]
    fn precomputed_hash(&self) -> u32 {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish() as u32
    }
}

/// No non-tree-structural pseudo-classes are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NonTSPseudoClass {}

impl parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = Simple;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl ToCss for NonTSPseudoClass {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PseudoElement {}

impl parser::PseudoElement for PseudoElement {
    type Impl = Simple;
}

impl ToCss for PseudoElement {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

struct SelectorParser;

impl<'i> parser::Parser<'i> for SelectorParser {
    type Impl = Simple;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_is_and_where(&self) -> bool {
        true
    }
}

/// An element of the arena as seen by the matcher.
#[derive(Clone, Copy)]
struct ArenaElement<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> ArenaElement<'t> {
    fn new(tree: &'t Tree, id: NodeId) -> Option<Self> {
        tree.element(id).map(|_| Self { tree, id })
    }

    fn tag(&self) -> &'t str {
        self.tree.element(self.id).map(|element| element.tag.as_str()).unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<&'t str> {
        self.tree.element(self.id)?.attribute(name)
    }

    fn sibling(&self, offset: isize) -> Option<Self> {
        let siblings = self.tree.element_siblings(self.id);
        let position = siblings.iter().position(|sibling| *sibling == self.id)?;
        let target = position.checked_add_signed(offset)?;
        siblings.get(target).and_then(|id| Self::new(self.tree, *id))
    }
}

impl fmt::Debug for ArenaElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> ({})", self.tag(), self.id)
    }
}

impl Element for ArenaElement<'_> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        match self.tree.node(self.id) {
            Some(data) => OpaqueElement::new(data),
            None => OpaqueElement::new(self.tree),
        }
    }

    fn parent_element(&self) -> Option<Self> {
        self.tree.parent(self.id).and_then(|parent| Self::new(self.tree, parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.sibling(-1)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.sibling(1)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.tree.element_children(self.id).first().and_then(|child| Self::new(self.tree, *child))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &CssName) -> bool {
        self.tag() == local_name.0
    }

    fn has_namespace(&self, namespace: &CssName) -> bool {
        namespace.0.is_empty()
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }

    fn attr_matches(
        &self,
        namespace: &NamespaceConstraint<&CssName>,
        local_name: &CssName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        if matches!(namespace, NamespaceConstraint::Specific(url) if !url.0.is_empty()) {
            return false;
        }
        self.attribute(&local_name.0).is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pseudo_class: &NonTSPseudoClass,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        match *pseudo_class {}
    }

    fn match_pseudo_element(
        &self,
        pseudo_element: &PseudoElement,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        match *pseudo_element {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        false
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssName, case_sensitivity: CaseSensitivity) -> bool {
        self.attribute("id")
            .is_some_and(|value| case_sensitivity.eq(value.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &CssName, case_sensitivity: CaseSensitivity) -> bool {
        self.attribute("class").is_some_and(|classes| {
            classes
                .split_ascii_whitespace()
                .any(|token| case_sensitivity.eq(token.as_bytes(), name.0.as_bytes()))
        })
    }

    fn has_custom_state(&self, _name: &CssName) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssName) -> Option<CssName> {
        None
    }

    fn is_part(&self, _name: &CssName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.tree.children(self.id).iter().all(|child| {
            match self.tree.node(*child).map(|data| &data.kind) {
                Some(NodeKind::Text(text)) => text.is_empty(),
                Some(NodeKind::Element(_)) => false,
                _ => true,
            }
        })
    }

    fn is_root(&self) -> bool {
        self.tree.parent(self.id) == Some(Tree::root())
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}

/// A parsed, comma separated selector list.
pub(crate) struct SelectorList(parser::SelectorList<Simple>);

impl SelectorList {
    pub(crate) fn parse(selector: &str) -> Result<Self, DomError> {
        let mut input = cssparser::ParserInput::new(selector);
        let mut input = cssparser::Parser::new(&mut input);
        match parser::SelectorList::parse(&SelectorParser, &mut input, ParseRelative::No) {
            Ok(list) => Ok(Self(list)),
            Err(err) => {
                tracing::trace!(selector, error = ?err.kind, "selector rejected");
                Err(DomError::unsupported_selector(selector))
            }
        }
    }

    pub(crate) fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        let Some(element) = ArenaElement::new(tree, node) else {
            return false;
        };
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );
        self.0
            .slice()
            .iter()
            .any(|selector| matching::matches_selector(selector, 0, None, &element, &mut context))
    }

    /// Matching elements strictly below `root`, in document order.
    pub(crate) fn select(&self, tree: &Tree, root: NodeId) -> Vec<NodeId> {
        tree.descendant_elements(root).into_iter().filter(|node| self.matches(tree, *node)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup;
    use rstest::{fixture, rstest};

    #[fixture]
    fn tree() -> Tree {
        markup::parse(
            r#"<body>
                <ul id="list" class="menu main">
                    <li id="one" class="item" data-kind="fruit-apple">one</li>
                    <li id="two" class="item active" lang="en-US">two</li>
                    <li id="three" class="item"></li>
                </ul>
                <p id="after" title="a]b"><span id="inner" title="hello world">x</span></p>
            </body>"#,
        )
        .unwrap()
    }

    fn ids(tree: &Tree, selector: &str) -> Vec<String> {
        let list = SelectorList::parse(selector).unwrap();
        list.select(tree, Tree::root())
            .into_iter()
            .filter_map(|node| tree.element(node)?.attribute("id").map(str::to_owned))
            .collect()
    }

    #[rstest]
    #[case("li", &["one", "two", "three"])]
    #[case("LI", &["one", "two", "three"])]
    #[case("#two", &["two"])]
    #[case(".item.active", &["two"])]
    #[case("ul > li:first-child", &["one"])]
    #[case("li:last-child", &["three"])]
    #[case("li:nth-child(2)", &["two"])]
    #[case("li:empty", &["three"])]
    #[case("span:only-child", &["inner"])]
    #[case("li + li", &["two", "three"])]
    #[case("#one ~ li", &["two", "three"])]
    #[case("body span", &["inner"])]
    #[case("ul span", &[])]
    #[case("[id]", &["list", "one", "two", "three", "after", "inner"])]
    #[case("[data-kind^=fruit]", &["one"])]
    #[case("[data-kind$='apple']", &["one"])]
    #[case("[title*=\"o w\"]", &["inner"])]
    #[case("[title=\"a]b\"]", &["after"])]
    #[case("[class~=menu]", &["list"])]
    #[case("[lang|=en]", &["two"])]
    #[case("li:not(.active)", &["one", "three"])]
    #[case("#inner, #one", &["one", "inner"])]
    #[case("*.menu", &["list"])]
    #[case("div#a#b", &[])]
    fn selectors_match_in_document_order(
        tree: Tree,
        #[case] selector: &str,
        #[case] expected: &[&str],
    ) {
        assert_eq!(ids(&tree, selector), expected);
    }

    #[rstest]
    #[case("")]
    #[case("li >")]
    #[case("> li")]
    #[case("li,,p")]
    #[case("[id")]
    #[case("li:hover")]
    #[case("p::after")]
    #[case("li:not(")]
    fn unsupported_syntax_is_rejected(#[case] selector: &str) {
        assert!(SelectorList::parse(selector).is_err(), "{selector} should be rejected");
    }

    #[rstest]
    fn detached_elements_match_without_ancestors(mut tree: Tree) {
        let list = tree.find_by_id(Tree::root(), "list").unwrap();
        let first = tree.element_children(list)[0];
        tree.set_text_content(list, "gone").unwrap();

        assert!(SelectorList::parse("li:first-child").unwrap().matches(&tree, first));
        assert!(!SelectorList::parse("ul > li").unwrap().matches(&tree, first));
        assert!(!SelectorList::parse("body").unwrap().matches(&tree, Tree::root()));
    }
}
