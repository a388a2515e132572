use std::borrow::Cow;
use std::cell::{Ref, RefCell};

use html5ever::interface::NextParserState;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeBuilderOpts, TreeSink};
use html5ever::{parse_fragment, Attribute, ParseOpts, QualName};

/// Index of a node inside its [`Fragment`].
pub type NodeId = usize;

const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Synthetic root.
    Document,
    /// Element; its tag lives in [`HtmlNode::name`].
    Element,
    /// Character data, entities already decoded.
    Text(String),
    /// Comment or processing instruction; renders nothing.
    Comment,
}

/// One node of the parsed tree.
#[derive(Debug, Clone)]
pub struct HtmlNode {
    /// Element name; empty for non-elements.
    pub name: QualName,
    /// Node payload.
    pub data: NodeData,
    /// Parent node, `None` for the root and detached nodes.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// Arena-backed HTML fragment tree.
#[derive(Debug, Clone)]
pub struct Fragment {
    nodes: Vec<HtmlNode>,
    parse_errors: Vec<String>,
}

impl Default for Fragment {
    fn default() -> Self {
        Self {
            nodes: vec![HtmlNode {
                name: empty_name(),
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
            parse_errors: Vec::new(),
        }
    }
}

impl Fragment {
    /// Parses `html` as the content of a `<body>` element.
    ///
    /// Scripting is off, so `<noscript>` content is parsed as markup.
    /// html5ever recovers from malformed markup; the messages it reports
    /// while doing so are kept in [`Fragment::parse_errors`].
    pub fn parse(html: &str) -> Self {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        parse_fragment(
            FragmentBuilder::default(),
            opts,
            QualName::new(None, XHTML_NS.into(), "body".into()),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }

    /// The synthetic document node.
    pub fn root(&self) -> NodeId {
        0
    }

    /// Panics if `id` did not come from this fragment.
    pub fn node(&self, id: NodeId) -> &HtmlNode {
        &self.nodes[id]
    }

    /// Lower-case tag name for element nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        let node = &self.nodes[id];
        match node.data {
            NodeData::Element => Some(&*node.name.local),
            _ => None,
        }
    }

    /// Recovery messages reported by the parser.
    pub fn parse_errors(&self) -> &[String] {
        &self.parse_errors
    }

    /// Detaches every element whose tag matches `exclude`, with its subtree.
    pub fn prune(&mut self, exclude: impl Fn(&str) -> bool) {
        let mut stack = vec![self.root()];
        let mut doomed = Vec::new();
        while let Some(id) = stack.pop() {
            for &child in &self.nodes[id].children {
                if self.tag(child).is_some_and(&exclude) {
                    doomed.push(child);
                } else {
                    stack.push(child);
                }
            }
        }
        for id in doomed {
            self.detach(id);
        }
    }

    fn add_node(&mut self, name: QualName, data: NodeData) -> NodeId {
        self.nodes.push(HtmlNode {
            name,
            data,
            parent: None,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|c| *c != id);
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        let children = &mut self.nodes[parent].children;
        let index = index.min(children.len());
        children.insert(index, child);
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent].children.last() {
            if let NodeData::Text(existing) = &mut self.nodes[last].data {
                existing.push_str(text);
                return;
            }
        }
        let id = self.add_node(empty_name(), NodeData::Text(text.to_owned()));
        self.append_child(parent, id);
    }

    fn insert_text_before(&mut self, parent: NodeId, index: usize, text: &str) {
        if index > 0 {
            let prev = self.nodes[parent].children[index - 1];
            if let NodeData::Text(existing) = &mut self.nodes[prev].data {
                existing.push_str(text);
                return;
            }
        }
        let id = self.add_node(empty_name(), NodeData::Text(text.to_owned()));
        self.insert_child(parent, index, id);
    }

    fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes[id].parent?;
        let index = self.nodes[parent].children.iter().position(|c| *c == id)?;
        Some((parent, index))
    }
}

fn empty_name() -> QualName {
    QualName::new(None, "".into(), "".into())
}

#[derive(Default)]
struct FragmentBuilder {
    state: RefCell<Fragment>,
}

impl TreeSink for FragmentBuilder {
    type Handle = NodeId;
    type Output = Fragment;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        self.state.into_inner()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.state.borrow_mut().parse_errors.push(msg.into_owned());
    }

    fn get_document(&self) -> Self::Handle {
        self.state.borrow().root()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.state.borrow(), |fragment| &fragment.nodes[*target].name)
    }

    fn create_element(&self, name: QualName, _attrs: Vec<Attribute>, _flags: ElementFlags) -> Self::Handle {
        self.state.borrow_mut().add_node(name, NodeData::Element)
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.state.borrow_mut().add_node(empty_name(), NodeData::Comment)
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        self.state.borrow_mut().add_node(empty_name(), NodeData::Comment)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut fragment = self.state.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => fragment.append_child(*parent, node),
            NodeOrText::AppendText(text) => fragment.append_text(*parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.state.borrow().nodes[*element].parent.is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(&self, _name: StrTendril, _public_id: StrTendril, _system_id: StrTendril) {}

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut fragment = self.state.borrow_mut();
        let Some((parent, index)) = fragment.index_in_parent(*sibling) else {
            return;
        };
        match new_node {
            NodeOrText::AppendNode(node) => {
                // Re-resolve after detaching in case `node` was an earlier sibling.
                fragment.detach(node);
                let index = fragment
                    .index_in_parent(*sibling)
                    .map_or(index, |(_, idx)| idx);
                fragment.insert_child(parent, index, node);
            }
            NodeOrText::AppendText(text) => fragment.insert_text_before(parent, index, &text),
        }
    }

    fn add_attrs_if_missing(&self, _target: &Self::Handle, _attrs: Vec<Attribute>) {}

    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.state.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut fragment = self.state.borrow_mut();
        let children = std::mem::take(&mut fragment.nodes[*node].children);
        for child in children {
            fragment.nodes[child].parent = Some(*new_parent);
            fragment.nodes[*new_parent].children.push(child);
        }
    }

    fn is_mathml_annotation_xml_integration_point(&self, _handle: &Self::Handle) -> bool {
        false
    }

    fn set_current_line(&self, _line_number: u64) {}

    fn complete_script(&self, _node: &Self::Handle) -> NextParserState {
        NextParserState::Continue
    }

    fn allow_declarative_shadow_roots(&self, _intended_parent: &Self::Handle) -> bool {
        false
    }

    fn attach_declarative_shadow(
        &self,
        _location: &Self::Handle,
        _template: &Self::Handle,
        _attrs: Vec<Attribute>,
    ) -> Result<(), String> {
        Err("declarative shadow roots are not supported".to_owned())
    }
}
