use crate::error::ConfigurationError;
use crate::events::{EventHandler, HandlerSlot, KeyHandlers};
use crate::view::ViewId;
use std::collections::HashMap;
use tracing::trace;

/// A node in the view tree.
#[derive(Debug)]
struct TreeNode {
    /// The immediate superview. Only the root has none.
    superview: Option<ViewId>,
    /// An ordered list of all subviews, owned by this node.
    subviews: Vec<ViewId>,
    /// Key handlers registered on this view.
    handlers: KeyHandlers,
}

impl TreeNode {
    fn new(superview: Option<ViewId>) -> TreeNode {
        TreeNode {
            superview,
            subviews: Vec::new(),
            handlers: KeyHandlers::default(),
        }
    }
}

/// A view tree; holds the view hierarchy that key events are routed through.
///
/// Every view other than the root is owned by exactly one superview, so the superview links
/// always form a tree.
#[derive(Debug)]
pub struct ViewTree {
    nodes: HashMap<ViewId, TreeNode>,
    root: ViewId,
}

impl Default for ViewTree {
    fn default() -> Self {
        ViewTree::new()
    }
}

impl ViewTree {
    /// Creates a tree containing only a root view.
    pub fn new() -> ViewTree {
        let root = ViewId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root, TreeNode::new(None));
        ViewTree { nodes, root }
    }

    pub fn root(&self) -> ViewId {
        self.root
    }

    /// Number of views, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true in practice; the root is always present.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn node(&self, id: ViewId) -> Result<&TreeNode, ConfigurationError> {
        self.nodes.get(&id).ok_or(ConfigurationError::NoSuchView(id))
    }

    fn node_mut(&mut self, id: ViewId) -> Result<&mut TreeNode, ConfigurationError> {
        self.nodes
            .get_mut(&id)
            .ok_or(ConfigurationError::NoSuchView(id))
    }

    /// Returns the superview, or None for the root.
    pub fn superview(&self, id: ViewId) -> Result<Option<ViewId>, ConfigurationError> {
        Ok(self.node(id)?.superview)
    }

    /// Returns the subviews in order.
    pub fn subviews(&self, id: ViewId) -> Result<&[ViewId], ConfigurationError> {
        Ok(&self.node(id)?.subviews)
    }

    /// Appends a new subview to a view.
    pub fn add_subview(&mut self, superview: ViewId) -> Result<ViewId, ConfigurationError> {
        let index = self.node(superview)?.subviews.len();
        self.insert_subview(superview, index)
    }

    /// Inserts a new subview at the given position.
    ///
    /// Indices past the end append.
    pub fn insert_subview(
        &mut self,
        superview: ViewId,
        index: usize,
    ) -> Result<ViewId, ConfigurationError> {
        let id = ViewId::new();
        let superview_node = self.node_mut(superview)?;
        let index = index.min(superview_node.subviews.len());
        superview_node.subviews.insert(index, id);
        self.nodes.insert(id, TreeNode::new(Some(superview)));
        trace!(view = %id, superview = %superview, index, "added subview");
        Ok(id)
    }

    /// Removes a view and all of its subviews.
    pub fn remove_view(&mut self, id: ViewId) -> Result<(), ConfigurationError> {
        if id == self.root {
            return Err(ConfigurationError::RemoveRoot);
        }
        let superview = self.node(id)?.superview;
        if let Some(superview) = superview {
            // the superview may be gone if the tree is inconsistent; that’s fine here
            if let Some(node) = self.nodes.get_mut(&superview) {
                node.subviews.retain(|subview| *subview != id);
            }
        }
        self.remove_subtree(id);
        trace!(view = %id, "removed view");
        Ok(())
    }

    /// Removes a view and its subviews without touching the superview’s subview list.
    fn remove_subtree(&mut self, id: ViewId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                stack.extend(node.subviews);
            }
        }
    }

    pub fn handlers(&self, id: ViewId) -> Result<&KeyHandlers, ConfigurationError> {
        Ok(&self.node(id)?.handlers)
    }

    pub fn handlers_mut(&mut self, id: ViewId) -> Result<&mut KeyHandlers, ConfigurationError> {
        Ok(&mut self.node_mut(id)?.handlers)
    }

    /// Fills or clears a single handler slot.
    pub fn set_handler(
        &mut self,
        id: ViewId,
        slot: HandlerSlot,
        handler: Option<EventHandler>,
    ) -> Result<(), ConfigurationError> {
        *self.handlers_mut(id)?.slot_mut(slot) = handler;
        Ok(())
    }

    /// Returns the path from the root to the given view, both inclusive.
    ///
    /// # Errors
    /// - `NoSuchView` if the view (or one of its ancestors) is not in this tree
    /// - `Detached` if following superviews ends somewhere other than the root
    /// - `Cycle` if following superviews never ends
    pub fn ancestor_chain(&self, id: ViewId) -> Result<Vec<ViewId>, ConfigurationError> {
        let mut chain = vec![id];
        let mut node = self.node(id)?;
        while let Some(superview) = node.superview {
            if chain.len() > self.nodes.len() {
                return Err(ConfigurationError::Cycle(superview));
            }
            node = self.node(superview)?;
            chain.push(superview);
        }
        let top = chain[chain.len() - 1];
        if top != self.root {
            return Err(ConfigurationError::Detached(id));
        }
        chain.reverse();
        Ok(chain)
    }
}

#[cfg(test)]
impl ViewTree {
    /// Points a view at a different superview without fixing up subview lists.
    pub(crate) fn force_superview(&mut self, id: ViewId, superview: Option<ViewId>) {
        self.nodes.get_mut(&id).unwrap().superview = superview;
    }
}
