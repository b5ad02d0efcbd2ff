//! Cursor over a persistent box tree.
//!
//! A [`TreeWalker`] keeps a path of sibling cursors from the root down to the
//! current node. Navigation only moves cursors. Mutations rebuild the nodes on
//! the path with copy-on-write and install a new root; nodes off the path are
//! shared with the previous version of the tree.

mod mutation;


use std::cell::RefCell;
use std::rc::Rc;

use crate::error::TreeError;
use crate::tree::{BoxNode, ListCursor, QName};

/// One step down the path: the node whose children are being walked, and a
/// cursor positioned just past the child on the path.
#[derive(Clone)]
struct Level {
    parent: BoxNode,
    siblings: ListCursor<BoxNode>,
}

#[derive(Clone)]
struct WalkerState {
    root: BoxNode,
    path: Vec<Level>,
    current: BoxNode,
    /// Set for walkers created by `sub_tree` below the root of another
    /// walker. Writes are forwarded there.
    enclosing: Option<Rc<RefCell<WalkerState>>>,
}

impl WalkerState {
    fn new(root: BoxNode, enclosing: Option<Rc<RefCell<WalkerState>>>) -> Self {
        Self {
            current: root.clone(),
            root,
            path: Vec::new(),
            enclosing,
        }
    }

    fn restore(&mut self, saved: (Vec<Level>, BoxNode)) {
        (self.path, self.current) = saved;
    }

    fn save(&self) -> (Vec<Level>, BoxNode) {
        (self.path.clone(), self.current.clone())
    }

    fn parent(&mut self) -> Option<BoxNode> {
        let level = self.path.pop()?;
        self.current = level.parent;
        Some(self.current.clone())
    }

    fn root(&mut self) -> BoxNode {
        while self.parent().is_some() {}
        self.current.clone()
    }

    fn has_previous_sibling(&self) -> bool {
        self.path.last().is_some_and(|level| level.siblings.position() >= 2)
    }

    fn has_next_sibling(&self) -> bool {
        self.path.last().is_some_and(|level| level.siblings.has_next())
    }

    fn previous_sibling(&mut self) -> Option<BoxNode> {
        if !self.has_previous_sibling() {
            return None;
        }
        let siblings = &mut self.path.last_mut()?.siblings;
        // step back over current; the cursor then sits just past the sibling
        siblings.previous();
        let sibling = siblings.peek_previous()?;
        self.current = sibling.clone();
        Some(sibling)
    }

    fn next_sibling(&mut self) -> Option<BoxNode> {
        let sibling = self.path.last_mut()?.siblings.next()?;
        self.current = sibling.clone();
        Some(sibling)
    }

    fn first_child(&mut self) -> Option<BoxNode> {
        let mut siblings = self.current.children();
        let child = siblings.next()?;
        let parent = std::mem::replace(&mut self.current, child.clone());
        self.path.push(Level { parent, siblings });
        Some(child)
    }

    /// Next node in document order outside current's subtree, never climbing
    /// above `floor`.
    fn advance_within(&mut self, floor: usize) -> Option<BoxNode> {
        while self.path.len() > floor {
            if let Some(sibling) = self.next_sibling() {
                return Some(sibling);
            }
            self.parent();
        }
        None
    }

    fn first_descendant_where<F>(&mut self, filter: &F) -> Option<BoxNode>
    where
        F: Fn(&BoxNode) -> bool,
    {
        let start_depth = self.path.len();
        loop {
            let next = match self.first_child() {
                Some(child) => child,
                // climbing back to start_depth leaves the walker where it began
                None => self.advance_within(start_depth)?,
            };
            if filter(&next) {
                return Some(next);
            }
        }
    }

    fn first_following(&mut self) -> Option<BoxNode> {
        for depth in (0..self.path.len()).rev() {
            if let Some(next) = self.path[depth].siblings.next() {
                self.path.truncate(depth + 1);
                self.current = next.clone();
                return Some(next);
            }
        }
        None
    }

    fn first_following_where<F>(&mut self, filter: &F) -> Option<BoxNode>
    where
        F: Fn(&BoxNode) -> bool,
    {
        let saved = self.save();
        while let Some(candidate) = self.first_following() {
            if filter(&candidate) {
                return Some(candidate);
            }
            if let Some(found) = self.first_descendant_where(filter) {
                return Some(found);
            }
        }
        self.restore(saved);
        None
    }

    fn descend_to_last_descendant(&mut self) {
        loop {
            let mut siblings = self.current.children();
            let Some(last) = siblings.by_ref().last() else {
                return;
            };
            let parent = std::mem::replace(&mut self.current, last);
            self.path.push(Level { parent, siblings });
        }
    }

    /// Walks backward in document order. Ancestors of the starting node are
    /// not on the preceding axis and are stepped over without testing.
    fn first_preceding_where<F>(&mut self, filter: &F) -> Option<BoxNode>
    where
        F: Fn(&BoxNode) -> bool,
    {
        let saved = self.save();
        let mut ancestor_depth = self.path.len();
        loop {
            if self.previous_sibling().is_some() {
                self.descend_to_last_descendant();
            } else {
                if self.parent().is_none() {
                    break;
                }
                if self.path.len() < ancestor_depth {
                    ancestor_depth = self.path.len();
                    continue;
                }
            }
            if filter(&self.current) {
                return Some(self.current.clone());
            }
        }
        self.restore(saved);
        None
    }

    fn first_parent_where<F>(&mut self, filter: &F) -> Option<BoxNode>
    where
        F: Fn(&BoxNode) -> bool,
    {
        let depth = (0..self.path.len())
            .rev()
            .find(|&depth| filter(&self.path[depth].parent))?;
        self.current = self.path[depth].parent.clone();
        self.path.truncate(depth);
        Some(self.current.clone())
    }
}

/// Walker over a box tree, with XPath-like axis navigation and copy-on-write
/// mutation.
///
/// Navigation never fails: a move that is not possible returns `None` and
/// leaves the walker where it was. Mutations return the new current node or
/// a [`TreeError`]; a failed mutation leaves the walker unchanged.
pub struct TreeWalker {
    state: Rc<RefCell<WalkerState>>,
}

impl TreeWalker {
    pub fn new(root: BoxNode) -> Self {
        Self::from_state(WalkerState::new(root, None))
    }

    fn from_state(state: WalkerState) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn current(&self) -> BoxNode {
        self.state.borrow().current.clone()
    }

    /// Root of the (sub)tree this walker covers, as of the last write.
    pub fn root_box(&self) -> BoxNode {
        self.state.borrow().root.clone()
    }

    /// Number of levels between the root and the current node.
    pub fn depth(&self) -> usize {
        self.state.borrow().path.len()
    }

    pub fn parent(&mut self) -> Option<BoxNode> {
        self.state.borrow_mut().parent()
    }

    /// Move to the root and return it.
    pub fn root(&mut self) -> BoxNode {
        self.state.borrow_mut().root()
    }

    pub fn has_previous_sibling(&self) -> bool {
        self.state.borrow().has_previous_sibling()
    }

    pub fn has_next_sibling(&self) -> bool {
        self.state.borrow().has_next_sibling()
    }

    pub fn previous_sibling(&mut self) -> Option<BoxNode> {
        self.state.borrow_mut().previous_sibling()
    }

    pub fn next_sibling(&mut self) -> Option<BoxNode> {
        self.state.borrow_mut().next_sibling()
    }

    pub fn first_child(&mut self) -> Option<BoxNode> {
        self.state.borrow_mut().first_child()
    }

    pub fn first_descendant(&mut self) -> Option<BoxNode> {
        self.first_child()
    }

    /// First node of current's subtree, in pre-order, that satisfies
    /// `filter`. The search never leaves the subtree.
    pub fn first_descendant_where<F>(&mut self, filter: F) -> Option<BoxNode>
    where
        F: Fn(&BoxNode) -> bool,
    {
        self.state.borrow_mut().first_descendant_where(&filter)
    }

    /// Next node in document order that is not a descendant of current.
    pub fn first_following(&mut self) -> Option<BoxNode> {
        self.state.borrow_mut().first_following()
    }

    pub fn first_following_where<F>(&mut self, filter: F) -> Option<BoxNode>
    where
        F: Fn(&BoxNode) -> bool,
    {
        self.state.borrow_mut().first_following_where(&filter)
    }

    /// Previous node in document order that is not an ancestor of current.
    pub fn first_preceding(&mut self) -> Option<BoxNode> {
        self.first_preceding_where(|_| true)
    }

    pub fn first_preceding_where<F>(&mut self, filter: F) -> Option<BoxNode>
    where
        F: Fn(&BoxNode) -> bool,
    {
        self.state.borrow_mut().first_preceding_where(&filter)
    }

    pub fn first_parent(&mut self) -> Option<BoxNode> {
        self.parent()
    }

    /// Nearest ancestor, the root included, that satisfies `filter`.
    pub fn first_parent_where<F>(&mut self, filter: F) -> Option<BoxNode>
    where
        F: Fn(&BoxNode) -> bool,
    {
        self.state.borrow_mut().first_parent_where(&filter)
    }

    pub fn rename_current(&mut self, name: impl Into<Option<QName>>) -> Result<BoxNode, TreeError> {
        self.state.borrow_mut().rename_current(name.into())
    }

    pub fn delete_first_child(&mut self) -> Result<BoxNode, TreeError> {
        self.state.borrow_mut().delete_first_child()
    }

    /// Replace current's first child by its children. A first child that
    /// carries text is kept, anonymised, instead.
    pub fn unwrap_first_child(&mut self) -> Result<BoxNode, TreeError> {
        self.state.borrow_mut().unwrap_first_child()
    }

    /// Same as [`unwrap_first_child`](Self::unwrap_first_child) for the
    /// sibling after current. The walker stays on current.
    pub fn unwrap_next_sibling(&mut self) -> Result<BoxNode, TreeError> {
        self.state.borrow_mut().unwrap_next_sibling()
    }

    /// Splice current and its siblings into the grandparent in place of the
    /// parent. The walker stays on current.
    pub fn unwrap_parent(&mut self) -> Result<BoxNode, TreeError> {
        self.state.borrow_mut().unwrap_parent()
    }

    /// A walker rooted at the current node.
    ///
    /// Writes made through it are forwarded to this walker, which must still
    /// be positioned on the same node at that time; otherwise the write fails
    /// with [`TreeError::ConcurrentModification`]. At the root this returns a
    /// walker sharing this one's state.
    pub fn sub_tree(&self) -> TreeWalker {
        let state = self.state.borrow();
        if state.path.is_empty() {
            return TreeWalker {
                state: Rc::clone(&self.state),
            };
        }
        TreeWalker::from_state(WalkerState::new(
            state.current.clone(),
            Some(Rc::clone(&self.state)),
        ))
    }
}

/// An independent walker: same position, own cursors.
impl Clone for TreeWalker {
    fn clone(&self) -> Self {
        Self::from_state(self.state.borrow().clone())
    }
}

impl std::fmt::Debug for TreeWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TreeWalker")
            .field("depth", &state.path.len())
            .field("current", &state.current.name().map(ToString::to_string))
            .field("sub_tree", &state.enclosing.is_some())
            .finish()
    }
}
