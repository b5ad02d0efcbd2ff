use log::debug;

use super::{Level, WalkerState};
use crate::error::TreeError;
use crate::tree::{BoxNode, QName};

/// Replace `items[index]` by what unwrapping it produces: the node itself,
/// anonymised, when it carries text; its children otherwise.
fn splice_unwrapped(items: &mut Vec<BoxNode>, index: usize) {
    let Some(target) = items.get(index).cloned() else {
        return;
    };
    if target.text().is_some() {
        items[index] = target.with_name(None);
    } else {
        items.splice(index..=index, target.children());
    }
}

/// All siblings of a level plus the index of the one on the path.
fn level_items(level: &Level) -> (usize, Vec<BoxNode>) {
    let mut siblings = level.siblings.clone();
    let index = siblings.rewind().saturating_sub(1);
    (index, siblings.consume())
}

impl WalkerState {
    /// Install `replacement` as the current node, rebuilding every node on
    /// the path and the root. Nothing is committed unless every rebuild
    /// succeeds.
    pub(super) fn update_current(&mut self, replacement: BoxNode) -> Result<(), TreeError> {
        let mut rebuilt = replacement.clone();
        let mut path = Vec::with_capacity(self.path.len());
        for level in self.path.iter().rev() {
            let (index, mut items) = level_items(level);
            let slot = items
                .get_mut(index)
                .ok_or_else(|| TreeError::structural("walker level is not positioned on a child"))?;
            *slot = rebuilt;
            let parent = level.parent.with_children(items)?;
            let mut siblings = parent.children();
            siblings.forward(index + 1);
            path.push(Level {
                parent: parent.clone(),
                siblings,
            });
            rebuilt = parent;
        }
        path.reverse();
        self.replace_root(rebuilt)?;
        self.path = path;
        self.current = replacement;
        Ok(())
    }

    fn replace_root(&mut self, root: BoxNode) -> Result<(), TreeError> {
        if let Some(enclosing) = &self.enclosing {
            let mut outer = enclosing
                .try_borrow_mut()
                .map_err(|_| TreeError::ConcurrentModification)?;
            if !BoxNode::ptr_eq(&outer.current, &self.root) {
                return Err(TreeError::ConcurrentModification);
            }
            debug!("forwarding sub tree write to enclosing walker at depth {}", outer.path.len());
            outer.update_current(root.clone())?;
        }
        self.root = root;
        Ok(())
    }

    pub(super) fn rename_current(&mut self, name: Option<QName>) -> Result<BoxNode, TreeError> {
        debug!(
            "rename {} -> {}",
            display_name(self.current.name()),
            display_name(name.as_ref())
        );
        let renamed = self.current.with_name(name);
        self.update_current(renamed)?;
        Ok(self.current.clone())
    }

    pub(super) fn delete_first_child(&mut self) -> Result<BoxNode, TreeError> {
        let mut children = self.current.children();
        if children.next().is_none() {
            return Err(TreeError::structural("there is no first child"));
        }
        debug!("delete first child of {}", display_name(self.current.name()));
        let replacement = self.current.with_children(children)?;
        self.update_current(replacement)?;
        Ok(self.current.clone())
    }

    pub(super) fn unwrap_first_child(&mut self) -> Result<BoxNode, TreeError> {
        let mut items = self.current.children().consume();
        if items.is_empty() {
            return Err(TreeError::structural("there is no first child"));
        }
        debug!("unwrap first child of {}", display_name(self.current.name()));
        splice_unwrapped(&mut items, 0);
        let replacement = self.current.with_children(items)?;
        self.update_current(replacement)?;
        Ok(self.current.clone())
    }

    pub(super) fn unwrap_next_sibling(&mut self) -> Result<BoxNode, TreeError> {
        let level = match self.path.last() {
            Some(level) if level.siblings.has_next() => level,
            _ => return Err(TreeError::structural("there is no next sibling")),
        };
        let (index, mut items) = level_items(level);
        debug!("unwrap next sibling of {}", display_name(self.current.name()));
        splice_unwrapped(&mut items, index + 1);
        let parent = level.parent.with_children(items)?;

        let mut scratch = self.clone();
        scratch.parent();
        scratch.update_current(parent)?;
        scratch.land_on_child(index);
        *self = scratch;
        Ok(self.current.clone())
    }

    pub(super) fn unwrap_parent(&mut self) -> Result<BoxNode, TreeError> {
        let depth = self.path.len();
        match depth {
            0 => return Err(TreeError::structural("there is no parent")),
            1 => return Err(TreeError::structural("root can not be unwrapped")),
            _ => {}
        }
        let (inner, outer) = (&self.path[depth - 1], &self.path[depth - 2]);
        let (index, inner_items) = level_items(inner);
        let (parent_index, mut items) = level_items(outer);
        debug!(
            "unwrap parent {} of {}",
            display_name(inner.parent.name()),
            display_name(self.current.name())
        );
        items.splice(parent_index..=parent_index, inner_items);
        let grandparent = outer.parent.with_children(items)?;

        let mut scratch = self.clone();
        scratch.parent();
        scratch.parent();
        scratch.update_current(grandparent)?;
        scratch.land_on_child(parent_index + index);
        *self = scratch;
        Ok(self.current.clone())
    }

    /// Move from current to its `index`-th child.
    fn land_on_child(&mut self, index: usize) {
        if self.first_child().is_some() {
            for _ in 0..index {
                self.next_sibling();
            }
        }
    }
}

fn display_name(name: Option<&QName>) -> String {
    name.map_or_else(|| "(anonymous)".to_string(), ToString::to_string)
}
