//! In-memory page tree.
//!
//! # Architecture
//!
//! Pages are stored in a flat `Vec<Page>` with parent/children relationships
//! tracked by [`NodeId`] indices. This provides:
//! - O(1) lookups by [`PageId`] via an id index
//! - O(n) materialization from a flat, position-ordered page list
//! - children and roots kept in ascending `position` order
//!
//! The tree link is authoritative for the in-memory structure. A page's
//! `parent` field is the persisted reference and is refreshed from the tree
//! when the page is saved.

use std::collections::HashMap;

use trellis_store::{Page, PageId};

use crate::error::PageError;

/// Handle of a page inside one [`PageTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Page hierarchy of one site.
#[derive(Clone, Debug, Default)]
pub struct PageTree {
    pages: Vec<Page>,
    children: Vec<Vec<NodeId>>,
    parents: Vec<Option<NodeId>>,
    roots: Vec<NodeId>,
    id_index: HashMap<PageId, NodeId>,
}

impl PageTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a flat page list.
    ///
    /// Pages are linked to the parent they reference. The input order is
    /// kept among siblings with equal positions, so a position-ordered list
    /// yields position-ordered children.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::DuplicatePage`] if two pages share an id,
    /// [`PageError::MissingParent`] if a referenced parent is not in the list
    /// and [`PageError::Cycle`] if parent references loop.
    pub fn from_pages(pages: Vec<Page>) -> Result<Self, PageError> {
        let mut tree = Self::new();
        for page in pages {
            tree.push(page)?;
        }

        for index in 0..tree.pages.len() {
            let node = NodeId(index);
            let (page_id, parent_id) = (tree.pages[index].id, tree.pages[index].parent);
            match parent_id {
                Some(parent_id) => {
                    let parent = tree.node(parent_id).ok_or(PageError::MissingParent {
                        page: page_id,
                        parent: parent_id,
                    })?;
                    tree.link(node, parent);
                }
                None => tree.add_root(node),
            }
        }

        tree.check_reachable()?;
        Ok(tree)
    }

    /// Add a page, linking it below the parent it references.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::DuplicatePage`] if the id is already present and
    /// [`PageError::MissingParent`] if the referenced parent is not in the tree.
    pub fn insert(&mut self, page: Page) -> Result<NodeId, PageError> {
        let parent = match page.parent {
            Some(parent_id) => Some(self.node(parent_id).ok_or(PageError::MissingParent {
                page: page.id,
                parent: parent_id,
            })?),
            None => None,
        };

        let node = self.push(page)?;
        match parent {
            Some(parent) => self.link(node, parent),
            None => self.add_root(node),
        }
        Ok(node)
    }

    /// Move `child` (with its subtree) below `parent`.
    ///
    /// The child's `parent` reference is set to the parent's id, or cleared
    /// if the parent has not been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Cycle`] if `parent` is `child` or one of its
    /// descendants.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<(), PageError> {
        if self.subtree(child).contains(&parent) {
            return Err(PageError::Cycle(self.pages[child.0].id));
        }

        self.unlink(child);
        self.link(child, parent);
        self.pages[child.0].parent = self.pages[parent.0].id;
        Ok(())
    }

    /// Page by id.
    #[must_use]
    pub fn get(&self, id: PageId) -> Option<&Page> {
        self.node(id).map(|node| &self.pages[node.0])
    }

    /// Node of the page with `id`.
    #[must_use]
    pub fn node(&self, id: PageId) -> Option<NodeId> {
        self.id_index.get(&id).copied()
    }

    /// Page stored at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` comes from another tree and is out of range.
    #[must_use]
    pub fn page(&self, node: NodeId) -> &Page {
        &self.pages[node.0]
    }

    /// Mutable page stored at `node`.
    ///
    /// `id` and `parent` must not be changed through this reference: the id
    /// index and the links are not updated, so [`PageTree::get`] and
    /// [`PageTree::node`] would go stale. Use [`PageTree::attach`] to move
    /// pages; ids are assigned by [`PageManager::save`](crate::PageManager::save).
    ///
    /// # Panics
    ///
    /// Panics if `node` comes from another tree and is out of range.
    pub fn page_mut(&mut self, node: NodeId) -> &mut Page {
        &mut self.pages[node.0]
    }

    /// Children of `node` in position order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.children[node.0]
    }

    /// Parent of `node`, `None` for roots.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents[node.0]
    }

    /// Root nodes in position order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All pages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Page)> {
        self.pages
            .iter()
            .enumerate()
            .map(|(index, page)| (NodeId(index), page))
    }

    /// First page whose url equals `url`.
    #[must_use]
    pub fn get_by_url(&self, url: &str) -> Option<&Page> {
        self.pages
            .iter()
            .find(|page| page.url.as_deref() == Some(url))
    }

    /// `node` and all of its descendants, depth-first, parents first and
    /// children in position order.
    #[must_use]
    pub fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut visited = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            visited.push(current);
            stack.extend(self.children[current.0].iter().rev());
        }
        visited
    }

    /// Number of ancestors of `node`.
    #[must_use]
    pub fn depth(&self, node: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parents[node.0];
        while let Some(parent) = current {
            depth += 1;
            current = self.parents[parent.0];
        }
        depth
    }

    /// Consume the tree, returning pages in insertion order.
    #[must_use]
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    /// Record the id assigned to a saved page.
    pub(crate) fn assign_id(&mut self, node: NodeId, id: PageId) {
        self.pages[node.0].id = Some(id);
        self.id_index.insert(id, node);
    }

    /// Put back `id` and `parent` recorded before a failed save.
    pub(crate) fn restore_ids(
        &mut self,
        node: NodeId,
        id: Option<PageId>,
        parent: Option<PageId>,
    ) {
        let page = &mut self.pages[node.0];
        if let Some(current) = page.id
            && page.id != id
        {
            self.id_index.remove(&current);
        }
        page.id = id;
        page.parent = parent;
        if let Some(id) = id {
            self.id_index.insert(id, node);
        }
    }

    /// Fail if some page cannot be reached from a root.
    ///
    /// Every page has at most one parent, so unreachable pages sit in (or
    /// below) a parent loop.
    fn check_reachable(&self) -> Result<(), PageError> {
        let mut reached = vec![false; self.pages.len()];
        let mut stack: Vec<NodeId> = self.roots.clone();
        while let Some(current) = stack.pop() {
            reached[current.0] = true;
            stack.extend(self.children[current.0].iter());
        }

        match reached.iter().position(|&seen| !seen) {
            Some(index) => Err(PageError::Cycle(self.pages[index].id)),
            None => Ok(()),
        }
    }

    fn push(&mut self, page: Page) -> Result<NodeId, PageError> {
        let node = NodeId(self.pages.len());
        if let Some(id) = page.id {
            if self.id_index.contains_key(&id) {
                return Err(PageError::DuplicatePage(id));
            }
            self.id_index.insert(id, node);
        }

        self.pages.push(page);
        self.children.push(Vec::new());
        self.parents.push(None);
        Ok(node)
    }

    fn link(&mut self, child: NodeId, parent: NodeId) {
        let at = self.sorted_position(&self.children[parent.0], child);
        self.children[parent.0].insert(at, child);
        self.parents[child.0] = Some(parent);
    }

    fn add_root(&mut self, node: NodeId) {
        let at = self.sorted_position(&self.roots, node);
        self.roots.insert(at, node);
    }

    fn unlink(&mut self, node: NodeId) {
        match self.parents[node.0].take() {
            Some(parent) => self.children[parent.0].retain(|&c| c != node),
            None => self.roots.retain(|&r| r != node),
        }
    }

    /// Index after the last sibling whose position is not greater than the
    /// new node's position. Siblings are kept sorted, so appending in
    /// position order stays at the end.
    fn sorted_position(&self, siblings: &[NodeId], node: NodeId) -> usize {
        let position = self.pages[node.0].position;
        siblings.partition_point(|sibling| self.pages[sibling.0].position <= position)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn page(id: u64, parent: Option<u64>, name: &str, position: i32) -> Page {
        Page {
            id: Some(PageId(id)),
            parent: parent.map(PageId),
            name: name.to_owned(),
            position,
            ..Page::default()
        }
    }

    fn names(tree: &PageTree, nodes: &[NodeId]) -> Vec<String> {
        nodes.iter().map(|&n| tree.page(n).name.clone()).collect()
    }

    #[test]
    fn test_from_pages_links_children() {
        let tree = PageTree::from_pages(vec![
            page(1, None, "A", 1),
            page(2, Some(1), "B", 1),
            page(3, Some(2), "C", 1),
        ])
        .unwrap();

        let a = tree.node(PageId(1)).unwrap();
        let b = tree.node(PageId(2)).unwrap();
        let c = tree.node(PageId(3)).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.roots(), &[a]);
        assert_eq!(tree.children(a), &[b]);
        assert_eq!(tree.children(b), &[c]);
        assert_eq!(tree.parent(c), Some(b));
        assert_eq!(tree.depth(c), 2);
    }

    #[test]
    fn test_from_pages_child_before_parent() {
        let tree =
            PageTree::from_pages(vec![page(2, Some(1), "Child", 1), page(1, None, "Root", 2)])
                .unwrap();

        let root = tree.node(PageId(1)).unwrap();
        assert_eq!(names(&tree, tree.children(root)), vec!["Child"]);
        assert_eq!(names(&tree, tree.roots()), vec!["Root"]);
    }

    #[test]
    fn test_children_follow_position() {
        let tree = PageTree::from_pages(vec![
            page(1, None, "Root", 1),
            page(2, Some(1), "Second", 2),
            page(3, Some(1), "First", 1),
            page(4, Some(1), "Third", 3),
        ])
        .unwrap();

        let root = tree.node(PageId(1)).unwrap();
        assert_eq!(
            names(&tree, tree.children(root)),
            vec!["First", "Second", "Third"]
        );
    }

    #[test]
    fn test_from_pages_missing_parent() {
        let err = PageTree::from_pages(vec![page(2, Some(9), "Orphan", 1)]).unwrap_err();

        assert!(matches!(
            err,
            PageError::MissingParent {
                page: Some(PageId(2)),
                parent: PageId(9)
            }
        ));
    }

    #[test]
    fn test_from_pages_duplicate_id() {
        let err = PageTree::from_pages(vec![page(1, None, "A", 1), page(1, None, "B", 2)])
            .unwrap_err();

        assert!(matches!(err, PageError::DuplicatePage(PageId(1))));
    }

    #[test]
    fn test_from_pages_rejects_parent_loop() {
        let err = PageTree::from_pages(vec![
            page(1, None, "Root", 1),
            page(2, Some(3), "A", 1),
            page(3, Some(2), "B", 1),
        ])
        .unwrap_err();

        assert!(matches!(err, PageError::Cycle(Some(PageId(2)))));
    }

    #[test]
    fn test_from_pages_rejects_self_parent() {
        let err = PageTree::from_pages(vec![page(1, Some(1), "Loop", 1)]).unwrap_err();

        assert!(matches!(err, PageError::Cycle(Some(PageId(1)))));
    }

    #[test]
    fn test_from_pages_rejects_pages_below_loop() {
        let err = PageTree::from_pages(vec![
            page(1, Some(2), "A", 1),
            page(2, Some(1), "B", 1),
            page(3, Some(1), "Below", 1),
        ])
        .unwrap_err();

        assert!(matches!(err, PageError::Cycle(_)));
    }

    #[test]
    fn test_from_pages_many_siblings_keep_order() {
        let mut pages = vec![page(1, None, "Root", 1)];
        pages.extend((2..=5_001).map(|id| page(id, Some(1), "n", (id / 2) as i32)));

        let tree = PageTree::from_pages(pages).unwrap();

        let root = tree.node(PageId(1)).unwrap();
        let children = tree.children(root);
        assert_eq!(children.len(), 5_000);
        assert!(
            children
                .windows(2)
                .all(|w| tree.page(w[0]).position <= tree.page(w[1]).position)
        );
        // Equal positions keep input order
        assert_eq!(tree.page(children[0]).id, Some(PageId(2)));
        assert_eq!(tree.page(children[1]).id, Some(PageId(3)));
    }

    #[test]
    fn test_insert_between_siblings() {
        let mut tree = PageTree::from_pages(vec![
            page(1, None, "Root", 1),
            page(2, Some(1), "First", 1),
            page(3, Some(1), "Third", 3),
        ])
        .unwrap();

        tree.insert(page(4, Some(1), "Second", 2)).unwrap();

        let root = tree.node(PageId(1)).unwrap();
        assert_eq!(
            names(&tree, tree.children(root)),
            vec!["First", "Second", "Third"]
        );
    }

    #[test]
    fn test_restore_ids_updates_index() {
        let mut tree = PageTree::new();
        let node = tree.insert(Page::default()).unwrap();
        tree.assign_id(node, PageId(7));

        tree.restore_ids(node, None, None);

        assert!(tree.node(PageId(7)).is_none());
        assert_eq!(tree.page(node).id, None);
    }

    #[test]
    fn test_insert_links_to_referenced_parent() {
        let mut tree = PageTree::from_pages(vec![page(1, None, "Root", 1)]).unwrap();
        let new_page = Page {
            parent: Some(PageId(1)),
            name: "New".to_owned(),
            ..Page::default()
        };

        let node = tree.insert(new_page).unwrap();

        assert_eq!(tree.parent(node), tree.node(PageId(1)));
        assert_eq!(tree.roots().len(), 1);
    }

    #[test]
    fn test_insert_without_parent_is_root() {
        let mut tree = PageTree::new();

        let node = tree.insert(Page::default()).unwrap();

        assert_eq!(tree.roots(), &[node]);
        assert!(tree.node(PageId(1)).is_none());
    }

    #[test]
    fn test_attach_moves_subtree() {
        let mut tree = PageTree::from_pages(vec![
            page(1, None, "A", 1),
            page(2, None, "B", 2),
            page(3, Some(2), "C", 1),
        ])
        .unwrap();
        let a = tree.node(PageId(1)).unwrap();
        let b = tree.node(PageId(2)).unwrap();
        let c = tree.node(PageId(3)).unwrap();

        tree.attach(b, a).unwrap();

        assert_eq!(tree.roots(), &[a]);
        assert_eq!(tree.children(a), &[b]);
        assert_eq!(tree.page(b).parent, Some(PageId(1)));
        assert_eq!(tree.subtree(a), vec![a, b, c]);
    }

    #[test]
    fn test_attach_rejects_cycle() {
        let mut tree =
            PageTree::from_pages(vec![page(1, None, "A", 1), page(2, Some(1), "B", 1)]).unwrap();
        let a = tree.node(PageId(1)).unwrap();
        let b = tree.node(PageId(2)).unwrap();

        assert!(matches!(tree.attach(a, b), Err(PageError::Cycle(_))));
        assert!(matches!(tree.attach(a, a), Err(PageError::Cycle(_))));
    }

    #[test]
    fn test_subtree_is_preorder() {
        let tree = PageTree::from_pages(vec![
            page(1, None, "A", 1),
            page(2, Some(1), "B", 1),
            page(3, Some(2), "B1", 1),
            page(4, Some(1), "C", 2),
        ])
        .unwrap();

        let a = tree.node(PageId(1)).unwrap();
        assert_eq!(
            names(&tree, &tree.subtree(a)),
            vec!["A", "B", "B1", "C"]
        );
    }

    #[test]
    fn test_get_by_url() {
        let mut about = page(2, Some(1), "About", 1);
        about.url = Some("/about".to_owned());
        let tree = PageTree::from_pages(vec![page(1, None, "Home", 1), about]).unwrap();

        assert_eq!(tree.get_by_url("/about").map(|p| p.id), Some(Some(PageId(2))));
        assert!(tree.get_by_url("/missing").is_none());
    }
}
