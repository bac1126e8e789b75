//! Identity-based diff of a child collection.

use std::collections::HashSet;

use tutor_core::domain::Identified;
use uuid::Uuid;

/// Statements needed to move a child collection from its persisted state to
/// its in-memory state.
#[derive(Debug)]
pub struct ChildChanges<'a, T> {
    pub updates: Vec<&'a T>,
    pub inserts: Vec<&'a T>,
    pub deletes: Vec<&'a T>,
}

impl<T> ChildChanges<'_, T> {
    /// True when nothing has to be inserted or deleted.
    pub fn is_settled(&self) -> bool {
        self.inserts.is_empty() && self.deletes.is_empty()
    }
}

/// Diff `before` (persisted) against `after` (in memory) by identity alone.
///
/// Every child of `after` already known to `before` is an update, even when
/// its content is unchanged or completely different. Unknown children are
/// inserts. Children only present in `before` are deletes.
pub fn reconcile<'a, T: Identified>(before: &'a [T], after: &'a [T]) -> ChildChanges<'a, T> {
    let known: HashSet<Uuid> = before.iter().map(Identified::identity).collect();
    let kept: HashSet<Uuid> = after.iter().map(Identified::identity).collect();

    let (updates, inserts): (Vec<&T>, Vec<&T>) = after
        .iter()
        .partition(|child| known.contains(&child.identity()));
    let deletes: Vec<&T> = before
        .iter()
        .filter(|child| !kept.contains(&child.identity()))
        .collect();

    ChildChanges {
        updates,
        inserts,
        deletes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::domain::Post;

    fn ids(children: &[&Post]) -> Vec<Uuid> {
        children.iter().map(|p| p.id()).collect()
    }

    #[test]
    fn test_reconcile_mixed_changes() {
        let a = Post::draft("A", "first");
        let b = Post::draft("B", "second");
        let c = Post::draft("C", "third");
        let d = Post::draft("D", "fourth");

        let mut a_edited = a.clone();
        a_edited.set_title("A'");
        a_edited.set_content("rewritten");

        let before = vec![a.clone(), b.clone(), c.clone()];
        let after = vec![a_edited, b.clone(), d.clone()];
        let changes = reconcile(&before, &after);

        assert_eq!(ids(&changes.updates), vec![a.id(), b.id()]);
        assert_eq!(changes.updates[0].title(), "A'");
        assert_eq!(ids(&changes.inserts), vec![d.id()]);
        assert_eq!(ids(&changes.deletes), vec![c.id()]);
    }

    #[test]
    fn test_reconcile_unchanged_collection_is_settled() {
        let children = vec![Post::draft("A", "1"), Post::draft("B", "2")];
        let changes = reconcile(&children, &children);

        assert!(changes.is_settled());
        assert_eq!(changes.updates.len(), 2);
    }

    #[test]
    fn test_reconcile_empty_sides() {
        let children = vec![Post::draft("A", "1")];

        let created = reconcile(&[], &children);
        assert_eq!(ids(&created.inserts), vec![children[0].id()]);
        assert!(created.updates.is_empty() && created.deletes.is_empty());

        let emptied = reconcile(&children, &[]);
        assert_eq!(ids(&emptied.deletes), vec![children[0].id()]);
        assert!(emptied.updates.is_empty() && emptied.inserts.is_empty());
    }
}
