//! Doubly linked recency list backed by a [`SlotArena`].
//!
//! Nodes live in the arena and point at each other through [`SlotId`]
//! handles, so the list never holds references into itself. Dropping or
//! clearing the arena releases every node at once.
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬──────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                   │
//!   ├────────┼──────────────────────────────────────────────┤
//!   │ id_0   │ { value: C, prev: None,       next: id_2 }   │
//!   │ id_1   │ { value: A, prev: Some(id_2), next: None }   │
//!   │ id_2   │ { value: B, prev: Some(id_0), next: id_1 }   │
//!   └────────┴──────────────────────────────────────────────┘
//!
//!   head (MRU) ─► [C] ◄──► [B] ◄──► [A] ◄── tail (LRU)
//! ```
//!
//! All link edits go through `detach`/`attach_front`/`attach_back`; callers
//! only see push, move, remove and pop.

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Arena-backed list ordered from most recent (front) to least recent (back).
#[derive(Debug, Clone)]
pub struct RecencyList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> RecencyList<T> {
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` is a live node of this list.
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Value at the front (most recent).
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id))
    }

    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    /// Value at the back (least recent).
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Iterates values from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
            remaining: self.len(),
        }
    }

    /// Iterates node handles from front to back.
    pub fn iter_ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        let mut current = self.head;
        std::iter::from_fn(move || {
            let id = current?;
            current = self.arena.get(id)?.next;
            Some(id)
        })
    }

    /// Links a new node at the front and returns its handle.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.attach_front(id);
        id
    }

    /// Links a new node at the back and returns its handle.
    pub fn push_back(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.attach_back(id);
        id
    }

    /// Unlinks and returns the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    /// Unlinks and returns the front value.
    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.head?;
        self.remove(id)
    }

    /// Unlinks node `id` and frees its slot.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Moves `id` to the front. Returns `false` if `id` is not in the list.
    ///
    /// Moving the current head leaves every link untouched.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Drops every node and releases arena storage.
    pub fn clear_shrink(&mut self) {
        self.clear();
        self.arena.shrink_to_fit();
    }

    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.arena.approx_bytes()
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.arena.get_mut(prev_id) {
                    prev_node.next = next;
                }
            },
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(next_node) = self.arena.get_mut(next_id) {
                    next_node.prev = prev;
                }
            },
            None => self.tail = prev,
        }

        let node = self.arena.get_mut(id)?;
        node.prev = None;
        node.next = None;
        Some(())
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head_id) => {
                if let Some(head_node) = self.arena.get_mut(head_id) {
                    head_node.prev = Some(id);
                }
            },
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    fn attach_back(&mut self, id: SlotId) {
        let old_tail = self.tail;
        if let Some(node) = self.arena.get_mut(id) {
            node.next = None;
            node.prev = old_tail;
        }
        match old_tail {
            Some(tail_id) => {
                if let Some(tail_node) = self.arena.get_mut(tail_id) {
                    tail_node.next = Some(id);
                }
            },
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    /// Walks the chain from head and checks link symmetry, endpoint links,
    /// and that the walk length matches the arena population.
    pub fn validate(&self) -> Result<(), String> {
        match (self.head, self.tail) {
            (None, None) => {
                return if self.arena.is_empty() {
                    Ok(())
                } else {
                    Err(format!(
                        "list has no endpoints but arena holds {} nodes",
                        self.arena.len()
                    ))
                };
            },
            (Some(_), None) | (None, Some(_)) => {
                return Err("exactly one of head/tail is set".to_string());
            },
            _ => {},
        }

        let mut count = 0usize;
        let mut prev: Option<SlotId> = None;
        let mut current = self.head;
        while let Some(id) = current {
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| format!("stale handle {:?} reachable from head", id))?;
            if node.prev != prev {
                return Err(format!(
                    "node {:?} has prev {:?}, expected {:?}",
                    id, node.prev, prev
                ));
            }
            count += 1;
            if count > self.arena.len() {
                return Err("cycle detected while walking from head".to_string());
            }
            prev = Some(id);
            current = node.next;
        }

        if prev != self.tail {
            return Err(format!(
                "walk ended at {:?} but tail is {:?}",
                prev, self.tail
            ));
        }
        if count != self.arena.len() {
            return Err(format!(
                "walked {} nodes but arena holds {}",
                count,
                self.arena.len()
            ));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(msg) = self.validate() {
            panic!("recency list invariant violated: {msg}");
        }
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over list values.
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
