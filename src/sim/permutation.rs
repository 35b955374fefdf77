//! Slot permutation tracking
//!
//! Two inverse maps, slot -> jar and jar -> slot (stored as `Container::slot`),
//! always updated together. Balls only remember their owning jar, so every
//! swap relocates them for free.

use serde::{Deserialize, Serialize};

use super::state::{Container, ContainerId, Token, TokenId};

/// Owns the jars, their slots and the hidden balls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermutationTracker {
    /// Indexed by `ContainerId`
    containers: Vec<Container>,
    /// Indexed by slot
    by_slot: Vec<ContainerId>,
    /// Active balls (sorted by id)
    tokens: Vec<Token>,
}

impl PermutationTracker {
    /// Build the identity permutation: jar `i` sits in slot `i`
    pub fn new(mut containers: Vec<Container>) -> Self {
        for (i, container) in containers.iter_mut().enumerate() {
            container.id = ContainerId(i);
            container.slot = i;
        }
        let by_slot = (0..containers.len()).map(ContainerId).collect();
        Self {
            containers,
            by_slot,
            tokens: Vec::new(),
        }
    }

    /// Number of jars (and slots)
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(id.index())
    }

    /// Jars that may hide a ball, in id order
    pub fn active_ids(&self) -> Vec<ContainerId> {
        self.containers
            .iter()
            .filter(|c| c.active)
            .map(|c| c.id)
            .collect()
    }

    /// Exchange the jars in two slots. Returns the jars that were in
    /// `slot_a` and `slot_b` before the swap, or `None` if either slot is out
    /// of range. Swapping a slot with itself changes nothing.
    pub fn apply_swap(&mut self, slot_a: usize, slot_b: usize) -> Option<(ContainerId, ContainerId)> {
        let container_a = *self.by_slot.get(slot_a)?;
        let container_b = *self.by_slot.get(slot_b)?;
        if slot_a == slot_b {
            return Some((container_a, container_b));
        }

        self.by_slot.swap(slot_a, slot_b);
        self.containers[container_a.index()].slot = slot_b;
        self.containers[container_b.index()].slot = slot_a;

        Some((container_a, container_b))
    }

    /// Jar currently sitting in `slot`
    pub fn container_at(&self, slot: usize) -> Option<ContainerId> {
        self.by_slot.get(slot).copied()
    }

    /// Current slot of a jar
    pub fn slot_of(&self, id: ContainerId) -> Option<usize> {
        self.containers.get(id.index()).map(|c| c.slot)
    }

    /// Current slot of a ball, derived from its owner
    pub fn token_slot(&self, id: TokenId) -> Option<usize> {
        let token = self.tokens.iter().find(|t| t.id == id)?;
        self.slot_of(token.owner)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Hide one fresh ball under each given jar (ids 0, 1, ...)
    pub fn place_tokens(&mut self, owners: &[ContainerId]) {
        self.tokens = owners
            .iter()
            .enumerate()
            .map(|(i, owner)| Token {
                id: TokenId(i as u32),
                owner: *owner,
            })
            .collect();
    }

    /// Discard all balls after the reveal
    pub fn clear_tokens(&mut self) {
        self.tokens.clear();
    }

    /// Balls hidden under a jar
    pub fn tokens_in(&self, id: ContainerId) -> Vec<TokenId> {
        self.tokens
            .iter()
            .filter(|t| t.owner == id)
            .map(|t| t.id)
            .collect()
    }

    /// Whether a jar hides any ball
    pub fn holds_token(&self, id: ContainerId) -> bool {
        self.tokens.iter().any(|t| t.owner == id)
    }

    /// Check the slot <-> jar bijection (debug and tests)
    pub fn is_consistent(&self) -> bool {
        if self.by_slot.len() != self.containers.len() {
            return false;
        }
        let mut seen = vec![false; self.by_slot.len()];
        for (slot, id) in self.by_slot.iter().enumerate() {
            match self.containers.get(id.index()) {
                Some(c) if c.slot == slot && !seen[id.index()] => seen[id.index()] = true,
                _ => return false,
            }
        }
        true
    }
}
