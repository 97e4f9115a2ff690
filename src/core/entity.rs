//! Handle-based entity references
//!
//! Everything that can be targeted lives behind an opaque integer handle.
//! Handles come from a single monotonically increasing counter, so an id is
//! never reused within a match, even after the entity it named is gone.
//! Collaborators hold handles instead of references, and resolve them through
//! the [`HandleRegistry`] when they need the live entity.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two match participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerHandle(u32);

impl PlayerHandle {
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P#{}", self.0)
    }
}

/// A minion instance on a board (distinct from its card definition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MinionHandle(u32);

impl MinionHandle {
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MinionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M#{}", self.0)
    }
}

/// Anything that can attack, be attacked, or take damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterHandle {
    /// The player's hero
    Player(PlayerHandle),
    Minion(MinionHandle),
}

impl CharacterHandle {
    pub fn as_minion(&self) -> Option<MinionHandle> {
        match self {
            CharacterHandle::Minion(m) => Some(*m),
            CharacterHandle::Player(_) => None,
        }
    }

    pub fn as_player(&self) -> Option<PlayerHandle> {
        match self {
            CharacterHandle::Player(p) => Some(*p),
            CharacterHandle::Minion(_) => None,
        }
    }
}

impl From<PlayerHandle> for CharacterHandle {
    fn from(p: PlayerHandle) -> Self {
        CharacterHandle::Player(p)
    }
}

impl From<MinionHandle> for CharacterHandle {
    fn from(m: MinionHandle) -> Self {
        CharacterHandle::Minion(m)
    }
}

impl fmt::Display for CharacterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterHandle::Player(p) => write!(f, "{p}"),
            CharacterHandle::Minion(m) => write!(f, "{m}"),
        }
    }
}

/// What a live handle points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityRef {
    /// A player, sitting at `seat` (0 or 1)
    Player { seat: usize },
    /// A minion, on `owner`'s board
    Minion { owner: PlayerHandle },
}

/// Central table of live handles
///
/// Uses FxHashMap for fast hashing of integer keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandleRegistry {
    entries: FxHashMap<u32, EntityRef>,
    next_id: u32,
}

impl HandleRegistry {
    pub fn new() -> Self {
        HandleRegistry {
            entries: FxHashMap::default(),
            next_id: 1,
        }
    }

    fn allocate(&mut self, entity: EntityRef) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.register(id, entity);
        id
    }

    /// Record a live entity under `id`.
    ///
    /// # Panics
    ///
    /// Registering an id that is already live means two entities would share
    /// a handle. That cannot be recovered from, so it aborts.
    fn register(&mut self, id: u32, entity: EntityRef) {
        let previous = self.entries.insert(id, entity);
        assert!(
            previous.is_none(),
            "handle {id} registered twice ({previous:?} -> {entity:?})"
        );
    }

    pub fn allocate_player(&mut self, seat: usize) -> PlayerHandle {
        PlayerHandle(self.allocate(EntityRef::Player { seat }))
    }

    pub fn allocate_minion(&mut self, owner: PlayerHandle) -> MinionHandle {
        MinionHandle(self.allocate(EntityRef::Minion { owner }))
    }

    /// Forget a minion. Its handle never resolves again.
    pub fn release(&mut self, handle: MinionHandle) -> Option<EntityRef> {
        self.entries.remove(&handle.0)
    }

    pub fn resolve_player(&self, handle: PlayerHandle) -> Option<usize> {
        match self.entries.get(&handle.0)? {
            EntityRef::Player { seat } => Some(*seat),
            EntityRef::Minion { .. } => None,
        }
    }

    pub fn resolve_minion(&self, handle: MinionHandle) -> Option<PlayerHandle> {
        match self.entries.get(&handle.0)? {
            EntityRef::Minion { owner } => Some(*owner),
            EntityRef::Player { .. } => None,
        }
    }

    pub fn resolve(&self, handle: CharacterHandle) -> Option<EntityRef> {
        let id = match handle {
            CharacterHandle::Player(p) => p.0,
            CharacterHandle::Minion(m) => m.0,
        };
        self.entries.get(&id).copied()
    }

    pub fn is_live(&self, handle: CharacterHandle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Number of live handles (players included)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
