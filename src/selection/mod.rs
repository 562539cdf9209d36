use crate::events::{EventBus, InteractionEvent};
use crate::host::SceneQuery;
use std::collections::HashSet;
use std::hash::Hash;

pub use self::volume::{SelectionVolume, VolumeFilter};

pub mod stylus;
mod volume;

/// Maps a collidable to the logical object that should be hovered or selected for it.
pub type ObjectRelation<S> =
    Box<dyn Fn(&S, <S as SceneQuery>::Object) -> Option<<S as SceneQuery>::Object>>;

/// Walks up the parent chain of `collided` until an object with a physical body is found.
pub fn find_rigid_body<S: SceneQuery + ?Sized>(scene: &S, collided: S::Object) -> Option<S::Object> {
    let mut object = collided;
    while !scene.has_body(object) {
        object = scene.parent(object)?;
    }
    Some(object)
}

/// The selected objects, diffed once per tick against the previous tick.
#[derive(Clone, Debug)]
pub struct SelectionSet<O> {
    current: HashSet<O>,
    previous: HashSet<O>,
}

impl<O> Default for SelectionSet<O> {
    fn default() -> Self {
        Self {
            current: HashSet::new(),
            previous: HashSet::new(),
        }
    }
}

impl<O: Copy + Eq + Hash> SelectionSet<O> {
    pub fn contains(&self, object: O) -> bool {
        self.current.contains(&object)
    }

    /// Returns `true` if `object` was not selected yet.
    pub fn insert(&mut self, object: O) -> bool {
        self.current.insert(object)
    }

    /// Returns `true` if `object` was selected.
    pub fn remove(&mut self, object: O) -> bool {
        self.current.remove(&object)
    }

    pub fn clear(&mut self) {
        self.current.clear();
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = O> + '_ {
        self.current.iter().copied()
    }

    pub fn sorted(&self) -> Vec<O>
    where
        O: Ord,
    {
        let mut result: Vec<_> = self.iter().collect();
        result.sort();
        result
    }

    /// Emits `Deselected` for every object that left the set since the last call, then `Selected`
    /// for every newcomer.
    pub fn notify_changes(&mut self, events: &mut EventBus<O>) {
        for object in self.previous.difference(&self.current) {
            events.emit(InteractionEvent::Deselected(*object));
        }

        for object in self.current.difference(&self.previous) {
            events.emit(InteractionEvent::Selected(*object));
        }

        if self.previous != self.current {
            self.previous.clone_from(&self.current);
        }
    }
}
