//! Entity storage on top of `hecs`
//!
//! Each pool owns a `hecs::World` holding one component type. `hecs::Entity`
//! carries a generation, so a handle to a despawned entity never resolves to
//! whatever later reuses its slot. Iteration follows spawn order, which the
//! world itself does not guarantee, so the pool keeps its own sequence.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use hecs::{Component, Entity, Ref, World};

/// Typed reference to a pooled entity
pub struct Handle<T> {
    entity: Entity,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(entity: Entity) -> Self {
        Self {
            entity,
            _marker: PhantomData,
        }
    }
}

// Manual impls: derives would demand the same traits from T
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:?})", self.entity)
    }
}

pub struct Pool<T> {
    world: World,
    /// Live handles, oldest first
    order: Vec<Handle<T>>,
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool").field("len", &self.order.len()).finish()
    }
}

impl<T: Component> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> Pool<T> {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> Handle<T> {
        let handle = Handle::new(self.world.spawn((value,)));
        self.order.push(handle);
        handle
    }

    /// Despawn an entity. Stale handles return None and change nothing.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let value = self.world.remove_one::<T>(handle.entity).ok()?;
        // The entity is empty now; its id goes back to the world
        let _ = self.world.despawn(handle.entity);
        if let Some(pos) = self.order.iter().position(|h| *h == handle) {
            self.order.remove(pos);
        }
        Some(value)
    }

    pub fn get(&self, handle: Handle<T>) -> Option<Ref<'_, T>> {
        self.world.get::<&T>(handle.entity).ok()
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.world.query_one_mut::<&mut T>(handle.entity).ok()
    }

    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.world.get::<&T>(handle.entity).is_ok()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Snapshot of live handles in spawn order.
    ///
    /// Safe to walk while inserting or removing; removed entries simply
    /// fail to resolve.
    pub fn handles(&self) -> Vec<Handle<T>> {
        self.order.clone()
    }

    /// Live entities in spawn order
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, Ref<'_, T>)> + '_ {
        self.order.iter().filter_map(move |&h| self.get(h).map(|v| (h, v)))
    }
}
