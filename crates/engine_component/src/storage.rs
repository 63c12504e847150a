//! Dense per-type component storage.
//!
//! [`ComponentStorage<T>`] keeps every component of one type in a single
//! vector of slots. Slots never move: a freed slot goes onto a free list and
//! is reused by a later [`add`](ComponentStorage::add) with its generation
//! bumped, so outstanding [`SlotIndex`] handles are never silently redirected
//! to another component. A slot whose generation is exhausted is retired
//! instead of reused.

use std::any::Any;

use crate::component::{Component, ComponentTypeId, Frame};
use crate::error::{ComponentError, Result};
use crate::id::{ComponentId, SlotIndex};
use crate::system::ComponentSystem;

/// One storage position. `value` is `Some` while the slot is occupied.
#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    enabled: bool,
    value: Option<T>,
}

/// Storage and per-frame driver for all components of type `T`.
#[derive(Debug, Clone)]
pub struct ComponentStorage<T: Component> {
    slots: Vec<Slot<T>>,
    /// Indices of empty slots available for reuse, most recently freed last.
    free: Vec<u32>,
    /// Number of occupied slots.
    live: usize,
}

impl<T: Component> ComponentStorage<T> {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Store `value` in a fresh or recycled slot. New components start enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::StorageFull`] if no slot is free and the
    /// next index would not fit in a `u32`.
    pub fn add(&mut self, value: T) -> Result<SlotIndex> {
        let slot = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.enabled = true;
            slot.value = Some(value);
            SlotIndex::new(index, slot.generation)
        } else {
            let index = u32::try_from(self.slots.len())
                .map_err(|_| ComponentError::StorageFull(T::type_name()))?;
            self.slots.push(Slot {
                generation: 0,
                enabled: true,
                value: Some(value),
            });
            SlotIndex::new(index, 0)
        };
        self.live += 1;
        Ok(slot)
    }

    /// Empty the slot at `index` and make it reusable under the next
    /// generation. Slots at the last generation are retired instead, so no
    /// handle ever becomes valid a second time.
    fn release(free: &mut Vec<u32>, index: u32, slot: &mut Slot<T>) {
        slot.enabled = false;
        if let Some(next) = slot.generation.checked_add(1) {
            slot.generation = next;
            free.push(index);
        }
    }

    fn slot(&self, index: SlotIndex) -> Option<&Slot<T>> {
        self.slots
            .get(index.index as usize)
            .filter(|slot| slot.generation == index.generation && slot.value.is_some())
    }

    fn slot_mut(&mut self, index: SlotIndex) -> Option<&mut Slot<T>> {
        self.slots
            .get_mut(index.index as usize)
            .filter(|slot| slot.generation == index.generation && slot.value.is_some())
    }

    fn invalid(index: SlotIndex) -> ComponentError {
        ComponentError::InvalidComponentId(ComponentId::new(ComponentTypeId::of::<T>(), index))
    }

    /// Shared access to a live component.
    #[must_use]
    pub fn get(&self, index: SlotIndex) -> Option<&T> {
        self.slot(index).and_then(|slot| slot.value.as_ref())
    }

    /// Exclusive access to a live component.
    pub fn get_mut(&mut self, index: SlotIndex) -> Option<&mut T> {
        self.slot_mut(index).and_then(|slot| slot.value.as_mut())
    }

    /// Run `f` against the component in place and return its result.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidComponentId`] if the slot is empty,
    /// out of range, or stale. `f` is not called in that case.
    pub fn with<R>(&mut self, index: SlotIndex, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        self.get_mut(index).map(f).ok_or_else(|| Self::invalid(index))
    }

    /// Take the component out of its slot and free the slot for reuse.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidComponentId`] if the slot is not live.
    pub fn take(&mut self, index: SlotIndex) -> Result<T> {
        let value = self
            .slot_mut(index)
            .and_then(|slot| slot.value.take())
            .ok_or_else(|| Self::invalid(index))?;
        Self::release(&mut self.free, index.index, &mut self.slots[index.index as usize]);
        self.live -= 1;
        Ok(value)
    }

    /// Iterate over live components as `(slot, value, enabled)`, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &T, bool)> {
        // `add` never lets the slot count exceed the `u32` range.
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.value
                .as_ref()
                .map(|value| (SlotIndex::new(i as u32, slot.generation), value, slot.enabled))
        })
    }

    /// Number of live components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no component is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Total slots ever allocated, live or free.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentSystem for ComponentStorage<T> {
    fn type_name(&self) -> &'static str {
        T::type_name()
    }

    fn component_type(&self) -> ComponentTypeId {
        ComponentTypeId::of::<T>()
    }

    fn len(&self) -> usize {
        self.live
    }

    fn contains(&self, index: SlotIndex) -> bool {
        self.slot(index).is_some()
    }

    fn set_enabled(&mut self, index: SlotIndex, enabled: bool) -> Result<()> {
        let slot = self.slot_mut(index).ok_or_else(|| Self::invalid(index))?;
        slot.enabled = enabled;
        Ok(())
    }

    fn is_enabled(&self, index: SlotIndex) -> Result<bool> {
        self.slot(index)
            .map(|slot| slot.enabled)
            .ok_or_else(|| Self::invalid(index))
    }

    fn remove(&mut self, index: SlotIndex) -> Result<()> {
        self.take(index).map(drop)
    }

    fn encode(&self, index: SlotIndex) -> Result<Vec<u8>> {
        let value = self.get(index).ok_or_else(|| Self::invalid(index))?;
        Ok(rmp_serde::to_vec_named(value)?)
    }

    fn update(&mut self, frame: &Frame) -> usize {
        let mut processed = 0;
        for slot in &mut self.slots {
            if !slot.enabled {
                continue;
            }
            if let Some(value) = slot.value.as_mut() {
                value.update(frame);
                processed += 1;
            }
        }
        processed
    }

    fn shutdown(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                Self::release(&mut self.free, i as u32, slot);
            }
        }
        self.live = 0;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use proptest::prelude::*;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        ticks: u64,
    }

    impl Component for Counter {
        fn type_name() -> &'static str {
            "Counter"
        }

        fn update(&mut self, _frame: &Frame) {
            self.ticks += 1;
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Tracked {
        #[serde(skip)]
        drops: Arc<AtomicUsize>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Component for Tracked {
        fn type_name() -> &'static str {
            "Tracked"
        }
    }

    const FRAME: Frame = Frame::new(1, 1.0 / 60.0);

    #[test]
    fn test_add_and_get() {
        let mut storage = ComponentStorage::new();
        let a = storage.add(Counter { ticks: 3 }).unwrap();
        assert_eq!(storage.get(a), Some(&Counter { ticks: 3 }));
        assert_eq!(storage.len(), 1);
        assert!(storage.is_enabled(a).unwrap());
    }

    #[test]
    fn test_with_mutates_in_place() {
        let mut storage = ComponentStorage::new();
        let a = storage.add(Counter { ticks: 0 }).unwrap();
        let seen = storage.with(a, |c| {
            c.ticks = 10;
            c.ticks
        });
        assert_eq!(seen.unwrap(), 10);
        assert_eq!(storage.get(a).unwrap().ticks, 10);
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        let mut storage = ComponentStorage::<Counter>::new();
        let mut called = false;
        let result = storage.with(SlotIndex::new(5, 0), |_| called = true);
        assert!(matches!(result, Err(ComponentError::InvalidComponentId(_))));
        assert!(!called);
        assert!(storage.set_enabled(SlotIndex::new(5, 0), false).is_err());
    }

    #[test]
    fn test_removed_slot_is_reused_with_new_generation() {
        let mut storage = ComponentStorage::new();
        let a = storage.add(Counter { ticks: 1 }).unwrap();
        let b = storage.add(Counter { ticks: 2 }).unwrap();
        assert_eq!(storage.take(a).unwrap(), Counter { ticks: 1 });

        let c = storage.add(Counter { ticks: 3 }).unwrap();
        assert_eq!(c.index, a.index);
        assert_ne!(c.generation, a.generation);
        assert_eq!(storage.slot_count(), 2);

        // The stale handle must not alias the new occupant.
        assert!(storage.get(a).is_none());
        assert!(matches!(
            storage.with(a, |_| ()),
            Err(ComponentError::InvalidComponentId(_))
        ));
        assert_eq!(storage.get(b).unwrap().ticks, 2);
        assert_eq!(storage.get(c).unwrap().ticks, 3);
    }

    #[test]
    fn test_remove_twice_fails() {
        let mut storage = ComponentStorage::new();
        let a = storage.add(Counter { ticks: 1 }).unwrap();
        ComponentSystem::remove(&mut storage, a).unwrap();
        assert!(ComponentSystem::remove(&mut storage, a).is_err());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_update_skips_disabled() {
        let mut storage = ComponentStorage::new();
        let a = storage.add(Counter { ticks: 0 }).unwrap();
        let b = storage.add(Counter { ticks: 0 }).unwrap();
        storage.set_enabled(b, false).unwrap();

        assert_eq!(storage.update(&FRAME), 1);
        assert_eq!(storage.get(a).unwrap().ticks, 1);
        assert_eq!(storage.get(b).unwrap().ticks, 0);

        storage.set_enabled(b, true).unwrap();
        assert_eq!(storage.update(&FRAME), 2);
        assert_eq!(storage.get(a).unwrap().ticks, 2);
        assert_eq!(storage.get(b).unwrap().ticks, 1);
    }

    #[test]
    fn test_reused_slot_starts_enabled() {
        let mut storage = ComponentStorage::new();
        let a = storage.add(Counter { ticks: 0 }).unwrap();
        storage.set_enabled(a, false).unwrap();
        storage.take(a).unwrap();
        let b = storage.add(Counter { ticks: 0 }).unwrap();
        assert!(storage.is_enabled(b).unwrap());
    }

    #[test]
    fn test_iter_reports_live_slots_only() {
        let mut storage = ComponentStorage::new();
        let a = storage.add(Counter { ticks: 1 }).unwrap();
        let b = storage.add(Counter { ticks: 2 }).unwrap();
        storage.set_enabled(b, false).unwrap();
        storage.take(a).unwrap();

        let live: Vec<_> = storage.iter().map(|(i, c, on)| (i, c.ticks, on)).collect();
        assert_eq!(live, vec![(b, 2, false)]);
    }

    #[test]
    fn test_encode_named() {
        let mut storage = ComponentStorage::new();
        let a = storage.add(Counter { ticks: 7 }).unwrap();
        let bytes = storage.encode(a).unwrap();
        let decoded: Counter = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(decoded, Counter { ticks: 7 });
    }

    #[test]
    fn test_shutdown_drops_each_value_once_and_is_idempotent() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut storage = ComponentStorage::new();
        let ids: Vec<_> = (0..3)
            .map(|_| {
                storage
                    .add(Tracked {
                        drops: Arc::clone(&drops),
                    })
                    .unwrap()
            })
            .collect();

        storage.shutdown();
        assert_eq!(drops.load(Ordering::SeqCst), 3);
        assert!(storage.is_empty());
        assert!(ids.iter().all(|&id| !storage.contains(id)));

        storage.shutdown();
        assert_eq!(drops.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_exhausted_generation_retires_slot() {
        let mut storage = ComponentStorage::new();
        let a = storage.add(Counter { ticks: 1 }).unwrap();
        storage.slots[a.index as usize].generation = u32::MAX;
        let last = SlotIndex::new(a.index, u32::MAX);

        assert_eq!(storage.take(last).unwrap().ticks, 1);
        let b = storage.add(Counter { ticks: 2 }).unwrap();
        assert_ne!(b.index, a.index, "retired slot must not be reused");
        assert_eq!(storage.slot_count(), 2);
        assert!(storage.get(last).is_none());
        assert!(storage.get(a).is_none());
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_shutdown_retires_exhausted_slots() {
        let mut storage = ComponentStorage::new();
        let a = storage.add(Counter { ticks: 1 }).unwrap();
        let b = storage.add(Counter { ticks: 2 }).unwrap();
        storage.slots[a.index as usize].generation = u32::MAX;

        storage.shutdown();
        assert_eq!(storage.free, vec![b.index]);
        let c = storage.add(Counter { ticks: 3 }).unwrap();
        assert_eq!(c, SlotIndex::new(b.index, b.generation + 1));
    }

    #[test]
    fn test_downcast_through_erased_trait() {
        let mut boxed: Box<dyn ComponentSystem> = Box::new(ComponentStorage::<Counter>::new());
        assert_eq!(boxed.type_name(), "Counter");
        assert_eq!(boxed.component_type(), ComponentTypeId::of::<Counter>());
        assert!(
            boxed
                .as_any_mut()
                .downcast_mut::<ComponentStorage<Counter>>()
                .is_some()
        );
        assert!(
            boxed
                .as_any()
                .downcast_ref::<ComponentStorage<Tracked>>()
                .is_none()
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u64),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u64>().prop_map(Op::Add),
            any::<usize>().prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn test_live_handles_survive_unrelated_adds_and_removes(ops in prop::collection::vec(op(), 0..64)) {
            let mut storage = ComponentStorage::new();
            let mut live: Vec<(SlotIndex, u64)> = Vec::new();
            let mut dead: Vec<SlotIndex> = Vec::new();

            for op in ops {
                match op {
                    Op::Add(ticks) => live.push((storage.add(Counter { ticks }).unwrap(), ticks)),
                    Op::Remove(pick) if !live.is_empty() => {
                        let (slot, ticks) = live.swap_remove(pick % live.len());
                        prop_assert_eq!(storage.take(slot).unwrap().ticks, ticks);
                        dead.push(slot);
                    }
                    Op::Remove(_) => {}
                }

                for &(slot, ticks) in &live {
                    prop_assert_eq!(storage.get(slot).map(|c| c.ticks), Some(ticks));
                }
                for &slot in &dead {
                    prop_assert!(storage.get(slot).is_none());
                }
                prop_assert_eq!(storage.len(), live.len());
            }
        }
    }
}
