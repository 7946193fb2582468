use std::any::Any;

/// Hands out indices into per-window extension slot vectors, reusing the
/// indices of released slots.
#[derive(Debug, Default)]
pub struct SlotAllocator {
    next: usize,
    free: Vec<usize>,
}

impl SlotAllocator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn allocate(&mut self) -> usize {
        match self.free.pop() {
            Some(index) => index,
            None => {
                self.next += 1;
                self.next - 1
            },
        }
    }

    pub fn release(
        &mut self,
        index: usize,
    ) {
        if index < self.next && !self.free.contains(&index) {
            self.free.push(index);
        }
    }

    /// Number of indices ever handed out; slot vectors never need to be longer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.next
    }
}

/// Index-stable storage of arbitrary plugin data attached to a record.
#[derive(Default)]
pub struct Slots {
    values: Vec<Option<Box<dyn Any>>>,
}

impl Slots {
    pub fn get<T: 'static>(
        &self,
        index: usize,
    ) -> Option<&T> {
        self.values
            .get(index)
            .and_then(|value| value.as_ref())
            .and_then(|value| value.downcast_ref())
    }

    pub fn get_mut<T: 'static>(
        &mut self,
        index: usize,
    ) -> Option<&mut T> {
        self.values
            .get_mut(index)
            .and_then(|value| value.as_mut())
            .and_then(|value| value.downcast_mut())
    }

    pub fn set<T: 'static>(
        &mut self,
        index: usize,
        value: T,
    ) {
        if self.values.len() <= index {
            self.values.resize_with(index + 1, || None);
        }

        self.values[index] = Some(Box::new(value));
    }

    pub fn clear(
        &mut self,
        index: usize,
    ) -> Option<Box<dyn Any>> {
        self.values.get_mut(index).and_then(Option::take)
    }
}

impl std::fmt::Debug for Slots {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Slots")
            .field("len", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_indices_are_reused() {
        let mut allocator = SlotAllocator::new();

        assert_eq!(allocator.allocate(), 0);
        assert_eq!(allocator.allocate(), 1);
        assert_eq!(allocator.allocate(), 2);

        allocator.release(1);
        allocator.release(1);

        assert_eq!(allocator.allocate(), 1);
        assert_eq!(allocator.allocate(), 3);
        assert_eq!(allocator.capacity(), 4);
    }

    #[test]
    fn slots_grow_on_demand_and_type_check() {
        let mut slots = Slots::default();
        slots.set(3, 42u32);

        assert_eq!(slots.get::<u32>(3), Some(&42));
        assert_eq!(slots.get::<String>(3), None);
        assert_eq!(slots.get::<u32>(0), None);
        assert_eq!(slots.get::<u32>(10), None);

        if let Some(value) = slots.get_mut::<u32>(3) {
            *value += 1;
        }

        assert_eq!(slots.get::<u32>(3), Some(&43));
        assert!(slots.clear(3).is_some());
        assert_eq!(slots.get::<u32>(3), None);
    }
}
