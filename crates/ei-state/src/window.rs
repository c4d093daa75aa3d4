//! Sparse record window.
//!
//! Slots are addressed by their absolute index in the backend's ordering.
//! Pages are written at a computed base offset, so gaps before a page are
//! padded with [`Slot::Unloaded`] and nothing is ever compacted.

#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Unloaded,
    Loaded(T),
}

impl<T> Slot<T> {
    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            Slot::Loaded(value) => Some(value),
            Slot::Unloaded => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordWindow<T> {
    slots: Vec<Slot<T>>,
    total: Option<usize>,
    loaded: usize,
}

impl<T> Default for RecordWindow<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            total: None,
            loaded: 0,
        }
    }
}

impl<T> RecordWindow<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of addressable slots, loaded or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total record count reported by the backend, once known.
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = Some(total);
    }

    /// Number of materialized slots.
    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Slot::as_loaded)
    }

    pub fn is_materialized(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// True when the slot holds a record or lies past the known end.
    pub fn is_ready(&self, index: usize) -> bool {
        self.is_materialized(index) || self.total.is_some_and(|total| index >= total)
    }

    /// Write `records` starting at slot `base`, padding any gap before it.
    pub fn merge_at(&mut self, base: usize, records: Vec<T>) {
        let end = base + records.len();
        if self.slots.len() < end {
            self.slots.resize_with(end, || Slot::Unloaded);
        }
        for (offset, record) in records.into_iter().enumerate() {
            let slot = &mut self.slots[base + offset];
            if matches!(slot, Slot::Unloaded) {
                self.loaded += 1;
            }
            *slot = Slot::Loaded(record);
        }
    }

    pub fn iter_loaded(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_loaded().map(|value| (i, value)))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.total = None;
        self.loaded = 0;
    }
}
