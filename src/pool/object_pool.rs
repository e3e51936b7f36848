//! Fixed-capacity object pool with a free-index stack
//!
//! Slots are reused for the whole session. Each slot carries a generation
//! counter that is bumped on release, so a handle to a dead occupant can
//! never reach the record that reused its slot.

use bytemuck::{Pod, Zeroable};

/// Handle to a live pool record.
///
/// `index` is stable for the lifetime of the occupant and doubles as the
/// instance index the render layer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle {
    index: u32,
    generation: u32,
}

impl PoolHandle {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Per-instance transform handed to the render layer.
///
/// Laid out for direct upload into a GPU instance buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub position: [f32; 3],
    pub yaw: f32,
    pub scale: f32,
}

impl InstanceTransform {
    /// Parked far below the ground at zero scale: invisible even if a stale
    /// frame still uploads it.
    pub const HIDDEN: InstanceTransform = InstanceTransform {
        position: [0.0, -10_000.0, 0.0],
        yaw: 0.0,
        scale: 0.0,
    };

    pub fn new(position: glam::Vec3, yaw: f32, scale: f32) -> Self {
        Self {
            position: position.to_array(),
            yaw,
            scale,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.scale == 0.0
    }
}

/// Records that have a visual instance.
pub trait Pooled {
    fn instance_transform(&self) -> InstanceTransform;
}

#[derive(Debug)]
struct Slot<T> {
    value: T,
    generation: u32,
    active: bool,
}

/// Fixed-capacity pool.
///
/// `acquire` takes the complete new record by value, so no field of the
/// previous occupant survives into the next one.
#[derive(Debug)]
pub struct ObjectPool<T> {
    label: &'static str,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    transforms: Vec<InstanceTransform>,
    capacity: usize,
    live: usize,
    dropped: u64,
}

impl<T> ObjectPool<T> {
    /// Create a pool; storage for `capacity` slots is reserved up front so
    /// growth never reallocates.
    pub fn new(label: &'static str, capacity: usize) -> Self {
        Self {
            label,
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            transforms: Vec::with_capacity(capacity),
            capacity,
            live: 0,
            dropped: 0,
        }
    }

    /// Place `value` in a free slot.
    ///
    /// Returns `None` once the pool is at capacity; the caller drops the
    /// request.
    pub fn acquire(&mut self, value: T) -> Option<PoolHandle> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(!slot.active, "{} pool: free list held a live slot", self.label);
            slot.value = value;
            slot.active = true;
            self.live += 1;
            return Some(PoolHandle::new(index, slot.generation));
        }

        if self.slots.len() < self.capacity {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                value,
                generation: 0,
                active: true,
            });
            self.transforms.push(InstanceTransform::HIDDEN);
            self.live += 1;
            return Some(PoolHandle::new(index, 0));
        }

        self.dropped += 1;
        tracing::trace!("{} pool exhausted at {} slots, request dropped", self.label, self.capacity);
        None
    }

    /// Return a slot to the free stack and hide its instance.
    ///
    /// Releasing a stale or already-free handle would let two records share
    /// one index; it asserts in debug builds and is ignored otherwise.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        if !self.is_live(handle) {
            debug_assert!(
                false,
                "{} pool: double release of slot {} (generation {})",
                self.label, handle.index, handle.generation
            );
            tracing::error!(
                "{} pool: ignored double release of slot {} (generation {})",
                self.label,
                handle.index,
                handle.generation
            );
            return false;
        }

        let index = handle.index as usize;
        let slot = &mut self.slots[index];
        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.transforms[index] = InstanceTransform::HIDDEN;
        self.free.push(handle.index);
        self.live -= 1;
        true
    }

    pub fn is_live(&self, handle: PoolHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .map(|s| s.active && s.generation == handle.generation)
            .unwrap_or(false)
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.active && s.generation == handle.generation)
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.active && s.generation == handle.generation)
            .map(|s| &mut s.value)
    }

    /// Iterate active records with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (PoolHandle::new(i as u32, s.generation), &s.value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> + '_ {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (PoolHandle::new(i as u32, s.generation), &mut s.value))
    }

    /// Write the handles of all active records into `out` (cleared first).
    ///
    /// Lets a system release records while walking the pool without
    /// allocating a fresh list every frame.
    pub fn handles_into(&self, out: &mut Vec<PoolHandle>) {
        out.clear();
        out.extend(self.iter().map(|(h, _)| h));
    }

    /// Release every active record.
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            let slot = &mut self.slots[index];
            if slot.active {
                slot.active = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.transforms[index] = InstanceTransform::HIDDEN;
                self.free.push(index as u32);
            }
        }
        self.live = 0;
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Number of live records.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn is_full(&self) -> bool {
        self.live >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots created so far (high-water mark).
    pub fn slots_created(&self) -> usize {
        self.slots.len()
    }

    /// Acquisitions refused because the pool was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Instance transforms indexed by slot; freed slots are `HIDDEN`.
    pub fn instance_transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// Transform buffer as raw bytes for the GPU upload.
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transforms)
    }
}

impl<T: Pooled> ObjectPool<T> {
    /// Copy the current transform of every active record into the
    /// instance buffer.
    pub fn sync_transforms(&mut self) {
        for (slot, transform) in self.slots.iter().zip(self.transforms.iter_mut()) {
            if slot.active {
                *transform = slot.value.instance_transform();
            }
        }
    }
}
