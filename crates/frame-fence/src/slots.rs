//! Fixed-capacity per-frame resource arena.

use crate::error::{FenceError, FenceResult};
use crate::FRAME_COUNT;

/// One resource set per frame slot, allocated once and never resized.
///
/// The slot count is a pipelining constant, so the storage is a plain array.
#[derive(Debug)]
pub struct FrameSlots<R, const N: usize = FRAME_COUNT> {
    slots: [R; N],
}

impl<R, const N: usize> FrameSlots<R, N> {
    /// Builds every slot with `create(slot_index)`, stopping at the first error.
    pub fn try_new<E, F>(create: F) -> Result<Self, E>
    where
        F: FnMut(usize) -> Result<R, E>,
    {
        let slots = array_init::try_array_init(create)?;
        Ok(Self { slots })
    }

    pub fn get(&self, slot: usize) -> FenceResult<&R> {
        self.slots.get(slot).ok_or(FenceError::SlotOutOfRange {
            slot,
            slot_count: N,
        })
    }

    pub fn get_mut(&mut self, slot: usize) -> FenceResult<&mut R> {
        self.slots.get_mut(slot).ok_or(FenceError::SlotOutOfRange {
            slot,
            slot_count: N,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.slots.iter()
    }

    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<R, const N: usize> From<[R; N]> for FrameSlots<R, N> {
    fn from(slots: [R; N]) -> Self {
        Self { slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_passes_slot_index() {
        let slots = FrameSlots::<usize, 3>::try_new(|i| Ok::<_, ()>(i * 10)).unwrap();
        assert_eq!(slots.iter().copied().collect::<Vec<_>>(), vec![0, 10, 20]);
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn test_try_new_stops_at_first_error() {
        let mut created = 0;
        let result = FrameSlots::<u32, 2>::try_new(|i| {
            if i == 1 {
                return Err("allocator creation failed");
            }
            created += 1;
            Ok(0)
        });
        assert_eq!(result.unwrap_err(), "allocator creation failed");
        assert_eq!(created, 1);
    }

    #[test]
    fn test_out_of_range_slot_is_an_error() {
        let mut slots = FrameSlots::from([1u8, 2u8]);
        assert!(matches!(
            slots.get(2),
            Err(FenceError::SlotOutOfRange {
                slot: 2,
                slot_count: 2
            })
        ));
        *slots.get_mut(1).unwrap() = 7;
        assert_eq!(*slots.get(1).unwrap(), 7);
    }
}
