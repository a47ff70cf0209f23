//! Photon records and the capacity-bounded buffers they are written
//! into. One emission pass owns three buffers (surface, volume, and
//! path photons); once a buffer is full no further writes of that
//! kind occur for the pass.

// pbrt
use crate::core::geometry::{Point3f, Vector3f};
use crate::core::pbrt::{Float, Spectrum};

/// A photon stored at a non-specular surface hit. The power already
/// carries the shading-normal/geometric-normal cosine correction.
#[derive(Debug, Default, Copy, Clone)]
pub struct Photon {
    pub pos: Point3f,
    pub dir: Vector3f,
    pub power: Spectrum,
    pub bounce: i32,
}

/// A photon stored at an in-medium scattering event. The squared
/// kernel radius is stamped during spatial-index construction, never
/// by the emitter.
#[derive(Debug, Default, Copy, Clone)]
pub struct VolumePhoton {
    pub pos: Point3f,
    pub dir: Vector3f,
    pub power: Spectrum,
    pub bounce: i32,
    pub radius_sq: Float,
}

/// Bounce index plus an in-volume marker. Only the bounce index
/// participates in bounce-window comparisons.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct PathInfo {
    pub bounce: i32,
    pub in_volume: bool,
}

/// A record at *every* vertex of a photon path, including the
/// emission point and specular bounces. `dir` and `length` describe
/// the segment to the next vertex on the same path and are filled in
/// when the beam index is built.
#[derive(Debug, Default, Copy, Clone)]
pub struct PathPhoton {
    pub pos: Point3f,
    pub power: Spectrum,
    pub dir: Vector3f,
    pub length: Float,
    pub info: PathInfo,
}

/// An append-only view over a caller-owned photon slice with a hard
/// capacity. Multithreaded emission hands each worker a disjoint
/// subslice of the shared backing store, which keeps occupancy at or
/// below capacity with no lost or duplicated slots.
#[derive(Debug)]
pub struct PhotonRange<'a, T> {
    slots: &'a mut [T],
    next: usize,
}

pub type SurfacePhotonRange<'a> = PhotonRange<'a, Photon>;
pub type VolumePhotonRange<'a> = PhotonRange<'a, VolumePhoton>;
pub type PathPhotonRange<'a> = PhotonRange<'a, PathPhoton>;

impl<'a, T> PhotonRange<'a, T> {
    pub fn new(slots: &'a mut [T]) -> Self {
        PhotonRange { slots, next: 0_usize }
    }
    /// True once capacity is reached; a zero-capacity range is always
    /// full.
    pub fn full(&self) -> bool {
        self.next == self.slots.len()
    }
    /// The next free slot, for the caller to populate. Only valid
    /// while `full()` is false.
    pub fn add_photon(&mut self) -> &mut T {
        debug_assert!(!self.full());
        let i: usize = self.next;
        self.next += 1;
        &mut self.slots[i]
    }
    /// Number of photons written so far.
    pub fn len(&self) -> usize {
        self.next
    }
    pub fn is_empty(&self) -> bool {
        self.next == 0_usize
    }
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn occupancy_never_exceeds_capacity() {
        let mut storage: Vec<Photon> = vec![Photon::default(); 3];
        let mut range: SurfacePhotonRange = PhotonRange::new(&mut storage[..]);
        for i in 0..3 {
            assert!(!range.full());
            let p: &mut Photon = range.add_photon();
            p.bounce = i as i32;
        }
        assert!(range.full());
        assert_eq!(range.len(), 3);
        assert_eq!(storage[2].bounce, 2);
    }

    #[test]
    fn zero_capacity_is_always_full() {
        let mut storage: Vec<VolumePhoton> = Vec::new();
        let range: VolumePhotonRange = PhotonRange::new(&mut storage[..]);
        assert!(range.full());
        assert!(range.is_empty());
        assert_eq!(range.capacity(), 0);
    }

    #[test]
    fn partitioned_ranges_fill_disjoint_slots() {
        // emulate the external thread-partitioned allocation scheme
        let num_threads: usize = num_cpus::get().max(2);
        let per_thread: usize = 16;
        let mut storage: Vec<PathPhoton> = vec![PathPhoton::default(); num_threads * per_thread];
        crossbeam::scope(|scope| {
            for (t, chunk) in storage.chunks_mut(per_thread).enumerate() {
                scope.spawn(move |_| {
                    let mut range: PathPhotonRange = PhotonRange::new(chunk);
                    while !range.full() {
                        let p: &mut PathPhoton = range.add_photon();
                        p.info.bounce = t as i32;
                    }
                    assert_eq!(range.len(), per_thread);
                });
            }
        })
        .unwrap();
        for (t, chunk) in storage.chunks(per_thread).enumerate() {
            for p in chunk {
                assert_eq!(p.info.bounce, t as i32);
            }
        }
    }
}
