//! In-memory abstract simplicial complex: a Hasse diagram stored in
//! per-dimension slot arenas.
//!
//! [`SimplicialComplex`] keeps one [`LevelArena`] per dimension `0..=D`. Each
//! live slot holds a simplex record: its canonical key, a data payload, and
//! the boundary/coboundary handle sets that form the Hasse diagram. Boundary
//! and coboundary are maintained as exact mirrors of each other, and a
//! `debug_assertions`-gated checker validates the mirror plus the closure
//! invariant after every mutation.
//!
//! The maximum dimension is fixed at construction; payloads use a single type
//! `T` across levels (a tagged union in practice, see
//! [`crate::surface::data::SimplexData`]) with [`LevelPayload`] supplying the
//! filler for faces materialized implicitly by `insert`.

use std::collections::HashSet;

use hashbrown::HashMap;
use itertools::Itertools;
use once_cell::sync::OnceCell;

use crate::mesh_error::MeshCascError;
use crate::topology::cache::InvalidateCache;
use crate::topology::handle::SimplexHandle;
use crate::topology::key::{SimplexKey, VertexId};

/// Payload constructor for simplices created implicitly while materializing
/// the boundary closure of an inserted simplex.
pub trait LevelPayload {
    /// Default payload for a simplex of dimension `level`.
    fn default_for_level(level: usize) -> Self;
}

impl LevelPayload for () {
    fn default_for_level(_level: usize) -> Self {}
}

/// One stored simplex: canonical key, payload, and Hasse links.
#[derive(Clone, Debug)]
struct SimplexRecord<T> {
    key: SimplexKey,
    data: T,
    /// Handles of the `level` facets one dimension down, ordered by omitted
    /// sorted position (facet `i` omits vertex `i` of `key`).
    boundary: Vec<SimplexHandle>,
    /// Handles of the covering simplices one dimension up, unordered.
    coboundary: Vec<SimplexHandle>,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    record: Option<SimplexRecord<T>>,
}

/// Slot arena plus name index for one dimension.
#[derive(Clone, Debug)]
struct LevelArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    index: HashMap<SimplexKey, u32>,
}

impl<T> Default for LevelArena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> LevelArena<T> {
    fn len(&self) -> usize {
        self.index.len()
    }

    fn lookup(&self, key: &SimplexKey) -> Option<u32> {
        self.index.get(key).copied()
    }

    fn record(&self, slot: u32, generation: u32) -> Option<&SimplexRecord<T>> {
        let s = self.slots.get(slot as usize)?;
        if s.generation != generation {
            return None;
        }
        s.record.as_ref()
    }

    fn record_mut(&mut self, slot: u32, generation: u32) -> Option<&mut SimplexRecord<T>> {
        let s = self.slots.get_mut(slot as usize)?;
        if s.generation != generation {
            return None;
        }
        s.record.as_mut()
    }

    /// Allocates a slot for `record`, reusing freed slots when available.
    /// Returns `(slot, generation)`.
    fn alloc(&mut self, record: SimplexRecord<T>) -> (u32, u32) {
        let key = record.key.clone();
        let (slot, generation) = match self.free.pop() {
            Some(slot) => {
                let s = &mut self.slots[slot as usize];
                debug_assert!(s.record.is_none());
                s.record = Some(record);
                (slot, s.generation)
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 1,
                    record: Some(record),
                });
                (slot, 1)
            }
        };
        self.index.insert(key, slot);
        (slot, generation)
    }

    /// Frees a slot, bumping its generation so outstanding handles go stale.
    fn release(&mut self, slot: u32) -> SimplexRecord<T> {
        let s = &mut self.slots[slot as usize];
        let record = s.record.take().expect("release of an empty slot");
        s.generation = s.generation.wrapping_add(1);
        self.free.push(slot);
        self.index.remove(&record.key);
        record
    }
}

/// Abstract simplicial complex of dimension `0..=D` with payloads `T` per
/// simplex and a single global (root) payload `G`.
///
/// All mutating operations take `&mut self` and all queries take `&self`, so
/// the exclusive-access discipline for mutation is enforced by the borrow
/// checker; iterators returned by [`handles`](Self::handles) borrow the
/// complex and structurally freeze it for their lifetime.
///
/// # Example
/// ```rust
/// use mesh_casc::topology::complex::SimplicialComplex;
/// use mesh_casc::topology::key::SimplexKey;
///
/// let mut c: SimplicialComplex<(), ()> = SimplicialComplex::new(2, ());
/// c.insert(SimplexKey::new(&[1, 2, 3]).unwrap(), ()).unwrap();
/// // The boundary closure was materialized automatically.
/// assert_eq!(c.size(0), 3);
/// assert_eq!(c.size(1), 3);
/// assert_eq!(c.size(2), 1);
/// ```
#[derive(Debug)]
pub struct SimplicialComplex<T, G> {
    dim: usize,
    levels: Vec<LevelArena<T>>,
    global: G,
    /// On-boundary (D-1)-simplices, recomputed lazily after each mutation.
    boundary_cache: OnceCell<HashSet<SimplexHandle>>,
}

impl<T: Clone, G: Clone> Clone for SimplicialComplex<T, G> {
    fn clone(&self) -> Self {
        Self {
            dim: self.dim,
            levels: self.levels.clone(),
            global: self.global.clone(),
            boundary_cache: OnceCell::new(),
        }
    }
}

impl<T, G> InvalidateCache for SimplicialComplex<T, G> {
    #[inline]
    fn invalidate_cache(&mut self) {
        self.boundary_cache.take();
    }
}

impl<T, G> SimplicialComplex<T, G> {
    /// Creates an empty complex holding simplices of dimension `0..=dim`.
    pub fn new(dim: usize, global: G) -> Self {
        Self {
            dim,
            levels: (0..=dim).map(|_| LevelArena::default()).collect(),
            global,
            boundary_cache: OnceCell::new(),
        }
    }

    /// Maximum simplex dimension stored by this complex.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Global (root) payload: whole-complex metadata.
    #[inline]
    pub fn global(&self) -> &G {
        &self.global
    }

    /// Mutable global payload. Does not touch topology, so caches survive.
    #[inline]
    pub fn global_mut(&mut self) -> &mut G {
        &mut self.global
    }

    /// Number of simplices at `level`; zero for out-of-range levels.
    pub fn size(&self, level: usize) -> usize {
        self.levels.get(level).map_or(0, LevelArena::len)
    }

    /// Handle lookup by canonical key.
    pub fn get(&self, key: &SimplexKey) -> Option<SimplexHandle> {
        let arena = self.levels.get(key.level())?;
        let slot = arena.lookup(key)?;
        let generation = arena.slots[slot as usize].generation;
        Some(SimplexHandle::new(key.level(), slot, generation))
    }

    /// Handle lookup by raw vertex identifiers; `None` for malformed keys.
    pub fn get_raw(&self, raw: &[u64]) -> Option<SimplexHandle> {
        SimplexKey::new(raw).ok().and_then(|k| self.get(&k))
    }

    /// True if `handle` still references a live simplex.
    pub fn contains(&self, handle: SimplexHandle) -> bool {
        self.record(handle).is_some()
    }

    fn record(&self, handle: SimplexHandle) -> Option<&SimplexRecord<T>> {
        self.levels
            .get(handle.level())?
            .record(handle.slot(), handle.generation())
    }

    fn try_record(&self, handle: SimplexHandle) -> Result<&SimplexRecord<T>, MeshCascError> {
        self.record(handle).ok_or(MeshCascError::StaleHandle {
            level: handle.level(),
            slot: handle.slot(),
        })
    }

    /// Canonical key of the simplex behind `handle`.
    pub fn key(&self, handle: SimplexHandle) -> Result<&SimplexKey, MeshCascError> {
        Ok(&self.try_record(handle)?.key)
    }

    /// Identifying vertex tuple of the simplex behind `handle`.
    pub fn name(&self, handle: SimplexHandle) -> Result<&[VertexId], MeshCascError> {
        Ok(self.try_record(handle)?.key.vertices())
    }

    /// Payload of the simplex behind `handle`.
    pub fn data(&self, handle: SimplexHandle) -> Result<&T, MeshCascError> {
        Ok(&self.try_record(handle)?.data)
    }

    /// Mutable payload. Payloads carry no topology, so caches survive.
    pub fn data_mut(&mut self, handle: SimplexHandle) -> Result<&mut T, MeshCascError> {
        self.levels
            .get_mut(handle.level())
            .and_then(|arena| arena.record_mut(handle.slot(), handle.generation()))
            .map(|r| &mut r.data)
            .ok_or(MeshCascError::StaleHandle {
                level: handle.level(),
                slot: handle.slot(),
            })
    }

    /// Facet handles one dimension down (empty for vertices).
    pub fn boundary(&self, handle: SimplexHandle) -> Result<&[SimplexHandle], MeshCascError> {
        Ok(&self.try_record(handle)?.boundary)
    }

    /// Covering handles one dimension up.
    pub fn coboundary(&self, handle: SimplexHandle) -> Result<&[SimplexHandle], MeshCascError> {
        Ok(&self.try_record(handle)?.coboundary)
    }

    /// The coboundary expressed as covering-simplex keys.
    pub fn cover(&self, handle: SimplexHandle) -> Result<Vec<SimplexKey>, MeshCascError> {
        self.try_record(handle)?
            .coboundary
            .iter()
            .map(|&c| self.key(c).cloned())
            .collect()
    }

    /// Lazy iterator over every live simplex at `level`.
    ///
    /// The iterator borrows the complex, so structural mutation while it is
    /// open is rejected at compile time. A fresh call restarts iteration.
    pub fn handles(&self, level: usize) -> impl Iterator<Item = SimplexHandle> + '_ {
        self.levels
            .get(level)
            .into_iter()
            .flat_map(move |arena| {
                arena.slots.iter().enumerate().filter_map(move |(i, s)| {
                    s.record
                        .as_ref()
                        .map(|_| SimplexHandle::new(level, i as u32, s.generation))
                })
            })
    }

    /// Snapshot of the handles at `level`, for algorithms that must mutate
    /// while conceptually iterating. Re-check liveness with
    /// [`contains`](Self::contains) before using each handle.
    pub fn handles_snapshot(&self, level: usize) -> Vec<SimplexHandle> {
        self.handles(level).collect()
    }

    /// The star of `handle`: itself plus every simplex reachable upward
    /// through coboundary links. Empty when the handle is stale.
    pub fn star(&self, handle: SimplexHandle) -> Vec<SimplexHandle> {
        if !self.contains(handle) {
            return Vec::new();
        }
        let mut stack = vec![handle];
        let mut seen: HashSet<SimplexHandle> = stack.iter().copied().collect();
        let mut out = Vec::new();
        while let Some(h) = stack.pop() {
            if let Some(rec) = self.record(h) {
                for &c in &rec.coboundary {
                    if seen.insert(c) {
                        stack.push(c);
                    }
                }
            }
            out.push(h);
        }
        out
    }

    /// The closure of `handle`: itself plus every simplex reachable downward
    /// through boundary links. Empty when the handle is stale.
    pub fn closure(&self, handle: SimplexHandle) -> Vec<SimplexHandle> {
        if !self.contains(handle) {
            return Vec::new();
        }
        let mut stack = vec![handle];
        let mut seen: HashSet<SimplexHandle> = stack.iter().copied().collect();
        let mut out = Vec::new();
        while let Some(h) = stack.pop() {
            if let Some(rec) = self.record(h) {
                for &b in &rec.boundary {
                    if seen.insert(b) {
                        stack.push(b);
                    }
                }
            }
            out.push(h);
        }
        out
    }

    /// On-boundary (D-1)-simplices: those covered by fewer than two top
    /// simplices. Cached until the next structural mutation.
    pub fn boundary_set(&self) -> &HashSet<SimplexHandle> {
        self.boundary_cache.get_or_init(|| {
            if self.dim == 0 {
                return HashSet::new();
            }
            self.handles(self.dim - 1)
                .filter(|&h| self.record(h).is_some_and(|r| r.coboundary.len() < 2))
                .collect()
        })
    }
}

impl<T: LevelPayload, G> SimplicialComplex<T, G> {
    /// Inserts the simplex named by `key`, materializing any missing boundary
    /// faces bottom-up first and wiring all boundary/coboundary links.
    ///
    /// If the simplex already exists its data is overwritten and the existing
    /// handle returned. Fails with
    /// [`LevelOutOfRange`](MeshCascError::LevelOutOfRange) when the key arity
    /// exceeds the complex dimension.
    pub fn insert(&mut self, key: SimplexKey, data: T) -> Result<SimplexHandle, MeshCascError> {
        let level = key.level();
        if level > self.dim {
            return Err(MeshCascError::LevelOutOfRange {
                level,
                max: self.dim,
            });
        }

        if let Some(handle) = self.get(&key) {
            *self.data_mut(handle)? = data;
            return Ok(handle);
        }

        // Materialize the closure level by level; an explicit loop in
        // increasing dimension order bounds the stack for high dimensions and
        // guarantees facets exist before anything that covers them.
        for l in 0..level {
            for combo in key.vertices().iter().copied().combinations(l + 1) {
                let sub = SimplexKey::from_sorted(combo);
                if self.get(&sub).is_none() {
                    self.create(sub, T::default_for_level(l));
                }
            }
        }
        let handle = self.create(key, data);

        self.invalidate_cache();
        #[cfg(debug_assertions)]
        self.debug_assert_consistent();
        Ok(handle)
    }

    /// Creates a record whose facets all exist, wiring mutual links.
    fn create(&mut self, key: SimplexKey, data: T) -> SimplexHandle {
        let level = key.level();
        let boundary: Vec<SimplexHandle> = if level == 0 {
            Vec::new()
        } else {
            key.facets()
                .map(|f| self.get(&f).expect("facet materialized before coface"))
                .collect()
        };
        let record = SimplexRecord {
            key,
            data,
            boundary: boundary.clone(),
            coboundary: Vec::new(),
        };
        let (slot, generation) = self.levels[level].alloc(record);
        let handle = SimplexHandle::new(level, slot, generation);
        for b in boundary {
            let facet = self.levels[b.level()]
                .record_mut(b.slot(), b.generation())
                .expect("live facet");
            facet.coboundary.push(handle);
        }
        handle
    }

    /// Removes the simplex behind `handle` together with its entire star,
    /// unlinking every surviving facet. Returns the number of simplices
    /// removed; a stale handle removes nothing and returns 0.
    pub fn remove(&mut self, handle: SimplexHandle) -> usize {
        let mut doomed = self.star(handle);
        if doomed.is_empty() {
            return 0;
        }
        let star: HashSet<SimplexHandle> = doomed.iter().copied().collect();
        // Delete top-down so every coboundary link we drop points at a slot
        // that is already dead.
        doomed.sort_unstable_by_key(|h| std::cmp::Reverse(h.level()));
        for h in &doomed {
            let record = self.levels[h.level()].release(h.slot());
            for b in record.boundary {
                if star.contains(&b) {
                    continue;
                }
                if let Some(facet) = self.levels[b.level()].record_mut(b.slot(), b.generation()) {
                    facet.coboundary.retain(|c| c != h);
                }
            }
        }
        self.invalidate_cache();
        #[cfg(debug_assertions)]
        self.debug_assert_consistent();
        doomed.len()
    }

    /// Removes the simplex named by `key` and its star; see
    /// [`remove`](Self::remove). A nonexistent key removes nothing.
    pub fn remove_key(&mut self, key: &SimplexKey) -> usize {
        match self.get(key) {
            Some(handle) => self.remove(handle),
            None => 0,
        }
    }

    #[cfg(debug_assertions)]
    pub(crate) fn debug_assert_consistent(&self) {
        for level in 0..=self.dim {
            for h in self.handles(level) {
                let rec = self.record(h).expect("iterated handle is live");
                // Closure: every facet key resolves to a live simplex, and the
                // boundary handles mirror into our coboundary position.
                if level > 0 {
                    assert_eq!(rec.boundary.len(), level + 1);
                    for (facet_key, &b) in rec.key.facets().zip(&rec.boundary) {
                        let frec = self
                            .record(b)
                            .unwrap_or_else(|| panic!("dangling facet of {:?}", rec.key));
                        assert_eq!(frec.key, facet_key, "boundary order broken");
                        assert!(
                            frec.coboundary.contains(&h),
                            "missing coboundary mirror for {:?}",
                            rec.key
                        );
                    }
                }
                for &c in &rec.coboundary {
                    let crec = self
                        .record(c)
                        .unwrap_or_else(|| panic!("dangling coface of {:?}", rec.key));
                    assert!(
                        crec.boundary.contains(&h),
                        "missing boundary mirror for {:?}",
                        rec.key
                    );
                }
            }
        }
    }
}
