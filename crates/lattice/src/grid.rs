//! Uniform spatial hash grid.
//!
//! Positions are discretized into cubic cells of a fixed size; each cell
//! holds the ids currently inside it. Queries scan only the cells that can
//! overlap the query volume, so cost scales with the query size rather than
//! the population. Cell size should comfortably exceed the largest query
//! radius in regular use, otherwise a single query fans out across many
//! cells (20–64 world units is the usual range for RTS-scale maps).

use std::collections::HashMap;
use std::hash::Hash;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Discrete cell coordinate: `floor(axis / cell_size)` per axis.
///
/// Integer keys hash cheaply and never allocate, unlike stringified
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    /// Cell index along X
    pub x: i32,
    /// Cell index along Y
    pub y: i32,
    /// Cell index along Z
    pub z: i32,
}

impl CellKey {
    /// Compute the cell key containing `position` for the given cell size.
    #[must_use]
    pub fn from_position(position: Vec3, cell_size: f32) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self {
            x: (position.x / cell_size).floor() as i32,
            y: (position.y / cell_size).floor() as i32,
            z: (position.z / cell_size).floor() as i32,
        }
    }
}

/// Occupancy snapshot for diagnostics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GridStats {
    /// Number of non-empty cells
    pub cells: usize,
    /// Number of tracked ids
    pub entries: usize,
    /// Population of the fullest cell
    pub largest_cell: usize,
}

/// Uniform-cell spatial hash over 3D positions, generic over the id type.
///
/// The grid tracks the last-set position of every id, so membership always
/// reflects the most recent `insert`/`update` call. Radius queries are
/// exact: the cell scan produces a conservative candidate set which is then
/// filtered by squared distance. Box queries stay conservative (cell
/// granularity) and leave exact tests to the caller.
///
/// Results are sorted by id, so a query over the same set of positions
/// returns the same ids in the same order no matter which sequence of
/// operations produced that set.
///
/// # Example
///
/// ```
/// use glam::Vec3;
/// use lattice::SpatialHashGrid;
///
/// let mut grid: SpatialHashGrid<u32> = SpatialHashGrid::new(32.0);
/// grid.insert(7, Vec3::new(31.0, 0.0, 0.0));
/// grid.insert(9, Vec3::new(33.0, 0.0, 0.0));
///
/// // Both sides of the cell boundary at x = 32 are found.
/// assert_eq!(grid.query_radius(Vec3::ZERO, 40.0), vec![7, 9]);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialHashGrid<I> {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<I>>,
    entries: HashMap<I, (CellKey, Vec3)>,
}

impl<I> SpatialHashGrid<I>
where
    I: Copy + Eq + Hash + Ord,
{
    /// Create an empty grid with the given cell edge length.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not strictly positive.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
            entries: HashMap::new(),
        }
    }

    /// Cell edge length in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Register `id` at `position`, moving it if it is already tracked.
    pub fn insert(&mut self, id: I, position: Vec3) {
        self.place(id, position);
    }

    /// Move `id` to `position`.
    ///
    /// Cell membership is only touched when the cell key actually changed;
    /// an entity drifting within its cell costs two hash lookups and no
    /// mutation. Unknown ids are inserted, so membership always reflects the
    /// last-set position.
    ///
    /// Returns `true` when the id changed cells (or was newly inserted).
    pub fn update(&mut self, id: I, position: Vec3) -> bool {
        self.place(id, position)
    }

    /// Remove `id` from the grid. Removing an absent id is a no-op.
    ///
    /// Returns `true` if the id was present.
    pub fn remove(&mut self, id: I) -> bool {
        match self.entries.remove(&id) {
            Some((key, _)) => {
                Self::detach(&mut self.cells, key, id);
                true
            }
            None => false,
        }
    }

    /// Drop every entry and cell.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.entries.clear();
    }

    fn place(&mut self, id: I, position: Vec3) -> bool {
        let new_key = CellKey::from_position(position, self.cell_size);
        if let Some(entry) = self.entries.get_mut(&id) {
            let old_key = entry.0;
            entry.1 = position;
            if old_key == new_key {
                return false;
            }
            entry.0 = new_key;
            Self::detach(&mut self.cells, old_key, id);
            self.cells.entry(new_key).or_default().push(id);
        } else {
            self.entries.insert(id, (new_key, position));
            self.cells.entry(new_key).or_default().push(id);
        }
        true
    }

    fn detach(cells: &mut HashMap<CellKey, Vec<I>>, key: CellKey, id: I) {
        if let Some(bucket) = cells.get_mut(&key) {
            bucket.retain(|other| *other != id);
            // Prune empty cells eagerly so a long session of short-lived
            // entities does not leak dead buckets.
            if bucket.is_empty() {
                cells.remove(&key);
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether `id` is currently tracked.
    #[must_use]
    pub fn contains(&self, id: I) -> bool {
        self.entries.contains_key(&id)
    }

    /// Last-set position of `id`, if tracked.
    #[must_use]
    pub fn position_of(&self, id: I) -> Option<Vec3> {
        self.entries.get(&id).map(|(_, position)| *position)
    }

    /// Number of tracked ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the grid is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All ids whose last-set position lies within `radius` of `center`,
    /// sorted by id.
    ///
    /// The covering cell range is scanned, candidates are de-duplicated (an
    /// id only ever occupies one cell; the guard is defensive), then
    /// filtered by exact squared distance.
    #[must_use]
    pub fn query_radius(&self, center: Vec3, radius: f32) -> Vec<I> {
        let mut out = self.scan_cells(
            center - Vec3::splat(radius),
            center + Vec3::splat(radius),
        );
        let radius_sq = radius * radius;
        out.retain(|id| {
            self.entries
                .get(id)
                .is_some_and(|(_, position)| position.distance_squared(center) <= radius_sq)
        });
        out.sort_unstable();
        out.dedup();
        out
    }

    /// All ids registered in cells overlapping the box `[min, max]`, sorted
    /// by id.
    ///
    /// This is a conservative superset at cell granularity; callers wanting
    /// exact containment filter the result against their own positions.
    #[must_use]
    pub fn query_aabb(&self, min: Vec3, max: Vec3) -> Vec<I> {
        let mut out = self.scan_cells(min, max);
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Occupancy snapshot.
    #[must_use]
    pub fn stats(&self) -> GridStats {
        GridStats {
            cells: self.cells.len(),
            entries: self.entries.len(),
            largest_cell: self.cells.values().map(Vec::len).max().unwrap_or(0),
        }
    }

    fn scan_cells(&self, min: Vec3, max: Vec3) -> Vec<I> {
        let lo = CellKey::from_position(min, self.cell_size);
        let hi = CellKey::from_position(max, self.cell_size);
        let mut out = Vec::new();
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    if let Some(bucket) = self.cells.get(&CellKey { x, y, z }) {
                        out.extend_from_slice(bucket);
                    }
                }
            }
        }
        out
    }
}

// =============================================================================
// Tests
// =============================================================================
