//! Uniform grid broad phase
//!
//! The plane is split into square cells of side `cell_size`. Every step the
//! grid is rebuilt from scratch: each body index is pushed into every cell its
//! bounding box overlaps. Candidate pairs are then read per cell.
//!
//! A pair of bodies can share several cells. Each pair is reported only from
//! the lowest-coordinate cell of the overlap of the two bodies' cell spans, so
//! the candidate sequence contains no duplicates.
//!
//! Bodies that would cover more than [`MAX_SPAN_CELLS`] cells (very large
//! anchors, for example) are kept out of the cells and paired with every
//! other body instead.

use std::collections::hash_map;
use std::collections::HashMap;

use glam::{IVec2, Vec2};

use crate::body::Body;
use crate::error::{ensure_positive, SimError};

/// Cell count above which a body is tracked outside the cells
pub const MAX_SPAN_CELLS: i64 = 256;

/// Inclusive range of cells covered by one body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellSpan {
    min: IVec2,
    max: IVec2,
}

impl CellSpan {
    fn cell_count(&self) -> i64 {
        let w = self.max.x as i64 - self.min.x as i64 + 1;
        let h = self.max.y as i64 - self.min.y as i64 + 1;
        w * h
    }
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    inv_cell_size: f32,
    cells: HashMap<IVec2, Vec<usize>>,
    /// Per body; `None` for oversized bodies
    spans: Vec<Option<CellSpan>>,
    oversized: Vec<usize>,
    memberships: usize,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Result<Self, SimError> {
        let cell_size = ensure_positive("cell_size", cell_size)?;
        Ok(Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
            spans: Vec::new(),
            oversized: Vec::new(),
            memberships: 0,
        })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Grid coordinates of the cell containing `position`
    pub fn cell_of(&self, position: Vec2) -> IVec2 {
        (position * self.inv_cell_size).floor().as_ivec2()
    }

    /// Clear all cells and reinsert every body.
    ///
    /// Cells that were occupied on the previous rebuild keep their
    /// allocation; cells that stayed empty are dropped.
    pub fn rebuild(&mut self, bodies: &[Body]) {
        self.cells.retain(|_, members| {
            let keep = !members.is_empty();
            members.clear();
            keep
        });
        self.spans.clear();
        self.oversized.clear();
        self.memberships = 0;

        for (index, body) in bodies.iter().enumerate() {
            let (lo, hi) = body.aabb();
            let span = CellSpan {
                min: self.cell_of(lo),
                max: self.cell_of(hi),
            };

            if span.cell_count() > MAX_SPAN_CELLS || !body.position.is_finite() {
                self.spans.push(None);
                self.oversized.push(index);
                continue;
            }

            self.spans.push(Some(span));
            for y in span.min.y..=span.max.y {
                for x in span.min.x..=span.max.x {
                    self.cells.entry(IVec2::new(x, y)).or_default().push(index);
                    self.memberships += 1;
                }
            }
        }

        log::trace!(
            "grid rebuilt: {} bodies, {} memberships, {} oversized",
            bodies.len(),
            self.memberships,
            self.oversized.len()
        );
    }

    /// Lazily enumerate candidate pairs `(i, j)` with `i < j`.
    ///
    /// Every pair of bodies whose bounding boxes share a cell appears exactly
    /// once, so every pair of overlapping circles is included.
    pub fn candidate_pairs(&self) -> CandidatePairs<'_> {
        CandidatePairs {
            grid: self,
            cells: self.cells.iter(),
            current: None,
            i: 0,
            j: 1,
            oversized_pos: 0,
            partner: 0,
        }
    }

    /// Number of bodies indexed by the last rebuild
    pub fn body_count(&self) -> usize {
        self.spans.len()
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|members| !members.is_empty()).count()
    }

    /// Total (body, cell) memberships from the last rebuild
    pub fn memberships(&self) -> usize {
        self.memberships
    }

    pub fn oversized(&self) -> &[usize] {
        &self.oversized
    }

    fn is_oversized(&self, index: usize) -> bool {
        self.spans[index].is_none()
    }

    /// Lowest-coordinate cell covered by both bodies. Only called for bodies
    /// that share at least one cell.
    fn first_shared_cell(&self, a: usize, b: usize) -> Option<IVec2> {
        let (a, b) = (self.spans[a]?, self.spans[b]?);
        Some(a.min.max(b.min))
    }
}

/// Candidate pair sequence produced by [`SpatialGrid::candidate_pairs`].
pub struct CandidatePairs<'a> {
    grid: &'a SpatialGrid,
    cells: hash_map::Iter<'a, IVec2, Vec<usize>>,
    current: Option<(IVec2, &'a [usize])>,
    i: usize,
    j: usize,
    oversized_pos: usize,
    partner: usize,
}

impl<'a> CandidatePairs<'a> {
    fn next_from_cells(&mut self) -> Option<(usize, usize)> {
        loop {
            if let Some((key, members)) = self.current {
                while self.i < members.len() {
                    if self.j >= members.len() {
                        self.i += 1;
                        self.j = self.i + 1;
                        continue;
                    }
                    let (a, b) = (members[self.i], members[self.j]);
                    self.j += 1;
                    if self.grid.first_shared_cell(a, b) == Some(key) {
                        return Some((a.min(b), a.max(b)));
                    }
                }
                self.current = None;
            }

            let (key, members) = self.cells.next()?;
            self.current = Some((*key, members.as_slice()));
            self.i = 0;
            self.j = 1;
        }
    }

    fn next_from_oversized(&mut self) -> Option<(usize, usize)> {
        let grid = self.grid;
        while let Some(&big) = grid.oversized.get(self.oversized_pos) {
            while self.partner < grid.body_count() {
                let other = self.partner;
                self.partner += 1;
                if other == big || (grid.is_oversized(other) && other < big) {
                    continue;
                }
                return Some((big.min(other), big.max(other)));
            }
            self.oversized_pos += 1;
            self.partner = 0;
        }
        None
    }
}

impl<'a> Iterator for CandidatePairs<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_from_cells().or_else(|| self.next_from_oversized())
    }
}
