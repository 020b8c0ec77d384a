use std::collections::{HashMap, HashSet, VecDeque};

use crate::ir::{Direction, NodeId};

use super::analysis::GraphAnalysis;
use super::types::GridCell;

/// Lateral slots tried per primary row before an orphan moves on to the next row.
pub const ORPHAN_SWEEP_SPAN: i64 = 10;
/// Lateral distance between consecutive start nodes.
pub const START_NODE_SPACING: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Axis along which the layout progresses.
pub fn primary_axis(direction: Direction) -> Axis {
    match direction {
        Direction::LeftRight => Axis::X,
        Direction::TopDown => Axis::Y,
    }
}

/// Axis along which siblings are spread apart.
pub fn lateral_axis(direction: Direction) -> Axis {
    match direction {
        Direction::LeftRight => Axis::Y,
        Direction::TopDown => Axis::X,
    }
}

/// Direction-independent view of grid cells as `(primary, lateral)` pairs.
#[derive(Debug, Clone, Copy)]
struct Frame {
    primary: Axis,
    lateral: Axis,
}

impl Frame {
    fn new(direction: Direction) -> Self {
        Self {
            primary: primary_axis(direction),
            lateral: lateral_axis(direction),
        }
    }

    fn cell(&self, primary: i64, lateral: i64) -> GridCell {
        let mut cell = GridCell::ORIGIN;
        set(&mut cell, self.primary, primary);
        set(&mut cell, self.lateral, lateral);
        cell
    }

    fn primary_of(&self, cell: GridCell) -> i64 {
        get(cell, self.primary)
    }

    fn lateral_of(&self, cell: GridCell) -> i64 {
        get(cell, self.lateral)
    }
}

fn get(cell: GridCell, axis: Axis) -> i64 {
    match axis {
        Axis::X => cell.x,
        Axis::Y => cell.y,
    }
}

fn set(cell: &mut GridCell, axis: Axis, value: i64) {
    match axis {
        Axis::X => cell.x = value,
        Axis::Y => cell.y = value,
    }
}

/// Cells taken so far in one layout call.
#[derive(Debug, Default)]
struct Occupancy {
    cells: HashSet<GridCell>,
}

impl Occupancy {
    fn is_free(&self, cell: GridCell) -> bool {
        !self.cells.contains(&cell)
    }

    fn claim(&mut self, cell: GridCell) {
        let fresh = self.cells.insert(cell);
        debug_assert!(fresh, "cell {cell} claimed twice");
    }

    fn len(&self) -> usize {
        self.cells.len()
    }
}

#[derive(Debug, Clone)]
pub struct GridPlacement<'a> {
    pub cells: HashMap<&'a NodeId, GridCell>,
    /// Nodes the traversal never reached, in input order.
    pub orphans: Vec<&'a NodeId>,
}

impl GridPlacement<'_> {
    pub fn cell(&self, id: &NodeId) -> Option<GridCell> {
        self.cells.get(id).copied()
    }
}

/// Assign every analyzed node its own grid cell.
///
/// Start nodes go down the lateral axis at primary 0. A breadth-first pass
/// from all of them at once then places each unvisited successor one step
/// ahead of its parent, centred laterally on the parent, sliding forward
/// along the primary axis past taken cells. Whatever the traversal misses is
/// swept into the first free cell of a bounded raster from the origin.
pub fn place_nodes<'a>(analysis: &GraphAnalysis<'a>, direction: Direction) -> GridPlacement<'a> {
    let frame = Frame::new(direction);
    let mut occupancy = Occupancy::default();
    let mut cells: HashMap<&'a NodeId, GridCell> = HashMap::with_capacity(analysis.order.len());
    let mut queue: VecDeque<&'a NodeId> = VecDeque::new();

    for (index, &id) in analysis.start_nodes.iter().enumerate() {
        let mut lateral = index as i64 * START_NODE_SPACING;
        while !occupancy.is_free(frame.cell(0, lateral)) {
            lateral += 1;
        }
        let cell = frame.cell(0, lateral);
        occupancy.claim(cell);
        cells.insert(id, cell);
        queue.push_back(id);
        tracing::trace!(node = %id, %cell, "placed start node");
    }

    while let Some(parent) = queue.pop_front() {
        let Some(&parent_cell) = cells.get(parent) else {
            continue;
        };
        let children = analysis.successors(parent);
        let half = (children.len() / 2) as i64;
        for (index, &child) in children.iter().enumerate() {
            if cells.contains_key(child) {
                continue;
            }
            let cell = child_cell(&frame, &occupancy, parent_cell, index as i64 - half);
            occupancy.claim(cell);
            cells.insert(child, cell);
            queue.push_back(child);
            tracing::trace!(node = %child, parent = %parent, %cell, "placed child");
        }
    }

    let mut orphans = Vec::new();
    for &id in &analysis.order {
        if cells.contains_key(id) {
            continue;
        }
        let cell = sweep_cell(&frame, &occupancy);
        occupancy.claim(cell);
        cells.insert(id, cell);
        orphans.push(id);
        tracing::trace!(node = %id, %cell, "placed orphan");
    }

    debug_assert_eq!(occupancy.len(), analysis.order.len());
    tracing::debug!(
        placed = cells.len(),
        start_nodes = analysis.start_nodes.len(),
        orphans = orphans.len(),
        direction = direction.as_token(),
        "grid placement done"
    );

    GridPlacement { cells, orphans }
}

fn child_cell(frame: &Frame, occupancy: &Occupancy, parent: GridCell, offset: i64) -> GridCell {
    let parent_lateral = frame.lateral_of(parent);
    let lateral = parent_lateral + offset;
    let mut primary = frame.primary_of(parent) + 1;
    while !occupancy.is_free(frame.cell(primary, lateral)) {
        primary += 1;
    }

    // Lateral nudge away from the parent; a no-op while the forward scan is unbounded.
    let mut cell = frame.cell(primary, lateral);
    while !occupancy.is_free(cell) {
        let current = frame.lateral_of(cell);
        let step = if current > parent_lateral { 1 } else { -1 };
        cell = frame.cell(primary, current + step);
    }
    cell
}

fn sweep_cell(frame: &Frame, occupancy: &Occupancy) -> GridCell {
    let mut primary = 0;
    let mut lateral = 0;
    while !occupancy.is_free(frame.cell(primary, lateral)) {
        lateral += 1;
        if lateral > ORPHAN_SWEEP_SPAN {
            primary += 1;
            lateral = 0;
        }
    }
    frame.cell(primary, lateral)
}
