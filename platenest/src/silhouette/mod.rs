use anyhow::Result;
use anyhow::ensure;
use itertools::Itertools;
use log::debug;
use ndarray::Array2;
use ordered_float::NotNan;

use crate::geometry::primitives::Point;
use crate::geometry::primitives::Polygon;
use crate::geometry::primitives::Rect;
use crate::geometry::quantize::collapse_collinear;

const OCCUPIED: u8 = 0b001;
const OUTLINE: u8 = 0b010;
const ON_PATH: u8 = 0b100;

/// 8-neighborhood probe order: counter-clockwise from east, except that the
/// south-west probe is tried before due west.
const DIRS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, -1),
    (-1, 0),
    (0, -1),
    (1, -1),
];

/// Extracts closed outline polygon(s) approximating the projection of a
/// triangle mesh at the given grid `interval`.
///
/// The triangles must already be transformed into the target frame; only their
/// x/y footprint is considered. Disjoint outline loops are merged into a
/// single contour, so the result holds at most one polygon. Empty input yields
/// an empty list, never an error.
pub fn extract_silhouette(
    triangles: &[[Point; 3]],
    bbox: Rect,
    interval: f64,
) -> Result<Vec<Polygon>> {
    if triangles.is_empty() {
        return Ok(vec![]);
    }
    let mut grid = SilhouetteGrid::new(bbox, interval)?;
    for triangle in triangles {
        grid.add_triangle(*triangle);
    }
    Ok(grid.extract())
}

/// Occupancy grid for one silhouette extraction.
///
/// All scratch state lives in this value; one instance serves exactly one
/// extraction call, so concurrent extractions never share state.
pub struct SilhouetteGrid {
    interval: f64,
    origin: Point,
    cells: Array2<u8>,
}

impl SilhouetteGrid {
    pub fn new(bbox: Rect, interval: f64) -> Result<Self> {
        ensure!(interval > 0.0, "grid interval must be positive: {interval}");
        //one cell of padding on every side keeps dilation and neighbor
        //checks in bounds
        let nx = (bbox.width() / interval).ceil() as usize + 3;
        let ny = (bbox.height() / interval).ceil() as usize + 3;
        Ok(SilhouetteGrid {
            interval,
            origin: Point(bbox.x_min - interval, bbox.y_min - interval),
            cells: Array2::zeros((nx, ny)),
        })
    }

    /// Rasterizes a triangle's footprint via per-column span fill, dilating
    /// each covered cell's 8-neighborhood by one cell. The dilation guarantees
    /// connectivity across triangles that share only an edge or a vertex.
    /// Degenerate (zero-span) triangles contribute nothing.
    pub fn add_triangle(&mut self, triangle: [Point; 3]) {
        let x_min = triangle.iter().map(|p| p.0).fold(f64::MAX, f64::min);
        let x_max = triangle.iter().map(|p| p.0).fold(f64::MIN, f64::max);
        if x_max <= x_min {
            return;
        }

        let col_lo = (((x_min - self.origin.0) / self.interval).floor().max(0.0)) as usize;
        let col_hi = (((x_max - self.origin.0) / self.interval).ceil()) as usize;
        let col_hi = col_hi.min(self.cells.nrows().saturating_sub(1));

        for col in col_lo..=col_hi {
            let x = self.origin.0 + (col as f64 + 0.5) * self.interval;
            let Some((y_min, y_max)) = triangle_span_at(&triangle, x) else {
                continue;
            };
            //a cell counts as covered when its center lies inside the span,
            //mirroring the column sampling; dilation absorbs the slack
            let row_lo = ((y_min - self.origin.1) / self.interval - 0.5).ceil().max(0.0) as usize;
            let row_hi = ((y_max - self.origin.1) / self.interval - 0.5).floor();
            if row_hi < 0.0 {
                continue;
            }
            for row in row_lo..=(row_hi as usize).min(self.cells.ncols().saturating_sub(1)) {
                self.occupy_dilated(col, row);
            }
        }
    }

    fn occupy_dilated(&mut self, col: usize, row: usize) {
        for di in -1..=1 {
            for dj in -1..=1 {
                let (i, j) = (col as isize + di, row as isize + dj);
                if let Some(cell) = self.cell_mut(i, j) {
                    *cell |= OCCUPIED;
                }
            }
        }
    }

    fn cell_mut(&mut self, i: isize, j: isize) -> Option<&mut u8> {
        if i < 0 || j < 0 {
            return None;
        }
        self.cells.get_mut((i as usize, j as usize))
    }

    fn is_occupied(&self, i: isize, j: isize) -> bool {
        if i < 0 || j < 0 {
            return false;
        }
        self.cells
            .get((i as usize, j as usize))
            .is_some_and(|&c| c & OCCUPIED != 0)
    }

    fn has_flag(&self, (i, j): (isize, isize), flag: u8) -> bool {
        i >= 0
            && j >= 0
            && self
                .cells
                .get((i as usize, j as usize))
                .is_some_and(|&c| c & flag != 0)
    }

    /// One pass flagging every occupied cell with at least one unoccupied
    /// 8-neighbor as a boundary cell.
    fn mark_outline(&mut self) {
        let (nx, ny) = self.cells.dim();
        for i in 0..nx {
            for j in 0..ny {
                if self.cells[(i, j)] & OCCUPIED == 0 {
                    continue;
                }
                let boundary = DIRS
                    .iter()
                    .any(|&(di, dj)| !self.is_occupied(i as isize + di, j as isize + dj));
                if boundary {
                    self.cells[(i, j)] |= OUTLINE;
                }
            }
        }
    }

    fn find_outline_cell(&self) -> Option<(isize, isize)> {
        let (nx, ny) = self.cells.dim();
        for i in 0..nx {
            for j in 0..ny {
                if self.cells[(i, j)] & OUTLINE != 0 {
                    return Some((i as isize, j as isize));
                }
            }
        }
        None
    }

    /// Walks one closed loop of boundary cells starting at `start`, clearing
    /// cells that turn out to be dead-end spurs. Returns `None` when no loop
    /// closes from this start.
    ///
    /// Each cell is pushed at most once: a backtracked cell loses its outline
    /// flag, which bounds the walk at two steps per boundary cell.
    ///
    /// Neighbors are probed in the fixed [`DIRS`] order rather than relative
    /// to the arrival direction, so the walk can cut across a convex corner
    /// cell; the skipped cell stays within one grid interval of the contour.
    fn walk_loop(&mut self, start: (isize, isize)) -> Option<Vec<(isize, isize)>> {
        let mut path = vec![start];
        *self.cell_mut(start.0, start.1).expect("start in bounds") |= ON_PATH;

        loop {
            let cur = *path.last().expect("path never empty here");
            if path.len() >= 3
                && DIRS
                    .iter()
                    .any(|&(di, dj)| (cur.0 + di, cur.1 + dj) == start)
            {
                //back at the start, loop is closed
                for &(i, j) in &path {
                    let cell = self.cell_mut(i, j).expect("path cell in bounds");
                    *cell &= !(OUTLINE | ON_PATH);
                }
                return Some(path);
            }

            let next = DIRS.iter().find_map(|&(di, dj)| {
                let cand = (cur.0 + di, cur.1 + dj);
                (self.has_flag(cand, OUTLINE) && !self.has_flag(cand, ON_PATH)).then_some(cand)
            });

            match next {
                Some(cand) => {
                    *self.cell_mut(cand.0, cand.1).expect("candidate in bounds") |= ON_PATH;
                    path.push(cand);
                }
                None => {
                    //dead end: clear the cell so it is never tried again
                    let cell = self.cell_mut(cur.0, cur.1).expect("path cell in bounds");
                    *cell &= !(OUTLINE | ON_PATH);
                    path.pop();
                    if path.is_empty() {
                        return None;
                    }
                }
            }
        }
    }

    /// Extracts outline loops until the grid is exhausted, consuming the grid.
    /// Multiple disjoint loops are merged into one contour.
    pub fn extract(mut self) -> Vec<Polygon> {
        self.mark_outline();

        let mut rings: Vec<Vec<Point>> = vec![];
        while let Some(start) = self.find_outline_cell() {
            let Some(path) = self.walk_loop(start) else {
                continue;
            };
            let cells = collapse_collinear(
                &path
                    .iter()
                    .map(|&(i, j)| Point(i as f64, j as f64))
                    .collect_vec(),
            );
            if cells.len() < 3 {
                continue;
            }
            rings.push(
                cells
                    .iter()
                    .map(|c| {
                        Point(
                            self.origin.0 + (c.0 + 0.5) * self.interval,
                            self.origin.1 + (c.1 + 0.5) * self.interval,
                        )
                    })
                    .collect_vec(),
            );
        }

        if rings.len() > 1 {
            debug!("[SIL] bridging {} disjoint outline loops", rings.len());
        }
        merge_rings(rings)
            .and_then(|ring| Polygon::new(ring).ok())
            .map(|p| vec![p])
            .unwrap_or_default()
    }
}

/// Vertical span of a triangle at the line `x = at`, if the line crosses it.
fn triangle_span_at(triangle: &[Point; 3], at: f64) -> Option<(f64, f64)> {
    let mut y_min = f64::MAX;
    let mut y_max = f64::MIN;
    let mut hit = false;
    for i in 0..3 {
        let a = triangle[i];
        let b = triangle[(i + 1) % 3];
        if a.0 == b.0 {
            if a.0 == at {
                y_min = y_min.min(a.1.min(b.1));
                y_max = y_max.max(a.1.max(b.1));
                hit = true;
            }
            continue;
        }
        let t = (at - a.0) / (b.0 - a.0);
        if (0.0..=1.0).contains(&t) {
            let y = a.1 + t * (b.1 - a.1);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
            hit = true;
        }
    }
    hit.then_some((y_min, y_max))
}

/// Merges disjoint rings into one contour by repeatedly bridging the two
/// closest points across components with a thin connector.
fn merge_rings(mut rings: Vec<Vec<Point>>) -> Option<Vec<Point>> {
    let mut merged = rings.pop()?;
    while let Some(other) = rings.pop() {
        let (i, j) = merged
            .iter()
            .enumerate()
            .cartesian_product(other.iter().enumerate())
            .min_by_key(|((_, a), (_, b))| {
                NotNan::new(a.sq_distance_to(b)).expect("distance is NaN")
            })
            .map(|((i, _), (j, _))| (i, j))?;

        let mut bridged = Vec::with_capacity(merged.len() + other.len() + 2);
        bridged.extend_from_slice(&merged[..=i]);
        bridged.extend_from_slice(&other[j..]);
        bridged.extend_from_slice(&other[..=j]);
        bridged.extend_from_slice(&merged[i..]);
        merged = bridged;
    }
    Some(merged)
}
