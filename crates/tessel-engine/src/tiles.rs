//! The tile-grid boundary.
//!
//! Physics only ever asks one question of the level: is this cell solid?
//! [`TileGrid`] is that capability; [`TileMap`] is a plain in-memory grid
//! good enough for tests, tools and simple levels.

// ---------------------------------------------------------------------------
// TileGrid
// ---------------------------------------------------------------------------

/// Read-only solidity query over a uniform grid of square cells.
///
/// Cells outside the grid must report non-solid: a body that leaves the map
/// is in open space.
pub trait TileGrid {
    /// Edge length of one cell in world pixels.
    fn tile_size(&self) -> f64;

    /// Whether the cell at `(col, row)` blocks solid bodies.
    fn is_solid_cell(&self, col: i64, row: i64) -> bool;

    /// Whether the cell containing world point `(x, y)` is solid.
    fn is_solid_at(&self, x: f64, y: f64) -> bool {
        let ts = self.tile_size();
        self.is_solid_cell((x / ts).floor() as i64, (y / ts).floor() as i64)
    }
}

/// Slack in world pixels when deciding whether a span reaches into a cell, so
/// a body snapped flush against a tile edge doesn't read as overlapping it.
pub const EDGE_EPSILON: f64 = 1e-6;

/// Inclusive range of cell indices covered by the span `[start, start + extent)`.
///
/// A span that ends exactly on a cell boundary does not cover the next cell.
pub fn cell_span(start: f64, extent: f64, tile_size: f64) -> (i64, i64) {
    let first = ((start + EDGE_EPSILON) / tile_size).floor() as i64;
    let last = ((start + extent - EDGE_EPSILON) / tile_size).ceil() as i64 - 1;
    (first, last.max(first))
}

// ---------------------------------------------------------------------------
// TileMap
// ---------------------------------------------------------------------------

/// Dense boolean grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    cols: usize,
    rows: usize,
    tile_size: f64,
    solid: Vec<bool>,
}

impl TileMap {
    /// An all-open grid.
    ///
    /// # Panics
    ///
    /// Panics if `tile_size` is not positive and finite.
    pub fn new(cols: usize, rows: usize, tile_size: f64) -> Self {
        assert!(
            tile_size > 0.0 && tile_size.is_finite(),
            "tile_size must be positive and finite, got {tile_size}"
        );
        Self {
            cols,
            rows,
            tile_size,
            solid: vec![false; cols * rows],
        }
    }

    /// Build from text rows, `#` marking solid cells. Short rows are padded
    /// with open cells.
    ///
    /// ```
    /// use tessel_engine::tiles::{TileGrid, TileMap};
    ///
    /// let map = TileMap::from_rows(&[
    ///     "#....#",
    ///     "######",
    /// ], 16.0);
    /// assert!(map.is_solid_cell(0, 0));
    /// assert!(!map.is_solid_cell(1, 0));
    /// assert!(map.is_solid_at(40.0, 20.0));
    /// assert!(!map.is_solid_cell(-1, 0));
    /// ```
    pub fn from_rows(rows: &[&str], tile_size: f64) -> Self {
        let cols = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut map = Self::new(cols, rows.len(), tile_size);
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == '#' {
                    map.solid[row * cols + col] = true;
                }
            }
        }
        map
    }

    /// Set one cell. Out-of-range coordinates are ignored.
    pub fn set_solid(&mut self, col: usize, row: usize, solid: bool) {
        if col < self.cols && row < self.rows {
            self.solid[row * self.cols + col] = solid;
        }
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width in world pixels.
    pub fn width_px(&self) -> f64 {
        self.cols as f64 * self.tile_size
    }

    /// Height in world pixels.
    pub fn height_px(&self) -> f64 {
        self.rows as f64 * self.tile_size
    }
}

impl Default for TileMap {
    /// An empty map with 16 px cells.
    fn default() -> Self {
        Self::new(0, 0, 16.0)
    }
}

impl TileGrid for TileMap {
    fn tile_size(&self) -> f64 {
        self.tile_size
    }

    fn is_solid_cell(&self, col: i64, row: i64) -> bool {
        if col < 0 || row < 0 {
            return false;
        }
        let (col, row) = (col as usize, row as usize);
        col < self.cols && row < self.rows && self.solid[row * self.cols + col]
    }
}
