//! Hit shapes and precise overlap tests.
//!
//! A [`Silhouette`] is a bit mask: collision is decided cell by cell, so two
//! shapes whose bounding boxes intersect only where both are empty do not
//! collide. [`Shape`] is the serializable description a silhouette is built
//! from, so configs stay small and free of any image representation.

use serde::{Deserialize, Serialize};

/// Serializable description of a hit shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Fully solid rectangle.
    Rect {
        /// Width in cells.
        width: u32,
        /// Height in cells.
        height: u32,
    },
    /// Ellipse inscribed in a `width x height` box.
    Ellipse {
        /// Width in cells.
        width: u32,
        /// Height in cells.
        height: u32,
    },
    /// Explicit mask, one string per row; `#` marks a solid cell.
    Mask {
        /// Rows from top to bottom.
        rows: Vec<String>,
    },
}

impl Shape {
    /// Width of the shape's bounding box.
    pub fn width(&self) -> u32 {
        match self {
            Self::Rect { width, .. } | Self::Ellipse { width, .. } => *width,
            Self::Mask { rows } => rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32,
        }
    }

    /// Height of the shape's bounding box.
    pub fn height(&self) -> u32 {
        match self {
            Self::Rect { height, .. } | Self::Ellipse { height, .. } => *height,
            Self::Mask { rows } => rows.len() as u32,
        }
    }

    /// True when the bounding box has no area.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Rasterize into a silhouette.
    pub fn to_silhouette(&self) -> Silhouette {
        match self {
            Self::Rect { width, height } => Silhouette::rect(*width, *height),
            Self::Ellipse { width, height } => Silhouette::ellipse(*width, *height),
            Self::Mask { rows } => Silhouette::from_rows(rows),
        }
    }
}

/// A rasterized hit shape anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Silhouette {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

fn cell_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

impl Silhouette {
    /// A fully solid rectangle.
    pub fn rect(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![true; cell_count(width, height)],
        }
    }

    /// An ellipse inscribed in a `width x height` box, sampled at cell centers.
    pub fn ellipse(width: u32, height: u32) -> Self {
        let rx = f64::from(width) / 2.0;
        let ry = f64::from(height) / 2.0;
        let mut cells = Vec::with_capacity(cell_count(width, height));
        for y in 0..height {
            for x in 0..width {
                let nx = (f64::from(x) + 0.5 - rx) / rx;
                let ny = (f64::from(y) + 0.5 - ry) / ry;
                cells.push(nx * nx + ny * ny <= 1.0);
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build from text rows; `#` is solid, anything else is empty.
    /// Short rows are padded with empty cells.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0) as u32;
        let height = rows.len() as u32;
        let mut cells = vec![false; cell_count(width, height)];
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.as_ref().chars().enumerate() {
                cells[y * width as usize + x] = c == '#';
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the cell at `(x, y)` is solid. Out-of-range cells are empty.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        self.cells[(y as usize) * self.width as usize + x as usize]
    }

    /// Mirror top to bottom.
    pub fn flipped_vertical(&self) -> Self {
        let w = self.width as usize;
        let cells = self
            .cells
            .chunks(w.max(1))
            .rev()
            .flatten()
            .copied()
            .collect();
        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// Number of solid cells.
    pub fn area(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// First cell (in `self` coordinates, row-major) where `self` and `other`
    /// are both solid, with `other`'s top-left corner placed at `offset`
    /// relative to `self`'s. `None` if the shapes are disjoint.
    pub fn overlap(&self, other: &Silhouette, offset: (i64, i64)) -> Option<(i64, i64)> {
        let (dx, dy) = offset;
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (dx + i64::from(other.width)).min(i64::from(self.width));
        let y1 = (dy + i64::from(other.height)).min(i64::from(self.height));
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return Some((x, y));
                }
            }
        }
        None
    }
}
