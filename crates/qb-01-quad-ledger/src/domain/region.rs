//! # Regions
//!
//! Grid geometry: quad sizes, aligned regions and their stable identifiers.
//!
//! The grid is `GRID_SIZE` cells on a side. A region of side `s` is anchored at
//! `(x, y)` with both coordinates multiples of `s`. Sizes nest:
//!
//! ```text
//! 24 ──4──▶ 12 ──4──▶ 6 ──4──▶ 3 ──9──▶ 1
//! ```
//!
//! so every region of side > 1 has exactly 4 (or 9, for side 3) aligned
//! children and every region of side < 24 has exactly one aligned parent.

use super::errors::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the square grid, in cells.
pub const GRID_SIZE: u32 = 408;

/// Allowed region sides, finest first.
pub const QUAD_SIDES: [u32; 5] = [1, 3, 6, 12, 24];

const LAYER_SHIFT: u32 = 56;
const POSITION_MASK: u64 = (1 << LAYER_SHIFT) - 1;

/// One of the five region sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuadSize {
    /// 1x1, a single cell.
    One,
    /// 3x3.
    Three,
    /// 6x6.
    Six,
    /// 12x12.
    Twelve,
    /// 24x24, the coarsest quad.
    TwentyFour,
}

impl QuadSize {
    /// All sizes, finest first.
    pub const ALL: [QuadSize; 5] = [
        QuadSize::One,
        QuadSize::Three,
        QuadSize::Six,
        QuadSize::Twelve,
        QuadSize::TwentyFour,
    ];

    /// Size with the given side, if it is one of the allowed sides.
    pub fn from_side(side: u32) -> Option<Self> {
        QUAD_SIDES
            .iter()
            .position(|s| *s == side)
            .map(|index| Self::ALL[index])
    }

    /// Side length in cells.
    pub fn side(self) -> u32 {
        QUAD_SIDES[self.index()]
    }

    /// Position in `ALL` (0 for cells, 4 for 24x24).
    pub fn index(self) -> usize {
        match self {
            QuadSize::One => 0,
            QuadSize::Three => 1,
            QuadSize::Six => 2,
            QuadSize::Twelve => 3,
            QuadSize::TwentyFour => 4,
        }
    }

    /// Layer number encoded in region ids (1 for cells, 5 for 24x24).
    pub fn layer(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Size for an encoded layer number.
    pub fn from_layer(layer: u8) -> Option<Self> {
        match layer {
            1..=5 => Some(Self::ALL[(layer - 1) as usize]),
            _ => None,
        }
    }

    /// Number of cells covered.
    pub fn cell_count(self) -> u64 {
        let side = u64::from(self.side());
        side * side
    }

    /// Next coarser size.
    pub fn parent(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Next finer size.
    pub fn child(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

/// An aligned square region of the grid.
///
/// Constructed only through `Region::new` (or deserialization, which runs the
/// same checks), so holding a `Region` means its size, bounds and alignment
/// are valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RegionTriple", into = "RegionTriple")]
pub struct Region {
    size: QuadSize,
    x: u32,
    y: u32,
}

/// Wire form of a region: `(side, x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTriple {
    /// Side length.
    pub side: u32,
    /// Anchor column.
    pub x: u32,
    /// Anchor row.
    pub y: u32,
}

impl Region {
    /// Validate and build a region of side `side` anchored at `(x, y)`.
    pub fn new(side: u32, x: u32, y: u32) -> Result<Self, LedgerError> {
        let size = QuadSize::from_side(side).ok_or(LedgerError::InvalidSize { side })?;
        if x >= GRID_SIZE || y >= GRID_SIZE {
            return Err(LedgerError::OutOfBounds { side, x, y });
        }
        if x % side != 0 || y % side != 0 {
            return Err(LedgerError::Misaligned { side, x, y });
        }
        Ok(Self { size, x, y })
    }

    /// A single cell.
    pub fn cell(x: u32, y: u32) -> Result<Self, LedgerError> {
        Self::new(1, x, y)
    }

    /// Size class.
    pub fn size(&self) -> QuadSize {
        self.size
    }

    /// Side length.
    pub fn side(&self) -> u32 {
        self.size.side()
    }

    /// Anchor column.
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Anchor row.
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Check if this region is a single cell.
    pub fn is_cell(&self) -> bool {
        self.size == QuadSize::One
    }

    /// Number of cells covered.
    pub fn cell_count(&self) -> u64 {
        self.size.cell_count()
    }

    /// Stable identifier.
    pub fn id(&self) -> RegionId {
        let position = u64::from(self.x) + u64::from(self.y) * u64::from(GRID_SIZE);
        RegionId((u64::from(self.size.layer()) << LAYER_SHIFT) | position)
    }

    /// Check if `(x, y)` lies inside this region.
    pub fn contains_cell(&self, x: u32, y: u32) -> bool {
        let side = self.side();
        x >= self.x && x < self.x + side && y >= self.y && y < self.y + side
    }

    /// Check if `other` lies entirely inside this region (a region contains itself).
    pub fn contains(&self, other: &Region) -> bool {
        other.size <= self.size && self.contains_cell(other.x, other.y)
    }

    /// Check if the two regions share at least one cell.
    ///
    /// Aligned regions either nest or are disjoint, so overlap is containment
    /// in one direction or the other.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// Enclosing region of the next coarser size.
    pub fn parent(&self) -> Option<Region> {
        let size = self.size.parent()?;
        let side = size.side();
        Some(Region {
            size,
            x: self.x - self.x % side,
            y: self.y - self.y % side,
        })
    }

    /// Aligned children of the next finer size: 9 for a 3x3, 4 otherwise,
    /// none for a cell. Row-major order.
    pub fn children(&self) -> Vec<Region> {
        let Some(size) = self.size.child() else {
            return Vec::new();
        };
        let step = size.side();
        let per_row = self.side() / step;
        let mut children = Vec::with_capacity((per_row * per_row) as usize);
        for row in 0..per_row {
            for col in 0..per_row {
                children.push(Region {
                    size,
                    x: self.x + col * step,
                    y: self.y + row * step,
                });
            }
        }
        children
    }

    /// Coordinates of every covered cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let (x0, y0, side) = (self.x, self.y, self.side());
        (y0..y0 + side).flat_map(move |y| (x0..x0 + side).map(move |x| (x, y)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = self.side();
        write!(f, "{}x{}@({},{})", side, side, self.x, self.y)
    }
}

impl TryFrom<RegionTriple> for Region {
    type Error = LedgerError;

    fn try_from(triple: RegionTriple) -> Result<Self, Self::Error> {
        Region::new(triple.side, triple.x, triple.y)
    }
}

impl From<Region> for RegionTriple {
    fn from(region: Region) -> Self {
        RegionTriple {
            side: region.side(),
            x: region.x,
            y: region.y,
        }
    }
}

/// Stable region identifier: layer in the top byte, `x + y * GRID_SIZE` below.
///
/// Ids of overlapping regions differ, but they name the same ownership space;
/// the ledger answers every query from cell coverage, never from the id alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId(pub u64);

impl RegionId {
    /// Encoded layer byte.
    pub fn layer(&self) -> u8 {
        (self.0 >> LAYER_SHIFT) as u8
    }

    /// Anchor coordinates, without validation.
    pub fn anchor(&self) -> (u32, u32) {
        let position = self.0 & POSITION_MASK;
        let grid = u64::from(GRID_SIZE);
        ((position % grid) as u32, (position / grid) as u32)
    }

    /// Decode into a validated region.
    pub fn decode(&self) -> Result<Region, LedgerError> {
        let invalid = LedgerError::InvalidRegionId { id: *self };
        let size = QuadSize::from_layer(self.layer()).ok_or(invalid.clone())?;
        if self.0 & POSITION_MASK >= u64::from(GRID_SIZE) * u64::from(GRID_SIZE) {
            return Err(invalid);
        }
        let (x, y) = self.anchor();
        Region::new(size.side(), x, y).map_err(|_| invalid)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl From<Region> for RegionId {
    fn from(region: Region) -> Self {
        region.id()
    }
}
