/// Grid geometry: cell coordinates and the square board they live on.
///
/// Coordinates are signed so that a head stepped off the edge is still
/// representable; `Grid::contains` is the single bounds check.

use super::heading::Heading;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// The neighbouring cell one unit along `heading`.
    pub fn step(self, heading: Heading) -> Coord {
        let (dx, dy) = heading.delta();
        Coord { x: self.x + dx, y: self.y + dy }
    }
}

/// A square board of `size × size` cells.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Grid {
    pub size: i32,
}

impl Grid {
    pub fn new(size: i32) -> Self {
        Grid { size }
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.size && c.y < self.size
    }

    pub fn cell_count(&self) -> usize {
        (self.size * self.size) as usize
    }

    /// Row-major iterator over every cell.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| Coord { x, y }))
    }

    /// Opening position: a vertical 3-cell segment centred on the board,
    /// head on top, ready to move up.
    pub fn spawn_segment(&self, len: usize) -> Vec<Coord> {
        let mid = self.size / 2;
        (0..len as i32).map(|i| Coord { x: mid, y: mid + i }).collect()
    }
}
