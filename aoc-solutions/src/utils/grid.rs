//! Rectangular character grids

use aoc_solver::ParseError;
use std::ops::Index;

/// `(x, y)` with `x` the column and `y` the row, origin top-left
pub type Pos = (usize, usize);

const NEIGHBOR_OFFSETS_8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const NEIGHBOR_OFFSETS_4: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Row-major grid where every row has the same width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T = u8> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl Grid<u8> {
    /// Parse one row per line, one cell per byte
    ///
    /// Trailing blank lines are ignored. Rows of different widths and empty
    /// input are rejected.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut lines: Vec<&str> = input.lines().collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        let width = lines
            .first()
            .map(|line| line.len())
            .filter(|&width| width > 0)
            .ok_or_else(|| ParseError::MissingData("grid has no rows".to_string()))?;

        let mut cells = Vec::with_capacity(width * lines.len());
        for (line_idx, line) in lines.iter().enumerate() {
            if line.len() != width {
                return Err(ParseError::at_line(
                    line_idx,
                    format!("row has width {}, expected {}", line.len(), width),
                ));
            }
            cells.extend_from_slice(line.as_bytes());
        }

        Ok(Self {
            width,
            height: lines.len(),
            cells,
        })
    }

    /// Position of the first cell equal to `byte`, scanning row by row
    pub fn find(&self, byte: u8) -> Option<Pos> {
        self.cells
            .iter()
            .position(|&cell| cell == byte)
            .map(|i| self.pos_of(i))
    }

    pub fn count(&self, byte: u8) -> usize {
        self.cells.iter().filter(|&&cell| cell == byte).count()
    }
}

impl<T> Grid<T> {
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(Pos) -> T) -> Self {
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(&mut f)
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn filled(width: usize, height: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, (x, y): Pos) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, pos: Pos) -> Option<&T> {
        self.contains(pos).then(|| &self.cells[pos.1 * self.width + pos.0])
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
        if self.contains(pos) {
            Some(&mut self.cells[pos.1 * self.width + pos.0])
        } else {
            None
        }
    }

    pub fn row(&self, y: usize) -> &[T] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks(self.width)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, &T)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (self.pos_of(i), cell))
    }

    /// The up-to-eight in-bounds cells around `pos`
    pub fn neighbors8(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        self.offset_all(pos, &NEIGHBOR_OFFSETS_8)
    }

    /// The up-to-four in-bounds orthogonal cells around `pos`
    pub fn neighbors4(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        self.offset_all(pos, &NEIGHBOR_OFFSETS_4)
    }

    pub fn map<U>(&self, mut f: impl FnMut(Pos, &T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.iter().map(|(pos, cell)| f(pos, cell)).collect(),
        }
    }

    fn offset_all<'g>(
        &'g self,
        (x, y): Pos,
        offsets: &'static [(isize, isize)],
    ) -> impl Iterator<Item = Pos> + 'g {
        offsets.iter().filter_map(move |&(dx, dy)| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            self.contains((nx, ny)).then_some((nx, ny))
        })
    }

    fn pos_of(&self, index: usize) -> Pos {
        (index % self.width, index / self.width)
    }
}

impl<T> Index<Pos> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): Pos) -> &T {
        assert!(x < self.width && y < self.height, "({x}, {y}) outside grid");
        &self.cells[y * self.width + x]
    }
}
