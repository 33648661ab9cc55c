use std::collections::VecDeque;

use crate::error::MazeError;

/// Smallest odd side that still leaves one junction inside the border.
pub const MIN_SIDE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Open,
}

/// Grid coordinate; `x` is the column and `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Offsets the position, returning `None` when it would leave the
    /// non-negative quadrant.
    pub fn offset(self, dx: isize, dy: isize) -> Option<Pos> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Pos { x, y })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    /// Maps a raw intent onto one of the four unit steps.
    pub fn from_delta(dx: i32, dy: i32) -> Result<Dir, MazeError> {
        match (dx, dy) {
            (0, -1) => Ok(Dir::Up),
            (0, 1) => Ok(Dir::Down),
            (-1, 0) => Ok(Dir::Left),
            (1, 0) => Ok(Dir::Right),
            _ => Err(MazeError::InvalidDirection { dx, dy }),
        }
    }
}

/// Row-major maze cells. Dimensions are validated odd and at least
/// [`MIN_SIDE`] at construction, so the start and exit always exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid of solid wall.
    pub fn filled(rows: usize, cols: usize) -> Result<Grid, MazeError> {
        if !valid_side(rows) || !valid_side(cols) {
            return Err(MazeError::InvalidDimensions { rows, cols });
        }
        Ok(Grid {
            rows,
            cols,
            cells: vec![Cell::Wall; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Pos {
        Pos::new(1, 1)
    }

    pub fn exit(&self) -> Pos {
        Pos::new(self.cols - 2, self.rows - 2)
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.cols && pos.y < self.rows
    }

    /// True for cells strictly inside the outer wall.
    pub fn is_interior(&self, pos: Pos) -> bool {
        pos.x > 0 && pos.y > 0 && pos.x < self.cols - 1 && pos.y < self.rows - 1
    }

    /// Cell at `pos`, or `None` outside the grid.
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        if self.in_bounds(pos) {
            Some(self.cells[self.index(pos)])
        } else {
            None
        }
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.get(pos) == Some(Cell::Open)
    }

    pub(crate) fn carve(&mut self, pos: Pos) {
        debug_assert!(self.is_interior(pos), "carve outside interior: {pos:?}");
        let idx = self.index(pos);
        self.cells[idx] = Cell::Open;
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Open).count()
    }

    /// Open neighbours of `pos` in the four compass directions.
    pub fn open_neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        Dir::ALL.into_iter().filter_map(move |dir| {
            let (dx, dy) = dir.delta();
            pos.offset(dx, dy).filter(|next| self.is_open(*next))
        })
    }

    pub fn path_exists(&self, from: Pos, to: Pos) -> bool {
        self.shortest_path(from, to).is_some()
    }

    /// Breadth-first shortest open path, both ends included.
    pub fn shortest_path(&self, from: Pos, to: Pos) -> Option<Vec<Pos>> {
        if !self.is_open(from) || !self.is_open(to) {
            return None;
        }
        let mut came_from: Vec<Option<Pos>> = vec![None; self.cells.len()];
        let mut seen = vec![false; self.cells.len()];
        let mut q = VecDeque::new();
        seen[self.index(from)] = true;
        q.push_back(from);

        while let Some(pos) = q.pop_front() {
            if pos == to {
                let mut path = vec![to];
                let mut cur = to;
                while let Some(prev) = came_from[self.index(cur)] {
                    path.push(prev);
                    cur = prev;
                }
                path.reverse();
                return Some(path);
            }
            for next in self.open_neighbors(pos) {
                let idx = self.index(next);
                if !seen[idx] {
                    seen[idx] = true;
                    came_from[idx] = Some(pos);
                    q.push_back(next);
                }
            }
        }
        None
    }

    fn index(&self, pos: Pos) -> usize {
        pos.y * self.cols + pos.x
    }
}

fn valid_side(side: usize) -> bool {
    side >= MIN_SIDE && side % 2 == 1
}
