use core::fmt;
use std::{
    fmt::{Debug, Formatter},
    ops::{Index, IndexMut},
    slice::Chunks,
};

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// The board is always 3×3.
pub const BOARD_SIZE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardPoint {
    pub row: usize,
    pub col: usize,
}

impl BoardPoint {
    pub fn new(row: usize, col: usize) -> Self {
        BoardPoint { row, col }
    }

    pub fn is_in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// True when `other` is exactly one step away horizontally or
    /// vertically. Diagonals don't count, and a point is not its own
    /// neighbor.
    pub fn is_orthogonal_neighbor(&self, other: &BoardPoint) -> bool {
        unsigned_diff(self.row, other.row) + unsigned_diff(self.col, other.col) == 1
    }

    pub fn orthogonal_neighbors(&self) -> Vec<BoardPoint> {
        let mut neighbors = Vec::with_capacity(4);
        let BoardPoint { row, col } = *self;
        if row > 0 {
            neighbors.push(BoardPoint { row: row - 1, col });
        }
        if col > 0 {
            neighbors.push(BoardPoint { row, col: col - 1 });
        }
        if col < BOARD_SIZE - 1 {
            neighbors.push(BoardPoint { row, col: col + 1 });
        }
        if row < BOARD_SIZE - 1 {
            neighbors.push(BoardPoint { row: row + 1, col });
        }
        neighbors
    }
}

fn unsigned_diff(first: usize, second: usize) -> usize {
    if first >= second {
        first - second
    } else {
        second - first
    }
}

/// Row-major 3×3 grid of cells.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; BOARD_SIZE * BOARD_SIZE],
}

impl Debug for Board {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let rows = self
            .rows_iter()
            .map(|row| {
                row.iter()
                    .fold(String::new(), |acc, cell| acc + &format!("|{cell}"))
                    + "|"
            })
            .collect::<Vec<_>>()
            .join("\n");
        write!(f, "{}", rows)
    }
}

impl Index<BoardPoint> for Board {
    type Output = Cell;

    fn index(&self, point: BoardPoint) -> &Self::Output {
        &self.cells[point.row * BOARD_SIZE + point.col]
    }
}

impl IndexMut<BoardPoint> for Board {
    fn index_mut(&mut self, point: BoardPoint) -> &mut Self::Output {
        &mut self.cells[point.row * BOARD_SIZE + point.col]
    }
}

impl Index<&BoardPoint> for Board {
    type Output = Cell;

    fn index(&self, point: &BoardPoint) -> &Self::Output {
        &self[*point]
    }
}

impl Board {
    pub fn rows_iter(&self) -> Chunks<Cell> {
        self.cells.chunks(BOARD_SIZE)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }
}
