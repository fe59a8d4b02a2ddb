use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::BoardParseError;
use crate::types::{BOARD_SIZE, Cell, Color, DIRECTIONS, NUM_SQUARES, Position, is_on_board};

/// For every square, the squares along each of the eight directions,
/// nearest first. Rays stop at the board edge.
static RAYS: Lazy<Vec<[Vec<usize>; 8]>> = Lazy::new(|| {
    (0..NUM_SQUARES)
        .map(|pos| {
            let (row, col) = pos_to_row_col(pos);
            std::array::from_fn(|dir| {
                let (dr, dc) = DIRECTIONS[dir];
                let mut ray = Vec::new();
                let (mut r, mut c) = (row + dr, col + dc);
                while is_on_board(r, c) {
                    ray.push((r as usize) * BOARD_SIZE + c as usize);
                    r += dr;
                    c += dc;
                }
                ray
            })
        })
        .collect()
});

/// Reversi board state represented by two bitboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

/// Undo record for a single applied move.
///
/// Flips only ever turn opponent discs into the mover's color, so the mask
/// alone is enough to restore the prior grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipRecord {
    pub position: Position,
    pub color: Color,
    flipped: u64,
}

impl FlipRecord {
    pub fn flipped_mask(&self) -> u64 {
        self.flipped
    }

    /// Flipped positions in row-major order.
    pub fn positions(&self) -> Vec<Position> {
        squares(self.flipped).map(Position::from_index).collect()
    }

    pub fn len(&self) -> usize {
        self.flipped.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.flipped == 0
    }
}

/// Canonical, hashable encoding of a full grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Fingerprint {
    pub black: u64,
    pub white: u64,
}

impl Fingerprint {
    /// CRC-32 over the little-endian bytes of both masks.
    pub fn digest(&self) -> u32 {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.black.to_le_bytes());
        bytes[8..].copy_from_slice(&self.white.to_le_bytes());
        crc32fast::hash(&bytes)
    }
}

impl Board {
    /// Creates the initial board:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    /// Builds a board from raw masks. Fails when a square is claimed by
    /// both colors.
    pub fn from_bitboards(black: u64, white: u64) -> Result<Self, BoardParseError> {
        let overlap = black & white;
        if overlap != 0 {
            return Err(BoardParseError::Overlap(overlap));
        }
        Ok(Self { black, white })
    }

    /// Parses an 8-line diagram using `B`, `W` and `.` (whitespace ignored).
    pub fn from_ascii(diagram: &str) -> Result<Self, BoardParseError> {
        let rows: Vec<&str> = diagram
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE {
            return Err(BoardParseError::RowCount(rows.len()));
        }

        let mut board = Self { black: 0, white: 0 };
        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|ch| !ch.is_whitespace()).collect();
            if cells.len() != BOARD_SIZE {
                return Err(BoardParseError::RowLength {
                    row,
                    len: cells.len(),
                });
            }
            for (col, ch) in cells.into_iter().enumerate() {
                let square = bit(row * BOARD_SIZE + col);
                match ch {
                    'B' | 'b' | 'X' | 'x' => board.black |= square,
                    'W' | 'w' | 'O' | 'o' => board.white |= square,
                    '.' | '-' => {}
                    _ => return Err(BoardParseError::InvalidCell { row, ch }),
                }
            }
        }
        Ok(board)
    }

    pub fn is_on_board(row: i32, col: i32) -> bool {
        is_on_board(row, col)
    }

    pub fn cell(&self, pos: Position) -> Cell {
        let square = bit(pos.index());
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Returns legal move mask for the given side.
    pub fn legal_mask(&self, color: Color) -> u64 {
        let (me, opp) = self.sides(color);
        let occupied = me | opp;
        let mut legal = 0u64;

        for pos in 0..NUM_SQUARES {
            let move_bit = bit(pos);
            if (occupied & move_bit) != 0 {
                continue;
            }
            if Self::collect_flips(pos, me, opp) != 0 {
                legal |= move_bit;
            }
        }

        legal
    }

    /// Legal destinations for `color` in row-major scan order.
    /// An empty list means `color` must pass.
    pub fn legal_moves(&self, color: Color) -> Vec<Position> {
        squares(self.legal_mask(color))
            .map(Position::from_index)
            .collect()
    }

    pub fn has_legal_move(&self, color: Color) -> bool {
        self.legal_mask(color) != 0
    }

    pub fn is_legal(&self, pos: Position, color: Color) -> bool {
        let (me, opp) = self.sides(color);
        Self::collect_flips(pos.index(), me, opp) != 0
    }

    /// Places one disc and flips every sandwiched run.
    /// Returns `None` and leaves the board untouched when the move is illegal.
    pub fn apply_move(&mut self, pos: Position, color: Color) -> Option<FlipRecord> {
        let (me, opp) = self.sides(color);
        let flips = Self::collect_flips(pos.index(), me, opp);
        if flips == 0 {
            return None;
        }

        let next_me = me | bit(pos.index()) | flips;
        let next_opp = opp & !flips;
        self.set_sides(color, next_me, next_opp);

        Some(FlipRecord {
            position: pos,
            color,
            flipped: flips,
        })
    }

    /// Exact inverse of [`Board::apply_move`]. Chained records must be
    /// undone in reverse order of application.
    pub fn undo_move(&mut self, record: &FlipRecord) {
        let (me, opp) = self.sides(record.color);
        let move_bit = bit(record.position.index());
        debug_assert_ne!(me & move_bit, 0, "undo of a move that is not on the board");
        debug_assert_eq!(
            me & record.flipped,
            record.flipped,
            "flipped discs no longer belong to the mover"
        );

        let prev_me = me & !(move_bit | record.flipped);
        let prev_opp = opp | record.flipped;
        self.set_sides(record.color, prev_me, prev_opp);
    }

    /// Returns `(black_count, white_count)`.
    pub fn score(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    pub fn count(&self, color: Color) -> u8 {
        let (me, _) = self.sides(color);
        me.count_ones() as u8
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        (!(self.black | self.white)).count_ones() as u8
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            black: self.black,
            white: self.white,
        }
    }

    /// Row-major cells.
    pub fn to_array(&self) -> [Cell; NUM_SQUARES] {
        std::array::from_fn(|pos| self.cell(Position::from_index(pos)))
    }

    fn sides(&self, color: Color) -> (u64, u64) {
        match color {
            Color::Black => (self.black, self.white),
            Color::White => (self.white, self.black),
        }
    }

    fn set_sides(&mut self, color: Color, me: u64, opp: u64) {
        match color {
            Color::Black => {
                self.black = me;
                self.white = opp;
            }
            Color::White => {
                self.white = me;
                self.black = opp;
            }
        }
    }

    fn collect_flips(pos: usize, me: u64, opp: u64) -> u64 {
        if pos >= NUM_SQUARES {
            return 0;
        }

        let move_bit = bit(pos);
        if ((me | opp) & move_bit) != 0 {
            return 0;
        }

        let mut flips = 0u64;
        for ray in &RAYS[pos] {
            let mut line = 0u64;
            for &sq in ray {
                let square = bit(sq);
                if (opp & square) != 0 {
                    line |= square;
                } else {
                    if (me & square) != 0 {
                        flips |= line;
                    }
                    break;
                }
            }
        }

        flips
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, cell) in self.to_array().iter().enumerate() {
            let ch = match cell {
                Cell::Black => 'B',
                Cell::White => 'W',
                Cell::Empty => '.',
            };
            write!(f, "{ch}")?;
            if pos % BOARD_SIZE == BOARD_SIZE - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Indices of the set bits of `mask`, ascending (row-major order).
pub(crate) fn squares(mask: u64) -> impl Iterator<Item = usize> {
    let mut bits = mask;
    std::iter::from_fn(move || {
        if bits == 0 {
            return None;
        }
        let idx = bits.trailing_zeros() as usize;
        bits &= bits - 1;
        Some(idx)
    })
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

fn pos_to_row_col(pos: usize) -> (i32, i32) {
    ((pos / BOARD_SIZE) as i32, (pos % BOARD_SIZE) as i32)
}
