use std::fmt::{self, Display, Formatter};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardPoint, BOARD_SIZE};
use crate::cell::{Cell, Player};
use crate::messages::RawSnapshot;

/// Turn phase. Every turn starts in assignment (spend the power bank on
/// same-cell place/power-up actions) and moves to movement once the bank
/// is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Assignment,
    Movement,
}

impl Phase {
    /// The engine serializes the phase as an integer. Unknown values
    /// normalize to assignment, like the other defaulted fields.
    pub fn from_wire(value: u8) -> Phase {
        match value {
            1 => Phase::Movement,
            _ => Phase::Assignment,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            Phase::Assignment => 0,
            Phase::Movement => 1,
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Assignment => write!(f, "Assignment"),
            Phase::Movement => write!(f, "Movement"),
        }
    }
}

/// The latest authoritative snapshot, mirrored verbatim. Never mutated
/// in place; every inbound snapshot replaces it wholesale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub current_player: Player,
    pub done: bool,
    pub phase: Phase,
    pub movement_taken: bool,
    pub power_bank: [u32; 2],
    pub line_bonus: [u32; 2],
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            board: Board::default(),
            current_player: Player::One,
            done: false,
            phase: Phase::Assignment,
            movement_taken: false,
            power_bank: [1, 1],
            line_bonus: [0, 0],
        }
    }
}

impl GameState {
    pub fn cell(&self, point: BoardPoint) -> Cell {
        self.board[point]
    }

    pub fn power_bank(&self, player: Player) -> u32 {
        self.power_bank[player.index()]
    }

    pub fn line_bonus(&self, player: Player) -> u32 {
        self.line_bonus[player.index()]
    }
}

impl TryFrom<RawSnapshot> for GameState {
    type Error = anyhow::Error;

    fn try_from(raw: RawSnapshot) -> Result<Self> {
        if raw.board.len() != BOARD_SIZE || raw.board.iter().any(|row| row.len() != BOARD_SIZE) {
            bail!("snapshot board is not {BOARD_SIZE}x{BOARD_SIZE}");
        }
        let mut board = Board::default();
        for (row, cells) in raw.board.iter().enumerate() {
            for (col, wire) in cells.iter().enumerate() {
                let owner = match wire.player {
                    0 => None,
                    id => match Player::from_wire(id) {
                        Some(p) => Some(p),
                        None => bail!("snapshot cell ({row},{col}) has unknown owner {id}"),
                    },
                };
                board[BoardPoint::new(row, col)] = Cell {
                    owner,
                    power: wire.power,
                };
            }
        }
        Ok(GameState {
            board,
            current_player: Player::from_wire(raw.current_player).unwrap_or(Player::One),
            done: raw.done,
            phase: raw.current_phase.map(Phase::from_wire).unwrap_or_default(),
            movement_taken: raw.movement_taken.unwrap_or(false),
            power_bank: [
                raw.player1_power_bank.unwrap_or(1),
                raw.player2_power_bank.unwrap_or(1),
            ],
            line_bonus: [
                raw.player1_lines.unwrap_or(0),
                raw.player2_lines.unwrap_or(0),
            ],
        })
    }
}
