use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;

use crate::board::BoardPoint;

/// Outbound messages, tagged by `"type"` to match the engine's wire
/// format. `Move` carries its coordinates as four space-separated
/// 0-based integers in `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "move")]
    Move { payload: String },
    #[serde(rename = "new")]
    New,
    #[serde(rename = "show")]
    Show,
    #[serde(rename = "endturn")]
    EndTurn,
}

impl ClientMessage {
    pub fn move_between(from: BoardPoint, to: BoardPoint) -> Self {
        ClientMessage::Move {
            payload: format!("{} {} {} {}", from.row, from.col, to.row, to.col),
        }
    }

    pub fn into_json(self) -> String {
        serde_json::to_string::<ClientMessage>(&self)
            .unwrap_or_else(|_| panic!("Should be able to serialize ClientMessage {:?}", self))
    }
}

impl FromStr for ClientMessage {
    type Err = SerdeJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str::<ClientMessage>(s)
    }
}

/// Inbound messages. The engine only ever pushes full board snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "board_state")]
    BoardState(RawSnapshot),
}

impl FromStr for ServerMessage {
    type Err = SerdeJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str::<ServerMessage>(s)
    }
}

/// A snapshot exactly as it appears on the wire. Optional fields were
/// added to the protocol after the first release and may be absent;
/// normalization into a [`crate::state::GameState`] fills in their
/// defaults in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub board: Vec<Vec<WireCell>>,
    #[serde(rename = "currentPlayer")]
    pub current_player: u8,
    pub done: bool,
    #[serde(rename = "player1PowerBank")]
    pub player1_power_bank: Option<u32>,
    #[serde(rename = "player2PowerBank")]
    pub player2_power_bank: Option<u32>,
    #[serde(rename = "player1Lines")]
    pub player1_lines: Option<u32>,
    #[serde(rename = "player2Lines")]
    pub player2_lines: Option<u32>,
    #[serde(rename = "currentPhase")]
    pub current_phase: Option<u8>,
    #[serde(rename = "movementTaken")]
    pub movement_taken: Option<bool>,
}

/// `player: 0` means the cell is unowned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCell {
    pub player: u8,
    pub power: u32,
}
