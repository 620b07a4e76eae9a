use anyhow::Result;

use crate::board::BoardPoint;
use crate::messages::{ClientMessage, RawSnapshot};
use crate::moves::{check_move, MoveCheck};
use crate::state::{GameState, Phase};

/// The in-progress half of a two-click gesture. Cleared on every
/// completed or rejected gesture and on every inbound snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Source(BoardPoint),
}

/// What a session handler wants the outside world to do: show a status
/// line and/or transmit a message. The caller re-renders after every
/// handler regardless.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Update {
    pub status: Option<String>,
    pub outbound: Option<ClientMessage>,
}

impl Update {
    fn status(message: impl Into<String>) -> Self {
        Update {
            status: Some(message.into()),
            outbound: None,
        }
    }

    fn send(message: ClientMessage, status: impl Into<String>) -> Self {
        Update {
            status: Some(status.into()),
            outbound: Some(message),
        }
    }
}

/// Rendering surface the session is presented on. Implemented by the
/// front end; the session itself never draws.
pub trait Present {
    fn render(&mut self, state: &GameState, selection: Selection);
    fn status(&mut self, message: &str);
    fn connection(&mut self, connected: bool);
}

/// The whole client-side session: the mirrored engine state, the
/// two-click selection machine, and the connectivity flag. All inputs
/// arrive through the handler methods below; none of them perform I/O,
/// they only return [`Update`]s.
#[derive(Debug, Default)]
pub struct Session {
    state: GameState,
    selection: Selection,
    connected: bool,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Replace the mirror with a fresh authoritative snapshot. The
    /// selection is reset before the swap: whatever it was reasoned
    /// about may no longer hold.
    pub fn apply_snapshot(&mut self, raw: RawSnapshot) -> Result<Update> {
        let state = GameState::try_from(raw)?;
        self.selection = Selection::Idle;
        self.state = state;
        Ok(Update::default())
    }

    /// One click on the board. Two clicks make a gesture: the first
    /// captures a source, the second names a target and always resolves
    /// the gesture, accepted or not.
    pub fn click(&mut self, point: BoardPoint) -> Update {
        if !point.is_in_bounds() {
            return Update::status("Row and column must be between 0 and 2");
        }
        if self.state.done {
            self.selection = Selection::Idle;
            return Update::status("Game is over! Start a new game.");
        }
        match self.selection {
            Selection::Idle => self.select_source(point),
            Selection::Source(from) => {
                self.selection = Selection::Idle;
                self.complete_gesture(from, point)
            }
        }
    }

    fn select_source(&mut self, point: BoardPoint) -> Update {
        self.selection = Selection::Source(point);
        let cell = self.state.cell(point);
        let me = self.state.current_player;
        match cell.owner {
            None => Update::status(format!(
                "Selected empty cell ({},{}) - click again to place {} or click another cell",
                point.row, point.col, me
            )),
            Some(owner) if owner == me => Update::status(format!(
                "Selected your piece at ({},{}) - click where to move/attack/power-up",
                point.row, point.col
            )),
            Some(_) => {
                // Opponent pieces can never be a legal source.
                self.selection = Selection::Idle;
                Update::status(format!(
                    "That's opponent's piece! Click your own piece ({me})"
                ))
            }
        }
    }

    fn complete_gesture(&mut self, from: BoardPoint, to: BoardPoint) -> Update {
        match check_move(from, to, &self.state) {
            MoveCheck::Accept => Update::send(
                ClientMessage::move_between(from, to),
                "Processing move...",
            ),
            MoveCheck::Reject(reason) => Update::status(reason),
        }
    }

    /// Distinct action, not part of the click gesture: leave the
    /// movement phase. Only valid once assignment is complete.
    pub fn end_turn(&mut self) -> Update {
        if self.state.done {
            return Update::status("Game is over! Start a new game.");
        }
        match self.state.phase {
            Phase::Movement => Update::send(ClientMessage::EndTurn, "Ending turn..."),
            Phase::Assignment => Update::status("Must complete assignment phase first"),
        }
    }

    pub fn new_game(&mut self) -> Update {
        self.selection = Selection::Idle;
        Update::send(ClientMessage::New, "New game started!")
    }

    /// Ask the engine to resend the current snapshot.
    pub fn refresh(&self) -> Update {
        Update::send(ClientMessage::Show, "Refreshing board...")
    }

    pub fn set_connected(&mut self, connected: bool) -> Update {
        self.connected = connected;
        if connected {
            Update::status("Connected! Click a cell to place your first piece")
        } else {
            Update::status("Disconnected. Reconnecting in 3s...")
        }
    }
}
