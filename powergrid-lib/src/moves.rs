use crate::board::BoardPoint;
use crate::state::{GameState, Phase};

/// Advisory verdict on a proposed source/target pair. `Accept` only
/// means "not obviously illegal" — the engine stays authoritative and
/// may still refuse the action, in which case the next snapshot simply
/// shows the unchanged board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveCheck {
    Accept,
    Reject(&'static str),
}

pub const REASON_GAME_OVER: &str = "Game is over! Start a new game.";
pub const REASON_ASSIGNMENT_SAME_CELL: &str =
    "Assignment phase allows only place/power-up on the same cell";
pub const REASON_MOVEMENT_NO_SAME_CELL: &str = "Movement phase forbids place/power-up";
pub const REASON_MOVEMENT_TAKEN: &str =
    "Movement action already used this turn; end turn to continue";
pub const REASON_NOT_ADJACENT: &str = "Target must be orthogonally adjacent";

/// Pre-validate a completed gesture against the mirrored state.
///
/// The adjacency rule is only enforced when the source cell is held by
/// the current player with positive power; anything else is let through
/// so the engine can reject it with its own, more specific answer.
pub fn check_move(from: BoardPoint, to: BoardPoint, state: &GameState) -> MoveCheck {
    if state.done {
        return MoveCheck::Reject(REASON_GAME_OVER);
    }
    let same_cell = from == to;
    match state.phase {
        Phase::Assignment => {
            if same_cell {
                MoveCheck::Accept
            } else {
                MoveCheck::Reject(REASON_ASSIGNMENT_SAME_CELL)
            }
        }
        Phase::Movement => {
            if same_cell {
                return MoveCheck::Reject(REASON_MOVEMENT_NO_SAME_CELL);
            }
            if state.movement_taken {
                return MoveCheck::Reject(REASON_MOVEMENT_TAKEN);
            }
            let source = state.cell(from);
            if source.is_owned_by(state.current_player)
                && source.power > 0
                && !from.is_orthogonal_neighbor(&to)
            {
                return MoveCheck::Reject(REASON_NOT_ADJACENT);
            }
            MoveCheck::Accept
        }
    }
}
