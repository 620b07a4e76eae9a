use ansi_term::{Colour, Style};
use powergrid_lib::board::BoardPoint;
use powergrid_lib::cell::Player;
use powergrid_lib::session::{Present, Selection};
use powergrid_lib::state::{GameState, Phase};

/// ANSI terminal renderer. Redraws the whole grid plus the info panel
/// on every update; the grid marks the selected cell and, in movement
/// phase, the orthogonal candidate targets of a validly selected piece.
/// Purely cosmetic, the engine still judges every move.
pub struct TermPresenter {
    connected: bool,
}

impl TermPresenter {
    pub fn new() -> Self {
        TermPresenter { connected: false }
    }
}

impl Default for TermPresenter {
    fn default() -> Self {
        TermPresenter::new()
    }
}

/// Cells worth highlighting as targets: only when a piece of the
/// current player with positive power is selected in movement phase and
/// the movement action is still available.
pub fn candidate_targets(state: &GameState, selection: Selection) -> Vec<BoardPoint> {
    let Selection::Source(from) = selection else {
        return Vec::new();
    };
    if state.phase != Phase::Movement || state.movement_taken {
        return Vec::new();
    }
    let cell = state.cell(from);
    if cell.is_owned_by(state.current_player) && cell.power > 0 {
        from.orthogonal_neighbors()
    } else {
        Vec::new()
    }
}

fn paint(cell_text: String, owner: Option<Player>) -> ansi_term::ANSIGenericString<'static, str> {
    match owner {
        Some(Player::One) => Colour::Red.paint(cell_text),
        Some(Player::Two) => Colour::Blue.paint(cell_text),
        None => Style::new().paint(cell_text),
    }
}

impl Present for TermPresenter {
    fn render(&mut self, state: &GameState, selection: Selection) {
        let candidates = candidate_targets(state, selection);

        println!();
        println!("    0   1   2");
        for (row, cells) in state.board.rows_iter().enumerate() {
            print!(" {row} ");
            for (col, cell) in cells.iter().enumerate() {
                let point = BoardPoint::new(row, col);
                let text = format!("{:^4}", cell.to_string());
                if selection == Selection::Source(point) {
                    print!("{}", Style::new().reverse().paint(text));
                } else if candidates.contains(&point) {
                    print!("{}", Colour::Yellow.paint(text));
                } else {
                    print!("{}", paint(text, cell.owner));
                }
            }
            println!();
        }

        let game_status = if state.done { "Game Over!" } else { "In Progress" };
        println!(
            "Current: {}  Phase: {}  {}",
            state.current_player, state.phase, game_status
        );
        for player in [Player::One, Player::Two] {
            let bonus = state.line_bonus(player);
            let badge = if bonus > 0 {
                format!("  +{bonus}")
            } else {
                String::new()
            };
            println!(
                "  {} power bank: {}{badge}",
                player,
                state.power_bank(player)
            );
        }
    }

    fn status(&mut self, message: &str) {
        println!("{message}");
    }

    fn connection(&mut self, connected: bool) {
        self.connected = connected;
        let indicator = if connected {
            Colour::Green.paint("● Connected")
        } else {
            Colour::Red.paint("● Disconnected")
        };
        println!("{indicator}");
    }
}
