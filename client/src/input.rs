use std::io::{self, BufRead};

use powergrid_lib::board::BoardPoint;
use tokio::sync::mpsc;

use crate::app::UiEvent;

/// Read commands from stdin on a plain thread and feed them to the
/// event loop. EOF or a closed receiver ends the session.
pub fn spawn_stdin_reader() -> mpsc::Receiver<UiEvent> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(line.trim()) {
                Some(event) => {
                    let quit = event == UiEvent::Quit;
                    if tx.blocking_send(event).is_err() || quit {
                        return;
                    }
                }
                None => {
                    println!("Commands: `<row> <col>` to click, `new`, `show`, `end`, `quit`");
                }
            }
        }
        let _ = tx.blocking_send(UiEvent::Quit);
    });
    rx
}

/// `<row> <col>` clicks a cell; the rest are one-word commands.
pub fn parse_command(line: &str) -> Option<UiEvent> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?;
    match first {
        "new" => Some(UiEvent::NewGame),
        "show" => Some(UiEvent::Show),
        "end" => Some(UiEvent::EndTurn),
        "quit" | "exit" => Some(UiEvent::Quit),
        _ => {
            let row = first.parse().ok()?;
            let col = parts.next()?.parse().ok()?;
            if parts.next().is_some() {
                return None;
            }
            let point = BoardPoint::new(row, col);
            point.is_in_bounds().then_some(UiEvent::Click(point))
        }
    }
}
