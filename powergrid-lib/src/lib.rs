pub mod board;
pub mod cell;
pub mod messages;
pub mod moves;
pub mod session;
pub mod state;
