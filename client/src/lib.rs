pub mod app;
pub mod channel;
pub mod input;
pub mod render;

pub use app::{App, UiEvent};
pub use channel::{Connector, Transport, WsConnector, RECONNECT_DELAY};
