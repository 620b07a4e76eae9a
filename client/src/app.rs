use powergrid_lib::board::BoardPoint;
use powergrid_lib::messages::{ClientMessage, ServerMessage};
use powergrid_lib::session::{Present, Session, Update};
use tokio::sync::mpsc;

use crate::channel::{Connector, Transport, RECONNECT_DELAY};

/// Raw input from the front end, already mapped to grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Click(BoardPoint),
    NewGame,
    Show,
    EndTurn,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Exit {
    Reconnect,
    Quit,
}

/// Wires the session to a transport and a presenter. Single task, no
/// shared state: every click, inbound frame, or timer tick is handled
/// to completion before the next one.
pub struct App<C, P> {
    connector: C,
    presenter: P,
    session: Session,
    events: mpsc::Receiver<UiEvent>,
}

impl<C, P> App<C, P>
where
    C: Connector,
    P: Present,
{
    pub fn new(connector: C, presenter: P, events: mpsc::Receiver<UiEvent>) -> Self {
        App {
            connector,
            presenter,
            session: Session::new(),
            events,
        }
    }

    /// Drive the session until the user quits. A lost or refused
    /// connection drops the dead transport, waits the fixed delay, and
    /// dials again, indefinitely.
    pub async fn run(mut self) {
        loop {
            match self.connector.connect().await {
                Ok(transport) => {
                    self.presenter.connection(true);
                    let update = self.session.set_connected(true);
                    self.apply(update);
                    if self.connected_loop(transport).await == Exit::Quit {
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!("connection attempt failed: {e}");
                }
            }
            self.presenter.connection(false);
            let update = self.session.set_connected(false);
            self.apply(update);
            if self.disconnected_wait().await == Exit::Quit {
                return;
            }
        }
    }

    async fn connected_loop(&mut self, mut transport: C::Transport) -> Exit {
        loop {
            tokio::select! {
                inbound = transport.recv() => match inbound {
                    Some(Ok(text)) => self.handle_inbound(&text),
                    Some(Err(e)) => {
                        tracing::warn!("channel error: {e}");
                        return Exit::Reconnect;
                    }
                    None => {
                        tracing::info!("server closed the channel");
                        return Exit::Reconnect;
                    }
                },
                event = self.events.recv() => match event {
                    Some(UiEvent::Quit) | None => {
                        transport.close().await;
                        return Exit::Quit;
                    }
                    Some(event) => {
                        if let Some(message) = self.handle(event) {
                            if let Err(e) = transport.send(message.into_json()).await {
                                tracing::warn!("send failed: {e}");
                                return Exit::Reconnect;
                            }
                        }
                    }
                },
            }
        }
    }

    /// One fixed-delay wait before the next dial. Input keeps being
    /// consumed meanwhile; anything that would transmit becomes a
    /// local "Not connected" instead.
    async fn disconnected_wait(&mut self) -> Exit {
        let delay = tokio::time::sleep(RECONNECT_DELAY);
        tokio::pin!(delay);
        loop {
            tokio::select! {
                _ = &mut delay => return Exit::Reconnect,
                event = self.events.recv() => match event {
                    Some(UiEvent::Quit) | None => return Exit::Quit,
                    Some(event) => {
                        if self.handle(event).is_some() {
                            self.presenter.status("Not connected");
                        }
                    }
                },
            }
        }
    }

    fn handle(&mut self, event: UiEvent) -> Option<ClientMessage> {
        let mut update = match event {
            UiEvent::Click(point) => self.session.click(point),
            UiEvent::NewGame => self.session.new_game(),
            UiEvent::Show => self.session.refresh(),
            UiEvent::EndTurn => self.session.end_turn(),
            UiEvent::Quit => return None,
        };
        let outbound = update.outbound.take();
        self.apply(update);
        outbound
    }

    fn handle_inbound(&mut self, text: &str) {
        match text.parse::<ServerMessage>() {
            Ok(ServerMessage::BoardState(raw)) => match self.session.apply_snapshot(raw) {
                Ok(update) => self.apply(update),
                Err(e) => tracing::warn!("dropping malformed snapshot: {e}"),
            },
            Err(e) => tracing::debug!("ignoring unrecognized payload: {e}"),
        }
    }

    fn apply(&mut self, update: Update) {
        if let Some(status) = &update.status {
            self.presenter.status(status);
        }
        self.presenter
            .render(self.session.state(), self.session.selection());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use powergrid_lib::state::{GameState, Phase};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::time::Instant;

    use powergrid_lib::session::Selection;

    #[derive(Default)]
    struct Record {
        statuses: Vec<String>,
        connections: Vec<bool>,
        renders: usize,
        last_phase: Option<Phase>,
    }

    #[derive(Clone, Default)]
    struct RecordingPresenter(Arc<Mutex<Record>>);

    impl Present for RecordingPresenter {
        fn render(&mut self, state: &GameState, _selection: Selection) {
            let mut record = self.0.lock().unwrap();
            record.renders += 1;
            record.last_phase = Some(state.phase);
        }

        fn status(&mut self, message: &str) {
            self.0.lock().unwrap().statuses.push(message.to_string());
        }

        fn connection(&mut self, connected: bool) {
            self.0.lock().unwrap().connections.push(connected);
        }
    }

    struct ScriptedTransport {
        inbound: VecDeque<Option<Result<String>>>,
        sent: Arc<Mutex<Vec<String>>>,
        hold_open: bool,
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&mut self, text: String) -> Result<()> {
            self.sent.lock().unwrap().push(text);
            Ok(())
        }

        async fn recv(&mut self) -> Option<Result<String>> {
            match self.inbound.pop_front() {
                Some(item) => item,
                None if self.hold_open => futures::future::pending().await,
                None => None,
            }
        }

        async fn close(&mut self) {}
    }

    struct ScriptedConnector {
        transports: VecDeque<ScriptedTransport>,
        attempts: Arc<Mutex<Vec<Instant>>>,
    }

    #[async_trait]
    impl Connector for ScriptedConnector {
        type Transport = ScriptedTransport;

        async fn connect(&mut self) -> Result<ScriptedTransport> {
            self.attempts.lock().unwrap().push(Instant::now());
            self.transports
                .pop_front()
                .ok_or_else(|| anyhow!("connection refused"))
        }
    }

    fn movement_snapshot_json() -> String {
        r#"{
            "type": "board_state",
            "board": [
                [{"player":1,"power":2},{"player":0,"power":0},{"player":0,"power":0}],
                [{"player":0,"power":0},{"player":0,"power":0},{"player":0,"power":0}],
                [{"player":0,"power":0},{"player":0,"power":0},{"player":0,"power":0}]
            ],
            "currentPlayer": 1,
            "done": false,
            "player1PowerBank": 0,
            "player2PowerBank": 1,
            "currentPhase": 1,
            "movementTaken": false
        }"#
        .to_string()
    }

    fn start(
        transports: Vec<ScriptedTransport>,
    ) -> (
        tokio::task::JoinHandle<()>,
        mpsc::Sender<UiEvent>,
        Arc<Mutex<Record>>,
        Arc<Mutex<Vec<Instant>>>,
    ) {
        let attempts = Arc::new(Mutex::new(Vec::new()));
        let connector = ScriptedConnector {
            transports: transports.into(),
            attempts: Arc::clone(&attempts),
        };
        let presenter = RecordingPresenter::default();
        let record = Arc::clone(&presenter.0);
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(App::new(connector, presenter, rx).run());
        (handle, tx, record, attempts)
    }

    #[tokio::test]
    async fn snapshot_then_adjacent_move_is_sent() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport = ScriptedTransport {
            inbound: VecDeque::from([Some(Ok(movement_snapshot_json()))]),
            sent: Arc::clone(&sent),
            hold_open: true,
        };
        let (handle, tx, record, _) = start(vec![transport]);

        // Wait for the snapshot to land before clicking.
        while record.lock().unwrap().last_phase != Some(Phase::Movement) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        tx.send(UiEvent::Click(BoardPoint::new(0, 0))).await.unwrap();
        tx.send(UiEvent::Click(BoardPoint::new(0, 1))).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        {
            let sent = sent.lock().unwrap();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0], r#"{"type":"move","payload":"0 0 0 1"}"#);
        }
        {
            let record = record.lock().unwrap();
            assert_eq!(record.connections, vec![true]);
            assert!(record.renders > 0);
        }

        tx.send(UiEvent::Quit).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn unparseable_inbound_payloads_are_dropped() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport = ScriptedTransport {
            inbound: VecDeque::from([
                Some(Ok("garbage".to_string())),
                Some(Ok(r#"{"type":"chat","payload":"hi"}"#.to_string())),
                Some(Ok(movement_snapshot_json())),
            ]),
            sent: Arc::clone(&sent),
            hold_open: true,
        };
        let (handle, tx, record, _) = start(vec![transport]);

        while record.lock().unwrap().last_phase != Some(Phase::Movement) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        tx.send(UiEvent::Quit).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn end_turn_sent_in_movement_phase() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport = ScriptedTransport {
            inbound: VecDeque::from([Some(Ok(movement_snapshot_json()))]),
            sent: Arc::clone(&sent),
            hold_open: true,
        };
        let (handle, tx, record, _) = start(vec![transport]);

        while record.lock().unwrap().last_phase != Some(Phase::Movement) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        tx.send(UiEvent::EndTurn).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        {
            let sent = sent.lock().unwrap();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0], r#"{"type":"endturn"}"#);
        }

        tx.send(UiEvent::Quit).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn one_reconnect_attempt_per_delay_window() {
        let (handle, _tx, record, attempts) = start(Vec::new());

        tokio::time::sleep(Duration::from_millis(9500)).await;

        {
            let attempts = attempts.lock().unwrap();
            assert_eq!(attempts.len(), 4, "expected attempts at 0/3000/6000/9000 ms");
            for pair in attempts.windows(2) {
                assert_eq!(pair[1] - pair[0], RECONNECT_DELAY);
            }
        }
        assert!(record
            .lock()
            .unwrap()
            .connections
            .iter()
            .all(|connected| !connected));

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn disconnected_sends_are_no_ops() {
        let (handle, tx, record, _) = start(Vec::new());

        // Same-cell assignment gesture: accepted locally, but there is
        // nothing to transmit on.
        tx.send(UiEvent::Click(BoardPoint::new(1, 1))).await.unwrap();
        tx.send(UiEvent::Click(BoardPoint::new(1, 1))).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(record
            .lock()
            .unwrap()
            .statuses
            .iter()
            .any(|s| s == "Not connected"));

        tx.send(UiEvent::Quit).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn server_close_schedules_reconnect() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        // Transport that closes immediately.
        let transport = ScriptedTransport {
            inbound: VecDeque::new(),
            sent,
            hold_open: false,
        };
        let (handle, _tx, record, attempts) = start(vec![transport]);

        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(attempts.lock().unwrap().len(), 2);
        let connections = record.lock().unwrap().connections.clone();
        assert_eq!(&connections[..2], &[true, false]);

        handle.abort();
    }
}
