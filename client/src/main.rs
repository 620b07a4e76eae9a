use client::{input, render::TermPresenter, App, WsConnector};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let flags = xflags::parse_or_exit! {
        /// Engine websocket endpoint
        optional --url url: String
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let url = flags
        .url
        .unwrap_or_else(|| "ws://localhost:8080/ws".to_string());
    tracing::debug!("dialing {url}");

    let events = input::spawn_stdin_reader();
    let app = App::new(WsConnector::new(url), TermPresenter::new(), events);
    app.run().await;
}
