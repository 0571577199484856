#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code so bad input can never panic the session.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use visualizer::{Response, Session, config::VisualizerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visualizer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from environment variables
    let config = match VisualizerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let mut session = Session::new(config);
    let config = session.config();
    tracing::info!(
        "Loaded configuration: order={}, render_format={}, show_ids={}, max_random={}",
        config.order,
        config.render_format,
        config.show_ids,
        config.max_random
    );

    print_response(&session.handle_line("show"));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::debug!("stdin closed");
                break;
            }
            Err(e) => {
                tracing::error!("Failed to read input: {e}");
                std::process::exit(1);
            }
        };

        let response = session.handle_line(&line);
        if response == Response::Quit {
            break;
        }
        print_response(&response);
    }

    tracing::info!(
        keys = session.tree().len(),
        version = %session.tree().version(),
        "session ended"
    );
}

fn print_response(response: &Response) {
    match response {
        Response::Output(text) if text.is_empty() => {}
        Response::Output(text) => println!("{text}"),
        Response::Error(message) => println!("error: {message}"),
        Response::Quit => {}
    }
}
