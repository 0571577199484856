//! Common helpers for end-to-end tests.

use crate::btree::{Key, Order};
use crate::config::VisualizerConfig;
use crate::render::RenderFormat;
use crate::session::{Response, Session};

/// A session plus convenience accessors for assertions.
pub struct TestSession {
    pub session: Session,
}

impl TestSession {
    /// Session with the default configuration (order 3, text output).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(VisualizerConfig::default())
    }

    /// Session with a specific order.
    #[must_use]
    pub fn with_order(order: usize) -> Self {
        #[allow(clippy::expect_used)]
        let order = Order::new(order).expect("test order must be valid");
        Self::with_config(VisualizerConfig {
            order,
            ..VisualizerConfig::default()
        })
    }

    /// Session rendering JSON after every mutation.
    #[must_use]
    pub fn json() -> Self {
        Self::with_config(VisualizerConfig {
            render_format: RenderFormat::Json,
            ..VisualizerConfig::default()
        })
    }

    #[must_use]
    pub fn with_config(config: VisualizerConfig) -> Self {
        Self {
            session: Session::new(config),
        }
    }

    /// Send a line and return the raw response.
    pub fn send(&mut self, line: &str) -> Response {
        self.session.handle_line(line)
    }

    /// Send a line that must succeed and return its output.
    pub fn ok(&mut self, line: &str) -> String {
        match self.send(line) {
            Response::Output(text) => text,
            other => panic!("'{line}' should succeed, got {other:?}"),
        }
    }

    /// Send a line that must fail and return the error message.
    pub fn err(&mut self, line: &str) -> String {
        match self.send(line) {
            Response::Error(message) => message,
            other => panic!("'{line}' should fail, got {other:?}"),
        }
    }

    /// Keys of the root node.
    #[must_use]
    pub fn root_keys(&self) -> Vec<Key> {
        self.session.tree().root().keys().to_vec()
    }

    /// Keys of each leaf, left to right.
    #[must_use]
    pub fn leaves(&self) -> Vec<Vec<Key>> {
        let snapshot = self.session.tree().snapshot();
        snapshot
            .levels()
            .last()
            .map(|level| level.iter().map(|node| node.keys.clone()).collect())
            .unwrap_or_default()
    }

    /// Assert the tree is structurally sound.
    pub fn assert_valid(&self) {
        let violations = self.session.tree().check_invariants();
        assert!(violations.is_empty(), "invariants broken: {violations:?}");
    }
}
