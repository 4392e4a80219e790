//! In-memory transport for driving clients in tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use unichat::transport::{ChatTransport, Connector};
use unichat::TransportError;

#[derive(Default)]
struct MockState {
    urls: Vec<String>,
    sent: Vec<String>,
    closed: usize,
    feeds: Vec<mpsc::UnboundedSender<String>>,
    refuse: bool,
    broken_pipe: bool,
}

/// Hands out in-memory transports and records what they saw.
#[derive(Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    /// Number of transports opened so far.
    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().urls.len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.state.lock().unwrap().urls.clone()
    }

    /// Every frame written by the client, across all transports.
    pub fn sent(&self) -> Vec<String> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn count_sent(&self, frame: &str) -> usize {
        self.sent().iter().filter(|s| s.as_str() == frame).count()
    }

    pub fn closed(&self) -> usize {
        self.state.lock().unwrap().closed
    }

    /// Make further connects fail.
    pub fn refuse(&self) {
        self.state.lock().unwrap().refuse = true;
    }

    /// Make every further write fail.
    pub fn break_pipe(&self) {
        self.state.lock().unwrap().broken_pipe = true;
    }

    /// Deliver a frame on the newest transport.
    pub fn push(&self, frame: &str) {
        let state = self.state.lock().unwrap();
        state
            .feeds
            .last()
            .expect("no open transport")
            .send(frame.to_string())
            .expect("transport dropped");
    }

    /// Simulate the peer closing the newest transport.
    pub fn hang_up(&self) {
        self.state.lock().unwrap().feeds.pop();
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn ChatTransport>, TransportError> {
        let mut state = self.state.lock().unwrap();
        if state.refuse {
            return Err(TransportError::Connect {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        let (tx, rx) = mpsc::unbounded_channel();
        state.urls.push(url.to_string());
        state.feeds.push(tx);
        Ok(Box::new(MockTransport {
            inbound: rx,
            state: self.state.clone(),
        }))
    }
}

struct MockTransport {
    inbound: mpsc::UnboundedReceiver<String>,
    state: Arc<Mutex<MockState>>,
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        if state.broken_pipe {
            return Err(TransportError::Send("broken pipe".to_string()));
        }
        state.sent.push(text);
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<Result<String, TransportError>> {
        self.inbound.recv().await.map(Ok)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.state.lock().unwrap().closed += 1;
        Ok(())
    }
}
