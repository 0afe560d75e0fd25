//! Scripted transport for exercising senders without a daemon.

use std::collections::VecDeque;

use pigpiod_protocol::{Request, Response};

use crate::error::ClientResult;
use crate::socket::Transport;

/// Replays a fixed sequence of responses and records every request sent.
pub(crate) struct ScriptedTransport {
    pub requests: Vec<Request>,
    responses: VecDeque<Response>,
}

impl ScriptedTransport {
    pub fn new(responses: impl IntoIterator<Item = Response>) -> Self {
        Self {
            requests: Vec::new(),
            responses: responses.into_iter().collect(),
        }
    }
}

impl Transport for ScriptedTransport {
    fn send_raw(&mut self, request: &Request) -> ClientResult<Response> {
        self.requests.push(request.clone());
        Ok(self
            .responses
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected exchange: {request:?}")))
    }
}
