//! The request/response client as an event driven state machine
//!
//! ```text
//! Disconnected --ContainerStart--> Connecting --ReceiverOpened--> ReceiverOpening
//!                                                                      |
//!                                   +----------- send front -----------+
//!                                   v
//!                          AwaitingResponse --Message, queue empty--> Completed
//!                             |        ^
//!                             +--------+ Message, send next
//! ```
//!
//! The client never has more than one request in flight. A request is removed from the queue
//! only once its response has been paired with it.

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

/// Client state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing has been opened yet
    Disconnected,
    /// Sender and dynamic receiver are being attached
    Connecting,
    /// The reply address is known, the first request is about to be sent
    ReceiverOpening,
    /// One request is in flight
    AwaitingResponse,
    /// All requests are answered and the connection is closed
    Completed,
}

/// An outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Message id, unique per client
    pub id: u64,
    /// Request text
    pub body: String,
    /// Address of the dynamic receiver the response should go to
    pub reply_to: String,
}

/// An incoming response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response text
    pub body: String,
    /// Id of the request this answers, if the peer set one
    pub correlation_id: Option<u64>,
}

impl Response {
    /// Creates a response without correlation id
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            correlation_id: None,
        }
    }

    /// Creates a response answering the request with message id `correlation_id`
    pub fn correlated(body: impl Into<String>, correlation_id: u64) -> Self {
        Self {
            body: body.into(),
            correlation_id: Some(correlation_id),
        }
    }
}

/// Something that happened on the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The run loop has started
    ContainerStart,
    /// The peer has attached the dynamic receiver
    ReceiverOpened {
        /// Address assigned to the receiver's source
        reply_to: String,
    },
    /// A response has arrived on the dynamic receiver
    Message(Response),
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::ContainerStart => "ContainerStart",
            Event::ReceiverOpened { .. } => "ReceiverOpened",
            Event::Message(_) => "Message",
        }
    }
}

/// Something the client wants done on the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Attach the link requests are sent on
    OpenSender {
        /// Target node
        address: String,
    },
    /// Attach a receiver whose source address is assigned by the peer
    OpenDynamicReceiver,
    /// Send a request
    Send(Request),
    /// Report a request paired with its response
    Print {
        /// Request text
        request: String,
        /// Response text
        response: String,
    },
    /// Close links, session and connection
    CloseConnection,
}

/// Sends queued requests one at a time and pairs each with its response
#[derive(Debug)]
pub struct Client {
    target: String,
    requests: VecDeque<String>,
    state: State,
    reply_to: String,
    next_id: u64,
    in_flight: Option<u64>,
}

impl Client {
    /// Creates a client that sends `requests` in order to the node `target`
    pub fn new<I, S>(target: impl Into<String>, requests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target: target.into(),
            requests: requests.into_iter().map(Into::into).collect(),
            state: State::Disconnected,
            reply_to: String::new(),
            next_id: 0,
            in_flight: None,
        }
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Number of requests that have not been answered yet, including the one in flight
    pub fn pending(&self) -> usize {
        self.requests.len()
    }

    /// Message id of the request waiting for its response
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// Runs the transition selected by the current state and `event`
    pub fn handle(&mut self, event: Event) -> Result<Vec<Action>> {
        trace!(state = ?self.state, event = event.name(), "handle");
        match (self.state, event) {
            (State::Disconnected, Event::ContainerStart) => Ok(self.on_container_start()),
            (State::Connecting, Event::ReceiverOpened { reply_to }) => {
                Ok(self.on_receiver_open(reply_to))
            }
            (_, Event::Message(response)) if self.requests.is_empty() => {
                debug!(body = %response.body, "Ignoring spurious response");
                Ok(Vec::new())
            }
            (State::AwaitingResponse, Event::Message(response)) => Ok(self.on_message(response)),
            (state, event) => Err(Error::UnexpectedEvent {
                state,
                event: event.name(),
            }),
        }
    }

    fn on_container_start(&mut self) -> Vec<Action> {
        self.transition(State::Connecting);
        vec![
            Action::OpenSender {
                address: self.target.clone(),
            },
            Action::OpenDynamicReceiver,
        ]
    }

    fn on_receiver_open(&mut self, reply_to: String) -> Vec<Action> {
        debug!(%reply_to, "Dynamic receiver opened");
        self.reply_to = reply_to;
        self.transition(State::ReceiverOpening);

        let mut actions = Vec::with_capacity(1);
        self.send_next(&mut actions);
        actions
    }

    fn on_message(&mut self, response: Response) -> Vec<Action> {
        if let (Some(expected), Some(actual)) = (self.in_flight, response.correlation_id) {
            if expected != actual {
                warn!(expected, actual, "Response correlation id does not match request");
            }
        }

        let mut actions = Vec::with_capacity(2);
        if let Some(request) = self.requests.pop_front() {
            actions.push(Action::Print {
                request,
                response: response.body,
            });
        }
        self.send_next(&mut actions);
        actions
    }

    /// Sends the front of the queue, or closes the connection once the queue is drained
    fn send_next(&mut self, actions: &mut Vec<Action>) {
        match self.requests.front() {
            Some(body) => {
                let request = Request {
                    id: self.next_id,
                    body: body.clone(),
                    reply_to: self.reply_to.clone(),
                };
                self.next_id += 1;
                self.in_flight = Some(request.id);
                actions.push(Action::Send(request));
                self.transition(State::AwaitingResponse);
            }
            None => {
                self.in_flight = None;
                actions.push(Action::CloseConnection);
                self.transition(State::Completed);
            }
        }
    }

    fn transition(&mut self, next: State) {
        trace!(from = ?self.state, to = ?next, "transition");
        self.state = next;
    }
}
