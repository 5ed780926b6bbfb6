#![allow(dead_code)]

use std::collections::VecDeque;

use async_trait::async_trait;
use fe2o3_amqp_reqrep::{
    client::{Request, Response},
    Endpoint, Error,
};

pub const DYNAMIC_ADDRESS: &str = "TempQueue-2f1c";

/// Replies to every request in memory with `respond(body)`
pub struct EchoEndpoint<F> {
    respond: F,
    pub target: Option<String>,
    pub reply_to: Option<String>,
    pub sent: Vec<Request>,
    pub max_in_flight: usize,
    pub closed: bool,
    pub fail_receiver: bool,
    replies: VecDeque<Response>,
}

impl<F> EchoEndpoint<F>
where
    F: Fn(&str) -> String,
{
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            target: None,
            reply_to: None,
            sent: Vec::new(),
            max_in_flight: 0,
            closed: false,
            fail_receiver: false,
            replies: VecDeque::new(),
        }
    }
}

pub fn uppercase_response(body: &str) -> String {
    format!("{}_RESPONSE", body.to_uppercase())
}

#[async_trait]
impl<F> Endpoint for EchoEndpoint<F>
where
    F: Fn(&str) -> String + Send,
{
    async fn open_sender(&mut self, address: &str) -> Result<(), Error> {
        assert!(!self.closed);
        self.target = Some(address.to_string());
        Ok(())
    }

    async fn open_dynamic_receiver(&mut self) -> Result<String, Error> {
        if self.fail_receiver {
            return Err(Error::NoDynamicAddress);
        }
        self.reply_to = Some(DYNAMIC_ADDRESS.to_string());
        Ok(DYNAMIC_ADDRESS.to_string())
    }

    async fn send(&mut self, request: Request) -> Result<(), Error> {
        assert!(self.target.is_some(), "sent before the sender was opened");
        assert_eq!(request.reply_to, DYNAMIC_ADDRESS);

        let reply = Response::correlated((self.respond)(&request.body), request.id);
        self.replies.push_back(reply);
        self.max_in_flight = self.max_in_flight.max(self.replies.len());
        self.sent.push(request);
        Ok(())
    }

    async fn recv(&mut self) -> Result<Response, Error> {
        let reply = self
            .replies
            .pop_front()
            .expect("waiting for a response without a request in flight");
        Ok(reply)
    }

    async fn close(&mut self) -> Result<(), Error> {
        assert!(self.replies.is_empty());
        self.closed = true;
        Ok(())
    }
}
