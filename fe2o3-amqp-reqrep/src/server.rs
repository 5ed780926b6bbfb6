//! A responder for the client
//!
//! Requests are consumed from a node on the broker. Each reply goes to the request's reply-to
//! address, carries the request's message id as its correlation id and has the request body in
//! upper case.

use std::collections::HashMap;

use fe2o3_amqp::{
    connection::ConnectionHandle, session::SessionHandle, Connection, Delivery, Receiver, Sender,
    Session,
};
use fe2o3_amqp_types::{
    definitions,
    messaging::{AmqpValue, Message, MessageId, Properties},
};
use tracing::{debug, warn};

use crate::{
    address::Address,
    error::{keep_first_error, Result},
    Error,
};

const CONTAINER_ID: &str = "fe2o3-amqp-reqrep-server";
const RECEIVER_NAME: &str = "fe2o3-amqp-reqrep-server-receiver";

/// The parts of a request message the responder looks at
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingRequest {
    /// Request text
    pub body: String,
    /// Becomes the correlation id of the reply
    pub message_id: Option<MessageId>,
    /// Where the reply is sent
    pub reply_to: Option<String>,
}

impl IncomingRequest {
    fn from_delivery(delivery: &Delivery<String>) -> Self {
        let properties = delivery.message().properties.as_ref();
        Self {
            body: delivery.body().clone(),
            message_id: properties.and_then(|p| p.message_id.clone()),
            reply_to: properties.and_then(|p| p.reply_to.clone()),
        }
    }
}

/// A reply ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Target of the reply, taken from the request's reply-to
    pub address: String,
    /// Reply text
    pub body: String,
    /// Message id of the request
    pub correlation_id: Option<MessageId>,
}

impl Reply {
    /// Builds the AMQP message with an AMQP value body
    pub fn into_message(self) -> Message<AmqpValue<String>> {
        Message {
            header: None,
            delivery_annotations: None,
            message_annotations: None,
            properties: Some(Properties {
                correlation_id: self.correlation_id,
                to: Some(self.address),
                ..Default::default()
            }),
            application_properties: None,
            body: AmqpValue(self.body),
            footer: None,
        }
    }
}

/// Returns `None` if the request has nowhere to reply to
pub fn reply_for(request: &IncomingRequest) -> Option<Reply> {
    let address = request.reply_to.clone().filter(|addr| !addr.is_empty())?;
    Some(Reply {
        address,
        body: request.body.to_uppercase(),
        correlation_id: request.message_id.clone(),
    })
}

/// Serves requests arriving on one node
pub struct Responder {
    connection: ConnectionHandle<()>,
    session: SessionHandle<()>,
    receiver: Receiver,
    /// Reply senders by target address, attached on first use
    senders: HashMap<String, Sender>,
}

impl std::fmt::Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder")
            .field("senders", &self.senders.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Responder {
    /// Connects and attaches a receiver on the node of `address`
    pub async fn attach(address: &Address) -> Result<Self> {
        let mut connection =
            Connection::open(CONTAINER_ID, address.connection_url().as_str()).await?;
        let mut session = Session::begin(&mut connection).await?;
        let receiver = Receiver::attach(&mut session, RECEIVER_NAME, address.node()).await?;
        debug!(node = address.node(), "Responder attached");

        Ok(Self {
            connection,
            session,
            receiver,
            senders: HashMap::new(),
        })
    }

    /// Waits for one request and replies to it. Requests without a reply-to are rejected.
    ///
    /// Returns the request and the reply sent for it, or `None` if the request was rejected.
    pub async fn serve_one(&mut self) -> Result<Option<(IncomingRequest, Reply)>> {
        let delivery: Delivery<String> = self.receiver.recv().await?;
        let request = IncomingRequest::from_delivery(&delivery);

        let reply = match reply_for(&request) {
            Some(reply) => reply,
            None => {
                warn!(body = %request.body, "Request has no reply-to address, rejecting");
                self.receiver
                    .reject(&delivery, None::<definitions::Error>)
                    .await?;
                return Ok(None);
            }
        };
        self.receiver.accept(&delivery).await?;

        let sender = self.sender_for(&reply.address).await?;
        let outcome = sender.send(reply.clone().into_message()).await?;
        let _accepted = outcome.accepted_or_else(Error::NotAccepted)?;
        Ok(Some((request, reply)))
    }

    async fn sender_for(&mut self, address: &str) -> Result<&mut Sender> {
        if !self.senders.contains_key(address) {
            let name = format!("{}-reply-{}", CONTAINER_ID, self.senders.len());
            debug!(%name, address, "Attaching reply sender");
            let sender = Sender::attach(&mut self.session, name, address).await?;
            self.senders.insert(address.to_string(), sender);
        }
        self.senders.get_mut(address).ok_or(Error::NotAttached)
    }

    /// Detaches every link, ends the session and closes the connection
    ///
    /// Every step is attempted even if an earlier one fails. The first error is returned.
    pub async fn close(mut self) -> Result<()> {
        let mut first = None;
        for (_, sender) in self.senders.drain() {
            keep_first_error(&mut first, "reply sender", sender.close().await);
        }
        keep_first_error(&mut first, "receiver", self.receiver.close().await);
        keep_first_error(&mut first, "session", self.session.end().await);
        keep_first_error(&mut first, "connection", self.connection.close().await);
        first.map_or(Ok(()), Err)
    }
}
