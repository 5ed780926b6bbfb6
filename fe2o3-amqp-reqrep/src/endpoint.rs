//! The messaging operations the client consumes

use async_trait::async_trait;
use fe2o3_amqp::{
    connection::ConnectionHandle, session::SessionHandle, Connection, Delivery, Receiver, Sender,
    Session,
};
use fe2o3_amqp_types::messaging::{AmqpValue, Message, MessageId, Properties, Source};
use tracing::debug;

use crate::{
    address::Address,
    client::{Request, Response},
    error::{keep_first_error, Error, Result},
};

const CONTAINER_ID: &str = "fe2o3-amqp-reqrep-client";
const SENDER_NAME: &str = "fe2o3-amqp-reqrep-sender";
const RECEIVER_NAME: &str = "fe2o3-amqp-reqrep-receiver";

/// One outbound link to a fixed node plus one inbound link with a dynamic address
#[async_trait]
pub trait Endpoint {
    /// Attaches the link requests are sent on
    async fn open_sender(&mut self, address: &str) -> Result<()>;

    /// Attaches the reply link and returns the address assigned to it by the peer
    async fn open_dynamic_receiver(&mut self) -> Result<String>;

    /// Sends a request and waits for the peer to accept it
    async fn send(&mut self, request: Request) -> Result<()>;

    /// Waits for the next response on the reply link
    async fn recv(&mut self) -> Result<Response>;

    /// Closes links, session and connection
    async fn close(&mut self) -> Result<()>;
}

/// [`Endpoint`] over a `fe2o3-amqp` connection with a single session
pub struct AmqpEndpoint {
    connection: ConnectionHandle<()>,
    session: SessionHandle<()>,
    sender: Option<Sender>,
    receiver: Option<Receiver>,
}

impl std::fmt::Debug for AmqpEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmqpEndpoint")
            .field("sender", &self.sender.is_some())
            .field("receiver", &self.receiver.is_some())
            .finish()
    }
}

impl AmqpEndpoint {
    /// Opens the connection and begins a session
    pub async fn connect(address: &Address) -> Result<Self> {
        let url = address.connection_url();
        debug!(%url, "Opening connection");
        let mut connection = Connection::open(CONTAINER_ID, url.as_str()).await?;
        let session = Session::begin(&mut connection).await?;
        Ok(Self {
            connection,
            session,
            sender: None,
            receiver: None,
        })
    }
}

#[async_trait]
impl Endpoint for AmqpEndpoint {
    async fn open_sender(&mut self, address: &str) -> Result<()> {
        debug!(address, "Attaching sender");
        let sender = Sender::attach(&mut self.session, SENDER_NAME, address).await?;
        self.sender = Some(sender);
        Ok(())
    }

    async fn open_dynamic_receiver(&mut self) -> Result<String> {
        debug!("Attaching dynamic receiver");
        let receiver = Receiver::builder()
            .name(RECEIVER_NAME)
            .source(Source::builder().dynamic(true).build())
            .attach(&mut self.session)
            .await?;

        let reply_to = receiver
            .source()
            .as_ref()
            .and_then(|source| source.address.clone());
        self.receiver = Some(receiver);
        reply_to.ok_or(Error::NoDynamicAddress)
    }

    async fn send(&mut self, request: Request) -> Result<()> {
        debug!(id = request.id, "Sending request");
        let sender = self.sender.as_mut().ok_or(Error::NotAttached)?;
        let message = Message {
            header: None,
            delivery_annotations: None,
            message_annotations: None,
            properties: Some(Properties {
                message_id: Some(MessageId::from(request.id)),
                reply_to: Some(request.reply_to),
                ..Default::default()
            }),
            application_properties: None,
            body: AmqpValue(request.body),
            footer: None,
        };

        let outcome = sender.send(message).await?;
        let _accepted = outcome.accepted_or_else(Error::NotAccepted)?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Response> {
        let receiver = self.receiver.as_mut().ok_or(Error::NotAttached)?;
        let delivery: Delivery<String> = receiver.recv().await?;
        receiver.accept(&delivery).await?;

        let correlation_id = delivery
            .message()
            .properties
            .as_ref()
            .and_then(|properties| match &properties.correlation_id {
                Some(MessageId::Ulong(id)) => Some(*id),
                _ => None,
            });
        debug!(?correlation_id, "Received response");
        Ok(Response {
            body: delivery.into_body(),
            correlation_id,
        })
    }

    /// Every step is attempted even if an earlier one fails. The first error is returned.
    async fn close(&mut self) -> Result<()> {
        let mut first = None;
        if let Some(sender) = self.sender.take() {
            keep_first_error(&mut first, "sender", sender.close().await);
        }
        if let Some(receiver) = self.receiver.take() {
            keep_first_error(&mut first, "receiver", receiver.close().await);
        }
        keep_first_error(&mut first, "session", self.session.end().await);
        keep_first_error(&mut first, "connection", self.connection.close().await);
        first.map_or(Ok(()), Err)
    }
}
