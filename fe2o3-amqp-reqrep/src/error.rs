//! Errors of the client and the responder

use fe2o3_amqp::{
    connection::OpenError,
    link::{
        DetachError, DispositionError, ReceiverAttachError, RecvError, SendError,
        SenderAttachError,
    },
    session::BeginError,
};
use fe2o3_amqp_types::messaging::Outcome;
use tracing::warn;

use crate::{address::AddressError, client::State};

/// Any error of the request/response workflow
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The address could not be parsed
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Error opening the connection
    #[error(transparent)]
    Open(#[from] OpenError),

    /// Error beginning the session
    #[error(transparent)]
    Begin(#[from] BeginError),

    /// Error attaching a sender
    #[error(transparent)]
    SenderAttach(#[from] SenderAttachError),

    /// Error attaching a receiver
    #[error(transparent)]
    ReceiverAttach(#[from] ReceiverAttachError),

    /// Error sending a message
    #[error(transparent)]
    Send(#[from] SendError),

    /// Error receiving a message
    #[error(transparent)]
    Recv(#[from] RecvError),

    /// Error settling a delivery
    #[error(transparent)]
    Disposition(#[from] DispositionError),

    /// Error detaching a link
    #[error(transparent)]
    Detach(#[from] DetachError),

    /// Error ending the session
    #[error(transparent)]
    Session(#[from] fe2o3_amqp::session::Error),

    /// Error closing the connection
    #[error(transparent)]
    Connection(#[from] fe2o3_amqp::connection::Error),

    /// Error writing the output
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The peer settled a message with an outcome other than accepted
    #[error("Message is not accepted {:?}", .0)]
    NotAccepted(Outcome),

    /// The peer attached the dynamic receiver without assigning it an address
    #[error("Peer did not assign an address to the dynamic receiver")]
    NoDynamicAddress,

    /// The link needed by the operation has not been attached
    #[error("Link is not attached")]
    NotAttached,

    /// The event has no transition from the current state
    #[error("Unexpected event {} in state {:?}", .event, .state)]
    UnexpectedEvent {
        /// State of the client when the event arrived
        state: State,
        /// Name of the event
        event: &'static str,
    },
}

/// A type alias for `Result<T, Error>`
pub type Result<T> = std::result::Result<T, Error>;

/// Keeps the first error of a shutdown sequence in `first` and logs every failure
pub(crate) fn keep_first_error<E>(
    first: &mut Option<Error>,
    step: &'static str,
    result: std::result::Result<(), E>,
) where
    E: Into<Error>,
{
    if let Err(err) = result {
        let err = err.into();
        warn!(step, %err, "Failed to close");
        first.get_or_insert(err);
    }
}
