//! The run loop connecting a [`Client`] to an [`Endpoint`]

use std::{collections::VecDeque, io::Write};

use tracing::debug;

use crate::{
    client::{Action, Client, Event},
    endpoint::Endpoint,
    error::Result,
};

/// Drives `client` to completion over `endpoint`
///
/// Every action returned by the client is performed in order before the next response is
/// awaited. Paired requests and responses are written to `out` as `"<request> => <response>"`.
/// Returns once the connection has been closed. There is no timeout, a peer that never replies
/// keeps this waiting.
pub async fn run<E, W>(client: &mut Client, endpoint: &mut E, out: &mut W) -> Result<()>
where
    E: Endpoint + Send,
    W: Write,
{
    let mut pending: VecDeque<Action> = client.handle(Event::ContainerStart)?.into();

    loop {
        while let Some(action) = pending.pop_front() {
            match action {
                Action::OpenSender { address } => endpoint.open_sender(&address).await?,
                Action::OpenDynamicReceiver => {
                    let reply_to = endpoint.open_dynamic_receiver().await?;
                    pending.extend(client.handle(Event::ReceiverOpened { reply_to })?);
                }
                Action::Send(request) => endpoint.send(request).await?,
                Action::Print { request, response } => {
                    writeln!(out, "{} => {}", request, response)?;
                    out.flush()?;
                }
                Action::CloseConnection => {
                    debug!("All requests answered, closing connection");
                    endpoint.close().await?;
                    return Ok(());
                }
            }
        }

        let response = endpoint.recv().await?;
        pending.extend(client.handle(Event::Message(response))?);
    }
}
