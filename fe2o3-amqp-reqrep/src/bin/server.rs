//! Replies to each request on a node with the request body in upper case.
//!
//! ```text
//! server [-a URL]
//! ```
//!
//! Runs until interrupted.

use std::process::ExitCode;

use fe2o3_amqp_reqrep::{
    cli::{self, Invocation},
    logging,
    server::Responder,
    Error,
};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();
    match try_main().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn try_main() -> Result<ExitCode, Error> {
    let address = match cli::server_args(std::env::args_os())? {
        Invocation::Run(address) => address,
        Invocation::Exit { output, status } => {
            print!("{}", output);
            return Ok(ExitCode::from(status));
        }
    };

    let mut responder = Responder::attach(&address).await?;
    println!("Listening on {}", address);

    loop {
        tokio::select! {
            served = responder.serve_one() => {
                if let Some((request, reply)) = served? {
                    println!("{} => {}", request.body, reply.body);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    responder.close().await?;
    Ok(ExitCode::SUCCESS)
}
