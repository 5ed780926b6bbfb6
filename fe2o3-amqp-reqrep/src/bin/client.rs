//! Sends a fixed list of requests to a node and prints each paired with its response.
//!
//! ```text
//! client [-a URL] [REQUEST...]
//! ```

use std::process::ExitCode;

use fe2o3_amqp_reqrep::{
    cli::{self, Invocation},
    logging, run, AmqpEndpoint, Client, Error,
};

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
    let config = match cli::client_args(std::env::args_os())? {
        Invocation::Run(config) => config,
        Invocation::Exit { output, status } => {
            print!("{}", output);
            return Ok(ExitCode::from(status));
        }
    };

    let mut client = Client::new(config.address.node(), config.requests);
    let mut endpoint = AmqpEndpoint::connect(&config.address).await?;
    let mut stdout = std::io::stdout().lock();
    run(&mut client, &mut endpoint, &mut stdout).await?;
    Ok(ExitCode::SUCCESS)
}
