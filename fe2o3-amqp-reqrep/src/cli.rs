//! Command line handling of the `client` and `server` binaries
//!
//! Both accept `-a/--address URL` and `-h/--help`. The client takes its requests from the
//! operands following the options.

use std::ffi::OsString;

use fe2o3_amqp_opts::Options;

use crate::{address::Address, error::Result, DEFAULT_ADDRESS, DEFAULT_REQUESTS};

/// Exit status after printing the help text
pub const EXIT_SUCCESS: u8 = 0;

/// Exit status after an option error
pub const EXIT_FAILURE: u8 = 1;

/// What the client runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Broker and node to send to
    pub address: Address,
    /// Requests in send order
    pub requests: Vec<String>,
}

/// Outcome of reading the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation<T> {
    /// Go on with the messaging workflow
    Run(T),

    /// Print `output` to stdout and exit with `status` without connecting
    Exit {
        /// Usage text followed by the error message
        output: String,
        /// Process exit status
        status: u8,
    },
}

/// Reads the client's command line. Operands, if any, replace [`DEFAULT_REQUESTS`].
pub fn client_args<I, S>(args: I) -> Result<Invocation<ClientConfig>>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    parse_args(args, "connect and send to URL", |address, operands| {
        let requests = match operands.is_empty() {
            true => DEFAULT_REQUESTS.iter().map(ToString::to_string).collect(),
            false => operands,
        };
        ClientConfig { address, requests }
    })
}

/// Reads the server's command line. Operands are ignored.
pub fn server_args<I, S>(args: I) -> Result<Invocation<Address>>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    parse_args(args, "listen on URL", |address, _| address)
}

fn parse_args<I, S, T, F>(args: I, description: &str, build: F) -> Result<Invocation<T>>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    F: FnOnce(Address, Vec<String>) -> T,
{
    let mut address: Address = DEFAULT_ADDRESS.parse()?;
    let mut opts = match Options::from_os_args(args) {
        Ok(opts) => opts,
        Err(err) => {
            return Ok(Invocation::Exit {
                output: format!("{}\n", err),
                status: EXIT_FAILURE,
            })
        }
    };
    opts.add_value(&mut address, 'a', "address", description, "URL");

    let operands = match opts.parse() {
        Ok(_) => opts.remaining().to_vec(),
        Err(err) => {
            let status = match err.is_help() {
                true => EXIT_SUCCESS,
                false => EXIT_FAILURE,
            };
            return Ok(Invocation::Exit {
                output: format!("{}\n{}\n", opts, err),
                status,
            });
        }
    };
    drop(opts);

    Ok(Invocation::Run(build(address, operands)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exit(invocation: Invocation<ClientConfig>) -> (String, u8) {
        match invocation {
            Invocation::Exit { output, status } => (output, status),
            Invocation::Run(config) => panic!("unexpected run with {:?}", config),
        }
    }

    fn run(invocation: Invocation<ClientConfig>) -> ClientConfig {
        match invocation {
            Invocation::Run(config) => config,
            Invocation::Exit { output, .. } => panic!("unexpected exit with {}", output),
        }
    }

    #[test]
    fn help_prints_usage_and_exits_successfully() {
        let (output, status) = exit(client_args(["./client", "-h"]).unwrap());

        assert_eq!(status, EXIT_SUCCESS);
        assert!(output.starts_with("\nusage: client [options]\n"));
        assert!(output.contains("  -h, --help\n"));
        assert!(output.contains(
            "  -a URL, --address=URL\n        connect and send to URL (default 127.0.0.1:5672/examples)\n"
        ));
        assert!(output.ends_with(")\n\n\n"));
    }

    #[test]
    fn help_wins_over_valid_options_and_operands() {
        let (_, status) = exit(client_args(["client", "-a", "localhost/q", "--help"]).unwrap());
        assert_eq!(status, EXIT_SUCCESS);
    }

    #[test]
    fn unknown_option_prints_usage_and_fails() {
        let (output, status) = exit(client_args(["client", "--bogus"]).unwrap());

        assert_eq!(status, EXIT_FAILURE);
        assert!(output.contains("usage: client [options]"));
        assert!(output.ends_with("\nunknown option --bogus\n"));
    }

    #[test]
    fn bad_address_is_an_option_error() {
        let (output, status) = exit(client_args(["client", "-a", "http://host/q"]).unwrap());

        assert_eq!(status, EXIT_FAILURE);
        assert!(output.ends_with("bad value for -a: http://host/q (unsupported scheme http)\n"));
    }

    #[test]
    fn defaults_without_arguments() {
        let config = run(client_args(["client"]).unwrap());

        assert_eq!(config.address.to_string(), DEFAULT_ADDRESS);
        assert_eq!(config.address.node(), "examples");
        assert_eq!(config.requests, DEFAULT_REQUESTS);
    }

    #[test]
    fn operands_replace_the_default_requests() {
        let config = run(client_args(["client", "--address=localhost/q1", "A", "B"]).unwrap());

        assert_eq!(config.address.node(), "q1");
        assert_eq!(config.requests, ["A", "B"]);
    }

    #[test]
    fn server_ignores_operands() {
        match server_args(["server", "-a", "localhost/q2", "extra"]).unwrap() {
            Invocation::Run(address) => assert_eq!(address.node(), "q2"),
            Invocation::Exit { output, .. } => panic!("unexpected exit with {}", output),
        }
    }

    #[test]
    fn server_usage_describes_listening() {
        match server_args(["server", "-h"]).unwrap() {
            Invocation::Exit { output, status } => {
                assert_eq!(status, EXIT_SUCCESS);
                assert!(output.contains("listen on URL"));
            }
            Invocation::Run(address) => panic!("unexpected run with {}", address),
        }
    }
}
