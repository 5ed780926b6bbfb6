#![deny(missing_docs, missing_debug_implementations)]

//! A small command line option parser shared by the example programs.
//!
//! Options are bound to variables owned by the caller. [`Options::parse`] writes the parsed
//! values straight into those bindings, so the bound value before parsing acts as the default
//! shown in the usage text.
//!
//! ```rust
//! use fe2o3_amqp_opts::Options;
//!
//! let mut address = String::from("127.0.0.1:5672/examples");
//! let mut verbose = false;
//!
//! let args = ["client", "--address=localhost/q1", "-v", "hello"];
//! let mut opts = Options::new(args);
//! opts.add_value(&mut address, 'a', "address", "connect and send to URL", "URL");
//! opts.add_flag(&mut verbose, 'v', "verbose", "Print more");
//! let first = opts.parse().unwrap();
//! assert_eq!(first, 3);
//! drop(opts);
//!
//! assert_eq!(address, "localhost/q1");
//! assert!(verbose);
//! ```

mod error;
mod opt;
mod options;

pub use error::OptionError;
pub use options::Options;
