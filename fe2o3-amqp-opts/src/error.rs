/// Errors returned by [`Options::parse`](crate::Options::parse)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    /// A value option was the last argument
    #[error("missing value for {0}")]
    MissingValue(String),

    /// The value could not be converted into the bound type
    #[error("bad value for {option}: {value} ({reason})")]
    BadValue {
        /// The option as it was written on the command line
        option: String,
        /// The offending value
        value: String,
        /// Why the conversion failed
        reason: String,
    },

    /// The argument starts with `-` but matches no registered option
    #[error("unknown option {0}")]
    Unknown(String),

    /// An argument is not valid unicode. Holds the argument with invalid sequences replaced.
    #[error("argument is not valid unicode: {0}")]
    NotUnicode(String),

    /// The help flag was given.
    ///
    /// The message is empty, the caller is expected to print the usage text instead.
    #[error("")]
    Help,
}

impl OptionError {
    /// Whether this is the help request rather than an actual parsing error
    pub fn is_help(&self) -> bool {
        matches!(self, Self::Help)
    }
}
