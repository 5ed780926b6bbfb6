use std::{ffi::OsString, fmt, str::FromStr};

use crate::{
    opt::{FlagOpt, Names, Opt, ValueOpt},
    OptionError,
};

/// Command line options bound to caller-owned variables
///
/// A `-h, --help` flag is always registered first. When it is present [`Options::parse`] returns
/// [`OptionError::Help`] after the whole command line has been scanned.
pub struct Options<'a> {
    program: String,
    args: Vec<String>,
    help_names: Names,
    help: bool,
    opts: Vec<Box<dyn Opt + 'a>>,
    first_operand: usize,
}

impl<'a> fmt::Debug for Options<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("help", &self.help)
            .field("opts", &self.opts.len())
            .finish()
    }
}

impl<'a> Options<'a> {
    /// Creates a parser over `args`, where the first element is the program path
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let program = args
            .first()
            .map(|path| match path.rfind(['/', '\\']) {
                Some(slash) => path[slash + 1..].to_string(),
                None => path.clone(),
            })
            .unwrap_or_default();

        Self {
            program,
            args,
            help_names: Names::new('h', "help", "Print the help message", None),
            help: false,
            opts: Vec::new(),
            first_operand: 1,
        }
    }

    /// Creates a parser over arguments that may not be valid unicode
    pub fn from_os_args<I, S>(args: I) -> Result<Self, OptionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args = args
            .into_iter()
            .map(|arg| {
                arg.into().into_string().map_err(|arg| {
                    OptionError::NotUnicode(arg.to_string_lossy().into_owned())
                })
            })
            .collect::<Result<Vec<String>, _>>()?;
        Ok(Self::new(args))
    }

    /// Creates a parser over the arguments of the current process
    pub fn from_env() -> Result<Self, OptionError> {
        Self::from_os_args(std::env::args_os())
    }

    /// Program name, ie. the file name of the first argument
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Updates `value` when `parse()` finds `-short VALUE`, `--long VALUE` or `--long=VALUE`.
    ///
    /// The current content of `value` is shown as the default in the usage text.
    pub fn add_value<T>(
        &mut self,
        value: &'a mut T,
        short: char,
        long: &str,
        description: &str,
        var: &str,
    ) -> &mut Self
    where
        T: FromStr + fmt::Display + 'a,
        T::Err: fmt::Display,
    {
        let names = Names::new(short, long, description, Some(var));
        self.opts.push(Box::new(ValueOpt::new(value, names)));
        self
    }

    /// Sets `flag` when `parse()` finds `-short` or `--long`. The flag is cleared here.
    pub fn add_flag(
        &mut self,
        flag: &'a mut bool,
        short: char,
        long: &str,
        description: &str,
    ) -> &mut Self {
        let names = Names::new(short, long, description, None);
        self.opts.push(Box::new(FlagOpt::new(flag, names)));
        self
    }

    /// Parses the command line and returns the index of the first non-option argument
    pub fn parse(&mut self) -> Result<usize, OptionError> {
        let mut index = 1;
        while index < self.args.len() && self.args[index].starts_with('-') {
            if self.help_names.matches(&self.args[index]) {
                self.help = true;
            } else {
                let mut matched = false;
                for opt in self.opts.iter_mut() {
                    if opt.parse(&self.args, &mut index)? {
                        matched = true;
                        break;
                    }
                }
                if !matched {
                    return Err(OptionError::Unknown(self.args[index].clone()));
                }
            }
            index += 1;
        }

        if self.help {
            return Err(OptionError::Help);
        }
        self.first_operand = index;
        Ok(index)
    }

    /// Arguments following the options. Only meaningful after a successful [`Options::parse`].
    pub fn remaining(&self) -> &[String] {
        self.args.get(self.first_operand..).unwrap_or_default()
    }
}

impl<'a> fmt::Display for Options<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "usage: {} [options]", self.program)?;
        writeln!(f)?;
        writeln!(f, "options:")?;
        writeln!(f, "{}", self.help_names)?;
        for opt in &self.opts {
            writeln!(f, "{}", opt)?;
        }
        Ok(())
    }
}
