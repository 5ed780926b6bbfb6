use std::{fmt, str::FromStr};

use crate::OptionError;

/// The short and long forms of an option plus what the usage text shows for it
#[derive(Debug)]
pub(crate) struct Names {
    short: String,
    long: String,
    description: String,
    var: Option<String>,
}

impl Names {
    pub(crate) fn new(short: char, long: &str, description: &str, var: Option<&str>) -> Self {
        Self {
            short: format!("-{}", short),
            long: format!("--{}", long),
            description: description.to_string(),
            var: var.map(Into::into),
        }
    }

    pub(crate) fn matches(&self, arg: &str) -> bool {
        arg == self.short || arg == self.long
    }

    /// Returns the value part of `--long=VALUE`
    fn inline_value<'s>(&self, arg: &'s str) -> Option<&'s str> {
        arg.strip_prefix(self.long.as_str())?.strip_prefix('=')
    }
}

impl fmt::Display for Names {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}", self.short)?;
        if let Some(var) = &self.var {
            write!(f, " {}", var)?;
        }
        write!(f, ", {}", self.long)?;
        if let Some(var) = &self.var {
            write!(f, "={}", var)?;
        }
        write!(f, "\n        {}", self.description)
    }
}

/// Something that may consume the argument at the current position
pub(crate) trait Opt {
    fn names(&self) -> &Names;

    /// Returns `Ok(false)` if `args[*index]` is not this option. A value option that consumes
    /// the following argument advances `index` past its operand.
    fn parse(&mut self, args: &[String], index: &mut usize) -> Result<bool, OptionError>;

    fn fmt_default(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl<'a> fmt::Display for dyn Opt + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names())?;
        self.fmt_default(f)
    }
}

pub(crate) struct ValueOpt<'a, T> {
    names: Names,
    value: &'a mut T,
}

impl<'a, T> ValueOpt<'a, T> {
    pub(crate) fn new(value: &'a mut T, names: Names) -> Self {
        Self { names, value }
    }
}

fn set_value<T>(slot: &mut T, option: &str, value: &str) -> Result<(), OptionError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    *slot = value.parse().map_err(|err: T::Err| OptionError::BadValue {
        option: option.to_string(),
        value: value.to_string(),
        reason: err.to_string(),
    })?;
    Ok(())
}

impl<'a, T> Opt for ValueOpt<'a, T>
where
    T: FromStr + fmt::Display,
    T::Err: fmt::Display,
{
    fn names(&self) -> &Names {
        &self.names
    }

    fn parse(&mut self, args: &[String], index: &mut usize) -> Result<bool, OptionError> {
        let arg = args[*index].as_str();
        if self.names.matches(arg) {
            let value = args
                .get(*index + 1)
                .ok_or_else(|| OptionError::MissingValue(arg.to_string()))?;
            set_value(&mut *self.value, arg, value)?;
            *index += 1;
            return Ok(true);
        }
        match self.names.inline_value(arg) {
            Some(value) => {
                set_value(&mut *self.value, &self.names.long, value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn fmt_default(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " (default {})", self.value)
    }
}

pub(crate) struct FlagOpt<'a> {
    names: Names,
    flag: &'a mut bool,
}

impl<'a> FlagOpt<'a> {
    /// The bound flag is cleared on registration
    pub(crate) fn new(flag: &'a mut bool, names: Names) -> Self {
        *flag = false;
        Self { names, flag }
    }
}

impl<'a> Opt for FlagOpt<'a> {
    fn names(&self) -> &Names {
        &self.names
    }

    fn parse(&mut self, args: &[String], index: &mut usize) -> Result<bool, OptionError> {
        if self.names.matches(&args[*index]) {
            *self.flag = true;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
