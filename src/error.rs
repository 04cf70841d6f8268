use std::fmt::{self, Display};
use thiserror::Error;

/// The human-readable message carried by every controller error.
///
/// Built from the string form of whatever value describes the failure. When
/// no value is given, the message is the literal `None`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Help(Box<str>);

impl Help {
    pub fn new<T: Display>(value: Option<T>) -> Self {
        match value {
            Some(value) => Help(value.to_string().into()),
            None => Help::none(),
        }
    }

    pub fn none() -> Self { Help("None".into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for Help {
    fn default() -> Self { Help::none() }
}

impl Display for Help {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result { fmt.write_str(&self.0) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Communication with the bus itself failed.
    DBus,
    /// The daemon is missing, or rejected a request.
    Daemon,
    /// An account could not be found or handled.
    Account,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::DBus => "DBusError",
            ErrorKind::Daemon => "DaemonError",
            ErrorKind::Account => "AccountError",
        }
    }

    /// Decides whether a DBus error name describes a failure of the bus or of the daemon.
    pub fn of_dbus_error(name: Option<&str>) -> ErrorKind {
        let name = match name {
            Some(name) => name,
            None => return ErrorKind::DBus,
        };

        match name.strip_prefix("org.freedesktop.DBus.Error.") {
            Some("ServiceUnknown") | Some("NameHasNoOwner") | Some("UnknownMethod")
            | Some("UnknownObject") | Some("UnknownInterface") => ErrorKind::Daemon,
            Some(_) => ErrorKind::DBus,
            None => ErrorKind::Daemon,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result { fmt.write_str(self.name()) }
}

/// A failure raised while controlling the daemon.
///
/// The `Display` output is exactly the stored message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CtrlError {
    #[error("{0}")]
    DBus(Help),
    #[error("{0}")]
    Daemon(Help),
    #[error("{0}")]
    Account(Help),
}

impl CtrlError {
    pub fn new<T: Display>(kind: ErrorKind, help: Option<T>) -> Self {
        let help = Help::new(help);
        match kind {
            ErrorKind::DBus => CtrlError::DBus(help),
            ErrorKind::Daemon => CtrlError::Daemon(help),
            ErrorKind::Account => CtrlError::Account(help),
        }
    }

    pub fn dbus<T: Display>(help: T) -> Self { CtrlError::DBus(Help::new(Some(help))) }

    pub fn daemon<T: Display>(help: T) -> Self { CtrlError::Daemon(Help::new(Some(help))) }

    pub fn account<T: Display>(help: T) -> Self { CtrlError::Account(Help::new(Some(help))) }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CtrlError::DBus(_) => ErrorKind::DBus,
            CtrlError::Daemon(_) => ErrorKind::Daemon,
            CtrlError::Account(_) => ErrorKind::Account,
        }
    }

    pub fn help(&self) -> &str {
        match self {
            CtrlError::DBus(help) | CtrlError::Daemon(help) | CtrlError::Account(help) => {
                help.as_str()
            }
        }
    }
}

impl CtrlError {
    /// Builds an error from the name and message of a DBus error reply.
    ///
    /// An empty message counts as no message.
    pub fn from_dbus_reply(name: Option<&str>, message: Option<&str>) -> Self {
        let kind = ErrorKind::of_dbus_error(name);
        let help = match (name, message.filter(|message| !message.is_empty())) {
            (Some(name), Some(message)) => format!("{}: {}", name, message),
            (Some(name), None) => name.to_owned(),
            (None, Some(message)) => message.to_owned(),
            (None, None) => return CtrlError::new::<&str>(kind, None),
        };

        CtrlError::new(kind, Some(help))
    }
}

impl From<dbus::Error> for CtrlError {
    fn from(why: dbus::Error) -> Self { CtrlError::from_dbus_reply(why.name(), why.message()) }
}
