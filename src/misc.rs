use crate::error::CtrlError;

pub fn format_error(source: &(dyn std::error::Error + 'static)) -> String {
    let mut out = fomat!((source));

    let mut source = source.source();
    while let Some(why) = source {
        out.push_str(&fomat!(": "(why)));
        source = why.source();
    }

    out
}

/// Formats an error chain, prefixed by the kind of the controller error at its root.
pub fn format_ctrl_error(source: &(dyn std::error::Error + 'static)) -> String {
    let mut root = source;
    while let Some(why) = root.source() {
        root = why;
    }

    match root.downcast_ref::<CtrlError>() {
        Some(why) => fomat!((why.kind()) ": " (format_error(source))),
        None => format_error(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fmt, io};

    #[derive(Debug)]
    struct Wrapper(CtrlError);

    impl fmt::Display for Wrapper {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result { fmt.write_str("account command failed") }
    }

    impl std::error::Error for Wrapper {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> { Some(&self.0) }
    }

    #[test]
    fn formats_source_chains() {
        let error = Wrapper(CtrlError::account("no enabled account"));
        assert_eq!(format_error(&error), "account command failed: no enabled account");
    }

    #[test]
    fn prefixes_ctrl_error_kind() {
        let error = Wrapper(CtrlError::account("no enabled account"));
        assert_eq!(
            format_ctrl_error(&error),
            "AccountError: account command failed: no enabled account"
        );

        assert_eq!(format_ctrl_error(&CtrlError::dbus("no bus")), "DBusError: no bus");
    }

    #[test]
    fn prefixes_kind_through_anyhow_context() {
        use anyhow::Context;

        let result = Err::<(), _>(CtrlError::account("no enabled account"))
            .context("account subcommand failed");
        let error = result.unwrap_err();
        assert_eq!(
            format_ctrl_error(&*error),
            "AccountError: account subcommand failed: no enabled account"
        );

        let error = anyhow::Error::from(CtrlError::daemon("daemon rejected hold for call c1"))
            .context("call subcommand failed");
        assert_eq!(
            format_ctrl_error(&*error),
            "DaemonError: call subcommand failed: daemon rejected hold for call c1"
        );
    }

    #[test]
    fn bare_anyhow_errors_have_no_kind() {
        let error = anyhow::anyhow!("failed to serialize output");
        assert_eq!(format_ctrl_error(&*error), "failed to serialize output");
    }

    #[test]
    fn leaves_foreign_errors_alone() {
        let error = io::Error::new(io::ErrorKind::Other, "disk on fire");
        assert_eq!(format_ctrl_error(&error), "disk on fire");
    }
}
