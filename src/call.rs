use crate::{account::Details, error::CtrlError};
use serde_derive::Serialize;
use std::fmt;

pub mod keys {
    pub const PEER_NUMBER: &str = "PEER_NUMBER";
    pub const CALL_STATE: &str = "CALL_STATE";
    pub const ACCOUNT_ID: &str = "ACCOUNTID";
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum CallState {
    Incoming,
    Connecting,
    Ringing,
    Current,
    Hungup,
    Busy,
    Failure,
    Hold,
    Unhold,
    Inactive,
    Over,
    Unknown(String),
}

impl CallState {
    /// Whether the call can still be acted upon.
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            CallState::Hungup | CallState::Busy | CallState::Failure | CallState::Over
        )
    }
}

impl From<&str> for CallState {
    fn from(state: &str) -> Self {
        match state {
            "INCOMING" => CallState::Incoming,
            "CONNECTING" => CallState::Connecting,
            "RINGING" => CallState::Ringing,
            "CURRENT" => CallState::Current,
            "HUNGUP" => CallState::Hungup,
            "BUSY" => CallState::Busy,
            "FAILURE" => CallState::Failure,
            "HOLD" => CallState::Hold,
            "UNHOLD" => CallState::Unhold,
            "INACTIVE" => CallState::Inactive,
            "OVER" => CallState::Over,
            other => CallState::Unknown(other.to_owned()),
        }
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let state = match self {
            CallState::Incoming => "incoming",
            CallState::Connecting => "connecting",
            CallState::Ringing => "ringing",
            CallState::Current => "current",
            CallState::Hungup => "hung up",
            CallState::Busy => "busy",
            CallState::Failure => "failed",
            CallState::Hold => "on hold",
            CallState::Unhold => "resumed",
            CallState::Inactive => "inactive",
            CallState::Over => "over",
            CallState::Unknown(other) => return write!(fmt, "unknown ({})", other),
        };

        fmt.write_str(state)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Call {
    pub id: String,
    pub account: String,
    pub peer: String,
    pub state: CallState,
}

impl Call {
    /// Builds a call from its details. The daemon answers with no details for
    /// ids that it does not know.
    pub fn from_details(id: String, account: &str, details: &Details) -> Result<Self, CtrlError> {
        if details.is_empty() {
            return Err(CtrlError::daemon(format!("no call with id {}", id)));
        }

        Ok(Call {
            id,
            account: details.get(keys::ACCOUNT_ID).map_or_else(|| account.to_owned(), Clone::clone),
            peer: details.get(keys::PEER_NUMBER).cloned().unwrap_or_default(),
            state: details
                .get(keys::CALL_STATE)
                .map_or(CallState::Inactive, |state| CallState::from(state.as_str())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("CURRENT" => CallState::Current)]
    #[test_case("HOLD" => CallState::Hold)]
    #[test_case("HUNGUP" => CallState::Hungup)]
    #[test_case("DANCING" => CallState::Unknown("DANCING".into()))]
    fn call_state(input: &str) -> CallState { CallState::from(input) }

    #[test]
    fn finished_calls_are_inactive() {
        assert!(CallState::Ringing.is_active());
        assert!(CallState::Hold.is_active());
        assert!(!CallState::Over.is_active());
        assert!(!CallState::Failure.is_active());
    }

    #[test]
    fn builds_from_details() {
        let details: Details = vec![
            (keys::PEER_NUMBER.to_owned(), "ring:1234".to_owned()),
            (keys::CALL_STATE.to_owned(), "RINGING".to_owned()),
        ]
        .into_iter()
        .collect();

        let call = Call::from_details("c1".into(), "a1", &details).unwrap();
        assert_eq!(call.account, "a1");
        assert_eq!(call.peer, "ring:1234");
        assert_eq!(call.state, CallState::Ringing);
        assert_eq!(call.state.to_string(), "ringing");
    }

    #[test]
    fn unknown_call_ids_are_rejected() {
        let error = Call::from_details("c9".into(), "a1", &Details::new()).unwrap_err();
        assert_eq!(error.kind(), crate::error::ErrorKind::Daemon);
        assert_eq!(error.to_string(), "no call with id c9");
    }
}
