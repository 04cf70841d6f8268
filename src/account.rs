use crate::error::CtrlError;
use serde_derive::Serialize;
use std::{collections::HashMap, fmt};

pub mod keys {
    pub const ALIAS: &str = "Account.alias";
    pub const ENABLE: &str = "Account.enable";
    pub const TYPE: &str = "Account.type";
    pub const USERNAME: &str = "Account.username";
    pub const REGISTRATION_STATUS: &str = "Account.registrationStatus";
}

pub type Details = HashMap<String, String>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum AccountKind {
    Jami,
    Sip,
    Other(String),
}

impl From<&str> for AccountKind {
    fn from(kind: &str) -> Self {
        match kind {
            "RING" | "JAMI" => AccountKind::Jami,
            "SIP" => AccountKind::Sip,
            other => AccountKind::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccountKind::Jami => fmt.write_str("jami"),
            AccountKind::Sip => fmt.write_str("sip"),
            AccountKind::Other(other) => fmt.write_str(other),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RegistrationStatus {
    Unregistered,
    Trying,
    Registered,
    ErrorGeneric,
    ErrorAuth,
    ErrorNetwork,
    ErrorHost,
    ErrorServiceUnavailable,
    ErrorNeedMigration,
    Initializing,
    Unknown(String),
}

impl RegistrationStatus {
    pub fn is_registered(&self) -> bool { *self == RegistrationStatus::Registered }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            RegistrationStatus::ErrorGeneric
                | RegistrationStatus::ErrorAuth
                | RegistrationStatus::ErrorNetwork
                | RegistrationStatus::ErrorHost
                | RegistrationStatus::ErrorServiceUnavailable
                | RegistrationStatus::ErrorNeedMigration
        )
    }
}

impl From<&str> for RegistrationStatus {
    fn from(status: &str) -> Self {
        match status {
            "UNREGISTERED" => RegistrationStatus::Unregistered,
            "TRYING" => RegistrationStatus::Trying,
            "REGISTERED" => RegistrationStatus::Registered,
            "ERROR_GENERIC" => RegistrationStatus::ErrorGeneric,
            "ERROR_AUTH" => RegistrationStatus::ErrorAuth,
            "ERROR_NETWORK" => RegistrationStatus::ErrorNetwork,
            "ERROR_HOST" => RegistrationStatus::ErrorHost,
            "ERROR_SERVICE_UNAVAILABLE" => RegistrationStatus::ErrorServiceUnavailable,
            "ERROR_NEED_MIGRATION" => RegistrationStatus::ErrorNeedMigration,
            "INITIALIZING" => RegistrationStatus::Initializing,
            other => RegistrationStatus::Unknown(other.to_owned()),
        }
    }
}

impl From<&RegistrationStatus> for &'static str {
    fn from(status: &RegistrationStatus) -> Self {
        match status {
            RegistrationStatus::Unregistered => "unregistered",
            RegistrationStatus::Trying => "trying to register",
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::ErrorGeneric => "registration failed",
            RegistrationStatus::ErrorAuth => "authentication failed",
            RegistrationStatus::ErrorNetwork => "network unreachable",
            RegistrationStatus::ErrorHost => "host unreachable",
            RegistrationStatus::ErrorServiceUnavailable => "service unavailable",
            RegistrationStatus::ErrorNeedMigration => "account needs migration",
            RegistrationStatus::Initializing => "initializing",
            RegistrationStatus::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RegistrationStatus::Unknown(other) => write!(fmt, "unknown ({})", other),
            status => fmt.write_str(<&'static str>::from(status)),
        }
    }
}

/// An account configured in the daemon.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Account {
    pub id: String,
    pub alias: String,
    pub kind: AccountKind,
    pub enabled: bool,
    pub username: String,
    pub registration: RegistrationStatus,
}

impl Account {
    /// Builds an account from its configuration and volatile detail maps.
    pub fn from_details(id: String, details: &Details, volatile: &Details) -> Self {
        let get = |map: &Details, key: &str| map.get(key).cloned().unwrap_or_default();

        Account {
            alias: get(details, keys::ALIAS),
            kind: AccountKind::from(get(details, keys::TYPE).as_str()),
            enabled: details.get(keys::ENABLE).map_or(false, |v| v == "true"),
            username: get(details, keys::USERNAME),
            registration: volatile
                .get(keys::REGISTRATION_STATUS)
                .map_or(RegistrationStatus::Unregistered, |v| RegistrationStatus::from(v.as_str())),
            id,
        }
    }
}

/// Finds an account by its id, falling back to its alias.
pub fn find<'a>(accounts: &'a [Account], query: &str) -> Result<&'a Account, CtrlError> {
    accounts
        .iter()
        .find(|account| account.id == query)
        .or_else(|| accounts.iter().find(|account| account.alias == query))
        .ok_or_else(|| CtrlError::account(format!("no account matching this alias: {}", query)))
}

/// Selects the account to act on.
///
/// An explicit query must match. Otherwise the first enabled and registered
/// account is preferred over the first enabled one.
pub fn select<'a>(accounts: &'a [Account], query: Option<&str>) -> Result<&'a Account, CtrlError> {
    if let Some(query) = query {
        return find(accounts, query);
    }

    if accounts.is_empty() {
        return Err(CtrlError::account("no account is configured on the daemon"));
    }

    accounts
        .iter()
        .find(|a| a.enabled && a.registration.is_registered())
        .or_else(|| accounts.iter().find(|a| a.enabled))
        .ok_or_else(|| CtrlError::account("no enabled account"))
}

/// Finds an account that the caller must have named, with no default selection.
pub fn find_named<'a>(accounts: &'a [Account], query: Option<&str>) -> Result<&'a Account, CtrlError> {
    match query {
        Some(query) => find(accounts, query),
        None => Err(CtrlError::account("an account must be named explicitly for this action")),
    }
}

/// Parses `KEY=VALUE` pairs into a detail map for a new account.
pub fn parse_details<'a, I: IntoIterator<Item = &'a str>>(pairs: I) -> Result<Details, CtrlError> {
    pairs
        .into_iter()
        .map(|pair| match pair.find('=') {
            Some(pos) if pos > 0 => Ok((pair[..pos].to_owned(), pair[pos + 1..].to_owned())),
            _ => Err(CtrlError::account(format!("account detail is not a KEY=VALUE pair: {}", pair))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use test_case::test_case;

    fn details(pairs: &[(&str, &str)]) -> Details {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn account(id: &str, alias: &str, enabled: bool, status: &str) -> Account {
        Account::from_details(
            id.to_owned(),
            &details(&[
                (keys::ALIAS, alias),
                (keys::ENABLE, if enabled { "true" } else { "false" }),
                (keys::TYPE, "RING"),
            ]),
            &details(&[(keys::REGISTRATION_STATUS, status)]),
        )
    }

    #[test]
    fn builds_from_details() {
        let account = Account::from_details(
            "a1".into(),
            &details(&[
                (keys::ALIAS, "alice"),
                (keys::ENABLE, "true"),
                (keys::TYPE, "SIP"),
                (keys::USERNAME, "alice@example.org"),
            ]),
            &details(&[(keys::REGISTRATION_STATUS, "ERROR_AUTH")]),
        );

        assert_eq!(account.alias, "alice");
        assert_eq!(account.kind, AccountKind::Sip);
        assert!(account.enabled);
        assert_eq!(account.username, "alice@example.org");
        assert!(account.registration.is_error());
    }

    #[test]
    fn missing_details_use_defaults() {
        let account = Account::from_details("a1".into(), &Details::new(), &Details::new());
        assert_eq!(account.alias, "");
        assert!(!account.enabled);
        assert_eq!(account.registration, RegistrationStatus::Unregistered);
        assert_eq!(account.kind, AccountKind::Other(String::new()));
    }

    #[test_case("REGISTERED" => RegistrationStatus::Registered)]
    #[test_case("TRYING" => RegistrationStatus::Trying)]
    #[test_case("ERROR_NEED_MIGRATION" => RegistrationStatus::ErrorNeedMigration)]
    #[test_case("SOMETHING" => RegistrationStatus::Unknown("SOMETHING".into()))]
    fn registration_status(input: &str) -> RegistrationStatus { RegistrationStatus::from(input) }

    #[test_case("RING" => AccountKind::Jami)]
    #[test_case("JAMI" => AccountKind::Jami)]
    #[test_case("SIP" => AccountKind::Sip)]
    fn account_kind(input: &str) -> AccountKind { AccountKind::from(input) }

    #[test]
    fn find_prefers_ids_over_aliases() {
        let accounts = vec![account("bob", "alice", true, "REGISTERED"), account("alice", "x", true, "")];
        assert_eq!(find(&accounts, "alice").unwrap().id, "alice");
        assert_eq!(find(&accounts, "x").unwrap().id, "alice");
    }

    #[test]
    fn find_reports_unknown_alias() {
        let accounts = vec![account("a1", "alice", true, "REGISTERED")];
        let error = find(&accounts, "carol").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Account);
        assert_eq!(error.to_string(), "no account matching this alias: carol");
    }

    #[test]
    fn select_prefers_registered_accounts() {
        let accounts = vec![
            account("a1", "off", false, "REGISTERED"),
            account("a2", "trying", true, "TRYING"),
            account("a3", "ready", true, "REGISTERED"),
        ];

        assert_eq!(select(&accounts, None).unwrap().id, "a3");
        assert_eq!(select(&accounts[..2], None).unwrap().id, "a2");
        assert_eq!(select(&accounts, Some("off")).unwrap().id, "a1");
    }

    #[test]
    fn select_without_accounts() {
        assert_eq!(
            select(&[], None).unwrap_err(),
            CtrlError::account("no account is configured on the daemon")
        );

        let accounts = vec![account("a1", "off", false, "REGISTERED")];
        assert_eq!(select(&accounts, None).unwrap_err().to_string(), "no enabled account");
    }

    #[test]
    fn find_named_never_falls_back() {
        let accounts = vec![account("a1", "alice", true, "REGISTERED")];
        assert_eq!(find_named(&accounts, Some("alice")).unwrap().id, "a1");

        let error = find_named(&accounts, None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Account);
        assert_eq!(error.to_string(), "an account must be named explicitly for this action");

        assert_eq!(find_named(&accounts, Some("bob")).unwrap_err().kind(), ErrorKind::Account);
    }

    #[test]
    fn parses_detail_pairs() {
        let parsed = parse_details(vec!["Account.type=RING", "Account.alias=a=b"]).unwrap();
        assert_eq!(parsed["Account.type"], "RING");
        assert_eq!(parsed["Account.alias"], "a=b");

        let error = parse_details(vec!["Account.alias"]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Account);
        assert!(parse_details(vec!["=value"]).is_err());
    }
}
