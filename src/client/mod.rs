use crate::{
    account::{self, Account, Details},
    call::Call,
    error::CtrlError,
    CALL_MANAGER_IFACE, CALL_MANAGER_PATH, CONFIGURATION_IFACE, CONFIGURATION_PATH, DBUS_NAME,
    TIMEOUT,
};
use dbus::{
    arg::{AppendAll, ReadAll},
    blocking::Connection,
};
use std::collections::HashMap;

pub mod methods {
    pub const GET_ACCOUNT_LIST: &str = "getAccountList";
    pub const GET_ACCOUNT_DETAILS: &str = "getAccountDetails";
    pub const GET_VOLATILE_ACCOUNT_DETAILS: &str = "getVolatileAccountDetails";
    pub const SET_ACCOUNT_ENABLED: &str = "setAccountEnabled";
    pub const SEND_REGISTER: &str = "sendRegister";
    pub const ADD_ACCOUNT: &str = "addAccount";
    pub const REMOVE_ACCOUNT: &str = "removeAccount";
    pub const SEND_TEXT_MESSAGE: &str = "sendTextMessage";

    pub const PLACE_CALL: &str = "placeCall";
    pub const HANG_UP: &str = "hangUp";
    pub const ACCEPT: &str = "accept";
    pub const REFUSE: &str = "refuse";
    pub const HOLD: &str = "hold";
    pub const UNHOLD: &str = "unhold";
    pub const GET_CALL_LIST: &str = "getCallList";
    pub const GET_CALL_DETAILS: &str = "getCallDetails";
}

const FREEDESKTOP_NAME: &str = "org.freedesktop.DBus";
const FREEDESKTOP_PATH: &str = "/org/freedesktop/DBus";

/// The daemon objects that the client sends method calls to.
#[derive(Clone, Copy, Debug)]
enum Manager {
    Configuration,
    Call,
}

impl Manager {
    fn path(self) -> &'static str {
        match self {
            Manager::Configuration => CONFIGURATION_PATH,
            Manager::Call => CALL_MANAGER_PATH,
        }
    }

    fn iface(self) -> &'static str {
        match self {
            Manager::Configuration => CONFIGURATION_IFACE,
            Manager::Call => CALL_MANAGER_IFACE,
        }
    }
}

/// A connection to the Jami daemon over the session bus.
pub struct Client {
    bus: Connection,
}

impl Client {
    /// Connects to the session bus, and requires the daemon to be present on it.
    pub fn new() -> Result<Self, CtrlError> {
        let client = Client::connect()?;

        if !client.daemon_running()? {
            return Err(CtrlError::daemon("jami daemon is not running on the session bus"));
        }

        Ok(client)
    }

    /// Connects to the session bus, whether or not the daemon is running.
    pub fn connect() -> Result<Self, CtrlError> {
        Connection::new_session().map(|bus| Client { bus }).map_err(|why| {
            CtrlError::dbus(format!("unable to connect to the DBus session bus: {}", why))
        })
    }

    /// Checks if the daemon owns its name on the bus.
    pub fn daemon_running(&self) -> Result<bool, CtrlError> {
        let (owned,): (bool,) = self
            .bus
            .with_proxy(FREEDESKTOP_NAME, FREEDESKTOP_PATH, TIMEOUT)
            .method_call(FREEDESKTOP_NAME, "NameHasOwner", (DBUS_NAME,))
            .map_err(|why| {
                CtrlError::dbus(format!("unable to query the owner of {}: {}", DBUS_NAME, why))
            })?;

        Ok(owned)
    }

    pub fn account_ids(&self) -> Result<Vec<String>, CtrlError> {
        let (ids,): (Vec<String>,) =
            self.call_method(Manager::Configuration, methods::GET_ACCOUNT_LIST, ())?;
        Ok(ids)
    }

    pub fn account_details(&self, id: &str) -> Result<Details, CtrlError> {
        let (details,): (Details,) =
            self.call_method(Manager::Configuration, methods::GET_ACCOUNT_DETAILS, (id,))?;
        Ok(details)
    }

    pub fn volatile_account_details(&self, id: &str) -> Result<Details, CtrlError> {
        let (details,): (Details,) = self.call_method(
            Manager::Configuration,
            methods::GET_VOLATILE_ACCOUNT_DETAILS,
            (id,),
        )?;
        Ok(details)
    }

    /// Fetches every account known to the daemon, along with its details.
    pub fn accounts(&self) -> Result<Vec<Account>, CtrlError> {
        self.account_ids()?
            .into_iter()
            .map(|id| {
                let details = self.account_details(&id)?;
                let volatile = self.volatile_account_details(&id)?;
                Ok(Account::from_details(id, &details, &volatile))
            })
            .collect()
    }

    pub fn account(&self, query: &str) -> Result<Account, CtrlError> {
        account::find(&self.accounts()?, query).map(Clone::clone)
    }

    /// An account that must be named by the caller, as when removing it.
    pub fn named_account(&self, query: Option<&str>) -> Result<Account, CtrlError> {
        account::find_named(&self.accounts()?, query).map(Clone::clone)
    }

    /// The account to act on when the caller may not have named one.
    pub fn current_account(&self, query: Option<&str>) -> Result<Account, CtrlError> {
        let account = account::select(&self.accounts()?, query).map(Clone::clone)?;
        info!("using account {} ({})", account.alias, account.id);
        Ok(account)
    }

    pub fn set_account_enabled(&self, id: &str, enable: bool) -> Result<(), CtrlError> {
        self.call_method(Manager::Configuration, methods::SET_ACCOUNT_ENABLED, (id, enable))
    }

    pub fn send_register(&self, id: &str, enable: bool) -> Result<(), CtrlError> {
        self.call_method(Manager::Configuration, methods::SEND_REGISTER, (id, enable))
    }

    /// Creates an account, returning the id the daemon assigned to it.
    pub fn add_account(&self, details: Details) -> Result<String, CtrlError> {
        let (id,): (String,) =
            self.call_method(Manager::Configuration, methods::ADD_ACCOUNT, (details,))?;

        if id.is_empty() {
            return Err(CtrlError::account("daemon refused to create the account"));
        }

        Ok(id)
    }

    pub fn remove_account(&self, id: &str) -> Result<(), CtrlError> {
        self.call_method(Manager::Configuration, methods::REMOVE_ACCOUNT, (id,))
    }

    /// Sends a plain text message, returning its message id.
    pub fn send_text_message(&self, account: &str, to: &str, body: &str) -> Result<u64, CtrlError> {
        let mut payloads = HashMap::new();
        payloads.insert(String::from("text/plain"), body.to_owned());

        let (id,): (u64,) = self.call_method(
            Manager::Configuration,
            methods::SEND_TEXT_MESSAGE,
            (account, to, payloads, 0i32),
        )?;

        Ok(id)
    }

    pub fn place_call(&self, account: &str, to: &str) -> Result<String, CtrlError> {
        let (id,): (String,) = self.call_method(Manager::Call, methods::PLACE_CALL, (account, to))?;

        if id.is_empty() {
            return Err(CtrlError::daemon(format!("daemon refused to place a call to {}", to)));
        }

        Ok(id)
    }

    pub fn hang_up(&self, account: &str, call: &str) -> Result<(), CtrlError> {
        self.call_action(methods::HANG_UP, account, call)
    }

    pub fn accept(&self, account: &str, call: &str) -> Result<(), CtrlError> {
        self.call_action(methods::ACCEPT, account, call)
    }

    pub fn refuse(&self, account: &str, call: &str) -> Result<(), CtrlError> {
        self.call_action(methods::REFUSE, account, call)
    }

    pub fn hold(&self, account: &str, call: &str) -> Result<(), CtrlError> {
        self.call_action(methods::HOLD, account, call)
    }

    pub fn unhold(&self, account: &str, call: &str) -> Result<(), CtrlError> {
        self.call_action(methods::UNHOLD, account, call)
    }

    pub fn call_ids(&self, account: &str) -> Result<Vec<String>, CtrlError> {
        let (ids,): (Vec<String>,) =
            self.call_method(Manager::Call, methods::GET_CALL_LIST, (account,))?;
        Ok(ids)
    }

    pub fn call(&self, account: &str, id: &str) -> Result<Call, CtrlError> {
        let (details,): (Details,) =
            self.call_method(Manager::Call, methods::GET_CALL_DETAILS, (account, id))?;
        Call::from_details(id.to_owned(), account, &details)
    }

    pub fn calls(&self, account: &str) -> Result<Vec<Call>, CtrlError> {
        self.call_ids(account)?.iter().map(|id| self.call(account, id)).collect()
    }

    fn call_action(&self, method: &'static str, account: &str, call: &str) -> Result<(), CtrlError> {
        let (accepted,): (bool,) = self.call_method(Manager::Call, method, (account, call))?;

        if !accepted {
            return Err(CtrlError::daemon(format!("daemon rejected {} for call {}", method, call)));
        }

        Ok(())
    }

    fn call_method<A: AppendAll, R: ReadAll>(
        &self,
        manager: Manager,
        method: &'static str,
        args: A,
    ) -> Result<R, CtrlError> {
        debug!("calling {}.{}", manager.iface(), method);

        self.bus
            .with_proxy(DBUS_NAME, manager.path(), TIMEOUT)
            .method_call(manager.iface(), method, args)
            .map_err(|why| {
                let why = CtrlError::from(why);
                error!("{} failed: {}", method, why);
                why
            })
    }
}
