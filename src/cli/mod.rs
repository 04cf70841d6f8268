mod colors;

use self::colors::*;
use anyhow::Context;
use clap::ArgMatches;
use jamictrl::{
    account::{self, Account, RegistrationStatus},
    call::Call,
    client, CtrlError, ErrorKind, DBUS_NAME,
};
use serde::Serialize;

/// Flags shared by every subcommand.
#[derive(Debug, Default)]
pub struct Options {
    pub account: Option<String>,
    pub json: bool,
}

#[derive(Shrinkwrap)]
pub struct Client {
    #[shrinkwrap(main_field)]
    client: client::Client,
    options: Options,
}

impl Client {
    pub fn new(options: Options) -> Result<Self, CtrlError> {
        client::Client::new().map(|client| Client { client, options })
    }

    /// Connects without requiring the daemon to be running.
    pub fn connect(options: Options) -> Result<Self, CtrlError> {
        client::Client::connect().map(|client| Client { client, options })
    }

    fn selected(&self) -> anyhow::Result<Account> {
        Ok(self.current_account(self.options.account.as_deref())?)
    }

    /// Executes the account subcommand of the client.
    pub fn account(&self, matches: &ArgMatches) -> anyhow::Result<()> {
        match matches.subcommand() {
            ("list", _) => {
                let accounts = self.accounts()?;
                if self.options.json {
                    return print_json(&accounts);
                }

                if accounts.is_empty() {
                    println!("no accounts configured");
                }

                for account in &accounts {
                    print_account(account);
                }
            }
            ("show", _) => {
                let account = self.selected()?;
                if self.options.json {
                    return print_json(&account);
                }

                print_account(&account);
            }
            ("enable", _) => {
                let account = self.selected()?;
                self.set_account_enabled(&account.id, true)?;
                pintln!((color_label("Enabled")) " " (color_name(&account.alias)));
            }
            ("disable", _) => {
                let account = self.selected()?;
                self.set_account_enabled(&account.id, false)?;
                pintln!((color_label("Disabled")) " " (color_name(&account.alias)));
            }
            ("register", _) => {
                let account = self.selected()?;
                self.send_register(&account.id, true)?;
                pintln!((color_label("Registering")) " " (color_name(&account.alias)));
            }
            ("unregister", _) => {
                let account = self.selected()?;
                self.send_register(&account.id, false)?;
                pintln!((color_label("Unregistering")) " " (color_name(&account.alias)));
            }
            ("add", Some(matches)) => {
                let pairs = matches.values_of("DETAILS").into_iter().flatten();
                let details = account::parse_details(pairs)?;
                let id = self.add_account(details)?;
                pintln!((color_label("Created account")) " " (color_name(&id)));
            }
            ("remove", _) => {
                let account = self.named_account(self.options.account.as_deref())?;
                self.remove_account(&account.id)?;
                pintln!((color_label("Removed")) " " (color_name(&account.alias)));
            }
            _ => unreachable!(),
        }

        Ok(())
    }

    /// Executes the call subcommand of the client.
    pub fn call(&self, matches: &ArgMatches) -> anyhow::Result<()> {
        let account = self.selected()?;

        match matches.subcommand() {
            ("place", Some(matches)) => {
                let to = matches.value_of("TO").context("missing TO argument")?;
                let id = self.place_call(&account.id, to)?;
                if self.options.json {
                    return print_json(&id);
                }

                pintln!(
                    (color_label("Calling")) " " (color_name(to)) " "
                    "(" (color_id(&id)) ")"
                );
            }
            ("list", _) => {
                let calls = self.calls(&account.id)?;
                if self.options.json {
                    return print_json(&calls);
                }

                if calls.is_empty() {
                    println!("no calls in progress");
                }

                for call in &calls {
                    print_call(call);
                }
            }
            (action, Some(matches)) => {
                let id = matches.value_of("ID").context("missing ID argument")?;
                let func = match action {
                    "hangup" => client::Client::hang_up,
                    "accept" => client::Client::accept,
                    "refuse" => client::Client::refuse,
                    "hold" => client::Client::hold,
                    "unhold" => client::Client::unhold,
                    _ => unreachable!(),
                };

                func(&self.client, &account.id, id)?;
                pintln!((color_label(action)) ": " (color_name(id)));
            }
            _ => unreachable!(),
        }

        Ok(())
    }

    /// Executes the message subcommand of the client.
    pub fn message(&self, matches: &ArgMatches) -> anyhow::Result<()> {
        match matches.subcommand() {
            ("send", Some(matches)) => {
                let account = self.selected()?;
                let to = matches.value_of("TO").context("missing TO argument")?;
                let body = matches.value_of("BODY").context("missing BODY argument")?;

                let id = self.send_text_message(&account.id, to, body)?;
                if self.options.json {
                    return print_json(&id);
                }

                pintln!(
                    (color_label("Sent message")) " " (color_id(id)) " to "
                    (color_name(to))
                );
            }
            _ => unreachable!(),
        }

        Ok(())
    }

    pub fn status(&self, _matches: &ArgMatches) -> anyhow::Result<()> {
        if !self.daemon_running()? {
            pintln!(
                (color_label("Daemon")) ": " (color_name(DBUS_NAME)) " " (color_bad("not running"))
            );
            return Ok(());
        }

        pintln!((color_label("Daemon")) ": " (color_name(DBUS_NAME)) " " (color_good("running")));

        let selected = self.current_account(self.options.account.as_deref());
        match selection(selected)? {
            Selection::Account(account) => pintln!(
                (color_label("Account")) ": " (color_name(&account.alias)) " "
                "(" (registration(&account.registration)) ")"
            ),
            Selection::Missing(why) => {
                pintln!((color_label("Account")) ": " (color_bad("none")) " (" (why) ")")
            }
        }

        Ok(())
    }
}

/// The outcome of selecting an account for a status report.
#[derive(Debug, PartialEq)]
enum Selection {
    Account(Account),
    Missing(CtrlError),
}

/// A missing account is something to report, while other failures still abort.
fn selection(selected: Result<Account, CtrlError>) -> Result<Selection, CtrlError> {
    match selected {
        Ok(account) => Ok(Selection::Account(account)),
        Err(why) if why.kind() == ErrorKind::Account => Ok(Selection::Missing(why)),
        Err(why) => Err(why),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("failed to serialize output")?);
    Ok(())
}

fn print_account(account: &Account) {
    pintln!(
        (color_name(&account.alias)) " [" (account.kind) "]\n"
        "  " (color_label("id")) ": " (account.id) "\n"
        if !account.username.is_empty() {
            "  " (color_label("username")) ": " (account.username) "\n"
        }
        "  " (color_label("enabled")) ": " (account.enabled) "\n"
        "  " (color_label("status")) ": " (registration(&account.registration))
    );
}

fn print_call(call: &Call) {
    pintln!(
        (color_id(&call.id)) " " (color_name(&call.peer)) ": " (color_good(&call.state))
    );
}

fn registration(status: &RegistrationStatus) -> String {
    if status.is_error() {
        color_bad(status).to_string()
    } else if status.is_registered() {
        color_good(status).to_string()
    } else {
        status.to_string()
    }
}
