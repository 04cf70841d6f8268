#[macro_use]
extern crate fomat_macros;
#[macro_use]
extern crate shrinkwraprs;

mod cli;
mod logging;

use crate::{
    cli::{Client, Options},
    logging::{level_filter, setup_logging},
};
use anyhow::Context;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use jamictrl::{misc::format_ctrl_error, ACCOUNT_ENV};
use std::{env, process::exit};

pub fn main() {
    let matches = app().get_matches();

    if !atty::is(atty::Stream::Stdout) {
        yansi::Paint::disable();
    }

    let _ = setup_logging(level_filter(occurrences_of(&matches, "verbose")));

    if let Err(why) = main_(&matches) {
        eprintln!("jamictrl: {}", format_ctrl_error(&*why));
        exit(1);
    }
}

fn app() -> App<'static, 'static> {
    let call_id = || Arg::with_name("ID").help("id of the call, as listed by `call list`").required(true);

    App::new("jamictrl")
        .about("Jami daemon controller")
        .global_setting(AppSettings::ColoredHelp)
        .global_setting(AppSettings::UnifiedHelpMessage)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("account")
                .help("id or alias of the account to act on")
                .short("a")
                .long("account")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("json")
                .help("print listings as JSON")
                .long("json")
                .global(true),
        )
        .arg(
            Arg::with_name("verbose")
                .help("increase the verbosity of logs written to stderr")
                .short("v")
                .multiple(true)
                .global(true),
        )
        // Account management
        .subcommand(
            SubCommand::with_name("account")
                .about("manage the accounts configured in the daemon")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(SubCommand::with_name("list").about("list every account"))
                .subcommand(SubCommand::with_name("show").about("show the selected account"))
                .subcommand(SubCommand::with_name("enable").about("enable the selected account"))
                .subcommand(SubCommand::with_name("disable").about("disable the selected account"))
                .subcommand(
                    SubCommand::with_name("register").about("register the selected account"),
                )
                .subcommand(
                    SubCommand::with_name("unregister").about("unregister the selected account"),
                )
                .subcommand(
                    SubCommand::with_name("add")
                        .about("create a new account from its details")
                        .arg(
                            Arg::with_name("DETAILS")
                                .help("account details, IE: `Account.type=RING`")
                                .multiple(true)
                                .required(true),
                        ),
                )
                .subcommand(
                    SubCommand::with_name("remove")
                        .about("remove the account given with --account"),
                ),
        )
        // Call handling
        .subcommand(
            SubCommand::with_name("call")
                .about("place and handle calls")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(
                    SubCommand::with_name("place")
                        .about("place a call")
                        .arg(Arg::with_name("TO").help("uri of the peer to call").required(true)),
                )
                .subcommand(SubCommand::with_name("hangup").about("hang up a call").arg(call_id()))
                .subcommand(
                    SubCommand::with_name("accept").about("accept an incoming call").arg(call_id()),
                )
                .subcommand(
                    SubCommand::with_name("refuse").about("refuse an incoming call").arg(call_id()),
                )
                .subcommand(SubCommand::with_name("hold").about("put a call on hold").arg(call_id()))
                .subcommand(
                    SubCommand::with_name("unhold").about("resume a call on hold").arg(call_id()),
                )
                .subcommand(SubCommand::with_name("list").about("list the calls of the account")),
        )
        // Text messages
        .subcommand(
            SubCommand::with_name("message")
                .about("send text messages")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(
                    SubCommand::with_name("send")
                        .about("send a text message to a peer")
                        .arg(Arg::with_name("TO").help("uri of the peer").required(true))
                        .arg(Arg::with_name("BODY").help("text of the message").required(true)),
                ),
        )
        .subcommand(
            SubCommand::with_name("status").about("get the status of the jami daemon"),
        )
}

fn main_(matches: &ArgMatches) -> anyhow::Result<()> {
    let options = options(matches, env::var(ACCOUNT_ENV).ok());

    let (other, matches) = match matches.subcommand() {
        (other, Some(matches)) => (other, matches),
        _ => unreachable!("clap argument parsing failed"),
    };

    // Status reports on the daemon, so it must not require it to be running.
    let client = if other == "status" { Client::connect(options)? } else { Client::new(options)? };
    let func = match other {
        "account" => Client::account,
        "call" => Client::call,
        "message" => Client::message,
        "status" => Client::status,
        _ => unreachable!(),
    };

    func(&client, matches).with_context(|| fomat!((other) " subcommand failed"))
}

/// Collects the global flags, falling back to the account named in the environment.
fn options(matches: &ArgMatches, env_account: Option<String>) -> Options {
    Options {
        account: value_of(matches, "account")
            .map(String::from)
            .or_else(|| env_account.filter(|account| !account.is_empty())),
        json: occurrences_of(matches, "json") > 0,
    }
}

/// Finds a global argument, wherever it was given on the command line.
fn value_of<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches.value_of(name).or_else(|| {
        matches.subcommand().1.and_then(|matches| value_of(matches, name))
    })
}

fn occurrences_of(matches: &ArgMatches, name: &str) -> u64 {
    matches.occurrences_of(name).max(matches.subcommand().1.map_or(0, |m| occurrences_of(m, name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn parse(args: &[&str]) -> ArgMatches<'static> {
        app().get_matches_from_safe(args.iter().copied()).expect("valid command line")
    }

    #[test_case(&["jamictrl", "-a", "bob", "call", "list"] ; "before the subcommand")]
    #[test_case(&["jamictrl", "call", "list", "-a", "bob"] ; "after the subcommand")]
    #[test_case(&["jamictrl", "call", "--account", "bob", "hangup", "c1"] ; "between subcommands")]
    fn finds_global_account(args: &[&str]) {
        assert_eq!(value_of(&parse(args), "account"), Some("bob"));
    }

    #[test]
    fn missing_global_account() {
        assert_eq!(value_of(&parse(&["jamictrl", "account", "list"]), "account"), None);
    }

    #[test_case(&["jamictrl", "status"] => 0 ; "no flag")]
    #[test_case(&["jamictrl", "-vv", "status"] => 2 ; "before the subcommand")]
    #[test_case(&["jamictrl", "account", "show", "-vvv"] => 3 ; "after the subcommand")]
    fn counts_verbosity(args: &[&str]) -> u64 { occurrences_of(&parse(args), "verbose") }

    #[test]
    fn json_flag_in_subcommand() {
        let matches = parse(&["jamictrl", "account", "list", "--json"]);
        assert!(options(&matches, None).json);
        assert!(!options(&parse(&["jamictrl", "account", "list"]), None).json);
    }

    #[test]
    fn command_line_account_wins_over_environment() {
        let matches = parse(&["jamictrl", "account", "show", "-a", "alice"]);
        let options = options(&matches, Some("bob".into()));
        assert_eq!(options.account.as_deref(), Some("alice"));
    }

    #[test]
    fn environment_account_is_the_fallback() {
        let matches = parse(&["jamictrl", "account", "show"]);
        assert_eq!(options(&matches, Some("bob".into())).account.as_deref(), Some("bob"));
        assert_eq!(options(&matches, Some(String::new())).account, None);
        assert_eq!(options(&matches, None).account, None);
    }

    #[test]
    fn remove_takes_no_default_account() {
        let matches = parse(&["jamictrl", "account", "remove"]);
        assert_eq!(options(&matches, None).account, None);
    }
}
