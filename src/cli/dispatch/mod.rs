//! Maps parsed CLI arguments to an [`Action`].

use crate::cli::{
    actions::{
        Action, navigate, profile, progress, quiz, request, session, verify, whoami, wishlist,
    },
    commands::{api, store, subcommands},
    globals::GlobalArgs,
};
use crate::features::profile::ProfileFields;
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use reqwest::Method;
use secrecy::SecretString;
use std::path::PathBuf;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or malformed.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = GlobalArgs::new(api::Options::parse(matches)?, store::Options::parse(matches)?);

    let (name, sub) = matches
        .subcommand()
        .context("missing subcommand, see --help")?;

    let action = match name {
        subcommands::CMD_SESSION => Action::Session(session::Args {
            globals,
            command: session_command(sub)?,
        }),
        subcommands::CMD_REQUEST => Action::Request(request_args(globals, sub)?),
        subcommands::CMD_NAVIGATE => Action::Navigate(navigate::Args {
            globals,
            paths: strings(sub, "path"),
            auth_routes: strings(sub, "auth-route"),
            public_routes: strings(sub, "public-route"),
        }),
        subcommands::CMD_WHOAMI => Action::Whoami(whoami::Args {
            globals,
            remember: sub.get_flag("remember"),
        }),
        subcommands::CMD_VERIFY => Action::Verify(verify::Args {
            globals,
            email: required(sub, "email")?,
            code: required(sub, "code")?,
        }),
        subcommands::CMD_WISHLIST => Action::Wishlist(wishlist::Args {
            globals,
            command: wishlist_command(sub)?,
        }),
        subcommands::CMD_PROGRESS => Action::Progress(progress::Args {
            globals,
            command: progress_command(sub)?,
        }),
        subcommands::CMD_PROFILE => Action::Profile(profile::Args {
            globals,
            command: profile_command(sub)?,
        }),
        subcommands::CMD_QUIZ => Action::Quiz(quiz::Args {
            globals,
            chapter_id: required(sub, "chapter-id")?,
            seed: sub.get_one::<u64>("seed").copied(),
        }),
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok(action)
}

fn session_command(matches: &ArgMatches) -> Result<session::Command> {
    match matches.subcommand() {
        Some(("set", sub)) => Ok(session::Command::Set {
            token: SecretString::from(required(sub, "token")?),
            refresh_token: optional(sub, "refresh-token").map(SecretString::from),
        }),
        Some(("status", _)) => Ok(session::Command::Status),
        Some(("clear", _)) => Ok(session::Command::Clear),
        Some(("keygen", _)) => Ok(session::Command::Keygen),
        _ => Err(anyhow!("missing session subcommand, see --help")),
    }
}

fn request_args(globals: GlobalArgs, matches: &ArgMatches) -> Result<request::Args> {
    let method = required(matches, "method")?.to_uppercase();
    let method = Method::from_bytes(method.as_bytes())
        .with_context(|| format!("invalid HTTP method: {method}"))?;

    let files = strings(matches, "file")
        .iter()
        .map(|pair| split_pair(pair).map(|(name, path)| (name, PathBuf::from(path))))
        .collect::<Result<Vec<_>>>()?;

    let fields = strings(matches, "field")
        .iter()
        .map(|pair| split_pair(pair))
        .collect::<Result<Vec<_>>>()?;

    Ok(request::Args {
        globals,
        method,
        path: required(matches, "path")?,
        data: optional(matches, "data"),
        files,
        fields,
        anonymous: matches.get_flag("anonymous"),
    })
}

fn wishlist_command(matches: &ArgMatches) -> Result<wishlist::Command> {
    match matches.subcommand() {
        Some(("list", _)) => Ok(wishlist::Command::List),
        Some(("add", sub)) => Ok(wishlist::Command::Add(required(sub, "course-id")?)),
        Some(("remove", sub)) => Ok(wishlist::Command::Remove(required(sub, "course-id")?)),
        Some(("toggle", sub)) => Ok(wishlist::Command::Toggle(required(sub, "course-id")?)),
        _ => Err(anyhow!("missing wishlist subcommand, see --help")),
    }
}

fn progress_command(matches: &ArgMatches) -> Result<progress::Command> {
    match matches.subcommand() {
        Some(("show", sub)) => Ok(progress::Command::Show {
            course_id: required(sub, "course-id")?,
        }),
        Some(("complete", sub)) => Ok(progress::Command::Complete {
            course_id: required(sub, "course-id")?,
            lesson_id: required(sub, "lesson-id")?,
        }),
        _ => Err(anyhow!("missing progress subcommand, see --help")),
    }
}

fn profile_command(matches: &ArgMatches) -> Result<profile::Command> {
    match matches.subcommand() {
        Some(("show", _)) => Ok(profile::Command::Show),
        Some(("set", sub)) => Ok(profile::Command::Set {
            fields: ProfileFields {
                position: optional(sub, "position"),
                about: optional(sub, "about"),
                links: strings(sub, "link"),
            },
            remote: sub.get_flag("remote"),
        }),
        _ => Err(anyhow!("missing profile subcommand, see --help")),
    }
}

/// Splits `NAME=VALUE`; both sides must be non-empty.
fn split_pair(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() && !value.is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(anyhow!("expected NAME=VALUE, got {pair:?}")),
    }
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    optional(matches, id).ok_or_else(|| anyhow!("missing required argument: {id}"))
}

// Filters empty strings, which clap passes through when env vars are set to "".
fn optional(matches: &ArgMatches, id: &str) -> Option<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .filter(|v| !v.trim().is_empty())
}

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}
