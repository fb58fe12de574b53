use clap::{Arg, ArgAction, Command};

pub const CMD_SESSION: &str = "session";
pub const CMD_REQUEST: &str = "request";
pub const CMD_NAVIGATE: &str = "navigate";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_VERIFY: &str = "verify";
pub const CMD_WISHLIST: &str = "wishlist";
pub const CMD_PROGRESS: &str = "progress";
pub const CMD_PROFILE: &str = "profile";
pub const CMD_QUIZ: &str = "quiz";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(session())
        .subcommand(request())
        .subcommand(navigate())
        .subcommand(
            Command::new(CMD_WHOAMI)
                .about("Resolve the current identity through GET user/me")
                .arg(
                    Arg::new("remember")
                        .long("remember")
                        .help("Store id, name, email and role in the session store")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new(CMD_VERIFY)
                .about("Submit an email verification code")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("code").long("code").required(true)),
        )
        .subcommand(wishlist())
        .subcommand(progress())
        .subcommand(profile())
        .subcommand(
            Command::new(CMD_QUIZ)
                .about("Fetch the MCQs of a chapter with shuffled options")
                .arg(Arg::new("chapter-id").required(true))
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for a reproducible shuffle")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
}

fn session() -> Command {
    Command::new(CMD_SESSION)
        .about("Inspect or seed the encrypted session store")
        .subcommand_required(true)
        .subcommand(
            Command::new("set")
                .about("Store an access token and optionally a refresh token")
                .arg(
                    Arg::new("token")
                        .long("token")
                        .env("COURSEDESK_TOKEN")
                        .hide_env_values(true)
                        .required(true),
                )
                .arg(
                    Arg::new("refresh-token")
                        .long("refresh-token")
                        .env("COURSEDESK_REFRESH_TOKEN")
                        .hide_env_values(true),
                ),
        )
        .subcommand(Command::new("status").about("Show which session entries are present"))
        .subcommand(Command::new("clear").about("Remove every session entry"))
        .subcommand(Command::new("keygen").about("Print a new random store key"))
}

fn request() -> Command {
    Command::new(CMD_REQUEST)
        .about("Send an arbitrary request and print the response envelope")
        .arg(
            Arg::new("method")
                .required(true)
                .value_parser(["GET", "POST", "PUT", "PATCH", "DELETE"])
                .ignore_case(true),
        )
        .arg(Arg::new("path").required(true).help("Path relative to the API base URL"))
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .help("JSON request body")
                .conflicts_with_all(["file", "field"]),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .help("Multipart file part as NAME=PATH")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("field")
                .long("field")
                .help("Multipart text part as NAME=VALUE")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("anonymous")
                .long("anonymous")
                .help("Send without the Authorization header and skip token refresh")
                .action(ArgAction::SetTrue),
        )
}

fn navigate() -> Command {
    Command::new(CMD_NAVIGATE)
        .about("Run route authorization for one or more paths, in order")
        .arg(Arg::new("path").required(true).num_args(1..))
        .arg(
            Arg::new("auth-route")
                .long("auth-route")
                .help("Extra auth route pattern, anchored regex")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("public-route")
                .long("public-route")
                .help("Extra public route pattern, anchored regex")
                .action(ArgAction::Append),
        )
}

fn wishlist() -> Command {
    let course = || Arg::new("course-id").required(true);

    Command::new(CMD_WISHLIST)
        .about("Manage the wishlist")
        .subcommand_required(true)
        .subcommand(Command::new("list"))
        .subcommand(Command::new("add").arg(course()))
        .subcommand(Command::new("remove").arg(course()))
        .subcommand(Command::new("toggle").arg(course()))
}

fn progress() -> Command {
    Command::new(CMD_PROGRESS)
        .about("Show or update course progress")
        .subcommand_required(true)
        .subcommand(Command::new("show").arg(Arg::new("course-id").required(true)))
        .subcommand(
            Command::new("complete")
                .arg(Arg::new("course-id").required(true))
                .arg(Arg::new("lesson-id").required(true)),
        )
}

fn profile() -> Command {
    Command::new(CMD_PROFILE)
        .about("Show or edit profile fields")
        .subcommand_required(true)
        .subcommand(Command::new("show").about("Show locally stored profile fields"))
        .subcommand(
            Command::new("set")
                .about("Update profile fields; fields not given keep their stored values")
                .arg(Arg::new("position").long("position"))
                .arg(Arg::new("about").long("about"))
                .arg(
                    Arg::new("link")
                        .long("link")
                        .help("Profile link, repeatable; replaces all stored links")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("remote")
                        .long("remote")
                        .help("Save through PUT user/profile instead of only locally")
                        .action(ArgAction::SetTrue),
                ),
        )
}
