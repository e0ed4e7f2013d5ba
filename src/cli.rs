// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Also accepts single-dash long flags (-server=host) from older deployments.

use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use talkiepi::config::ConnectionConfig;

/// Long flag names that may be written with a single dash.
const LONG_FLAGS: &[&str] = &[
    "server",
    "username",
    "password",
    "insecure",
    "certificate",
    "channel",
    "config",
    "verbose",
    "help",
    "version",
];

#[derive(Parser, Debug)]
#[command(name = "talkiepi")]
#[command(about = "Voice bridge client: connects to a voice server and stays until signalled")]
#[command(version)]
pub struct Cli {
    /// The server to connect to (host[:port])
    #[arg(long, default_value = "")]
    pub server: String,

    /// The username of the client (generated when empty)
    #[arg(long, default_value = "")]
    pub username: String,

    /// The password of the server
    #[arg(long, default_value = "")]
    pub password: String,

    /// Skip server certificate verification
    #[arg(
        long,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub insecure: bool,

    /// PEM encoded certificate and private key
    #[arg(long, default_value = "")]
    pub certificate: String,

    /// Channel to join by default
    #[arg(long, default_value = "")]
    pub channel: String,

    /// Path to config file (takes priority over all other flags)
    #[arg(long, default_value = "")]
    pub config: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Flag values as a connection config.
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            server: self.server.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            channel_name: self.channel.clone(),
            insecure_skip_verify: self.insecure,
            certificate_path: non_empty(&self.certificate),
        }
    }

    pub fn config_path(&self) -> Option<PathBuf> {
        non_empty(&self.config)
    }
}

fn non_empty(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

/// Rewrite `-name[=value]` to `--name[=value]` for known long flags.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut after_separator = false;

    for arg in args {
        if after_separator {
            normalized.push(arg);
            continue;
        }
        if arg == "--" {
            after_separator = true;
            normalized.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some(s) if is_single_dash_long_flag(s) => OsString::from(format!("-{s}")),
            _ => arg,
        };
        normalized.push(rewritten);
    }

    normalized
}

fn is_single_dash_long_flag(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LONG_FLAGS.contains(&name)
}
