use clap::{ArgAction, CommandFactory, Parser};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use ipc::Endpoint;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Uhuru antivirus information
///
/// Queries the running scanner daemon for the state of its modules and
/// signature bases, and prints it as text or as an XML document.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "uhuru-info",
    version,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Print help and quit.
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub help: bool,

    /// Use a TCP socket to reach the daemon.
    #[arg(short, long, conflicts_with = "unix")]
    pub tcp: bool,

    /// Use a unix socket to reach the daemon (default).
    #[arg(short, long)]
    pub unix: bool,

    /// TCP port number.
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Unix socket path.
    #[arg(short = 'a', long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Output information as XML.
    #[arg(short = 'x', long)]
    pub xml: bool,

    /// Path to configuration file.
    ///
    /// If not provided, the default locations are checked. They are
    /// `/etc/uhuru/uhuru.toml` and `/etc/uhuru/conf.d/*.toml`, where the
    /// latter being a glob pattern. If they don't exist, the default
    /// configuration is used.
    #[arg(short, long, value_parser = validate_file)]
    pub conffile: Option<PathBuf>,

    /// Print version and quit.
    #[arg(short = 'V', long, action = ArgAction::SetTrue)]
    pub version: bool,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketType {
    Tcp,
    Unix,
}

/// What the command line asks for.
#[derive(Debug)]
pub enum Invocation {
    Run(Box<Cli>),
    /// Print usage and exit with status 1. Carries the parse error, if any.
    Usage(Option<String>),
    Version(String),
}

impl Cli {
    /// Parse arguments. Help requests and every parse error end up as
    /// [`Invocation::Usage`]; help wins over `--version`.
    pub fn invocation<I, T>(args: I) -> Invocation
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) if cli.help => Invocation::Usage(None),
            Ok(cli) if cli.version => Invocation::Version(Self::command().render_version()),
            Ok(cli) => Invocation::Run(Box::new(cli)),
            Err(err) => {
                let rendered = err.render().to_string();
                Invocation::Usage(rendered.lines().next().map(str::to_owned))
            }
        }
    }

    /// Full usage text.
    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }

    pub fn socket_type(&self) -> SocketType {
        if self.tcp {
            SocketType::Tcp
        } else {
            SocketType::Unix
        }
    }

    /// Daemon address: command-line values first, then the configuration.
    pub fn endpoint(&self, client: &config::Client) -> Endpoint {
        match self.socket_type() {
            SocketType::Tcp => Endpoint::Tcp {
                host: client.tcp_host.clone(),
                port: self.port.unwrap_or(client.tcp_port),
            },
            SocketType::Unix => Endpoint::Unix(
                self.path
                    .clone()
                    .unwrap_or_else(|| client.socket_path.clone()),
            ),
        }
    }
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.exists() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}
