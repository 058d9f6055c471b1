use config::Config;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{debug, trace};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uhuru_info::{
    cli::{Cli, Invocation},
    client::query_info,
    output::{write_text, write_xml},
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = match Cli::invocation(std::env::args_os()) {
        Invocation::Run(cli) => cli,
        Invocation::Usage(reason) => {
            let mut stderr = io::stderr().lock();
            if let Some(reason) = reason {
                writeln!(stderr, "{reason}")?;
            }
            write!(stderr, "{}", Cli::usage())?;
            return Ok(ExitCode::FAILURE);
        }
        Invocation::Version(version) => {
            write!(io::stdout().lock(), "{version}")?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    // NOTE: The verbosity flag takes precedence over the environment variable
    // for log control. `UHURU_LOG` can still tune single crates, e.g.
    // `UHURU_LOG=ipc=trace uhuru-info` traces the wire exchange only.
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var("UHURU_LOG")
        .from_env()?
        .add_directive(cli.verbosity.log_level_filter().as_str().parse()?);

    // stdout carries the report, logs go to stderr
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter)
        .init();

    // load config
    let config = match &cli.conffile {
        Some(path) => Config::load(path)?,
        _ => {
            let mut candidates = glob::glob("/etc/uhuru/conf.d/*.toml")?
                .filter_map(Result::ok)
                .collect::<Vec<_>>();
            candidates.insert(0, "/etc/uhuru/uhuru.toml".into());
            trace!(?candidates, "config file candidates");
            Config::load_multiple(candidates)?
        }
    };
    debug!(?config, ?cli);

    let endpoint = cli.endpoint(&config.client);
    let stream = match ipc::connect(&endpoint, config.client.connect_timeout).await {
        Ok(stream) => stream,
        Err(err) => {
            debug!(%endpoint, %err, "connection failed");
            let mut stderr = io::stderr().lock();
            match err.raw_os_error() {
                Some(errno) => writeln!(stderr, "cannot open client socket (errno {errno})")?,
                None => writeln!(stderr, "cannot open client socket ({err})")?,
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let info = query_info(stream).await?;

    let mut stdout = io::stdout().lock();
    if cli.xml {
        write_xml(&info, &mut stdout)?;
    } else {
        write_text(&info, &mut stdout)?;
    }
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}
