use std::time::Duration;

use clap::{Args, Subcommand};
use nutprims_client::{connect_with_config, ConnectConfig, Session, DEFAULT_HOST, DEFAULT_PORT};
use tracing::{debug, warn};

use crate::exit::{client_error, CliError, CliResult, PERMISSION_DENIED, USAGE};
use crate::output::OutputFormat;

pub mod fsd;
pub mod get;
pub mod info;
pub mod instcmd;
pub mod list;
pub mod set;
pub mod show;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show version information.
    Version(VersionArgs),
    /// Print upsd version, protocol version and supported commands.
    Info,
    /// List devices known to upsd.
    List,
    /// Show a device with its variables, commands and clients.
    Show(DeviceArgs),
    /// Print a single variable.
    Get(GetArgs),
    /// Set a writeable variable (requires credentials).
    Set(SetArgs),
    /// Run an instant command (requires credentials).
    Instcmd(InstcmdArgs),
    /// Force a shutdown of the systems powered by a device (requires credentials).
    Fsd(DeviceArgs),
}

pub fn run(command: Command, conn: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Version(args) => version::run(args),
        Command::Info => info::run(conn, format),
        Command::List => list::run(conn, format),
        Command::Show(args) => show::run(args, conn, format),
        Command::Get(args) => get::run(args, conn, format),
        Command::Set(args) => set::run(args, conn, format),
        Command::Instcmd(args) => instcmd::run(args, conn, format),
        Command::Fsd(args) => fsd::run(args, conn, format),
    }
}

/// Where upsd lives and how to log in. Shared by every networked command.
#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// upsd host name or address.
    #[arg(long, env = "NUT_HOST", default_value = DEFAULT_HOST, global = true)]
    pub host: String,
    /// upsd TCP port.
    #[arg(long, env = "NUT_PORT", default_value_t = DEFAULT_PORT, global = true)]
    pub port: u16,
    /// Username for commands that change state.
    #[arg(long, env = "NUT_USERNAME", global = true)]
    pub username: Option<String>,
    /// Password for commands that change state.
    #[arg(long, env = "NUT_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,
    /// Connect and I/O timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s", global = true)]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug)]
pub struct DeviceArgs {
    /// Device name as configured in ups.conf.
    pub ups: String,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Device name as configured in ups.conf.
    pub ups: String,
    /// Variable name (e.g. battery.charge).
    pub variable: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Device name as configured in ups.conf.
    pub ups: String,
    /// Variable name (e.g. ups.delay.shutdown).
    pub variable: String,
    /// New value.
    pub value: String,
}

#[derive(Args, Debug)]
pub struct InstcmdArgs {
    /// Device name as configured in ups.conf.
    pub ups: String,
    /// Instant command name (e.g. test.battery.start).
    pub command: String,
}

/// Connect with the configured timeouts.
pub fn open_session(conn: &ConnectArgs) -> CliResult<Session> {
    let timeout = parse_timeout(&conn.timeout)?;
    let config = ConnectConfig::new(conn.host.clone(), conn.port)
        .with_connect_timeout(timeout)
        .with_io_timeout(timeout);
    connect_with_config(&config, None).map_err(|err| client_error("connect failed", err))
}

/// Connect and log in. Fails with a usage error when no credentials were given.
pub fn open_authenticated(conn: &ConnectArgs) -> CliResult<Session> {
    let (Some(username), Some(password)) = (&conn.username, &conn.password) else {
        return Err(CliError::new(
            USAGE,
            "this command requires --username and --password (or NUT_USERNAME/NUT_PASSWORD)",
        ));
    };

    let mut session = open_session(conn)?;
    let accepted = session
        .authenticate(username, password)
        .map_err(|err| client_error("login failed", err))?;
    if !accepted {
        return Err(CliError::new(
            PERMISSION_DENIED,
            format!("login failed: server did not accept credentials for {username}"),
        ));
    }
    Ok(session)
}

/// Log out. A failed goodbye is logged, not fatal: the command already ran.
pub fn finish(session: Session) {
    match session.disconnect() {
        Ok(true) => debug!("logged out"),
        Ok(false) => warn!("server acknowledged LOGOUT with an unexpected reply"),
        Err(err) => warn!(error = %err, "logout failed"),
    }
}

pub fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
