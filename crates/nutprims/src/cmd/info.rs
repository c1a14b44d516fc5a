use serde::Serialize;

use crate::cmd::{finish, open_session, ConnectArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct InfoOutput {
    host: String,
    port: u16,
    server_version: String,
    protocol_version: String,
    help: String,
}

pub fn run(conn: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = open_session(conn)?;
    let help = session
        .help()
        .map_err(|err| client_error("HELP failed", err))?;

    let out = InfoOutput {
        host: conn.host.clone(),
        port: conn.port,
        server_version: session.version().to_string(),
        protocol_version: session.protocol_version().to_string(),
        help,
    };
    finish(session);

    print_info(&out, format);
    Ok(SUCCESS)
}

fn print_info(out: &InfoOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("Server Info:");
            println!("  Address:          {}:{}", out.host, out.port);
            println!("  Version:          {}", out.server_version);
            println!("  Protocol:         {}", out.protocol_version);
            println!("  Commands:         {}", out.help);
        }
        OutputFormat::Raw => {
            println!("{}", out.server_version);
        }
    }
}
