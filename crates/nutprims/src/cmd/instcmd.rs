use nutprims_client::Device;
use tracing::info;

use crate::cmd::{finish, open_authenticated, ConnectArgs, InstcmdArgs};
use crate::exit::{client_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_action, ActionOutput, OutputFormat};

pub fn run(args: InstcmdArgs, conn: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = open_authenticated(conn)?;
    let device = Device::named(args.ups.clone());
    let accepted = device
        .send_command(&mut session, &args.command)
        .map_err(|err| client_error(&format!("INSTCMD {} failed", args.command), err))?;
    finish(session);

    info!(device = %args.ups, command = %args.command, accepted, "instant command sent");
    print_action(
        &ActionOutput {
            device: &args.ups,
            action: "instcmd",
            target: &args.command,
            accepted,
        },
        format,
    );
    Ok(if accepted { SUCCESS } else { FAILURE })
}
