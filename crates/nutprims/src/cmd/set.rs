use nutprims_client::Device;
use tracing::info;

use crate::cmd::{finish, open_authenticated, ConnectArgs, SetArgs};
use crate::exit::{client_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_action, ActionOutput, OutputFormat};

pub fn run(args: SetArgs, conn: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = open_authenticated(conn)?;
    let device = Device::named(args.ups.clone());
    let accepted = device
        .set_variable(&mut session, &args.variable, &args.value)
        .map_err(|err| client_error(&format!("SET VAR {} failed", args.variable), err))?;
    finish(session);

    info!(device = %args.ups, variable = %args.variable, accepted, "variable set");
    print_action(
        &ActionOutput {
            device: &args.ups,
            action: "set",
            target: &args.variable,
            accepted,
        },
        format,
    );
    Ok(if accepted { SUCCESS } else { FAILURE })
}
