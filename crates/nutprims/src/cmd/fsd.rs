use nutprims_client::Device;
use tracing::{info, warn};

use crate::cmd::{finish, open_authenticated, ConnectArgs, DeviceArgs};
use crate::exit::{client_error, CliError, CliResult, FAILURE, PERMISSION_DENIED, SUCCESS};
use crate::output::{print_action, ActionOutput, OutputFormat};

pub fn run(args: DeviceArgs, conn: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = open_authenticated(conn)?;
    let mut device = Device::named(args.ups.clone());

    let master = device
        .request_master(&mut session)
        .map_err(|err| client_error(&format!("MASTER {} failed", args.ups), err))?;
    if !master {
        finish(session);
        return Err(CliError::new(
            PERMISSION_DENIED,
            format!("master permission on {} was not granted", args.ups),
        ));
    }

    warn!(device = %args.ups, "setting forced-shutdown flag");
    let accepted = device
        .force_shutdown(&mut session)
        .map_err(|err| client_error(&format!("FSD {} failed", args.ups), err))?;
    finish(session);

    info!(device = %args.ups, accepted, "forced shutdown requested");
    print_action(
        &ActionOutput {
            device: &args.ups,
            action: "fsd",
            target: &args.ups,
            accepted,
        },
        format,
    );
    Ok(if accepted { SUCCESS } else { FAILURE })
}
