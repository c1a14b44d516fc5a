use nutprims_client::Device;

use crate::cmd::{finish, open_session, ConnectArgs, GetArgs};
use crate::exit::{client_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_variable, OutputFormat};

pub fn run(args: GetArgs, conn: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = open_session(conn)?;
    let mut device = Device::named(args.ups.clone());
    device
        .refresh_variables(&mut session)
        .map_err(|err| client_error(&format!("cannot read variables of {}", args.ups), err))?;
    finish(session);

    let variable = device.variable(&args.variable).ok_or_else(|| {
        CliError::new(
            USAGE,
            format!("{} has no variable named {}", args.ups, args.variable),
        )
    })?;

    print_variable(&device.name, variable, format);
    Ok(SUCCESS)
}
