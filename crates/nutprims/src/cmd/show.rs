use crate::cmd::{finish, open_session, ConnectArgs, DeviceArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_device, OutputFormat};

pub fn run(args: DeviceArgs, conn: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = open_session(conn)?;
    let device = session
        .device(&args.ups)
        .map_err(|err| client_error(&format!("cannot load {}", args.ups), err))?;
    finish(session);

    print_device(&device, format);
    Ok(SUCCESS)
}
