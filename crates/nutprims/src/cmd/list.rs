use nutprims_client::{Device, DeviceSummary};
use serde::Serialize;

use crate::cmd::{finish, open_session, ConnectArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_json, table, OutputFormat};

#[derive(Serialize)]
struct DeviceRow {
    name: String,
    description: String,
    number_of_logins: u32,
}

pub fn run(conn: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = open_session(conn)?;
    let summaries = session
        .device_names()
        .map_err(|err| client_error("LIST UPS failed", err))?;

    let mut rows = Vec::with_capacity(summaries.len());
    for DeviceSummary { name, description } in summaries {
        let mut device = Device::named(name);
        device
            .refresh_number_of_logins(&mut session)
            .map_err(|err| client_error("GET NUMLOGINS failed", err))?;
        rows.push(DeviceRow {
            name: device.name,
            description,
            number_of_logins: device.number_of_logins,
        });
    }
    finish(session);

    print_rows(&rows, format);
    Ok(SUCCESS)
}

fn print_rows(rows: &[DeviceRow], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => {
            let mut t = table(vec!["NAME", "DESCRIPTION", "LOGINS"]);
            for row in rows {
                t.add_row(vec![
                    row.name.clone(),
                    row.description.clone(),
                    row.number_of_logins.to_string(),
                ]);
            }
            println!("{t}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!(
                    "{}: {} ({} logins)",
                    row.name, row.description, row.number_of_logins
                );
            }
        }
        OutputFormat::Raw => {
            for row in rows {
                println!("{}", row.name);
            }
        }
    }
}
