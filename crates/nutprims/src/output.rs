use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use nutprims_client::{Device, Variable};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Result of a state-changing command (`SET`, `INSTCMD`, `FSD`).
#[derive(Serialize)]
pub struct ActionOutput<'a> {
    pub device: &'a str,
    pub action: &'a str,
    pub target: &'a str,
    pub accepted: bool,
}

pub fn print_action(out: &ActionOutput<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut t = table(vec!["DEVICE", "ACTION", "TARGET", "ACCEPTED"]);
            t.add_row(vec![
                out.device.to_string(),
                out.action.to_string(),
                out.target.to_string(),
                out.accepted.to_string(),
            ]);
            println!("{t}");
        }
        OutputFormat::Pretty => {
            let verdict = if out.accepted { "accepted" } else { "not accepted" };
            println!("{} {} on {}: {verdict}", out.action, out.target, out.device);
        }
        OutputFormat::Raw => {
            println!("{}", if out.accepted { "OK" } else { "FAILED" });
        }
    }
}

pub fn print_variable(device: &str, variable: &Variable, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(variable),
        OutputFormat::Table => {
            let mut t = variables_table();
            t.add_row(variable_row(variable));
            println!("{t}");
        }
        OutputFormat::Pretty => {
            println!("{device} {}:", variable.name);
            println!("  Value:       {}", variable.value);
            println!("  Type:        {}", variable.var_type);
            if let Some(original) = &variable.original_type {
                println!("  Declared:    {original}");
            }
            println!("  Writeable:   {}", variable.writeable);
            if let Some(max) = variable.maximum_length {
                println!("  Max length:  {max}");
            }
            println!("  Description: {}", variable.description);
        }
        OutputFormat::Raw => println!("{}", variable.value),
    }
}

pub fn print_device(device: &Device, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(device),
        OutputFormat::Table => {
            println!("{} ({})", device.name, device.description);
            println!(
                "logins: {}  clients: {}",
                device.number_of_logins,
                display_list(&device.clients)
            );

            let mut vars = variables_table();
            for variable in &device.variables {
                vars.add_row(variable_row(variable));
            }
            println!("{vars}");

            if !device.commands.is_empty() {
                let mut cmds = table(vec!["COMMAND", "DESCRIPTION"]);
                for command in &device.commands {
                    cmds.add_row(vec![command.name.clone(), command.description.clone()]);
                }
                println!("{cmds}");
            }
        }
        OutputFormat::Pretty => {
            println!("Device {}:", device.name);
            println!("  Description: {}", device.description);
            println!("  Logins:      {}", device.number_of_logins);
            println!("  Clients:     {}", display_list(&device.clients));
            println!("  Variables:");
            for variable in &device.variables {
                println!(
                    "    {} = {} ({})",
                    variable.name, variable.value, variable.var_type
                );
            }
            println!("  Commands:");
            for command in &device.commands {
                println!("    {}: {}", command.name, command.description);
            }
        }
        OutputFormat::Raw => {
            for variable in &device.variables {
                println!("{}: {}", variable.name, variable.value);
            }
        }
    }
}

fn variables_table() -> Table {
    table(vec!["VARIABLE", "VALUE", "TYPE", "RW", "DESCRIPTION"])
}

fn variable_row(variable: &Variable) -> Vec<String> {
    vec![
        variable.name.clone(),
        variable.value.to_string(),
        variable.var_type.to_string(),
        if variable.writeable { "yes" } else { "no" }.to_string(),
        variable.description.clone(),
    ]
}

fn display_list(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
