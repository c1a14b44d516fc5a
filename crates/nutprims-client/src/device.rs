//! Devices (UPS units) and the queries that populate them.
//!
//! A [`Device`] is plain data. It never holds on to the session it came
//! from; every operation that talks to the server takes the session as an
//! argument.

use std::io::{Read, Write};

use nutprims_frame::OK_LINE;
use serde::Serialize;
use tracing::debug;

use crate::dispatch::{self, list_items};
use crate::error::{ClientError, Result};
use crate::session::Session;
use crate::variable::{coerce_value, parse_type_report, TypeReport, Variable};
use crate::wire::{split_name_value, strip_echo, unquote};

/// Reply to `FSD` that confirms the forced-shutdown flag was set.
pub const FSD_SET: &str = "OK FSD-SET";

/// An instant command supported by a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub name: String,
    pub description: String,
}

/// A UPS known to upsd.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Device {
    pub name: String,
    pub description: String,
    /// Set once `MASTER` has been granted on this session.
    pub master: bool,
    pub number_of_logins: u32,
    pub clients: Vec<String>,
    pub variables: Vec<Variable>,
    pub commands: Vec<Command>,
}

impl Device {
    /// A device with only its name set. Use the `refresh_*` methods to fill
    /// in individual fields on demand.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a fully populated device.
    ///
    /// Queries clients, commands, description, login count and variables in
    /// that order. Any failure aborts the whole build.
    pub fn fetch<R: Read, W: Write>(session: &mut Session<R, W>, name: &str) -> Result<Self> {
        let mut device = Self::named(name);
        device.refresh_clients(session)?;
        device.refresh_commands(session)?;
        device.refresh_description(session)?;
        device.refresh_number_of_logins(session)?;
        device.refresh_variables(session)?;
        debug!(
            device = %device.name,
            variables = device.variables.len(),
            commands = device.commands.len(),
            "device populated"
        );
        Ok(device)
    }

    /// Look up a variable by exact name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Clients currently logged in to this device (`LIST CLIENT`).
    pub fn refresh_clients<R: Read, W: Write>(
        &mut self,
        session: &mut Session<R, W>,
    ) -> Result<&[String]> {
        let response = session.dispatch(&dispatch::list_client(&self.name))?;
        let prefix = format!("CLIENT {} ", self.name);
        self.clients = list_items(&response, &prefix).map(str::to_string).collect();
        Ok(&self.clients)
    }

    /// Instant commands with their descriptions (`LIST CMD` + `GET CMDDESC`).
    pub fn refresh_commands<R: Read, W: Write>(
        &mut self,
        session: &mut Session<R, W>,
    ) -> Result<&[Command]> {
        let response = session.dispatch(&dispatch::list_cmd(&self.name))?;
        let prefix = format!("CMD {} ", self.name);
        let mut commands = Vec::new();
        for name in list_items(&response, &prefix) {
            let description = self.command_description(session, name)?;
            commands.push(Command {
                name: name.to_string(),
                description,
            });
        }
        self.commands = commands;
        Ok(&self.commands)
    }

    /// The configured description (`GET UPSDESC`).
    ///
    /// upsd answers `Unavailable` when none is configured.
    pub fn refresh_description<R: Read, W: Write>(
        &mut self,
        session: &mut Session<R, W>,
    ) -> Result<&str> {
        let line = session.dispatch_line(&dispatch::get_upsdesc(&self.name))?;
        let rest = strip_echo(&line, &format!("UPSDESC {} ", self.name))?;
        self.description = unquote(rest);
        Ok(&self.description)
    }

    /// Number of clients that have done `LOGIN` on this device.
    pub fn refresh_number_of_logins<R: Read, W: Write>(
        &mut self,
        session: &mut Session<R, W>,
    ) -> Result<u32> {
        let line = session.dispatch_line(&dispatch::get_numlogins(&self.name))?;
        let rest = strip_echo(&line, &format!("NUMLOGINS {} ", self.name))?;
        self.number_of_logins = rest.trim().parse().map_err(|_| {
            ClientError::protocol(format!("invalid login count in '{line}'"))
        })?;
        Ok(self.number_of_logins)
    }

    /// All variables, each with description and type, coerced to typed values.
    pub fn refresh_variables<R: Read, W: Write>(
        &mut self,
        session: &mut Session<R, W>,
    ) -> Result<&[Variable]> {
        let response = session.dispatch(&dispatch::list_var(&self.name))?;
        let prefix = format!("VAR {} ", self.name);
        let mut variables = Vec::new();
        for item in list_items(&response, &prefix) {
            let (name, raw) = split_name_value(item)?;
            let description = self.variable_description(session, name)?;
            let report = self.variable_type(session, name)?;
            let coerced = coerce_value(&raw, &report.var_type);
            variables.push(Variable {
                name: name.to_string(),
                value: coerced.value,
                var_type: coerced.var_type,
                description,
                writeable: report.writeable,
                maximum_length: report.maximum_length,
                original_type: coerced.original_type,
            });
        }
        self.variables = variables;
        Ok(&self.variables)
    }

    /// Description of one variable (`GET DESC`).
    pub fn variable_description<R: Read, W: Write>(
        &self,
        session: &mut Session<R, W>,
        variable: &str,
    ) -> Result<String> {
        let line = session.dispatch_line(&dispatch::get_desc(&self.name, variable))?;
        let rest = strip_echo(&line, &format!("DESC {} {} ", self.name, variable))?;
        Ok(unquote(rest))
    }

    /// Declared type, writeability and length bound of one variable
    /// (`GET TYPE`).
    pub fn variable_type<R: Read, W: Write>(
        &self,
        session: &mut Session<R, W>,
        variable: &str,
    ) -> Result<TypeReport> {
        let line = session.dispatch_line(&dispatch::get_type(&self.name, variable))?;
        let rest = strip_echo(&line, &format!("TYPE {} {} ", self.name, variable))?;
        parse_type_report(rest)
    }

    /// Description of one instant command (`GET CMDDESC`).
    pub fn command_description<R: Read, W: Write>(
        &self,
        session: &mut Session<R, W>,
        command: &str,
    ) -> Result<String> {
        let line = session.dispatch_line(&dispatch::get_cmddesc(&self.name, command))?;
        let rest = strip_echo(&line, &format!("CMDDESC {} {} ", self.name, command))?;
        Ok(unquote(rest))
    }

    /// Request master (elevated) permission on this device.
    ///
    /// Returns true only when this request is answered with `OK`. A grant
    /// latches [`Device::master`]; a later refusal does not clear it.
    pub fn request_master<R: Read, W: Write>(
        &mut self,
        session: &mut Session<R, W>,
    ) -> Result<bool> {
        let reply = session.dispatch_line(&dispatch::master(&self.name))?;
        let granted = reply == OK_LINE;
        if granted {
            self.master = true;
        }
        Ok(granted)
    }

    /// Set a writeable variable. True when the server answers `OK`.
    pub fn set_variable<R: Read, W: Write>(
        &self,
        session: &mut Session<R, W>,
        variable: &str,
        value: &str,
    ) -> Result<bool> {
        let reply = session.dispatch_line(&dispatch::set_var(&self.name, variable, value))?;
        Ok(reply == OK_LINE)
    }

    /// Run an instant command. True when the server answers `OK`.
    pub fn send_command<R: Read, W: Write>(
        &self,
        session: &mut Session<R, W>,
        command: &str,
    ) -> Result<bool> {
        let reply = session.dispatch_line(&dispatch::instcmd(&self.name, command))?;
        Ok(reply == OK_LINE)
    }

    /// Set the forced-shutdown flag on this device.
    ///
    /// Requires master permission. The flag is a latch: once set, it stays
    /// set until upsd is restarted or the device is re-added to ups.conf.
    /// True only on the exact `OK FSD-SET` reply.
    pub fn force_shutdown<R: Read, W: Write>(&self, session: &mut Session<R, W>) -> Result<bool> {
        let reply = session.dispatch_line(&dispatch::fsd(&self.name))?;
        Ok(reply == FSD_SET)
    }
}
