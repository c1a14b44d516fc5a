//! A scripted stand-in for upsd on a loopback listener.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

pub const VERSION: &str = "Network UPS Tools upsd 2.8.1 - https://www.networkupstools.org/";
pub const PASSWORD: &str = "sekret";

pub struct FakeUpsd {
    pub port: u16,
    handle: JoinHandle<Vec<String>>,
}

impl FakeUpsd {
    /// Serve `connections` sessions in turn, answering with [`reply`].
    pub fn start(connections: usize) -> Self {
        Self::start_with(connections, reply)
    }

    pub fn start_with(connections: usize, script: fn(&str) -> Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
        let port = listener.local_addr().expect("local addr").port();

        let handle = thread::spawn(move || {
            let mut received = Vec::new();
            for _ in 0..connections {
                let (stream, _) = listener.accept().expect("should accept");
                let mut writer = stream.try_clone().expect("clone");
                for line in BufReader::new(stream).lines() {
                    let Ok(line) = line else { break };
                    for reply in script(&line) {
                        if writeln!(writer, "{reply}").is_err() {
                            break;
                        }
                    }
                    let done = line == "LOGOUT";
                    received.push(line);
                    if done {
                        break;
                    }
                }
            }
            received
        });

        Self { port, handle }
    }

    /// Every command received, across all sessions.
    pub fn commands(self) -> Vec<String> {
        self.handle.join().expect("fake upsd should finish")
    }
}

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

/// One device, `ups1`, with three variables and two commands.
pub fn reply(command: &str) -> Vec<String> {
    let reply: &[&str] = match command {
        "VER" => &[VERSION],
        "NETVER" => &["1.3"],
        "HELP" => &[
            "Commands: HELP VER GET LIST SET INSTCMD LOGIN LOGOUT USERNAME PASSWORD STARTTLS",
        ],
        "LOGOUT" => &["OK Goodbye"],
        "USERNAME admin" => &["OK"],
        c if c == format!("PASSWORD {PASSWORD}") => &["OK"],
        c if c.starts_with("PASSWORD ") => &["ERR INVALID-PASSWORD"],
        "LIST UPS" => &[
            "BEGIN LIST UPS",
            "UPS ups1 \"Main rack\"",
            "END LIST UPS",
        ],
        "LIST CLIENT ups1" => &[
            "BEGIN LIST CLIENT ups1",
            "CLIENT ups1 127.0.0.1",
            "END LIST CLIENT ups1",
        ],
        "LIST CMD ups1" => &[
            "BEGIN LIST CMD ups1",
            "CMD ups1 beeper.off",
            "CMD ups1 test.battery.start",
            "END LIST CMD ups1",
        ],
        "GET CMDDESC ups1 beeper.off" => &["CMDDESC ups1 beeper.off \"Disable the UPS beeper\""],
        "GET CMDDESC ups1 test.battery.start" => {
            &["CMDDESC ups1 test.battery.start \"Start a battery test\""]
        }
        "GET UPSDESC ups1" => &["UPSDESC ups1 \"Main rack\""],
        "GET NUMLOGINS ups1" => &["NUMLOGINS ups1 1"],
        "LIST VAR ups1" => &[
            "BEGIN LIST VAR ups1",
            "VAR ups1 battery.charge \"100\"",
            "VAR ups1 input.voltage \"230.5\"",
            "VAR ups1 ups.id \"rack-a\"",
            "END LIST VAR ups1",
        ],
        "GET DESC ups1 battery.charge" => {
            &["DESC ups1 battery.charge \"Battery charge (percent)\""]
        }
        "GET DESC ups1 input.voltage" => &["DESC ups1 input.voltage \"Input voltage (V)\""],
        "GET DESC ups1 ups.id" => &["DESC ups1 ups.id \"UPS system identifier\""],
        "GET TYPE ups1 battery.charge" => &["TYPE ups1 battery.charge NUMBER"],
        "GET TYPE ups1 input.voltage" => &["TYPE ups1 input.voltage NUMBER"],
        "GET TYPE ups1 ups.id" => &["TYPE ups1 ups.id RW STRING:20"],
        "SET VAR ups1 ups.id \"rack-b\"" => &["OK"],
        "INSTCMD ups1 beeper.off" => &["OK"],
        "MASTER ups1" => &["OK"],
        "FSD ups1" => &["OK FSD-SET"],
        c if c.starts_with("INSTCMD ups1 ") => &["ERR CMD-NOT-SUPPORTED"],
        c if c.contains(" ups1") => &["ERR VAR-NOT-SUPPORTED"],
        c if c.starts_with("LIST ") || c.starts_with("GET ") || c.starts_with("MASTER ") => {
            &["ERR UNKNOWN-UPS"]
        }
        _ => &["ERR UNKNOWN-COMMAND"],
    };
    lines(reply)
}
