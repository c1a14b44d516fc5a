mod common;

use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use common::{FakeUpsd, PASSWORD};
use nutprims::client::{ErrorKind, ServerErrorCode};
use nutprims::{connect, connect_with_config, ConnectConfig, Device, VariableValue};

#[test]
fn lists_fully_populated_devices() {
    let upsd = FakeUpsd::start(1);
    let mut session = connect("127.0.0.1", upsd.port).expect("should connect");

    let devices = session.list_devices().expect("devices should build");
    assert_eq!(devices.len(), 1);

    let ups1 = &devices[0];
    assert_eq!(ups1.description, "Main rack");
    assert_eq!(ups1.number_of_logins, 1);
    assert_eq!(ups1.clients, vec!["127.0.0.1"]);
    assert_eq!(
        ups1.variable("battery.charge").map(|v| &v.value),
        Some(&VariableValue::Integer(100))
    );
    assert_eq!(ups1.commands[0].description, "Disable the UPS beeper");

    assert!(session.disconnect().expect("logout should succeed"));
    let commands = upsd.commands();
    assert_eq!(commands[2], "LIST UPS");
    assert_eq!(commands[3], "LIST CLIENT ups1");
}

#[test]
fn authenticated_session_changes_state() {
    let upsd = FakeUpsd::start(1);
    let mut session = connect("127.0.0.1", upsd.port).expect("should connect");
    assert!(session.authenticate("admin", PASSWORD).unwrap());

    let mut ups1 = Device::named("ups1");
    assert!(ups1.set_variable(&mut session, "ups.id", "rack-b").unwrap());
    assert!(ups1.send_command(&mut session, "beeper.off").unwrap());
    assert!(ups1.request_master(&mut session).unwrap());
    assert!(ups1.master);
    assert!(ups1.force_shutdown(&mut session).unwrap());

    session.disconnect().unwrap();
    upsd.commands();
}

#[test]
fn list_error_does_not_wait_for_end_line() {
    let upsd = FakeUpsd::start(1);
    let config =
        ConnectConfig::new("127.0.0.1", upsd.port).with_io_timeout(Duration::from_secs(2));
    let mut session = connect_with_config(&config, None).expect("should connect");

    let err = session.device("ghost").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(
        err.server_error().map(|e| e.code.clone()),
        Some(ServerErrorCode::UnknownUps)
    );

    // The session is still usable after a server error.
    assert_eq!(
        session.help().unwrap().split_whitespace().next(),
        Some("Commands:")
    );
    session.disconnect().unwrap();
    upsd.commands();
}

#[test]
fn silent_server_hits_read_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let port = listener.local_addr().expect("local addr").port();
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("should accept");
        thread::sleep(Duration::from_millis(600));
        drop(stream);
    });

    let config = ConnectConfig::new("127.0.0.1", port)
        .with_connect_timeout(Duration::from_secs(1))
        .with_io_timeout(Duration::from_millis(100));
    let err = connect_with_config(&config, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);

    server.join().expect("server thread should complete");
}
