use super::*;
use crate::error::ChannelErrorKind;
use std::net::TcpListener;
use std::time::Instant;

fn unused_local_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

#[test]
fn defaults_accept_any_host_key() {
    let connector = SshConnector::default();
    assert_eq!(connector.host_key_policy(), HostKeyPolicy::AcceptAny);
    assert_eq!(connector.connect_timeout(), DEFAULT_CONNECT_TIMEOUT);
}

#[test]
fn builder_overrides_settings() {
    let connector = SshConnector::new()
        .with_host_key_policy(HostKeyPolicy::KnownHosts)
        .with_connect_timeout(Duration::from_millis(250));
    assert_eq!(connector.host_key_policy(), HostKeyPolicy::KnownHosts);
    assert_eq!(connector.connect_timeout(), Duration::from_millis(250));
}

#[test]
fn refused_connection_is_a_transport_error() {
    let port = unused_local_port();
    let result = SshConnector::new()
        .with_connect_timeout(Duration::from_secs(5))
        .connect("127.0.0.1", port, "admin", "pw");

    let Err(error) = result else {
        panic!("connecting to a closed port must fail");
    };
    assert_eq!(error.kind(), ChannelErrorKind::Transport, "{error}");
    assert!(error.to_string().contains("127.0.0.1"), "{error}");
}

#[test]
fn silent_server_hits_the_connect_deadline() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();

    let started = Instant::now();
    let result = SshConnector::new()
        .with_connect_timeout(Duration::from_millis(200))
        .connect("127.0.0.1", port, "admin", "pw");

    let Err(error) = result else {
        panic!("a server that never sends a banner must not authenticate");
    };
    assert!(error.is_timeout(), "{error}");
    assert!(started.elapsed() < Duration::from_secs(10));
    drop(listener);
}
