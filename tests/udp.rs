use statsd_reporter::prelude::*;
use statsd_reporter::{BufferingClient, ErrorKind, StatsReporter, UdpTransport, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT};
use std::net::UdpSocket;
use std::time::Duration;

mod utils;
use utils::run_arc_threaded_test;

fn new_server() -> (UdpSocket, String) {
    let server = UdpSocket::bind("127.0.0.1:0").unwrap();
    server.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    let host = server.local_addr().unwrap().to_string();
    (server, host)
}

fn recv_datagram(server: &UdpSocket) -> String {
    let mut buf = [0u8; 2048];
    let n = server.recv(&mut buf).unwrap();
    String::from_utf8(buf[..n].to_vec()).unwrap()
}

#[test]
fn test_stats_reporter_sends_to_server() {
    let (server, host) = new_server();
    let (reporter, err) = StatsReporter::new(&host, "my.app.");
    assert!(err.is_none());

    reporter.count("requests", 1.0, 1.0);
    reporter.gauge("load", 0.5);
    reporter.timing("took", 12.0);
    reporter.count_unique("users", "bob smith");
    reporter.flush().unwrap();

    assert_eq!(
        "my.app.requests:1|c\nmy.app.load:0.5|g\nmy.app.took:12|ms\nmy.app.users:bob_smith|s",
        recv_datagram(&server)
    );
}

#[test]
fn test_stats_reporter_splits_datagrams_at_packet_size() {
    let (server, host) = new_server();
    let (reporter, err) = StatsReporter::with_packet_size(&host, "", 32);
    assert!(err.is_none());

    reporter.gauge("first.gauge", 1.0); // 15 bytes
    reporter.gauge("second.gauge", 2.0); // 16 bytes, 15 + 16 + 1 >= 32
    reporter.flush().unwrap();

    assert_eq!("first.gauge:1|g", recv_datagram(&server));
    assert_eq!("second.gauge:2|g", recv_datagram(&server));
}

#[test]
fn test_stats_reporter_unresolvable_host_degrades() {
    let (reporter, err) = StatsReporter::new("missing-port.invalid", "my.app.");

    assert!(reporter.is_noop());
    assert_eq!(ErrorKind::IoError, err.unwrap().kind());

    reporter.count("a", 1.0, 0.5);
    reporter.gauge("b", 1.0);
    reporter.timing("c", 1.0);
    reporter.count_unique("d", "e");
    reporter.incr("f");
    assert!(reporter.flush().is_ok());
}

#[test]
fn test_stats_reporter_from_result_with_custom_client() {
    let (server, host) = new_server();
    let (reporter, err) = StatsReporter::from_result(
        UdpTransport::connect(&host, DEFAULT_CONNECT_TIMEOUT)
            .map(|t| BufferingClient::builder("custom.", t).with_packet_size(1432).build()),
    );
    assert!(err.is_none());

    reporter.decr("left");
    reporter.flush().unwrap();

    assert_eq!("custom.left:-1|c", recv_datagram(&server));
}

#[test]
fn test_udp_transport_default_port() {
    let host = format!("127.0.0.1:{}", DEFAULT_PORT);
    let transport = UdpTransport::connect(&host, DEFAULT_CONNECT_TIMEOUT).unwrap();

    assert_eq!(DEFAULT_PORT, transport.peer_addr().port());
}

#[test]
fn test_buffering_udp_client_single_threaded() {
    let (_server, host) = new_server();
    let transport = UdpTransport::connect(&host, DEFAULT_CONNECT_TIMEOUT).unwrap();
    let client = BufferingClient::from_transport("threaded.", transport);

    let client = run_arc_threaded_test(client, 1, 1);
    client.flush().unwrap();

    assert_eq!(1, client.stats().packets_sent);
}

#[ignore]
#[test]
fn test_buffering_udp_client_many_threaded() {
    let (_server, host) = new_server();
    let transport = UdpTransport::connect(&host, DEFAULT_CONNECT_TIMEOUT).unwrap();
    let client = BufferingClient::from_transport("threaded.", transport);

    let client = run_arc_threaded_test(client, utils::NUM_THREADS, utils::NUM_ITERATIONS);
    client.flush().unwrap();

    assert!(client.stats().packets_sent > 1);
}
