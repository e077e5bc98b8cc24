use std::{net::UdpSocket, time::Duration};

use metric_sink::{
    ganglia::{self, GangliaRecord},
    open, open_ganglia, open_statsd, Backend, Error, Kind, Measurement, Sink,
};

fn collector() -> (UdpSocket, String) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let port = socket.local_addr().unwrap().port().to_string();
    (socket, port)
}

fn recv(socket: &UdpSocket) -> Vec<u8> {
    let mut buf = [0; 2048];
    let n = socket.recv(&mut buf).unwrap();
    buf[..n].to_vec()
}

#[test]
fn statsd_lines_arrive_in_push_order() {
    let (collector, port) = collector();
    let mut sink = open_statsd("127.0.0.1", &port).unwrap();
    sink.push(&Measurement::new(Kind::Counter, "a", "b", "1"))
        .unwrap();
    sink.push(&Measurement::new(Kind::Gauge, "a", "b", "5"))
        .unwrap();
    sink.push(&Measurement::new(Kind::Timer, "a", "b", "250"))
        .unwrap();
    assert_eq!(recv(&collector), b"a.b:1|c");
    assert_eq!(recv(&collector), b"a.b:5|g");
    assert_eq!(recv(&collector), b"a.b:250|ms");
    sink.close().unwrap();
}

#[test]
fn ganglia_sends_metadata_then_value() {
    let (collector, port) = collector();
    let mut sink = open_ganglia("127.0.0.1", &port).unwrap();
    let m = Measurement::new(Kind::Counter, "web", "requests", "42");
    sink.push(&m).unwrap();
    let record = GangliaRecord::builder(&m).build();
    let packets = ganglia::encode(&record);
    assert_eq!(recv(&collector), packets.metadata);
    assert_eq!(recv(&collector), packets.value);
    sink.close().unwrap();
}

#[test]
fn boxed_sink_dispatches_by_backend() {
    let (collector, port) = collector();
    let mut sink = open(Backend::Statsd, "127.0.0.1", &port).unwrap();
    sink.push(&Measurement::new(Kind::Counter, "jobs", "done", "3"))
        .unwrap();
    assert_eq!(recv(&collector), b"jobs.done:3|c");
    sink.close().unwrap();
    assert!(matches!(sink.close(), Err(Error::Closed)));
}

#[test]
fn closed_sink_rejects_push() {
    let (_collector, port) = collector();
    let mut sink = open(Backend::Ganglia, "127.0.0.1", &port).unwrap();
    sink.close().unwrap();
    let m = Measurement::new(Kind::Gauge, "", "n", "1");
    assert!(matches!(sink.push(&m), Err(Error::Closed)));
}

#[test]
fn unresolvable_host_fails_to_open() {
    let err = open_statsd("host.invalid", "8125").unwrap_err();
    assert!(matches!(err, Error::Resolve { .. }));
}
