use std::{
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket},
};

use tracing::debug;

use crate::error::{Error, Result};

/// Connectionless, best-effort byte channel.
pub trait Transport {
    /// Sends `buf` as one datagram.
    fn send(&mut self, buf: &[u8]) -> io::Result<()>;
    fn close(self) -> io::Result<()>;
}

#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}
impl UdpTransport {
    pub fn open(host: &str, port: &str) -> Result<Self> {
        let port: u16 = port.parse().map_err(|_| Error::InvalidPort {
            port: port.to_owned(),
        })?;
        let addr = format!("{host}:{port}");
        let peer = (host, port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| Error::Resolve { addr: addr.clone() })?;
        let local: SocketAddr = match peer {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local)?;
        socket.connect(peer)?;
        debug!(%addr, %peer, "opened udp transport");
        Ok(Self { socket, peer })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}
impl Transport for UdpTransport {
    fn send(&mut self, buf: &[u8]) -> io::Result<()> {
        let n = self.socket.send(buf)?;
        if n != buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("sent {n} of {} bytes", buf.len()),
            ));
        }
        debug!(peer = %self.peer, bytes = n, "sent datagram");
        Ok(())
    }

    fn close(self) -> io::Result<()> {
        debug!(peer = %self.peer, "closed udp transport");
        drop(self.socket);
        Ok(())
    }
}

/// In-memory transport that records every datagram.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder {
    state: std::rc::Rc<std::cell::RefCell<RecorderState>>,
}
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecorderState {
    pub datagrams: Vec<Vec<u8>>,
    pub closes: usize,
    pub fail_sends: bool,
}
#[cfg(test)]
impl Recorder {
    pub fn datagrams(&self) -> Vec<Vec<u8>> {
        self.state.borrow().datagrams.clone()
    }
    pub fn closes(&self) -> usize {
        self.state.borrow().closes
    }
    pub fn fail_sends(&self) {
        self.state.borrow_mut().fail_sends = true;
    }
}
#[cfg(test)]
impl Transport for Recorder {
    fn send(&mut self, buf: &[u8]) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_sends {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        }
        state.datagrams.push(buf.to_vec());
        Ok(())
    }
    fn close(self) -> io::Result<()> {
        self.state.borrow_mut().closes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn rejects_non_numeric_port() {
        let err = UdpTransport::open("127.0.0.1", "statsd").unwrap_err();
        assert!(matches!(err, Error::InvalidPort { port } if port == "statsd"));
    }

    #[test]
    fn rejects_out_of_range_port() {
        let err = UdpTransport::open("127.0.0.1", "70000").unwrap_err();
        assert!(matches!(err, Error::InvalidPort { .. }));
    }

    #[test]
    fn sends_one_datagram_per_call() {
        let collector = UdpSocket::bind("127.0.0.1:0").unwrap();
        collector
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let port = collector.local_addr().unwrap().port().to_string();
        let mut transport = UdpTransport::open("127.0.0.1", &port).unwrap();
        assert_eq!(transport.peer(), collector.local_addr().unwrap());
        transport.send(b"first").unwrap();
        transport.send(b"second").unwrap();
        let mut buf = [0; 64];
        let n = collector.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"first");
        let n = collector.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"second");
        transport.close().unwrap();
    }
}
