use tracing::info;

use crate::{
    error::{Error, Result},
    ganglia::open_ganglia,
    statsd::open_statsd,
    transport::Transport,
    Measurement,
};

/// A backend that accepts measurements.
///
/// The first `close` releases the transport. Any later `push` or `close`
/// fails with [`Error::Closed`]; the transport is never released twice.
pub trait Sink {
    fn push(&mut self, measurement: &Measurement) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
impl<S: Sink + ?Sized> Sink for Box<S> {
    fn push(&mut self, measurement: &Measurement) -> Result<()> {
        (**self).push(measurement)
    }
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Statsd,
    Ganglia,
}
impl Backend {
    pub fn default_port(&self) -> u16 {
        match self {
            Backend::Statsd => 8125,
            Backend::Ganglia => 8649,
        }
    }
}

pub fn open(backend: Backend, host: &str, port: &str) -> Result<Box<dyn Sink>> {
    let sink: Box<dyn Sink> = match backend {
        Backend::Statsd => Box::new(open_statsd(host, port)?),
        Backend::Ganglia => Box::new(open_ganglia(host, port)?),
    };
    info!(?backend, host, port, "opened sink");
    Ok(sink)
}

/// The single transport handle owned by a sink.
#[derive(Debug)]
pub(crate) struct Channel<T> {
    transport: Option<T>,
}
impl<T: Transport> Channel<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Some(transport),
        }
    }

    pub fn send(&mut self, buf: &[u8]) -> Result<()> {
        let transport = self.transport.as_mut().ok_or(Error::Closed)?;
        transport.send(buf)?;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    pub fn close(&mut self) -> Result<()> {
        let transport = self.transport.take().ok_or(Error::Closed)?;
        transport.close()?;
        Ok(())
    }
}
