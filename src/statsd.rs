//! Statsd line protocol with client-side sampling.
//!
//! `<group>.<bucket>:<value>|<suffix>`, followed by `@<rate>` when the
//! observation was sampled below 1.0.

use tracing::debug;

use crate::{
    error::{Error, Result},
    sampling::{uniform_draw, Decision, SampleRate},
    sink::{Channel, Sink},
    transport::{Transport, UdpTransport},
    Kind, Measurement,
};

pub fn suffix(kind: Kind) -> &'static str {
    match kind {
        Kind::Counter => "c",
        Kind::Gauge => "g",
        Kind::Timer => "ms",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsdConfig {
    pub rate: SampleRate,
}

/// A measurement expanded with the sampling rate it is pushed at.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsdRecord<'a> {
    pub measurement: &'a Measurement,
    pub rate: SampleRate,
}
impl<'a> StatsdRecord<'a> {
    pub fn new(measurement: &'a Measurement, config: &StatsdConfig) -> Self {
        Self {
            measurement,
            rate: config.rate,
        }
    }
}

/// Returns no bytes when the draw drops the observation.
pub fn encode(record: &StatsdRecord<'_>, draw: f64) -> Vec<u8> {
    let decision = record.rate.decide(draw);
    if decision == Decision::Ignore {
        return vec![];
    }
    let m = record.measurement;
    let mut buf = m.name();
    buf.push(b':');
    buf.extend_from_slice(m.value());
    buf.push(b'|');
    buf.extend_from_slice(suffix(m.kind()).as_bytes());
    if decision == Decision::Sampled {
        buf.extend_from_slice(format!("@{}", record.rate.get()).as_bytes());
    }
    buf
}

pub fn open_statsd(host: &str, port: &str) -> Result<StatsdSink<UdpTransport>> {
    let transport = UdpTransport::open(host, port)?;
    Ok(StatsdSink::new(transport))
}

#[derive(Debug)]
pub struct StatsdSink<T, D = fn() -> f64> {
    channel: Channel<T>,
    config: StatsdConfig,
    draw: D,
}
impl<T: Transport> StatsdSink<T> {
    pub fn new(transport: T) -> Self {
        Self::with_draw(transport, StatsdConfig::default(), uniform_draw as fn() -> f64)
    }
}
impl<T: Transport, D: FnMut() -> f64> StatsdSink<T, D> {
    pub fn with_draw(transport: T, config: StatsdConfig, draw: D) -> Self {
        Self {
            channel: Channel::new(transport),
            config,
            draw,
        }
    }

    pub fn config(&self) -> &StatsdConfig {
        &self.config
    }
}
impl<T: Transport, D: FnMut() -> f64> Sink for StatsdSink<T, D> {
    fn push(&mut self, measurement: &Measurement) -> Result<()> {
        if self.channel.is_closed() {
            return Err(Error::Closed);
        }
        let record = StatsdRecord::new(measurement, &self.config);
        let buf = encode(&record, (self.draw)());
        if buf.is_empty() {
            debug!(rate = record.rate.get(), "observation sampled out");
            return Ok(());
        }
        self.channel.send(&buf)
    }

    fn close(&mut self) -> Result<()> {
        self.channel.close()
    }
}
