//! Ganglia gmetric protocol (XDR framing).
//!
//! Each push produces two datagrams: a metadata packet describing the metric
//! and a value packet carrying the observation as a string. Gmond is stateless
//! with respect to them, so repeating the metadata on every push is harmless.

use tracing::warn;

use crate::{
    codec::{encode_enum, encode_int, encode_string, encode_uint},
    error::{Error, Result},
    sink::{Channel, Sink},
    transport::{Transport, UdpTransport},
    Kind, Measurement,
};

pub const METADATA_CODE: u32 = 128;
pub const VALUE_CODE: u32 = 133;
/// Gmond drops or truncates anything larger.
pub const MAX_PACKET_SIZE: usize = 1500;
const VALUE_FORMAT: &[u8] = b"%s";
const GROUP_KEY: &[u8] = b"GROUP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float,
    Double,
}
impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Int8 => "int8",
            ValueType::UInt8 => "uint8",
            ValueType::Int16 => "int16",
            ValueType::UInt16 => "uint16",
            ValueType::Int32 => "int32",
            ValueType::UInt32 => "uint32",
            ValueType::Float => "float",
            ValueType::Double => "double",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slope {
    Zero,
    Positive,
    Negative,
    Both,
    Unspecified,
}
impl Slope {
    pub fn ordinal(&self) -> u32 {
        match self {
            Slope::Zero => 0,
            Slope::Positive => 1,
            Slope::Negative => 2,
            Slope::Both => 3,
            Slope::Unspecified => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GangliaMetadata {
    pub value_type: ValueType,
    pub units: Vec<u8>,
    pub slope: Slope,
    /// Seconds between reports before gmond considers the metric late.
    pub tmax: i32,
    /// Seconds before an unreported metric is deleted; 0 keeps it forever.
    pub dmax: i32,
    pub host: Vec<u8>,
    /// Host to impersonate, empty when reporting as ourselves.
    pub spoof: Vec<u8>,
}
impl Default for GangliaMetadata {
    fn default() -> Self {
        Self {
            value_type: ValueType::Int32,
            units: vec![],
            slope: Slope::Both,
            tmax: 60,
            dmax: 0,
            host: vec![],
            spoof: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GangliaRecord<'a> {
    pub measurement: &'a Measurement,
    pub metadata: GangliaMetadata,
}
impl<'a> GangliaRecord<'a> {
    pub fn builder(measurement: &'a Measurement) -> GangliaRecordBuilder<'a> {
        GangliaRecordBuilder::new(measurement, GangliaMetadata::default())
    }
}

/// Starts from a set of defaults; counters are forced to a positive slope.
#[derive(Debug, Clone)]
pub struct GangliaRecordBuilder<'a> {
    measurement: &'a Measurement,
    metadata: GangliaMetadata,
}
impl<'a> GangliaRecordBuilder<'a> {
    pub fn new(measurement: &'a Measurement, mut metadata: GangliaMetadata) -> Self {
        if measurement.kind() == Kind::Counter {
            metadata.slope = Slope::Positive;
        }
        Self {
            measurement,
            metadata,
        }
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.metadata.value_type = value_type;
        self
    }
    pub fn units(mut self, units: impl Into<Vec<u8>>) -> Self {
        self.metadata.units = units.into();
        self
    }
    pub fn slope(mut self, slope: Slope) -> Self {
        self.metadata.slope = slope;
        self
    }
    pub fn tmax(mut self, tmax: i32) -> Self {
        self.metadata.tmax = tmax;
        self
    }
    pub fn dmax(mut self, dmax: i32) -> Self {
        self.metadata.dmax = dmax;
        self
    }
    pub fn host(mut self, host: impl Into<Vec<u8>>) -> Self {
        self.metadata.host = host.into();
        self
    }
    pub fn spoof(mut self, spoof: impl Into<Vec<u8>>) -> Self {
        self.metadata.spoof = spoof.into();
        self
    }

    pub fn build(self) -> GangliaRecord<'a> {
        GangliaRecord {
            measurement: self.measurement,
            metadata: self.metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packets {
    pub metadata: Vec<u8>,
    pub value: Vec<u8>,
}
impl Packets {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.metadata.len() + self.value.len());
        buf.extend_from_slice(&self.metadata);
        buf.extend_from_slice(&self.value);
        buf
    }
}

fn encode_header(wtr: &mut Vec<u8>, code: u32, record: &GangliaRecord<'_>) {
    encode_uint(wtr, code);
    encode_string(wtr, &record.metadata.host);
    encode_string(wtr, record.measurement.bucket());
    encode_string(wtr, &record.metadata.spoof);
}

pub fn encode_metadata(record: &GangliaRecord<'_>) -> Vec<u8> {
    let meta = &record.metadata;
    let mut buf = vec![];
    encode_header(&mut buf, METADATA_CODE, record);
    encode_string(&mut buf, meta.value_type.name().as_bytes());
    encode_string(&mut buf, &meta.units);
    encode_enum(&mut buf, meta.slope.ordinal());
    encode_int(&mut buf, meta.tmax);
    encode_int(&mut buf, meta.dmax);
    let group = record.measurement.group();
    if group.is_empty() {
        encode_uint(&mut buf, 0);
    } else {
        encode_uint(&mut buf, 1);
        encode_string(&mut buf, GROUP_KEY);
        encode_string(&mut buf, group);
    }
    buf
}

pub fn encode_value(record: &GangliaRecord<'_>) -> Vec<u8> {
    let mut buf = vec![];
    encode_header(&mut buf, VALUE_CODE, record);
    encode_string(&mut buf, VALUE_FORMAT);
    encode_string(&mut buf, record.measurement.value());
    buf
}

pub fn encode(record: &GangliaRecord<'_>) -> Packets {
    Packets {
        metadata: encode_metadata(record),
        value: encode_value(record),
    }
}

pub fn open_ganglia(host: &str, port: &str) -> Result<GangliaSink<UdpTransport>> {
    let transport = UdpTransport::open(host, port)?;
    Ok(GangliaSink::new(transport))
}

#[derive(Debug)]
pub struct GangliaSink<T> {
    channel: Channel<T>,
    defaults: GangliaMetadata,
}
impl<T: Transport> GangliaSink<T> {
    pub fn new(transport: T) -> Self {
        Self::with_defaults(transport, GangliaMetadata::default())
    }

    /// Every record pushed through this sink starts from `defaults`.
    pub fn with_defaults(transport: T, defaults: GangliaMetadata) -> Self {
        Self {
            channel: Channel::new(transport),
            defaults,
        }
    }
}
impl<T: Transport> Sink for GangliaSink<T> {
    fn push(&mut self, measurement: &Measurement) -> Result<()> {
        if self.channel.is_closed() {
            return Err(Error::Closed);
        }
        let record = GangliaRecordBuilder::new(measurement, self.defaults.clone()).build();
        let packets = encode(&record);
        for packet in [&packets.metadata, &packets.value] {
            if packet.len() > MAX_PACKET_SIZE {
                warn!(
                    bytes = packet.len(),
                    max = MAX_PACKET_SIZE,
                    "ganglia packet exceeds the collector limit"
                );
            }
            self.channel.send(packet)?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.channel.close()
    }
}
