pub mod codec;
pub mod error;
pub mod ganglia;
pub mod sampling;
pub mod sink;
pub mod statsd;
pub mod transport;

pub use error::{Error, Result};
pub use ganglia::{open_ganglia, GangliaSink};
pub use sink::{open, Backend, Sink};
pub use statsd::{open_statsd, StatsdSink};

/// Fully-qualified metric name: `group.bucket`.
type MetricName = Vec<u8>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Counter,
    Gauge,
    Timer,
}

/// One observation, independent of any backend.
///
/// Every field is carried as raw bytes. The value in particular stays in its
/// serialized form since each backend stringifies it on its own terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    kind: Kind,
    group: Vec<u8>,
    bucket: Vec<u8>,
    value: Vec<u8>,
}
impl Measurement {
    pub fn new(
        kind: Kind,
        group: impl Into<Vec<u8>>,
        bucket: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            kind,
            group: group.into(),
            bucket: bucket.into(),
            value: value.into(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }
    pub fn group(&self) -> &[u8] {
        &self.group
    }
    pub fn bucket(&self) -> &[u8] {
        &self.bucket
    }
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn name(&self) -> MetricName {
        let mut name = Vec::with_capacity(self.group.len() + 1 + self.bucket.len());
        name.extend_from_slice(&self.group);
        name.push(b'.');
        name.extend_from_slice(&self.bucket);
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_joins_group_and_bucket() {
        let m = Measurement::new(Kind::Counter, "a", "b", "1");
        assert_eq!(m.name(), b"a.b");
    }

    #[test]
    fn name_keeps_separator_for_empty_group() {
        let m = Measurement::new(Kind::Gauge, "", "load", "0.3");
        assert_eq!(m.name(), b".load");
    }
}
