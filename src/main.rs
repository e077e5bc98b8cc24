use anyhow::Context;
use clap::{Parser, ValueEnum};
use metric_sink::{
    ganglia::{GangliaMetadata, GangliaSink},
    sampling::{uniform_draw, SampleRate},
    statsd::{StatsdConfig, StatsdSink},
    transport::UdpTransport,
    Backend, Kind, Measurement, Sink,
};
use tracing::info;

mod logging;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Statsd,
    Ganglia,
}
impl From<BackendArg> for Backend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Statsd => Backend::Statsd,
            BackendArg::Ganglia => Backend::Ganglia,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Counter,
    Gauge,
    Timer,
}
impl From<KindArg> for Kind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Counter => Kind::Counter,
            KindArg::Gauge => Kind::Gauge,
            KindArg::Timer => Kind::Timer,
        }
    }
}

/// Send one metric observation over UDP.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[arg(long, value_enum, default_value = "statsd", env = "METRIC_SINK_BACKEND")]
    backend: BackendArg,
    #[arg(long, default_value = "127.0.0.1", env = "METRIC_SINK_HOST")]
    host: String,
    /// Defaults to 8125 for statsd and 8649 for ganglia.
    #[arg(long, env = "METRIC_SINK_PORT")]
    port: Option<String>,
    /// Statsd sampling rate in [0, 1].
    #[arg(long, default_value_t = 1.0, env = "METRIC_SINK_RATE")]
    rate: f64,
    /// Ganglia units.
    #[arg(long, default_value = "", env = "METRIC_SINK_UNITS")]
    units: String,
    /// Ganglia source host.
    #[arg(long, default_value = "", env = "METRIC_SINK_SOURCE_HOST")]
    source_host: String,
    #[arg(value_enum)]
    kind: KindArg,
    group: String,
    bucket: String,
    value: String,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let backend = Backend::from(cli.backend);
    let port = cli
        .port
        .clone()
        .unwrap_or_else(|| backend.default_port().to_string());
    let transport = UdpTransport::open(&cli.host, &port)
        .with_context(|| format!("opening {}:{port}", cli.host))?;

    let mut sink: Box<dyn Sink> = match backend {
        Backend::Statsd => {
            let config = StatsdConfig {
                rate: SampleRate::new(cli.rate)?,
            };
            Box::new(StatsdSink::with_draw(transport, config, uniform_draw))
        }
        Backend::Ganglia => {
            let defaults = GangliaMetadata {
                units: cli.units.into_bytes(),
                host: cli.source_host.into_bytes(),
                ..Default::default()
            };
            Box::new(GangliaSink::with_defaults(transport, defaults))
        }
    };

    let measurement = Measurement::new(cli.kind.into(), cli.group, cli.bucket, cli.value);
    sink.push(&measurement).context("pushing measurement")?;
    sink.close().context("closing sink")?;
    info!(?backend, host = %cli.host, %port, "sent measurement");
    Ok(())
}
