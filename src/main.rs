use clap::{Args, Parser, Subcommand};
use periodogram_cluster::cluster::service::{accept_workers, join_coordinator};
use periodogram_cluster::cluster::types::WorkerId;
use periodogram_cluster::config::{DEFAULT_MAX_PERIODS, DEFAULT_NUM_ELEMENTS};
use periodogram_cluster::run::{Coordinator, Phase, RunReport, Worker, run_local};
use periodogram_cluster::signal::{Signal, SyntheticSignal};
use periodogram_cluster::sink::{DEFAULT_TABLE_PATH, ResultSink};
use periodogram_cluster::{RunConfig, SignalFormat};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;

/// Distributed periodogram: find hidden sine waves in a large signal.
#[derive(Parser, Debug)]
#[command(name = "periodogram", version, about, long_about = None)]
struct Cli {
    /// Log debug messages (phase transitions, per-node progress)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the coordinator and all workers inside this process
    Local {
        #[command(flatten)]
        scan: ScanArgs,

        /// Number of participating workers, coordinator included
        #[arg(short, long, env = "PERIODOGRAM_WORKERS", default_value_t = 4)]
        workers: usize,
    },

    /// Load the signal, wait for workers over TCP and run the scan
    Coordinator {
        #[command(flatten)]
        scan: ScanArgs,

        /// Number of participating processes, coordinator included
        #[arg(short, long, env = "PERIODOGRAM_WORKERS")]
        workers: usize,

        /// Address to accept workers on
        #[arg(long, env = "PERIODOGRAM_BIND", default_value = "127.0.0.1:7070")]
        bind: SocketAddr,
    },

    /// Join a coordinator and compute the slice it assigns
    Worker {
        /// Coordinator address
        #[arg(long, env = "PERIODOGRAM_COORDINATOR")]
        coordinator: SocketAddr,

        /// Give up if no slice arrives within this many seconds
        #[arg(long, env = "PERIODOGRAM_RECV_TIMEOUT_SECS")]
        recv_timeout_secs: Option<u64>,
    },

    /// Write a synthetic signal with hidden sine waves
    Generate {
        /// Output file
        #[arg(short, long, default_value = "bigsignal.bin")]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "binary")]
        format: SignalFormat,

        #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_ELEMENTS)]
        elements: usize,

        /// Period of a hidden sine wave (repeatable)
        #[arg(short, long = "period", default_values_t = [50usize])]
        periods: Vec<usize>,

        #[arg(long, default_value_t = 1.0)]
        amplitude: f32,

        /// Half-width of the uniform noise
        #[arg(long, default_value_t = 0.5)]
        noise: f32,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Signal file
    #[arg(short, long, env = "PERIODOGRAM_INPUT", default_value = "bigsignal.bin")]
    input: PathBuf,

    #[arg(short, long, value_enum, env = "PERIODOGRAM_FORMAT", default_value = "binary")]
    format: SignalFormat,

    /// Number of samples in the signal
    #[arg(short = 'n', long, env = "PERIODOGRAM_ELEMENTS", default_value_t = DEFAULT_NUM_ELEMENTS)]
    elements: usize,

    /// Exclusive upper bound on candidate periods
    #[arg(short = 'p', long, env = "PERIODOGRAM_MAX_PERIODS", default_value_t = DEFAULT_MAX_PERIODS)]
    max_periods: usize,

    /// Table to write
    #[arg(short, long, env = "PERIODOGRAM_OUTPUT", default_value = DEFAULT_TABLE_PATH)]
    output: PathBuf,

    /// Fail if a worker stays silent for this many seconds
    #[arg(long, env = "PERIODOGRAM_RECV_TIMEOUT_SECS")]
    recv_timeout_secs: Option<u64>,
}

impl ScanArgs {
    fn config(&self, workers: usize) -> anyhow::Result<RunConfig> {
        let config = RunConfig::new(self.elements, self.max_periods, workers)?
            .with_recv_timeout(self.recv_timeout_secs.map(Duration::from_secs));
        Ok(config)
    }

    /// LOAD. Runs before any worker is contacted so a missing file fails fast.
    fn load(&self) -> anyhow::Result<Signal> {
        tracing::debug!("Entering {}", Phase::Load);
        Ok(Signal::load(&self.input, self.format, self.elements)?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Entering {}", Phase::Init);

    match cli.command {
        Command::Local { scan, workers } => {
            let config = scan.config(workers)?;
            let signal = scan.load()?;

            let report = run_local(config, &signal).await?;
            emit(&scan, &report)?;
        }

        Command::Coordinator {
            scan,
            workers,
            bind,
        } => {
            let config = scan.config(workers)?;
            let signal = scan.load()?;

            let listener = TcpListener::bind(bind).await?;
            tracing::info!("Coordinator listening on {}", bind);

            let links = accept_workers(&listener, workers - 1, config.recv_timeout()).await?;
            let report = Coordinator::new(config, links)?.run(&signal).await?;
            emit(&scan, &report)?;
        }

        Command::Worker {
            coordinator,
            recv_timeout_secs,
        } => {
            let worker_id = WorkerId::new();
            tracing::info!("Worker {:?} joining {}", worker_id, coordinator);

            let link = join_coordinator(coordinator, &worker_id).await?;
            let summary = Worker::new(link, recv_timeout_secs.map(Duration::from_secs))
                .run()
                .await?;
            tracing::info!(
                "Worker done: samples {:?} of a {}-way scan",
                summary.partition.range(),
                summary.world_size
            );
        }

        Command::Generate {
            output,
            format,
            elements,
            periods,
            amplitude,
            noise,
            seed,
        } => {
            tracing::info!(
                "Generating {} samples with hidden period(s) {:?}",
                elements,
                periods
            );
            let signal = SyntheticSignal {
                periods,
                amplitude,
                noise,
                seed,
            }
            .generate(elements);
            signal.write(&output, format)?;
        }
    }

    tracing::debug!("Entering {}", Phase::Done);
    Ok(())
}

/// EMIT. The totals are final by now; a sink failure is reported but changes nothing.
fn emit(scan: &ScanArgs, report: &RunReport) -> anyhow::Result<()> {
    tracing::debug!("Entering {}", Phase::Emit);

    if let Some(period) = report.totals.dominant_period() {
        tracing::info!("Strongest period: {}", period);
    }

    ResultSink::new(&scan.output).emit(&report.totals)?;
    Ok(())
}
