use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};

use dashtui::{DashboardBuilder, DashboardConfig, SampleSender};

/// Shapes the demo producers draw
#[derive(Debug, Clone, Copy)]
enum Waveform {
    Sine,
    Sawtooth,
    Square,
}

impl Waveform {
    fn for_index(index: usize) -> Self {
        match index % 3 {
            0 => Waveform::Sine,
            1 => Waveform::Sawtooth,
            _ => Waveform::Square,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Square => "square",
        }
    }

    /// Value at `t` seconds for a wave with the given period
    fn sample(self, t: f64, period: f64) -> f64 {
        let phase = (t / period).fract();
        match self {
            Waveform::Sine => (phase * std::f64::consts::TAU).sin() * 50.0 + 50.0,
            Waveform::Sawtooth => phase * 100.0,
            Waveform::Square => {
                if phase < 0.5 {
                    100.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Report a waveform roughly every millisecond until `stop` is set.
fn spawn_producer(
    index: usize,
    sender: SampleSender,
    stop: Arc<AtomicBool>,
) -> Result<thread::JoinHandle<()>> {
    let wave = Waveform::for_index(index);
    let name = format!("{} #{}", wave.name(), index);
    let period = 2.0 + index as f64;

    thread::Builder::new()
        .name(format!("producer-{}", index))
        .spawn(move || {
            let started = Instant::now();
            while !stop.load(Ordering::Relaxed) {
                let t = started.elapsed().as_secs_f64();
                sender.set(&name, wave.sample(t, period));
                thread::sleep(Duration::from_millis(1));
            }
        })
        .context("Failed to spawn producer thread")
}

fn main() -> Result<()> {
    let matches = Command::new("dashtui")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Real-time telemetry dashboard demo")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("JSON file with dashboard settings"),
        )
        .arg(
            Arg::new("disable")
                .long("disable")
                .help("Build the dashboard disabled (producers run, nothing is drawn)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-self-metrics")
                .long("no-self-metrics")
                .help("Do not chart the dashboard's own memory and task count")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("capture-stdio")
                .long("capture-stdio")
                .help("Show the process's stdout and stderr in the dashboard")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Append captured output to FILE"),
        )
        .arg(
            Arg::new("producers")
                .short('p')
                .long("producers")
                .value_name("N")
                .help("Number of demo producer threads")
                .value_parser(value_parser!(usize))
                .default_value("3"),
        )
        .arg(
            Arg::new("duration")
                .short('d')
                .long("duration")
                .value_name("SECS")
                .help("Close the dashboard after SECS seconds (0 runs until quit)")
                .value_parser(value_parser!(u64))
                .default_value("0"),
        )
        .get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path))?,
        None => DashboardConfig::default(),
    };

    let mut builder = DashboardBuilder::new().with_config(config);
    if matches.get_flag("no-self-metrics") {
        builder = builder.self_metrics(false);
    }
    if matches.get_flag("capture-stdio") {
        builder = builder.capture_stdio(true);
    }
    if let Some(path) = matches.get_one::<String>("log-file") {
        builder = builder.log_file(path);
    }
    if matches.get_flag("disable") {
        builder = builder.disable();
    }

    let mut dashboard = builder.build().context("Failed to start dashboard")?;
    dashtui::init_logging(&dashboard);
    log::info!("dashtui demo running, press q to quit");

    let producer_count = matches.get_one::<usize>("producers").copied().unwrap_or(3);
    let stop = Arc::new(AtomicBool::new(false));
    let producers = (0..producer_count)
        .map(|i| spawn_producer(i, dashboard.sender(), Arc::clone(&stop)))
        .collect::<Result<Vec<_>>>()?;

    let duration = matches.get_one::<u64>("duration").copied().unwrap_or(0);
    let started = Instant::now();
    loop {
        thread::sleep(Duration::from_secs(1));
        let elapsed = started.elapsed().as_secs();
        println!("uptime {}s, {} producers", elapsed, producer_count);

        if duration > 0 && elapsed >= duration {
            break;
        }
    }

    stop.store(true, Ordering::Relaxed);
    dashboard.close();
    for producer in producers {
        let _ = producer.join();
    }

    Ok(())
}
