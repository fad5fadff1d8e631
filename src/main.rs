use anyhow::{Context, Result};
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use stepperkit::{init_logging, list_ports, Config, SerialTransport, StepperController, BUILD_DATE};

/// Drive a single-axis MDrive stepper controller over a serial port
#[derive(Parser, Debug)]
#[command(name = "stepperkit")]
#[command(about = "Serial driver for MDrive stepper controllers", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (TOML or JSON); defaults to the platform config path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port, overrides the config file
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate, overrides the config file
    #[arg(short, long)]
    baud: Option<u32>,

    /// Log every command sent and line received
    #[arg(short, long)]
    debug: bool,

    /// Print discovered serial ports and exit
    #[arg(long)]
    list_ports: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        Config::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.connection.port = port;
    }
    if let Some(baud) = cli.baud {
        config.connection.baud_rate = baud;
    }
    config.stepper.debug |= cli.debug;
    config.validate().context("Invalid configuration")?;

    init_logging(config.stepper.debug)?;
    tracing::info!("stepperkit {} (built {})", stepperkit::VERSION, BUILD_DATE);

    if cli.list_ports {
        for port in list_ports().context("Failed to list serial ports")? {
            println!("{}\t{}", port.port_name, port.description);
        }
        return Ok(());
    }

    if config.connection.port.is_empty() {
        anyhow::bail!("No serial port configured; pass --port or set connection.port");
    }

    let transport = SerialTransport::open(&config.connection_params())
        .with_context(|| format!("Failed to open {}", config.connection.port))?;
    let controller = StepperController::new(transport, config.controller_options())
        .context("Invalid controller options")?;
    let handle = controller.handle();
    let worker = controller.spawn().context("Failed to start control loop")?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        let command = line.trim();
        match command {
            "" => {}
            "quit" => break,
            "status" => println!("{}", handle.snapshot().to_json()?),
            _ => handle.enqueue_command(command),
        }
        if worker.is_finished() {
            break;
        }
    }

    handle.request_terminate();
    worker
        .join()
        .map_err(|_| anyhow::anyhow!("Control loop panicked"))?
        .context("Control loop stopped with an error")?;

    Ok(())
}
