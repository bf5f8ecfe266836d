use clap::Parser;
use loadprobe_api::{run_server, telemetry};
use loadprobe_core::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "loadprobe")]
#[command(about = "Diagnostic endpoint that simulates CPU, I/O and delay workloads", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML config file (falls back to LOADPROBE_CONFIG, then ./loadprobe.toml)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Override server.host
    #[arg(long)]
    host: Option<String>,

    /// Override server.port
    #[arg(long)]
    port: Option<u16>,

    /// Override probe.runtime (response field and x-runtime header)
    #[arg(long)]
    runtime: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(runtime) = &self.runtime {
            config.probe.runtime = runtime.clone();
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    cli.apply(&mut config);

    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = telemetry::init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(err) = run_server(config).await {
        tracing::error!(error = %err, "Server terminated with error");
        std::process::exit(1);
    }
}
