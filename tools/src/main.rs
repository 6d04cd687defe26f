//! analytics-runner: headless front end for the citizen-services analytics.
//!
//! Usage:
//!   analytics-runner --input request.json [--role water-admin] [--seed 42] [--data-dir ./data]
//!   analytics-runner --ipc-mode [--seed 42] [--data-dir ./data]
//!
//! In IPC mode each stdin line is one tagged JSON command and each stdout
//! line is one JSON response.

use anyhow::{Context, Result};
use cityassist_core::{
    clock::PortalClock,
    config::PortalConfig,
    report::ReportEngine,
    request::{AnalyticsRequest, ResourceRequest},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GenerateAnalytics(AnalyticsRequest),
    FetchResourceData(ResourceRequest),
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let input = flag_value(&args, "--input");
    let role_override = flag_value(&args, "--role");

    let config = PortalConfig::load(data_dir)?;
    let mut engine = ReportEngine::build(config, seed, PortalClock::System)?;

    if ipc_mode {
        return run_ipc_loop(&mut engine);
    }

    let Some(path) = input else {
        anyhow::bail!("either --input <file> or --ipc-mode is required");
    };
    let content = std::fs::read_to_string(path).with_context(|| format!("Cannot read {path}"))?;
    let mut request: AnalyticsRequest =
        serde_json::from_str(&content).with_context(|| format!("Cannot parse {path}"))?;
    if let Some(role) = role_override {
        request.user_role = role.to_string();
    }

    let report = engine.generate_analytics(&request)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_ipc_loop(engine: &mut ReportEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let response = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GenerateAnalytics(request) => engine
                .generate_analytics(&request)
                .and_then(|report| Ok(serde_json::to_string(&report)?)),
            IpcCommand::FetchResourceData(request) => engine
                .fetch_resource_data(&request)
                .and_then(|resource| Ok(serde_json::to_string(&resource)?)),
        };

        match response {
            Ok(line) => writeln!(stdout, "{line}")?,
            Err(e) => {
                log::error!("request failed: {e}");
                write_error(&mut stdout, &e.to_string())?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
