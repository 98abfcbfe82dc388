use anyhow::{ensure, Result};
use clap::Parser;
use env_logger::Env;
use mbedls_core::{
    BoardRecord, Detection, DetectionStatus, Detector, DeviceRegistry, MountSource, UsbTopology,
    VolumeMetadata,
};
use mbedls_host_macos::{capture_snapshot, MacosHost, SnapshotHost, ToolConfig};
use serde::Serialize;
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;

const LOG_LEVEL_ENV_VAR: &str = "MBEDLS_LOG";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "mbedls", version, about = "List mbed-enabled boards attached to this host")]
struct Args {
    /// Print the result as JSON instead of a table
    #[arg(long)]
    json: bool,
    #[arg(long, requires = "json")]
    pretty: bool,
    /// Log intermediate registry and topology trees
    #[arg(long)]
    debug: bool,
    /// Read captured tool output from DIR instead of querying the host
    #[arg(long, value_name = "DIR")]
    snapshot: Option<PathBuf>,
    /// Capture the host tools' output into DIR and exit
    #[arg(long, value_name = "DIR", conflicts_with = "snapshot")]
    capture: Option<PathBuf>,
    /// Do not read mbed.htm from mounted volumes
    #[arg(long)]
    skip_volume_metadata: bool,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    generated_at_utc: String,
    status: DetectionStatus,
    boards: &'a [BoardRecord],
    acquisition_errors: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.debug { "debug" } else { DEFAULT_LOG_LEVEL };
    env_logger::Builder::from_env(Env::default().filter_or(LOG_LEVEL_ENV_VAR, level)).init();

    if let Some(dir) = &args.capture {
        capture_snapshot(&ToolConfig::from_env(), dir)?;
        println!("captured: {}", dir.display());
        return Ok(());
    }

    let detection = match &args.snapshot {
        Some(dir) => {
            ensure!(dir.is_dir(), "snapshot directory {} not found", dir.display());
            detect(Detector::new(SnapshotHost::new(dir)), &args)
        }
        None => detect(Detector::new(MacosHost::new(ToolConfig::from_env())), &args),
    };

    if args.json {
        let report = Report {
            generated_at_utc: now_utc_rfc3339(),
            status: detection.status,
            boards: &detection.boards,
            acquisition_errors: detection.acquisition_errors.iter().map(ToString::to_string).collect(),
        };
        if args.pretty {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", serde_json::to_string(&report)?);
        }
    } else {
        print_table(&detection.boards);
    }

    if detection.status == DetectionStatus::Partial {
        log::warn!("some boards were only partially detected");
        std::process::exit(1);
    }
    Ok(())
}

fn detect<H>(detector: Detector<H>, args: &Args) -> Detection
where
    H: DeviceRegistry + UsbTopology + MountSource + VolumeMetadata,
{
    detector
        .with_volume_metadata(!args.skip_volume_metadata)
        .list_devices()
}

const HEADERS: [&str; 4] = ["platform_name", "mount_point", "serial_port", "target_id"];

fn print_table(boards: &[BoardRecord]) {
    let rows: Vec<[String; 4]> = boards
        .iter()
        .map(|board| {
            [
                &board.platform_name,
                &board.mount_point,
                &board.serial_port,
                &board.target_id,
            ]
            .map(|field| field.clone().unwrap_or_else(|| "unknown".to_string()))
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    println!("{}", format_row(&HEADERS.map(str::to_string), &widths));
    println!("{}", widths.map(|w| "-".repeat(w)).join("-+-"));
    for row in &rows {
        println!("{}", format_row(row, &widths));
    }
}

fn format_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn now_utc_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
