use aprswave_core::{AprsEncoder, EncoderConfig, Frame, PathEncoding, SAMPLE_RATE};
use clap::Parser;
use log::{error, info, LevelFilter};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "aprswave")]
#[command(about = "Encode an APRS packet as Bell 202 AFSK audio")]
struct Cli {
    /// Destination call sign, CALL[-SSID]
    #[arg(value_name = "TOCALL")]
    to_call: String,

    /// Source call sign, CALL[-SSID]
    #[arg(value_name = "FMCALL")]
    from_call: String,

    /// Comma-separated digipeater path, e.g. WIDE1-1,WIDE2-1 (may be empty)
    #[arg(value_name = "PATH")]
    path: String,

    /// APRS information field, passed through as raw bytes
    #[arg(value_name = "INFO", value_parser = clap::value_parser!(OsString))]
    info: OsString,

    /// Output WAV file
    #[arg(value_name = "OUTPUT.WAV")]
    output: PathBuf,

    /// Send the whole path as one concatenated address field
    #[arg(long)]
    legacy_path: bool,

    /// Silence before the packet (ms)
    #[arg(long, default_value = "150")]
    leading_silence_ms: f64,

    /// Silence after the packet (ms)
    #[arg(long, default_value = "150")]
    trailing_silence_ms: f64,

    /// HDLC flags before the frame
    #[arg(long, default_value = "1")]
    opening_flags: usize,

    /// HDLC flags after the frame
    #[arg(long, default_value = "2")]
    closing_flags: usize,

    /// Log frame fields (-v) and individual bytes and flags (-vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let start = Instant::now();
    match encode_command(&cli) {
        Ok(()) => {
            info!("Finished in {:.3} s", start.elapsed().as_secs_f64());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info).parse_default_env();
    // -v overrides RUST_LOG
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

#[cfg(unix)]
fn info_bytes(info: &OsString) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    info.as_bytes().to_vec()
}

#[cfg(not(unix))]
fn info_bytes(info: &OsString) -> Vec<u8> {
    info.to_string_lossy().into_owned().into_bytes()
}

fn encode_command(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Validate everything before the output file is touched
    let frame = Frame::parse(&cli.to_call, &cli.from_call, &cli.path, info_bytes(&cli.info))?;

    let path_encoding = if cli.legacy_path {
        PathEncoding::Concatenated
    } else {
        PathEncoding::PerEntry
    };
    let encoder = AprsEncoder::new(EncoderConfig {
        leading_silence_ms: cli.leading_silence_ms,
        trailing_silence_ms: cli.trailing_silence_ms,
        opening_flags: cli.opening_flags,
        closing_flags: cli.closing_flags,
        path_encoding,
    })?;

    let path_list: Vec<String> = frame.path.iter().map(|digi| digi.to_string()).collect();
    info!("Destination: {}", frame.destination);
    info!("Source: {}", frame.source);
    info!("Path: {}", path_list.join(","));
    info!("Info: {}", cli.info.to_string_lossy());

    let samples = encoder.encode_to_file(&frame, &cli.output)?;
    info!(
        "Wrote {} samples ({:.2} s at {} Hz) to {}",
        samples,
        samples as f64 / SAMPLE_RATE as f64,
        SAMPLE_RATE,
        cli.output.display()
    );

    Ok(())
}
