use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use rtlfw::{Format, LoaderConfig, RtlFw};

#[derive(Debug, Parser)]
#[command(version, about = "Inspect and apply Realtek NIC PHY firmware")]
struct Args {
    /// Directory searched before the standard firmware directories
    #[arg(long, global = true, env = "RTLFW_FIRMWARE_PATH")]
    firmware_path: Option<PathBuf>,

    /// Give up on firmware that executes more actions than this
    #[arg(long, global = true)]
    max_steps: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a firmware file
    Check { file: PathBuf },
    /// Validate a firmware file and print its actions
    Dump { file: PathBuf },
    /// Load firmware by name and write it to the PHY of a network interface
    Apply {
        #[arg(short, long)]
        interface: String,
        /// Firmware name, e.g. rtl_nic/rtl8168g-2.fw, or a chip such as 8168g-2
        name: String,
    },
    /// List known firmware files
    List { chip: Option<String> },
}

fn config(args: &Args) -> LoaderConfig {
    let mut config = LoaderConfig::default();
    config.custom_path = args.firmware_path.clone();
    if let Some(max_steps) = args.max_steps {
        config.max_steps = max_steps;
    }
    config
}

fn load_file(file: &Path, config: LoaderConfig) -> rtlfw::Result<RtlFw> {
    let name = file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut rtl_fw = RtlFw::new(name, config);
    rtl_fw.request_from_bytes(std::fs::read(file)?)?;
    Ok(rtl_fw)
}

fn describe(rtl_fw: &RtlFw) {
    let format = match rtl_fw.format() {
        Some(Format::Header) => "header",
        Some(Format::Raw) => "raw",
        None => "none",
    };
    println!("name:    {}", rtl_fw.name());
    println!("format:  {}", format);
    println!("version: {}", rtl_fw.version().unwrap_or_default());
    println!("actions: {}", rtl_fw.actions().len());
}

fn resolve_name(name: &str) -> String {
    match rtlfw::lookup_chip(name).as_slice() {
        [known] => known.name.to_owned(),
        _ => name.to_owned(),
    }
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
fn apply(interface: &str, rtl_fw: &mut RtlFw) -> rtlfw::Result<()> {
    let mut device = rtlfw::MdioDevice::open(interface)?;
    rtl_fw.request()?;
    describe(rtl_fw);
    let result = rtl_fw.write_firmware(&mut device);
    rtl_fw.release();
    result
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn apply(_interface: &str, _rtl_fw: &mut RtlFw) -> rtlfw::Result<()> {
    Err(rtlfw::Error::Unsupported("applying firmware on this platform"))
}

fn run(args: Args) -> rtlfw::Result<()> {
    let config = config(&args);
    match args.command {
        Command::Check { file } => {
            describe(&load_file(&file, config)?);
        }
        Command::Dump { file } => {
            let rtl_fw = load_file(&file, config)?;
            describe(&rtl_fw);
            for (index, action) in rtl_fw.actions().iter().enumerate() {
                println!("{:5}: {:08x}  {}", index, action.bits(), action);
            }
        }
        Command::Apply { interface, name } => {
            let mut rtl_fw = RtlFw::new(resolve_name(&name), config);
            apply(&interface, &mut rtl_fw)?;
            println!("firmware {} written to {}", rtl_fw.name(), interface);
        }
        Command::List { chip } => {
            let known = match &chip {
                Some(chip) => rtlfw::lookup_chip(chip),
                None => rtlfw::KNOWN_FIRMWARE.iter().collect(),
            };
            for known in known {
                println!("{:10} {}", known.chip, known.name);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}
