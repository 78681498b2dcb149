use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use sx1231_regcalc::derived::{bandwidth_offered, bandwidth_options};
use sx1231_regcalc::{
    encode_config, export_config, import_registers, init_logger, log_info, Modulation,
    PorDefaults, RadioConfig, RegisterMap, RegisterSession,
};

#[derive(Parser)]
#[command(name = "sx1231-regcalc")]
#[command(about = "Register calculator for the SX1231 / RFM69 transceiver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum BandwidthModulation {
    Fsk,
    Ook,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON configuration into a register dump
    Encode {
        /// Configuration snapshot; POR-equivalent defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write every register instead of the difference to POR
        #[arg(long)]
        full: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decode a register dump into a JSON configuration
    Import {
        dump: PathBuf,
        /// Configuration the dump is applied on top of
        #[arg(short, long)]
        prior: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare the registers of a configuration with a previous register dump
    Compare {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Previous register state; POR when omitted
        #[arg(short, long)]
        previous: Option<PathBuf>,
        /// Only list registers that changed
        #[arg(long)]
        changed: bool,
    },
    /// Print the power-on-reset register values
    Por,
    /// List the receiver filter bandwidths for a crystal
    Bandwidths {
        /// Crystal frequency in Hz
        #[arg(long, default_value = "32000000")]
        fxo: u32,
        #[arg(short, long, value_enum, default_value = "fsk")]
        modulation: BandwidthModulation,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RadioConfig> {
    let Some(path) = path else {
        return Ok(RadioConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading configuration {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing configuration {}", path.display()))
}

fn write_output(text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("writing {}", path.display())),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn format_cell(value: Option<u8>) -> String {
    value.map_or_else(|| "--".to_string(), |v| format!("{v:02x}"))
}

fn main() -> anyhow::Result<()> {
    init_logger()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            config,
            full,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            let regs = if full {
                encode_config(&config)?
            } else {
                export_config(&config)?
            };
            write_output(&regs.to_dump(), output.as_deref())?;
            log_info(&format!("Encoded {} registers", regs.len()));
        }
        Commands::Import {
            dump,
            prior,
            output,
        } => {
            let prior = load_config(prior.as_deref())?;
            let regs = RegisterMap::read_dump_file(&dump)
                .with_context(|| format!("reading register dump {}", dump.display()))?;
            let config = import_registers(&regs, &prior)?;
            let mut json = serde_json::to_string_pretty(&config)?;
            json.push('\n');
            write_output(&json, output.as_deref())?;
        }
        Commands::Compare {
            config,
            previous,
            changed,
        } => {
            let config = load_config(config.as_deref())?;
            let mut session = match previous {
                Some(path) => RegisterSession::with_previous(
                    RegisterMap::read_dump_file(&path)
                        .with_context(|| format!("reading register dump {}", path.display()))?,
                ),
                None => RegisterSession::new(),
            };
            println!("addr  cur  prev  por");
            for row in session.update(&config)? {
                if changed && !row.changed {
                    continue;
                }
                println!(
                    "{:02x}    {:<4} {:<5} {}{}",
                    row.address,
                    format_cell(row.current),
                    format_cell(row.previous),
                    format_cell(row.por),
                    if row.changed { "  *" } else { "" }
                );
            }
        }
        Commands::Por => {
            print!("{}", PorDefaults::map().to_dump());
        }
        Commands::Bandwidths { fxo, modulation } => {
            let modulation = match modulation {
                BandwidthModulation::Fsk => Modulation::Fsk,
                BandwidthModulation::Ook => Modulation::Ook,
            };
            println!("mant exp  bandwidth (kHz)");
            for option in bandwidth_options(f64::from(fxo))? {
                if !bandwidth_offered(modulation, option.exponent) {
                    continue;
                }
                let hz = match modulation {
                    Modulation::Fsk => option.fsk_hz,
                    Modulation::Ook => option.ook_hz,
                };
                println!("{:<4} {:<4} {:.1}", option.mantissa, option.exponent, hz / 1000.0);
            }
        }
    }

    Ok(())
}
