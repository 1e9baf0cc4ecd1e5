use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod zsm;
use zsm::{info as zsm_info, pack as zsm_pack, read_zsm_as_vec};

/// zsmpack command line tools
#[derive(Parser)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show summary info for a ZSM file (use '-' for stdin)
    Info {
        /// Input file to read (use '-' for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Compress a ZSM file into a banked dictionary
    Pack {
        /// Input file to read (use '-' for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output path for the compressed dictionary
        #[arg(short = 'o', long = "output", value_name = "OUT")]
        output: PathBuf,
        /// Memory bank the dictionary is loaded into first
        #[arg(long = "start-bank", default_value_t = 1)]
        start_bank: u32,
        /// Low address of the addressable window inside each bank
        #[arg(long = "base-addr", default_value_t = 0xA000)]
        base_addr: u32,
        /// Addressable bytes per bank available to this data
        #[arg(long = "window-size", default_value_t = 0x2000)]
        window_size: u32,
        /// Minimum delay tick count that terminates a line (>= 1)
        #[arg(long = "min-pause", default_value_t = 1)]
        min_pause: u8,
        /// Skip extended commands instead of storing them
        #[arg(long = "drop-ext-commands")]
        drop_ext_commands: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { file } => {
            let bytes = read_zsm_as_vec(&file)?;
            zsm_info(&file, &bytes)?;
        }
        Commands::Pack {
            file,
            output,
            start_bank,
            base_addr,
            window_size,
            min_pause,
            drop_ext_commands,
        } => {
            let bytes = read_zsm_as_vec(&file)?;
            let config = zsmpack::PackConfig::default()
                .with_start_bank(start_bank)
                .with_base_addr(base_addr)
                .with_window_size(window_size)?
                .with_min_pause_ticks(min_pause)?
                .with_keep_ext_commands(!drop_ext_commands);
            zsm_pack(&file, &bytes, &output, &config)?;
        }
    }

    Ok(())
}
