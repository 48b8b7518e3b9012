use std::fmt::{Display, Formatter};

use clap::Parser;
use log::LevelFilter;
use thiserror::Error;

use crate::compression::compress_block::{BlockOptions, PreRle};

/// Extension given to compressed files.
pub const FILE_EXTENSION: &str = ".flk";
/// Block size unit for the -b option.
pub const BLOCK_UNIT: usize = 102_400;

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Warnings,
    Info,
    Debug,
    Trace,
}
impl Verbosity {
    /// Log level for this verbosity.
    pub fn level(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Warnings => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// Compress or Decompress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Problems with the command line that clap can not catch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("input file seems to have already been compressed")]
    AlreadyCompressed,
    #[error("not a valid flick file (bad file extension)")]
    BadExtension,
}

/// All user settable options that control program behavior
#[derive(Debug, Clone)]
pub struct FlickOpts {
    /// Compress/Decompress
    pub op_mode: Mode,
    /// Name of file to read for input
    pub input: String,
    /// Name of file to write, derived from the input unless given
    pub output: String,
    /// Maximum input block size in bytes
    pub block_size: usize,
    /// Per block pipeline settings
    pub block: BlockOptions,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl FlickOpts {
    pub fn new() -> Self {
        Self {
            op_mode: Mode::Zip,
            input: String::new(),
            output: String::new(),
            block_size: 9 * BLOCK_UNIT,
            block: BlockOptions::new(),
            force_overwrite: false,
            verbose: Verbosity::Warnings,
        }
    }
}

impl Default for FlickOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "flick, a block sorting file compressor",
    long_about = "
    Compresses a file one block at a time: run length coding, a Burrows-Wheeler
    Transform, Move To Front recoding, packbits and canonical Huffman coding.
    Each compressed block is written behind its 4 byte length."
)]
pub struct Args {
    /// Filename of file to process
    #[clap()]
    pub input: String,

    /// Perform decompression on the input file
    #[clap(short = 'd', long = "decompress")]
    pub decompress: bool,

    /// Output file (defaults to the input name plus or minus .flk)
    #[clap(short = 'o', long = "output")]
    pub output: Option<String>,

    /// 1..9 - Set the block size from 100k to 900k
    #[clap(short = 'b', long = "block-size", default_value_t = 9, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub block_size: u8,

    /// Only code runs of zero bytes before the BWT
    #[clap(short = 'z', long = "zeros-only")]
    pub zeros_only: bool,

    /// Skip run length coding before the BWT
    #[clap(long = "no-pre-rle", conflicts_with = "zeros-only")]
    pub no_pre_rle: bool,

    /// Skip packbits after the MTF stage
    #[clap(long = "no-post-rle")]
    pub no_post_rle: bool,

    /// Force overwriting output file
    #[clap(short = 'f', long = "force")]
    pub force: bool,

    /// Suppress all messages
    #[clap(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Sets verbosity. Repeat for more (-vvv is chatty)
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Turn parsed arguments into program options.
    pub fn into_opts(self) -> Result<FlickOpts, CliError> {
        let op_mode = if self.decompress { Mode::Unzip } else { Mode::Zip };
        let output = match self.output {
            Some(output) => output,
            None => output_name(&self.input, op_mode)?,
        };
        let pre_rle = if self.no_pre_rle {
            PreRle::Off
        } else if self.zeros_only {
            PreRle::ZerosOnly
        } else {
            PreRle::General
        };
        let verbose = match (self.quiet, self.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Warnings,
            (false, 1) => Verbosity::Info,
            (false, 2) => Verbosity::Debug,
            _ => Verbosity::Trace,
        };
        Ok(FlickOpts {
            op_mode,
            input: self.input,
            output,
            block_size: self.block_size as usize * BLOCK_UNIT,
            block: BlockOptions {
                pre_rle,
                post_rle: !self.no_post_rle,
            },
            force_overwrite: self.force,
            verbose,
        })
    }
}

/// Parse the command line into FlickOpts.
pub fn flickopts_init() -> Result<FlickOpts, CliError> {
    Args::parse().into_opts()
}

/// Derive the output file name: add the extension when compressing, strip it when
/// decompressing.
pub fn output_name(input: &str, mode: Mode) -> Result<String, CliError> {
    let stem = input
        .strip_suffix(FILE_EXTENSION)
        .filter(|stem| !stem.is_empty());
    match (mode, stem) {
        (Mode::Zip, Some(_)) => Err(CliError::AlreadyCompressed),
        (Mode::Zip, None) => Ok(format!("{}{}", input, FILE_EXTENSION)),
        (Mode::Unzip, Some(stem)) => Ok(stem.to_string()),
        (Mode::Unzip, None) => Err(CliError::BadExtension),
    }
}
