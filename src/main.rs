//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufReader, BufWriter},
    process,
};

use flick::compression::compress::compress_file;
use flick::compression::decompress::{decompress_file, Limit};
use flick::compression::hooks::{FramedReader, FramedWriter};
use flick::tools::cli::{flickopts_init, FlickOpts, Mode};
use flick::FlickError;

use log::{error, info, warn};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

fn main() {
    let options = match flickopts_init() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("*** {}", e);
            process::exit(1);
        }
    };

    // Available log levels are Error, Warn, Info, Debug, Trace
    if TermLogger::init(
        options.verbose.level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("*** Could not start the logger");
    }

    info!(
        "{} {} to {} with {} byte blocks",
        options.op_mode, options.input, options.output, options.block_size
    );

    //----- Figure how what we need to do and go do it
    let result = match options.op_mode {
        Mode::Zip => zip(&options),
        Mode::Unzip => unzip(&options),
    };

    if let Err(e) = result {
        error!("*** {}", e);
        process::exit(1);
    }
    info!("Done.");
}

/// Open the output file, refusing to clobber an existing one unless forced.
fn create_output(opts: &FlickOpts) -> io::Result<File> {
    let mut open = OpenOptions::new();
    open.write(true);
    if opts.force_overwrite {
        open.create(true).truncate(true);
    } else {
        open.create_new(true);
    }
    open.open(&opts.output)
}

/// Don't leave a partial file behind.
fn discard_output(opts: &FlickOpts, e: FlickError) -> FlickError {
    if let Err(rm) = fs::remove_file(&opts.output) {
        warn!("Could not remove {}: {}", opts.output, rm);
    }
    e
}

fn zip(opts: &FlickOpts) -> Result<(), FlickError> {
    let mut source = BufReader::new(File::open(&opts.input)?);
    let mut hooks = FramedWriter::new(BufWriter::new(create_output(opts)?));

    match compress_file(&mut hooks, &mut source, opts.block_size, &opts.block) {
        Ok(stats) => {
            let written = hooks.written;
            hooks
                .finish()
                .map_err(|e| discard_output(opts, FlickError::Io(e)))?;
            info!(
                "{} blocks, {} -> {} bytes",
                stats.blocks, stats.bytes_in, written
            );
            Ok(())
        }
        Err(e) => {
            let e = hooks.io_error.take().map_or(e, FlickError::Io);
            drop(hooks);
            Err(discard_output(opts, e))
        }
    }
}

fn unzip(opts: &FlickOpts) -> Result<(), FlickError> {
    let mut source = BufReader::new(File::open(&opts.input)?);
    let mut hooks = FramedReader::new(BufWriter::new(create_output(opts)?));

    match decompress_file(&mut hooks, &mut source, Limit::UntilEof) {
        Ok(stats) => {
            hooks
                .finish()
                .map_err(|e| discard_output(opts, FlickError::Io(e)))?;
            info!(
                "{} blocks, {} -> {} bytes",
                stats.blocks, stats.bytes_in, stats.bytes_out
            );
            Ok(())
        }
        Err(e) => {
            let e = hooks.io_error.take().map_or(e, FlickError::Io);
            drop(hooks);
            Err(discard_output(opts, e))
        }
    }
}
