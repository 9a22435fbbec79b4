use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use regpack::ym::{NUM_STREAMS, REGISTER_NAMES, STREAM_NAMES};
use regpack::{
    channel_window_candidates, tune_channel_windows, tune_window_two_pass, unpack_file,
    PackConfig, PackStats, Packer, ParallelPacker, ParseStrategy, RegisterLog,
    SingleThreadedPacker, DEFAULT_WINDOW,
};

#[derive(Parser, Debug)]
#[command(name = "regpack")]
#[command(about = "Pack sound-chip register logs into per-register LZ77 streams")]
#[command(version)]
struct Cli {
    /// Show verbose statistics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack a YM3/YM5/YM6 register log
    Pack(PackArgs),
    /// Unpack a packed file into a YM3 register log
    Unpack(IoArgs),
    /// Search for the window size with the smallest playback footprint
    Tune(TuneArgs),
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input file (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (use - for stdout)
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct PackArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Match window in bytes
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    window: usize,

    /// Per-channel windows, comma separated, overriding --window by channel index
    #[arg(long, value_delimiter = ',')]
    channel_windows: Vec<usize>,

    /// Match selection strategy
    #[arg(long, value_enum, default_value = "lazy")]
    strategy: Strategy,

    /// Number of threads (0 = auto, 1 = single-threaded)
    #[arg(short = 't', long, default_value = "0")]
    threads: usize,

    /// Decode every channel after packing and compare with the input
    #[arg(long)]
    verify: bool,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Pack all 14 registers instead of folding the mixer into the volume streams
    #[arg(long)]
    no_mixer_fold: bool,
}

#[derive(Args, Debug)]
struct TuneArgs {
    /// Input register log (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Also write the file packed with the winning window
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Match selection strategy
    #[arg(long, value_enum, default_value = "lazy")]
    strategy: Strategy,

    /// Number of threads (0 = auto, 1 = single-threaded)
    #[arg(short = 't', long, default_value = "0")]
    threads: usize,

    /// Pick a separate window for every channel (8..1024 step 16)
    #[arg(long)]
    per_channel: bool,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Greedy,
    Lazy,
    LazyCheapest,
}

impl From<Strategy> for ParseStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Greedy => ParseStrategy::Greedy,
            Strategy::Lazy => ParseStrategy::Lazy,
            Strategy::LazyCheapest => ParseStrategy::LazyCheapest,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Pack(args) => run_pack(args, cli.verbose),
        Command::Unpack(args) => run_unpack(args, cli.verbose),
        Command::Tune(args) => run_tune(args, cli.verbose),
    }
}

fn run_pack(args: PackArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log = load_log(&args.io.input, verbose)?;
    let channels = pack_channels(&log, &args.layout)?;

    let config = PackConfig {
        window: args.window,
        channel_windows: args.channel_windows,
        strategy: args.strategy.into(),
        num_threads: args.threads,
        verify: args.verify,
    };

    let start = Instant::now();
    let stats = pack(&channels, config, open_output(&args.io.output)?)?;
    let elapsed = start.elapsed();

    if verbose {
        report_pack(&stats, elapsed);
    }
    Ok(())
}

fn run_unpack(args: IoArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = read_input(&args.input)?;

    let start = Instant::now();
    let log = RegisterLog::from_unpacked(unpack_file(&data)?)?;
    let ym3 = log.to_ym3();
    let elapsed = start.elapsed();

    let mut output = open_output(&args.output)?;
    output.write_all(&ym3)?;
    output.flush()?;

    if verbose {
        eprintln!("Unpack complete:");
        eprintln!("  Input bytes:      {}", data.len());
        eprintln!("  Output bytes:     {}", ym3.len());
        eprintln!("  Frames:           {}", log.frame_count());
        eprintln!("  Time:             {:.2?}", elapsed);
    }
    Ok(())
}

fn run_tune(args: TuneArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log = load_log(&args.input, verbose)?;
    let channels = pack_channels(&log, &args.layout)?;

    let mut config = PackConfig {
        strategy: args.strategy.into(),
        num_threads: args.threads,
        ..Default::default()
    };

    // The result line goes to stderr when the packed file goes to stdout
    let to_stdout = args.output.as_ref().is_some_and(|p| p.to_str() == Some("-"));
    let emit = |line: String| {
        if to_stdout {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    };

    let start = Instant::now();
    if args.per_channel {
        let results = tune_channel_windows(&channels, &config, channel_window_candidates())?;
        let elapsed = start.elapsed();

        config.channel_windows = results.iter().map(|r| r.window).collect();
        let windows: Vec<String> = config.channel_windows.iter().map(|w| w.to_string()).collect();
        emit(windows.join(","));

        if verbose {
            eprintln!("Tuning complete:");
            for (index, result) in results.iter().enumerate() {
                eprintln!(
                    "  {:>2} {:<16} window {:>4}  {:>6} bytes",
                    index,
                    channel_name(index, results.len()),
                    result.window,
                    result.packed_size
                );
            }
            eprintln!("  Window memory:    {}", config.channel_windows.iter().sum::<usize>());
            eprintln!("  Time:             {:.2?}", elapsed);
        }
    } else {
        let best = tune_window_two_pass(&channels, &config)?
            .ok_or("window search evaluated no candidates")?;
        let elapsed = start.elapsed();

        config.window = best.window;
        emit(best.window.to_string());

        if verbose {
            eprintln!("Tuning complete:");
            eprintln!("  Best window:      {}", best.window);
            eprintln!("  Packed bytes:     {}", best.packed_size);
            eprintln!("  Score:            {}", best.score);
            eprintln!("  Windows tried:    {}", best.evaluated);
            eprintln!("  Time:             {:.2?}", elapsed);
        }
    }

    if let Some(path) = &args.output {
        let stats = pack(&channels, config, open_output(path)?)?;
        if verbose {
            eprintln!("  Output bytes:     {}", stats.output_bytes);
        }
    }
    Ok(())
}

fn load_log(path: &Path, verbose: bool) -> Result<RegisterLog, Box<dyn std::error::Error>> {
    let log = RegisterLog::parse(&read_input(path)?)?;

    if verbose {
        eprintln!("Loaded {} log: {} frames", log.format.name(), log.frame_count());
        if let Some(info) = &log.info {
            eprintln!("  Song:             {}", info.name);
            eprintln!("  Author:           {}", info.author);
        }
        if log.header.as_ref().is_some_and(|h| h.has_digidrums()) {
            eprintln!("Warning: digidrum samples are not carried into the packed file");
        }
    }
    Ok(log)
}

/// Channels to pack: 13 mixer-folded streams, or the 14 raw registers
fn pack_channels(
    log: &RegisterLog,
    layout: &LayoutArgs,
) -> Result<Vec<Vec<u8>>, Box<dyn std::error::Error>> {
    if layout.no_mixer_fold {
        return Ok(log.channels().to_vec());
    }
    log.folded_streams()
        .map_err(|e| format!("{} (use --no-mixer-fold to pack raw registers)", e).into())
}

fn pack<W: Write>(
    channels: &[Vec<u8>],
    config: PackConfig,
    output: W,
) -> Result<PackStats, Box<dyn std::error::Error>> {
    let stats = if config.num_threads == 1 {
        SingleThreadedPacker::new(config).pack(channels, output)?
    } else {
        ParallelPacker::new(config).pack(channels, output)?
    };
    Ok(stats)
}

fn channel_name(index: usize, channel_count: usize) -> &'static str {
    let names: &[&'static str] =
        if channel_count == NUM_STREAMS { &STREAM_NAMES } else { &REGISTER_NAMES };
    names.get(index).copied().unwrap_or("?")
}

fn report_pack(stats: &PackStats, elapsed: std::time::Duration) {
    eprintln!("Packing complete:");
    for channel in &stats.channels {
        let name = channel_name(channel.index, stats.channels.len());
        eprintln!(
            "  {:>2} {:<16} {:>7} -> {:>7}  ({:.1}% matched)",
            channel.index,
            name,
            channel.input_bytes,
            channel.packed_bytes,
            channel.parse.match_percent()
        );
    }
    eprintln!("  Input bytes:      {}", stats.input_bytes);
    eprintln!("  Output bytes:     {}", stats.output_bytes);
    eprintln!("  Ratio:            {:.1}%", stats.ratio_percent());
    eprintln!("  Match bytes:      {}", stats.parse.match_bytes);
    eprintln!("  Literal bytes:    {}", stats.parse.literal_bytes);
    eprintln!("  Matches:          {}", stats.parse.matches);
    eprintln!("  Overrides:        {}", stats.parse.literals_over_match);
    eprintln!("  Deferred matches: {}", stats.parse.deferred);
    if stats.verified {
        eprintln!("  Verified:         yes");
    }
    eprintln!("  Time:             {:.2?}", elapsed);
    eprintln!(
        "  Throughput:       {:.1} MB/s",
        stats.input_bytes as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );
}

fn read_input(path: &Path) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    if path.to_str() == Some("-") {
        io::stdin().lock().read_to_end(&mut data)?;
    } else {
        File::open(path)?.read_to_end(&mut data)?;
    }
    Ok(data)
}

fn open_output(path: &Path) -> io::Result<Box<dyn Write>> {
    Ok(if path.to_str() == Some("-") {
        Box::new(io::stdout().lock())
    } else {
        Box::new(BufWriter::new(File::create(path)?))
    })
}
