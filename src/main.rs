//! convert-audio - Recursive Audio Format Converter

use anyhow::Context;
use clap::Parser;
use std::process;
use convert_audio::audio::{AudioCodec, FfmpegCodec};
use convert_audio::{init_logging, Args, Config, DirectoryConverter};

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.verbose {
        println!("{}", convert_audio::get_library_info());
        println!();
    }

    if let Some(path) = &args.write_default_config {
        Config::create_default_config(path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let check_only = args.check;
    let config = Config::from_args_and_config(args)?;

    if !config.root_dir.is_dir() {
        anyhow::bail!("Root directory does not exist: {}", config.root_dir.display());
    }

    let codec = FfmpegCodec::new(config.codec.clone());
    let converter = DirectoryConverter::new(config, codec)?;

    if check_only {
        return run_check(converter.config(), converter.codec());
    }

    let config = converter.config();

    println!("=== convert-audio ===");
    println!("Root: {}", config.root_dir.display());
    println!("Formats: {} -> {}", config.input_formats.join(", "), config.output_format);
    println!("Policy: {}", config.policy.name());
    if config.dry_run {
        println!("Mode: dry run");
    }
    println!("=====================\n");

    let report = converter
        .run()
        .with_context(|| format!("converting {}", converter.config().root_dir.display()))?;

    println!("\n=== Done: {} ===", report);
    if !report.is_success() {
        for failed in &report.failed {
            println!("  failed: {}", failed.input_path.display());
        }
    }

    Ok(())
}

fn run_check(config: &Config, codec: &FfmpegCodec) -> anyhow::Result<()> {
    println!("=== Check ===");
    println!("✅ Config OK");
    codec
        .validate()
        .with_context(|| format!("{} is not usable", codec.name()))?;
    println!("✅ Codec: {}", config.codec.ffmpeg_path.display());
    println!("✅ Root: {}", config.root_dir.display());
    Ok(())
}
