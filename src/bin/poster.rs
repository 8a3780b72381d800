use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use palette_poster_wasm::{FixedPalette, Palette, Session};
use palette_poster_wasm::layout::TOTAL_COLORS;
use anyhow::{Context, Result, bail};

/// Turn images into palette posters (native wrapper around the WASM library).
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of colors to extract (1-9)
    #[arg(short = 'k', long, default_value_t = TOTAL_COLORS)]
    n_colors: usize,

    /// Comma-separated list of hex colors to use as palette (skip extraction)
    #[arg(short = 'c', long)]
    palette: Option<String>,

    /// Output directory
    #[arg(short = 'd', long, default_value = ".")]
    out_dir: PathBuf,

    /// Print one JSON object per input instead of plain text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let fixed: Option<Palette> = match &args.palette {
        Some(list) => {
            let parts: Vec<&str> = list.split(',').map(str::trim).collect();
            Some(Palette::from_hex(&parts).context("invalid --palette")?)
        }
        None => None,
    };

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("cannot create {}", args.out_dir.display()))?;

    for input in &args.inputs {
        let session = match &fixed {
            Some(p) => Session::with_extractor(Box::new(FixedPalette(p.clone()))),
            None => Session::new(),
        };
        process(session.max_colors(args.n_colors), input, &args)
            .with_context(|| format!("failed on {}", input.display()))?;
    }

    Ok(())
}

fn process(mut session: Session, input: &Path, args: &Args) -> Result<()> {
    let Some(mime) = mime_guess::from_path(input).first() else {
        bail!("cannot tell the file type of {}", input.display());
    };
    let bytes = fs::read(input)?;

    session.upload(&bytes, mime.essence_str())?;
    let analysis = session.analyze()?;
    let export = session.download()?;

    let mut out_path = args.out_dir.join(&export.filename);
    if out_path.exists() {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        out_path = args.out_dir.join(format!("{stem}-{}", export.filename));
    }
    fs::write(&out_path, &export.bytes)?;

    if args.json {
        let report = serde_json::json!({
            "input": input.display().to_string(),
            "output": out_path.display().to_string(),
            "palette": analysis.palette.to_hex(),
            "dark": analysis.is_dark,
        });
        println!("{report}");
    } else {
        println!(
            "Saved → {} [{}]",
            out_path.display(),
            analysis.palette.to_hex().join(" ")
        );
    }
    Ok(())
}
