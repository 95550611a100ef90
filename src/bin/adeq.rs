use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "adeq", version)]
struct Cli {
    /// Client config JSON (defaults apply to missing keys).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Transform server base URL (overrides the config).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload an image, apply the transform and write the result as PNG.
    Process(ProcessArgs),
    /// Print the dense gain curve and request payload for a set of control points.
    Curve(CurveArgs),
    /// Resolve the background music source for a theme.
    Audio(AudioArgs),
}

#[derive(Args, Debug)]
struct CurveSource {
    /// Control-point gains, comma separated (e.g. `1,2.5,0.333`).
    #[arg(long, conflicts_with = "n_controls")]
    gains: Option<String>,

    /// Flat curve with this many control points.
    #[arg(long)]
    n_controls: Option<usize>,
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Enable equalization.
    #[arg(long)]
    eq: bool,

    /// Equalization alpha (0..3).
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,

    /// Equalization gamma (0.5..3).
    #[arg(long, default_value_t = 1.2)]
    gamma: f64,

    /// Band sign: `dog` / `literal` or their UI labels.
    #[arg(long, default_value = "dog")]
    band_sign: String,

    /// Let the server shift the mean brightness.
    #[arg(long)]
    no_preserve_mean: bool,

    /// Enable band modulation.
    #[arg(long = "mod")]
    modulation: bool,

    #[command(flatten)]
    curve: CurveSource,

    /// Print the parameters the server applied.
    #[arg(long)]
    overlay: bool,
}

#[derive(Parser, Debug)]
struct CurveArgs {
    #[command(flatten)]
    curve: CurveSource,

    /// Number of processing bands (0 = same as control count).
    #[arg(long, default_value_t = 0)]
    bands: usize,

    /// Kernel sizes per band, comma separated, for axis labels.
    #[arg(long)]
    kernels: Option<String>,

    /// Emit the chart projection as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct AudioArgs {
    /// Theme whose music to resolve (`light`, `bright` or `dark`).
    #[arg(long, default_value = "light")]
    theme: String,

    /// Probe timeout in seconds.
    #[arg(long, default_value_t = 10)]
    probe_timeout: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => adeq::ClientConfig::from_path(path)?,
        None => adeq::ClientConfig::default(),
    };
    if let Some(server) = &cli.server {
        config.server = server.clone();
        config.validate()?;
    }

    match cli.cmd {
        Command::Process(args) => cmd_process(&config, args),
        Command::Curve(args) => cmd_curve(&config, args),
        Command::Audio(args) => cmd_audio(&config, args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn build_curve(
    config: &adeq::ClientConfig,
    src: &CurveSource,
) -> anyhow::Result<adeq::CurveController> {
    if let Some(csv) = &src.gains {
        let curve = adeq::CurveController::parse_csv(csv)?;
        if curve.len() < config.min_controls {
            anyhow::bail!(
                "{} gains given, at least {} required",
                curve.len(),
                config.min_controls
            );
        }
        return Ok(curve);
    }
    let mut curve = config.new_curve()?;
    if let Some(n) = src.n_controls {
        curve.resize(n);
    }
    Ok(curve)
}

fn parse_kernels(csv: &str) -> anyhow::Result<Vec<u32>> {
    csv.split(',')
        .map(|s| {
            s.trim()
                .parse::<u32>()
                .with_context(|| format!("bad kernel size '{}'", s.trim()))
        })
        .collect()
}

fn print_curve(curve: &adeq::CurveController, n_bands: usize, kernels: &[u32]) {
    let chart = adeq::CurveChart::project(curve, n_bands, kernels);
    for (p, tick) in chart.interpolated.iter().zip(&chart.ticks) {
        println!("{:>3} {:>7} {:.3}", p.x, tick, p.y);
    }
    for (i, g) in curve.gains().iter().enumerate() {
        eprintln!("{}", adeq::knob_label(i, *g));
    }
}

fn cmd_curve(config: &adeq::ClientConfig, args: CurveArgs) -> anyhow::Result<()> {
    let curve = build_curve(config, &args.curve)?;
    let kernels = match &args.kernels {
        Some(csv) => parse_kernels(csv)?,
        None => Vec::new(),
    };
    // Kernel sizes imply the band count when none is given.
    let n_bands = if args.bands == 0 {
        kernels.len()
    } else {
        args.bands
    };

    if args.json {
        let chart = adeq::CurveChart::project(&curve, n_bands, &kernels);
        println!("{}", serde_json::to_string_pretty(&chart)?);
    } else {
        print_curve(&curve, n_bands, &kernels);
    }

    let payload = curve.serialize();
    println!("n_controls={}", payload.n_controls);
    println!("gains_csv={}", payload.gains_csv);
    Ok(())
}

fn cmd_process(config: &adeq::ClientConfig, args: ProcessArgs) -> anyhow::Result<()> {
    let image = adeq::ImageUpload::from_path(&args.in_path)?;
    let mut request = adeq::TransformRequest::new(image);
    request.equalize.preserve_mean = !args.no_preserve_mean;
    if args.eq {
        request = request.with_equalize(adeq::EqualizeParams {
            alpha: args.alpha,
            gamma: args.gamma,
            band_sign: args.band_sign.parse()?,
            preserve_mean: !args.no_preserve_mean,
        });
    }
    if !args.modulation && (args.curve.gains.is_some() || args.curve.n_controls.is_some()) {
        anyhow::bail!("--gains / --n-controls only apply with --mod");
    }
    let curve = if args.modulation {
        let curve = build_curve(config, &args.curve)?;
        request = request.with_modulation(&curve);
        Some(curve)
    } else {
        None
    };
    if !request.can_process() {
        anyhow::bail!("nothing to do: pass --eq and/or --mod");
    }

    let client = adeq::TransformClient::new(config)?;
    eprintln!("processing via {}", client.endpoint());
    let response = client.process(&request)?;

    let png = response.decode_output()?;
    let decoded = image::load_from_memory(&png).context("decode output image")?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    decoded
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    if let Some(curve) = &curve {
        print_curve(curve, response.effective_n_bands(), &response.kernels);
    }
    if args.overlay {
        println!("{}", response.overlay_text());
    }

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        decoded.width(),
        decoded.height()
    );
    Ok(())
}

fn cmd_audio(config: &adeq::ClientConfig, args: AudioArgs) -> anyhow::Result<()> {
    let theme: adeq::Theme = args.theme.parse()?;
    let probe = adeq::HttpProbe::new(Duration::from_secs(args.probe_timeout))?;
    let mut driver =
        adeq::AudioDriver::from_config(config, theme, probe, adeq::SilentOutput::default())?;

    match driver.enable() {
        Ok(()) => {
            let url = driver.output().current().unwrap_or_default();
            println!("{theme}: {url}");
            Ok(())
        }
        Err(err) if err.is_degraded() => {
            eprintln!("{}", driver.notice().text);
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
