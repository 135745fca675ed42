use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use ledstrip::{
    Arrangement, ControllerRegistry, CurveList, Dimensions, LayerGrid, LayerHandle,
    OutputController, RecordingController, Rgba8, SetValues, StripConfig, StripContext,
    StripDevice,
};

#[derive(Parser, Debug)]
#[command(name = "ledstrip", version)]
struct Cli {
    /// Log filter (e.g. `info`, `ledstrip=debug`).
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite one cycle and dump the packed bytes.
    Frame(FrameArgs),
    /// Drive output cycles at a fixed interval, then reset the strip.
    Run(RunArgs),
    /// Print the LED index table of every arrangement.
    Arrangements(ArrangementArgs),
}

#[derive(Parser, Debug)]
struct LayerArgs {
    /// Strip configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Layer from an image, `KEY=PATH` (image must match the strip size).
    #[arg(long = "layer", value_parser = parse_layer_path)]
    layers: Vec<(i32, PathBuf)>,

    /// Solid layer, `KEY=R,G,B,A`.
    #[arg(long = "fill", value_parser = parse_layer_fill)]
    fills: Vec<(i32, Rgba8)>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    layers: LayerArgs,

    /// Write raw bytes here instead of printing hex.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    layers: LayerArgs,

    /// Number of cycles.
    #[arg(long, default_value_t = 10)]
    cycles: u32,

    /// Cycle interval in milliseconds.
    #[arg(long, default_value_t = 30)]
    interval_ms: u64,

    /// Animate a dot on top of the other layers from a producer thread.
    #[arg(long)]
    chase: bool,
}

#[derive(Parser, Debug)]
struct ArrangementArgs {
    #[arg(long, default_value_t = 3)]
    width: u32,

    #[arg(long, default_value_t = 2)]
    height: u32,
}

const CHASE_LAYER: i32 = i32::MAX;
const CLI_CONTROLLER: &str = "cli";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&cli.log))
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Run(args) => cmd_run(args),
        Command::Arrangements(args) => cmd_arrangements(args),
    }
}

fn parse_key_value(s: &str) -> Result<(i32, &str), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad layer key '{key}': {e}"))?;
    Ok((key, value))
}

fn parse_layer_path(s: &str) -> Result<(i32, PathBuf), String> {
    let (key, path) = parse_key_value(s)?;
    Ok((key, PathBuf::from(path)))
}

fn parse_layer_fill(s: &str) -> Result<(i32, Rgba8), String> {
    let (key, rgba) = parse_key_value(s)?;
    let channels = rgba
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("bad color '{rgba}': {e}"))?;
    let [r, g, b, a] = channels[..] else {
        return Err(format!("expected R,G,B,A, got '{rgba}'"));
    };
    Ok((key, Rgba8::new(r, g, b, a)))
}

fn read_config(path: &Path) -> anyhow::Result<StripConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    StripConfig::from_json_reader(BufReader::new(f))
        .with_context(|| format!("parse config '{}'", path.display()))
}

/// Build a device from `args`, bound to `controller` and loaded with every layer.
fn prepare_device(
    args: &LayerArgs,
    controller: Arc<Mutex<dyn OutputController>>,
) -> anyhow::Result<StripDevice> {
    let mut config = read_config(&args.config)?;
    config.output_controller_name = CLI_CONTROLLER.to_string();

    let mut controllers = ControllerRegistry::new();
    controllers.insert(CLI_CONTROLLER, controller);
    let mut curves = CurveList::new();

    let mut device = StripDevice::new(config);
    device.init(StripContext {
        controllers: &controllers,
        curves: &mut curves,
    })?;

    for (key, path) in &args.layers {
        let img = image::open(path)
            .with_context(|| format!("open layer image '{}'", path.display()))?
            .to_rgba8();
        device
            .set_layer(*key, LayerGrid::from_image(&img))
            .with_context(|| format!("layer {key} from '{}'", path.display()))?;
    }
    let dims = device.config().dimensions();
    for (key, px) in &args.fills {
        device.set_layer(*key, LayerGrid::filled(dims.width, dims.height, *px))?;
    }
    Ok(device)
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(if i % 3 == 0 { ' ' } else { ':' });
        }
        out.push_str(&format!("{b:02x}"));
    }
    out
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let rec = Arc::new(Mutex::new(RecordingController::new(CLI_CONTROLLER)));
    let mut device = prepare_device(&args.layers, rec.clone())?;
    device.update_outputs()?;

    let rec = rec
        .lock()
        .map_err(|_| anyhow::anyhow!("recording controller poisoned"))?;
    let Some(write) = rec.last_write() else {
        eprintln!("no layers set, nothing written");
        return Ok(());
    };

    match &args.out {
        Some(out) => {
            std::fs::write(out, &write.values)
                .with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {} bytes to {}", write.values.len(), out.display());
        }
        None => println!("@{} {}", write.first_output, hex(&write.values)),
    }
    Ok(())
}

/// Prints every write as one hex line on stdout.
struct HexDumpController {
    cycle: u64,
}

impl SetValues for HexDumpController {
    fn set_values(&mut self, first_output: usize, values: &[u8]) -> ledstrip::LedStripResult<()> {
        self.cycle += 1;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "#{:<4} @{first_output} {}", self.cycle, hex(values))
            .map_err(|e| ledstrip::LedStripError::output(e.to_string()))
    }
}

impl OutputController for HexDumpController {
    fn name(&self) -> &str {
        CLI_CONTROLLER
    }

    fn raw_values(&mut self) -> Option<&mut dyn SetValues> {
        Some(self)
    }
}

fn spawn_chase(
    handle: LayerHandle,
    dims: Dimensions,
    interval: Duration,
    steps: u32,
) -> std::thread::JoinHandle<ledstrip::LedStripResult<()>> {
    std::thread::spawn(move || {
        let leds = dims.number_of_leds().max(1);
        for step in 0..steps as usize {
            let pos = step % leds;
            let grid = LayerGrid::from_fn(dims.width, dims.height, |x, y| {
                if (y as usize) * (dims.width as usize) + (x as usize) == pos {
                    Rgba8::opaque(255, 255, 255)
                } else {
                    Rgba8::TRANSPARENT
                }
            });
            handle.set_layer(CHASE_LAYER, grid)?;
            std::thread::sleep(interval);
        }
        Ok(())
    })
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let controller = Arc::new(Mutex::new(HexDumpController { cycle: 0 }));
    let mut device = prepare_device(&args.layers, controller)?;
    let interval = Duration::from_millis(args.interval_ms);

    let chase = args.chase.then(|| {
        spawn_chase(
            device.layer_handle(),
            device.config().dimensions(),
            interval,
            args.cycles,
        )
    });

    let started = Instant::now();
    let mut next = started;
    for _ in 0..args.cycles {
        device.update_outputs()?;
        next += interval;
        if let Some(wait) = next.checked_duration_since(Instant::now()) {
            std::thread::sleep(wait);
        }
    }

    if let Some(chase) = chase {
        chase
            .join()
            .map_err(|_| anyhow::anyhow!("chase thread panicked"))??;
    }
    device.reset()?;
    eprintln!(
        "{} cycles in {:.1} ms",
        args.cycles,
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn cmd_arrangements(args: ArrangementArgs) -> anyhow::Result<()> {
    let dims = Dimensions::new(args.width, args.height);
    for arrangement in Arrangement::ALL {
        println!("{arrangement}:");
        for y in 0..dims.height {
            let row: Vec<String> = (0..dims.width)
                .map(|x| format!("{:>3}", arrangement.led_index(x, y, dims)))
                .collect();
            println!("  {}", row.join(" "));
        }
    }
    Ok(())
}
