use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use aerotouch::clock::ManualClock;
use aerotouch::config::{Config, ScreenConfig};
use aerotouch::controller::GestureController;
use aerotouch::csv_loader::load_session_from_csv;
use aerotouch::hid::{InputInjector, LogInjector};

/// Reproduce una sesión grabada con sus propias marcas de tiempo
#[derive(Parser, Debug)]
#[command(name = "replay_csv", version)]
struct Args {
    /// CSV con columnas frame,timestamp_ms,landmark,x,y
    csv: PathBuf,

    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_name = "WxH")]
    screen: Option<ScreenConfig>,

    /// Mostrar todos los frames, no sólo los que producen acción
    #[arg(long)]
    all_frames: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    aerotouch::init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("No se pudo cargar la configuración {:?}", path))?,
        None => Config::default(),
    };
    if let Some(screen) = args.screen {
        config.screen = screen;
        config.validate().context("Geometría de pantalla inválida")?;
    }

    println!("🎞️  Reproduciendo sesión desde {:?}", args.csv);
    let frames = load_session_from_csv(&args.csv)?;
    println!("ℹ️  {} frames cargados\n", frames.len());

    let mut controller = GestureController::new(&config, ManualClock::new());
    let mut injector = LogInjector::new();

    println!("{:>6} {:>9}  {:<12} {:<7} acción", "frame", "t (ms)", "gesto", "modo");
    for frame in &frames {
        controller.clock().set(frame.timestamp);

        let report = match frame.pose() {
            Ok(pose) => controller.process(pose.as_ref()),
            Err(e) => {
                warn!("Frame {} descartado: {}", frame.index, e);
                controller.reject()
            }
        };

        if args.all_frames || !report.request.is_noop() {
            println!(
                "{:>6} {:>9}  {:<12} {:<7} {:?}",
                frame.index,
                frame.timestamp.as_millis(),
                report.variant.as_str(),
                report.mode.as_str(),
                report.request
            );
        }

        if let Err(e) = injector.apply(&report.request) {
            warn!("Error aplicando {:?}: {}", report.request, e);
        }
    }

    let (x, y) = controller.pointer_position();
    println!("\n📊 {}", controller.stats());
    println!("🖱️  Posición final estimada: ({:.0}, {:.0})", x, y);
    println!("📨 Peticiones emitidas: {}", injector.emitted());

    Ok(())
}
