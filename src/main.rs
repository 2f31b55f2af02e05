/*
AeroTouch - control del ratón con gestos de la mano

Sistema que:
1. Recibe landmarks de mano (formato MediaPipe) por stdin, una línea JSON por frame
2. Clasifica el gesto de cada frame con reglas geométricas
3. Aplica cooldowns y anclaje de cursor en el motor de debounce
4. Emite movimiento, clicks y scroll por un ratón virtual en /dev/uinput

Uso típico (el detector de mano escribe JSON en stdout):
     hand_tracker | ./target/release/aerotouch --screen 2560x1440

Sin permisos sobre /dev/uinput:
     hand_tracker | ./target/release/aerotouch --dry-run -v
*/

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossbeam_channel::{bounded, unbounded};
use tracing::{info, warn};

use aerotouch::clock::SystemClock;
use aerotouch::config::{Config, ScreenConfig};
use aerotouch::controller::GestureController;
use aerotouch::dispatcher::ActionRequest;
use aerotouch::hid::{spawn_injector, HidOutput, InjectorError, InputInjector, LogInjector};
use aerotouch::pose_stream::{spawn_stdin_reader, PoseFrame};

/// Frames en vuelo entre el lector y el bucle principal
const POSE_QUEUE: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "aerotouch", version, about = "Hand gesture mouse control")]
struct Args {
    /// Fichero TOML de configuración
    #[arg(short, long, env = "AEROTOUCH_CONFIG")]
    config: Option<PathBuf>,

    /// Geometría de pantalla, ANCHOxALTO (sobrescribe la del fichero)
    #[arg(long, value_name = "WxH")]
    screen: Option<ScreenConfig>,

    /// Registrar las acciones en vez de crear el dispositivo uinput
    #[arg(long)]
    dry_run: bool,

    /// Logs de depuración (transiciones de gesto y acciones)
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("No se pudo cargar la configuración {:?}", path))?,
        None => Config::default(),
    };

    if let Some(screen) = args.screen {
        config.screen = screen;
        config.validate().context("Geometría de pantalla inválida")?;
    }

    Ok(config)
}

fn open_injector(dry_run: bool) -> Result<Box<dyn InputInjector>, InjectorError> {
    if dry_run {
        info!("Modo dry-run: las acciones sólo se registran");
        return Ok(Box::new(LogInjector::new()));
    }

    let hid = HidOutput::new()?;
    println!("✅ HID inicializado (/dev/uinput)");
    Ok(Box::new(hid))
}

fn print_legend() {
    println!("Gestos:");
    println!("  garra abierta   → mover cursor");
    println!("  garra cerrada   → click");
    println!("  puño            → click");
    println!("  pulgar / índice ↑ → scroll arriba");
    println!("  pulgar / índice ↓ → scroll abajo");
    println!("  palma + barrido → scroll de página\n");
}

fn main() -> Result<()> {
    let args = Args::parse();
    aerotouch::init_logging(args.verbose);

    println!("🎯 AeroTouch - Hand Gesture Mouse Control\n");

    let config = load_config(&args)?;
    info!(
        width = config.screen.width,
        height = config.screen.height,
        sensitivity = config.cursor.sensitivity,
        swipe = config.swipe.enabled,
        "Configuración cargada"
    );
    print_legend();

    // Canal y hilo HID: sin dispositivo no tiene sentido leer poses
    let (tx_action, rx_action) = unbounded::<ActionRequest>();
    let dry_run = args.dry_run;
    let hid_thread = spawn_injector(move || open_injector(dry_run), rx_action)
        .map_err(|e| anyhow!("❌ No se pudo inicializar HID: {}", e))?;

    // Canal y hilo lector de poses
    let (tx_pose, rx_pose) = bounded::<PoseFrame>(POSE_QUEUE);
    let reader = spawn_stdin_reader(tx_pose);

    let mut controller = GestureController::new(&config, SystemClock::new());
    println!("🎬 Esperando poses en stdin...\n");

    let mut hid_alive = true;
    for frame in rx_pose.iter() {
        let report = match &frame {
            PoseFrame::Hand(pose) => controller.process(Some(pose)),
            PoseFrame::NoHand => controller.process(None),
            PoseFrame::Rejected(e) => {
                warn!("Muestra descartada: {}", e);
                controller.reject()
            }
        };

        if hid_alive && !report.request.is_noop() && tx_action.send(report.request).is_err() {
            warn!("El hilo HID terminó; las acciones ya no se emiten");
            hid_alive = false;
        }
    }

    drop(tx_action);
    if reader.join().is_err() {
        warn!("El hilo lector terminó con pánico");
    }
    if hid_thread.join().is_err() {
        warn!("El hilo HID terminó con pánico");
    }

    let stats = controller.stats();
    info!(%stats, "Sesión terminada");
    println!("\n👋 Fin de la sesión: {}", stats);

    Ok(())
}
