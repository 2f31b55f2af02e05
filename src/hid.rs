use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver};
use thiserror::Error;
use tracing::{info, warn};
use uinput::device::Device;
use uinput::event::controller;
use uinput::event::relative;

use crate::dispatcher::ActionRequest;
use crate::types::ScrollDirection;

/// Duración de la pulsación en un click
const CLICK_HOLD: Duration = Duration::from_millis(10);

#[derive(Error, Debug)]
pub enum InjectorError {
    #[error("uinput: {0}")]
    Device(#[from] uinput::Error),

    #[error("no se pudo abrir el inyector: {0}")]
    Open(String),
}

/// Frontera hacia el sistema operativo: recibe peticiones ya decididas
pub trait InputInjector {
    /// Desplazamiento relativo en píxeles
    fn move_cursor(&mut self, dx: i32, dy: i32) -> Result<(), InjectorError>;

    fn click(&mut self) -> Result<(), InjectorError>;

    /// Ticks de rueda con signo (positivo = arriba)
    fn scroll(&mut self, ticks: i32) -> Result<(), InjectorError>;

    /// Enruta una petición. Las que no hacen nada no llegan al dispositivo.
    fn apply(&mut self, request: &ActionRequest) -> Result<(), InjectorError> {
        if request.is_noop() {
            return Ok(());
        }

        match *request {
            ActionRequest::MoveCursor { dx, dy } => self.move_cursor(dx, dy),
            ActionRequest::Click => self.click(),
            ActionRequest::Scroll { direction, ticks } => {
                self.scroll(direction.sign() * ticks as i32)
            }
            ActionRequest::NoAction => Ok(()),
        }
    }
}

/// Ratón virtual en /dev/uinput
pub struct HidOutput {
    dev: Device,
}

impl HidOutput {
    pub fn new() -> Result<Self, InjectorError> {
        let dev = uinput::default()?
            .name("aerotouch-hid")?
            .event(uinput::event::Controller::Mouse(controller::Mouse::Left))?
            .event(uinput::event::Relative::Position(relative::Position::X))?
            .event(uinput::event::Relative::Position(relative::Position::Y))?
            .event(uinput::event::Relative::Wheel(relative::Wheel::Vertical))?
            .create()?;

        Ok(HidOutput { dev })
    }

    fn sync(&mut self) -> Result<(), InjectorError> {
        Ok(self.dev.synchronize()?)
    }
}

impl InputInjector for HidOutput {
    fn move_cursor(&mut self, dx: i32, dy: i32) -> Result<(), InjectorError> {
        self.dev.send(relative::Position::X, dx)?;
        self.dev.send(relative::Position::Y, dy)?;
        self.sync()
    }

    /// Click izquierdo simple (press + release)
    fn click(&mut self) -> Result<(), InjectorError> {
        self.dev
            .press(&controller::Controller::Mouse(controller::Mouse::Left))?;
        self.sync()?;
        thread::sleep(CLICK_HOLD);
        self.dev
            .release(&controller::Controller::Mouse(controller::Mouse::Left))?;
        self.sync()
    }

    fn scroll(&mut self, ticks: i32) -> Result<(), InjectorError> {
        self.dev.send(relative::Wheel::Vertical, ticks)?;
        self.sync()
    }
}

/// Inyector sin dispositivo: sólo registra en el log (modo `--dry-run`).
/// Con `recording()` además guarda cada petición (tests y replay).
#[derive(Debug, Default)]
pub struct LogInjector {
    emitted: u64,
    recorded: Option<Vec<ActionRequest>>,
}

impl LogInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recording() -> Self {
        Self {
            emitted: 0,
            recorded: Some(Vec::new()),
        }
    }

    /// Peticiones aplicadas desde el inicio
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Peticiones guardadas; vacío si no se creó con `recording()`
    pub fn requests(&self) -> &[ActionRequest] {
        self.recorded.as_deref().unwrap_or(&[])
    }

    fn push(&mut self, request: ActionRequest) {
        self.emitted += 1;
        if let Some(recorded) = self.recorded.as_mut() {
            recorded.push(request);
        }
    }
}

impl InputInjector for LogInjector {
    fn move_cursor(&mut self, dx: i32, dy: i32) -> Result<(), InjectorError> {
        info!(dx, dy, "cursor");
        self.push(ActionRequest::MoveCursor { dx, dy });
        Ok(())
    }

    fn click(&mut self) -> Result<(), InjectorError> {
        info!("click");
        self.push(ActionRequest::Click);
        Ok(())
    }

    fn scroll(&mut self, ticks: i32) -> Result<(), InjectorError> {
        let direction = if ticks >= 0 {
            ScrollDirection::Up
        } else {
            ScrollDirection::Down
        };
        info!(ticks, direction = direction.as_str(), "scroll");
        self.push(ActionRequest::Scroll {
            direction,
            ticks: ticks.unsigned_abs(),
        });
        Ok(())
    }
}

/// Lanza el hilo HID. El inyector se abre dentro del hilo y el resultado de la
/// apertura vuelve al llamador antes de seguir: si falla, no queda hilo vivo.
pub fn spawn_injector<F>(
    open: F,
    rx: Receiver<ActionRequest>,
) -> Result<JoinHandle<()>, InjectorError>
where
    F: FnOnce() -> Result<Box<dyn InputInjector>, InjectorError> + Send + 'static,
{
    let (tx_ready, rx_ready) = bounded::<Result<(), String>>(1);

    let handle = thread::spawn(move || {
        let mut injector = match open() {
            Ok(injector) => {
                let _ = tx_ready.send(Ok(()));
                injector
            }
            Err(e) => {
                let _ = tx_ready.send(Err(e.to_string()));
                return;
            }
        };

        for request in rx.iter() {
            if let Err(e) = injector.apply(&request) {
                warn!("Error enviando {:?}: {}", request, e);
            }
        }
    });

    match rx_ready.recv() {
        Ok(Ok(())) => Ok(handle),
        Ok(Err(reason)) => {
            let _ = handle.join();
            Err(InjectorError::Open(reason))
        }
        Err(_) => Err(InjectorError::Open("el hilo HID terminó al arrancar".into())),
    }
}
