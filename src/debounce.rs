//! Motor de debounce temporal: convierte "gesto presente en este frame" en
//! "acción a emitir", limitada por cooldowns de reloj de pared.
//!
//! Avanza exactamente una vez por frame. Toda la memoria entre frames vive aquí:
//! cooldowns por tipo de acción, ancla del cursor relativo e historial de swipe.

use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::feature_extractor::FeatureSet;
use crate::gesture_buffer::SwipeHistory;
use crate::gesture_classifier::{ActionKind, GestureVariant};
use crate::types::{Point, ScrollDirection};

/// Intención producida por el motor para un frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionEvent {
    /// Desplazamiento de cursor en píxeles (sin recortar a pantalla)
    CursorDelta { dx: f32, dy: f32 },
    Click,
    Scroll(ScrollDirection),
    Swipe(ScrollDirection),
}

/// Estado de la máquina por familia de gesto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Idle,
    Cursor,
    Click,
    Scroll,
}

impl EngineMode {
    fn from_variant(variant: GestureVariant) -> Self {
        match variant.action_kind() {
            None => EngineMode::Idle,
            Some(ActionKind::Cursor) => EngineMode::Cursor,
            Some(ActionKind::Click) => EngineMode::Click,
            Some(ActionKind::Scroll) | Some(ActionKind::Swipe) => EngineMode::Scroll,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineMode::Idle => "IDLE",
            EngineMode::Cursor => "CURSOR",
            EngineMode::Click => "CLICK",
            EngineMode::Scroll => "SCROLL",
        }
    }
}

/// Resultado de un paso del motor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    /// Gesto activo en el frame (un swipe disparado sustituye al clasificado)
    pub variant: GestureVariant,
    pub event: Option<ActionEvent>,
}

/// Última emisión de un tipo de acción y su intervalo de rearme
#[derive(Debug, Clone, Copy)]
pub struct CooldownTracker {
    last_fired: Option<Duration>,
    cooldown: Duration,
}

impl CooldownTracker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_fired: None,
            cooldown,
        }
    }

    /// Dispara sólo si `now - last > cooldown` (estricto)
    pub fn is_ready(&self, now: Duration) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.saturating_sub(last) > self.cooldown,
        }
    }

    /// Si está listo, registra el disparo y devuelve `true`
    pub fn try_fire(&mut self, now: Duration) -> bool {
        if self.is_ready(now) {
            self.last_fired = Some(now);
            true
        } else {
            false
        }
    }

    pub fn last_fired(&self) -> Option<Duration> {
        self.last_fired
    }
}

/// Ancla para movimiento relativo del cursor.
/// Sin ancla = desarmado: el siguiente frame de cursor sólo ancla y no mueve.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorAnchor {
    anchor: Option<Point>,
}

impl CursorAnchor {
    /// Devuelve el delta normalizado respecto al ancla y mueve el ancla al punto actual.
    /// En el primer frame (desarmado) sólo ancla y devuelve `None`.
    pub fn track(&mut self, current: Point) -> Option<(f32, f32)> {
        let delta = self
            .anchor
            .map(|anchor| (current.x - anchor.x, current.y - anchor.y));
        self.anchor = Some(current);
        delta
    }

    pub fn disarm(&mut self) {
        self.anchor = None;
    }

    pub fn is_armed(&self) -> bool {
        self.anchor.is_some()
    }
}

pub struct DebounceEngine {
    click: CooldownTracker,
    scroll: CooldownTracker,
    swipe: CooldownTracker,
    anchor: CursorAnchor,
    history: SwipeHistory,
    swipe_enabled: bool,
    swipe_min_samples: usize,
    swipe_min_displacement: f32,
    /// Pantalla × sensibilidad, por eje
    cursor_scale: (f32, f32),
    mode: EngineMode,
}

impl DebounceEngine {
    pub fn new(config: &Config) -> Self {
        let sensitivity = config.cursor.sensitivity;
        Self {
            click: CooldownTracker::new(config.cooldowns.click()),
            scroll: CooldownTracker::new(config.cooldowns.scroll()),
            swipe: CooldownTracker::new(config.cooldowns.swipe()),
            anchor: CursorAnchor::default(),
            history: SwipeHistory::new(config.swipe.capacity, config.swipe.max_age()),
            swipe_enabled: config.swipe.enabled,
            swipe_min_samples: config.swipe.min_samples,
            swipe_min_displacement: config.swipe.min_displacement,
            cursor_scale: (
                config.screen.width as f32 * sensitivity,
                config.screen.height as f32 * sensitivity,
            ),
            mode: EngineMode::Idle,
        }
    }

    /// Paso para un frame con mano detectada
    pub fn step(
        &mut self,
        features: &FeatureSet,
        classified: GestureVariant,
        now: Duration,
    ) -> FrameOutput {
        let output = match self.track_swipe(features, now) {
            Some(direction) => FrameOutput {
                variant: match direction {
                    ScrollDirection::Up => GestureVariant::SwipeUp,
                    ScrollDirection::Down => GestureVariant::SwipeDown,
                },
                event: Some(ActionEvent::Swipe(direction)),
            },
            None => FrameOutput {
                variant: classified,
                event: self.gate(classified, features.tracking_point, now),
            },
        };

        if output.variant != GestureVariant::ClawOpen {
            self.anchor.disarm();
        }
        self.set_mode(EngineMode::from_variant(output.variant));

        if let Some(event) = output.event {
            debug!(gesture = %output.variant, ?event, "acción emitida");
        }
        output
    }

    /// Paso para un frame sin mano: equivale a `None`, desarma el cursor y vacía el historial
    pub fn no_hand(&mut self, _now: Duration) -> FrameOutput {
        self.anchor.disarm();
        self.history.clear();
        self.set_mode(EngineMode::Idle);
        FrameOutput {
            variant: GestureVariant::None,
            event: None,
        }
    }

    /// Alimenta el historial mientras la palma está abierta; devuelve la dirección si dispara
    fn track_swipe(&mut self, features: &FeatureSet, now: Duration) -> Option<ScrollDirection> {
        if !self.swipe_enabled {
            return None;
        }

        if !features.open_palm {
            self.history.clear();
            return None;
        }

        self.history.push(features.wrist.y, now);

        if !self.swipe.is_ready(now) {
            return None;
        }

        let direction = self
            .history
            .detect(self.swipe_min_samples, self.swipe_min_displacement)?;
        self.swipe.try_fire(now);
        self.history.clear();
        Some(direction)
    }

    /// Aplica ancla y cooldowns al gesto clasificado
    fn gate(
        &mut self,
        variant: GestureVariant,
        tracking_point: Point,
        now: Duration,
    ) -> Option<ActionEvent> {
        match variant {
            GestureVariant::ClawOpen => {
                let (dx, dy) = self
                    .anchor
                    .track(tracking_point)
                    .map(|(nx, ny)| (nx * self.cursor_scale.0, ny * self.cursor_scale.1))
                    .unwrap_or((0.0, 0.0));
                Some(ActionEvent::CursorDelta { dx, dy })
            }
            GestureVariant::ClawClosed | GestureVariant::ClosedFist => {
                self.click.try_fire(now).then_some(ActionEvent::Click)
            }
            GestureVariant::ThumbsUp | GestureVariant::PointUp => self
                .scroll
                .try_fire(now)
                .then_some(ActionEvent::Scroll(ScrollDirection::Up)),
            GestureVariant::ThumbsDown | GestureVariant::PointDown => self
                .scroll
                .try_fire(now)
                .then_some(ActionEvent::Scroll(ScrollDirection::Down)),
            GestureVariant::None | GestureVariant::SwipeUp | GestureVariant::SwipeDown => None,
        }
    }

    fn set_mode(&mut self, mode: EngineMode) {
        if mode != self.mode {
            debug!("modo {} → {}", self.mode.as_str(), mode.as_str());
            self.mode = mode;
        }
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn is_cursor_armed(&self) -> bool {
        self.anchor.is_armed()
    }

    pub fn swipe_history_len(&self) -> usize {
        self.history.len()
    }
}
