//! Pipeline por frame: pose → features → gesto → debounce → petición.
//! Un frame se procesa entero antes de aceptar el siguiente.

use std::fmt;

use tracing::debug;

use crate::clock::Clock;
use crate::config::Config;
use crate::debounce::{DebounceEngine, EngineMode, FrameOutput};
use crate::dispatcher::{ActionDispatcher, ActionRequest};
use crate::feature_extractor::FeatureExtractor;
use crate::gesture_classifier::{GestureClassifier, GestureVariant};
use crate::types::PoseSample;

/// Contadores de la sesión
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u64,
    pub hands_seen: u64,
    /// Muestras descartadas en la frontera (landmarks incompletos)
    pub rejected: u64,
    pub clicks: u64,
    pub scroll_ticks: u64,
    pub swipes: u64,
    pub cursor_frames: u64,
}

impl SessionStats {
    fn record(&mut self, variant: GestureVariant, request: &ActionRequest) {
        match request {
            ActionRequest::Click => self.clicks += 1,
            ActionRequest::Scroll { ticks, .. } => {
                self.scroll_ticks += u64::from(*ticks);
                if matches!(variant, GestureVariant::SwipeUp | GestureVariant::SwipeDown) {
                    self.swipes += 1;
                }
            }
            ActionRequest::MoveCursor { .. } => self.cursor_frames += 1,
            ActionRequest::NoAction => {}
        }
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames={} mano={} descartadas={} clicks={} scroll_ticks={} swipes={} cursor={}",
            self.frames,
            self.hands_seen,
            self.rejected,
            self.clicks,
            self.scroll_ticks,
            self.swipes,
            self.cursor_frames
        )
    }
}

/// Resultado de un frame, para trazas y herramientas de replay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub variant: GestureVariant,
    pub mode: EngineMode,
    pub request: ActionRequest,
}

pub struct GestureController<C: Clock> {
    clock: C,
    extractor: FeatureExtractor,
    classifier: GestureClassifier,
    engine: DebounceEngine,
    dispatcher: ActionDispatcher,
    stats: SessionStats,
    last_variant: GestureVariant,
}

impl<C: Clock> GestureController<C> {
    pub fn new(config: &Config, clock: C) -> Self {
        Self {
            clock,
            extractor: FeatureExtractor::new(config.thresholds),
            classifier: GestureClassifier::new(config.thresholds),
            engine: DebounceEngine::new(config),
            dispatcher: ActionDispatcher::new(config),
            stats: SessionStats::default(),
            last_variant: GestureVariant::None,
        }
    }

    /// Procesa un frame. `None` = no hay mano en el frame.
    pub fn process(&mut self, pose: Option<&PoseSample>) -> FrameReport {
        let now = self.clock.now();
        self.stats.frames += 1;

        let output: FrameOutput = match pose {
            Some(pose) => {
                self.stats.hands_seen += 1;
                let features = self.extractor.extract(pose);
                let variant = self.classifier.classify(&features);
                self.engine.step(&features, variant, now)
            }
            None => self.engine.no_hand(now),
        };

        if output.variant != self.last_variant {
            debug!("gesto {} → {}", self.last_variant, output.variant);
            self.last_variant = output.variant;
        }

        let request = self.dispatcher.dispatch(&output);
        self.stats.record(output.variant, &request);

        FrameReport {
            variant: output.variant,
            mode: self.engine.mode(),
            request,
        }
    }

    /// Cuenta una muestra descartada y la procesa como frame sin mano
    pub fn reject(&mut self) -> FrameReport {
        self.stats.rejected += 1;
        self.process(None)
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn mode(&self) -> EngineMode {
        self.engine.mode()
    }

    pub fn pointer_position(&self) -> (f64, f64) {
        self.dispatcher.position()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
