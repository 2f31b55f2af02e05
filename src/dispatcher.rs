use crate::config::Config;
use crate::debounce::{ActionEvent, FrameOutput};
use crate::types::ScrollDirection;

/// Petición concreta para el inyector de entrada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRequest {
    /// Delta relativo en píxeles, ya recortado a los bordes de pantalla
    MoveCursor { dx: i32, dy: i32 },
    Click,
    Scroll { direction: ScrollDirection, ticks: u32 },
    NoAction,
}

impl ActionRequest {
    /// `NoAction` o un movimiento nulo: el inyector no tiene nada que hacer
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            ActionRequest::NoAction | ActionRequest::MoveCursor { dx: 0, dy: 0 }
        )
    }

    /// Ticks de rueda con signo (positivo = arriba)
    pub fn wheel_delta(&self) -> Option<i32> {
        match self {
            ActionRequest::Scroll { direction, ticks } => Some(direction.sign() * *ticks as i32),
            _ => None,
        }
    }
}

/// Traduce la salida del motor a peticiones y lleva su propia estimación de la
/// posición del puntero, que satura en los bordes.
pub struct ActionDispatcher {
    x: f64,
    y: f64,
    max_x: f64,
    max_y: f64,
    scroll_ticks: u32,
    swipe_ticks: u32,
}

impl ActionDispatcher {
    /// Arranca con el puntero estimado en el centro de la pantalla
    pub fn new(config: &Config) -> Self {
        let max_x = f64::from(config.screen.width.saturating_sub(1));
        let max_y = f64::from(config.screen.height.saturating_sub(1));
        Self {
            x: f64::from(config.screen.width) / 2.0,
            y: f64::from(config.screen.height) / 2.0,
            max_x,
            max_y,
            scroll_ticks: config.scroll.ticks,
            swipe_ticks: config.scroll.swipe_ticks,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn dispatch(&mut self, output: &FrameOutput) -> ActionRequest {
        match output.event {
            None => ActionRequest::NoAction,
            Some(ActionEvent::CursorDelta { dx, dy }) => self.move_by(dx, dy),
            Some(ActionEvent::Click) => ActionRequest::Click,
            Some(ActionEvent::Scroll(direction)) => ActionRequest::Scroll {
                direction,
                ticks: self.scroll_ticks,
            },
            Some(ActionEvent::Swipe(direction)) => ActionRequest::Scroll {
                direction,
                ticks: self.swipe_ticks,
            },
        }
    }

    /// Acumula en coma flotante y emite el salto entre píxeles enteros,
    /// así los movimientos subpíxel no se pierden
    fn move_by(&mut self, dx: f32, dy: f32) -> ActionRequest {
        let target_x = (self.x + f64::from(dx)).clamp(0.0, self.max_x);
        let target_y = (self.y + f64::from(dy)).clamp(0.0, self.max_y);

        let step_x = (target_x.round() - self.x.round()) as i32;
        let step_y = (target_y.round() - self.y.round()) as i32;

        self.x = target_x;
        self.y = target_y;

        ActionRequest::MoveCursor {
            dx: step_x,
            dy: step_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture_classifier::GestureVariant;

    fn dispatcher(width: u32, height: u32) -> ActionDispatcher {
        let mut config = Config::default();
        config.screen.width = width;
        config.screen.height = height;
        ActionDispatcher::new(&config)
    }

    fn cursor(dx: f32, dy: f32) -> FrameOutput {
        FrameOutput {
            variant: GestureVariant::ClawOpen,
            event: Some(ActionEvent::CursorDelta { dx, dy }),
        }
    }

    #[test]
    fn test_starts_at_screen_center() {
        assert_eq!(dispatcher(1920, 1080).position(), (960.0, 540.0));
    }

    #[test]
    fn test_moves_by_whole_pixels() {
        let mut d = dispatcher(1920, 1080);
        assert_eq!(
            d.dispatch(&cursor(12.0, -7.0)),
            ActionRequest::MoveCursor { dx: 12, dy: -7 }
        );
        assert_eq!(d.position(), (972.0, 533.0));
    }

    #[test]
    fn test_clamps_to_last_pixel() {
        let mut d = dispatcher(1920, 1080);
        assert_eq!(
            d.dispatch(&cursor(5000.0, 5000.0)),
            ActionRequest::MoveCursor { dx: 959, dy: 539 }
        );
        assert_eq!(d.position(), (1919.0, 1079.0));

        // Pegado al borde: seguir empujando no mueve nada
        let req = d.dispatch(&cursor(30.0, 30.0));
        assert!(req.is_noop());

        assert_eq!(
            d.dispatch(&cursor(-10_000.0, -10_000.0)),
            ActionRequest::MoveCursor { dx: -1919, dy: -1079 }
        );
        assert_eq!(d.position(), (0.0, 0.0));
    }

    #[test]
    fn test_subpixel_motion_accumulates() {
        let mut d = dispatcher(100, 100);
        let total: i32 = (0..4)
            .map(|_| match d.dispatch(&cursor(0.4, 0.0)) {
                ActionRequest::MoveCursor { dx, .. } => dx,
                other => panic!("unexpected {other:?}"),
            })
            .sum();
        // 50.0 → 51.6: el entero redondeado pasa de 50 a 52
        assert_eq!(total, 2);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut d = dispatcher(1920, 1080);
        let req = d.dispatch(&cursor(0.0, 0.0));
        assert_eq!(req, ActionRequest::MoveCursor { dx: 0, dy: 0 });
        assert!(req.is_noop());
    }

    #[test]
    fn test_scroll_and_swipe_magnitudes() {
        let mut d = dispatcher(1920, 1080);
        let scroll = d.dispatch(&FrameOutput {
            variant: GestureVariant::ThumbsDown,
            event: Some(ActionEvent::Scroll(ScrollDirection::Down)),
        });
        assert_eq!(
            scroll,
            ActionRequest::Scroll {
                direction: ScrollDirection::Down,
                ticks: 3
            }
        );
        assert_eq!(scroll.wheel_delta(), Some(-3));

        let swipe = d.dispatch(&FrameOutput {
            variant: GestureVariant::SwipeUp,
            event: Some(ActionEvent::Swipe(ScrollDirection::Up)),
        });
        assert_eq!(swipe.wheel_delta(), Some(10));
    }

    #[test]
    fn test_no_event_is_no_action() {
        let mut d = dispatcher(1920, 1080);
        let req = d.dispatch(&FrameOutput {
            variant: GestureVariant::ClawClosed,
            event: None,
        });
        assert_eq!(req, ActionRequest::NoAction);
        assert_eq!(
            d.dispatch(&FrameOutput {
                variant: GestureVariant::ClawClosed,
                event: Some(ActionEvent::Click),
            }),
            ActionRequest::Click
        );
    }
}
