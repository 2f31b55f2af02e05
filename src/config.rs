use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gesture_classifier::Thresholds;

/// Separación mínima entre la cota "cerrada" y la "abierta" de una misma magnitud
pub const MIN_DEAD_ZONE: f32 = 0.01;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Geometría de pantalla. Es un dato externo: nunca se descubre aquí.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl std::str::FromStr for ScreenConfig {
    type Err = String;

    /// Formato `ANCHOxALTO`, p. ej. `2560x1440`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
        let width = w.trim().parse().map_err(|e| format!("width {w:?}: {e}"))?;
        let height = h.trim().parse().map_err(|e| format!("height {h:?}: {e}"))?;
        Ok(Self { width, height })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Multiplicador sobre (delta normalizado × tamaño de pantalla)
    pub sensitivity: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self { sensitivity: 1.5 }
    }
}

/// Intervalo mínimo entre dos disparos del mismo tipo de acción
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownConfig {
    pub click_ms: u64,
    pub scroll_ms: u64,
    pub swipe_ms: u64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            click_ms: 500,
            scroll_ms: 200,
            swipe_ms: 1000,
        }
    }
}

impl CooldownConfig {
    pub fn click(&self) -> Duration {
        Duration::from_millis(self.click_ms)
    }

    pub fn scroll(&self) -> Duration {
        Duration::from_millis(self.scroll_ms)
    }

    pub fn swipe(&self) -> Duration {
        Duration::from_millis(self.swipe_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Ticks de rueda por gesto de scroll (pulgar / índice)
    pub ticks: u32,
    /// Ticks de rueda por swipe
    pub swipe_ticks: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            ticks: 3,
            swipe_ticks: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    pub enabled: bool,
    /// Capacidad del historial (muestras)
    pub capacity: usize,
    /// Muestras mínimas antes de evaluar un swipe
    pub min_samples: usize,
    /// Desplazamiento vertical neto (normalizado) para disparar
    pub min_displacement: f32,
    /// Edad máxima de una muestra dentro del historial
    pub max_age_ms: u64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 12,
            min_samples: 5,
            min_displacement: 0.15,
            max_age_ms: 600,
        }
    }
}

impl SwipeConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }
}

/// Superficie de configuración completa. Estática durante la sesión.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub screen: ScreenConfig,
    pub cursor: CursorConfig,
    pub cooldowns: CooldownConfig,
    pub scroll: ScrollConfig,
    pub swipe: SwipeConfig,
    pub thresholds: Thresholds,
}

impl Config {
    /// Carga y valida un TOML; las claves ausentes toman el valor por defecto
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(invalid("screen", "width and height must be non-zero"));
        }

        if !(self.cursor.sensitivity.is_finite() && self.cursor.sensitivity > 0.0) {
            return Err(invalid("cursor.sensitivity", "must be a positive number"));
        }

        if self.swipe.min_samples < 2 {
            return Err(invalid("swipe.min_samples", "need at least 2 samples"));
        }
        if self.swipe.capacity < self.swipe.min_samples {
            return Err(invalid(
                "swipe.capacity",
                format!(
                    "capacity {} is below min_samples {}",
                    self.swipe.capacity, self.swipe.min_samples
                ),
            ));
        }
        if !(self.swipe.min_displacement.is_finite() && self.swipe.min_displacement > 0.0) {
            return Err(invalid("swipe.min_displacement", "must be a positive number"));
        }

        // Con NaN todas las comparaciones de los predicados dan false
        let t = &self.thresholds;
        if let Some((field, value)) = t.named_values().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(field, format!("must be a finite number, got {value}")));
        }

        let open = t.claw_open_min_radius;
        for (field, closed) in [
            ("thresholds.claw_closed_max_radius", t.claw_closed_max_radius),
            ("thresholds.fist_max_radius", t.fist_max_radius),
        ] {
            if open - closed < MIN_DEAD_ZONE {
                return Err(invalid(
                    field,
                    format!(
                        "closed bound {closed} must stay at least {MIN_DEAD_ZONE} below claw_open_min_radius {open}"
                    ),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_default_thresholds_keep_a_dead_zone() {
        let t = Thresholds::default();
        assert!(t.claw_closed_max_radius < t.claw_open_min_radius);
        assert!(t.fist_max_radius < t.claw_open_min_radius);
        assert!(t.claw_open_min_radius - t.claw_closed_max_radius >= MIN_DEAD_ZONE);
        assert!(t.claw_open_min_radius - t.fist_max_radius >= MIN_DEAD_ZONE);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [screen]
            width = 2560
            height = 1440

            [cooldowns]
            click_ms = 750
            "#,
        )
        .unwrap();

        assert_eq!(config.screen.width, 2560);
        assert_eq!(config.cooldowns.click(), Duration::from_millis(750));
        assert_eq!(config.cooldowns.scroll_ms, 200);
        assert_eq!(config.thresholds, Thresholds::default());
    }

    #[test]
    fn test_overlapping_cluster_bounds_are_rejected() {
        let err = Config::from_toml(
            r#"
            [thresholds]
            claw_closed_max_radius = 0.075
            claw_open_min_radius = 0.08
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::Invalid { field, .. } => {
                assert_eq!(field, "thresholds.claw_closed_max_radius")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_nan_threshold_is_rejected() {
        let err = Config::from_toml(
            r#"
            [thresholds]
            claw_open_min_radius = nan
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::Invalid { field, .. } => {
                assert_eq!(field, "thresholds.claw_open_min_radius")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_every_threshold_is_checked_for_finiteness() {
        let mut config = Config::default();
        config.thresholds.point_down_others_margin = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "thresholds.point_down_others_margin", .. })
        ));

        let mut config = Config::default();
        config.thresholds.thumb_up_base_margin = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_swipe_displacement_is_rejected() {
        let mut config = Config::default();
        config.swipe.min_displacement = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "swipe.min_displacement", .. })
        ));
    }

    #[test]
    fn test_swipe_capacity_must_hold_min_samples() {
        let mut config = Config::default();
        config.swipe.capacity = 3;
        config.swipe.min_samples = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_screen_is_rejected() {
        let mut config = Config::default();
        config.screen.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_screen_parses_from_cli_format() {
        let screen: ScreenConfig = "2560x1440".parse().unwrap();
        assert_eq!((screen.width, screen.height), (2560, 1440));
        assert!("2560".parse::<ScreenConfig>().is_err());
        assert!("axb".parse::<ScreenConfig>().is_err());
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cursor]\nsensitivity = 2.0").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.cursor.sensitivity, 2.0);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = Config::load("/nonexistent/aerotouch.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
