// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
//! Startup selection of the drawing model.
use core::str::FromStr;

use nsmotif_bitmap::Rgba;

use crate::backend::{BackendError, BlitBackend};
use crate::backends::{BlendBackend, StencilBackend};
use crate::plotter::Plotter;

/// Environment variable that overrides the configured backend.
pub const BACKEND_ENV: &str = "NSMOTIF_BACKEND";

/// Which drawing model renders the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BackendKind {
    /// Core X11 drawing with 1-bit clip masks.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "x11"))]
    Stencil,
    /// OpenGL style drawing with alpha blending.
    #[cfg_attr(feature = "serde", serde(alias = "gl"))]
    Blend,
}

/// Window and backend settings of a frontend.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlotConfig {
    pub backend: BackendKind,
    pub width: u32,
    pub height: u32,
    /// Colour the window is cleared to, as red, green, blue, alpha.
    pub background: Rgba,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown backend `{0}`, expected `stencil`, `blend` or `gl`")]
    UnknownBackend(String),
    #[error("environment variable {0} is not valid unicode")]
    NotUnicode(&'static str),
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stencil" | "x11" => Ok(BackendKind::Stencil),
            "blend" | "gl" => Ok(BackendKind::Blend),
            _ => Err(ConfigError::UnknownBackend(s.into())),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            backend: BackendKind::default(),
            width: 800,
            height: 600,
            background: [0xff; 4],
        }
    }
}

impl PlotConfig {
    /// The default settings with the backend taken from `NSMOTIF_BACKEND`, if set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = PlotConfig::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Let `NSMOTIF_BACKEND` override the backend, if set.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        match std::env::var(BACKEND_ENV) {
            Ok(value) => self.override_backend(Some(&value)),
            Err(std::env::VarError::NotPresent) => Ok(()),
            Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(BACKEND_ENV)),
        }
    }

    /// Replace the backend by the parsed `value`. An absent or blank value keeps the current one.
    pub fn override_backend(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
        match value.map(str::trim) {
            None | Some("") => Ok(()),
            Some(value) => {
                self.backend = value.parse()?;
                log::debug!("backend overridden to {:?}", self.backend);
                Ok(())
            }
        }
    }

    /// Create the configured backend.
    pub fn build_backend(&self) -> Result<Box<dyn BlitBackend>, BackendError> {
        let backend: Box<dyn BlitBackend> = match self.backend {
            BackendKind::Stencil => {
                Box::new(StencilBackend::new(self.width, self.height, self.background)?)
            }
            BackendKind::Blend => {
                Box::new(BlendBackend::new(self.width, self.height, self.background)?)
            }
        };

        log::info!(
            "using {} backend at {}x{}",
            backend.name(),
            self.width,
            self.height
        );
        Ok(backend)
    }

    /// Create a plotter on the configured backend.
    pub fn build_plotter(&self) -> Result<Plotter<Box<dyn BlitBackend>>, BackendError> {
        self.build_backend().map(Plotter::new)
    }
}
