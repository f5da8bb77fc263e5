//! Start-up configuration shared by every raster unit.
//!
//! Built once (from defaults or CLI flags) and handed by reference to the
//! engine; nothing mutates it while frames are being drawn.

use thiserror::Error;

/// Screen geometry, field of view and frame pacing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Logical resolution before scaling (classic Doom: 320×200).
    pub base_width: usize,
    pub base_height: usize,
    /// Integer up-scale applied to the logical resolution.
    pub scale: usize,
    /// Horizontal field of view in degrees.
    pub fov: f64,
    pub target_fps: usize,
    /// Eye offset above the floor under the viewer, in map units.
    pub eye_height: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("screen dimension `{0}` must be non-zero")]
    ZeroDimension(&'static str),

    #[error("field of view {0}° outside (0°, 180°)")]
    BadFov(f64),

    #[error("target frame rate must be non-zero")]
    ZeroFps,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_width: 320,
            base_height: 200,
            scale: 5,
            fov: 90.0,
            target_fps: 60,
            eye_height: 41.0,
        }
    }
}

impl Settings {
    /// Unscaled `width × height` screen with the default FOV and eye height.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            base_width: width,
            base_height: height,
            scale: 1,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_width == 0 {
            return Err(ConfigError::ZeroDimension("width"));
        }
        if self.base_height == 0 {
            return Err(ConfigError::ZeroDimension("height"));
        }
        if self.scale == 0 {
            return Err(ConfigError::ZeroDimension("scale"));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(ConfigError::BadFov(self.fov));
        }
        if self.target_fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.base_width * self.scale
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.base_height * self.scale
    }

    #[inline]
    pub fn half_width(&self) -> f64 {
        (self.width() / 2) as f64
    }

    #[inline]
    pub fn half_height(&self) -> f64 {
        (self.height() / 2) as f64
    }

    #[inline]
    pub fn half_fov(&self) -> f64 {
        self.fov / 2.0
    }

    /// Distance from the eye to the projection plane, in pixels:
    ///
    /// ```text
    /// screen_distance = half_width / tan(fov/2)
    /// ```
    #[inline]
    pub fn screen_distance(&self) -> f64 {
        self.half_width() / self.half_fov().to_radians().tan()
    }
}
