//! Overlapping fixed-size windows over file text.

use crate::error::ReportError;

/// Window length in characters.
pub const DEFAULT_WINDOW_CHARS: usize = 2500;
/// Distance between window starts in characters.
pub const DEFAULT_STRIDE_CHARS: usize = 2000;
/// Windows requested per file.
pub const DEFAULT_MAX_WINDOWS: usize = 3;

/// Windowing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Window length in characters.
    pub window_chars: usize,
    /// Start-to-start distance; at most `window_chars`.
    pub stride_chars: usize,
    /// Only this many leading windows are kept.
    pub max_windows: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_chars: DEFAULT_WINDOW_CHARS,
            stride_chars: DEFAULT_STRIDE_CHARS,
            max_windows: DEFAULT_MAX_WINDOWS,
        }
    }
}

impl WindowConfig {
    /// Validates and builds a window configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if any value is zero or the stride
    /// exceeds the window (which would skip text).
    pub fn new(
        window_chars: usize,
        stride_chars: usize,
        max_windows: usize,
    ) -> Result<Self, ReportError> {
        if window_chars == 0 || stride_chars == 0 || max_windows == 0 {
            return Err(ReportError::Config(
                "window size, stride and window count must be positive".into(),
            ));
        }
        if stride_chars > window_chars {
            return Err(ReportError::Config(format!(
                "window stride ({stride_chars}) must not exceed window size ({window_chars})"
            )));
        }
        Ok(Self { window_chars, stride_chars, max_windows })
    }
}

/// Splits `text` into at most `max_windows` overlapping windows.
///
/// Offsets count characters, so windows never split a code point.
#[must_use]
pub fn split_windows<'t>(text: &'t str, config: &WindowConfig) -> Vec<&'t str> {
    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let len = bounds.len();
    bounds.push(text.len());

    let stride = config.stride_chars.max(1);
    (0..len)
        .step_by(stride)
        .take(config.max_windows)
        .map(|start| {
            let end = start.saturating_add(config.window_chars).min(len);
            &text[bounds[start]..bounds[end]]
        })
        .collect()
}
