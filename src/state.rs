//! Core application state types and constants.
//!
//! Chart geometry, palettes and small UI state enums shared by the chart
//! models and the egui views.

use crate::chart::Margins;

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of runs that can be selected at once (compare mode)
pub const MAX_SELECTED_RUNS: usize = 2;

/// Maximum points to render per path (LTTB downsampling above this)
pub const MAX_CHART_POINTS: usize = 2000;

/// Run document extensions accepted by the open dialog and the directory source
pub const RUN_EXTENSIONS: &[&str] = &["json"];

/// Logger capture extensions accepted by the open dialog
pub const CAPTURE_EXTENSIONS: &[&str] = &["txt", "csv", "log"];

/// Default total height of the focus + context line chart
pub const LINE_CHART_HEIGHT: f32 = 400.0;

/// Height of the displacement plot in the run view
pub const DISPLACEMENT_PLOT_HEIGHT: f32 = 300.0;

/// Focus panel margins
pub const FOCUS_MARGIN: Margins = Margins {
    top: 20.0,
    right: 20.0,
    bottom: 110.0,
    left: 40.0,
};

/// The context panel starts this far above the bottom of the chart
pub const CONTEXT_TOP_OFFSET: f32 = 70.0;

/// Space below the context panel (its x axis)
pub const CONTEXT_MARGIN_BOTTOM: f32 = 30.0;

/// A press this close to a brush edge resizes instead of moving
pub const BRUSH_HANDLE_PX: f32 = 4.0;

/// Travel histogram height
pub const HISTOGRAM_HEIGHT: f32 = 160.0;

/// Histogram plot margins
pub const HISTOGRAM_MARGIN: Margins = Margins {
    top: 20.0,
    right: 20.0,
    bottom: 40.0,
    left: 40.0,
};

/// Bar grow animation length
pub const HISTOGRAM_ENTER_SECS: f32 = 0.75;

/// Bar shrink animation length
pub const HISTOGRAM_EXIT_SECS: f32 = 0.5;

/// Color palette for chart lines
pub const CHART_COLORS: &[[u8; 3]] = &[
    [71, 108, 155],  // Blue (front)
    [191, 78, 48],   // Rust orange (rear)
    [113, 120, 78],  // Olive green
    [253, 193, 73],  // Amber
    [159, 166, 119], // Sage green
    [135, 30, 28],   // Dark red
];

/// Colorblind-friendly palette (based on Wong's optimized palette)
/// Designed to be distinguishable for deuteranopia, protanopia, and tritanopia
pub const COLORBLIND_COLORS: &[[u8; 3]] = &[
    [0, 114, 178],   // Blue
    [230, 159, 0],   // Orange
    [0, 158, 115],   // Bluish green
    [204, 121, 167], // Reddish purple
    [86, 180, 233],  // Sky blue
    [213, 94, 0],    // Vermillion
];

/// Pick a palette color, wrapping around
pub fn palette_color(index: usize, color_blind_mode: bool) -> [u8; 3] {
    let palette = if color_blind_mode {
        COLORBLIND_COLORS
    } else {
        CHART_COLORS
    };
    palette[index % palette.len()]
}

// ============================================================================
// Chart series roles
// ============================================================================

/// Emphasis of a line in the displacement plot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesRole {
    /// Even-indexed travel line
    Primary,
    /// Odd-indexed travel line
    Secondary,
    /// Sag overlays
    LowEmphasis,
}

impl SeriesRole {
    /// Role of series `index` when the first `main_count` series are travel
    /// lines and the rest are overlays
    pub fn for_index(index: usize, main_count: usize) -> Self {
        if index >= main_count {
            SeriesRole::LowEmphasis
        } else if index % 2 == 0 {
            SeriesRole::Primary
        } else {
            SeriesRole::Secondary
        }
    }

    pub fn width(&self) -> f32 {
        match self {
            SeriesRole::Primary | SeriesRole::Secondary => 1.5,
            SeriesRole::LowEmphasis => 1.0,
        }
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Type of toast notification (determines color)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastType {
    /// Informational message (blue)
    #[default]
    Info,
    /// Success message (green)
    Success,
    /// Warning message (amber)
    Warning,
    /// Error message (red)
    Error,
}

impl ToastType {
    /// Get the background color for this toast type
    pub fn color(&self) -> [u8; 3] {
        match self {
            ToastType::Info => [71, 108, 155],    // Blue
            ToastType::Success => [113, 120, 78], // Olive green
            ToastType::Warning => [253, 193, 73], // Amber
            ToastType::Error => [135, 30, 28],    // Dark red
        }
    }

    /// Get the text color for this toast type
    pub fn text_color(&self) -> [u8; 3] {
        match self {
            ToastType::Warning => [30, 30, 30], // Dark text for amber background
            _ => [255, 255, 255],               // White text for other backgrounds
        }
    }
}
