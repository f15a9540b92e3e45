//! Tunable constants for focus tracking.

/// Every tunable constant the focus-tracking viewport uses.
///
/// `Default` yields the reference values. All delays are in milliseconds
/// and all distances in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusTuning {
    // Geometry
    /// How much breathing room is left below the last pair (1.0 = centered).
    pub padding_modifier: f64,
    /// Minimum bottom padding.
    pub padding_floor: f64,
    /// Delay before the first geometry measurement after mount or a message change.
    pub mount_settle_ms: u64,
    /// Where a newly completed pair's top lands, as a fraction of viewport height.
    pub scroll_target_fraction: f64,
    /// Delay before scrolling to a newly completed pair.
    pub scroll_to_latest_delay_ms: u64,

    // Resolver
    /// Distance multiplier for pairs above center while scrolling up.
    pub up_bias: f64,
    /// Distance multiplier for pairs below center while scrolling down.
    pub down_bias: f64,
    /// Minimum visible fraction while scrolling up.
    pub min_visibility_up: f64,
    /// Minimum visible fraction while scrolling down.
    pub min_visibility_down: f64,
    /// Debounce for scroll-triggered resolution.
    pub resolve_debounce_ms: u64,
    /// Visibility ratios whose crossing triggers a resolution.
    pub intersection_thresholds: Vec<f64>,

    // Focus
    /// How long the transition-in suppression lasts.
    pub transition_in_ms: u64,

    // Broadcaster
    /// Delay before measuring the AI message after entering focus.
    pub position_settle_ms: u64,
    /// Debounce for scroll-triggered position updates.
    pub position_debounce_ms: u64,
    /// Horizontal gap between the avatar and the AI message.
    pub avatar_gap_px: f64,
    /// Half the avatar's width.
    pub avatar_half_width_px: f64,
    /// Half the avatar's height.
    pub avatar_half_height_px: f64,

    // Presentation
    /// Visible fraction at which a message counts as in view.
    pub in_view_threshold: f64,
    /// Scale of the latest pair while focus mode is active.
    pub focus_scale: f64,
    /// Opacity of earlier pairs while focus mode is active.
    pub dimmed_opacity: f64,
}

impl Default for FocusTuning {
    fn default() -> Self {
        Self {
            padding_modifier: 1.8,
            padding_floor: 100.0,
            mount_settle_ms: 100,
            scroll_target_fraction: 0.2,
            scroll_to_latest_delay_ms: 50,
            up_bias: 0.8,
            down_bias: 1.1,
            min_visibility_up: 0.15,
            min_visibility_down: 0.25,
            resolve_debounce_ms: 30,
            intersection_thresholds: vec![0.2, 0.3, 0.4, 0.5, 0.6, 0.7],
            transition_in_ms: 1000,
            position_settle_ms: 100,
            position_debounce_ms: 100,
            avatar_gap_px: 150.0,
            avatar_half_width_px: 100.0,
            avatar_half_height_px: 100.0,
            in_view_threshold: 0.75,
            focus_scale: 1.15,
            dimmed_opacity: 0.05,
        }
    }
}
