//! Site capability profiles
//!
//! Each adapter is a static description of one analytics dashboard: where
//! it lives, how long it needs to render, and which selectors expose the
//! chart internals. The pipeline stays site-agnostic and picks a decoding
//! path from the capabilities a profile declares; adding a site means
//! adding one profile here.

pub mod soundcloud;
pub mod spotify;

/// Selectors for the geometry decoding path: a calibrated value axis plus
/// transform-positioned bars.
#[derive(Debug, Clone, Copy)]
pub struct GeometrySelectors {
    /// Tick containers on the value axis, each exposing a positional
    /// transform and a text value.
    pub value_axis_ticks: &'static str,
    /// The category axis group whose transform carries the baseline.
    pub category_axis: &'static str,
    /// Text labels inside the category axis group.
    pub category_tick_labels: &'static str,
    /// Bar nodes exposing a positional transform.
    pub bars: &'static str,
}

/// Selectors for the live tooltip path.
#[derive(Debug, Clone, Copy)]
pub struct TooltipSelectors {
    /// Bar nodes to hover, in document order.
    pub bars: &'static str,
    pub value: &'static str,
    pub period: &'static str,
}

/// Selectors for the public catalog page.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSelectors {
    /// Elements whose text is a track name, in page order.
    pub track_names: &'static str,
    /// Elements whose text is a play count, in the same page order.
    pub play_counts: &'static str,
    /// Candidate elements for the headline listener count.
    pub monthly_listeners: &'static str,
    /// Consent and app popups dismissed before reading anything.
    pub popup_close: &'static str,
    /// Expander revealing the full track list.
    pub show_more: &'static str,
}

/// What one site exposes. A None capability is simply not offered by that
/// site's markup; the pipeline degrades accordingly instead of guessing.
#[derive(Debug, Clone, Copy)]
pub struct SiteSelectors {
    pub geometry: Option<GeometrySelectors>,
    /// Bar nodes carrying accessibility labels with period and count.
    pub labeled_bars: Option<&'static str>,
    /// Headline total element above the chart.
    pub hero_total: Option<&'static str>,
    pub tooltip: Option<TooltipSelectors>,
    pub catalog: Option<CatalogSelectors>,
}

/// Static description of one dashboard.
#[derive(Debug, Clone, Copy)]
pub struct SiteProfile {
    pub id: &'static str,
    pub base_url: &'static str,
    /// Where the provider parks the browser for a manual sign-in.
    pub login_url: &'static str,
    /// Seconds the dashboard needs before its charts are worth reading.
    pub settle_secs: u64,
    /// Milliseconds a tooltip needs to render after the pointer arrives.
    pub tooltip_settle_ms: u64,
    pub selectors: SiteSelectors,
}
