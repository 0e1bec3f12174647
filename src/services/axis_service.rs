//! Value-axis calibration
//!
//! The rendered chart never prints numbers on the bars; the value axis
//! does. Calibration maps render pixels back to counts using the two
//! extreme ticks, and the category-axis transform gives the baseline the
//! bars grow from.

use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::models::{AxisTick, Calibration};
use crate::sites::GeometrySelectors;
use crate::utils::{parse_tick_value, translate_y};

/// Derive the full calibration for one chart document.
pub fn calibrate_chart(markup: &str, selectors: &GeometrySelectors) -> Calibration {
    let ticks = read_ticks(markup, selectors.value_axis_ticks);
    Calibration {
        factor: conversion_factor(&ticks),
        baseline: read_baseline(markup, selectors.category_axis),
    }
}

/// Collect value-axis ticks in document order. Ticks missing a position
/// or a numeric value are skipped.
pub fn read_ticks(markup: &str, tick_selector: &str) -> Vec<AxisTick> {
    let Ok(selector) = Selector::parse(tick_selector) else {
        warn!("Bad tick selector: {}", tick_selector);
        return Vec::new();
    };
    let document = Html::parse_document(markup);
    let mut ticks = Vec::new();
    for container in document.select(&selector) {
        let position = container.value().attr("transform").and_then(translate_y);
        let text: String = container.text().collect();
        let value = parse_tick_value(&text);
        match (position, value) {
            (Some(position), Some(value)) => ticks.push(AxisTick { position, value }),
            _ => debug!("Skipping tick without position or value: '{}'", text.trim()),
        }
    }
    ticks
}

/// Pixels-to-count factor from the minimum-value and maximum-value ticks.
/// Fewer than two usable ticks, coincident positions and a flat axis all
/// fall back to the default factor.
pub fn conversion_factor(ticks: &[AxisTick]) -> f64 {
    let (Some(min), Some(max)) = (
        ticks.iter().min_by(|a, b| a.value.total_cmp(&b.value)),
        ticks.iter().max_by(|a, b| a.value.total_cmp(&b.value)),
    ) else {
        warn!(
            "No usable axis ticks, using default factor {}",
            Calibration::DEFAULT_FACTOR
        );
        return Calibration::DEFAULT_FACTOR;
    };

    let value_span = (max.value - min.value).abs();
    let pixel_span = (max.position - min.position).abs();
    if value_span == 0.0 || pixel_span == 0.0 {
        warn!(
            "Degenerate axis (value span {}, pixel span {}), using default factor",
            value_span, pixel_span
        );
        return Calibration::DEFAULT_FACTOR;
    }

    let factor = value_span / pixel_span;
    debug!("Calibrated conversion factor {:.4}", factor);
    factor
}

/// Baseline y offset from the category-axis transform.
pub fn read_baseline(markup: &str, axis_selector: &str) -> f64 {
    let Ok(selector) = Selector::parse(axis_selector) else {
        warn!("Bad category axis selector: {}", axis_selector);
        return Calibration::DEFAULT_BASELINE;
    };
    let document = Html::parse_document(markup);
    document
        .select(&selector)
        .next()
        .and_then(|group| group.value().attr("transform"))
        .and_then(translate_y)
        .unwrap_or_else(|| {
            warn!(
                "No category axis transform, using default baseline {}",
                Calibration::DEFAULT_BASELINE
            );
            Calibration::DEFAULT_BASELINE
        })
}
