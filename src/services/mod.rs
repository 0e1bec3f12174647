//! Pipeline services
//!
//! Stages appear in pipeline order: a session is provisioned, a page is
//! loaded to convergence, then the pure decoders (axis, bars, labels)
//! feed series assembly. The orchestrator runs one such pipeline per
//! timeframe; tooltip and catalog extraction are alternative tails for
//! sites that need them.

pub mod axis_service;
pub mod bar_service;
pub mod catalog_service;
pub mod label_service;
pub mod page_service;
pub mod scrape_service;
pub mod series_service;
pub mod session_service;
pub mod tooltip_service;
