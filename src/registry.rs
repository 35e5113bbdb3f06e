//! Strategy Registry (spec §4.E): a process-wide, frozen-after-init map from
//! canonical strategy name to implementation.
//!
//! Grounded on the teacher's `analyze/mod.rs`/`waf/mod.rs` module
//! re-export style, backed by `once_cell::sync::Lazy` (already a teacher
//! dependency) for the "initialize once, freeze thereafter" registry shape
//! spec.md §9 asks for.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::strategy::header_scan::HeaderScanStrategy;
use crate::strategy::help::HelpStrategy;
use crate::strategy::Strategy;

static SCAN_STRATEGIES: Lazy<HashMap<&'static str, Box<dyn Strategy>>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, Box<dyn Strategy>> = HashMap::new();
    register(&mut m, Box::new(HeaderScanStrategy::default()));
    m
});

static HELP_STRATEGIES: Lazy<HashMap<&'static str, Box<dyn Strategy>>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, Box<dyn Strategy>> = HashMap::new();
    register(&mut m, Box::new(HelpStrategy));
    m
});

/// Duplicate registration under the same canonical name is a programmer
/// error, not a runtime condition — panicking here is appropriate because
/// it can only happen from a broken registry table shipped in this binary,
/// never from external input.
fn register(map: &mut HashMap<&'static str, Box<dyn Strategy>>, strategy: Box<dyn Strategy>) {
    let name = strategy.name();
    if map.insert(name, strategy).is_some() {
        panic!("duplicate strategy registration for name: {name}");
    }
}

pub fn lookup_scan_strategy(name: &str) -> Option<&'static dyn Strategy> {
    SCAN_STRATEGIES.get(name).map(|b| b.as_ref())
}

pub fn lookup_help_strategy(name: &str) -> Option<&'static dyn Strategy> {
    HELP_STRATEGIES.get(name).map(|b| b.as_ref())
}

/// Looks a name up across both registries, reporting which table (if any)
/// it was found in — used by the Execution Plan Formatter to decide whether
/// a parameter name names a strategy at all (spec §4.D step 4).
pub fn lookup(name: &str) -> Option<&'static dyn Strategy> {
    lookup_scan_strategy(name).or_else(|| lookup_help_strategy(name))
}
