//! Sift - pattern typing and matching behind one entry point.
//!
//! [`PatternEngine`] exposes the three operations a host language needs:
//! - [`type_check_pattern`](PatternEngine::type_check_pattern) and
//!   [`type_check_switch`](PatternEngine::type_check_switch) annotate
//!   pattern trees and report diagnostics
//! - [`match_pattern`](PatternEngine::match_pattern) and
//!   [`match_switch`](PatternEngine::match_switch) run annotated patterns
//!   against runtime values
//! - [`resolve_shared_scope`](PatternEngine::resolve_shared_scope) builds
//!   the scope of a body reached by several cases
//!
//! # Debugging
//!
//! Call [`init_tracing`] and set `RUST_LOG`:
//! - `RUST_LOG=sift_types=debug` - inference phases and decisions
//! - `RUST_LOG=sift_match=trace` - cache hits, elided type tests, refutations
//! - `SIFT_LOG_TREE=1` - indented span tree instead of flat lines

mod config;
mod engine;

use std::sync::Once;

pub use config::EngineConfig;
pub use engine::{CheckedPattern, CheckedSwitch, PatternEngine, PatternSource, SwitchCase};

static TRACING_INIT: Once = Once::new();

/// Install a global tracing subscriber if `RUST_LOG` is set.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let tree = std::env::var("SIFT_LOG_TREE").is_ok_and(|v| v == "1");
        let registry = tracing_subscriber::registry().with(filter);
        let result = if tree {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_indent_lines(true)
                        .with_bracketed_fields(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        };
        // The host may have installed its own subscriber already.
        if let Err(err) = result {
            tracing::debug!(%err, "tracing subscriber not installed");
        }
    });
}
