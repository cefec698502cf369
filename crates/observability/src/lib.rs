//! Process-wide tracing setup shared by the `bankers-*` binaries and tests.

/// Install the JSON tracing subscriber. Explicit directives take precedence
/// over the environment; repeated calls are no-ops.
pub fn init_with_filter(directives: Option<&str>) {
    tracing::init(directives);
}

pub mod tracing;
