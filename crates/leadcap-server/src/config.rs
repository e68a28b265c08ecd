/// Re-export `Config` from `leadcap-core` for use within this crate.
///
/// Environment parsing lives in `leadcap-core` so the sheets crate and the
/// integration tests share one definition.
pub use leadcap_core::config::Config;
