//! Logging for the provider
//!
//! Events are rendered as `[code] message (key=value, ...)` and handed to the
//! `log` facade. The provider never installs a logger itself.

pub mod codes;
pub mod macros;

pub use codes::Code;

/// Target used for every record emitted by the provider
pub const LOG_TARGET: &str = "instana_provider";

/// Whether debug records would be emitted
pub fn debug_enabled() -> bool {
    log::log_enabled!(target: LOG_TARGET, log::Level::Debug)
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    log::error!(
        target: LOG_TARGET,
        "[{}] {}",
        code,
        render_event(message, &context)
    );
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    log::info!(target: LOG_TARGET, "{}", render_event(message, &context));
}

/// Log debug with context (used by log_debug! macro)
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    log::debug!(target: LOG_TARGET, "{}", render_event(message, &context));
}

fn render_event(message: &str, context: &[(&str, &str)]) -> String {
    if context.is_empty() {
        return message.to_string();
    }
    let pairs: Vec<String> = context
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    format!("{} ({})", message, pairs.join(", "))
}

/// Install `env_logger` for tests, ignoring repeated initialization
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_event_without_context() {
        assert_eq!(render_event("mapped rule", &[]), "mapped rule");
    }

    #[test]
    fn test_render_event_with_context() {
        let rendered = render_event("mapped rule", &[("path", "rules.0"), ("rule_type", "system")]);
        assert_eq!(rendered, "mapped rule (path=rules.0, rule_type=system)");
    }

    #[test]
    fn test_macros_accept_display_values() {
        init_test_logging();

        crate::log_debug!("debug event", "count" => 3);
        crate::log_info!("info event", "path" => "rules.0");
        crate::log_error!(codes::mapping::NO_RULE_DEFINED, "error event", "path" => "rules");
        crate::log_error!(codes::api::TRANSPORT_ERROR, "bare error");
    }
}
