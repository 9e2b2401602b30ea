use std::env;

/// Process-wide debug/bypass switches read once at startup from the
/// environment. These never come from the TOML config file — they are
/// meant for local debugging and incident response, not checked-in state.
#[derive(Debug, Clone, Default)]
pub struct RuntimeFlags {
    pub debug: bool,
    pub bypass_memory_injection: bool,
    pub bypass_adaptive_budget: bool,
    pub bypass_vector_search: bool,
    pub bypass_semantic_cache: bool,
    pub internal_only: bool,
}

impl RuntimeFlags {
    pub fn from_env() -> Self {
        Self {
            debug: is_set("DEBUG"),
            bypass_memory_injection: is_set("BYPASS_MEMORY_INJECTION"),
            bypass_adaptive_budget: is_set("BYPASS_ADAPTIVE_BUDGET"),
            bypass_vector_search: is_set("BYPASS_VECTOR_SEARCH"),
            bypass_semantic_cache: is_set("BYPASS_SEMANTIC_CACHE"),
            internal_only: is_set("INTERNAL_ONLY"),
        }
    }
}

fn is_set(key: &str) -> bool {
    matches!(
        env::var(key).ok().as_deref(),
        Some("1") | Some("true") | Some("TRUE") | Some("yes")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flags_default_false() {
        env::remove_var("DEBUG");
        let flags = RuntimeFlags::from_env();
        assert!(!flags.debug);
    }

    #[test]
    fn truthy_values_enable_flag() {
        env::set_var("BYPASS_VECTOR_SEARCH", "1");
        let flags = RuntimeFlags::from_env();
        assert!(flags.bypass_vector_search);
        env::remove_var("BYPASS_VECTOR_SEARCH");
    }
}
