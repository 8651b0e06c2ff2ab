/// Config sections that accept nested env overrides.
const SECTIONS: [&str; 4] = ["DATASET", "AUDIT", "RECONCILE", "PATCH"];

/// Warn about `ALMANAC_*` env vars that use a single underscore after the
/// section name and therefore never reach the config.
pub fn warn_misnamed_env() {
    for warning in collect_misnamed_env(std::env::vars().map(|(key, _)| key)) {
        tracing::warn!("{warning}");
    }
}

fn collect_misnamed_env<I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut warnings = Vec::new();
    for key in keys {
        let Some(rest) = key.strip_prefix("ALMANAC_") else {
            continue;
        };
        for section in SECTIONS {
            let Some(field) = rest.strip_prefix(section) else {
                continue;
            };
            if field.starts_with('_') && !field.starts_with("__") {
                warnings.push(format!(
                    "{key} is ignored. Use double underscores (example: ALMANAC_{section}_{field})."
                ));
            }
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::collect_misnamed_env;

    #[test]
    fn flags_single_underscore_section_keys() {
        let warnings = collect_misnamed_env([
            "ALMANAC_RECONCILE_MAX_DISTANCE".to_string(),
            "ALMANAC_RECONCILE__MAX_DISTANCE".to_string(),
            "ALMANAC_LOG".to_string(),
            "PATH".to_string(),
        ]);

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("ALMANAC_RECONCILE__MAX_DISTANCE"));
    }
}
