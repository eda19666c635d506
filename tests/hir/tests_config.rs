//! Analysis configuration.

use lookml::hir::{AnalysisConfig, ConfigError, Severity, codes};
use lookml::project::Workspace;

use crate::helpers::with_code;

const SOURCE: &str = "view: t {\n  measure: m { type: bogus }\n  dimension: d { scoping: yes sql: 1 ;; }\n}\nexplore: t {}\nview: spare {}\n";

#[test]
fn test_disabled_rule_is_silent() {
    let mut workspace = Workspace::with_config(AnalysisConfig::new().disable_rule(codes::INVALID_MEASURE_TYPE));
    workspace.update_document("t.view.lkml", SOURCE);
    let model = workspace.model();
    assert!(with_code(&model, codes::INVALID_MEASURE_TYPE).is_empty());
    assert_eq!(with_code(&model, codes::DEPRECATED_PARAMETER).len(), 1);
}

#[test]
fn test_severity_override() {
    let mut workspace = Workspace::with_config(
        AnalysisConfig::new().with_severity(codes::DEPRECATED_PARAMETER, Severity::Error),
    );
    workspace.update_document("t.view.lkml", SOURCE);
    let model = workspace.model();
    let deprecated = with_code(&model, codes::DEPRECATED_PARAMETER);
    assert_eq!(deprecated[0].severity, Severity::Error);
}

#[test]
fn test_unused_views_switch() {
    let mut workspace = Workspace::new();
    workspace.update_document("t.view.lkml", SOURCE);
    assert_eq!(with_code(&workspace.model(), codes::UNUSED_VIEW).len(), 1);

    workspace.set_config(AnalysisConfig::new().with_unused_views(false));
    assert!(with_code(&workspace.model(), codes::UNUSED_VIEW).is_empty());
}

#[test]
fn test_extra_deprecated_parameter() {
    let mut workspace =
        Workspace::with_config(AnalysisConfig::new().with_deprecated_parameter("hidden"));
    workspace.update_document("v.view.lkml", "view: v { dimension: d { hidden: yes sql: 1 ;; } }");
    assert_eq!(with_code(&workspace.model(), codes::DEPRECATED_PARAMETER).len(), 1);
}

#[test]
fn test_unknown_code_rejected() {
    let config = AnalysisConfig::new().disable_rule("no-such-rule");
    assert!(matches!(config.validate(), Err(ConfigError::UnknownCode(code)) if code == "no-such-rule"));
    assert!(AnalysisConfig::default().validate().is_ok());
}

#[cfg(feature = "serde")]
#[test]
fn test_config_from_json() {
    let config = AnalysisConfig::from_json(
        r#"{ "disabled_rules": ["naming-convention"], "severity_overrides": { "unused-view": "warning" } }"#,
    )
    .unwrap();
    assert!(!config.is_enabled(codes::NAMING_CONVENTION));
    assert!(config.report_unused_views);
    assert!(AnalysisConfig::from_json(r#"{ "disabled_rules": ["bogus"] }"#).is_err());
}
