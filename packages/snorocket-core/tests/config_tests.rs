//! Configuration loading and its effect on the classifier

use snorocket_core::{Classifier, ClassifierConfig, ClassifierError, ConfigError, Preset};

#[test]
fn test_yaml_file_drives_classifier() {
    let path = std::env::temp_dir().join(format!("snorocket-config-{}.yaml", std::process::id()));
    std::fs::write(
        &path,
        "preset: sequential\nnum_threads: 2\nparallel_threshold: 4\nincremental: false\n",
    )
    .unwrap();

    let config = ClassifierConfig::from_yaml(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.preset, Preset::Sequential);
    assert_eq!(config.num_threads, Some(2));
    assert!(!config.incremental);
    assert_eq!(
        config.max_overlay_depth,
        ClassifierConfig::from_preset(Preset::Sequential).max_overlay_depth
    );

    let classifier = Classifier::new(config).unwrap();
    assert_eq!(classifier.config().parallel_threshold, 4);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("snorocket-config-does-not-exist.yaml");
    assert!(matches!(ClassifierConfig::from_yaml(&path), Err(ConfigError::Io(_))));
}

#[test]
fn test_invalid_config_rejected_by_classifier() {
    let config = ClassifierConfig::default().parallel_threshold(0);
    match Classifier::new(config) {
        Err(ClassifierError::Config(ConfigError::Range { field, .. })) => {
            assert_eq!(field, "parallel_threshold")
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("invalid configuration accepted"),
    }
}

#[test]
fn test_unknown_preset_name() {
    assert!(matches!(
        Preset::from_str("turbo"),
        Err(ConfigError::UnknownPreset(name)) if name == "turbo"
    ));
    assert_eq!(Preset::from_str("throughput").unwrap(), Preset::Throughput);
}
