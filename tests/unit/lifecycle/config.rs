use super::*;

#[test]
fn defaults_are_valid() {
    let o = GlassOpts::default();
    o.validate().unwrap();
    assert_eq!(o.max_measure_attempts, 600);
    assert_eq!(o.resolution, 1.0);
    assert_eq!(o.id_prefix, "liquid-glass");
}

#[test]
fn partial_json_fills_defaults() {
    let o = GlassOpts::from_json_str(r#"{ "max_measure_attempts": 3, "resolution": 0.5 }"#).unwrap();
    assert_eq!(o.max_measure_attempts, 3);
    assert_eq!(o.resolution, 0.5);
    assert!(!o.parallel);
    assert_eq!(o.id_seed, None);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = GlassOpts::from_json_str(r#"{ "canvas_dpi": 2 }"#).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

#[test]
fn ranges_are_validated() {
    assert!(GlassOpts::from_json_str(r#"{ "max_measure_attempts": 0 }"#).is_err());
    assert!(GlassOpts::from_json_str(r#"{ "resolution": 0.0 }"#).is_err());
    assert!(GlassOpts::from_json_str(r#"{ "resolution": -1.0 }"#).is_err());
    assert!(GlassOpts::from_json_str(r#"{ "id_prefix": "" }"#).is_err());
    assert!(GlassOpts::from_json_str(r#"{ "id_prefix": "a b" }"#).is_err());
    assert!(GlassOpts::from_json_str(r#"{ "max_texture_dim": 0 }"#).is_err());
}

#[test]
fn from_path_reads_file() {
    let dir = std::path::PathBuf::from("target").join("config_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("opts.json");
    std::fs::write(&path, r#"{ "id_prefix": "card", "id_seed": 9 }"#).unwrap();
    let o = GlassOpts::from_path(&path).unwrap();
    assert_eq!(o.id_prefix, "card");
    assert_eq!(o.id_seed, Some(9));

    assert!(GlassOpts::from_path(dir.join("missing.json")).is_err());
}
