mod common;

use footsize::ClusteringConfig;

use common::*;

#[test]
fn test_defaults() {
    let config = EstimatorConfig::default();
    assert_eq!(config.paper, PaperSize::A4);
    assert_eq!(config.clustering, ClusteringConfig::default());
    assert_eq!(config.clustering.seed, 0);
    assert_eq!(config.overlay_color, [255, 0, 0]);
}

#[test]
fn test_empty_toml_is_default() -> anyhow::Result<()> {
    assert_eq!(EstimatorConfig::from_toml("")?, EstimatorConfig::default());
    Ok(())
}

#[test]
fn test_partial_toml_keeps_other_defaults() -> anyhow::Result<()> {
    let config = EstimatorConfig::from_toml("[clustering]\nseed = 7\n")?;
    assert_eq!(config.clustering.seed, 7);
    assert_eq!(config.clustering.max_iterations, 300);
    assert_eq!(config.paper, PaperSize::A4);

    let config = EstimatorConfig::from_toml("overlay_color = [0, 0, 255]\n[paper]\nwidth_mm = 216.0\n")?;
    assert_eq!(config.overlay_color, [0, 0, 255]);
    assert_eq!(config.paper.width_mm, 216.0);
    assert_eq!(config.paper.height_mm, 297.0);
    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() {
    for content in [
        "[paper]\nwidth_mm = -1.0\n",
        "[paper]\nheight_mm = 0.0\n",
        "[clustering]\nmax_iterations = 0\n",
        "overlay_color = \"blue\"\n",
        "not toml at all [",
    ] {
        let err = EstimatorConfig::from_toml(content).unwrap_err();
        assert!(matches!(err, FootError::Config { .. }), "{content:?}");
    }
}

#[test]
fn test_load_from_file() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("footsize.toml");
    std::fs::write(&path, "[clustering]\nseed = 42\ntolerance = 0.001\n")?;

    let config = EstimatorConfig::load(&path)?;
    assert_eq!(config.clustering.seed, 42);
    assert_eq!(config.clustering.tolerance, 0.001);

    let missing = EstimatorConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(missing, FootError::Io { .. }));
    Ok(())
}

#[test]
fn test_paper_aspect_ratio() {
    assert!((PaperSize::A4.aspect_ratio() - 297.0 / 210.0).abs() < 1e-12);
    let landscape = PaperSize {
        width_mm: 297.0,
        height_mm: 210.0,
    };
    assert_eq!(landscape.aspect_ratio(), PaperSize::A4.aspect_ratio());
}
