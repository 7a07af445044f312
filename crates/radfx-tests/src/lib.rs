//! Integration tests for radfx crates.
//!
//! This crate contains end-to-end tests that verify the interaction
//! between PNG decoding, the filter engine and PNG encoding.

#[cfg(test)]
mod tests {
    use std::path::Path;

    use radfx_cli::{read_gray, write_gray};
    use radfx_core::GrayImage;
    use radfx_engine::{FailureKind, FilterConfig, FilterExecutor, FilterKind};
    use tempfile::tempdir;

    /// Synthetic chest-like image: dark lungs inside a brighter body.
    fn chest(width: usize, height: usize) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let fx = x as f64 / width as f64;
            let fy = y as f64 / height as f64;
            let in_body = (0.1..0.9).contains(&fx) && (0.05..0.95).contains(&fy);
            let in_lung = ((0.2..0.45).contains(&fx) || (0.55..0.8).contains(&fx))
                && (0.2..0.8).contains(&fy);
            let base = match (in_body, in_lung) {
                (_, true) => 40.0,
                (true, false) => 170.0,
                (false, false) => 10.0,
            };
            base + ((x * 3 + y * 5) % 9) as f64
        })
        .unwrap()
    }

    /// Full pipeline: PNG -> executor -> one PNG per filter
    #[test]
    fn test_png_pipeline_all_filters() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("chest.png");
        write_gray(&input, &chest(96, 80)).unwrap();

        let loaded = read_gray(&input).unwrap();
        assert_eq!(loaded.dims(), (96, 80));

        let exec = FilterExecutor::with_defaults().unwrap();
        let names: Vec<&str> = FilterKind::ALL.iter().map(|k| k.name()).collect();
        let batch = exec.apply(&loaded, &names).unwrap();
        assert!(batch.all_ok());

        for result in batch.results() {
            let path = dir.path().join(format!("chest_{}.png", result.name()));
            let out = result.image().unwrap();
            write_gray(&path, out).unwrap();

            // The blur keeps fractional samples; the PNG holds them rounded.
            let (w, h) = out.dims();
            let expected = GrayImage::from_u8(w, h, &out.to_u8()).unwrap();
            let back = read_gray(&path).unwrap();
            assert_eq!(back, expected, "{} did not survive 8-bit encoding", result.name());
        }
    }

    #[test]
    fn test_otsu_separates_lungs() {
        let img = chest(100, 100);
        let exec = FilterExecutor::with_defaults().unwrap();
        let out = exec.apply_one(&img, "otsu").unwrap().into_image().unwrap();

        // Lung interior is background, body is foreground.
        assert_eq!(out.get(30, 50), 0.0);
        assert_eq!(out.get(70, 50), 0.0);
        assert_eq!(out.get(50, 50), 255.0);
        assert_eq!(out.get(50, 10), 255.0);
    }

    #[test]
    fn test_config_file_drives_executor() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("filters.yaml");
        std::fs::write(&cfg_path, "limits:\n  max_dimension: 64\n").unwrap();

        let cfg = FilterConfig::from_file(&cfg_path).unwrap();
        let exec = FilterExecutor::from_config(&cfg).unwrap();
        assert!(exec.apply(&chest(96, 80), &["sobel"]).is_err());
        assert!(exec.apply(&chest(64, 64), &["sobel"]).is_ok());
    }

    #[test]
    fn test_mixed_batch_from_png() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("small.png");
        let small = GrayImage::from_fn(3, 3, |x, y| (x * 80 + y) as f64).unwrap();
        write_gray(&input, &small).unwrap();
        let img = read_gray(Path::new(&input)).unwrap();

        let exec = FilterExecutor::with_defaults().unwrap();
        let batch = exec.apply(&img, &["sobel", "median", "nope", "fourier"]).unwrap();
        let kinds: Vec<Option<FailureKind>> =
            batch.results().iter().map(|r| r.failure().map(|f| f.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(FailureKind::InvalidDimensions),
                Some(FailureKind::UnknownFilter),
                None
            ]
        );
    }
}
