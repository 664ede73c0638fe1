mod tests {
    use ambient_light_core::color::BLACK;
    use ambient_light_core::{
        ConfigurationError, ImageFrame, LedGeometry, LedLayout, MappingType, Rgb, SpatialMapper,
    };

    const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    const FULL: (f64, f64) = (0.0, 1.0);
    const LEFT: (f64, f64) = (0.0, 0.5);
    const RIGHT: (f64, f64) = (0.5, 1.0);

    /// Left half red, right half blue
    fn split_image(width: u32, height: u32) -> ImageFrame {
        let mut image = ImageFrame::filled(width, height, BLUE);
        for y in 0..height {
            for x in 0..width / 2 {
                image.set(x, y, RED);
            }
        }
        image
    }

    fn halves() -> Vec<LedGeometry> {
        vec![
            LedGeometry::new(0, LEFT, FULL),
            LedGeometry::new(1, RIGHT, FULL),
        ]
    }

    #[test]
    fn test_full_viewport_solid_color() {
        let color = Rgb::new(12, 34, 56);
        let mapper = SpatialMapper::new(8, 6, 0, 0, &[LedGeometry::new(0, FULL, FULL)]).unwrap();
        let colors = mapper
            .mean_led_colors(&ImageFrame::filled(8, 6, color))
            .unwrap();
        assert_eq!(colors, vec![color]);
        assert_eq!(mapper.pixel_indices(0).unwrap().len(), 48);
    }

    #[test]
    fn test_split_image() {
        let mapper = SpatialMapper::new(4, 2, 0, 0, &halves()).unwrap();
        let colors = mapper.mean_led_colors(&split_image(4, 2)).unwrap();
        assert_eq!(colors, vec![RED, BLUE]);
    }

    #[test]
    fn test_results_follow_led_index() {
        let geometry = vec![
            LedGeometry::new(1, LEFT, FULL),
            LedGeometry::new(0, RIGHT, FULL),
        ];
        let mapper = SpatialMapper::new(4, 2, 0, 0, &geometry).unwrap();
        let colors = mapper.mean_led_colors(&split_image(4, 2)).unwrap();
        assert_eq!(colors, vec![BLUE, RED]);
    }

    #[test]
    fn test_borders_are_cropped() {
        let mut image = ImageFrame::filled(10, 10, WHITE);
        for y in 1..9 {
            for x in 1..9 {
                image.set(x, y, BLACK);
            }
        }

        let mapper = SpatialMapper::new(10, 10, 1, 1, &[LedGeometry::new(0, FULL, FULL)]).unwrap();
        assert_eq!(mapper.pixel_indices(0).unwrap().len(), 64);
        assert_eq!(mapper.mean_led_colors(&image).unwrap(), vec![BLACK]);
    }

    #[test]
    fn test_degenerate_range_samples_one_pixel() {
        // both edges round to column 5
        let geometry = [LedGeometry::new(0, (0.51, 0.52), FULL)];
        let mapper = SpatialMapper::new(10, 2, 0, 0, &geometry).unwrap();
        assert_eq!(mapper.pixel_indices(0).unwrap(), &[5, 15]);
    }

    #[test]
    fn test_degenerate_range_at_far_edge() {
        let geometry = [LedGeometry::new(0, (0.99, 0.999), FULL)];
        let mapper = SpatialMapper::new(10, 2, 0, 0, &geometry).unwrap();
        assert_eq!(mapper.pixel_indices(0).unwrap(), &[9, 19]);
    }

    #[test]
    fn test_zero_area_is_black() {
        let geometry = [LedGeometry::new(0, (0.5, 0.5), FULL)];
        let mapper = SpatialMapper::new(10, 10, 0, 0, &geometry).unwrap();
        assert!(mapper.pixel_indices(0).unwrap().is_empty());
        assert_eq!(
            mapper
                .mean_led_colors(&ImageFrame::filled(10, 10, WHITE))
                .unwrap(),
            vec![BLACK]
        );
    }

    #[test]
    fn test_mean_truncates() {
        let image = ImageFrame::new(2, 1, vec![Rgb::new(10, 0, 0), Rgb::new(11, 0, 0)]).unwrap();
        let mapper = SpatialMapper::new(2, 1, 0, 0, &[LedGeometry::new(0, FULL, FULL)]).unwrap();
        assert_eq!(mapper.mean_led_colors(&image).unwrap(), vec![Rgb::new(10, 0, 0)]);
    }

    #[test]
    fn test_size_mismatch() {
        let mapper = SpatialMapper::new(4, 4, 0, 0, &halves()).unwrap();
        assert_eq!(
            mapper.mean_led_colors(&ImageFrame::filled(5, 5, RED)),
            Err(ConfigurationError::ImageSizeMismatch {
                expected_width: 4,
                expected_height: 4,
                actual_width: 5,
                actual_height: 5,
            })
        );
    }

    #[test]
    fn test_empty_active_area() {
        assert_eq!(
            SpatialMapper::new(4, 4, 2, 0, &halves()).unwrap_err(),
            ConfigurationError::EmptyActiveArea {
                width: 4,
                height: 4,
                horizontal: 2,
                vertical: 0,
            }
        );
    }

    #[test]
    fn test_invalid_geometry() {
        let reversed = [LedGeometry::new(0, (0.6, 0.4), FULL)];
        assert_eq!(
            SpatialMapper::new(4, 4, 0, 0, &reversed).unwrap_err(),
            ConfigurationError::InvalidGeometry { index: 0 }
        );

        let outside = [LedGeometry::new(0, FULL, (0.0, 1.5))];
        assert!(SpatialMapper::new(4, 4, 0, 0, &outside).is_err());
    }

    #[test]
    fn test_invalid_led_index() {
        let duplicated = [
            LedGeometry::new(0, LEFT, FULL),
            LedGeometry::new(0, RIGHT, FULL),
        ];
        assert_eq!(
            SpatialMapper::new(4, 4, 0, 0, &duplicated).unwrap_err(),
            ConfigurationError::InvalidLedIndex {
                index: 0,
                led_count: 2,
            }
        );

        let out_of_range = [LedGeometry::new(3, LEFT, FULL)];
        assert!(SpatialMapper::new(4, 4, 0, 0, &out_of_range).is_err());
    }

    #[test]
    fn test_unicolor_mean() {
        let layout = LedLayout::new(halves()).with_mapping(MappingType::UnicolorMean);
        let mapper = layout.mapper(4, 2).unwrap();
        let colors = mapper
            .led_colors(&split_image(4, 2), layout.mapping)
            .unwrap();
        assert_eq!(colors, vec![Rgb::new(127, 0, 127); 2]);
    }

    #[test]
    fn test_layout_builds_mapper() {
        let layout = LedLayout::new(halves()).with_borders(1, 0);
        let mapper = layout.mapper(4, 4).unwrap();
        assert_eq!((mapper.width(), mapper.height()), (4, 4));
        assert_eq!(mapper.led_count(), 2);
        // rows 1 and 2 of columns 0 and 1
        assert_eq!(mapper.pixel_indices(0).unwrap(), &[4, 5, 8, 9]);
    }

    #[test]
    fn test_mapping_type_names() {
        assert_eq!(
            MappingType::parse_from_str("unicolor_mean"),
            Ok(MappingType::UnicolorMean)
        );
        assert_eq!(MappingType::MulticolorMean.as_str(), "multicolor_mean");
        assert!(MappingType::parse_from_str("average").is_err());
    }

    #[test]
    fn test_image_pixel_count() {
        assert_eq!(
            ImageFrame::new(2, 2, vec![RED; 3]).unwrap_err(),
            ConfigurationError::PixelCountMismatch {
                width: 2,
                height: 2,
                expected: 4,
                actual: 3,
            }
        );
        let image = ImageFrame::new(2, 1, vec![RED, BLUE]).unwrap();
        assert_eq!(image.get(1, 0), Some(BLUE));
        assert_eq!(image.get(2, 0), None);
    }
}
