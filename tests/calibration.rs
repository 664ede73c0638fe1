mod tests {
    use ambient_light_core::{
        AdjustmentConfig, CalibrationProfile, ChannelAdjustmentLut, ChannelTransform,
        ChannelTransformConfig, ColorAdjustment, ConfigurationError, HueGainTransform,
        ProfileConfig, Rgb, Rgbw, WhiteAlgorithm,
    };

    const SAMPLES: [Rgb; 6] = [
        Rgb { r: 0, g: 0, b: 0 },
        Rgb { r: 255, g: 255, b: 255 },
        Rgb { r: 200, g: 100, b: 50 },
        Rgb { r: 1, g: 128, b: 254 },
        Rgb { r: 17, g: 17, b: 200 },
        Rgb { r: 255, g: 0, b: 0 },
    ];

    #[test]
    fn test_identity_transform() {
        let transform = ChannelTransform::default();
        for value in 0..=255u8 {
            assert_eq!(transform.transform(value), value);
        }
    }

    #[test]
    fn test_threshold() {
        let transform = ChannelTransform::new(0.5, 1.0, 0.0, 1.0);
        assert_eq!(transform.transform(127), 0);
        assert_eq!(transform.transform(128), 128);
        assert_eq!(transform.transform(255), 255);
    }

    #[test]
    fn test_gamma() {
        let transform = ChannelTransform::new(0.0, 2.0, 0.0, 1.0);
        assert_eq!(transform.transform(0), 0);
        assert_eq!(transform.transform(128), 64);
        assert_eq!(transform.transform(255), 255);
    }

    #[test]
    fn test_levels() {
        let transform = ChannelTransform::new(0.0, 1.0, 0.2, 0.8);
        assert_eq!(transform.transform(0), 51);
        assert_eq!(transform.transform(255), 204);
    }

    #[test]
    fn test_output_is_clamped() {
        let transform = ChannelTransform::new(0.0, 1.0, 0.0, 2.0);
        assert_eq!(transform.transform(128), 255);
        assert_eq!(transform.transform(255), 255);

        let nan = ChannelTransform::new(0.0, f64::NAN, 0.0, 1.0);
        assert_eq!(nan.transform(200), 0);
    }

    #[test]
    fn test_setter_rebuilds_table() {
        let mut transform = ChannelTransform::default();
        transform.set_gamma(2.0);
        assert_eq!(transform.transform(128), 64);
        assert_eq!(
            transform.config(),
            ChannelTransformConfig {
                gamma: 2.0,
                ..ChannelTransformConfig::default()
            }
        );

        transform.set_whitelevel(0.5);
        assert_eq!(transform.transform(255), 128);
    }

    #[test]
    fn test_adjustment_lut() {
        let lut = ChannelAdjustmentLut::new(255, 128, 0);
        assert_eq!(lut.adjust_r(200), 200);
        assert_eq!(lut.adjust_g(255), 128);
        assert_eq!(lut.adjust_g(100), 50);
        assert_eq!(lut.adjust_b(255), 0);
        assert_eq!(lut.adjustment(), Rgb::new(255, 128, 0));
        assert_eq!(lut.apply(Rgb::new(10, 255, 255)), Rgb::new(10, 128, 0));
    }

    #[test]
    fn test_default_adjustment_is_identity() {
        let adjustment = ColorAdjustment::default();
        for color in SAMPLES {
            assert_eq!(adjustment.apply(color), color);
        }
    }

    #[test]
    fn test_dimmed_reference() {
        let adjustment = ColorAdjustment::from_config(&AdjustmentConfig {
            red: Rgb::new(200, 0, 0),
            ..AdjustmentConfig::default()
        });
        assert_eq!(adjustment.apply(Rgb::new(255, 0, 0)), Rgb::new(200, 0, 0));
        assert_eq!(adjustment.apply(Rgb::new(0, 255, 0)), Rgb::new(0, 255, 0));
        assert_eq!(adjustment.config().red, Rgb::new(200, 0, 0));
    }

    #[test]
    fn test_tinted_reference() {
        let adjustment = ColorAdjustment::from_config(&AdjustmentConfig {
            red: Rgb::new(255, 50, 0),
            ..AdjustmentConfig::default()
        });
        assert_eq!(adjustment.apply(Rgb::new(255, 0, 0)), Rgb::new(255, 50, 0));
        // pure green has no red excess, the tint does not leak in
        assert_eq!(adjustment.apply(Rgb::new(0, 255, 0)), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_hue_gain_identity() {
        let gain = HueGainTransform::default();
        assert!(gain.is_identity());
        for color in SAMPLES {
            assert_eq!(gain.apply(color), color);
        }
    }

    #[test]
    fn test_value_gain() {
        assert_eq!(
            HueGainTransform::new(1.0, 0.0).apply(Rgb::new(200, 100, 50)),
            Rgb::new(0, 0, 0)
        );
        assert_eq!(
            HueGainTransform::new(1.0, 2.0).apply(Rgb::new(100, 100, 100)),
            Rgb::new(200, 200, 200)
        );
    }

    #[test]
    fn test_saturation_gain() {
        let gray = HueGainTransform::new(0.0, 1.0).apply(Rgb::new(200, 100, 50));
        assert_eq!(gray, Rgb::new(200, 200, 200));
    }

    #[test]
    fn test_subtract_minimum() {
        assert_eq!(
            WhiteAlgorithm::SubtractMinimum.convert(Rgb::new(200, 100, 50)),
            Rgbw::new(150, 50, 0, 50)
        );
    }

    #[test]
    fn test_white_off() {
        assert_eq!(
            WhiteAlgorithm::WhiteOff.convert(Rgb::new(200, 100, 50)),
            Rgbw::new(200, 100, 50, 0)
        );
    }

    #[test]
    fn test_weighted_white() {
        let gray = Rgb::new(100, 100, 100);
        assert_eq!(
            WhiteAlgorithm::SubMinWarmAdjust.convert(gray),
            Rgbw::new(1, 40, 88, 27)
        );
        assert_eq!(
            WhiteAlgorithm::SubMinCoolAdjust.convert(gray),
            Rgbw::new(63, 81, 3, 11)
        );
    }

    #[test]
    fn test_white_algorithm_names() {
        for algorithm in [
            WhiteAlgorithm::SubtractMinimum,
            WhiteAlgorithm::SubMinWarmAdjust,
            WhiteAlgorithm::SubMinCoolAdjust,
            WhiteAlgorithm::WhiteOff,
        ] {
            assert_eq!(WhiteAlgorithm::parse_from_str(algorithm.as_str()), Ok(algorithm));
        }
        assert_eq!(
            WhiteAlgorithm::parse_from_str("rgbw_magic"),
            Err(ConfigurationError::UnknownWhiteAlgorithm("rgbw_magic".into()))
        );
        assert_eq!(
            WhiteAlgorithm::parse_or_default("rgbw_magic"),
            WhiteAlgorithm::WhiteOff
        );
    }

    #[test]
    fn test_neutral_profile() {
        let profile = CalibrationProfile::from_config(&ProfileConfig::neutral("neutral"));
        assert_eq!(profile.id(), "neutral");
        for color in SAMPLES {
            assert_eq!(profile.apply(color), color);
        }
    }

    #[test]
    fn test_profile_stages() {
        let half = ChannelTransformConfig {
            whitelevel: 0.5,
            ..ChannelTransformConfig::default()
        };
        let profile = CalibrationProfile::from_config(&ProfileConfig {
            red: half,
            green: half,
            blue: half,
            saturation_gain: 0.0,
            white_algorithm: WhiteAlgorithm::SubtractMinimum,
            ..ProfileConfig::neutral("dim")
        });
        assert_eq!(profile.apply(Rgb::new(200, 100, 50)), Rgb::new(100, 100, 100));
        assert_eq!(profile.white_algorithm(), WhiteAlgorithm::SubtractMinimum);
    }
}
