mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ambient_light_core::{
        CalibrationConfig, CalibrationPipeline, CalibrationProfile, ImageFrame, InputPayload,
        Instant, IntentChannel, LedGeometry, LedLayout, LedRange, ProfileConfig, RenderIntent,
        Renderer, RendererConfig, Rgb, SharedArbitrator,
    };
    use tracing::span::{Attributes, Id, Record};
    use tracing::subscriber::Interest;
    use tracing::{Event, Level, Metadata, Subscriber};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    /// Counts `WARN` events
    #[derive(Clone, Default)]
    struct WarnCounter {
        warnings: Arc<AtomicUsize>,
    }

    impl WarnCounter {
        fn count(&self) -> usize {
            self.warnings.load(Ordering::SeqCst)
        }
    }

    impl Subscriber for WarnCounter {
        fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
            Interest::sometimes()
        }

        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _span: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }

        fn record(&self, _span: &Id, _values: &Record<'_>) {}

        fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

        fn event(&self, event: &Event<'_>) {
            if *event.metadata().level() == Level::WARN {
                self.warnings.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn enter(&self, _span: &Id) {}

        fn exit(&self, _span: &Id) {}
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn config(assigned_up_to: u32) -> RendererConfig {
        RendererConfig {
            led_count: 3,
            layout: LedLayout::new(vec![
                LedGeometry::new(0, (0.0, 0.3), (0.0, 1.0)),
                LedGeometry::new(1, (0.3, 0.6), (0.0, 1.0)),
                LedGeometry::new(2, (0.6, 1.0), (0.0, 1.0)),
            ]),
            calibration: CalibrationConfig {
                profiles: vec![ProfileConfig::neutral("default")],
                assignments: vec![LedRange::new(0, assigned_up_to, "default")],
            },
            ..RendererConfig::default()
        }
    }

    #[test]
    fn test_unassigned_leds_warn_once_per_pipeline() {
        let counter = WarnCounter::default();
        tracing::subscriber::with_default(counter.clone(), || {
            let arb = SharedArbitrator::new(3);
            let intents = IntentChannel::<4>::new();
            let mut renderer = Renderer::new(&arb, intents.receiver(), &config(1)).unwrap();
            arb.set_input(10, InputPayload::Colors(vec![RED]), None)
                .unwrap();

            for tick in 0..5 {
                renderer.render(at(tick));
            }
            assert_eq!(counter.count(), 1);

            // a fresh pipeline with a gap reports again, once
            let mut pipeline = CalibrationPipeline::new(
                3,
                vec![CalibrationProfile::from_config(&ProfileConfig::neutral(
                    "default",
                ))],
            )
            .unwrap();
            pipeline.assign(0, 0, "default").unwrap();
            intents
                .sender()
                .try_send(RenderIntent::Calibration(Box::new(pipeline)))
                .unwrap();
            for tick in 5..10 {
                renderer.render(at(tick));
            }
            assert_eq!(counter.count(), 2);
        });
    }

    #[test]
    fn test_unmappable_image_warns_once_per_size() {
        let counter = WarnCounter::default();
        tracing::subscriber::with_default(counter.clone(), || {
            let arb = SharedArbitrator::new(3);
            let intents = IntentChannel::<4>::new();
            let config = RendererConfig {
                layout: config(2).layout.with_borders(2, 0),
                ..config(2)
            };
            let mut renderer = Renderer::new(&arb, intents.receiver(), &config).unwrap();

            arb.set_input(5, InputPayload::Image(ImageFrame::filled(4, 4, RED)), None)
                .unwrap();
            for tick in 0..5 {
                renderer.render(at(tick));
            }
            assert_eq!(counter.count(), 1);

            arb.set_input(5, InputPayload::Image(ImageFrame::filled(6, 3, RED)), None)
                .unwrap();
            for tick in 5..10 {
                renderer.render(at(tick));
            }
            assert_eq!(counter.count(), 2);
        });
    }

    #[test]
    fn test_complete_calibration_is_silent() {
        let counter = WarnCounter::default();
        tracing::subscriber::with_default(counter.clone(), || {
            let arb = SharedArbitrator::new(3);
            let intents = IntentChannel::<4>::new();
            let mut renderer = Renderer::new(&arb, intents.receiver(), &config(2)).unwrap();
            arb.set_input(5, InputPayload::Image(ImageFrame::filled(4, 4, RED)), None)
                .unwrap();
            for tick in 0..5 {
                renderer.render(at(tick));
            }
        });
        assert_eq!(counter.count(), 0);
    }
}
