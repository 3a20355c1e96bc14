#[cfg(test)]
mod tests {
    use std::fs;

    use float_cmp::approx_eq;
    use image::{GrayImage, Luma};
    use ndarray::Array2;
    use rand::SeedableRng;
    use rand::prelude::SmallRng;
    use test_case::test_case;

    use bsf::config::BSFConfig;
    use bsf::io;
    use bsf::opt::bsf_color::BSFOptimizerColor;
    use bsf::opt::bsf_gray::BSFOptimizerGray;
    use bsf::opt::default_init;
    use stringart_rs::builder::Limits;
    use stringart_rs::canvas::Canvas;
    use stringart_rs::nails::LayoutConfig;
    use stringart_rs::render::{RGB_TINTS, render_color, render_grayscale, scale_nails};
    use stringart_rs::score::{DarknessSum, SquaredError, Strategy};

    fn small_config() -> BSFConfig {
        BSFConfig {
            layout: LayoutConfig::Rectangle { nail_step: 4 },
            strategy: Strategy::SquaredError(SquaredError {
                strength: -0.05,
                subsample: None,
            }),
            limits: Limits {
                max_steps: Some(40),
                failure_cap: Some(3),
            },
            working_side: 40,
            export_side: 80,
            export_strength: 0.18,
            dark_background: false,
            color: false,
            prng_seed: Some(0),
        }
    }

    fn gradient_target(side: usize) -> Canvas {
        let pixels = Array2::from_shape_fn((side, side), |(r, c)| {
            ((r as f32 - side as f32 / 2.0).hypot(c as f32 - side as f32 / 2.0)
                / (side as f32 / 2.0))
                .clamp(0.0, 1.0)
        });
        Canvas::from_pixels(pixels).unwrap()
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = BSFConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: BSFConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), serde_json::to_string(&config).unwrap());
    }

    #[test]
    fn grayscale_pipeline_produces_a_renderable_pull_order() {
        let config = small_config();
        let target = gradient_target(config.working_side);

        let mut optimizer =
            BSFOptimizerGray::new(target, config, SmallRng::seed_from_u64(0)).unwrap();
        let result = optimizer
            .solve(default_init(&config.strategy, 0))
            .unwrap();
        assert!(result.pull_order.len() >= 2);

        let export_shape = (config.export_side, config.export_side);
        let nails =
            scale_nails(&optimizer.layout.nails, optimizer.layout.shape, export_shape).unwrap();
        let render =
            render_grayscale(&result.pull_order, &nails, export_shape, -config.export_strength)
                .unwrap();
        assert_eq!(render.shape(), export_shape);
        // a dark center ring should have pulled threads across the canvas
        assert!(render.pixels.iter().any(|&v| v < 1.0));
    }

    #[test]
    fn grayscale_pipeline_is_reproducible() {
        let config = small_config();
        let run = || {
            let mut optimizer = BSFOptimizerGray::new(
                gradient_target(config.working_side),
                config,
                SmallRng::seed_from_u64(7),
            )
            .unwrap();
            optimizer.solve(default_init(&config.strategy, 0)).unwrap()
        };
        assert_eq!(run().pull_order, run().pull_order);
    }

    #[test]
    fn color_pipeline_interleaves_three_channels() {
        let mut config = small_config();
        config.color = true;
        config.strategy = Strategy::DarknessSum(DarknessSum {
            min_distance: 5.0,
            fade: 0.4,
        });
        config.limits = Limits {
            max_steps: Some(20),
            failure_cap: None,
        };

        // red channel darkest: its target attracts the most thread
        let targets = [
            gradient_target(config.working_side),
            Canvas::filled((config.working_side, config.working_side), 0.8).unwrap(),
            Canvas::filled((config.working_side, config.working_side), 0.9).unwrap(),
        ];
        let mut optimizer =
            BSFOptimizerColor::new(targets, config, SmallRng::seed_from_u64(0)).unwrap();
        let results = optimizer.solve(default_init(&config.strategy, 0)).unwrap();

        let export_shape = (config.export_side, config.export_side);
        let nails =
            scale_nails(&optimizer.layout.nails, optimizer.layout.shape, export_shape).unwrap();
        let orders = [
            results[0].pull_order.clone(),
            results[1].pull_order.clone(),
            results[2].pull_order.clone(),
        ];
        let render = render_color(
            &orders,
            &nails,
            export_shape,
            RGB_TINTS,
            -config.export_strength,
        )
        .unwrap();
        assert_eq!(
            render.shape(),
            &[config.export_side, config.export_side, 3]
        );
        assert!(render.iter().any(|&v| v < 1.0));
    }

    #[test_case(24; "small working canvas")]
    #[test_case(40; "larger working canvas")]
    fn read_target_crops_resizes_and_dims(working_side: usize) {
        let path = std::env::temp_dir().join(format!("bsf_test_target_{working_side}.png"));
        let img = GrayImage::from_fn(64, 48, |x, _| Luma([if x < 32 { 0 } else { 255 }]));
        img.save(&path).unwrap();

        let target = io::read_target(&path, working_side).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(target.shape(), (working_side, working_side));
        // dimming caps the brightest pixels at 90% intensity
        let brightest = target.pixels.iter().cloned().fold(0.0f32, f32::max);
        assert!(approx_eq!(f32, brightest, 0.9, epsilon = 1e-3));
        assert!(target.pixels.iter().any(|&v| v < 0.1));
    }

    #[test]
    fn sections_chain_through_the_final_nail() {
        let mut config = small_config();
        config.strategy = Strategy::DarknessSum(DarknessSum {
            min_distance: 5.0,
            fade: 0.4,
        });
        config.limits = Limits {
            max_steps: Some(10),
            failure_cap: None,
        };
        let side = config.working_side;

        let mut first =
            BSFOptimizerGray::new(gradient_target(side), config, SmallRng::seed_from_u64(0))
                .unwrap();
        let (first_result, handover) = first.solve_section(0).unwrap();
        assert_eq!(handover, *first_result.pull_order.last().unwrap());

        // the next section picks the thread up exactly where it was left
        let mut second =
            BSFOptimizerGray::new(gradient_target(side), config, SmallRng::seed_from_u64(1))
                .unwrap();
        let (second_result, _) = second.solve_section(handover).unwrap();
        assert_eq!(second_result.pull_order[0], handover);

        // handover indices past the layout end are clamped to the last nail
        let mut third =
            BSFOptimizerGray::new(gradient_target(side), config, SmallRng::seed_from_u64(2))
                .unwrap();
        let (third_result, _) = third.solve_section(usize::MAX).unwrap();
        assert_eq!(third_result.pull_order[0], third.layout.len() - 1);
    }

    #[test]
    fn instructions_are_one_based() {
        let path = std::env::temp_dir().join("bsf_test_instructions.txt");
        fs::remove_file(&path).ok();

        io::append_instructions(&path, "seccion_1", &[0, 4, 2]).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(contents.contains("seccion_1"));
        assert!(contents.contains("1-5-3"));
    }
}
