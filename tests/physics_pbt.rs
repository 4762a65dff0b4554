use aviary_core::{Bird, Mask, Pipe, SimConfig};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_displacement_never_exceeds_terminal(
        schedule in prop::collection::vec(any::<bool>(), 1..200)
    ) {
        let config = SimConfig::default();
        let mut bird = Bird::new(230.0, 350.0);

        for &jump in &schedule {
            if jump {
                bird.impulse(&config);
            }
            let before = bird.y;
            bird.advance(&config);
            let displacement = bird.y - before;
            prop_assert!(
                displacement <= config.terminal_displacement,
                "displacement {} exceeded terminal {}",
                displacement,
                config.terminal_displacement
            );
            prop_assert!(bird.y.is_finite());
        }
    }

    #[test]
    fn test_impulse_always_resets_state(
        warmup in 0u32..100,
    ) {
        let config = SimConfig::default();
        let mut bird = Bird::new(230.0, 350.0);
        for _ in 0..warmup {
            bird.advance(&config);
        }

        bird.impulse(&config);
        prop_assert_eq!(bird.velocity, config.impulse_velocity);
        prop_assert_eq!(bird.ticks_since_impulse, 0);
        prop_assert_eq!(bird.launch_height, bird.y);
    }

    #[test]
    fn test_generated_pipes_honor_the_gap_invariant(seed in any::<u64>()) {
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (lo, hi) = config.obstacle_height_range;

        let pipe = Pipe::new(config.obstacle_spawn_x, &mut rng, &config);
        prop_assert!(pipe.gap_y >= lo as f32 && pipe.gap_y < hi as f32);
        prop_assert!(pipe.bottom - pipe.gap_y >= config.gap_size);
        prop_assert!(!pipe.passed);
    }

    #[test]
    fn test_mask_overlap_is_symmetric(
        (aw, ah, a_bits) in mask_strategy(),
        (bw, bh, b_bits) in mask_strategy(),
        dx in -12i32..12,
        dy in -12i32..12,
    ) {
        let a = build_mask(aw, ah, &a_bits);
        let b = build_mask(bw, bh, &b_bits);
        prop_assert_eq!(a.overlaps(&b, (dx, dy)), b.overlaps(&a, (-dx, -dy)));
    }

    #[test]
    fn test_disjoint_bounding_boxes_never_overlap(
        (aw, ah, a_bits) in mask_strategy(),
        (bw, bh, b_bits) in mask_strategy(),
        dy in -12i32..12,
    ) {
        let a = build_mask(aw, ah, &a_bits);
        let b = build_mask(bw, bh, &b_bits);
        prop_assert!(!a.overlaps(&b, (aw as i32, dy)));
        prop_assert!(!a.overlaps(&b, (-(bw as i32), dy)));
    }
}

fn mask_strategy() -> impl Strategy<Value = (usize, usize, Vec<bool>)> {
    (1usize..10, 1usize..10).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<bool>(), w * h).prop_map(move |bits| (w, h, bits))
    })
}

fn build_mask(width: usize, height: usize, bits: &[bool]) -> Mask {
    let rows: Vec<String> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| if bits[y * width + x] { '#' } else { '.' })
                .collect()
        })
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    Mask::from_rows(&rows)
}
