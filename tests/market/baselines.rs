use dat_market::market::{
    Baseline, FixedSampler, Resource, SizeSampler, UniformSampler, best_charge, generate_users,
    run_greedy_max, run_greedy_min, run_offline_optimal, run_random, select_max_fit,
    select_min_fit,
};

use crate::{assert_close, config, pool, user};

const ALL_BASELINES: [Baseline; 4] = [
    Baseline::Random,
    Baseline::GreedyMinFit,
    Baseline::GreedyMaxFit,
    Baseline::OfflineOptimal,
];

#[test]
fn given_no_users_when_running_any_baseline_then_revenue_is_exactly_zero() {
    for baseline in ALL_BASELINES {
        let mut resources = pool(&[4, 8]);
        let revenue = baseline.run(&[], &mut resources, &config(0.5), &mut UniformSampler::seeded(1));
        assert_eq!(revenue, 0.0, "{baseline:?}");
    }
}

#[test]
fn given_no_resources_when_running_any_baseline_then_revenue_is_exactly_zero() {
    let users = vec![user(0, 1, 10), user(1, 3, 20)];
    for baseline in ALL_BASELINES {
        let revenue = baseline.run(&users, &mut [], &config(0.5), &mut UniformSampler::seeded(1));
        assert_eq!(revenue, 0.0, "{baseline:?}");
    }
}

#[test]
fn given_fixed_pool_when_running_random_then_each_user_gets_one_shot() {
    let users = vec![user(0, 1, 10), user(1, 3, 10), user(2, 2, 10)];
    let mut resources = pool(&[5, 2]);

    let revenue = run_random(&users, &mut resources, &config(0.5), &mut FixedSampler::new());

    // round-robin picks: user0 -> size 5, user1 -> size 2 (too small), user2 -> size 5
    assert_close(revenue, (0.1 + 0.3 * 4.0) + (0.2 + 0.3 * 3.0));
}

#[test]
fn given_fixed_pool_when_running_greedy_policies_then_min_and_max_fit_are_charged() {
    let users = vec![user(0, 2, 50)];
    let config = config(0.5);

    let min_fit = run_greedy_min(&users, &mut pool(&[1, 3, 7, 5]), &config, &mut FixedSampler::new());
    let max_fit = run_greedy_max(&users, &mut pool(&[1, 3, 7, 5]), &config, &mut FixedSampler::new());
    let optimal =
        run_offline_optimal(&users, &mut pool(&[1, 3, 7, 5]), &config, &mut FixedSampler::new());

    assert_close(min_fit, 0.2 + 0.3);
    assert_close(max_fit, 0.2 + 0.3 * 5.0);
    assert_close(optimal, max_fit);
}

#[test]
fn given_fixed_sampler_when_running_greedy_policies_then_every_resource_is_probed_per_user() {
    let users = vec![user(0, 2, 50), user(1, 9, 50), user(2, 1, 50)];
    let config = config(0.5);

    let mut min_sampler = FixedSampler::new();
    run_greedy_min(&users, &mut pool(&[1, 3, 7, 5]), &config, &mut min_sampler);
    let mut max_sampler = FixedSampler::new();
    run_greedy_max(&users, &mut pool(&[1, 3, 7, 5]), &config, &mut max_sampler);

    assert_eq!(min_sampler.probes(), 3 * 4);
    assert_eq!(max_sampler.probes(), 3 * 4);
}

#[test]
fn given_fixed_sampler_when_running_random_then_each_user_probes_once() {
    let users = vec![user(0, 1, 10), user(1, 3, 10), user(2, 2, 10), user(3, 9, 10)];
    let mut sampler = FixedSampler::new();

    run_random(&users, &mut pool(&[5, 2]), &config(0.5), &mut sampler);

    assert_eq!(sampler.probes(), 4);
}

#[test]
fn given_seeded_sampler_when_running_greedy_then_sizes_are_redrawn_before_selection() {
    let users = vec![user(0, 1, 10); 10];
    let generated = pool(&[10; 6]);

    for run in [run_greedy_min, run_greedy_max] {
        let mut resources = generated.clone();
        run(&users, &mut resources, &config(0.5), &mut UniformSampler::seeded(11));
        assert_ne!(resources, generated, "greedy probing should have resized the pool");
        assert!(resources.iter().all(|resource| (1..=10).contains(&resource.size)));
    }

    let mut resources = generated.clone();
    run_random(&users, &mut resources, &config(0.5), &mut UniformSampler::seeded(11));
    assert_ne!(resources, generated, "random probing should have resized the pool");
}

#[test]
fn given_baselines_when_user_demand_is_large_then_only_one_charge_is_collected() {
    let users = vec![user(0, 1, 1_000)];
    let revenue = run_greedy_max(&users, &mut pool(&[10]), &config(0.5), &mut FixedSampler::new());
    assert_close(revenue, 0.1 + 0.3 * 9.0);
}

#[test]
fn given_resampled_snapshots_when_selecting_then_greedy_never_picks_an_undersized_resource() {
    let mut sampler = UniformSampler::seeded(5);
    let users = generate_users(50, 10, sampler.rng_mut());
    let mut resources = pool(&[1; 6]);

    for user in &users {
        for resource in resources.iter_mut() {
            sampler.resample(resource, 10);
        }
        if let Some(chosen) = select_min_fit(user, &resources) {
            assert!(chosen.size >= user.min_size());
            assert!(
                resources
                    .iter()
                    .filter(|resource| resource.fits(user))
                    .all(|resource| resource.size >= chosen.size)
            );
        }
        if let Some(chosen) = select_max_fit(user, &resources) {
            assert!(chosen.size >= user.min_size());
            assert!(
                resources
                    .iter()
                    .filter(|resource| resource.fits(user))
                    .all(|resource| resource.size <= chosen.size)
            );
        }
    }
}

#[test]
fn given_same_snapshot_when_comparing_picks_then_offline_best_charge_dominates() {
    let config = config(0.5);
    let mut sampler = UniformSampler::seeded(9);
    let users = generate_users(40, 10, sampler.rng_mut());
    let mut resources = pool(&[1; 8]);

    for user in &users {
        for resource in resources.iter_mut() {
            sampler.resample(resource, 10);
        }
        let best = best_charge(user, &resources, &config);
        let picks: Vec<&Resource> = [
            select_min_fit(user, &resources),
            select_max_fit(user, &resources),
            resources.iter().find(|resource| resource.fits(user)),
        ]
        .into_iter()
        .flatten()
        .collect();

        for pick in picks {
            assert!(best >= config.charge(user, pick));
        }
        assert!(best >= 0.0);
    }
}

#[test]
fn given_random_inputs_when_running_every_baseline_then_revenue_is_non_negative() {
    for seed in 0..6 {
        let mut sampler = UniformSampler::seeded(seed);
        let users = generate_users(30, 10, sampler.rng_mut());
        for baseline in ALL_BASELINES {
            let mut resources = pool(&[10; 10]);
            let revenue = baseline.run(&users, &mut resources, &config(0.5), &mut sampler);
            assert!(revenue >= 0.0, "{baseline:?} returned {revenue}");
            assert!(resources.iter().all(|resource| (1..=10).contains(&resource.size)));
        }
    }
}

#[test]
fn given_shared_pool_when_probing_then_later_runs_see_perturbed_sizes() {
    let users = vec![user(0, 1, 10); 20];
    let generated = pool(&[10; 5]);
    let mut shared = generated.clone();

    run_offline_optimal(&users, &mut shared, &config(0.5), &mut UniformSampler::seeded(3));

    assert_ne!(shared, generated, "offline probing should have resized the shared pool");
    assert!(generated.iter().all(|resource| resource.size == 10));
}
