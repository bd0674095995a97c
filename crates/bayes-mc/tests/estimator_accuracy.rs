use bayes_core::RngHandle;
use bayes_mc::{
    gibbs_sampling, gibbs_sampling_with, likelihood_weighting, likelihood_weighting_with,
    rejection_sampling, rejection_sampling_with, EvidenceMode, GibbsOptions, MarkovBlanket,
    RejectionNormalization,
};
use bayes_net::{Evidence, Network, NetworkBuilder, Query};

const SAMPLES: usize = 50_000;
const TOLERANCE: f64 = 0.02;

// P(B=b1) = 0.55, P(C=c1) = 0.675, P(A=a1 | C=c1) = 0.4 / 0.675.
fn chain_network() -> Network {
    NetworkBuilder::new()
        .variable("A", ["a1", "a2"])
        .variable("B", ["b1", "b2"])
        .variable("C", ["c1", "c2"])
        .parents("B", ["A"])
        .parents("C", ["B"])
        .row("B", ["a1"], [0.8, 0.2])
        .row("B", ["a2"], [0.3, 0.7])
        .row("C", ["b1"], [0.9, 0.1])
        .row("C", ["b2"], [0.4, 0.6])
        .build()
        .unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "estimate {actual} not within {TOLERANCE} of {expected}"
    );
}

#[test]
fn estimators_match_exact_marginal_without_evidence() {
    let network = chain_network();
    let evidence = Evidence::new();

    let mut rng = RngHandle::from_seed(1);
    let rejection =
        rejection_sampling(&network, &Query::single("C", "c1"), &evidence, SAMPLES, &mut rng)
            .unwrap();
    assert_close(rejection, 0.675);

    let mut rng = RngHandle::from_seed(2);
    let weighted = likelihood_weighting(&network, "C", "c1", &evidence, SAMPLES, &mut rng).unwrap();
    assert_close(weighted, 0.675);

    let mut rng = RngHandle::from_seed(3);
    let gibbs = gibbs_sampling(&network, "C", "c1", &evidence, SAMPLES, &mut rng).unwrap();
    assert_close(gibbs, 0.675);
}

#[test]
fn intermediate_marginal_is_recovered() {
    let network = chain_network();
    let mut rng = RngHandle::from_seed(4);
    let weighted =
        likelihood_weighting(&network, "B", "b1", &Evidence::new(), SAMPLES, &mut rng).unwrap();
    assert_close(weighted, 0.55);
}

#[test]
fn conditional_estimates_with_leaf_evidence() {
    let network = chain_network();
    let evidence = Evidence::new().with("C", "c1");
    let exact = 0.4 / 0.675;

    let mut rng = RngHandle::from_seed(5);
    let accepted = rejection_sampling_with(
        &network,
        &Query::single("A", "a1"),
        &evidence,
        SAMPLES,
        RejectionNormalization::AcceptedSamples,
        &mut rng,
    )
    .unwrap();
    assert_close(accepted, exact);

    let mut rng = RngHandle::from_seed(6);
    let unclamped =
        likelihood_weighting(&network, "A", "a1", &evidence, SAMPLES, &mut rng).unwrap();
    assert_close(unclamped, exact);

    let mut rng = RngHandle::from_seed(7);
    let clamped = likelihood_weighting_with(
        &network,
        "A",
        "a1",
        &evidence,
        SAMPLES,
        EvidenceMode::Clamped,
        &mut rng,
    )
    .unwrap();
    assert_close(clamped, exact);
}

#[test]
fn total_draw_normalization_estimates_the_joint() {
    let network = chain_network();
    let mut rng = RngHandle::from_seed(8);
    let joint = rejection_sampling(
        &network,
        &Query::single("A", "a1"),
        &Evidence::new().with("C", "c1"),
        SAMPLES,
        &mut rng,
    )
    .unwrap();
    assert_close(joint, 0.4);
}

#[test]
fn conjunctive_queries_are_counted_jointly() {
    let network = chain_network();
    let mut rng = RngHandle::from_seed(9);
    let joint = rejection_sampling(
        &network,
        &Query::single("A", "a1").with("B", "b1"),
        &Evidence::new(),
        SAMPLES,
        &mut rng,
    )
    .unwrap();
    assert_close(joint, 0.4);
}

#[test]
fn markov_blanket_chain_conditions_on_descendants() {
    let network = chain_network();
    let mut rng = RngHandle::from_seed(10);
    let estimate = gibbs_sampling_with(
        &network,
        "A",
        "a1",
        &Evidence::new().with("C", "c1"),
        SAMPLES,
        &MarkovBlanket,
        GibbsOptions { burn_in: 500 },
        &mut rng,
    )
    .unwrap();
    assert_close(estimate, 0.4 / 0.675);
}

#[test]
fn markov_blanket_chain_matches_marginal_without_evidence() {
    let network = chain_network();
    let mut rng = RngHandle::from_seed(11);
    let estimate = gibbs_sampling_with(
        &network,
        "C",
        "c1",
        &Evidence::new(),
        SAMPLES,
        &MarkovBlanket,
        GibbsOptions::default(),
        &mut rng,
    )
    .unwrap();
    assert_close(estimate, 0.675);
}

#[test]
fn estimates_stay_within_unit_interval() {
    let network = chain_network();
    let evidence = Evidence::new().with("B", "b2");
    for seed in 0..8 {
        let mut rng = RngHandle::from_seed(seed);
        let values = [
            rejection_sampling(&network, &Query::single("C", "c2"), &evidence, 200, &mut rng)
                .unwrap(),
            likelihood_weighting(&network, "C", "c2", &evidence, 200, &mut rng).unwrap(),
            gibbs_sampling(&network, "C", "c2", &evidence, 200, &mut rng).unwrap(),
        ];
        for value in values {
            assert!((0.0..=1.0).contains(&value), "estimate {value}");
        }
    }
}
