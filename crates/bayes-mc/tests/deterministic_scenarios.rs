use bayes_core::{BayesError, RngHandle};
use bayes_mc::{
    gibbs_sampling, gibbs_sampling_detailed, likelihood_weighting, likelihood_weighting_detailed,
    likelihood_weighting_with, rejection_sampling, rejection_sampling_detailed,
    rejection_sampling_with, EvidenceMode, GibbsOptions, ParentConditional,
    RejectionNormalization,
};
use bayes_net::{Evidence, Network, NetworkBuilder, Query};

const SAMPLES: usize = 20_000;

// B copies A exactly.
fn copy_network() -> Network {
    NetworkBuilder::new()
        .variable("A", ["a1", "a2"])
        .variable("B", ["b1", "b2"])
        .parents("B", ["A"])
        .row("B", ["a1"], [1.0, 0.0])
        .row("B", ["a2"], [0.0, 1.0])
        .build()
        .unwrap()
}

#[test]
fn unconditioned_estimates_are_near_one_half() {
    let network = copy_network();
    let evidence = Evidence::new();

    let mut rng = RngHandle::from_seed(21);
    let rejection =
        rejection_sampling(&network, &Query::single("B", "b1"), &evidence, SAMPLES, &mut rng)
            .unwrap();
    let weighted = likelihood_weighting(&network, "B", "b1", &evidence, SAMPLES, &mut rng).unwrap();
    let gibbs = gibbs_sampling(&network, "B", "b1", &evidence, SAMPLES, &mut rng).unwrap();

    for estimate in [rejection, weighted, gibbs] {
        assert!((estimate - 0.5).abs() < 0.03, "estimate {estimate}");
    }
}

#[test]
fn conditioned_estimates_are_exact_under_conditional_semantics() {
    let network = copy_network();
    let evidence = Evidence::new().with("A", "a1");

    let mut rng = RngHandle::from_seed(22);
    let rejection = rejection_sampling_with(
        &network,
        &Query::single("B", "b1"),
        &evidence,
        SAMPLES,
        RejectionNormalization::AcceptedSamples,
        &mut rng,
    )
    .unwrap();
    assert_eq!(rejection, 1.0);

    let weighted = likelihood_weighting_with(
        &network,
        "B",
        "b1",
        &evidence,
        SAMPLES,
        EvidenceMode::Clamped,
        &mut rng,
    )
    .unwrap();
    assert_eq!(weighted, 1.0);

    let gibbs = gibbs_sampling(&network, "B", "b1", &evidence, SAMPLES, &mut rng).unwrap();
    assert_eq!(gibbs, 1.0);
}

#[test]
fn total_draw_rejection_reports_the_joint_frequency() {
    let network = copy_network();
    let mut rng = RngHandle::from_seed(23);
    let outcome = rejection_sampling_detailed(
        &network,
        &Query::single("B", "b1"),
        &Evidence::new().with("A", "a1"),
        SAMPLES,
        RejectionNormalization::TotalDraws,
        &mut rng,
    )
    .unwrap();
    assert_eq!(outcome.accepted, outcome.satisfied);
    assert_eq!(outcome.draws, SAMPLES);
    assert!((outcome.estimate - 0.5).abs() < 0.03);
}

#[test]
fn impossible_evidence_yields_zero_for_rejection() {
    let network = copy_network();
    let evidence = Evidence::new().with("A", "a1").with("B", "b2");
    for normalization in [
        RejectionNormalization::TotalDraws,
        RejectionNormalization::AcceptedSamples,
    ] {
        let mut rng = RngHandle::from_seed(24);
        let outcome = rejection_sampling_detailed(
            &network,
            &Query::single("A", "a1"),
            &evidence,
            1_000,
            normalization,
            &mut rng,
        )
        .unwrap();
        assert_eq!(outcome.accepted, 0);
        assert_eq!(outcome.estimate, 0.0);
    }
}

#[test]
fn unclamped_weighting_samples_evidence_variables() {
    let network = copy_network();
    let evidence = Evidence::new().with("A", "a1");
    let mut rng = RngHandle::from_seed(25);
    let outcome = likelihood_weighting_detailed(
        &network,
        "B",
        "b1",
        &evidence,
        SAMPLES,
        EvidenceMode::Unclamped,
        &mut rng,
    )
    .unwrap();
    assert!((outcome.estimate - 0.5).abs() < 0.03, "estimate {}", outcome.estimate);
    assert!((outcome.total_weight - 0.5 * SAMPLES as f64).abs() < 1e-6);
}

#[test]
fn weight_zeroes_query_values_inconsistent_with_child_evidence() {
    let network = copy_network();
    let evidence = Evidence::new().with("B", "b2");
    let mut rng = RngHandle::from_seed(26);
    let estimate = likelihood_weighting(&network, "A", "a1", &evidence, 5_000, &mut rng).unwrap();
    assert_eq!(estimate, 0.0);

    let mut rng = RngHandle::from_seed(26);
    let estimate = likelihood_weighting(&network, "A", "a2", &evidence, 5_000, &mut rng).unwrap();
    assert_eq!(estimate, 1.0);
}

#[test]
fn zero_probability_root_evidence_is_an_error() {
    let network = NetworkBuilder::new()
        .variable("A", ["a1", "a2"])
        .variable("B", ["b1", "b2"])
        .parents("B", ["A"])
        .row("A", Vec::<String>::new(), [1.0, 0.0])
        .row("B", ["a1"], [0.5, 0.5])
        .row("B", ["a2"], [0.5, 0.5])
        .build()
        .unwrap();
    let mut rng = RngHandle::from_seed(27);
    let err = likelihood_weighting(
        &network,
        "B",
        "b1",
        &Evidence::new().with("A", "a2"),
        100,
        &mut rng,
    )
    .unwrap_err();
    match err {
        BayesError::Estimate(info) => {
            assert_eq!(info.code, "zero-total-weight");
            assert_eq!(info.context.get("evidence").map(String::as_str), Some("A=a2"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn clamped_weighting_rejects_contradictory_evidence() {
    let network = copy_network();
    let evidence = Evidence::new().with("A", "a1").with("B", "b2");
    let mut rng = RngHandle::from_seed(28);
    let err = likelihood_weighting_with(
        &network,
        "A",
        "a1",
        &evidence,
        100,
        EvidenceMode::Clamped,
        &mut rng,
    )
    .unwrap_err();
    assert_eq!(err.code(), "zero-total-weight");
}

#[test]
fn gibbs_burn_in_is_not_counted() {
    let network = copy_network();
    let mut rng = RngHandle::from_seed(29);
    let outcome = gibbs_sampling_detailed(
        &network,
        "B",
        "b1",
        &Evidence::new().with("A", "a2"),
        300,
        &ParentConditional,
        GibbsOptions { burn_in: 100 },
        &mut rng,
    )
    .unwrap();
    assert_eq!(outcome.sweeps, 400);
    assert_eq!(outcome.counted, 300);
    assert_eq!(outcome.hits, 0);
    assert_eq!(outcome.estimate, 0.0);
}

#[test]
fn oversized_burn_in_is_rejected_before_sampling() {
    let network = copy_network();
    let mut rng = RngHandle::from_seed(31);
    let err = gibbs_sampling_detailed(
        &network,
        "B",
        "b1",
        &Evidence::new(),
        10,
        &ParentConditional,
        GibbsOptions { burn_in: usize::MAX },
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(err, BayesError::Query(_)));
    assert_eq!(err.code(), "sweep-overflow");
}

#[test]
fn invalid_requests_are_query_errors() {
    let network = copy_network();
    let mut rng = RngHandle::from_seed(30);

    let err = gibbs_sampling(&network, "B", "b1", &Evidence::new(), 0, &mut rng).unwrap_err();
    assert!(matches!(err, BayesError::Query(_)));
    assert_eq!(err.code(), "zero-samples");

    let err =
        likelihood_weighting(&network, "Z", "z1", &Evidence::new(), 10, &mut rng).unwrap_err();
    assert_eq!(err.code(), "unknown-variable");

    let err = rejection_sampling(
        &network,
        &Query::single("A", "a1"),
        &Evidence::new().with("B", "b9"),
        10,
        &mut rng,
    )
    .unwrap_err();
    assert_eq!(err.code(), "unknown-value");

    let err = rejection_sampling(&network, &Query::new(), &Evidence::new(), 10, &mut rng)
        .unwrap_err();
    assert_eq!(err.code(), "empty-query");
}
