use bayes_net::{canonical_hash, Network, NetworkBuilder, NetworkSpec};

fn sprinkler() -> Network {
    NetworkBuilder::new()
        .variable("Cloudy", ["T", "F"])
        .variable("Sprinkler", ["T", "F"])
        .variable("Rain", ["T", "F"])
        .variable("WetGrass", ["T", "F"])
        .parents("Sprinkler", ["Cloudy"])
        .parents("Rain", ["Cloudy"])
        .parents("WetGrass", ["Sprinkler", "Rain"])
        .row("Sprinkler", ["T"], [0.1, 0.9])
        .row("Sprinkler", ["F"], [0.5, 0.5])
        .row("Rain", ["T"], [0.8, 0.2])
        .row("Rain", ["F"], [0.2, 0.8])
        .row("WetGrass", ["T", "T"], [0.99, 0.01])
        .row("WetGrass", ["T", "F"], [0.9, 0.1])
        .row("WetGrass", ["F", "T"], [0.9, 0.1])
        .row("WetGrass", ["F", "F"], [0.0, 1.0])
        .build()
        .unwrap()
}

#[test]
fn network_document_round_trips_through_json_and_bytes() {
    let network = sprinkler();
    let spec = network.to_spec();

    let json = spec.to_json().unwrap();
    let from_json = Network::from_spec(&NetworkSpec::from_json(&json).unwrap()).unwrap();
    assert_eq!(from_json, network);

    let bytes = spec.to_bytes().unwrap();
    let from_bytes = Network::from_spec(&NetworkSpec::from_bytes(&bytes).unwrap()).unwrap();
    assert_eq!(canonical_hash(&from_bytes), canonical_hash(&network));
}

#[test]
fn hash_tracks_probabilities() {
    let network = sprinkler();
    let mut spec = network.to_spec();
    spec.variables[1].rows[0].probabilities = vec![0.2, 0.8];
    let tweaked = Network::from_spec(&spec).unwrap();
    assert_ne!(canonical_hash(&tweaked), canonical_hash(&network));
}

#[test]
fn json_defaults_allow_terse_roots() {
    let json = r#"{
        "variables": [
            { "name": "A", "domain": ["a1", "a2"] },
            { "name": "B", "domain": ["b1", "b2"], "parents": ["A"], "rows": [
                { "parents": ["a1"], "probabilities": [1.0, 0.0] },
                { "parents": ["a2"], "probabilities": [0.0, 1.0] }
            ] }
        ]
    }"#;
    let network = Network::from_spec(&NetworkSpec::from_json(json).unwrap()).unwrap();
    assert_eq!(network.len(), 2);
    assert_eq!(network.conditional("B", &["a2"]).unwrap(), &[0.0, 1.0]);
}

#[test]
fn incompatible_schema_is_rejected() {
    let mut spec = sprinkler().to_spec();
    spec.schema_version = bayes_core::SchemaVersion::new(2, 0, 0);
    assert_eq!(Network::from_spec(&spec).unwrap_err().code(), "schema-mismatch");
}
