use super::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_network(seed: u64) -> Network {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut net = Network::zeroed();
    let mut fill = |acc: &mut Accumulator, rng: &mut StdRng| {
        for v in acc.vals.iter_mut() {
            *v = rng.gen_range(i16::MIN..=i16::MAX);
        }
    };
    fill(&mut net.feature_bias, &mut rng);
    for row in net.feature_weights.iter_mut() {
        fill(row, &mut rng);
    }
    fill(&mut net.output_weights[0], &mut rng);
    fill(&mut net.output_weights[1], &mut rng);
    net.output_bias = rng.gen();
    net
}

#[test]
fn test_round_trip_preserves_every_parameter() {
    let net = random_network(1);
    let parsed = Network::from_bytes(&net.to_bytes()).unwrap();
    assert_eq!(parsed.feature_bias, net.feature_bias);
    assert_eq!(parsed.feature_weights, net.feature_weights);
    assert_eq!(parsed.output_weights, net.output_weights);
    assert_eq!(parsed.output_bias, net.output_bias);
}

#[test]
fn test_bad_magic_is_rejected() {
    let mut bytes = random_network(2).to_bytes();
    bytes[0] = b'X';
    assert!(matches!(
        Network::from_bytes(&bytes),
        Err(WeightsError::BadMagic)
    ));
}

#[test]
fn test_unknown_version_is_rejected() {
    let mut bytes = random_network(2).to_bytes();
    bytes[4..8].copy_from_slice(&7u32.to_le_bytes());
    assert!(matches!(
        Network::from_bytes(&bytes),
        Err(WeightsError::UnsupportedVersion(7))
    ));
}

#[test]
fn test_dimension_mismatch_is_rejected() {
    let mut bytes = random_network(2).to_bytes();
    bytes[8..12].copy_from_slice(&512u32.to_le_bytes());
    assert!(matches!(
        Network::from_bytes(&bytes),
        Err(WeightsError::DimensionMismatch {
            found_features: 512,
            ..
        })
    ));
}

#[test]
fn test_truncated_blob_is_rejected() {
    let mut bytes = random_network(2).to_bytes();
    bytes.pop();
    assert!(matches!(
        Network::from_bytes(&bytes),
        Err(WeightsError::Truncated)
    ));

    // Cut off mid-header too
    assert!(matches!(
        Network::from_bytes(&bytes[..10]),
        Err(WeightsError::Truncated)
    ));
}

#[test]
fn test_trailing_bytes_are_rejected() {
    let mut bytes = random_network(2).to_bytes();
    bytes.extend_from_slice(&[0, 0, 0]);
    assert!(matches!(
        Network::from_bytes(&bytes),
        Err(WeightsError::TrailingBytes(3))
    ));
}
