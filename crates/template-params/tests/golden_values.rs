//! Pinned outputs for known draw sequences.
//!
//! Each case replays the index sequence that produced a recorded value, so
//! the grammar, alphabet order, and draw order are all checked at once.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::{fixture, rstest};
use template_params::{GeneratorRegistry, RandomSource, RemoteValueGenerator, expand};

/// Replays a fixed sequence of indices.
struct ScriptedSource {
    indices: std::vec::IntoIter<usize>,
}

impl ScriptedSource {
    fn new(indices: &[usize]) -> Self {
        Self {
            indices: indices.to_vec().into_iter(),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.indices.as_slice().is_empty()
    }
}

impl RandomSource for ScriptedSource {
    fn next_index(&mut self, bound: usize) -> usize {
        let index = self.indices.next().expect("scripted index available");
        assert!(index < bound, "scripted index {index} out of bound {bound}");
        index
    }
}

#[fixture]
fn registry() -> GeneratorRegistry {
    let remote = RemoteValueGenerator::new(Duration::from_secs(5)).expect("client builds");
    GeneratorRegistry::standard(remote)
}

#[rstest]
#[case("test[A-Z0-9]{4}template", &[16, 29, 7, 21], "testQ3HVtemplate")]
#[case("[\\d]{4}", &[6, 8, 4, 1], "6841")]
#[case("[\\w]{4}", &[3, 21, 32, 10], "DVgK")]
#[case(
    "[\\a]{10}",
    &[39, 5, 22, 38, 47, 38, 35, 46, 26, 25],
    "nFWmvmjuaZ"
)]
#[case("password", &[56, 20, 55, 61, 52, 14, 56, 61], "4U390O49")]
fn registry_reproduces_recorded_values(
    registry: GeneratorRegistry,
    #[case] expression: &str,
    #[case] indices: &[usize],
    #[case] expected: &str,
) {
    let mut source = ScriptedSource::new(indices);

    let value = registry
        .generate_value(expression, &mut source)
        .expect("generates");

    assert_eq!(value, expected);
    assert!(source.is_exhausted(), "every scripted draw is consumed");
}

#[rstest]
#[case("test[A-Z0-9]{4}template")]
#[case("[\\a]{10}")]
#[case("admin[a-f0-9]{6}")]
fn identical_seeds_expand_identically(#[case] expression: &str) {
    let mut first = ChaCha8Rng::seed_from_u64(1337);
    let mut second = ChaCha8Rng::seed_from_u64(1337);

    let a = expand(expression, &mut first).expect("expands");
    let b = expand(expression, &mut second).expect("expands");

    assert_eq!(a, b);
}
