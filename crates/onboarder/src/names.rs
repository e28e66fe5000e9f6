//! Display name generation.

use rand::seq::IndexedRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "ancient", "bold", "brave", "bright", "calm", "clever", "cosmic", "crimson", "daring",
    "eager", "fancy", "fierce", "gentle", "golden", "happy", "hidden", "jolly", "keen", "lively",
    "lucky", "mellow", "misty", "noble", "patient", "quiet", "rapid", "silent", "silver",
    "steady", "swift", "wandering", "witty",
];

const NOUNS: &[&str] = &[
    "badger", "breeze", "canyon", "cedar", "comet", "coral", "falcon", "fjord", "forest",
    "glacier", "harbor", "heron", "island", "lantern", "lynx", "meadow", "meteor", "otter",
    "panda", "pine", "prairie", "raven", "river", "sparrow", "summit", "thunder", "tiger",
    "valley", "willow", "wolf",
];

/// A random `adjective-noun` display name.
pub fn generate_display_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("anonymous");
    let noun = NOUNS.choose(rng).copied().unwrap_or("trader");
    format!("{adjective}-{noun}")
}
