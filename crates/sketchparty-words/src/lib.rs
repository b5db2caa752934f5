//! Word source for Sketchparty.
//!
//! Supplies the three candidate words offered to a drawing player at the
//! start of a round, the last-resort random word when nobody picked one,
//! and the underscore mask that guessers see instead of the secret.

use rand::seq::IndexedRandom;

/// The built-in word list. Short, concrete, drawable things — the kind of
/// word a round can actually be won with.
const WORD_LIST: &[&str] = &[
    "airplane",
    "anchor",
    "apple",
    "backpack",
    "balloon",
    "banana",
    "beach",
    "bicycle",
    "bird",
    "bridge",
    "butterfly",
    "cactus",
    "camera",
    "campfire",
    "candle",
    "castle",
    "caterpillar",
    "cloud",
    "compass",
    "crown",
    "diamond",
    "dinosaur",
    "dolphin",
    "dragon",
    "drum",
    "elephant",
    "envelope",
    "feather",
    "fireworks",
    "flashlight",
    "flower",
    "fountain",
    "giraffe",
    "guitar",
    "hammer",
    "hamburger",
    "helicopter",
    "hot air balloon",
    "hourglass",
    "ice cream",
    "igloo",
    "island",
    "jellyfish",
    "kangaroo",
    "kite",
    "ladder",
    "lighthouse",
    "lightning",
    "mermaid",
    "microphone",
    "mountain",
    "mushroom",
    "octopus",
    "owl",
    "palm tree",
    "parachute",
    "penguin",
    "piano",
    "pineapple",
    "pirate ship",
    "pizza",
    "pyramid",
    "rainbow",
    "robot",
    "rocket",
    "sandcastle",
    "scarecrow",
    "scissors",
    "snowman",
    "spider",
    "submarine",
    "sunflower",
    "telescope",
    "tent",
    "tornado",
    "tractor",
    "treasure chest",
    "umbrella",
    "unicorn",
    "volcano",
    "waterfall",
    "whale",
    "windmill",
    "wizard",
];

/// A pool of guessable words.
///
/// Rooms hold one of these; the default bank uses the built-in list, and a
/// custom list can be supplied per room (theme nights, other languages).
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// A bank over a custom word list.
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Draws `count` distinct words at random. Returns fewer when the bank
    /// is smaller than `count`.
    pub fn candidates(&self, count: usize) -> Vec<String> {
        let mut rng = rand::rng();
        self.words
            .choose_multiple(&mut rng, count)
            .cloned()
            .collect()
    }

    /// One uniformly random word, or `None` for an empty bank.
    pub fn random_word(&self) -> Option<String> {
        let mut rng = rand::rng();
        self.words.choose(&mut rng).cloned()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self {
            words: WORD_LIST.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// The masked form of a secret word shown to guessers.
///
/// Every non-space character becomes an underscore and the characters are
/// spread out with spaces so the word length is readable on screen:
/// `"apple"` → `"_ _ _ _ _"`. Spaces in multi-word secrets are kept, so the
/// word-break position stays visible.
pub fn underscore_mask(word: &str) -> String {
    word.chars()
        .map(|c| if c == ' ' { ' ' } else { '_' })
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}
