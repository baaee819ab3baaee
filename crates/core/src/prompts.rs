//! Prompt sources.
//!
//! A run asks a [`PromptSource`] for exactly as many prompts as images it
//! was asked to produce. [`TemplatePromptSource`] composes them from fixed
//! vocabulary tables by random choice.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::category::ImageCategory;
use crate::error::CoreError;

/// Produces the ordered prompt list for one category.
pub trait PromptSource: Send + Sync {
    fn prompts(&self, category: ImageCategory, count: usize) -> Result<Vec<String>, CoreError>;
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

const HEADER_SCENES: &[&str] = &[
    "interconnected floating neon islands with rainbow bridges",
    "abstract vaporwave city skyline melting into geometric shapes",
    "surreal landscape of giant floating crystals and holographic clouds",
    "cyberpunk circuit board landscape transforming into organic patterns",
    "retro arcade game world with pixelated mountains and glitch effects",
    "dreamlike space station interior with impossible M.C. Escher geometry",
    "underwater digital realm with neon coral and data streams",
    "abstract memphis-style playground with impossible physics",
    "futuristic Tokyo street scene abstracted into geometric patterns",
    "surreal desert with chrome cacti and liquid metal dunes",
    "floating digital gardens with pixelated flowers and holographic trees",
    "abstract social media universe with floating interface elements",
    "neon jungle with geometric animals and data vines",
    "retro-futuristic mall aesthetic with vaporwave elements",
    "digital storm of emoji particles and meme symbols",
];

const HEADER_PALETTES: &[&str] = &[
    "electric pink, cyan, deep purple neons",
    "pastel vaporwave pink, blue, and mint",
    "acid green, hot magenta, electric yellow",
    "deep space purple, galaxy blue, nebula pink",
    "miami vice teal and hot pink",
    "cyberpunk red, blue, and chrome",
    "rainbow holographic with iridescent effects",
    "sunset orange, purple, and gold gradients",
    "matrix green and black with glitch effects",
    "cotton candy pastels with neon accents",
];

const HEADER_OBJECTS: &[&str] = &[
    "floating diamond hands, rocket ships, and moon symbols",
    "abstract emoji explosions, heart reactions, fire symbols",
    "glitching pixel art creatures and retro game power-ups",
    "holographic butterflies, stars, and sparkle effects",
    "floating crystals, gems, and energy orbs",
    "abstract wifi signals, cloud symbols, and data streams",
    "geometric pizza slices, tacos, and food icons",
    "retro computer windows, cursors, and loading bars",
    "abstract money symbols, coins, and treasure chests",
    "floating planets, UFOs, and space objects",
    "rainbow prisms, laser beams, and light trails",
    "abstract cat shapes, dog patterns, and animal spirits",
    "digital flowers, mushrooms, and nature fractals",
    "geometric skulls, flames, and lightning bolts",
    "abstract crown symbols, stars, and celebration confetti",
];

const HEADER_MOODS: &[&str] = &[
    "chaotic but harmonious",
    "explosively vibrant",
    "dreamily surreal",
    "aggressively playful",
    "mysteriously energetic",
    "wildly optimistic",
    "beautifully chaotic",
    "hypnotically dynamic",
];

const PROFILE_SUBJECTS: &[&str] = &[
    "geometric wolf head",
    "abstract dragon face",
    "cybernetic cat avatar",
    "digital phoenix",
    "holographic bear spirit",
    "neon tiger mask",
    "crystalline eagle head",
    "robot samurai helmet",
    "alien consciousness orb",
    "digital demon skull",
    "cyber owl entity",
    "abstract lion mane",
    "pixelated shark jaw",
    "geometric butterfly being",
    "plasma energy creature",
    "digital octopus brain",
    "chrome skull avatar",
    "neon serpent head",
    "abstract fox spirit",
    "cyber monkey face",
    "holographic raven",
    "digital wolf pack leader",
    "geometric unicorn",
    "abstract bull head",
    "neon mantis warrior",
    "crystalline spider queen",
    "digital kraken eye",
    "cyber panda warrior",
    "abstract jellyfish mind",
    "holographic bat creature",
];

const PROFILE_SYMBOLS: &[&str] = &[
    "diamond hands, rocket emojis, and moon crescents",
    "fire emojis, 100 symbols, and explosion effects",
    "heart reactions, thumbs up, and star ratings",
    "lightning bolts, energy waves, and power symbols",
    "crown symbols, trophy icons, and winner badges",
    "pizza slices, taco patterns, and food particles",
    "WiFi signals, cloud icons, and data streams",
    "pixel hearts, game lives, and power-up symbols",
    "money bags, coin stacks, and treasure effects",
    "rainbow prisms, sparkles, and magic dust",
    "skull emojis, flame effects, and danger signs",
    "eye symbols, third eyes, and vision beams",
    "mushroom clouds, atomic symbols, and radiation",
    "infinity loops, sacred geometry, and fractals",
    "glitch artifacts, error messages, and corrupted data",
];

const PROFILE_COLORS: &[&str] = &[
    "fuchsia, electric blue, violet",
    "hot pink, cyan, deep purple",
    "acid green, magenta, gold",
    "crimson red, neon blue, silver",
    "toxic green, hot orange, black",
    "miami pink, teal, white",
    "royal purple, emerald, gold",
    "electric yellow, hot pink, turquoise",
    "blood red, ice blue, chrome",
    "neon orange, purple, lime",
    "galaxy blue, nebula pink, star white",
    "matrix green, black, silver",
    "sunset orange, violet, indigo",
    "cotton candy pink, baby blue, lavender",
    "radioactive green, warning orange, hazard yellow",
];

// ---------------------------------------------------------------------------
// TemplatePromptSource
// ---------------------------------------------------------------------------

/// Random-template prompt generator.
///
/// Unseeded sources draw from the thread-local RNG; seeded sources are
/// reproducible, which the tests rely on.
#[derive(Debug, Clone, Default)]
pub struct TemplatePromptSource {
    seed: Option<u64>,
}

impl TemplatePromptSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn compose<R: Rng + ?Sized>(rng: &mut R, category: ImageCategory, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| match category {
                ImageCategory::Header => header_prompt(rng),
                ImageCategory::Profile => profile_prompt(rng),
            })
            .collect()
    }
}

impl PromptSource for TemplatePromptSource {
    fn prompts(&self, category: ImageCategory, count: usize) -> Result<Vec<String>, CoreError> {
        let prompts = match self.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed ^ category as u64);
                Self::compose(&mut rng, category, count)
            }
            None => Self::compose(&mut rand::rng(), category, count),
        };
        Ok(prompts)
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, table: &[&'a str]) -> &'a str {
    table.choose(rng).copied().unwrap_or_default()
}

fn header_prompt<R: Rng + ?Sized>(rng: &mut R) -> String {
    let scene = pick(rng, HEADER_SCENES);
    let palette = pick(rng, HEADER_PALETTES);
    let objects = pick(rng, HEADER_OBJECTS);
    let mood = pick(rng, HEADER_MOODS);

    format!(
        "A wide, 1500x500 pixel cartoonish background image. {scene}. \
         Focus on {palette} color palette. Include {objects} scattered throughout the composition. \
         No people, no text, no brands. The overall mood should be {mood}. \
         Allow for black padding above and below if necessary to fit the aspect ratio. \
         Digital art style, trending design, high energy, maximum visual impact"
    )
}

fn profile_prompt<R: Rng + ?Sized>(rng: &mut R) -> String {
    let subject = pick(rng, PROFILE_SUBJECTS);
    let symbols = pick(rng, PROFILE_SYMBOLS);
    let colors = pick(rng, PROFILE_COLORS);

    format!(
        "Abstract, neon-drenched digital art profile picture, centered {subject} with glowing eyes, \
         surrounded by a chaotic yet cohesive swirling vortex of {symbols}. \
         Vibrant cyberpunk color palette of {colors}. High detail, intricate lines, dynamic lighting, \
         trending on ArtStation. No text, no watermarks, square format, maximum visual impact, viral aesthetic"
    )
}
