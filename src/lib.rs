//! Formant text-to-speech in Rust.
//!
//! Converts English text to phonemes with letter-to-sound rules, renders them
//! with a Klatt-style cascade/parallel formant synthesizer and writes the
//! result as PCM WAV. There are no models or corpora involved; output is
//! fully determined by the text, the [`Voice`] and the RNG seed.
//!
//! ```no_run
//! use formant_tts::{SynthesisConfig, Voice};
//!
//! let audio = formant_tts::synthesize("Hello, world!", &Voice::default(), &SynthesisConfig::default())?;
//! formant_tts::write("hello.wav", &audio)?;
//! # Ok::<(), formant_tts::Error>(())
//! ```
//!
//! ## Math backend
//!
//! The `libm` feature routes the float functions through `libm` instead of
//! the `std` methods.

#![deny(clippy::all, clippy::pedantic, unsafe_code)]
// fine for us since loss of precision/sign is not that important, as long as it's the same every time.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

mod traits;
pub use traits::Filter;
mod math;
mod poly_real;

pub mod audio;
pub mod engine;
pub mod error;
pub mod filters;
pub mod g2p;
pub mod phonemes;
pub mod rng;
pub mod sources;
pub mod synth;
pub mod voice;
pub mod wav;

pub use audio::AudioBuffer;
pub use engine::{SynthesisConfig, Tts, synthesize};
pub use error::{Error, Result};
pub use g2p::TextToPhoneme;
pub use phonemes::{Phoneme, PhonemeSymbol, PhonemeTable};
pub use synth::{FrameParameters, Synthesizer, cascade_transfer_function, magnitude_response};
pub use voice::{Voice, VoiceConfig};
pub use wav::{read, write};

#[cfg(test)]
mod lib_tests;
