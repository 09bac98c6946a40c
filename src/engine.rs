//! Text-to-speech entry points.

use std::path::Path;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;
use crate::error::{Error, Result};
use crate::g2p::TextToPhoneme;
use crate::phonemes::{Phoneme, PhonemeSymbol, PhonemeTable};
use crate::rng::{DEFAULT_SEED, create_rng};
use crate::synth::{MAX_SAMPLE_RATE, MIN_SAMPLE_RATE, Synthesizer};
use crate::voice::Voice;
use crate::wav;

/// Parameters for the whole synthesis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// sample rate in Hz
    pub sample_rate: u32,
    /// seed of the noise and jitter generator
    pub seed: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        SynthesisConfig {
            sample_rate: 22_050,
            seed: DEFAULT_SEED,
        }
    }
}

impl SynthesisConfig {
    /// # Errors
    ///
    /// Returns [`Error::InvalidSampleRate`] outside 8000 ..= 192000 Hz.
    pub fn validate(&self) -> Result<()> {
        if (MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            Ok(())
        } else {
            Err(Error::InvalidSampleRate {
                rate: self.sample_rate,
            })
        }
    }
}

/// Text-to-speech engine.
///
/// One engine renders one utterance at a time. All filter state is reset
/// before every utterance, the random stream continues.
///
/// ```no_run
/// use formant_tts::{Tts, Voice};
///
/// let mut tts = Tts::new(Voice::female())?;
/// tts.speak("Hello, world!", "hello.wav")?;
/// # Ok::<(), formant_tts::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Tts<R = Pcg32> {
    voice: Voice,
    table: PhonemeTable,
    text_to_phoneme: TextToPhoneme,
    synthesizer: Synthesizer,
    rng: R,
}

impl Tts<Pcg32> {
    /// Engine with the default [`SynthesisConfig`].
    ///
    /// # Errors
    ///
    /// See [`Tts::with_config`].
    pub fn new(voice: Voice) -> Result<Self> {
        Self::with_config(voice, &SynthesisConfig::default())
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidSampleRate`] for a sample rate out of range.
    pub fn with_config(voice: Voice, config: &SynthesisConfig) -> Result<Self> {
        config.validate()?;
        Self::with_rng(voice, config.sample_rate, create_rng(config.seed))
    }
}

impl<R: Rng> Tts<R> {
    /// Engine drawing noise and jitter from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSampleRate`] for a sample rate out of range.
    pub fn with_rng(voice: Voice, sample_rate: u32, rng: R) -> Result<Self> {
        let mut synthesizer = Synthesizer::new(sample_rate)?;
        synthesizer.set_nasality(voice.nasality());
        Ok(Tts {
            table: PhonemeTable::new(voice.pitch()),
            text_to_phoneme: TextToPhoneme,
            synthesizer,
            voice,
            rng,
        })
    }

    #[must_use]
    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.synthesizer.sample_rate()
    }

    /// Converts `text` to speech.
    pub fn synthesize(&mut self, text: &str) -> AudioBuffer {
        let symbols = self.text_to_phoneme.convert(text);
        log::debug!("{text:?} -> {} phonemes", symbols.len());
        let phonemes: Vec<Phoneme> = symbols.iter().map(|&s| self.table.phoneme(s)).collect();
        self.synthesize_phonemes(&phonemes)
    }

    /// Speaks a sequence of ARPAbet symbols. Unknown symbols are skipped.
    pub fn synthesize_symbols(&mut self, symbols: &[&str]) -> AudioBuffer {
        let phonemes: Vec<Phoneme> = symbols
            .iter()
            .filter_map(|symbol| {
                let phoneme = self.table.lookup(symbol);
                if phoneme.is_none() {
                    log::debug!("skipping unknown phoneme {symbol:?}");
                }
                phoneme
            })
            .collect();
        self.synthesize_phonemes(&phonemes)
    }

    /// Speaks typed symbols.
    pub fn synthesize_symbol_sequence(&mut self, symbols: &[PhonemeSymbol]) -> AudioBuffer {
        let phonemes: Vec<Phoneme> = symbols.iter().map(|&s| self.table.phoneme(s)).collect();
        self.synthesize_phonemes(&phonemes)
    }

    /// Applies the voice to `phonemes`, builds the pitch contour and renders
    /// the result. The voice volume is applied last.
    pub fn synthesize_phonemes(&mut self, phonemes: &[Phoneme]) -> AudioBuffer {
        let phonemes: Vec<Phoneme> = phonemes.iter().map(|p| self.voice.apply(p)).collect();
        if phonemes.is_empty() {
            return AudioBuffer::new(self.sample_rate());
        }

        let contour = self.voice.contour(&phonemes, &mut self.rng);
        self.synthesizer.reset();
        let mut audio = self
            .synthesizer
            .synthesize(&phonemes, Some(&contour), &mut self.rng);
        audio.amplify(self.voice.volume());

        log::debug!(
            "rendered {} phonemes, {} frames, {:.3} s",
            phonemes.len(),
            contour.len(),
            audio.duration()
        );
        audio
    }

    /// Synthesizes `text` and writes it to a WAV file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written.
    pub fn speak(&mut self, text: &str, path: impl AsRef<Path>) -> Result<()> {
        let audio = self.synthesize(text);
        wav::write(path, &audio)
    }
}

/// Converts `text` to speech with a fresh engine.
///
/// # Errors
///
/// Returns [`Error::InvalidSampleRate`] for a sample rate out of range.
pub fn synthesize(text: &str, voice: &Voice, config: &SynthesisConfig) -> Result<AudioBuffer> {
    let mut tts = Tts::with_config(voice.clone(), config)?;
    Ok(tts.synthesize(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::VoiceConfig;

    #[test]
    fn default_config() {
        let config = SynthesisConfig::default();
        assert_eq!(config.sample_rate, 22_050);
        assert_eq!(config.seed, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_sample_rate() {
        let config = SynthesisConfig {
            sample_rate: 100,
            ..SynthesisConfig::default()
        };
        assert!(matches!(
            Tts::with_config(Voice::default(), &config),
            Err(Error::InvalidSampleRate { rate: 100 })
        ));
    }

    #[test]
    fn the_is_four_symbols_long() {
        // DH AX SIL PAU
        let audio = synthesize("the", &Voice::default(), &SynthesisConfig::default()).unwrap();
        assert_eq!(audio.len(), (6 + 6 + 10 + 15) * 220);
    }

    #[test]
    fn unknown_symbols_are_skipped() {
        let mut tts = Tts::new(Voice::default()).unwrap();
        let with_junk = tts.synthesize_symbols(&["HH", "ZZZ", "ow", "PAU"]);
        let mut tts = Tts::new(Voice::default()).unwrap();
        let clean = tts.synthesize_symbol_sequence(&[
            PhonemeSymbol::Hh,
            PhonemeSymbol::Ow,
            PhonemeSymbol::Pau,
        ]);
        assert_eq!(with_junk, clean);
    }

    #[test]
    fn only_unknown_symbols_give_empty_audio() {
        let mut tts = Tts::new(Voice::default()).unwrap();
        let audio = tts.synthesize_symbols(&["XX", "??"]);
        assert!(audio.is_empty());
        assert_eq!(audio.sample_rate(), 22_050);
    }

    #[test]
    fn volume_scales_output() {
        let loud = VoiceConfig {
            volume: 2.0,
            ..VoiceConfig::default()
        }
        .build()
        .unwrap();
        let a = synthesize("go", &Voice::default(), &SynthesisConfig::default()).unwrap();
        let b = synthesize("go", &loud, &SynthesisConfig::default()).unwrap();
        for (x, y) in a.samples().iter().zip(b.samples()) {
            assert_eq!(x * 2.0, *y);
        }
    }

    #[test]
    fn engine_is_reusable() {
        let mut tts = Tts::new(Voice::male()).unwrap();
        let first = tts.synthesize("yes");
        let second = tts.synthesize("yes");
        // filter state is reset, but the random stream moves on
        assert_eq!(first.len(), second.len());
        assert_ne!(first, second);
    }
}
