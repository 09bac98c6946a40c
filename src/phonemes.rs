//! ARPAbet phoneme set and its acoustic templates.
//!
//! Formant values follow Klatt (1980) and Peterson & Barney (1952).

use core::fmt;
use core::str::FromStr;

/// One member of the closed ARPAbet-style phoneme set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhonemeSymbol {
    // Vowels (monophthongs)
    Iy,
    Ih,
    Eh,
    Ey,
    Ae,
    Aa,
    Ao,
    Ow,
    Uh,
    Uw,
    Ah,
    Ax,
    // R-coloured vowels
    Er,
    Axr,
    // Diphthongs
    Ay,
    Aw,
    Oy,
    // Stops
    B,
    D,
    G,
    P,
    T,
    K,
    // Fricatives
    V,
    Dh,
    Z,
    Zh,
    F,
    Th,
    S,
    Sh,
    Hh,
    // Affricates
    Ch,
    Jh,
    // Nasals
    M,
    N,
    Ng,
    // Liquids
    L,
    R,
    // Glides
    W,
    Y,
    /// Short inter-word silence.
    Sil,
    /// Phrase pause.
    Pau,
}

use PhonemeSymbol as S;

impl PhonemeSymbol {
    pub const ALL: [PhonemeSymbol; 43] = [
        S::Iy, S::Ih, S::Eh, S::Ey, S::Ae, S::Aa, S::Ao, S::Ow, S::Uh, S::Uw, S::Ah, S::Ax,
        S::Er, S::Axr, S::Ay, S::Aw, S::Oy, S::B, S::D, S::G, S::P, S::T, S::K, S::V, S::Dh,
        S::Z, S::Zh, S::F, S::Th, S::S, S::Sh, S::Hh, S::Ch, S::Jh, S::M, S::N, S::Ng, S::L,
        S::R, S::W, S::Y, S::Sil, S::Pau,
    ];

    /// Upper-case ARPAbet text of the symbol.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            S::Iy => "IY",
            S::Ih => "IH",
            S::Eh => "EH",
            S::Ey => "EY",
            S::Ae => "AE",
            S::Aa => "AA",
            S::Ao => "AO",
            S::Ow => "OW",
            S::Uh => "UH",
            S::Uw => "UW",
            S::Ah => "AH",
            S::Ax => "AX",
            S::Er => "ER",
            S::Axr => "AXR",
            S::Ay => "AY",
            S::Aw => "AW",
            S::Oy => "OY",
            S::B => "B",
            S::D => "D",
            S::G => "G",
            S::P => "P",
            S::T => "T",
            S::K => "K",
            S::V => "V",
            S::Dh => "DH",
            S::Z => "Z",
            S::Zh => "ZH",
            S::F => "F",
            S::Th => "TH",
            S::S => "S",
            S::Sh => "SH",
            S::Hh => "HH",
            S::Ch => "CH",
            S::Jh => "JH",
            S::M => "M",
            S::N => "N",
            S::Ng => "NG",
            S::L => "L",
            S::R => "R",
            S::W => "W",
            S::Y => "Y",
            S::Sil => "SIL",
            S::Pau => "PAU",
        }
    }

    /// `true` for the strident subset that carries frication noise.
    #[must_use]
    pub fn is_strident(self) -> bool {
        matches!(self, S::S | S::Sh | S::F | S::Th | S::Hh | S::Ch)
    }

    /// The static acoustic template of this symbol.
    #[must_use]
    pub fn template(self) -> PhonemeTemplate {
        // (f1, f2, f3, f4), (b1, b2, b3, b4), duration, av, voiced
        match self {
            S::Iy => tpl([270, 2290, 3010, 3500], VOICED_BW, 120, 60, true),
            S::Ih => tpl([390, 1990, 2550, 3500], VOICED_BW, 100, 60, true),
            S::Eh => tpl([530, 1840, 2480, 3500], VOICED_BW, 100, 60, true),
            S::Ey => tpl([440, 2100, 2600, 3500], VOICED_BW, 140, 60, true),
            S::Ae => tpl([660, 1720, 2410, 3500], VOICED_BW, 120, 60, true),
            S::Aa => tpl([730, 1090, 2440, 3500], VOICED_BW, 120, 60, true),
            S::Ao => tpl([570, 840, 2410, 3500], VOICED_BW, 120, 60, true),
            S::Ow => tpl([490, 1350, 2400, 3500], VOICED_BW, 140, 60, true),
            S::Uh => tpl([440, 1020, 2240, 3500], VOICED_BW, 100, 60, true),
            S::Uw => tpl([300, 870, 2240, 3500], VOICED_BW, 120, 60, true),
            S::Ah => tpl([640, 1190, 2390, 3500], VOICED_BW, 100, 60, true),
            S::Ax => tpl([500, 1500, 2500, 3500], VOICED_BW, 60, 50, true),
            S::Er => tpl([490, 1350, 1690, 3500], VOICED_BW, 120, 60, true),
            S::Axr => tpl([500, 1300, 1700, 3500], VOICED_BW, 80, 50, true),
            S::Ay | S::Aw => tpl([730, 1090, 2440, 3500], VOICED_BW, 180, 60, true),
            S::Oy => tpl([570, 840, 2410, 3500], VOICED_BW, 180, 60, true),
            S::B => tpl([200, 1100, 2150, 3500], VOICED_BW, 60, 60, true),
            S::D => tpl([200, 1600, 2600, 3500], VOICED_BW, 60, 60, true),
            S::G => tpl([200, 1990, 2850, 3500], VOICED_BW, 60, 60, true),
            S::P => tpl([200, 1100, 2150, 3500], NOISE_BW, 80, 0, false),
            S::T => tpl([200, 1600, 2600, 3500], NOISE_BW, 80, 0, false),
            S::K => tpl([200, 1990, 2850, 3500], NOISE_BW, 80, 0, false),
            S::V => tpl([220, 1100, 2080, 3500], VOICED_BW, 80, 50, true),
            S::Dh => tpl([200, 1600, 2600, 3500], VOICED_BW, 60, 50, true),
            S::Z => tpl([200, 1600, 2600, 3500], VOICED_BW, 80, 50, true),
            S::Zh => tpl([200, 1900, 2500, 3500], VOICED_BW, 80, 50, true),
            S::F => tpl([220, 1100, 2080, 3500], NOISE_BW, 100, 0, false),
            S::Th => tpl([200, 1600, 2600, 3500], NOISE_BW, 80, 0, false),
            S::S => tpl([200, 1600, 2600, 3500], NOISE_BW, 100, 0, false),
            S::Sh => tpl([200, 1900, 2500, 3500], NOISE_BW, 100, 0, false),
            S::Hh => tpl([500, 1500, 2500, 3500], NOISE_BW, 60, 0, false),
            S::Ch => tpl([200, 1900, 2500, 3500], NOISE_BW, 120, 0, false),
            S::Jh => tpl([200, 1900, 2500, 3500], VOICED_BW, 100, 50, true),
            S::M => tpl([270, 1000, 2200, 3500], VOICED_BW, 80, 60, true),
            S::N => tpl([270, 1600, 2600, 3500], VOICED_BW, 80, 60, true),
            S::Ng => tpl([270, 1990, 2850, 3500], VOICED_BW, 80, 60, true),
            S::L => tpl([310, 1050, 2880, 3500], VOICED_BW, 80, 60, true),
            S::R => tpl([310, 1060, 1380, 3500], VOICED_BW, 80, 60, true),
            S::W => tpl([290, 610, 2150, 3500], VOICED_BW, 60, 60, true),
            S::Y => tpl([260, 2070, 3020, 3500], VOICED_BW, 60, 60, true),
            S::Sil => tpl([0, 0, 0, 0], NOISE_BW, 100, 0, false),
            S::Pau => tpl([0, 0, 0, 0], NOISE_BW, 150, 0, false),
        }
    }
}

impl fmt::Display for PhonemeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known ARPAbet symbols.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown phoneme symbol '{0}'")]
pub struct UnknownSymbol(pub String);

impl FromStr for PhonemeSymbol {
    type Err = UnknownSymbol;

    /// Parses ARPAbet text, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|sym| sym.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSymbol(s.to_owned()))
    }
}

const VOICED_BW: [u16; 4] = [60, 90, 150, 200];
const NOISE_BW: [u16; 4] = [200, 200, 200, 200];

const fn tpl(
    formants: [u16; 4],
    bandwidths: [u16; 4],
    duration_ms: u32,
    av: u8,
    voiced: bool,
) -> PhonemeTemplate {
    PhonemeTemplate {
        formants,
        bandwidths,
        duration_ms,
        av,
        voiced,
    }
}

/// Static acoustic template of a phoneme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhonemeTemplate {
    /// F1 to F4 centre frequencies in Hz
    pub formants: [u16; 4],
    /// B1 to B4 bandwidths in Hz
    pub bandwidths: [u16; 4],
    /// nominal duration in ms
    pub duration_ms: u32,
    /// voicing amplitude, 0 .. 80 (dB-like)
    pub av: u8,
    pub voiced: bool,
}

/// Aspiration amplitude given to unvoiced phonemes.
pub const UNVOICED_ASPIRATION: f64 = 20.0;
/// Frication amplitude given to strident phonemes.
pub const STRIDENT_FRICATION: f64 = 40.0;

/// A phoneme occurrence with its runtime excitation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Phoneme {
    pub symbol: PhonemeSymbol,
    /// duration in ms
    pub duration_ms: u32,
    /// F1 to F4 in Hz
    pub formants: [f64; 4],
    /// B1 to B4 in Hz
    pub bandwidths: [f64; 4],
    /// fundamental frequency in Hz
    pub f0: f64,
    /// voicing amplitude
    pub av: f64,
    /// aspiration amplitude
    pub ah: f64,
    /// frication amplitude
    pub af: f64,
    pub voiced: bool,
}

impl Phoneme {
    /// Builds a phoneme occurrence from the template of `symbol`.
    #[must_use]
    pub fn from_symbol(symbol: PhonemeSymbol, f0: f64) -> Self {
        let template = symbol.template();
        Phoneme {
            symbol,
            duration_ms: template.duration_ms,
            formants: template.formants.map(f64::from),
            bandwidths: template.bandwidths.map(f64::from),
            f0,
            av: f64::from(template.av),
            ah: if template.voiced {
                0.0
            } else {
                UNVOICED_ASPIRATION
            },
            af: if symbol.is_strident() {
                STRIDENT_FRICATION
            } else {
                0.0
            },
            voiced: template.voiced,
        }
    }
}

/// Looks up phoneme templates and fills in the runtime fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhonemeTable {
    default_f0: f64,
}

impl Default for PhonemeTable {
    fn default() -> Self {
        Self::new(Self::DEFAULT_F0)
    }
}

impl PhonemeTable {
    pub const DEFAULT_F0: f64 = 120.0;

    #[must_use]
    pub fn new(default_f0: f64) -> Self {
        PhonemeTable { default_f0 }
    }

    #[must_use]
    pub fn default_f0(&self) -> f64 {
        self.default_f0
    }

    /// Looks up an ARPAbet symbol, ignoring case. Unknown symbols yield `None`.
    #[must_use]
    pub fn lookup(&self, symbol: &str) -> Option<Phoneme> {
        symbol.parse().ok().map(|sym| self.phoneme(sym))
    }

    /// Builds the phoneme for an already-typed symbol.
    #[must_use]
    pub fn phoneme(&self, symbol: PhonemeSymbol) -> Phoneme {
        Phoneme::from_symbol(symbol, self.default_f0)
    }
}
