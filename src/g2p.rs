//! English letter-to-sound conversion.
//!
//! Words found in a small dictionary of irregular, high-frequency words use
//! its pronunciation; everything else goes through digraph and single-letter
//! rules.

use crate::phonemes::PhonemeSymbol::{
    self, Aa, Ae, Ah, Ao, Aw, Ax, Ay, B, Ch, D, Dh, Eh, Er, Ey, F, G, Hh, Ih, Iy, Jh, K, L, M, N,
    Ng, Ow, Oy, P, Pau, R, S, Sh, Sil, T, Th, Uh, Uw, V, W, Y, Z,
};

const PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Irregular pronunciations, keyed by lower-case word.
const DICTIONARY: &[(&str, &[PhonemeSymbol])] = &[
    ("the", &[Dh, Ax]),
    ("a", &[Ax]),
    ("an", &[Ae, N]),
    ("and", &[Ae, N, D]),
    ("to", &[T, Uw]),
    ("of", &[Ah, V]),
    ("in", &[Ih, N]),
    ("is", &[Ih, Z]),
    ("it", &[Ih, T]),
    ("you", &[Y, Uw]),
    ("that", &[Dh, Ae, T]),
    ("he", &[Hh, Iy]),
    ("was", &[W, Aa, Z]),
    ("for", &[F, Ao, R]),
    ("on", &[Aa, N]),
    ("are", &[Aa, R]),
    ("with", &[W, Ih, Dh]),
    ("as", &[Ae, Z]),
    ("his", &[Hh, Ih, Z]),
    ("they", &[Dh, Ey]),
    ("be", &[B, Iy]),
    ("at", &[Ae, T]),
    ("one", &[W, Ah, N]),
    ("have", &[Hh, Ae, V]),
    ("this", &[Dh, Ih, S]),
    ("from", &[F, R, Ah, M]),
    ("or", &[Ao, R]),
    ("had", &[Hh, Ae, D]),
    ("by", &[B, Ay]),
    ("not", &[N, Aa, T]),
    ("but", &[B, Ah, T]),
    ("what", &[W, Ah, T]),
    ("all", &[Ao, L]),
    ("were", &[W, Er]),
    ("we", &[W, Iy]),
    ("when", &[W, Eh, N]),
    ("your", &[Y, Ao, R]),
    ("can", &[K, Ae, N]),
    ("said", &[S, Eh, D]),
    ("there", &[Dh, Eh, R]),
    ("use", &[Y, Uw, Z]),
    ("each", &[Iy, Ch]),
    ("which", &[W, Ih, Ch]),
    ("she", &[Sh, Iy]),
    ("do", &[D, Uw]),
    ("how", &[Hh, Aw]),
    ("their", &[Dh, Eh, R]),
    ("if", &[Ih, F]),
    ("will", &[W, Ih, L]),
    ("up", &[Ah, P]),
    ("other", &[Ah, Dh, Er]),
    ("about", &[Ax, B, Aw, T]),
    ("out", &[Aw, T]),
    ("many", &[M, Eh, N, Iy]),
    ("then", &[Dh, Eh, N]),
    ("them", &[Dh, Eh, M]),
    ("these", &[Dh, Iy, Z]),
    ("so", &[S, Ow]),
    ("some", &[S, Ah, M]),
    ("her", &[Hh, Er]),
    ("would", &[W, Uh, D]),
    ("make", &[M, Ey, K]),
    ("like", &[L, Ay, K]),
    ("him", &[Hh, Ih, M]),
    ("into", &[Ih, N, T, Uw]),
    ("time", &[T, Ay, M]),
    ("has", &[Hh, Ae, Z]),
    ("look", &[L, Uh, K]),
    ("two", &[T, Uw]),
    ("more", &[M, Ao, R]),
    ("go", &[G, Ow]),
    ("see", &[S, Iy]),
    ("no", &[N, Ow]),
    ("way", &[W, Ey]),
    ("could", &[K, Uh, D]),
    ("my", &[M, Ay]),
    ("than", &[Dh, Ae, N]),
    ("first", &[F, Er, S, T]),
    ("been", &[B, Ih, N]),
    ("call", &[K, Ao, L]),
    ("who", &[Hh, Uw]),
    ("its", &[Ih, T, S]),
    ("now", &[N, Aw]),
    ("find", &[F, Ay, N, D]),
    ("long", &[L, Ao, Ng]),
    ("down", &[D, Aw, N]),
    ("day", &[D, Ey]),
    ("did", &[D, Ih, D]),
    ("get", &[G, Eh, T]),
    ("come", &[K, Ah, M]),
    ("made", &[M, Ey, D]),
    ("may", &[M, Ey]),
    ("part", &[P, Aa, R, T]),
    ("hello", &[Hh, Ax, L, Ow]),
    ("world", &[W, Er, L, D]),
    ("yes", &[Y, Eh, S]),
    ("know", &[N, Ow]),
    ("think", &[Th, Ih, Ng, K]),
    ("just", &[Jh, Ah, S, T]),
    ("good", &[G, Uh, D]),
    ("new", &[N, Uw]),
    ("want", &[W, Aa, N, T]),
    ("because", &[B, Ih, K, Ao, Z]),
    ("any", &[Eh, N, Iy]),
    ("give", &[G, Ih, V]),
    ("most", &[M, Ow, S, T]),
    ("only", &[Ow, N, L, Iy]),
];

/// Letter pairs, tested in order before single letters.
const DIGRAPHS: &[(&[u8; 2], &[PhonemeSymbol])] = &[
    (b"th", &[Th]),
    (b"sh", &[Sh]),
    (b"ch", &[Ch]),
    (b"ph", &[F]),
    (b"wh", &[W]),
    (b"ng", &[Ng]),
    (b"ck", &[K]),
    (b"gh", &[]),
    (b"wr", &[R]),
    (b"kn", &[N]),
    (b"qu", &[K, W]),
    (b"ee", &[Iy]),
    (b"ea", &[Iy]),
    (b"oo", &[Uw]),
    (b"ou", &[Aw]),
    (b"ow", &[Ow]),
    (b"oi", &[Oy]),
    (b"oy", &[Oy]),
    (b"ai", &[Ey]),
    (b"ay", &[Ey]),
    (b"ie", &[Iy]),
    (b"ey", &[Iy]),
];

fn letter(c: u8) -> &'static [PhonemeSymbol] {
    match c {
        b'a' => &[Ae],
        b'b' => &[B],
        b'c' | b'k' => &[K],
        b'd' => &[D],
        b'e' => &[Eh],
        b'f' => &[F],
        b'g' => &[G],
        b'h' => &[Hh],
        b'i' => &[Ih],
        b'j' => &[Jh],
        b'l' => &[L],
        b'm' => &[M],
        b'n' => &[N],
        b'o' => &[Aa],
        b'p' => &[P],
        b'q' => &[K, W],
        b'r' => &[R],
        b's' => &[S],
        b't' => &[T],
        b'u' => &[Ah],
        b'v' => &[V],
        b'w' => &[W],
        b'x' => &[K, S],
        b'y' => &[Y],
        b'z' => &[Z],
        _ => &[],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Punctuation,
}

/// Splits lower-cased text into words and punctuation. Whitespace and any
/// other character only delimit tokens.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start = None;
    for (i, c) in text.char_indices() {
        let in_word = c.is_ascii_lowercase() || c == '\'';
        match (in_word, word_start) {
            (true, None) => word_start = Some(i),
            (false, Some(start)) => {
                tokens.push(Token::Word(&text[start..i]));
                word_start = None;
            }
            _ => {}
        }
        if PUNCTUATION.contains(&c) {
            tokens.push(Token::Punctuation);
        }
    }
    if let Some(start) = word_start {
        tokens.push(Token::Word(&text[start..]));
    }
    tokens
}

/// Converts English text to a phoneme sequence.
///
/// Stateless: the same text always produces the same sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextToPhoneme;

impl TextToPhoneme {
    #[must_use]
    pub fn new() -> Self {
        TextToPhoneme
    }

    /// Converts `text` to phonemes. Every word is followed by `SIL`, and a
    /// non-empty result always ends in `PAU`.
    #[must_use]
    pub fn convert(&self, text: &str) -> Vec<PhonemeSymbol> {
        let text = text.trim().to_lowercase();
        let mut phonemes = Vec::new();

        for token in tokenize(&text) {
            match token {
                Token::Punctuation => phonemes.push(Pau),
                Token::Word(word) => {
                    match lookup_word(word) {
                        Some(pronunciation) => phonemes.extend_from_slice(pronunciation),
                        None => convert_word(word, &mut phonemes),
                    }
                    phonemes.push(Sil);
                }
            }
        }

        if phonemes.last().is_some_and(|last| *last != Pau) {
            phonemes.push(Pau);
        }
        phonemes
    }
}

/// Dictionary pronunciation of a lower-case word.
#[must_use]
pub fn lookup_word(word: &str) -> Option<&'static [PhonemeSymbol]> {
    DICTIONARY
        .iter()
        .find(|(entry, _)| *entry == word)
        .map(|(_, phonemes)| *phonemes)
}

/// Applies the letter-to-sound rules to one lower-case word.
fn convert_word(word: &str, out: &mut Vec<PhonemeSymbol>) {
    let letters = word.as_bytes();
    let mut i = 0;

    while i < letters.len() {
        if letters[i] == b'\'' {
            i += 1;
            continue;
        }

        let digraph = letters
            .get(i..i + 2)
            .and_then(|pair| DIGRAPHS.iter().find(|(digraph, _)| &digraph[..] == pair));
        if let Some((_, phones)) = digraph {
            out.extend_from_slice(phones);
            i += 2;
            continue;
        }

        let next = letters.get(i + 1).copied();
        let softened = matches!(next, Some(b'e' | b'i' | b'y'));
        match letters[i] {
            b'c' if softened => out.push(S),
            b'g' if softened => out.push(Jh),
            b'e' if i == letters.len() - 1 => {}
            c => out.extend_from_slice(letter(c)),
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(text: &str) -> Vec<&'static str> {
        TextToPhoneme::new()
            .convert(text)
            .into_iter()
            .map(PhonemeSymbol::as_str)
            .collect()
    }

    #[test]
    fn dictionary_word() {
        assert_eq!(convert("the"), ["DH", "AX", "SIL", "PAU"]);
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(convert("").is_empty());
        assert!(convert("   \t\n").is_empty());
        assert!(convert("42 %").is_empty());
    }

    #[test]
    fn lone_punctuation() {
        assert_eq!(convert("."), ["PAU"]);
        assert_eq!(convert("?!"), ["PAU", "PAU"]);
    }

    #[test]
    fn sentence_with_punctuation() {
        assert_eq!(
            convert("Hello, world!"),
            ["HH", "AX", "L", "OW", "SIL", "PAU", "W", "ER", "L", "D", "SIL", "PAU"]
        );
    }

    #[test]
    fn final_pause_is_appended_once() {
        assert_eq!(convert("go"), ["G", "OW", "SIL", "PAU"]);
        assert_eq!(convert("go."), ["G", "OW", "SIL", "PAU"]);
    }

    #[test]
    fn hard_and_soft_consonants() {
        assert_eq!(convert("cat"), ["K", "AE", "T", "SIL", "PAU"]);
        assert_eq!(convert("city"), ["S", "IH", "T", "Y", "SIL", "PAU"]);
        assert_eq!(convert("gem"), ["JH", "EH", "M", "SIL", "PAU"]);
        assert_eq!(convert("gut"), ["G", "AH", "T", "SIL", "PAU"]);
    }

    #[test]
    fn silent_final_e() {
        assert_eq!(convert("cake"), ["K", "AE", "K", "SIL", "PAU"]);
        assert_eq!(convert("phone"), ["F", "AA", "N", "SIL", "PAU"]);
    }

    #[test]
    fn digraphs() {
        assert_eq!(convert("ship"), ["SH", "IH", "P", "SIL", "PAU"]);
        assert_eq!(convert("knight"), ["N", "IH", "T", "SIL", "PAU"]);
        assert_eq!(convert("queen"), ["K", "W", "IY", "N", "SIL", "PAU"]);
        assert_eq!(convert("show"), ["SH", "OW", "SIL", "PAU"]);
        assert_eq!(convert("wrist"), ["R", "IH", "S", "T", "SIL", "PAU"]);
    }

    #[test]
    fn apostrophes_are_skipped() {
        assert_eq!(convert("don't"), ["D", "AA", "N", "T", "SIL", "PAU"]);
    }

    #[test]
    fn multi_phoneme_letters() {
        assert_eq!(convert("box"), ["B", "AA", "K", "S", "SIL", "PAU"]);
    }

    #[test]
    fn words_are_separated_by_silence() {
        assert_eq!(convert("a b"), ["AX", "SIL", "B", "SIL", "PAU"]);
    }

    #[test]
    fn conversion_is_repeatable() {
        let g2p = TextToPhoneme::new();
        let text = "The quick brown fox; jumps over the lazy dog.";
        assert_eq!(g2p.convert(text), g2p.convert(text));
    }

    #[test]
    fn tokenizer_splits_on_other_characters() {
        assert_eq!(
            tokenize("it-was"),
            [Token::Word("it"), Token::Word("was")]
        );
        assert_eq!(
            tokenize("so, it"),
            [Token::Word("so"), Token::Punctuation, Token::Word("it")]
        );
    }
}
