use crate::rng::create_rng;
use crate::synth::db_to_lin;
use crate::voice::Voice;
use crate::{PhonemeSymbol, PhonemeTable, TextToPhoneme};

#[test]
fn db_to_lin_works() {
    assert_eq!(db_to_lin(-25f64), 0.0);
    assert_eq!(db_to_lin(0f64), 0.0);
    assert!((db_to_lin(20f64) - 0.01).abs() < 1E-15);
    assert!((db_to_lin(50f64) - 0.316_227_766_016_837_9).abs() < 1E-12);
    assert!((db_to_lin(80f64) - 10.0).abs() < 1E-12);
}

#[test]
fn hello_phoneme_frames() {
    let symbols = TextToPhoneme.convert("hello");
    assert_eq!(
        symbols,
        [
            PhonemeSymbol::Hh,
            PhonemeSymbol::Ax,
            PhonemeSymbol::L,
            PhonemeSymbol::Ow,
            PhonemeSymbol::Sil,
            PhonemeSymbol::Pau
        ]
    );

    let voice = Voice::default();
    let table = PhonemeTable::default();
    let phonemes: Vec<_> = symbols
        .iter()
        .map(|&s| voice.apply(&table.phoneme(s)))
        .collect();
    let contour = voice.contour(&phonemes, &mut create_rng(0));
    assert_eq!(contour.len(), 6 + 6 + 8 + 14 + 10 + 15);

    // rise and fall over the phrase stays within a few percent of pitch + range / 2
    let max = contour.iter().copied().fold(f64::MIN, f64::max);
    assert!(max > voice.pitch());
    assert!(max < voice.pitch() * 1.02 + voice.pitch_range() * 0.5);
}
