//! Speaks a line of text into a WAV file.
//!
//! ```text
//! cargo run --example speak -- "Hello, world!" hello.wav female
//! ```

use formant_tts::{SynthesisConfig, Tts, Voice};
use simple_logger::SimpleLogger;

fn voice_by_name(name: &str) -> Voice {
    match name {
        "male" => Voice::male(),
        "female" => Voice::female(),
        "child" => Voice::child(),
        "robot" => Voice::robot(),
        _ => Voice::default(),
    }
}

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .unwrap();

    let mut args = std::env::args().skip(1);
    let text = args.next().unwrap_or_else(|| "Hello, world!".to_owned());
    let path = args.next().unwrap_or_else(|| "out.wav".to_owned());
    let voice = voice_by_name(&args.next().unwrap_or_default());

    let mut tts = match Tts::with_config(voice, &SynthesisConfig::default()) {
        Ok(tts) => tts,
        Err(error) => {
            println!("Error: {error}");
            std::process::exit(1);
        }
    };
    let audio = tts.synthesize(&text);
    println!(
        "{:?}: {} samples, {:.2} s at {} Hz",
        text,
        audio.len(),
        audio.duration(),
        audio.sample_rate()
    );
    if let Err(error) = formant_tts::write(&path, &audio) {
        println!("Error: {error}");
        std::process::exit(1);
    }
}
