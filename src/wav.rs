//! Encoding and decoding of uncompressed PCM WAV data.
//!
//! The writer always emits the canonical 44-byte header (`RIFF`, `fmt `,
//! `data`). The reader walks the chunk list and accepts any 8 or 16 bit
//! integer PCM stream.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::audio::AudioBuffer;
use crate::error::{Error, Result};
use crate::math::round;

/// Size of the canonical header written by [`encode`].
pub const HEADER_LEN: usize = 44;

const FORMAT_PCM: u16 = 1;

/// Converts samples to PCM bytes, clipping to `-1 .. 1`.
fn samples_to_pcm(samples: &[f64], bits_per_sample: u16) -> Result<Vec<u8>> {
    match bits_per_sample {
        16 => {
            let mut pcm = Vec::with_capacity(samples.len() * 2);
            for &sample in samples {
                let value = round(sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                pcm.extend_from_slice(&value.to_le_bytes());
            }
            Ok(pcm)
        }
        // 8 bit PCM is unsigned with a midpoint of 128
        8 => Ok(samples
            .iter()
            .map(|s| (round(s.clamp(-1.0, 1.0) * 127.0) + 128.0) as u8)
            .collect()),
        bits => Err(Error::UnsupportedBitDepth { bits }),
    }
}

/// Writes `audio` as a complete WAV stream.
///
/// # Errors
///
/// Fails on a bit depth other than 8 or 16, on data too large for a RIFF
/// size field, on a format whose byte rate or block align overflows its
/// header field, or when the writer fails.
pub fn write_wav<W: Write>(writer: &mut W, audio: &AudioBuffer) -> Result<()> {
    let bits = audio.bits_per_sample();
    let pcm = samples_to_pcm(audio.samples(), bits)?;
    let data_size = u32::try_from(pcm.len())
        .ok()
        .filter(|size| size.checked_add(36).is_some())
        .ok_or_else(|| Error::invalid_param("samples", "too many samples for a WAV stream"))?;
    let file_size = 36 + data_size;

    let block_align = audio
        .channels()
        .checked_mul(bits / 8)
        .ok_or_else(|| Error::invalid_param("channels", "block align does not fit in 16 bits"))?;
    let byte_rate = audio
        .sample_rate()
        .checked_mul(u32::from(block_align))
        .ok_or_else(|| Error::invalid_param("sample_rate", "byte rate does not fit in 32 bits"))?;

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&FORMAT_PCM.to_le_bytes())?;
    writer.write_all(&audio.channels().to_le_bytes())?;
    writer.write_all(&audio.sample_rate().to_le_bytes())?;
    writer.write_all(&byte_rate.to_le_bytes())?;
    writer.write_all(&block_align.to_le_bytes())?;
    writer.write_all(&bits.to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(&pcm)?;

    Ok(())
}

/// Encodes `audio` into WAV bytes.
///
/// # Errors
///
/// See [`write_wav`].
pub fn encode(audio: &AudioBuffer) -> Result<Vec<u8>> {
    let bytes_per_sample = usize::from(audio.bits_per_sample() / 8);
    let mut buffer = Vec::with_capacity(HEADER_LEN + audio.len() * bytes_per_sample);
    write_wav(&mut buffer, audio)?;
    Ok(buffer)
}

fn u16_at(bytes: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([bytes[pos], bytes[pos + 1]])
}

fn u32_at(bytes: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
}

struct FmtChunk {
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

fn parse_fmt(body: &[u8]) -> Result<FmtChunk> {
    if body.len() < 16 {
        return Err(Error::TruncatedChunk {
            chunk: "fmt ".to_owned(),
        });
    }
    let format_tag = u16_at(body, 0);
    if format_tag != FORMAT_PCM {
        return Err(Error::UnsupportedEncoding { format_tag });
    }
    let bits_per_sample = u16_at(body, 14);
    if bits_per_sample != 8 && bits_per_sample != 16 {
        return Err(Error::UnsupportedBitDepth {
            bits: bits_per_sample,
        });
    }
    let channels = u16_at(body, 2);
    if channels == 0 {
        return Err(Error::invalid_param("channels", "WAV stream declares zero channels"));
    }
    Ok(FmtChunk {
        channels,
        sample_rate: u32_at(body, 4),
        bits_per_sample,
    })
}

/// Decodes a WAV stream.
///
/// Unknown chunks are skipped. 16 bit samples are scaled by `1 / 32768`,
/// 8 bit samples are mapped with `(b - 128) / 128`.
///
/// # Errors
///
/// Returns a format error for missing `RIFF`/`WAVE` tags, a missing `fmt `
/// or `data` chunk, a chunk that runs past the end of the stream or an
/// encoding other than 8 or 16 bit integer PCM.
pub fn decode(bytes: &[u8]) -> Result<AudioBuffer> {
    if bytes.get(0..4) != Some(&b"RIFF"[..]) {
        return Err(Error::InvalidMagic { expected: "RIFF" });
    }
    if bytes.get(8..12) != Some(&b"WAVE"[..]) {
        return Err(Error::InvalidMagic { expected: "WAVE" });
    }

    let mut fmt = None;
    let mut data = None;
    let mut pos = 12;
    while pos + 8 <= bytes.len() && (fmt.is_none() || data.is_none()) {
        let id = &bytes[pos..pos + 4];
        let size = u32_at(bytes, pos + 4) as usize;
        let start = pos + 8;
        let body = start
            .checked_add(size)
            .and_then(|end| bytes.get(start..end))
            .ok_or_else(|| Error::TruncatedChunk {
                chunk: String::from_utf8_lossy(id).into_owned(),
            })?;

        match id {
            b"fmt " => fmt = Some(parse_fmt(body)?),
            b"data" => data = Some(body),
            _ => log::trace!("skipping WAV chunk {:?}", String::from_utf8_lossy(id)),
        }

        // chunks are word aligned
        pos = start + size + (size % 2);
    }

    let fmt = fmt.ok_or(Error::MissingChunk { chunk: "fmt " })?;
    let data = data.ok_or(Error::MissingChunk { chunk: "data" })?;

    let samples = if fmt.bits_per_sample == 16 {
        data.chunks_exact(2)
            .map(|b| f64::from(i16::from_le_bytes([b[0], b[1]])) / 32768.0)
            .collect()
    } else {
        data.iter()
            .map(|&b| (f64::from(b) - 128.0) / 128.0)
            .collect()
    };

    Ok(
        AudioBuffer::with_format(fmt.sample_rate, fmt.channels, fmt.bits_per_sample)
            .with_samples(samples),
    )
}

/// Writes `audio` to a WAV file, replacing any existing file.
///
/// # Errors
///
/// See [`write_wav`]. I/O errors are returned as [`Error::Io`].
pub fn write(path: impl AsRef<Path>, audio: &AudioBuffer) -> Result<()> {
    // encode first so an unsupported format leaves no file behind
    let bytes = encode(audio)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Reads a WAV file.
///
/// # Errors
///
/// See [`decode`]. I/O errors are returned as [`Error::Io`].
pub fn read(path: impl AsRef<Path>) -> Result<AudioBuffer> {
    let mut bytes = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;
    decode(&bytes)
}
