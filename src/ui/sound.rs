/// Sound engine: plays note strings through rodio.
///
/// Tunes are parsed by `ui::music`, rendered to a square-wave WAV buffer and
/// played fire-and-forget on a detached Sink, so the tick loop never waits
/// on audio.
///
/// Without the "sound" feature, or when no output device can be opened,
/// every call is a no-op.

/// Classic tunes used by the game.
pub mod tunes {
    pub const INTRO: &str = "MBT160O1L8CDEDCDL4ECC";
    pub const ROUND_START: &str = "T160O1>L20CDEDCDL10ECC";
    pub const PICKUP: &str = "MBO0L16>CCCE";
    pub const DEATH: &str = "MBO0L32EFGEFDC";
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use crate::ui::music::{self, Tone};

    const SAMPLE_RATE: u32 = 22050;
    const VOLUME: f32 = 0.2;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(SoundEngine { _stream: stream, handle }),
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    None
                }
            }
        }

        pub fn play(&self, tune: &str) {
            let samples = render(&music::parse(tune));
            if samples.is_empty() {
                return;
            }
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(make_wav(&samples));
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }
    }

    /// Square wave per tone, silence for rests and the articulation gap.
    fn render(tones: &[Tone]) -> Vec<f32> {
        let mut samples = Vec::new();
        for tone in tones {
            let n = (SAMPLE_RATE as f32 * tone.secs) as usize;
            let on = (n as f32 * tone.sounding) as usize;
            for i in 0..n {
                let s = match tone.freq {
                    Some(freq) if i < on => {
                        let phase = (i as f32 * freq / SAMPLE_RATE as f32).fract();
                        if phase < 0.5 { VOLUME } else { -VOLUME }
                    }
                    _ => 0.0,
                };
                samples.push(s);
            }
        }
        samples
    }

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_matches_payload() {
            let wav = make_wav(&[0.0; 100]);
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(wav.len(), 44 + 200);
            assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 200);
        }

        #[test]
        fn staccato_leaves_a_silent_gap() {
            let samples = render(&music::parse("MST120L4C"));
            let n = samples.len();
            assert!(samples[n - 1] == 0.0);
            assert!(samples[..n / 2].iter().any(|&s| s != 0.0));
        }
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _tune: &str) {}
}
