/// Sound effects: short procedural chiptune cues played through rodio.
///
/// Each cue is a list of notes rendered once at startup into an
/// in-memory WAV buffer. Playback is fire-and-forget on a detached Sink,
/// so a cue never holds up the game loop.
///
/// Build without the "sound" feature to get a silent stub with the same API.

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use log::warn;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// One note of a cue. `to_hz` differs from `hz` for slides.
    #[derive(Clone, Copy)]
    struct Note {
        hz: f32,
        to_hz: f32,
        secs: f32,
        volume: f32,
    }

    const fn note(hz: f32, secs: f32) -> Note {
        Note { hz, to_hz: hz, secs, volume: 0.25 }
    }

    const fn slide(hz: f32, to_hz: f32, secs: f32) -> Note {
        Note { hz, to_hz, secs, volume: 0.3 }
    }

    // A4 = 440; C5 = 523, E5 = 659, G5 = 784, C6 = 1047
    const CUE_START: &[Note] = &[note(523.0, 0.06), note(784.0, 0.09)];
    const CUE_EAT: &[Note] = &[note(880.0, 0.03), note(1175.0, 0.04)];
    const CUE_BEST: &[Note] = &[
        note(659.0, 0.07),
        note(784.0, 0.07),
        note(1047.0, 0.07),
        note(1319.0, 0.16),
    ];
    const CUE_DIE: &[Note] = &[slide(440.0, 110.0, 0.45)];
    const CUE_FILLED: &[Note] = &[
        note(523.0, 0.1),
        note(659.0, 0.1),
        note(784.0, 0.1),
        note(1047.0, 0.3),
    ];

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        start: Arc<Vec<u8>>,
        eat: Arc<Vec<u8>>,
        best: Arc<Vec<u8>>,
        die: Arc<Vec<u8>>,
        filled: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        /// `None` when no audio device is available.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("sound: no output device: {e}");
                    return None;
                }
            };
            let cue = |notes: &[Note]| Arc::new(make_wav(&render(notes)));
            Some(SoundEngine {
                _stream: stream,
                handle,
                start: cue(CUE_START),
                eat: cue(CUE_EAT),
                best: cue(CUE_BEST),
                die: cue(CUE_DIE),
                filled: cue(CUE_FILLED),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            let Ok(sink) = Sink::try_new(&self.handle) else { return };
            if let Ok(src) = rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                sink.append(src);
                sink.detach();
            }
        }

        pub fn play_start(&self) { self.play(&self.start); }
        pub fn play_eat(&self) { self.play(&self.eat); }
        pub fn play_high_score(&self) { self.play(&self.best); }
        pub fn play_die(&self) { self.play(&self.die); }
        pub fn play_board_filled(&self) { self.play(&self.filled); }
    }

    // ════════════════════════════════════════════════════════════
    //  Synthesis
    // ════════════════════════════════════════════════════════════

    /// Square-ish wave (fundamental plus third harmonic) with a short
    /// attack and a linear release. Slides sweep frequency linearly.
    fn render(notes: &[Note]) -> Vec<f32> {
        let mut out = Vec::new();
        for n in notes {
            let len = (SAMPLE_RATE as f32 * n.secs) as usize;
            let attack = (len / 20).max(1);
            let mut phase = 0.0_f32;
            for i in 0..len {
                let t = i as f32 / len as f32;
                let hz = n.hz + (n.to_hz - n.hz) * t;
                phase += hz / SAMPLE_RATE as f32;
                let wave = (phase * TAU).sin() * 0.75 + (phase * 3.0 * TAU).sin() * 0.25;
                let env = if i < attack { i as f32 / attack as f32 } else { 1.0 - t };
                out.push(wave * env * n.volume);
            }
        }
        out
    }

    /// 16-bit mono PCM WAV.
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        const CHANNELS: u16 = 1;
        const BITS: u16 = 16;
        let block_align = CHANNELS * BITS / 8;
        let byte_rate = SAMPLE_RATE * block_align as u32;
        let data_len = samples.len() as u32 * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_len as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_len).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&CHANNELS.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&BITS.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_len.to_le_bytes());
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API: no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_start(&self) {}
    pub fn play_eat(&self) {}
    pub fn play_high_score(&self) {}
    pub fn play_die(&self) {}
    pub fn play_board_filled(&self) {}
}
