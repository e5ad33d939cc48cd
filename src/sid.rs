//! SID stand-in: three voices with pulse/triangle/noise waveforms, a gate
//! bit, and an attack-free decay envelope. Demos poke this model once per
//! frame the way the originals poke the chip; `audio` streams it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Pulse,
    Triangle,
    Noise,
}

pub const NUM_VOICES: usize = 3;

#[derive(Debug, Clone)]
pub struct Voice {
    pub freq: f32,
    pub wave: Waveform,
    pub gate: bool,
    /// Amplitude lost per second once the gate drops.
    pub decay: f32,
    level: f32,
    phase: f32,
    lfsr: u8,
}

impl Voice {
    fn new() -> Self {
        Self {
            freq: 0.0,
            wave: Waveform::Pulse,
            gate: false,
            decay: 8.0,
            level: 0.0,
            phase: 0.0,
            lfsr: 0x42,
        }
    }

    /// One output sample in [-1, 1], envelope applied.
    fn sample(&mut self, sample_rate: f32) -> f32 {
        if self.gate {
            self.level = 1.0;
        } else if self.level > 0.0 {
            self.level = (self.level - self.decay / sample_rate).max(0.0);
        }
        if self.level == 0.0 || self.freq <= 0.0 {
            return 0.0;
        }

        self.phase += self.freq / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
            // Noise steps its shift register once per cycle
            self.lfsr = (self.lfsr >> 1) ^ ((self.lfsr & 1).wrapping_neg() & 0xB8);
        }

        let raw = match self.wave {
            Waveform::Pulse => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
            Waveform::Noise => f32::from(self.lfsr) / 127.5 - 1.0,
        };
        raw * self.level
    }

    #[cfg(test)]
    fn is_silent(&self) -> bool {
        self.level == 0.0
    }
}

#[derive(Debug, Clone)]
pub struct Sid {
    voices: [Voice; NUM_VOICES],
    /// Master volume, 0-15 like the register.
    volume: u8,
}

impl Sid {
    pub fn new() -> Self {
        Self {
            voices: [Voice::new(), Voice::new(), Voice::new()],
            volume: 15,
        }
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume & 0x0F;
    }

    /// Gate a voice on at the given frequency.
    pub fn play(&mut self, voice: usize, freq: f32, wave: Waveform) {
        let v = &mut self.voices[voice];
        v.freq = freq;
        v.wave = wave;
        v.gate = true;
    }

    /// Drop the gate; the voice decays out.
    pub fn release(&mut self, voice: usize) {
        self.voices[voice].gate = false;
    }

    pub fn set_decay(&mut self, voice: usize, decay: f32) {
        self.voices[voice].decay = decay;
    }

    /// Release every voice.
    pub fn silence(&mut self) {
        for v in &mut self.voices {
            v.gate = false;
        }
    }

    /// Render mono samples. Called from the audio stream.
    pub fn render(&mut self, out: &mut [f32], sample_rate: f32) {
        let master = f32::from(self.volume) / 15.0 * 0.25;
        for sample in out.iter_mut() {
            let mut mix = 0.0;
            for v in &mut self.voices {
                mix += v.sample(sample_rate);
            }
            *sample = (mix * master).clamp(-1.0, 1.0);
        }
    }
}

impl Default for Sid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: f32 = 44_100.0;

    fn rendered(sid: &mut Sid, n: usize) -> Vec<f32> {
        let mut buf = vec![0.0; n];
        sid.render(&mut buf, RATE);
        buf
    }

    #[test]
    fn silent_when_nothing_gated() {
        let mut sid = Sid::new();
        assert!(rendered(&mut sid, 512).iter().all(|s| *s == 0.0));
    }

    #[test]
    fn gated_voice_produces_output() {
        let mut sid = Sid::new();
        sid.play(0, 440.0, Waveform::Pulse);
        assert!(rendered(&mut sid, 512).iter().any(|s| *s != 0.0));
    }

    #[test]
    fn pulse_swings_both_ways() {
        let mut sid = Sid::new();
        sid.play(0, 440.0, Waveform::Pulse);
        let buf = rendered(&mut sid, 1024);
        assert!(buf.iter().any(|s| *s > 0.0));
        assert!(buf.iter().any(|s| *s < 0.0));
    }

    #[test]
    fn released_voice_decays_to_silence() {
        let mut sid = Sid::new();
        sid.set_decay(0, 50.0);
        sid.play(0, 440.0, Waveform::Triangle);
        rendered(&mut sid, 64);
        sid.release(0);
        // 50/s decay empties the envelope in under a tenth of a second
        rendered(&mut sid, RATE as usize / 10);
        assert!(sid.voices[0].is_silent());
        assert!(rendered(&mut sid, 256).iter().all(|s| *s == 0.0));
    }

    #[test]
    fn samples_stay_in_range() {
        let mut sid = Sid::new();
        sid.play(0, 440.0, Waveform::Pulse);
        sid.play(1, 220.0, Waveform::Triangle);
        sid.play(2, 1000.0, Waveform::Noise);
        assert!(rendered(&mut sid, 4096)
            .iter()
            .all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn volume_register_masks_to_nybble() {
        let mut sid = Sid::new();
        sid.set_volume(0xFF);
        assert_eq!(sid.volume, 15);
        sid.set_volume(0);
        sid.play(0, 440.0, Waveform::Pulse);
        assert!(rendered(&mut sid, 256).iter().all(|s| *s == 0.0));
    }
}
