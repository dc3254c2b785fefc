use fundsp::prelude64::*;
use rodio::{OutputStream, OutputStreamBuilder, Sink, buffer::SamplesBuffer};

const SAMPLE_RATE: u32 = 44100;

/// Sound cues the game can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Bird flapped.
    Wing,
    /// Pipe passed.
    Point,
    /// Crashed into a pipe.
    Hit,
    /// Crashed into the ground or ceiling.
    Die,
    /// New round started.
    Swoosh,
}

impl Cue {
    pub const ALL: [Cue; 5] = [Cue::Wing, Cue::Point, Cue::Hit, Cue::Die, Cue::Swoosh];
}

/// Fire-and-forget sound output. Without a device every cue is a no-op.
pub struct Audio {
    stream: Option<OutputStream>,
    bank: Vec<Vec<f32>>,
}

impl Audio {
    /// Open the default output device and synthesize every cue up front.
    pub fn open(volume: f32) -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                log::warn!("No audio output, continuing without sound: {e}");
                None
            }
        };
        let bank = match stream {
            Some(_) => Cue::ALL.iter().map(|&cue| synth(cue, volume)).collect(),
            None => Vec::new(),
        };
        Self { stream, bank }
    }

    pub fn muted() -> Self {
        Self {
            stream: None,
            bank: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.stream.is_some()
    }

    pub fn play(&self, cue: Cue) {
        let Some(stream) = &self.stream else { return };
        let Some(samples) = self.bank.get(cue as usize) else {
            return;
        };
        let sink = Sink::connect_new(stream.mixer());
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.clone()));
        sink.detach(); // Play in background
    }
}

// ── Sounds ──────────────────────────────────────────────────────────────────

fn synth(cue: Cue, volume: f32) -> Vec<f32> {
    match cue {
        Cue::Wing => {
            // Short upward chirp
            let freq = lfo(|t: f64| lerp(300.0, 900.0, (t / 0.08).min(1.0)));
            let gain = lfo(|t: f64| lerp(0.12, 0.0, (t / 0.1).min(1.0)));
            render(Box::new((freq >> square()) * gain), 0.1, volume)
        }
        Cue::Point => {
            // Two-note ding
            let freq = lfo(|t: f64| if t < 0.07 { 988.0 } else { 1319.0 });
            let gain = lfo(|t: f64| lerp(0.15, 0.0, (t / 0.25).min(1.0)));
            render(Box::new((freq >> sine()) * gain), 0.25, volume)
        }
        Cue::Hit => {
            // Noise burst
            let gain = lfo(|t: f64| lerp(0.25, 0.0, (t / 0.15).min(1.0)));
            render(Box::new(noise() * gain), 0.15, volume)
        }
        Cue::Die => {
            // 400Hz to 80Hz over 0.4s
            let freq = lfo(|t: f64| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
            let gain = lfo(|t: f64| lerp(0.15, 0.0, (t / 0.5).min(1.0)));
            render(Box::new((freq >> saw()) * gain), 0.5, volume)
        }
        Cue::Swoosh => {
            let gain = lfo(|t: f64| 0.1 * (t / 0.3 * std::f64::consts::PI).sin().max(0.0));
            render(Box::new((noise() >> lowpass_hz(1200.0, 0.7)) * gain), 0.3, volume)
        }
    }
}

fn render(mut unit: Box<dyn AudioUnit>, seconds: f64, volume: f32) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let len = (SAMPLE_RATE as f64 * seconds) as usize;
    (0..len).map(|_| unit.get_mono() * volume).collect()
}
