/// Sound effects: short square/noise blips synthesised once at start-up
/// and handed to rodio's mixer as raw sample buffers.
///
/// Builds without the "sound" feature get a silent `SoundEngine`; so does
/// a machine with no audio device (`SoundEngine::new` returns `None`).

use crate::sim::event::GameEvent;

/// One effect per gameplay event family.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    Gem,
    Push,
    Thud,
    Die,
    Win,
}

impl Sfx {
    /// Effect for an event. Every event is audible.
    pub fn for_event(event: &GameEvent) -> Sfx {
        match event {
            GameEvent::GemCollected { .. } => Sfx::Gem,
            GameEvent::RockPushed { .. } => Sfx::Push,
            GameEvent::ObjectsLanded { .. } => Sfx::Thud,
            GameEvent::PlayerCrushed | GameEvent::PlayerStruck => Sfx::Die,
            GameEvent::ExitReached => Sfx::Win,
        }
    }
}

#[cfg(feature = "sound")]
mod inner {
    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle};

    use super::Sfx;

    const RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    pub struct SoundEngine {
        // Dropping the stream silences everything; keep it alive.
        _stream: OutputStream,
        handle: OutputStreamHandle,
        bank: [Vec<f32>; 5],
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };
            Some(SoundEngine {
                _stream: stream,
                handle,
                bank: [gem(), push(), thud(), die(), win()],
            })
        }

        pub fn play(&self, sfx: Sfx) {
            let samples = self.bank[slot(sfx)].clone();
            if let Err(e) = self.handle.play_raw(SamplesBuffer::new(1, RATE, samples)) {
                log::debug!("sfx {sfx:?} dropped: {e}");
            }
        }
    }

    fn slot(sfx: Sfx) -> usize {
        match sfx {
            Sfx::Gem => 0,
            Sfx::Push => 1,
            Sfx::Thud => 2,
            Sfx::Die => 3,
            Sfx::Win => 4,
        }
    }

    // ── Synthesis ──

    fn len(secs: f32) -> usize {
        (RATE as f32 * secs) as usize
    }

    /// Square wave at `freq` with a linear fade from `gain` to zero.
    fn square(freq: f32, secs: f32, gain: f32) -> impl Iterator<Item = f32> {
        let n = len(secs);
        (0..n).map(move |i| {
            let phase = (i as f32 * freq / RATE as f32).fract();
            let level = if phase < 0.5 { 1.0 } else { -1.0 };
            level * gain * (1.0 - i as f32 / n as f32)
        })
    }

    fn melody(notes: &[f32], secs: f32, gain: f32) -> Vec<f32> {
        notes.iter().flat_map(|&f| square(f, secs, gain)).collect()
    }

    fn gem() -> Vec<f32> {
        melody(&[1319.0, 1760.0, 2637.0], 0.035, 0.15)
    }

    /// Xorshift noise, deterministic so every push sounds the same.
    fn push() -> Vec<f32> {
        let n = len(0.07);
        let mut x: u32 = 0x9e37_79b9;
        (0..n)
            .map(|i| {
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                let noise = x as f32 / u32::MAX as f32 * 2.0 - 1.0;
                noise * 0.18 * (1.0 - i as f32 / n as f32)
            })
            .collect()
    }

    /// Sine sweeping down from 110 Hz.
    fn thud() -> Vec<f32> {
        let n = len(0.08);
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                phase += (110.0 - 50.0 * t) / RATE as f32;
                (phase * TAU).sin() * 0.35 * (1.0 - t) * (1.0 - t)
            })
            .collect()
    }

    fn die() -> Vec<f32> {
        melody(&[392.0, 330.0, 262.0, 196.0], 0.11, 0.2)
    }

    fn win() -> Vec<f32> {
        let mut out = melody(&[523.0, 659.0, 784.0], 0.09, 0.18);
        out.extend(square(1047.0, 0.3, 0.18));
        out
    }

}

// ── Public API ──

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> {
        None
    }

    pub fn play(&self, _sfx: Sfx) {}
}

/// Play one tick's events. Repeats of the same effect in a tick collapse
/// into one blip.
pub fn play_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let Some(engine) = sound else { return };
    let mut played: Vec<Sfx> = Vec::with_capacity(events.len());
    for sfx in events.iter().map(Sfx::for_event) {
        if !played.contains(&sfx) {
            engine.play(sfx);
            played.push(sfx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_map_to_effects() {
        assert_eq!(Sfx::for_event(&GameEvent::GemCollected { row: 1, col: 2 }), Sfx::Gem);
        assert_eq!(Sfx::for_event(&GameEvent::RockPushed { row: 1, col: 2 }), Sfx::Push);
        assert_eq!(Sfx::for_event(&GameEvent::ObjectsLanded { count: 3 }), Sfx::Thud);
        assert_eq!(Sfx::for_event(&GameEvent::PlayerStruck), Sfx::Die);
        assert_eq!(Sfx::for_event(&GameEvent::PlayerCrushed), Sfx::Die);
        assert_eq!(Sfx::for_event(&GameEvent::ExitReached), Sfx::Win);
    }

    #[test]
    fn no_engine_is_silent() {
        play_events(None, &[GameEvent::ExitReached]);
    }
}
