//! Audio system using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed. The
//! simulation never calls in here directly; the driver maps drained
//! gameplay events onto effects. Calls are fire-and-forget and a missing
//! or suspended AudioContext silently degrades to no sound.

use crate::sim::events::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Weapon fired / jump / gravity flip
    Shoot,
    /// Player took a hit
    Damage,
    /// Enemy death, barrel, stomp
    Explosion,
    /// Pickup collected or weapon swapped
    Pickup,
    /// Difficulty level increased
    LevelUp,
    /// Run ended
    GameOver,
    /// New personal best
    HighScore,
}

impl SoundEffect {
    /// Which effect accompanies a gameplay event
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::Shoot => Some(SoundEffect::Shoot),
            GameEvent::Damage => Some(SoundEffect::Damage),
            GameEvent::Explosion => Some(SoundEffect::Explosion),
            GameEvent::Pickup => Some(SoundEffect::Pickup),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<web_sys::AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        let ctx = {
            let ctx = web_sys::AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            ctx
        };
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play every effect a frame's events call for
    pub fn play_events(&self, events: &[GameEvent]) {
        for event in events {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect);
            }
        }
    }

    /// Play a sound effect (no-op off the web target)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, _effect: SoundEffect) {}

    /// Resume audio context (required after user gesture)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn resume(&self) {}

    #[cfg(target_arch = "wasm32")]
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a sound effect
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Shoot => self.play_shoot(ctx, vol),
            SoundEffect::Damage => self.play_noise(ctx, vol * 0.2, 0.1, false),
            SoundEffect::Explosion => self.play_noise(ctx, vol * 0.3, 0.3, true),
            SoundEffect::Pickup => self.play_arpeggio(
                ctx,
                vol,
                web_sys::OscillatorType::Triangle,
                &[440.0, 660.0, 880.0],
                0.1,
                0.2,
            ),
            SoundEffect::LevelUp => self.play_arpeggio(
                ctx,
                vol,
                web_sys::OscillatorType::Sine,
                &[523.25, 659.25, 783.99, 1046.5],
                0.12,
                0.4,
            ),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::HighScore => self.play_arpeggio(
                ctx,
                vol,
                web_sys::OscillatorType::Square,
                &[523.25, 783.99, 1046.5, 1567.98],
                0.1,
                0.3,
            ),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    #[cfg(target_arch = "wasm32")]
    fn create_osc(
        &self,
        ctx: &web_sys::AudioContext,
        freq: f32,
        osc_type: web_sys::OscillatorType,
    ) -> Option<(web_sys::OscillatorNode, web_sys::GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Laser zap: quick falling sweep
    #[cfg(target_arch = "wasm32")]
    fn play_shoot(&self, ctx: &web_sys::AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, web_sys::OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.1, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.1).ok();
        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(100.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Filtered noise burst; lowpass for booms, highpass for hits
    #[cfg(target_arch = "wasm32")]
    fn play_noise(&self, ctx: &web_sys::AudioContext, vol: f32, duration: f64, low: bool) {
        let sample_rate = ctx.sample_rate();
        let frames = (sample_rate as f64 * duration) as u32;
        let Ok(buffer) = ctx.create_buffer(1, frames, sample_rate) else {
            return;
        };
        if let Ok(mut data) = buffer.get_channel_data(0) {
            // Cheap xorshift noise; audio does not need the sim RNG
            let mut seed = 0x9e3779b9u32;
            for sample in data.iter_mut() {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                *sample = (seed as f32 / u32::MAX as f32) * 2.0 - 1.0;
            }
            let _ = buffer.copy_to_channel(&mut data, 0);
        }

        let Ok(noise) = ctx.create_buffer_source() else {
            return;
        };
        noise.set_buffer(Some(&buffer));

        let Ok(filter) = ctx.create_biquad_filter() else {
            return;
        };
        filter.set_type(if low {
            web_sys::BiquadFilterType::Lowpass
        } else {
            web_sys::BiquadFilterType::Highpass
        });
        filter.frequency().set_value(if low { 400.0 } else { 1000.0 });

        let Ok(gain) = ctx.create_gain() else { return };
        let t = ctx.current_time();
        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();

        if noise.connect_with_audio_node(&filter).is_err() {
            return;
        }
        if filter.connect_with_audio_node(&gain).is_err() {
            return;
        }
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }
        noise.start().ok();
    }

    /// Ascending note run (pickups, level-ups, high scores)
    #[cfg(target_arch = "wasm32")]
    fn play_arpeggio(
        &self,
        ctx: &web_sys::AudioContext,
        vol: f32,
        osc_type: web_sys::OscillatorType,
        freqs: &[f32],
        step: f64,
        note_len: f64,
    ) {
        let t = ctx.current_time();
        for (i, &freq) in freqs.iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                continue;
            };
            let start = t + i as f64 * step;
            gain.gain().set_value_at_time(vol * 0.12, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + note_len)
                .ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + note_len).ok();
        }
    }

    /// Long sawtooth slide down
    #[cfg(target_arch = "wasm32")]
    fn play_game_over(&self, ctx: &web_sys::AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 200.0, web_sys::OscillatorType::Sawtooth)
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 1.5).ok();
        osc.frequency().set_value_at_time(200.0, t).ok();
        osc.frequency().linear_ramp_to_value_at_time(50.0, t + 1.5).ok();

        osc.start().ok();
        osc.stop_with_when(t + 1.5).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_event_maps_to_an_effect() {
        let events = [
            GameEvent::Shoot,
            GameEvent::Damage,
            GameEvent::Explosion,
            GameEvent::Pickup,
            GameEvent::LevelUp { level: 2 },
            GameEvent::GameOver { score: 10 },
        ];
        for event in &events {
            assert!(SoundEffect::for_event(event).is_some());
        }
    }

    #[test]
    fn test_muted_volume_is_zero() {
        let mut audio = AudioManager::new();
        audio.set_muted(true);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_muted(false);
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(0.5);
        assert!((audio.effective_volume() - 0.25).abs() < 1e-6);
    }
}
