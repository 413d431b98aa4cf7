//! Sounds and particles emitted by the liquid engine.
//!
//! The engine never plays anything itself. Effects are collected during an
//! update and handed to a [`LiquidEffects`] implementation after the update's
//! writes are committed.

use sluice_utils::BlockPos;
use sluice_utils::math::Vector3;

/// Kind of particle in a burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// White smoke rising from a liquid collision.
    Steam,
}

/// A group of particles spawned together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBurst {
    /// Particle kind.
    pub kind: ParticleKind,
    /// Voxel the burst is centred on.
    pub pos: BlockPos,
    /// Number of particles.
    pub count: u16,
    /// Random spawn offset per axis, in blocks.
    pub spread: Vector3<f32>,
    /// Initial upward speed, in blocks per second.
    pub rise_speed: f32,
}

impl ParticleBurst {
    /// The steam puff of a liquid collision.
    #[must_use]
    pub const fn steam(pos: BlockPos) -> Self {
        Self {
            kind: ParticleKind::Steam,
            pos,
            count: 8,
            spread: Vector3::new(0.5, 0.25, 0.5),
            rise_speed: 0.6,
        }
    }
}

/// An effect queued by an update.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectEvent {
    /// A positional sound.
    Sound {
        /// Sound code.
        sound: String,
        /// Source voxel.
        pos: BlockPos,
        /// Audible range, in blocks.
        range: f32,
    },
    /// A particle burst.
    Particles(ParticleBurst),
}

impl EffectEvent {
    /// Hands this event to a sink.
    pub fn emit<E: LiquidEffects + ?Sized>(&self, effects: &mut E) {
        match self {
            EffectEvent::Sound { sound, pos, range } => effects.play_sound(sound, *pos, *range),
            EffectEvent::Particles(burst) => effects.spawn_particles(burst),
        }
    }
}

/// Sink for sounds and particles.
pub trait LiquidEffects {
    /// Plays a sound at a voxel.
    fn play_sound(&mut self, sound: &str, pos: BlockPos, range: f32);

    /// Spawns a particle burst.
    fn spawn_particles(&mut self, burst: &ParticleBurst);
}

/// Discards every effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEffects;

impl LiquidEffects for NoEffects {
    fn play_sound(&mut self, _sound: &str, _pos: BlockPos, _range: f32) {}

    fn spawn_particles(&mut self, _burst: &ParticleBurst) {}
}

/// Logs every effect at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEffects;

impl LiquidEffects for LogEffects {
    fn play_sound(&mut self, sound: &str, pos: BlockPos, range: f32) {
        log::info!("Sound `{sound}` at {pos} (range {range})");
    }

    fn spawn_particles(&mut self, burst: &ParticleBurst) {
        log::info!("{} {:?} particles at {}", burst.count, burst.kind, burst.pos);
    }
}

/// Keeps every effect, in emission order.
#[derive(Debug, Clone, Default)]
pub struct RecordedEffects {
    /// Everything emitted so far.
    pub events: Vec<EffectEvent>,
}

impl RecordedEffects {
    /// Sounds played so far.
    pub fn sounds(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|event| match event {
            EffectEvent::Sound { sound, .. } => Some(sound.as_str()),
            EffectEvent::Particles(_) => None,
        })
    }
}

impl LiquidEffects for RecordedEffects {
    fn play_sound(&mut self, sound: &str, pos: BlockPos, range: f32) {
        self.events.push(EffectEvent::Sound {
            sound: sound.to_string(),
            pos,
            range,
        });
    }

    fn spawn_particles(&mut self, burst: &ParticleBurst) {
        self.events.push(EffectEvent::Particles(*burst));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_into_recorder() {
        let mut recorded = RecordedEffects::default();
        let pos = BlockPos::new(1, 2, 3);
        EffectEvent::Particles(ParticleBurst::steam(pos)).emit(&mut recorded);
        EffectEvent::Sound {
            sound: "sizzle".to_string(),
            pos,
            range: 16.0,
        }
        .emit(&mut recorded);

        assert_eq!(recorded.events.len(), 2);
        assert_eq!(recorded.sounds().collect::<Vec<_>>(), vec!["sizzle"]);
    }
}
