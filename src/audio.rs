//! Audio cue routing
//!
//! The simulation only emits events. This module turns them into sound
//! effects, applies mute and volume, and hands the result to a backend.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Task solved
    Solve,
    /// Keystroke rejected
    Error,
    /// Level increased
    LevelUp,
    /// Power-up collected
    PowerUp,
    /// Task hit the bottom unshielded
    Damage,
    /// Run ended
    GameOver,
    /// New high score
    HighScore,
    /// Correct key in a tutorial drill
    Keystroke,
}

impl SoundEffect {
    /// Cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::TaskSolved { .. } => Some(SoundEffect::Solve),
            GameEvent::InputRejected => Some(SoundEffect::Error),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::PowerUpActivated { .. } => Some(SoundEffect::PowerUp),
            GameEvent::TaskMissed { damage, .. } if *damage > 0 => Some(SoundEffect::Damage),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::NewHighScore { .. } => Some(SoundEffect::HighScore),
            GameEvent::TutorialKeyAccepted => Some(SoundEffect::Keystroke),
            _ => None,
        }
    }

    /// Relative loudness before volume settings
    fn base_gain(&self) -> f32 {
        match self {
            SoundEffect::Error => 0.5,
            SoundEffect::Keystroke => 0.15,
            SoundEffect::Solve => 0.7,
            SoundEffect::Damage => 0.8,
            _ => 1.0,
        }
    }
}

/// Whatever actually makes noise
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, gain: f32);
}

/// Backend that only logs; used headless
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, gain: f32) {
        log::debug!("sfx {:?} gain {:.2}", effect, gain);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Pick up volume and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.muted = !settings.sound_enabled;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        let gain = effect.base_gain() * self.master_volume * self.sfx_volume;
        if gain > 0.0 {
            self.backend.play(effect, gain);
        }
    }

    /// Play the cues for a batch of drained events
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::SoundToggled { enabled } = event {
                self.set_muted(!enabled);
            }
            if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<(SoundEffect, f32)>>>);

    impl AudioBackend for Recorder {
        fn play(&mut self, effect: SoundEffect, gain: f32) {
            self.0.borrow_mut().push((effect, gain));
        }
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::InputRejected),
            Some(SoundEffect::Error)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::TaskMissed { id: 1, damage: 0 }),
            None
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::TaskSpawned { id: 1 }), None);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::TutorialKeyAccepted),
            Some(SoundEffect::Keystroke)
        );
    }

    #[test]
    fn test_mute_and_volume() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()));
        audio.apply_settings(&Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Settings::default()
        });

        audio.play(SoundEffect::LevelUp);
        assert_eq!(recorder.0.borrow().as_slice(), &[(SoundEffect::LevelUp, 0.25)]);

        audio.handle_events(&[
            GameEvent::SoundToggled { enabled: false },
            GameEvent::LevelUp { level: 2 },
        ]);
        assert!(audio.is_muted());
        assert_eq!(recorder.0.borrow().len(), 1);
    }
}
