use log::info;
use std::collections::HashMap;

/// What happens when a pickable object is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Play a sound cue.
    Sound { cue: String },
    /// Play a cue and hide the object for the rest of the session.
    Tear { cue: String },
    /// Start the object's animation.
    Animate,
}

impl Reaction {
    pub fn cue(&self) -> Option<&str> {
        match self {
            Reaction::Sound { cue } | Reaction::Tear { cue } => Some(cue),
            Reaction::Animate => None,
        }
    }
}

/// Playback boundary for sound cues.
pub trait AudioSink {
    fn play(&mut self, cue: &str);
}

/// Sink that only logs the cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudioSink;

impl AudioSink for LogAudioSink {
    fn play(&mut self, cue: &str) {
        info!("Sound cue: {}", cue);
    }
}

/// Reactions keyed by stencil pick id. Id 0 is background and never reacts.
#[derive(Debug, Default, Clone)]
pub struct InteractionTable {
    reactions: HashMap<u8, Vec<Reaction>>,
}

impl InteractionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: u8, reaction: Reaction) {
        self.reactions.entry(id).or_default().push(reaction);
    }

    pub fn reactions_for(&self, id: u8) -> &[Reaction] {
        if id == 0 {
            return &[];
        }
        self.reactions.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.reactions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
