use bevy::log::warn;
use common::AnimationLabel;
use std::collections::HashSet;
use std::time::Duration;

/// Playback backend the state machine drives.
///
/// Clip handles live behind the mixer; the state machine only refers to them
/// by label.
pub trait AnimationMixer {
    fn has_clip(&self, label: AnimationLabel) -> bool;
    fn fade_out(&mut self, label: AnimationLabel, duration: Duration);
    /// Resets the clip to its first frame, fades it in and starts it.
    fn fade_in(&mut self, label: AnimationLabel, duration: Duration);
    fn play(&mut self, label: AnimationLabel);
    fn stop(&mut self, label: AnimationLabel);
    fn advance(&mut self, dt: f32);
}

/// Tracks the active locomotion clip and cross-fades between labels.
pub struct AnimationStateMachine<M> {
    mixer: M,
    current: AnimationLabel,
    fade: Duration,
    jump_overlay: bool,
    elapsed: f32,
    reported_missing: HashSet<AnimationLabel>,
}

impl<M: AnimationMixer> AnimationStateMachine<M> {
    pub fn new(mixer: M, initial: AnimationLabel, fade: Duration) -> Self {
        let mut machine = Self {
            mixer,
            current: initial,
            fade,
            jump_overlay: false,
            elapsed: 0.0,
            reported_missing: HashSet::new(),
        };
        if machine.clip_available(initial) {
            machine.mixer.play(initial);
        }
        machine
    }

    pub fn current(&self) -> AnimationLabel {
        self.current
    }

    /// Total animation time advanced so far, in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn jump_overlay_active(&self) -> bool {
        self.jump_overlay
    }

    pub fn mixer(&self) -> &M {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut M {
        &mut self.mixer
    }

    /// Cross-fades to `target` when it differs from the current label.
    ///
    /// Returns whether a transition happened. A side with no clip is skipped,
    /// the label still changes.
    pub fn drive(&mut self, target: AnimationLabel) -> bool {
        if target == self.current {
            return false;
        }

        if self.clip_available(self.current) {
            self.mixer.fade_out(self.current, self.fade);
        }
        if self.clip_available(target) {
            self.mixer.fade_in(target, self.fade);
        }

        self.current = target;
        true
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        self.mixer.advance(dt);
    }

    pub fn start_jump_overlay(&mut self) {
        if self.clip_available(AnimationLabel::Jump) {
            self.mixer.fade_in(AnimationLabel::Jump, Duration::ZERO);
        }
        self.jump_overlay = true;
    }

    /// Stops the jump overlay; a no-op when it is not playing.
    pub fn stop_jump_overlay(&mut self) -> bool {
        if !self.jump_overlay {
            return false;
        }
        if self.clip_available(AnimationLabel::Jump) {
            self.mixer.stop(AnimationLabel::Jump);
        }
        self.jump_overlay = false;
        true
    }

    fn clip_available(&mut self, label: AnimationLabel) -> bool {
        if self.mixer.has_clip(label) {
            return true;
        }
        if self.reported_missing.insert(label) {
            warn!("No animation clip mapped for {}; skipping playback", label.name());
        }
        false
    }
}

/// A single playback request recorded by [`ClipCommandQueue`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipCommand {
    FadeOut(AnimationLabel, Duration),
    FadeIn(AnimationLabel, Duration),
    Play(AnimationLabel),
    Stop(AnimationLabel),
}

impl ClipCommand {
    pub fn label(&self) -> AnimationLabel {
        match *self {
            ClipCommand::FadeOut(label, _)
            | ClipCommand::FadeIn(label, _)
            | ClipCommand::Play(label)
            | ClipCommand::Stop(label) => label,
        }
    }
}

/// Mixer that records requests for a renderer-side player to apply later.
///
/// Until the clip table is known every label is assumed present; requests
/// for clips that turn out to be missing are dropped when applied. Only the
/// latest request per clip is kept, so an undrained queue stays bounded.
#[derive(Debug, Clone, Default)]
pub struct ClipCommandQueue {
    available: Option<HashSet<AnimationLabel>>,
    commands: Vec<ClipCommand>,
    pending_advance: f32,
}

impl ClipCommandQueue {
    pub fn with_clips(labels: impl IntoIterator<Item = AnimationLabel>) -> Self {
        Self {
            available: Some(labels.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn set_available(&mut self, labels: impl IntoIterator<Item = AnimationLabel>) {
        self.available = Some(labels.into_iter().collect());
    }

    pub fn commands(&self) -> &[ClipCommand] {
        &self.commands
    }

    pub fn drain(&mut self) -> Vec<ClipCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Animation time advanced since the last call.
    pub fn take_advance(&mut self) -> f32 {
        std::mem::take(&mut self.pending_advance)
    }

    fn push(&mut self, command: ClipCommand) {
        self.commands.retain(|queued| queued.label() != command.label());
        self.commands.push(command);
    }
}

impl AnimationMixer for ClipCommandQueue {
    fn has_clip(&self, label: AnimationLabel) -> bool {
        self.available
            .as_ref()
            .is_none_or(|labels| labels.contains(&label))
    }

    fn fade_out(&mut self, label: AnimationLabel, duration: Duration) {
        self.push(ClipCommand::FadeOut(label, duration));
    }

    fn fade_in(&mut self, label: AnimationLabel, duration: Duration) {
        self.push(ClipCommand::FadeIn(label, duration));
    }

    fn play(&mut self, label: AnimationLabel) {
        self.push(ClipCommand::Play(label));
    }

    fn stop(&mut self, label: AnimationLabel) {
        self.push(ClipCommand::Stop(label));
    }

    fn advance(&mut self, dt: f32) {
        self.pending_advance += dt;
    }
}
