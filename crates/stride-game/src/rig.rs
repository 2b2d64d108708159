//! The loaded character model as seen by the controller

use stride_core::Transform;

/// Placement and skeletal animation control for a loaded character.
///
/// Implemented by the host's scene layer once the character asset has
/// finished loading.
pub trait CharacterRig {
    /// Place the model. `transform.position` is the feet position.
    fn set_transform(&mut self, transform: Transform);

    /// Start (or resume) a named animation clip.
    fn play_clip(&mut self, name: &str);

    /// Stop a named animation clip.
    fn stop_clip(&mut self, name: &str);

    /// Multiplier applied to every playing clip.
    fn set_playback_rate(&mut self, rate: f32);
}
