//! Audio commands and replies.
//!
//! Screens queue [`AudioCmd`]s during a tick; the platform forwards them to
//! the audio thread when the frame is presented. The thread answers with
//! [`AudioMessage`]s, which the backend only logs.

/// Commands sent *to* the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    LoadMusic { id: String, path: String },
    PlayMusic { id: String, looped: bool },
    StopMusic { id: String },
    VolumeMusic { id: String, vol: f32 },
    LoadFx { id: String, path: String },
    PlayFx { id: String },
    /// Play an effect and restart it whenever it ends, until `StopFx`.
    LoopFx { id: String },
    StopFx { id: String },
    Shutdown,
}

/// Replies sent *back* from the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioMessage {
    MusicLoaded { id: String },
    MusicLoadFailed { id: String, error: String },
    MusicPlayStarted { id: String },
    MusicStopped { id: String },
    MusicFinished { id: String },
    FxLoaded { id: String },
    FxLoadFailed { id: String, error: String },
    FxFinished { id: String },
}
