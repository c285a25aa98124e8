//! Audio thread backed by raylib.
//!
//! raylib's audio device lives on its own OS thread. The game thread talks to
//! it through an [`AudioBridge`]: commands go in over one `crossbeam_channel`,
//! [`AudioMessage`] replies come back over another.
//!
//! - all loads and playback controls run on the audio thread
//! - music streams are pumped by the thread while tracks play
//! - looping effects are restarted by the thread until stopped

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, error, info, warn};
use raylib::core::audio::{Music, RaylibAudio, Sound};
use rustc_hash::{FxHashMap, FxHashSet};
use std::thread::JoinHandle;

use crate::events::audio::{AudioCmd, AudioMessage};

/// Channels to the audio thread and its join handle.
pub struct AudioBridge {
    pub tx_cmd: Sender<AudioCmd>,
    pub rx_msg: Receiver<AudioMessage>,
    handle: JoinHandle<()>,
}

impl AudioBridge {
    /// Spawn the audio thread.
    pub fn spawn() -> Self {
        let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
        let (tx_msg, rx_msg) = unbounded::<AudioMessage>();
        let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg));
        Self {
            tx_cmd,
            rx_msg,
            handle,
        }
    }

    /// Forward a tick's worth of commands. A dead thread drops them.
    pub fn send(&self, cmds: impl IntoIterator<Item = AudioCmd>) {
        for cmd in cmds {
            let _ = self.tx_cmd.send(cmd);
        }
    }

    /// Log whatever the thread has answered so far.
    pub fn drain_messages(&self) {
        for msg in self.rx_msg.try_iter() {
            match msg {
                AudioMessage::MusicLoadFailed { id, error }
                | AudioMessage::FxLoadFailed { id, error } => {
                    warn!("audio '{}' failed to load: {}", id, error);
                }
                other => debug!("audio: {:?}", other),
            }
        }
    }

    /// Ask the thread to unload everything and wait for it.
    pub fn shutdown(self) {
        let _ = self.tx_cmd.send(AudioCmd::Shutdown);
        if self.handle.join().is_err() {
            error!("audio thread panicked");
        }
    }
}

/// Entry point of the audio thread. Runs until [`AudioCmd::Shutdown`].
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_evt: Sender<AudioMessage>) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            error!("failed to initialize audio device: {}", e);
            return;
        }
    };
    info!("audio thread starting (id={:?})", std::thread::current().id());

    let mut musics: FxHashMap<String, Music> = FxHashMap::default();
    let mut playing: FxHashSet<String> = FxHashSet::default();
    let mut looped: FxHashSet<String> = FxHashSet::default();
    let mut sounds: FxHashMap<String, Sound> = FxHashMap::default();
    let mut fx_playing: FxHashSet<String> = FxHashSet::default();
    let mut fx_looped: FxHashSet<String> = FxHashSet::default();

    'run: loop {
        // 1) Drain commands
        for cmd in rx_cmd.try_iter() {
            match cmd {
                AudioCmd::LoadMusic { id, path } => match audio.new_music(&path) {
                    Ok(music) => {
                        debug!("music loaded id='{}' path='{}'", id, path);
                        musics.insert(id.clone(), music);
                        let _ = tx_evt.send(AudioMessage::MusicLoaded { id });
                    }
                    Err(e) => {
                        let _ = tx_evt.send(AudioMessage::MusicLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayMusic {
                    id,
                    looped: want_loop,
                } => {
                    if let Some(music) = musics.get(&id) {
                        music.seek_stream(0.0);
                        music.play_stream();
                        playing.insert(id.clone());
                        if want_loop {
                            looped.insert(id.clone());
                        } else {
                            looped.remove(&id);
                        }
                        let _ = tx_evt.send(AudioMessage::MusicPlayStarted { id });
                    }
                }
                AudioCmd::StopMusic { id } => {
                    if let Some(music) = musics.get(&id) {
                        music.stop_stream();
                        playing.remove(&id);
                        looped.remove(&id);
                        let _ = tx_evt.send(AudioMessage::MusicStopped { id });
                    }
                }
                AudioCmd::VolumeMusic { id, vol } => {
                    if let Some(music) = musics.get(&id) {
                        music.set_volume(vol);
                    }
                }
                AudioCmd::LoadFx { id, path } => match audio.new_sound(&path) {
                    Ok(sound) => {
                        debug!("fx loaded id='{}' path='{}'", id, path);
                        sounds.insert(id.clone(), sound);
                        let _ = tx_evt.send(AudioMessage::FxLoaded { id });
                    }
                    Err(e) => {
                        let _ = tx_evt.send(AudioMessage::FxLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayFx { id } => {
                    if let Some(sound) = sounds.get(&id) {
                        sound.play();
                        fx_playing.insert(id);
                    } else {
                        debug!("fx '{}' not loaded", id);
                    }
                }
                AudioCmd::LoopFx { id } => {
                    if let Some(sound) = sounds.get(&id) {
                        if !sound.is_playing() {
                            sound.play();
                        }
                        fx_playing.insert(id.clone());
                        fx_looped.insert(id);
                    }
                }
                AudioCmd::StopFx { id } => {
                    if let Some(sound) = sounds.get(&id) {
                        sound.stop();
                    }
                    fx_looped.remove(&id);
                }
                AudioCmd::Shutdown => {
                    debug!("audio shutdown requested");
                    break 'run;
                }
            }
        }

        // 2) Pump streaming and detect ends
        let mut ended: Vec<String> = Vec::new();
        for id in playing.iter() {
            if let Some(music) = musics.get(id) {
                if music.is_stream_playing() {
                    music.update_stream();
                } else if music.get_time_played() >= music.get_time_length() - 0.01 {
                    ended.push(id.clone());
                }
            }
        }
        for id in ended {
            if looped.contains(&id) {
                if let Some(music) = musics.get(&id) {
                    music.seek_stream(0.0);
                    music.play_stream();
                }
            } else {
                playing.remove(&id);
                let _ = tx_evt.send(AudioMessage::MusicFinished { id });
            }
        }

        // 3) Restart looping effects, report finished ones
        let mut fx_ended: Vec<String> = Vec::new();
        for id in fx_playing.iter() {
            let Some(sound) = sounds.get(id) else {
                fx_ended.push(id.clone());
                continue;
            };
            if sound.is_playing() {
                continue;
            }
            if fx_looped.contains(id) {
                sound.play();
            } else {
                fx_ended.push(id.clone());
            }
        }
        for id in fx_ended {
            fx_playing.remove(&id);
            let _ = tx_evt.send(AudioMessage::FxFinished { id });
        }

        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    musics.clear();
    sounds.clear();
    info!("audio thread exiting (id={:?})", std::thread::current().id());
}
