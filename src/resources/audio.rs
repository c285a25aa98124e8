//! Per-frame audio command queue.

use crate::events::audio::AudioCmd;

/// Commands queued by the current screen during one tick.
#[derive(Debug, Default, Clone)]
pub struct AudioQueue {
    cmds: Vec<AudioCmd>,
}

impl AudioQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: AudioCmd) {
        self.cmds.push(cmd);
    }

    pub fn play_fx(&mut self, id: &str) {
        self.push(AudioCmd::PlayFx { id: id.to_string() });
    }

    pub fn loop_fx(&mut self, id: &str) {
        self.push(AudioCmd::LoopFx { id: id.to_string() });
    }

    pub fn stop_fx(&mut self, id: &str) {
        self.push(AudioCmd::StopFx { id: id.to_string() });
    }

    pub fn play_music(&mut self, id: &str, looped: bool) {
        self.push(AudioCmd::PlayMusic {
            id: id.to_string(),
            looped,
        });
    }

    pub fn stop_music(&mut self, id: &str) {
        self.push(AudioCmd::StopMusic { id: id.to_string() });
    }

    pub fn volume_music(&mut self, id: &str, vol: f32) {
        self.push(AudioCmd::VolumeMusic {
            id: id.to_string(),
            vol,
        });
    }

    pub fn pending(&self) -> &[AudioCmd] {
        &self.cmds
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Take every queued command, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<AudioCmd> {
        std::mem::take(&mut self.cmds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue_in_order() {
        let mut q = AudioQueue::new();
        q.play_fx("shoot");
        q.stop_fx("hacking");
        let cmds = q.drain();
        assert_eq!(
            cmds,
            vec![
                AudioCmd::PlayFx {
                    id: "shoot".into()
                },
                AudioCmd::StopFx {
                    id: "hacking".into()
                },
            ]
        );
        assert!(q.is_empty());
    }
}
