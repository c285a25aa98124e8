//! Asset manifest.
//!
//! Each game declares the textures, sound effects and music it uses, keyed by
//! short names. Screens refer to assets by key only; the backend resolves the
//! paths against the configured asset root and loads them at start-up.

use std::path::{Path, PathBuf};

use crate::events::audio::AudioCmd;

#[derive(Debug, Clone, Default)]
pub struct AssetManifest {
    pub textures: Vec<(String, PathBuf)>,
    pub sounds: Vec<(String, PathBuf)>,
    pub music: Vec<(String, PathBuf)>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture(mut self, key: &str, path: &str) -> Self {
        self.textures.push((key.to_string(), PathBuf::from(path)));
        self
    }

    pub fn sound(mut self, key: &str, path: &str) -> Self {
        self.sounds.push((key.to_string(), PathBuf::from(path)));
        self
    }

    pub fn music(mut self, key: &str, path: &str) -> Self {
        self.music.push((key.to_string(), PathBuf::from(path)));
        self
    }

    pub fn has_texture(&self, key: &str) -> bool {
        self.textures.iter().any(|(k, _)| k == key)
    }

    /// Audio load commands for every sound and track, paths under `root`.
    pub fn audio_load_cmds(&self, root: &Path) -> Vec<AudioCmd> {
        let sounds = self.sounds.iter().map(|(id, path)| AudioCmd::LoadFx {
            id: id.clone(),
            path: root.join(path).to_string_lossy().into_owned(),
        });
        let music = self.music.iter().map(|(id, path)| AudioCmd::LoadMusic {
            id: id.clone(),
            path: root.join(path).to_string_lossy().into_owned(),
        });
        sounds.chain(music).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_load_cmds_resolve_paths() {
        let m = AssetManifest::new()
            .texture("font", "img/font.png")
            .sound("shoot", "sound/shoot.wav")
            .music("theme", "sound/theme.mp3");
        assert!(m.has_texture("font"));
        assert!(!m.has_texture("shoot"));
        let cmds = m.audio_load_cmds(Path::new("assets"));
        assert_eq!(cmds.len(), 2);
        assert!(matches!(
            &cmds[0],
            AudioCmd::LoadFx { id, path } if id == "shoot" && path.ends_with("shoot.wav")
        ));
        assert!(matches!(&cmds[1], AudioCmd::LoadMusic { id, .. } if id == "theme"));
    }
}
