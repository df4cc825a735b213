//! Outbound playback descriptors emitted by the engine.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;

use crate::vec3::Vec3;

/// Which playback primitive the host should use for this command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayCommandKind {
    PlayAudioData,
    PlayPointSourceData,
}

/// A single audio-playback descriptor. The engine never touches playback
/// itself; hosts forward this over whatever transport they already use.
#[derive(Debug, Clone, Serialize)]
pub struct PlayCommand {
    #[serde(rename = "type")]
    pub kind: PlayCommandKind,
    pub id: u32,
    pub position: Vec3,
    pub num_frames: usize,
    pub num_channels: u16,
    pub frame_rate: u32,
    pub wav_data: String,
    pub y_pos_offset: f64,
}

impl PlayCommand {
    /// Builds a command from raw 16-bit PCM samples, base64-encoding them
    /// as `wav_data`.
    pub fn new(
        kind: PlayCommandKind,
        id: u32,
        position: Vec3,
        pcm: &[i16],
        y_pos_offset: f64,
    ) -> Self {
        let bytes = crate::wav::pcm16_to_bytes(pcm);
        Self {
            kind,
            id,
            position,
            num_frames: pcm.len(),
            num_channels: 1,
            frame_rate: 44_100,
            wav_data: BASE64.encode(bytes),
            y_pos_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_encodes_pcm_as_base64() {
        let pcm = vec![0i16, 16384, -16384];
        let cmd = PlayCommand::new(PlayCommandKind::PlayAudioData, 1, Vec3::ZERO, &pcm, 0.1);
        assert_eq!(cmd.num_frames, 3);
        assert_eq!(cmd.num_channels, 1);
        assert_eq!(cmd.frame_rate, 44_100);
        assert!(!cmd.wav_data.is_empty());
    }

    #[test]
    fn serializes_type_field_in_snake_case() {
        let pcm = vec![0i16];
        let cmd = PlayCommand::new(PlayCommandKind::PlayPointSourceData, 2, Vec3::ZERO, &pcm, 0.0);
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"play_point_source_data\""));
    }
}
