use std::path::Path;

use crate::audio::manifest::{AudioManifest, AudioSource};
use crate::foundation::core::Fps;
use crate::foundation::error::{VibeError, VibeResult};

/// Mix all manifest sources into interleaved output PCM, clamped to `[-1, 1]`.
pub fn mix_manifest(manifest: &AudioManifest) -> Vec<f32> {
    let frames = manifest.total_samples as usize;
    let mut out = vec![0.0f32; frames * usize::from(manifest.channels)];

    for src in &manifest.sources {
        mix_source(&mut out, manifest, src);
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

fn mix_source(out: &mut [f32], manifest: &AudioManifest, src: &AudioSource) {
    let pcm = src.pcm.as_ref();
    let channels = usize::from(pcm.channels);
    let data = pcm.interleaved_f32.as_slice();
    if channels == 0 {
        return;
    }
    let src_frames = data.len() / channels;
    if src_frames == 0 {
        return;
    }

    let out_frames = out.len() / usize::from(manifest.channels).max(1);
    let end = (src.timeline_end_sample as usize).min(out_frames);
    let step = f64::from(pcm.sample_rate) / f64::from(manifest.sample_rate);

    for dst_sample in (src.timeline_start_sample as usize)..end {
        let rel = (dst_sample - src.timeline_start_sample as usize) as f64;
        let mut src_pos = rel * step;
        if src.looping {
            src_pos %= src_frames as f64;
        }
        if !src_pos.is_finite() || src_pos < 0.0 {
            break;
        }
        let f0 = src_pos.floor() as usize;
        if f0 >= src_frames {
            break;
        }
        let f1 = if src.looping {
            (f0 + 1) % src_frames
        } else {
            (f0 + 1).min(src_frames - 1)
        };
        let frac = (src_pos - f0 as f64) as f32;

        let (l, r) = if channels == 1 {
            let v = data[f0] + (data[f1] - data[f0]) * frac;
            (v, v)
        } else {
            let (i0, i1) = (f0 * channels, f1 * channels);
            (
                data[i0] + (data[i1] - data[i0]) * frac,
                data[i0 + 1] + (data[i1 + 1] - data[i0 + 1]) * frac,
            )
        };

        let dst = dst_sample * usize::from(manifest.channels);
        out[dst] += l * src.volume;
        if manifest.channels > 1 {
            out[dst + 1] += r * src.volume;
        }
    }
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_mix_to_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> VibeResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            VibeError::encode(format!(
                "failed to create audio mix output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        VibeError::encode(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}

/// Convert a frame index to the nearest sample index at `sample_rate`.
pub fn frame_to_sample(frame: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frame) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num);
    ((num + (den / 2)) / den) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
