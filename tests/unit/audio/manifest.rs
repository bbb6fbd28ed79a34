use super::*;
use crate::assets::{LoadedAssets, PreparedImage, SlideAssets};
use crate::model::{Project, ProjectMode, Slide};
use crate::timeline::build_timeline;

fn clip(ms: u64) -> Arc<AudioPcm> {
    Arc::new(AudioPcm {
        sample_rate: 48_000,
        channels: 2,
        interleaved_f32: vec![0.5; (ms * 48 * 2) as usize],
    })
}

fn timeline(narration: Vec<Option<Arc<AudioPcm>>>) -> Timeline {
    let slides = narration
        .iter()
        .enumerate()
        .map(|(i, _)| Slide::explainer(format!("s{i}"), "text", "p"))
        .collect();
    let project = Project::new("t", ProjectMode::Explainer, slides);
    let assets = LoadedAssets {
        slides: narration
            .into_iter()
            .map(|a| SlideAssets {
                image: PreparedImage {
                    width: 1,
                    height: 1,
                    rgba8_premul: Arc::new(vec![0, 0, 0, 255]),
                },
                body_audio: a,
                intro_audio: None,
                point_audio: Vec::new(),
            })
            .collect(),
        music: None,
        logo: None,
    };
    build_timeline(&project, &assets).unwrap()
}

#[test]
fn narration_starts_at_segment_first_frame() {
    let tl = timeline(vec![Some(clip(2000)), None, Some(clip(500))]);
    let m = build_audio_manifest(&tl, Fps::thirty(), None, 0.15);

    assert_eq!(m.sample_rate, 48_000);
    assert_eq!(m.sources.len(), 2);
    assert_eq!(m.sources[0].timeline_start_sample, 48_000);
    assert_eq!(m.sources[0].timeline_end_sample, 48_000 + 96_000);
    // start pad 1 s + 2 s + 5 s fallback
    assert_eq!(m.sources[1].timeline_start_sample, 8 * 48_000);
    assert!(m.sources.iter().all(|s| !s.looping && s.volume == 1.0));

    let total_ms = 1000 + 2000 + 5000 + 500 + 2000;
    assert_eq!(m.total_samples, total_ms * 48);
}

#[test]
fn music_loops_over_the_whole_run() {
    let tl = timeline(vec![None]);
    let m = build_audio_manifest(&tl, Fps::thirty(), Some(clip(100)), 0.15);
    assert_eq!(m.sources.len(), 1);
    let bed = &m.sources[0];
    assert!(bed.looping);
    assert_eq!(bed.volume, 0.15);
    assert_eq!(bed.timeline_start_sample, 0);
    assert_eq!(bed.timeline_end_sample, m.total_samples);
}

#[test]
fn muted_or_empty_music_is_dropped() {
    let tl = timeline(vec![None]);
    assert!(build_audio_manifest(&tl, Fps::thirty(), Some(clip(100)), 0.0).is_silent());
    assert!(build_audio_manifest(&tl, Fps::thirty(), Some(clip(0)), 0.2).is_silent());
}
