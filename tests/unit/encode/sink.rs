use super::*;

fn frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: vec![v; 16],
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::thirty(),
        audio: None,
    }
}

#[test]
fn in_memory_sink_collects_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(2)).unwrap();
    sink.end().unwrap();

    assert!(sink.is_finished());
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].1.data[0], 2);
    assert_eq!(sink.config().map(|c| c.width), Some(2));
    assert!(sink.audio_bytes().is_none());
}

#[test]
fn in_memory_sink_rejects_out_of_order_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &frame(1)).unwrap();
    let err = sink.push_frame(FrameIndex(3), &frame(1)).unwrap_err();
    assert!(matches!(err, VibeError::Encode(_)));
}

#[test]
fn in_memory_sink_reads_audio_input() {
    let dir = std::env::temp_dir().join(format!("vibeframe_sink_audio_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("mix.f32le");
    std::fs::write(&path, [0u8, 0, 128, 63]).unwrap();

    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        audio: Some(AudioInputConfig {
            path: path.clone(),
            sample_rate: 48_000,
            channels: 2,
        }),
        ..cfg()
    })
    .unwrap();
    assert_eq!(sink.audio_bytes(), Some(&[0u8, 0, 128, 63][..]));

    let _ = std::fs::remove_dir_all(&dir);
}
