//! Integration Tests
//!
//! End-to-end tests for the Wavedit editing pipeline: load, edit, export.

use std::io::Cursor;

use approx::assert_relative_eq;
use wavedit::engine::{
    concat, read_wav, slice, EditOutcome, EditSession, FadeKind, MoveDirection, SampleBuffer,
    WavEncoder,
};
use wavedit::{EngineConfig, WaveditError};

/// Helper to create a stereo sine buffer with different tones per channel
fn create_sine_buffer(sample_rate: u32, duration_secs: f64) -> SampleBuffer {
    let num_samples = (sample_rate as f64 * duration_secs) as usize;
    let channel = |freq: f64| -> Vec<f32> {
        (0..num_samples)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                (0.5 * (2.0 * std::f64::consts::PI * freq * t).sin()) as f32
            })
            .collect()
    };
    SampleBuffer::from_channels(vec![channel(440.0), channel(660.0)], sample_rate).unwrap()
}

fn assert_composite_matches_clips(session: &EditSession) {
    let rebuilt = concat(session.clips().iter().map(|c| c.buffer())).unwrap();
    assert_eq!(&rebuilt, session.composite());
}

// === Buffer property tests ===

#[test]
fn test_split_merge_roundtrip_is_exact() {
    let buffer = create_sine_buffer(44100, 0.5);
    let duration = buffer.duration_secs();

    for i in 1..20 {
        let point = duration * i as f64 / 20.0;
        let merged = concat([&slice(&buffer, 0.0, point), &slice(&buffer, point, duration)])
            .unwrap();
        assert_eq!(merged, buffer, "split at {} did not round-trip", point);
    }
}

#[test]
fn test_concat_empty_is_invalid_input() {
    let none: [&SampleBuffer; 0] = [];
    let err = concat(none).unwrap_err();
    assert!(matches!(err, WaveditError::InvalidInput { .. }));
    assert_eq!(err.error_code(), "INVALID_INPUT");
}

// === Session workflow tests ===

#[test]
fn test_split_reorder_delete_workflow() {
    let buffer = create_sine_buffer(8000, 1.0);
    let original = buffer.clone();
    let mut session = EditSession::new(buffer, "take");

    assert!(session.split_at(0.25).unwrap().is_applied());
    session.set_selection(0.5, 0.5).unwrap();
    assert!(session.split_at_cursor().unwrap().is_applied());
    // split_at_cursor repartitions the whole composite into two clips
    assert_eq!(session.clips().len(), 2);
    assert_eq!(session.composite(), &original);

    let first = session.clips()[0].id();
    let second = session.clips()[1].id();
    assert_eq!(
        session.move_clip(first, MoveDirection::Up).unwrap(),
        EditOutcome::Unchanged
    );
    assert_eq!(
        session.move_clip(second, MoveDirection::Down).unwrap(),
        EditOutcome::Unchanged
    );

    assert!(session.move_clip(second, MoveDirection::Up).unwrap().is_applied());
    assert_eq!(session.composite().channel(0)[0], original.channel(0)[4000]);
    assert_composite_matches_clips(&session);

    assert!(session.delete_clip(first).unwrap().is_applied());
    assert_eq!(session.composite().len(), 4000);
    assert_eq!(
        session.delete_clip(second).unwrap(),
        EditOutcome::Unchanged
    );
    assert_composite_matches_clips(&session);
}

#[test]
fn test_full_delete_guard() {
    let mut session = EditSession::new(create_sine_buffer(8000, 0.5), "take");
    let before = session.composite().clone();
    let ids: Vec<_> = session.clips().iter().map(|c| c.id()).collect();

    session.set_selection(0.0, session.duration_secs()).unwrap();
    assert_eq!(session.delete_selection().unwrap(), EditOutcome::Unchanged);

    assert_eq!(session.composite(), &before);
    let after: Vec<_> = session.clips().iter().map(|c| c.id()).collect();
    assert_eq!(ids, after);
}

#[test]
fn test_delete_then_trim() {
    let mut session = EditSession::new(create_sine_buffer(8000, 1.0), "take");

    session.set_selection(0.25, 0.5).unwrap();
    assert!(session.delete_selection().unwrap().is_applied());
    assert_relative_eq!(session.duration_secs(), 0.75);
    assert_eq!(session.clips().len(), 2);

    session.set_selection(0.125, 0.625).unwrap();
    assert!(session.trim_to_selection().unwrap().is_applied());
    assert_relative_eq!(session.duration_secs(), 0.5);
    assert_eq!(session.clips().len(), 1);
    assert_composite_matches_clips(&session);
}

#[test]
fn test_normalize_and_fade_collapse_clips() {
    let mut session = EditSession::new(create_sine_buffer(8000, 1.0), "take");
    assert!(session.split_at(0.5).unwrap().is_applied());

    assert!(session.normalize().unwrap().is_applied());
    assert_eq!(session.clips().len(), 1);
    let peak = session
        .composite()
        .iter_channels()
        .flat_map(|ch| ch.iter())
        .fold(0.0_f32, |acc, &s| acc.max(s.abs()));
    assert_relative_eq!(peak, 0.98, epsilon = 1e-4);

    assert!(session.split_at(0.5).unwrap().is_applied());
    let before = session.composite().clone();
    assert!(session.apply_fade(FadeKind::Out).unwrap().is_applied());
    assert_eq!(session.clips().len(), 1);
    assert_relative_eq!(
        session.composite().channel(1)[2001],
        before.channel(1)[2001] * (1.0 - 2001.0 / 8000.0),
        epsilon = 1e-6
    );
    assert_composite_matches_clips(&session);
}

#[test]
fn test_normalize_respects_configured_cap() {
    let quiet = SampleBuffer::from_channels(vec![vec![0.01; 800]], 8000).unwrap();

    let session = EditSession::new(quiet.clone(), "quiet");
    assert_eq!(session.normalize_gain(), Some(10.0));

    let config = EngineConfig {
        max_normalize_gain: 50.0,
        ..Default::default()
    };
    let session = EditSession::with_config(quiet, "quiet", config).unwrap();
    assert_eq!(session.normalize_gain(), Some(50.0));
}

// === Export tests ===

#[test]
fn test_export_range_decodes_to_selection() {
    let buffer = create_sine_buffer(8000, 1.0);
    let mut session = EditSession::new(buffer.clone(), "take");
    session.set_selection(0.5, 0.75).unwrap();

    let decoded = read_wav(Cursor::new(session.export_range().unwrap())).unwrap();
    assert_eq!(decoded.channels(), 2);
    assert_eq!(decoded.len(), 2000);
    assert_eq!(decoded.sample_rate(), 8000);

    for ch in 0..2 {
        for (i, &s) in decoded.channel(ch).iter().enumerate() {
            let expected = buffer.channel(ch)[4000 + i];
            assert!(
                (s - expected).abs() < 1e-4,
                "channel {} sample {}: {} vs {}",
                ch,
                i,
                s,
                expected
            );
        }
    }
}

#[test]
fn test_export_whole_buffer_without_selection() {
    let buffer = create_sine_buffer(8000, 0.25);
    let session = EditSession::new(buffer.clone(), "take");
    assert_eq!(
        session.export_range().unwrap(),
        WavEncoder::encode(&buffer).unwrap()
    );
}

#[test]
fn test_wav_header_exactness() {
    let bytes = WavEncoder::encode(&SampleBuffer::new(1, 4, 8000)).unwrap();
    let expected_header: Vec<u8> = [
        &b"RIFF"[..],
        &44u32.to_le_bytes(),
        b"WAVE",
        b"fmt ",
        &16u32.to_le_bytes(),
        &1u16.to_le_bytes(),
        &1u16.to_le_bytes(),
        &8000u32.to_le_bytes(),
        &16000u32.to_le_bytes(),
        &2u16.to_le_bytes(),
        &16u16.to_le_bytes(),
        b"data",
        &8u32.to_le_bytes(),
    ]
    .concat();

    assert_eq!(bytes.len(), 52);
    assert_eq!(&bytes[..44], expected_header.as_slice());
}
