//! Voice pipeline integration tests
//!
//! Tests voice components without requiring audio hardware

use std::io::Cursor;

use voice_translator::voice::{
    DetectorState, SAMPLE_RATE, UtteranceDetector, UtteranceEvent, resample, samples_to_wav,
};

/// Generate sine wave audio samples
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence
fn generate_silence(duration_secs: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    vec![0.0; num_samples]
}

/// Feed audio in 100ms chunks, the way the recognizer polls the microphone
fn feed(detector: &mut UtteranceDetector, samples: &[f32]) -> Vec<UtteranceEvent> {
    samples
        .chunks(SAMPLE_RATE as usize / 10)
        .map(|chunk| detector.process(chunk))
        .filter(|event| *event != UtteranceEvent::Pending)
        .collect()
}

#[test]
fn test_detector_starts_waiting() {
    let detector = UtteranceDetector::new();
    assert_eq!(detector.state(), DetectorState::Waiting);
}

#[test]
fn test_utterance_completes_after_trailing_silence() {
    let mut detector = UtteranceDetector::new();

    let speech = generate_sine_samples(440.0, 1.0, 0.3);
    assert!(feed(&mut detector, &speech).is_empty());
    assert_eq!(detector.state(), DetectorState::Speaking);

    let events = feed(&mut detector, &generate_silence(0.8));
    assert_eq!(events.len(), 1);

    let UtteranceEvent::Complete(samples) = &events[0] else {
        panic!("expected a complete utterance, got {:?}", events[0]);
    };
    // Speech plus a little over half a second of trailing silence
    assert!(samples.len() >= speech.len());
    assert!(samples.len() < speech.len() + SAMPLE_RATE as usize);
    assert_eq!(detector.state(), DetectorState::Waiting);
}

#[test]
fn test_pauses_inside_utterance_do_not_split_it() {
    let mut detector = UtteranceDetector::new();

    let mut audio = generate_sine_samples(440.0, 0.5, 0.3);
    audio.extend(generate_silence(0.3));
    audio.extend(generate_sine_samples(440.0, 0.5, 0.3));
    audio.extend(generate_silence(0.8));

    let events = feed(&mut detector, &audio);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], UtteranceEvent::Complete(_)));
}

#[test]
fn test_initial_silence_timeout() {
    let mut detector = UtteranceDetector::new();

    assert!(feed(&mut detector, &generate_silence(4.0)).is_empty());

    let events = feed(&mut detector, &generate_silence(1.5));
    assert_eq!(events, vec![UtteranceEvent::InitialSilenceTimeout]);
    assert_eq!(detector.state(), DetectorState::Waiting);
}

#[test]
fn test_long_speech_is_cut_off() {
    let mut detector = UtteranceDetector::new();

    let events = feed(&mut detector, &generate_sine_samples(440.0, 16.0, 0.3));
    assert_eq!(events.len(), 1);
    let UtteranceEvent::Complete(samples) = &events[0] else {
        panic!("expected a complete utterance");
    };
    assert!(samples.len() <= SAMPLE_RATE as usize * 15);
}

#[test]
fn test_detector_scales_with_sample_rate() {
    let mut detector = UtteranceDetector::with_sample_rate(48000);

    // 1s of 48kHz speech, then 0.3s of silence: not yet complete
    let speech = vec![0.3f32; 48000];
    assert_eq!(detector.process(&speech), UtteranceEvent::Pending);
    assert_eq!(detector.process(&vec![0.0; 14400]), UtteranceEvent::Pending);

    // Another 0.3s crosses the half second of trailing silence
    assert!(matches!(
        detector.process(&vec![0.0; 14400]),
        UtteranceEvent::Complete(_)
    ));
}

#[test]
fn test_samples_to_wav() {
    let samples = generate_sine_samples(440.0, 0.5, 0.5);
    let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");

    let reader = hound::WavReader::new(Cursor::new(&wav)).unwrap();
    let spec = reader.spec();

    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.len() as usize, samples.len());
}

#[test]
fn test_samples_to_wav_clamps() {
    let samples = vec![2.0, -2.0, 0.0];
    let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(&wav)).unwrap();
    let decoded: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
    assert_eq!(decoded, vec![32767, -32768, 0]);
}

#[test]
fn test_resample_native_capture_to_speech_rate() {
    let samples = vec![0.1f32; 44100];
    let out = resample(&samples, 44100, SAMPLE_RATE).unwrap();
    assert_eq!(out.len(), SAMPLE_RATE as usize);
}
