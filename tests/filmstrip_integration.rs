use std::sync::atomic::{AtomicUsize, Ordering};

use filmstrip::{
    compute_filmstrip, compute_filmstrip_parallel, CapturedFrame, Error, FilmstripConfig, Raster,
    Result, TraceAnalysis, VisualTimeline,
};
use sha2::{Digest, Sha256};

/// Timeline values taken from a real page-load trace.
const BEGINNING: f64 = 225414172.015;
const COMPLETE: f64 = 909.0;

/// Frame offsets (ms after the beginning) for the fixture trace; `true`
/// marks interpolated frames, which must never be selected.
const FRAME_OFFSETS: &[(f64, bool)] = &[
    (0.0, false),
    (60.0, true),
    (80.0, false),
    (150.0, false),
    (200.0, true),
    (260.0, false),
    (400.0, false),
    (470.0, false),
    (600.0, false),
    (700.0, false),
    (909.0, false),
];

fn fixture_analysis() -> TraceAnalysis<CapturedFrame> {
    let frames = FRAME_OFFSETS
        .iter()
        .enumerate()
        .map(|(index, &(offset, interpolated))| {
            // Distinct fill color per frame so encoded bytes identify the source.
            CapturedFrame::new(
                BEGINNING + offset,
                interpolated,
                Raster::filled(8, 4, [index as u8, 0, 0, 255]),
            )
        })
        .collect();
    TraceAnalysis {
        timeline: VisualTimeline {
            beginning: BEGINNING,
            complete: COMPLETE,
        },
        frames,
    }
}

fn counting_encoder(calls: &AtomicUsize) -> impl filmstrip::ImageEncoder + Sync + '_ {
    move |raster: &Raster, quality: u8| -> Result<Vec<u8>> {
        calls.fetch_add(1, Ordering::SeqCst);
        let mut bytes = raster.pixel(0, 0).to_vec();
        bytes.push(quality);
        Ok(bytes)
    }
}

#[test]
fn regression_fixture_timings_and_timestamps() {
    let calls = AtomicUsize::new(0);
    let thumbnails = compute_filmstrip(
        &fixture_analysis(),
        &counting_encoder(&calls),
        &FilmstripConfig::default(),
    )
    .expect("filmstrip");

    assert_eq!(thumbnails.len(), 10);

    // Exact regression values for this fixture.
    assert_eq!(thumbnails[0].timing, 0);
    assert_eq!(thumbnails[2].timing, 182);
    assert_eq!(thumbnails[9].timing, 818);
    assert_eq!(thumbnails[0].timestamp, 225414172015.0);

    let expected_timings = [0, 91, 182, 273, 364, 455, 545, 636, 727, 818];
    for (thumbnail, expected) in thumbnails.iter().zip(expected_timings) {
        assert_eq!(thumbnail.timing, expected);
    }
    for pair in thumbnails.windows(2) {
        assert!(pair[0].timing <= pair[1].timing);
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

#[test]
fn last_thumbnail_reflects_final_observed_state() {
    let calls = AtomicUsize::new(0);
    let thumbnails = compute_filmstrip(
        &fixture_analysis(),
        &counting_encoder(&calls),
        &FilmstripConfig::default(),
    )
    .expect("filmstrip");

    // Frame 10 (offset 909.0) is the last non-interpolated frame; its fill
    // color is its index.
    assert_eq!(thumbnails[9].data, vec![10, 0, 0, 255, 90]);
}

#[test]
fn repeated_selections_share_encoded_bytes() {
    let calls = AtomicUsize::new(0);
    let thumbnails = compute_filmstrip(
        &fixture_analysis(),
        &counting_encoder(&calls),
        &FilmstripConfig::default(),
    )
    .expect("filmstrip");

    // Slots 3 and 4 (targets 272.7ms and 363.6ms) both resolve to the frame
    // at offset 260ms: identical bytes, one encode.
    assert_eq!(thumbnails[3].data, thumbnails[4].data);
    assert_eq!(thumbnails[3].data, vec![5, 0, 0, 255, 90]);

    // 10 slots, 9 distinct frames.
    assert_eq!(calls.load(Ordering::SeqCst), 9);
}

#[test]
fn parallel_pipeline_matches_sequential() {
    let analysis = fixture_analysis();

    let sequential_calls = AtomicUsize::new(0);
    let sequential = compute_filmstrip(
        &analysis,
        &counting_encoder(&sequential_calls),
        &FilmstripConfig::default(),
    )
    .expect("sequential filmstrip");

    let parallel_calls = AtomicUsize::new(0);
    let parallel = compute_filmstrip_parallel(
        &analysis,
        &counting_encoder(&parallel_calls),
        &FilmstripConfig::default(),
    )
    .expect("parallel filmstrip");

    assert_eq!(sequential, parallel);
    assert_eq!(parallel_calls.load(Ordering::SeqCst), 9);
}

#[test]
fn all_interpolated_trace_is_a_hard_failure() {
    let analysis = TraceAnalysis {
        timeline: VisualTimeline {
            beginning: 0.0,
            complete: 1000.0,
        },
        frames: vec![
            CapturedFrame::new(0.0, true, Raster::filled(2, 2, [0, 0, 0, 255])),
            CapturedFrame::new(500.0, true, Raster::filled(2, 2, [0, 0, 0, 255])),
        ],
    };
    let encoder = |_: &Raster, _: u8| -> Result<Vec<u8>> { Ok(Vec::new()) };
    let err = compute_filmstrip(&analysis, &encoder, &FilmstripConfig::default()).unwrap_err();
    assert!(matches!(err, Error::InputUnavailable(_)));
}

#[test]
fn encoder_failure_yields_no_partial_filmstrip() {
    let failed = AtomicUsize::new(0);
    let encoder = |_: &Raster, _: u8| -> Result<Vec<u8>> {
        failed.fetch_add(1, Ordering::SeqCst);
        Err(Error::EncodeFailure("simulated codec failure".into()))
    };
    let result = compute_filmstrip(&fixture_analysis(), &encoder, &FilmstripConfig::default());
    assert!(matches!(result, Err(Error::EncodeFailure(_))));
    // Fails fast on the first encode, not after producing nine thumbnails.
    assert_eq!(failed.load(Ordering::SeqCst), 1);
}

#[test]
fn scaled_pattern_matches_golden_digest() {
    // 200x200 pattern where pixel (x, y) = (x % 256, y % 256, 0, 255); at
    // scale factor 2 the output is exactly every other source pixel.
    let mut pixels = Vec::with_capacity(200 * 200 * 4);
    for y in 0..200u32 {
        for x in 0..200u32 {
            pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 0, 255]);
        }
    }
    let raster = Raster::new(200, 200, pixels).unwrap();
    let scaled = raster.scale_to_height(100).unwrap();

    assert_eq!(scaled.width(), 100);
    assert_eq!(scaled.height(), 100);

    let digest = hex::encode(Sha256::digest(scaled.pixels()));
    assert_eq!(
        digest,
        "f25e8ec6dacd261af2fbbfa321a589d88187d2f43296882e40236766800d1b0c"
    );
}

#[test]
fn report_serialization_shape() {
    let calls = AtomicUsize::new(0);
    let thumbnails = compute_filmstrip(
        &fixture_analysis(),
        &counting_encoder(&calls),
        &FilmstripConfig::default(),
    )
    .expect("filmstrip");

    let json = serde_json::to_value(&thumbnails).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["timing"], 0);
    assert_eq!(items[0]["timestamp"], 225414172015.0);
    assert!(items[0]["data"].is_string());
}
