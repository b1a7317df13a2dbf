// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod common;

use std::time::Duration;

use common::{Event, RecordingBackend, TestSong};
use songbook_common_telemetry::init_default_ut_logging;
use songbook_playback::{PlaybackController, PlaybackError, PlaybackState};

#[tokio::test]
async fn play_then_dispose_releases_exactly_once() {
    init_default_ut_logging();
    let backend = RecordingBackend::new();
    let mut controller = PlaybackController::new(backend.clone());

    controller.play(&TestSong::new("1")).await.unwrap();
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.current_song(), Some("1"));

    controller.dispose().await.unwrap();
    controller.dispose().await.unwrap();

    assert_eq!(controller.state(), PlaybackState::Unloaded);
    assert_eq!(backend.opens(), 1);
    assert_eq!(backend.releases(), 1);
}

#[tokio::test]
async fn dispose_without_play() {
    init_default_ut_logging();
    let backend = RecordingBackend::new();
    let mut controller = PlaybackController::new(backend.clone());

    controller.dispose().await.unwrap();

    assert!(controller.is_disposed());
    assert!(backend.events().is_empty());
}

#[tokio::test]
async fn switching_songs_releases_before_loading() {
    init_default_ut_logging();
    let backend = RecordingBackend::new();
    let mut controller = PlaybackController::new(backend.clone());

    controller.play(&TestSong::new("1")).await.unwrap();
    controller.play(&TestSong::new("2")).await.unwrap();

    assert_eq!(
        backend.events(),
        vec![
            Event::Open("assets/song1.mp3".into()),
            Event::Start("assets/song1.mp3".into()),
            Event::Release("assets/song1.mp3".into()),
            Event::Open("assets/song2.mp3".into()),
            Event::Start("assets/song2.mp3".into()),
        ]
    );
    assert_eq!(controller.current_song(), Some("2"));
    controller.dispose().await.unwrap();
}

#[tokio::test]
async fn replaying_the_same_song_reuses_the_resource() {
    init_default_ut_logging();
    let backend = RecordingBackend::new();
    let mut controller = PlaybackController::new(backend.clone());
    let song = TestSong::new("1");

    controller.play(&song).await.unwrap();
    controller.play(&song).await.unwrap();
    assert_eq!(backend.starts(), 1);

    controller.stop().await.unwrap();
    assert_eq!(controller.state(), PlaybackState::Loaded);

    controller.play(&song).await.unwrap();
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(backend.opens(), 1);
    assert_eq!(backend.starts(), 2);
    controller.dispose().await.unwrap();
}

#[tokio::test]
async fn stop_only_halts_while_playing() {
    init_default_ut_logging();
    let backend = RecordingBackend::new();
    let mut controller = PlaybackController::new(backend.clone());

    controller.stop().await.unwrap();
    assert_eq!(controller.state(), PlaybackState::Idle);

    controller.play(&TestSong::new("1")).await.unwrap();
    controller.stop().await.unwrap();
    controller.stop().await.unwrap();

    assert_eq!(controller.state(), PlaybackState::Loaded);
    assert_eq!(backend.halts(), 1);
    assert_eq!(backend.releases(), 0);
    controller.dispose().await.unwrap();
}

#[tokio::test]
async fn load_failure_returns_to_idle() {
    init_default_ut_logging();
    let backend = RecordingBackend::new();
    backend.fail_open(true);
    let mut controller = PlaybackController::new(backend.clone());

    let err = controller.play(&TestSong::new("1")).await.unwrap_err();

    assert!(matches!(err, PlaybackError::Load { ref song_id, .. } if song_id == "1"));
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.current_song(), None);

    controller.dispose().await.unwrap();
    assert_eq!(backend.releases(), 0);
}

#[tokio::test]
async fn start_failure_releases_the_loaded_resource() {
    init_default_ut_logging();
    let backend = RecordingBackend::new();
    backend.fail_start(true);
    let mut controller = PlaybackController::new(backend.clone());

    let err = controller.play(&TestSong::new("1")).await.unwrap_err();

    assert!(matches!(err, PlaybackError::Start { .. }));
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(backend.opens(), 1);
    assert_eq!(backend.releases(), 1);

    backend.fail_start(false);
    controller.play(&TestSong::new("1")).await.unwrap();
    assert_eq!(controller.state(), PlaybackState::Playing);
    controller.dispose().await.unwrap();
    assert_eq!(backend.opens(), backend.releases());
}

#[tokio::test]
async fn play_after_dispose_is_rejected() {
    init_default_ut_logging();
    let backend = RecordingBackend::new();
    let mut controller = PlaybackController::new(backend.clone());

    controller.dispose().await.unwrap();
    let err = controller.play(&TestSong::new("1")).await.unwrap_err();

    assert!(matches!(err, PlaybackError::Disposed { .. }));
    assert_eq!(backend.opens(), 0);
}

#[tokio::test]
async fn failed_release_still_unloads() {
    init_default_ut_logging();
    let backend = RecordingBackend::new();
    let mut controller = PlaybackController::new(backend.clone());
    controller.play(&TestSong::new("1")).await.unwrap();

    backend.fail_release(true);
    let err = controller.dispose().await.unwrap_err();

    assert!(matches!(err, PlaybackError::Release { .. }));
    assert_eq!(controller.state(), PlaybackState::Unloaded);
    controller.dispose().await.unwrap();
    assert_eq!(backend.releases(), 1);
}

#[tokio::test]
async fn failed_halt_keeps_playing() {
    init_default_ut_logging();
    let backend = RecordingBackend::new();
    let mut controller = PlaybackController::new(backend.clone());
    controller.play(&TestSong::new("1")).await.unwrap();

    backend.fail_halt(true);
    let err = controller.stop().await.unwrap_err();

    assert!(matches!(err, PlaybackError::Halt { .. }));
    assert_eq!(controller.state(), PlaybackState::Playing);
    controller.dispose().await.unwrap();
}

#[tokio::test]
async fn dropping_an_undisposed_controller_releases_its_resource() {
    init_default_ut_logging();
    let backend = RecordingBackend::new();
    let mut controller = PlaybackController::new(backend.clone());
    controller.play(&TestSong::new("1")).await.unwrap();

    drop(controller);
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(backend.opens(), 1);
    assert_eq!(backend.releases(), 1);
}
