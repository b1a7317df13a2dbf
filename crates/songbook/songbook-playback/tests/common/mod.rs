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

#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use songbook_playback::{AudioBackend, AudioError, AudioSource, Playable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open(String),
    Start(String),
    Halt(String),
    Release(String),
}

#[derive(Debug)]
pub struct Resource {
    name: String,
}

#[derive(Default)]
struct Inner {
    events:       Mutex<Vec<Event>>,
    fail_open:    AtomicBool,
    fail_start:   AtomicBool,
    fail_halt:    AtomicBool,
    fail_release: AtomicBool,
    open_delay:   Mutex<Option<Duration>>,
}

/// Audio backend double that records every call.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    inner: Arc<Inner>,
}

impl RecordingBackend {
    pub fn new() -> Self { Self::default() }

    pub fn events(&self) -> Vec<Event> { self.inner.events.lock().clone() }

    pub fn opens(&self) -> usize { self.count(|e| matches!(e, Event::Open(_))) }

    pub fn starts(&self) -> usize { self.count(|e| matches!(e, Event::Start(_))) }

    pub fn halts(&self) -> usize { self.count(|e| matches!(e, Event::Halt(_))) }

    pub fn releases(&self) -> usize { self.count(|e| matches!(e, Event::Release(_))) }

    pub fn fail_open(&self, fail: bool) { self.inner.fail_open.store(fail, Ordering::SeqCst); }

    pub fn fail_start(&self, fail: bool) { self.inner.fail_start.store(fail, Ordering::SeqCst); }

    pub fn fail_halt(&self, fail: bool) { self.inner.fail_halt.store(fail, Ordering::SeqCst); }

    pub fn fail_release(&self, fail: bool) {
        self.inner.fail_release.store(fail, Ordering::SeqCst);
    }

    pub fn delay_open(&self, delay: Duration) { *self.inner.open_delay.lock() = Some(delay); }

    fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.inner.events.lock().iter().filter(|e| pred(e)).count()
    }

    fn record(&self, event: Event) { self.inner.events.lock().push(event); }
}

#[async_trait]
impl AudioBackend for RecordingBackend {
    type Resource = Resource;

    async fn open(&self, source: &AudioSource) -> Result<Resource, AudioError> {
        let delay = *self.inner.open_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.inner.fail_open.load(Ordering::SeqCst) {
            return Err(AudioError::new(format!("cannot decode {source}")));
        }
        let name = source.to_string();
        self.record(Event::Open(name.clone()));
        Ok(Resource { name })
    }

    async fn start(&self, resource: &mut Resource) -> Result<(), AudioError> {
        if self.inner.fail_start.load(Ordering::SeqCst) {
            return Err(AudioError::new("output device busy"));
        }
        self.record(Event::Start(resource.name.clone()));
        Ok(())
    }

    async fn halt(&self, resource: &mut Resource) -> Result<(), AudioError> {
        if self.inner.fail_halt.load(Ordering::SeqCst) {
            return Err(AudioError::new("halt refused"));
        }
        self.record(Event::Halt(resource.name.clone()));
        Ok(())
    }

    async fn release(&self, resource: Resource) -> Result<(), AudioError> {
        // The handle is gone either way; only the report differs.
        self.record(Event::Release(resource.name));
        if self.inner.fail_release.load(Ordering::SeqCst) {
            return Err(AudioError::new("release refused"));
        }
        Ok(())
    }
}

pub struct TestSong {
    id:     String,
    source: AudioSource,
}

impl TestSong {
    pub fn new(id: &str) -> Self {
        Self {
            id:     id.to_string(),
            source: AudioSource::new(format!("assets/song{id}.mp3")),
        }
    }
}

impl Playable for TestSong {
    fn id(&self) -> &str { &self.id }

    fn source(&self) -> &AudioSource { &self.source }
}
