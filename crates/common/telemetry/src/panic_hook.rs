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

//! Panic reporting through `tracing`, with an optional parking_lot deadlock
//! watcher behind the `deadlock_detection` feature.

#[cfg(feature = "deadlock_detection")]
use std::time::Duration;
use std::{
    panic,
    sync::{LazyLock, Once},
};

use backtrace::Backtrace;
use prometheus::{IntCounter, register_int_counter};

/// Number of panics observed since the hook was installed.
pub static PANIC_COUNTER: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!("songbook_panic_counter", "panics observed by songbook")
        .expect("songbook_panic_counter is registered once")
});

/// Install the panic hook.
///
/// Every panic is logged as an error event carrying its location and a
/// backtrace, then counted in [`PANIC_COUNTER`], and finally handed to the
/// previously installed hook. Repeated calls are no-ops.
pub fn set_panic_hook() {
    static INSTALL: Once = Once::new();

    INSTALL.call_once(|| {
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic| {
            let backtrace = format!("{:?}", Backtrace::new());
            if let Some(location) = panic.location() {
                tracing::error!(
                    message = %panic,
                    backtrace = %backtrace,
                    panic.file = location.file(),
                    panic.line = location.line(),
                    panic.column = location.column(),
                );
            } else {
                tracing::error!(message = %panic, backtrace = %backtrace);
            }
            PANIC_COUNTER.inc();
            default_hook(panic);
        }));

        #[cfg(feature = "deadlock_detection")]
        std::thread::spawn(watch_deadlocks);
    });
}

#[cfg(feature = "deadlock_detection")]
fn watch_deadlocks() {
    loop {
        std::thread::sleep(Duration::from_secs(5));
        let deadlocks = parking_lot::deadlock::check_deadlock();
        if deadlocks.is_empty() {
            continue;
        }

        tracing::warn!("{} deadlocks detected", deadlocks.len());
        for (i, threads) in deadlocks.iter().enumerate() {
            for t in threads {
                tracing::warn!(deadlock = i, thread = ?t.thread_id(), backtrace = ?t.backtrace());
            }
        }
    }
}
