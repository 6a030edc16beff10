use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use stride_core::Clip;

use crate::scene::ClipDef;

/// Spacing between clip deliveries on the loader thread.
const LOAD_STAGGER: Duration = Duration::from_millis(15);

/// Asynchronous clip source. Clips arrive one at a time over a channel
/// and are drained by the engine each frame; the controller stays
/// gated until all of them land.
pub struct ClipLoader {
    rx: mpsc::Receiver<Clip>,
}

impl ClipLoader {
    /// Deliver clips from a background thread, one per stagger tick.
    pub fn spawn(defs: Vec<ClipDef>) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for def in defs {
                thread::sleep(LOAD_STAGGER);
                let clip = Clip {
                    name: def.name,
                    duration: def.duration,
                };
                if tx.send(clip).is_err() {
                    return;
                }
            }
        });
        Self { rx }
    }

    /// Deliver every clip on the calling thread before the first poll.
    /// Used by the headless path, where results must not depend on
    /// load timing.
    pub fn immediate(defs: Vec<ClipDef>) -> Self {
        let (tx, rx) = mpsc::channel();
        for def in defs {
            let _ = tx.send(Clip {
                name: def.name,
                duration: def.duration,
            });
        }
        Self { rx }
    }

    /// Drain clips that finished since the last poll.
    pub fn poll(&self) -> Vec<Clip> {
        let mut clips = Vec::new();
        while let Ok(clip) = self.rx.try_recv() {
            clips.push(clip);
        }
        clips
    }
}
