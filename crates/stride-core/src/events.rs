use std::collections::VecDeque;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::states::Gait;

/// Things the frame loop reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    ClipBound { state: Gait, clip: String },
    ControllerReady,
    GaitChanged { from: Gait, to: Gait },
    CollisionBlocked { position: [f32; 3] },
    VehicleEntered,
    CameraToggled { free_roam: bool },
}

/// An event plus the session time it was emitted at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: f64,
    #[serde(flatten)]
    pub event: GameEvent,
}

/// Central event bus with ring buffer logging.
///
/// Systems `emit` during the frame; the engine flushes once at the end
/// of the tick, which appends to the capped log and optionally to a
/// JSON-lines file.
pub struct EventBus {
    log: VecDeque<EventRecord>,
    log_capacity: usize,
    log_file: Option<PathBuf>,
    total_time: f64,
    pending: Vec<EventRecord>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventBus {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            log: VecDeque::with_capacity(log_capacity),
            log_capacity,
            log_file: None,
            total_time: 0.0,
            pending: Vec::new(),
        }
    }

    /// Append every flushed event to `path` as one JSON object per line.
    pub fn enable_file_logging(&mut self, path: PathBuf) {
        self.log_file = Some(path);
    }

    /// Queue an event for the next flush.
    pub fn emit(&mut self, event: GameEvent) {
        self.pending.push(EventRecord {
            timestamp: self.total_time,
            event,
        });
    }

    /// Flush pending events into the ring buffer (and file, if
    /// enabled). Returns the flushed records so the caller can log or
    /// react to them.
    pub fn flush(&mut self) -> Vec<EventRecord> {
        let records: Vec<EventRecord> = self.pending.drain(..).collect();

        for record in &records {
            if self.log.len() >= self.log_capacity {
                self.log.pop_front();
            }
            self.log.push_back(record.clone());

            if let Some(log_path) = &self.log_file {
                if let Ok(json) = serde_json::to_string(record) {
                    let _ = std::fs::OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(log_path)
                        .and_then(|mut f| {
                            use std::io::Write;
                            writeln!(f, "{}", json)
                        });
                }
            }
        }

        records
    }

    /// Advance session time used for timestamps.
    pub fn tick(&mut self, dt: f64) {
        self.total_time += dt;
    }

    pub fn get_log(&self) -> &VecDeque<EventRecord> {
        &self.log
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// The whole log as JSON lines.
    pub fn log_as_jsonl(&self) -> String {
        let mut out = String::new();
        for record in &self.log {
            if let Ok(json) = serde_json::to_string(record) {
                out.push_str(&json);
                out.push('\n');
            }
        }
        out
    }
}

impl GameEvent {
    /// Route the event to the log at the register it deserves.
    pub fn log(&self) {
        match self {
            GameEvent::ClipBound { state, clip } => {
                tracing::info!("clip '{}' bound to state '{}'", clip, state.name());
            }
            GameEvent::ControllerReady => {
                tracing::info!("all clips bound, character controller ready");
            }
            GameEvent::GaitChanged { from, to } => {
                tracing::info!("gait {} -> {}", from.name(), to.name());
            }
            GameEvent::CollisionBlocked { position } => {
                tracing::debug!(
                    "movement blocked, reverted to ({:.2}, {:.2}, {:.2})",
                    position[0],
                    position[1],
                    position[2]
                );
            }
            GameEvent::VehicleEntered => {
                tracing::info!("vehicle entered, character seated");
            }
            GameEvent::CameraToggled { free_roam } => {
                if *free_roam {
                    tracing::info!("free-roam camera enabled");
                } else {
                    tracing::info!("free-roam camera disabled, follow camera restored");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_then_flush_returns_records() {
        let mut bus = EventBus::new(16);
        bus.tick(1.5);
        bus.emit(GameEvent::ControllerReady);
        let flushed = bus.flush();
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].timestamp, 1.5);
        assert_eq!(flushed[0].event, GameEvent::ControllerReady);
        // a second flush has nothing pending
        assert!(bus.flush().is_empty());
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut bus = EventBus::new(3);
        for i in 0..5 {
            bus.emit(GameEvent::GaitChanged {
                from: Gait::Idle,
                to: if i % 2 == 0 { Gait::Walk } else { Gait::Run },
            });
        }
        bus.flush();
        assert_eq!(bus.get_log().len(), 3);
        assert_eq!(
            bus.get_log()[0].event,
            GameEvent::GaitChanged { from: Gait::Idle, to: Gait::Walk }
        );
    }

    #[test]
    fn test_jsonl_has_one_line_per_record() {
        let mut bus = EventBus::new(16);
        bus.emit(GameEvent::VehicleEntered);
        bus.emit(GameEvent::CollisionBlocked { position: [1.0, 0.0, -2.0] });
        bus.flush();
        let jsonl = bus.log_as_jsonl();
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"vehicle_entered\""));
        assert!(lines[1].contains("\"collision_blocked\""));
    }
}
