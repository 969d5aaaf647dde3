//! Tick, second and tempo conversions

use crate::{
    chunk::track::event::Event,
    error::{MidiError, MidiResult},
};

/// Tempo used until a Set Tempo message says otherwise, 120 beats per minute
pub const DEFAULT_TEMPO: u32 = 500_000;

/// Ticks per quarter note given to newly constructed files
pub const DEFAULT_DIVISION: u16 = 480;

/// Microseconds in a minute
const MICROSECONDS_PER_MINUTE: f64 = 60_000_000.0;

/// Converts a tick count into seconds for a division (ticks per quarter note) and tempo
/// (microseconds per quarter note)
pub fn tick_to_seconds(ticks: u64, division: u16, tempo: u32) -> f64 {
    (ticks as f64 * tempo as f64) / (division as f64 * 1e6)
}

/// Converts seconds into a (possibly fractional) tick count, the inverse of [`tick_to_seconds`]
pub fn seconds_to_tick(seconds: f64, division: u16, tempo: u32) -> f64 {
    (seconds * division as f64 * 1e6) / tempo as f64
}

/// Converts beats per minute into microseconds per quarter note
///
/// ```
/// use midiwire::time::bpm_to_tempo;
///
/// assert_eq!(bpm_to_tempo(120.0), 500_000);
/// assert_eq!(bpm_to_tempo(240.0), 250_000);
/// ```
pub fn bpm_to_tempo(bpm: f64) -> u32 {
    (MICROSECONDS_PER_MINUTE / bpm).round() as u32
}

/// Converts microseconds per quarter note into beats per minute
pub fn tempo_to_bpm(tempo: u32) -> f64 {
    MICROSECONDS_PER_MINUTE / tempo as f64
}

/// Rewrites each event's delta time as ticks since the start of its track. Fails if the track's
/// length does not fit in 64 bits
pub fn to_absolute(events: &[Event]) -> MidiResult<Vec<Event>> {
    let mut now: u64 = 0;
    let mut absolute = Vec::with_capacity(events.len());

    for event in events {
        now = now
            .checked_add(event.delta_time)
            .ok_or(MidiError::InvalidValue {
                field: "absolute time",
                value: event.delta_time,
            })?;
        absolute.push(event.with_delta_time(now));
    }

    Ok(absolute)
}

/// Rewrites absolute tick positions back into deltas from the previous event. Positions must be
/// non-decreasing
pub fn to_relative(events: Vec<Event>) -> Vec<Event> {
    let mut now = 0;

    events
        .into_iter()
        .map(|mut event| {
            let absolute = event.delta_time;
            event.delta_time = absolute.saturating_sub(now);
            now = absolute;
            event
        })
        .collect()
}
