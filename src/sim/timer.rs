//! One-shot gameplay timers
//!
//! Earlier browser builds of this game drove delayed transitions (countdown
//! steps, the post-miss pause) with bare setTimeout callbacks that flipped
//! boolean flags. A callback could fire after the state it captured had been
//! reset, resurrecting a stale transition. Here every armed timer records the
//! state epoch at arm time; entries whose epoch no longer matches the current
//! one are dropped when drained, never fired.

/// Events a timer can deliver back into the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Advance the serve countdown by one step
    CountdownStep,
    /// End a message hold (Miss! / Stage Clear!) and start the countdown
    Resume,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    fire_at_tick: u64,
    epoch: u32,
    event: TimerEvent,
    /// Insertion order, tie-breaker for timers due on the same tick
    seq: u64,
}

/// Owns all pending one-shot timers for a game state
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<PendingTimer>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot timer bound to the given epoch
    pub fn arm(&mut self, fire_at_tick: u64, epoch: u32, event: TimerEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingTimer {
            fire_at_tick,
            epoch,
            event,
            seq,
        });
    }

    /// Remove every timer, due or not
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Pop all timers due at `now_tick`, dropping stale-epoch entries.
    ///
    /// Returns events ordered by due tick, then by arm order. Must be called
    /// every tick; a timer whose due tick was skipped still fires on the next
    /// drain.
    pub fn drain_due(&mut self, now_tick: u64, epoch: u32) -> Vec<TimerEvent> {
        // Stale entries are discarded whether or not they are due
        self.pending.retain(|t| t.epoch == epoch);

        let mut due: Vec<PendingTimer> = Vec::new();
        self.pending.retain(|t| {
            if t.fire_at_tick <= now_tick {
                due.push(t.clone());
                false
            } else {
                true
            }
        });

        due.sort_by_key(|t| (t.fire_at_tick, t.seq));
        due.into_iter().map(|t| t.event).collect()
    }
}
