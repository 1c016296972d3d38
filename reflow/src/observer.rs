use crate::stream::{CancellationToken, EventStream, Subscription};
use crate::types::WidthSnapshot;

/// Turns raw width measurements of a table and its parent into a
/// deduplicated stream of [`WidthSnapshot`]s.
///
/// Directions are always classified against the previously emitted snapshot.
/// Late subscribers receive the latest snapshot immediately.
pub struct WidthObserver {
    latest: WidthSnapshot,
    stream: EventStream<WidthSnapshot>,
}

impl WidthObserver {
    pub fn new(parent_width: u32, table_width: u32) -> Self {
        let latest = WidthSnapshot::initial(parent_width, table_width);
        Self {
            latest,
            stream: EventStream::replaying(Some(latest)),
        }
    }

    pub fn latest(&self) -> WidthSnapshot {
        self.latest
    }

    /// Record fresh measurements.
    ///
    /// Returns the emitted snapshot, or `None` when it is identical to the
    /// latest one or the stream has completed.
    pub fn observe(&mut self, parent_width: u32, table_width: u32) -> Option<WidthSnapshot> {
        let snapshot = self.latest.next(parent_width, table_width);
        self.push(snapshot).then_some(snapshot)
    }

    /// Emit a prepared snapshot without reclassifying its directions.
    ///
    /// Returns false when the snapshot equals the latest one.
    pub fn push(&mut self, snapshot: WidthSnapshot) -> bool {
        if self.stream.is_completed() || snapshot == self.latest {
            log::trace!("[observer] dropping snapshot {snapshot:?}");
            return false;
        }
        log::trace!("[observer] emitting {snapshot:?}");
        self.latest = snapshot;
        self.stream.emit(snapshot);
        true
    }

    pub fn subscribe(&self, callback: impl FnMut(&WidthSnapshot) + 'static) -> Subscription {
        self.stream.subscribe(callback)
    }

    pub fn subscribe_until(
        &self,
        until: CancellationToken,
        callback: impl FnMut(&WidthSnapshot) + 'static,
    ) -> Subscription {
        self.stream.subscribe_until(until, callback)
    }

    pub fn complete(&self) {
        self.stream.complete();
    }

    pub fn is_completed(&self) -> bool {
        self.stream.is_completed()
    }
}
