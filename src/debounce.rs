/// Identifies one arming of a [`SubmitDebouncer`]. Only the newest ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DebounceTicket(u64);

/// Coalesces bursts of input into a single submission after a quiet period.
///
/// This only does the bookkeeping. The timer itself belongs to the [`Page`](`crate::Page`),
/// which reports back with the ticket it was armed with once the quiet period elapses.
/// Rearming supersedes every earlier ticket, whether or not its timer is actually cancelled.
#[derive(Debug)]
pub struct SubmitDebouncer<T> {
	issued: u64,
	pending: Option<(DebounceTicket, T)>,
}

impl<T> Default for SubmitDebouncer<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> SubmitDebouncer<T> {
	#[must_use]
	pub fn new() -> Self {
		Self { issued: 0, pending: None }
	}

	/// Starts (or restarts) the quiet period, remembering `value` as the latest trigger.
	pub fn arm(&mut self, value: T) -> DebounceTicket {
		self.issued += 1;
		let ticket = DebounceTicket(self.issued);
		self.pending = Some((ticket, value));
		ticket
	}

	/// Claims the pending trigger iff `ticket` is the newest one.
	pub fn take(&mut self, ticket: DebounceTicket) -> Option<T> {
		match self.pending.take() {
			Some((pending, value)) if pending == ticket => Some(value),
			other => {
				self.pending = other;
				None
			}
		}
	}

	/// Drops the pending trigger, if any. Outstanding tickets become stale.
	pub fn cancel(&mut self) -> bool {
		self.pending.take().is_some()
	}

	#[must_use]
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}
}
