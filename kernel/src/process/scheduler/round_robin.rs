use std::collections::VecDeque;

use super::Scheduler;
use crate::process::Pid;

/// Round robin: same FIFO shape as FCFS, but paired by `KernelConfig` with
/// a `Timer` quantum — preemption here is entirely timer-driven (see
/// `interrupts::handlers::timeout`), never triggered by process arrival.
#[derive(Default)]
pub struct RoundRobin {
    queue: VecDeque<Pid>,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for RoundRobin {
    fn add(&mut self, pid: Pid, _priority: u8) {
        self.queue.push_back(pid);
    }

    fn get_next(&mut self) -> Option<Pid> {
        self.queue.pop_front()
    }

    fn has_next(&self) -> bool {
        !self.queue.is_empty()
    }

    fn must_preempt(&self, _running_priority: u8, _candidate_priority: u8) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_through_ready_queue() {
        let mut s = RoundRobin::new();
        s.add(Pid(1), 0);
        s.add(Pid(2), 0);
        let first = s.get_next().unwrap();
        s.add(first, 0);
        assert_eq!(s.get_next(), Some(Pid(2)));
        assert_eq!(s.get_next(), Some(Pid(1)));
    }
}
