use std::collections::VecDeque;

use super::Scheduler;
use crate::process::Pid;

/// Plain first-come-first-served: one FIFO queue, never preempts.
#[derive(Default)]
pub struct Fcfs {
    queue: VecDeque<Pid>,
}

impl Scheduler for Fcfs {
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
    fn returns_processes_in_arrival_order() {
        let mut s = Fcfs::default();
        s.add(Pid(1), 0);
        s.add(Pid(2), 0);
        assert_eq!(s.get_next(), Some(Pid(1)));
        assert_eq!(s.get_next(), Some(Pid(2)));
        assert!(!s.has_next());
        assert_eq!(s.get_next(), None);
    }

    #[test]
    fn never_preempts() {
        let s = Fcfs::default();
        assert!(!s.must_preempt(4, 0));
        assert!(!s.must_preempt(0, 0));
    }
}
