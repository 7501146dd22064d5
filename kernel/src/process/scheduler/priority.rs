use std::collections::VecDeque;

use super::Scheduler;
use crate::process::Pid;

/// Five priority levels (0 highest .. 4 lowest), shared by the
/// non-preemptive and preemptive priority disciplines — they differ only
/// in `must_preempt`. Every `aging_k` calls to `get_next`, the tail of the
/// highest-numbered non-empty queue (levels 1..4) is promoted one level,
/// so a process can't starve behind a steady stream of higher-priority
/// arrivals.
struct PriorityQueues {
    queues: [VecDeque<Pid>; 5],
    aging_k: u32,
    calls_since_aging: u32,
}

impl PriorityQueues {
    fn new(aging_k: u32) -> Self {
        Self {
            queues: [
                VecDeque::new(),
                VecDeque::new(),
                VecDeque::new(),
                VecDeque::new(),
                VecDeque::new(),
            ],
            aging_k: aging_k.max(1),
            calls_since_aging: 0,
        }
    }

    fn add(&mut self, pid: Pid, priority: u8) {
        let level = (priority as usize).min(4);
        self.queues[level].push_back(pid);
    }

    fn has_next(&self) -> bool {
        self.queues.iter().any(|q| !q.is_empty())
    }

    fn age(&mut self) {
        if let Some(from) = (1..5).rev().find(|&level| !self.queues[level].is_empty()) {
            if let Some(pid) = self.queues[from].pop_back() {
                self.queues[from - 1].push_back(pid);
            }
        }
    }

    fn get_next(&mut self) -> Option<Pid> {
        self.calls_since_aging += 1;
        if self.calls_since_aging >= self.aging_k {
            self.calls_since_aging = 0;
            self.age();
        }
        self.queues.iter_mut().find_map(|q| q.pop_front())
    }
}

/// Non-preemptive priority: a higher-priority arrival waits for the
/// runner's current burst to finish.
pub struct PriorityNonPreemptive(PriorityQueues);

impl PriorityNonPreemptive {
    pub fn new(aging_k: u32) -> Self {
        Self(PriorityQueues::new(aging_k))
    }
}

impl Scheduler for PriorityNonPreemptive {
    fn add(&mut self, pid: Pid, priority: u8) {
        self.0.add(pid, priority);
    }

    fn get_next(&mut self) -> Option<Pid> {
        self.0.get_next()
    }

    fn has_next(&self) -> bool {
        self.0.has_next()
    }

    fn must_preempt(&self, _running_priority: u8, _candidate_priority: u8) -> bool {
        false
    }
}

/// Preemptive priority: a strictly-higher-priority arrival (lower number)
/// immediately bumps the runner back to ready.
pub struct PriorityPreemptive(PriorityQueues);

impl PriorityPreemptive {
    pub fn new(aging_k: u32) -> Self {
        Self(PriorityQueues::new(aging_k))
    }
}

impl Scheduler for PriorityPreemptive {
    fn add(&mut self, pid: Pid, priority: u8) {
        self.0.add(pid, priority);
    }

    fn get_next(&mut self) -> Option<Pid> {
        self.0.get_next()
    }

    fn has_next(&self) -> bool {
        self.0.has_next()
    }

    fn must_preempt(&self, running_priority: u8, candidate_priority: u8) -> bool {
        candidate_priority < running_priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highest_priority_level_served_first() {
        let mut s = PriorityNonPreemptive::new(1000);
        s.add(Pid(1), 3);
        s.add(Pid(2), 0);
        assert_eq!(s.get_next(), Some(Pid(2)));
        assert_eq!(s.get_next(), Some(Pid(1)));
    }

    #[test]
    fn preemptive_outranks_running_only_on_strictly_higher_priority() {
        let s = PriorityPreemptive::new(1000);
        assert!(s.must_preempt(3, 0));
        assert!(!s.must_preempt(0, 3));
        assert!(!s.must_preempt(2, 2));
    }

    #[test]
    fn aging_promotes_the_oldest_waiter_in_the_lowest_queue() {
        let mut s = PriorityNonPreemptive::new(1);
        s.add(Pid(1), 4);
        s.add(Pid(2), 0);
        // first get_next call ages before popping: pid 1 moves from level 4 to 3,
        // then level 0 (pid 2) is still served first since it's non-empty.
        assert_eq!(s.get_next(), Some(Pid(2)));
    }
}
