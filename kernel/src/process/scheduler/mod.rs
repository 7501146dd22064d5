pub mod fcfs;
pub mod priority;
pub mod round_robin;

pub use fcfs::Fcfs;
pub use priority::{PriorityNonPreemptive, PriorityPreemptive};
pub use round_robin::RoundRobin;

use crate::process::Pid;

/// One ready-queue discipline. The kernel holds exactly one
/// `Box<dyn Scheduler>`, built from `KernelConfig::scheduler` at startup.
pub trait Scheduler: Send {
    /// Enqueues a ready process. `priority` is ignored by disciplines that
    /// don't use it (FCFS, round robin).
    fn add(&mut self, pid: Pid, priority: u8);

    /// Removes and returns the next process to run. Only called when
    /// `has_next()` is true.
    fn get_next(&mut self) -> Option<Pid>;

    fn has_next(&self) -> bool;

    /// Whether a running process at `running_priority` must be preempted
    /// in favor of a newly-ready process at `candidate_priority`. FCFS and
    /// round robin never preempt on arrival; preemptive priority does
    /// whenever the candidate strictly outranks the runner (lower number).
    fn must_preempt(&self, running_priority: u8, candidate_priority: u8) -> bool;
}
