use crate::memory::manager::{FifoPolicy, ReplacementPolicy, SecondChancePolicy};
use crate::process::scheduler::{Fcfs, PriorityNonPreemptive, PriorityPreemptive, RoundRobin, Scheduler};

/// Which ready-queue discipline to run. Built into a `Box<dyn Scheduler>`
/// once, at `Kernel::new`.
#[derive(Debug, Clone, Copy)]
pub enum SchedulerKind {
    Fcfs,
    RoundRobin { quantum: u32 },
    PriorityNonPreemptive { aging_k: u32 },
    PriorityPreemptive { aging_k: u32 },
}

impl SchedulerKind {
    pub fn build(self) -> Box<dyn Scheduler> {
        match self {
            SchedulerKind::Fcfs => Box::new(Fcfs::default()),
            SchedulerKind::RoundRobin { .. } => Box::new(RoundRobin::new()),
            SchedulerKind::PriorityNonPreemptive { aging_k } => Box::new(PriorityNonPreemptive::new(aging_k)),
            SchedulerKind::PriorityPreemptive { aging_k } => Box::new(PriorityPreemptive::new(aging_k)),
        }
    }

    /// `Some(quantum)` only for round robin — that's the only discipline
    /// the `Timer` preempts on its own.
    pub fn quantum(self) -> Option<u32> {
        match self {
            SchedulerKind::RoundRobin { quantum } => Some(quantum),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ReplacementPolicyKind {
    Fifo,
    SecondChance,
}

impl ReplacementPolicyKind {
    pub fn build(self) -> Box<dyn ReplacementPolicy> {
        match self {
            ReplacementPolicyKind::Fifo => Box::new(FifoPolicy),
            ReplacementPolicyKind::SecondChance => Box::new(SecondChancePolicy),
        }
    }
}

/// Everything `Kernel::new` needs, gathered in one place rather than as
/// scattered constructor args.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    pub memory_cells: usize,
    pub frame_size: usize,
    pub scheduler: SchedulerKind,
    pub replacement_policy: ReplacementPolicyKind,
    pub io_device_time: u32,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            memory_cells: 32,
            frame_size: 4,
            scheduler: SchedulerKind::Fcfs,
            replacement_policy: ReplacementPolicyKind::SecondChance,
            io_device_time: 3,
        }
    }
}
