use std::collections::HashMap;

use super::{Pcb, Pid, ProcessState};

/// Owns every live PCB by value. Ready queues inside a `Scheduler` only
/// ever hold `Pid`s, never PCBs themselves — this is the single place a
/// `Pid` resolves to process state.
#[derive(Default)]
pub struct PcbTable {
    processes: HashMap<Pid, Pcb>,
    next_pid: usize,
}

impl PcbTable {
    pub fn new() -> Self {
        Self { processes: HashMap::new(), next_pid: 1 }
    }

    pub fn allocate_pid(&mut self) -> Pid {
        let pid = Pid(self.next_pid);
        self.next_pid += 1;
        pid
    }

    pub fn insert(&mut self, pcb: Pcb) {
        self.processes.insert(pcb.pid, pcb);
    }

    pub fn get(&self, pid: Pid) -> &Pcb {
        self.processes.get(&pid).expect("unknown pid")
    }

    pub fn get_mut(&mut self, pid: Pid) -> &mut Pcb {
        self.processes.get_mut(&pid).expect("unknown pid")
    }

    pub fn set_state(&mut self, pid: Pid, state: ProcessState) {
        self.get_mut(pid).state = state;
    }

    pub fn remove(&mut self, pid: Pid) -> Option<Pcb> {
        self.processes.remove(&pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pcb> {
        self.processes.values()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}
