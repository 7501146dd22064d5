pub mod pcb_table;
pub mod scheduler;

/// Process identifier, assigned monotonically by `PcbTable::allocate_pid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    New,
    Ready,
    Running,
    Waiting,
    Terminated,
}

/// The CPU-visible register file, saved/restored on every context switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Context {
    pub pc: i64,
    pub a: i64,
    pub b: i64,
    pub sp: i64,
    pub zf: bool,
}

impl Context {
    /// pc=0, A=0, B=0, sp=-1 (empty stack), zf=true.
    pub fn initial() -> Self {
        Self { pc: 0, a: 0, b: 0, sp: -1, zf: true }
    }
}

/// Process Control Block. Everything the scheduler, dispatcher, and
/// interrupt handlers need to admit, suspend, and resume a process.
#[derive(Debug, Clone)]
pub struct Pcb {
    pub pid: Pid,
    pub path: String,
    pub priority: u8,
    pub limit: i64,
    pub context: Context,
    pub state: ProcessState,
}

impl Pcb {
    pub fn new(pid: Pid, path: String, priority: u8, limit: i64) -> Self {
        Self {
            pid,
            path,
            priority,
            limit,
            context: Context::initial(),
            state: ProcessState::New,
        }
    }
}
