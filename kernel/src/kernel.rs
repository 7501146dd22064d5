use log::trace;

use crate::clock::{IoController, Timer, DEVICE_ID};
use crate::config::KernelConfig;
use crate::cpu::{self, Cpu};
use crate::error::KernelError;
use crate::filesystem::FileSystem;
use crate::interrupts::{Interrupt, InterruptVector};
use crate::memory::manager::MemoryManager;
use crate::memory::swap::SwapStore;
use crate::memory::Memory;
use crate::mmu::{Mmu, TranslateOutcome};
use crate::process::pcb_table::PcbTable;
use crate::process::scheduler::Scheduler;
use crate::process::Pid;

/// Everything the simulator owns: hardware state (memory, MMU, CPU, clock
/// devices) and control-plane state (file system, PCB table, scheduler,
/// which process is running). `Hardware` is the only thing that ever
/// holds a `Kernel` behind a lock; within a single call here, every
/// method either fully settles state or returns a `KernelError`.
pub struct Kernel {
    pub frame_size: usize,
    pub memory: Memory,
    pub mmu: Mmu,
    pub cpu: Cpu,
    pub timer: Timer,
    pub io_controller: IoController,
    pub memory_manager: MemoryManager,
    pub swap: SwapStore,
    pub file_system: FileSystem,
    pub pcb_table: PcbTable,
    pub scheduler: Box<dyn Scheduler>,
    pub running: Option<Pid>,
    clock_ticks: u64,
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Self {
        let num_frames = config.memory_cells / config.frame_size;
        let quantum = config.scheduler.quantum();
        Self {
            frame_size: config.frame_size,
            memory: Memory::new(config.memory_cells, config.frame_size),
            mmu: Mmu::new(config.frame_size),
            cpu: Cpu::new(),
            timer: Timer { count: 0, quantum },
            io_controller: IoController::new(config.io_device_time),
            memory_manager: MemoryManager::new(num_frames, config.replacement_policy.build()),
            swap: SwapStore::new(),
            file_system: FileSystem::new(),
            pcb_table: PcbTable::new(),
            scheduler: config.scheduler.build(),
            running: None,
            clock_ticks: 0,
        }
    }

    /// Raises a NEW interrupt for a program already written to the file
    /// system. The public entry point for admitting a process.
    pub fn run(&mut self, path: impl Into<String>, priority: u8) -> Result<(), KernelError> {
        InterruptVector::handle(self, Interrupt::New { path: path.into(), priority })
    }

    pub fn do_ticks(&mut self, n: u32) -> Result<(), KernelError> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// One clock tick: the I/O device is polled first, then the timer
    /// either raises TIMEOUT or forwards the tick to the CPU.
    pub fn tick(&mut self) -> Result<(), KernelError> {
        self.clock_ticks += 1;
        trace!("tick {}", self.clock_ticks);

        if self.io_controller.tick() {
            InterruptVector::handle(self, Interrupt::IoOut { device_id: DEVICE_ID })?;
        }

        if let Some(quantum) = self.timer.quantum {
            if self.cpu.busy() {
                self.timer.count += 1;
                if self.timer.count > quantum {
                    return InterruptVector::handle(self, Interrupt::Timeout);
                }
            }
        }

        cpu::step(self)
    }

    pub fn tick_count(&self) -> u64 {
        self.clock_ticks
    }

    pub fn pcb_table(&self) -> &PcbTable {
        &self.pcb_table
    }

    pub fn memory_dump(&self) -> &[String] {
        self.memory.dump()
    }

    pub fn free_frame_count(&self) -> usize {
        self.memory_manager.free_frame_count()
    }

    pub(crate) fn fetch(&mut self) -> Result<String, KernelError> {
        let pc = self.cpu.pc;
        let phys = self.translate_retrying(pc, false)?;
        self.cpu.pc += 1;
        Ok(self.memory.read(phys))
    }

    pub(crate) fn mem_read(&mut self, addr: i64) -> Result<String, KernelError> {
        let phys = self.translate_retrying(addr, false)?;
        Ok(self.memory.read(phys))
    }

    pub(crate) fn mem_write(&mut self, addr: i64, value: String) -> Result<(), KernelError> {
        let phys = self.translate_retrying(addr, true)?;
        self.memory.write(phys, value);
        Ok(())
    }

    /// Translates a logical address, servicing PAGE_FAULT interrupts
    /// (and retrying) until the page is valid or the translation is
    /// fatal.
    pub(crate) fn translate_retrying(&mut self, logical: i64, for_write: bool) -> Result<usize, KernelError> {
        loop {
            match self.mmu.translate(logical, for_write) {
                TranslateOutcome::Ok(phys) => return Ok(phys),
                TranslateOutcome::Fault(page_index) => {
                    InterruptVector::handle(self, Interrupt::PageFault { page_index })?;
                }
                TranslateOutcome::Fatal(reason) => return Err(KernelError::Fatal(reason.to_string())),
            }
        }
    }
}
