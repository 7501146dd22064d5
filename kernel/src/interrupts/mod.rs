pub mod handlers;

use crate::error::KernelError;
use crate::kernel::Kernel;

/// The interrupt kinds the kernel dispatches on: process admission,
/// termination, the two I/O directions, quantum expiry, and demand-paging
/// faults.
#[derive(Debug, Clone)]
pub enum Interrupt {
    New { path: String, priority: u8 },
    Kill,
    IoIn { op: String },
    IoOut { device_id: u32 },
    Timeout,
    PageFault { page_index: usize },
}

pub struct InterruptVector;

impl InterruptVector {
    /// Dispatches one interrupt to its handler. Callers are expected to
    /// already hold the kernel-wide guard (`Hardware` takes it once per
    /// tick or per shell command); `handle` never locks anything itself,
    /// so a handler may call back into it directly — a CPU step raising
    /// `IoIn`, or a fault handler retry — without any risk of deadlock.
    pub fn handle(kernel: &mut Kernel, irq: Interrupt) -> Result<(), KernelError> {
        match irq {
            Interrupt::New { path, priority } => handlers::new(kernel, path, priority),
            Interrupt::Kill => handlers::kill(kernel),
            Interrupt::IoIn { op } => handlers::io_in(kernel, op),
            Interrupt::IoOut { device_id } => handlers::io_out(kernel, device_id),
            Interrupt::Timeout => handlers::timeout(kernel),
            Interrupt::PageFault { page_index } => handlers::page_fault(kernel, page_index),
        }
    }
}
