use crate::kernel::Kernel;
use crate::process::{Context, Pid};

/// Materializes `pid`'s saved context into the CPU and installs its whole
/// page table into the MMU's TLB — the per-process page table lives there
/// while the process runs, mirrored back out on `save`.
pub fn load(kernel: &mut Kernel, pid: Pid) {
    let pcb = kernel.pcb_table.get(pid);
    let context = pcb.context;
    let limit = pcb.limit;

    kernel.cpu.pc = context.pc;
    kernel.cpu.a = context.a;
    kernel.cpu.b = context.b;
    kernel.cpu.sp = context.sp;
    kernel.cpu.zf = context.zf;

    kernel.mmu.limit = limit;
    kernel.mmu.reset_tlb();
    let pages = kernel.memory_manager.get_page_table(pid).clone();
    for page in pages {
        kernel.mmu.set_page_frame(page.page_index, page);
    }
    kernel.timer.reset();
}

/// Snapshots the CPU back into `pid`'s PCB, writes the TLB's page copies
/// back to the Memory Manager (they may be dirtier than what it last
/// saw), and marks the CPU idle.
pub fn save(kernel: &mut Kernel, pid: Pid) {
    let pages = kernel.mmu.drain_tlb();
    kernel.memory_manager.sync_page_table(pid, pages);

    let context = Context {
        pc: kernel.cpu.pc,
        a: kernel.cpu.a,
        b: kernel.cpu.b,
        sp: kernel.cpu.sp,
        zf: kernel.cpu.zf,
    };
    kernel.pcb_table.get_mut(pid).context = context;
    kernel.cpu.pc = -1;
}
