use log::{debug, info};

use crate::dispatcher;
use crate::error::KernelError;
use crate::kernel::Kernel;
use crate::memory::page::Page;
use crate::process::{Context, Pcb, Pid, ProcessState};

/// Deschedules the running process into `to_state`, saves its context, and
/// loads whatever the scheduler hands back (if anything). Shared by KILL,
/// IO_IN, and TIMEOUT.
pub(crate) fn context_switch_from_running_to(kernel: &mut Kernel, to_state: ProcessState) -> Option<Pid> {
    let pid = kernel.running?;
    kernel.pcb_table.set_state(pid, to_state);
    dispatcher::save(kernel, pid);
    if to_state == ProcessState::Terminated {
        kernel.pcb_table.remove(pid);
    }
    kernel.running = None;
    if kernel.scheduler.has_next() {
        let next = kernel.scheduler.get_next().expect("has_next implies get_next");
        kernel.pcb_table.set_state(next, ProcessState::Running);
        kernel.running = Some(next);
        dispatcher::load(kernel, next);
    }
    Some(pid)
}

/// Admits `next`: runs it immediately if the CPU is idle, otherwise either
/// preempts the runner or enqueues `next` as ready, per the scheduler's
/// `must_preempt` policy.
pub(crate) fn context_switch_to_ready_or_running(kernel: &mut Kernel, next: Pid) {
    match kernel.running {
        None => {
            dispatcher::load(kernel, next);
            kernel.pcb_table.set_state(next, ProcessState::Running);
            kernel.running = Some(next);
        }
        Some(running) => {
            let running_priority = kernel.pcb_table.get(running).priority;
            let next_priority = kernel.pcb_table.get(next).priority;
            if kernel.scheduler.must_preempt(running_priority, next_priority) {
                kernel.pcb_table.set_state(running, ProcessState::Ready);
                dispatcher::save(kernel, running);
                kernel.scheduler.add(running, running_priority);
                dispatcher::load(kernel, next);
                kernel.pcb_table.set_state(next, ProcessState::Running);
                kernel.running = Some(next);
                debug!("preempted pid {} for pid {}", running.0, next.0);
            } else {
                kernel.pcb_table.set_state(next, ProcessState::Ready);
                kernel.scheduler.add(next, next_priority);
            }
        }
    }
}

pub fn new(kernel: &mut Kernel, path: String, priority: u8) -> Result<(), KernelError> {
    let priority = priority.min(4);
    let program = kernel
        .file_system
        .read(&path)
        .ok_or_else(|| KernelError::UnknownPath(path.clone()))?;

    let frame_size = kernel.frame_size;
    let page_count = program.len().div_ceil(frame_size).max(1);
    let limit = program.len() as i64 - 1;

    let pid = kernel.pcb_table.allocate_pid();
    let pages: Vec<Page> = (0..page_count).map(|index| Page::new(pid, index)).collect();
    kernel.memory_manager.put_page_table(pid, pages);

    let mut pcb = Pcb::new(pid, path, priority, limit);
    pcb.context = Context::initial();
    pcb.state = ProcessState::New;
    kernel.pcb_table.insert(pcb);

    info!("NEW: pid {} priority {} limit {}", pid.0, priority, limit);
    context_switch_to_ready_or_running(kernel, pid);
    Ok(())
}

pub fn kill(kernel: &mut Kernel) -> Result<(), KernelError> {
    let pid = context_switch_from_running_to(kernel, ProcessState::Terminated)
        .expect("KILL raised with no running process");
    let pages = kernel.memory_manager.take_page_table(pid);
    let resident: Vec<Page> = pages.into_iter().filter(|p| p.valid).collect();
    let freed = resident.len();
    kernel.memory_manager.free_frames(&resident);
    kernel.swap.drop_process(pid);
    info!("KILL: pid {} terminated, freed {} frames", pid.0, freed);
    Ok(())
}

pub fn io_in(kernel: &mut Kernel, op: String) -> Result<(), KernelError> {
    let pid = context_switch_from_running_to(kernel, ProcessState::Waiting)
        .expect("IO_IN raised with no running process");
    kernel.io_controller.enqueue(pid, op);
    kernel.timer.reset();
    debug!("IO_IN: pid {} moved to waiting", pid.0);
    Ok(())
}

pub fn io_out(kernel: &mut Kernel, device_id: u32) -> Result<(), KernelError> {
    let pid = kernel
        .io_controller
        .finished_pcb()
        .unwrap_or_else(|| panic!("IO_OUT raised on device {device_id} with nothing in service"));
    debug!("IO_OUT: pid {} finished I/O, device {}", pid.0, device_id);
    context_switch_to_ready_or_running(kernel, pid);
    Ok(())
}

pub fn timeout(kernel: &mut Kernel) -> Result<(), KernelError> {
    if !kernel.scheduler.has_next() {
        kernel.timer.reset();
        return Ok(());
    }
    let next = kernel.scheduler.get_next().expect("has_next implies get_next");
    let running = kernel.running.expect("TIMEOUT raised with no running process");
    let running_priority = kernel.pcb_table.get(running).priority;

    kernel.pcb_table.set_state(running, ProcessState::Ready);
    dispatcher::save(kernel, running);
    kernel.scheduler.add(running, running_priority);
    kernel.running = None;

    kernel.pcb_table.set_state(next, ProcessState::Running);
    kernel.running = Some(next);
    dispatcher::load(kernel, next);
    debug!("TIMEOUT: pid {} preempted by pid {}", running.0, next.0);
    Ok(())
}

pub fn page_fault(kernel: &mut Kernel, page_index: usize) -> Result<(), KernelError> {
    let pid = kernel
        .running
        .ok_or_else(|| KernelError::Fatal("PAGE_FAULT raised with no running process".to_string()))?;

    for dirty_index in kernel.mmu.dirty_page_indices() {
        kernel.memory_manager.mark_dirty(pid, dirty_index);
    }

    let (frame, victim) = kernel
        .memory_manager
        .allocate_frame(&mut kernel.memory, &mut kernel.swap)?;

    if let Some(victim) = victim {
        if kernel.running == Some(victim.owner_pid) {
            let mut invalidated = victim.clone();
            invalidated.valid = false;
            invalidated.frame = None;
            invalidated.dirty = false;
            kernel.mmu.set_page_frame(victim.page_index, invalidated);
        } else {
            kernel
                .memory_manager
                .invalidate_page(victim.owner_pid, victim.page_index);
        }
        debug!(
            "PAGE_FAULT: evicted pid {} page {} to make room",
            victim.owner_pid.0, victim.page_index
        );
    }

    let instructions = match kernel.swap.take(pid, page_index) {
        Some(saved) => saved,
        None => {
            let path = kernel.pcb_table.get(pid).path.clone();
            let program = kernel
                .file_system
                .read(&path)
                .expect("a running process's program must still be in the file system");
            let frame_size = kernel.frame_size;
            let start = page_index * frame_size;
            let end = (start + frame_size).min(program.len());
            program[start..end].to_vec()
        }
    };
    kernel.memory.load_frame(frame, &instructions);

    let mut page = Page::new(pid, page_index);
    page.frame = Some(frame);
    page.valid = true;
    page.dirty = false;
    page.chance = true;

    kernel.memory_manager.set_page(pid, page_index, page.clone());
    kernel.memory_manager.mark_resident(page.clone());
    kernel.mmu.set_page_frame(page_index, page);

    debug!("PAGE_FAULT: pid {} page {} mapped to frame {}", pid.0, page_index, frame);
    Ok(())
}
