use kernel::{Hardware, KernelConfig, ReplacementPolicyKind, SchedulerKind};

/// A 12-token, 3-page program (frame_size 4) that only ever touches its
/// own pages, so with a 2-frame machine the third page fault must evict
/// one of the first two.
fn three_page_program() -> Vec<String> {
    [
        "STORA", "5", "DECA", "JNZ", "2", "CPU", "CPU", "CPU", "CPU", "CPU", "CPU", "EXIT",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}

#[test]
fn a_third_page_fault_with_no_free_frame_evicts_a_resident_page() {
    let hardware = Hardware::setup(KernelConfig {
        memory_cells: 8,
        frame_size: 4,
        scheduler: SchedulerKind::Fcfs,
        replacement_policy: ReplacementPolicyKind::SecondChance,
        ..KernelConfig::default()
    });

    hardware.file_system_write("paged.prog", three_page_program());
    hardware.run("paged.prog", 0).unwrap();

    // Plenty of ticks to run the whole program to completion, touching
    // all three pages and forcing at least one eviction along the way.
    hardware.do_ticks(20).unwrap();

    hardware.with_kernel(|k| {
        assert_eq!(k.pcb_table().len(), 0, "process should have run to EXIT");
        // Both frames were reclaimed on termination.
        assert_eq!(k.free_frame_count(), 2);
    });
}

#[test]
fn fifo_also_evicts_when_the_pool_is_exhausted() {
    let hardware = Hardware::setup(KernelConfig {
        memory_cells: 8,
        frame_size: 4,
        scheduler: SchedulerKind::Fcfs,
        replacement_policy: ReplacementPolicyKind::Fifo,
        ..KernelConfig::default()
    });

    hardware.file_system_write("paged.prog", three_page_program());
    hardware.run("paged.prog", 0).unwrap();

    hardware.do_ticks(20).unwrap();

    hardware.with_kernel(|k| {
        assert_eq!(k.pcb_table().len(), 0);
        assert_eq!(k.free_frame_count(), 2);
    });
}
