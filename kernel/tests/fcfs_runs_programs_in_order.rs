use kernel::{Hardware, KernelConfig, SchedulerKind};
use pretty_assertions::assert_eq;

/// STORA 3; loop DECA/JNZ three times; EXIT. Eight instructions (one per
/// non-faulting tick) from admission to termination.
fn counting_program() -> Vec<String> {
    ["STORA", "3", "DECA", "JNZ", "2", "EXIT"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

#[test]
fn three_programs_terminate_strictly_one_after_another() {
    let hardware = Hardware::setup(KernelConfig {
        memory_cells: 64,
        frame_size: 8,
        scheduler: SchedulerKind::Fcfs,
        ..KernelConfig::default()
    });

    hardware.file_system_write("a.prog", counting_program());
    hardware.file_system_write("b.prog", counting_program());
    hardware.file_system_write("c.prog", counting_program());

    hardware.run("a.prog", 0).unwrap();
    hardware.run("b.prog", 0).unwrap();
    hardware.run("c.prog", 0).unwrap();

    // Each program burns 8 ticks with no I/O and FCFS never preempts, so
    // after fewer than 24 ticks at least one must still be alive.
    hardware.do_ticks(23).unwrap();
    assert!(hardware.with_kernel(|k| k.pcb_table().len()) > 0);

    hardware.do_ticks(1).unwrap();
    assert_eq!(hardware.with_kernel(|k| k.pcb_table().len()), 0);
}
